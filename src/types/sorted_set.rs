use super::list::clamp_range;
use std::collections::{BTreeSet, HashMap};

/// Member set ordered by (score, member) ascending.
///
/// Two structures in tandem: a member -> score map for O(1) score lookup, and
/// an ordered tree of (score, member) keys for rank ranges. A member appears
/// in both or in neither.
#[derive(Debug, Clone, Default)]
pub struct SortedSet {
    scores: HashMap<Vec<u8>, f64>,
    ranks: BTreeSet<RankKey>,
}

/// Tree key sorting by score first, member bytes second. The score is stored
/// as sign-adjusted IEEE 754 bits so plain u64 ordering matches f64 ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    score_bits: u64,
    member: Vec<u8>,
}

impl RankKey {
    fn new(score: f64, member: Vec<u8>) -> Self {
        let bits = score.to_bits();
        let score_bits = if bits >> 63 == 1 { !bits } else { bits | (1 << 63) };
        RankKey { score_bits, member }
    }
}

impl SortedSet {
    pub fn new() -> Self {
        SortedSet::default()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Add a member or update its score in place.
    /// Returns true only for a newly inserted member.
    pub fn add(&mut self, member: Vec<u8>, score: f64) -> bool {
        match self.scores.insert(member.clone(), score) {
            Some(old) => {
                self.ranks.remove(&RankKey::new(old, member.clone()));
                self.ranks.insert(RankKey::new(score, member));
                false
            }
            None => {
                self.ranks.insert(RankKey::new(score, member));
                true
            }
        }
    }

    /// Remove a member. Returns true if it was present.
    pub fn remove(&mut self, member: &[u8]) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ranks.remove(&RankKey::new(score, member.to_vec()));
                true
            }
            None => false,
        }
    }

    pub fn score(&self, member: &[u8]) -> Option<f64> {
        self.scores.get(member).copied()
    }

    /// Members between ordinal positions `start..=stop` in ascending
    /// (score, member) order, with the same negative-index and clamping rules
    /// as list ranges.
    pub fn range(&self, start: i64, stop: i64) -> Vec<(&[u8], f64)> {
        let Some((start, stop)) = clamp_range(start, stop, self.len()) else {
            return vec![];
        };
        self.ranks
            .iter()
            .skip(start)
            .take(stop - start + 1)
            .map(|k| (k.member.as_slice(), self.scores[&k.member]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_score_then_member() {
        let mut z = SortedSet::new();
        assert!(z.add(b"b".to_vec(), 2.0));
        assert!(z.add(b"a".to_vec(), 1.0));
        assert!(z.add(b"c".to_vec(), 1.0));
        let members: Vec<&[u8]> = z.range(0, -1).into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec![b"a".as_slice(), b"c".as_slice(), b"b".as_slice()]);
    }

    #[test]
    fn re_add_updates_score_without_duplicating() {
        let mut z = SortedSet::new();
        assert!(z.add(b"a".to_vec(), 1.0));
        assert!(!z.add(b"a".to_vec(), 9.0));
        assert_eq!(z.len(), 1);
        assert_eq!(z.score(b"a"), Some(9.0));
        assert_eq!(z.range(0, -1).len(), 1);
    }

    #[test]
    fn negative_scores_sort_before_positive() {
        let mut z = SortedSet::new();
        z.add(b"neg".to_vec(), -1.5);
        z.add(b"zero".to_vec(), 0.0);
        z.add(b"pos".to_vec(), 1.5);
        let members: Vec<&[u8]> = z.range(0, -1).into_iter().map(|(m, _)| m).collect();
        assert_eq!(members, vec![b"neg".as_slice(), b"zero".as_slice(), b"pos".as_slice()]);
    }

    #[test]
    fn remove_drops_both_structures() {
        let mut z = SortedSet::new();
        z.add(b"a".to_vec(), 1.0);
        assert!(z.remove(b"a"));
        assert!(!z.remove(b"a"));
        assert!(z.is_empty());
        assert!(z.range(0, -1).is_empty());
    }
}
