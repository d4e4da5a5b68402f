use std::collections::VecDeque;

/// Ordered element sequence with O(1) push/pop at both ends.
#[derive(Debug, Clone, Default)]
pub struct List {
    elements: VecDeque<Vec<u8>>,
}

/// Which end of the list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    Head,
    Tail,
}

impl List {
    pub fn new() -> Self {
        List::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn push(&mut self, end: End, element: Vec<u8>) {
        match end {
            End::Head => self.elements.push_front(element),
            End::Tail => self.elements.push_back(element),
        }
    }

    /// Remove and return up to `count` elements from the given end.
    /// Asking for more than the list holds drains it without error.
    pub fn pop(&mut self, end: End, count: usize) -> Vec<Vec<u8>> {
        let take = count.min(self.elements.len());
        let mut out = Vec::with_capacity(take);
        for _ in 0..take {
            let element = match end {
                End::Head => self.elements.pop_front(),
                End::Tail => self.elements.pop_back(),
            };
            match element {
                Some(e) => out.push(e),
                None => break,
            }
        }
        out
    }

    /// Elements between ordinal positions `start..=stop`. Negative indices
    /// count back from the tail (-1 = last); out-of-range bounds clamp.
    pub fn range(&self, start: i64, stop: i64) -> Vec<&Vec<u8>> {
        let Some((start, stop)) = clamp_range(start, stop, self.elements.len()) else {
            return vec![];
        };
        self.elements.range(start..=stop).collect()
    }
}

/// Resolve a possibly-negative inclusive index pair against `len`,
/// clamping to valid positions. None means the range is empty.
pub(crate) fn clamp_range(start: i64, stop: i64, len: usize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as i64;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { (len + stop).max(0) } else { stop };
    if start > stop || start >= len {
        return None;
    }
    Some((start as usize, stop.min(len - 1) as usize))
}
