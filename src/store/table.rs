//! Bucket-array hash table with a resumable, reverse-binary scan cursor.
//!
//! The table is an arena of buckets addressed by index: a power-of-two `Vec`
//! of chains. SCAN walks bucket indices in reverse-binary-increment order
//! (highest bit bumps first), and growth rehashes bucket `i` into `i` and
//! `i + old_len` only. Together those two facts give the SCAN contract its
//! guarantee: a key present for the whole scan is visited at least once even
//! if the table doubles between calls; keys added or removed mid-scan may or
//! may not appear. The cursor is opaque to callers; 0 means a full cycle is
//! complete.

use super::entry::Entry;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

const INITIAL_BUCKETS: usize = 16;

/// The single place a hash function appears. Everything else addresses
/// buckets purely by index.
fn hash64(key: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(key.as_bytes());
    hasher.finish()
}

#[derive(Debug)]
pub struct Table {
    buckets: Vec<Vec<(String, Entry)>>,
    len: usize,
}

impl Table {
    pub fn new() -> Self {
        Table {
            buckets: (0..INITIAL_BUCKETS).map(|_| Vec::new()).collect(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn mask(&self) -> u64 {
        (self.buckets.len() - 1) as u64
    }

    fn bucket_of(&self, key: &str) -> usize {
        (hash64(key) & self.mask()) as usize
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let idx = self.bucket_of(key);
        self.buckets[idx]
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    /// Insert or replace. Returns the previous entry, if any.
    pub fn insert(&mut self, key: String, entry: Entry) -> Option<Entry> {
        let idx = self.bucket_of(&key);
        if let Some(slot) = self.buckets[idx].iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut slot.1, entry));
        }
        self.buckets[idx].push((key, entry));
        self.len += 1;
        if self.len > self.buckets.len() {
            self.grow();
        }
        None
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let idx = self.bucket_of(key);
        let pos = self.buckets[idx].iter().position(|(k, _)| k == key)?;
        let (_, entry) = self.buckets[idx].swap_remove(pos);
        self.len -= 1;
        Some(entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.buckets.iter().flatten().map(|(k, e)| (k, e))
    }

    /// Double the bucket array. Each old bucket splits between index `i` and
    /// `i + old_len` (only the new top hash bit differs), which is what keeps
    /// in-flight scan cursors valid across the resize.
    fn grow(&mut self) {
        let old_len = self.buckets.len();
        self.buckets.resize_with(old_len * 2, Vec::new);
        for i in 0..old_len {
            let chain = std::mem::take(&mut self.buckets[i]);
            for (key, entry) in chain {
                let idx = (hash64(&key) & self.mask()) as usize;
                self.buckets[idx].push((key, entry));
            }
        }
    }

    /// Visit up to `budget` buckets starting at `cursor`, calling `visit` for
    /// every entry in each. Returns the cursor to resume from; 0 means the
    /// cycle is complete. Bits above the current mask are ignored, so a
    /// cursor taken before a resize remains usable after it.
    pub fn scan<F>(&self, cursor: u64, budget: usize, mut visit: F) -> u64
    where
        F: FnMut(&str, &Entry),
    {
        if self.len == 0 {
            return 0;
        }
        let mask = self.mask();
        let mut cursor = cursor;
        let mut visited = 0usize;
        loop {
            for (key, entry) in &self.buckets[(cursor & mask) as usize] {
                visit(key, entry);
            }
            cursor = next_cursor(cursor, mask);
            visited += 1;
            if cursor == 0 || visited >= budget.max(1) {
                return cursor;
            }
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

/// Reverse-binary increment: force the bits above the mask to one, then add
/// one to the bit-reversed cursor. The carry ripples from the high end of the
/// masked range downward, so growing tables are revisited in split order.
fn next_cursor(cursor: u64, mask: u64) -> u64 {
    let mut v = cursor | !mask;
    v = v.reverse_bits();
    v = v.wrapping_add(1);
    v.reverse_bits()
}
