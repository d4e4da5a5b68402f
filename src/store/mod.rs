pub mod entry;
pub mod table;

use crate::glob::glob_match;
use crate::types::Value;
use entry::{Entry, now_millis};
use std::sync::Arc;
use table::Table;
use tokio::sync::RwLock;

/// The keyspace: one flat namespace of key -> typed value, with per-key
/// expiry. Every access path runs lazy expiry first, so an entry past its
/// deadline is indistinguishable from an absent one even before the active
/// sweeper physically removes it.
#[derive(Debug, Default)]
pub struct Keyspace {
    table: Table,
    /// Resume point for the active-expiry sweep, so successive bounded
    /// cycles cover the whole table instead of rescanning the front.
    sweep_cursor: u64,
}

impl Keyspace {
    pub fn new() -> Self {
        Keyspace::default()
    }

    /// Number of keys physically present (expired-but-unswept included).
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Read a key, lazily deleting it if its deadline has passed.
    pub fn get(&mut self, key: &str) -> Option<&Entry> {
        self.evict_if_expired(key);
        self.table.get(key)
    }

    /// Mutable read, with the same lazy-expiry pass.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.evict_if_expired(key);
        self.table.get_mut(key)
    }

    /// Wholesale write: replaces any existing value regardless of variant and
    /// clears any prior expiry.
    pub fn set(&mut self, key: String, value: Value) {
        self.table.insert(key, Entry::new(value));
    }

    /// In-place typed update on an existing key, or creation via `make` when
    /// the key is absent. Preserves an existing expiry.
    pub fn entry_or_insert_with(&mut self, key: &str, make: impl FnOnce() -> Value) -> &mut Entry {
        self.evict_if_expired(key);
        if self.table.get(key).is_none() {
            self.table.insert(key.to_string(), Entry::new(make()));
        }
        self.table.get_mut(key).expect("entry just ensured")
    }

    /// Delete a key outright. Returns true if it existed (and had not
    /// already expired).
    pub fn remove(&mut self, key: &str) -> bool {
        self.evict_if_expired(key);
        self.table.remove(key).is_some()
    }

    pub fn exists(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn type_name(&mut self, key: &str) -> Option<&'static str> {
        self.get(key).map(|e| e.value.type_name())
    }

    /// All live keys matching a glob pattern. Unbounded; prefer `scan` for
    /// large keyspaces.
    pub fn keys(&self, pattern: &[u8]) -> Vec<String> {
        let now = now_millis();
        self.table
            .iter()
            .filter(|(_, e)| !e.is_expired(now))
            .filter(|(k, _)| glob_match(pattern, k.as_bytes()))
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// One bounded SCAN step. `count` tunes how many buckets are visited,
    /// not how many keys come back; a returned cursor of 0 ends the cycle.
    /// Expired keys encountered along the way are removed, not returned.
    pub fn scan(&mut self, cursor: u64, pattern: Option<&[u8]>, count: usize) -> (u64, Vec<String>) {
        let now = now_millis();
        let mut matched = Vec::new();
        let mut dead = Vec::new();
        let next = self.table.scan(cursor, count, |key, entry| {
            if entry.is_expired(now) {
                dead.push(key.to_string());
            } else if pattern.is_none_or(|p| glob_match(p, key.as_bytes())) {
                matched.push(key.to_string());
            }
        });
        for key in dead {
            self.table.remove(&key);
        }
        (next, matched)
    }

    /// Set a relative expiry. A non-positive TTL deletes the key on the
    /// spot. Returns false if the key does not exist.
    pub fn expire(&mut self, key: &str, ttl_seconds: i64) -> bool {
        self.evict_if_expired(key);
        if self.table.get(key).is_none() {
            return false;
        }
        if ttl_seconds <= 0 {
            self.table.remove(key);
            return true;
        }
        // Saturate: a deadline past u64 millis is effectively "never".
        let deadline = now_millis().saturating_add((ttl_seconds as u64).saturating_mul(1000));
        if let Some(entry) = self.table.get_mut(key) {
            entry.expires_at = Some(deadline);
        }
        true
    }

    /// Remaining TTL in seconds: -1 when persistent, -2 when absent.
    pub fn ttl(&mut self, key: &str) -> i64 {
        match self.get(key) {
            Some(entry) => entry.ttl_seconds(now_millis()),
            None => -2,
        }
    }

    /// Clear a key's expiry. Returns true if an expiry was actually removed.
    pub fn persist(&mut self, key: &str) -> bool {
        match self.get_mut(key) {
            Some(entry) if entry.expires_at.is_some() => {
                entry.expires_at = None;
                true
            }
            _ => false,
        }
    }

    /// Drop every key.
    pub fn flush(&mut self) {
        self.table = Table::new();
        self.sweep_cursor = 0;
    }

    /// One bounded pass of active expiry: walk up to `batch` buckets from the
    /// persisted sweep cursor and remove every expired entry found. Returns
    /// the number of keys evicted. A key that vanishes between selection and
    /// deletion is a no-op.
    pub fn active_expire_cycle(&mut self, batch: usize) -> usize {
        let now = now_millis();
        let mut dead = Vec::new();
        self.sweep_cursor = self.table.scan(self.sweep_cursor, batch, |key, entry| {
            if entry.is_expired(now) {
                dead.push(key.to_string());
            }
        });
        let mut evicted = 0;
        for key in dead {
            if self.table.remove(&key).is_some() {
                evicted += 1;
            }
        }
        evicted
    }

    fn evict_if_expired(&mut self, key: &str) {
        let expired = self
            .table
            .get(key)
            .is_some_and(|e| e.is_expired(now_millis()));
        if expired {
            self.table.remove(key);
        }
    }
}

pub type SharedKeyspace = Arc<RwLock<Keyspace>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::string::Str;

    fn string_value(v: &str) -> Value {
        Value::String(Str::new(v.as_bytes().to_vec()))
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        let entry = ks.get("k").expect("key just written");
        assert_eq!(entry.value.as_string().unwrap().as_bytes(), b"v");
    }

    #[test]
    fn overwrite_replaces_variant_and_clears_expiry() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        assert!(ks.expire("k", 100));
        ks.set("k".into(), Value::List(crate::types::list::List::new()));
        assert_eq!(ks.ttl("k"), -1);
        assert_eq!(ks.type_name("k"), Some("list"));
    }

    #[test]
    fn lazy_expiry_hides_past_deadline_keys() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        ks.get_mut("k").unwrap().expires_at = Some(now_millis().saturating_sub(1));
        assert!(ks.get("k").is_none());
        assert_eq!(ks.ttl("k"), -2);
        // Physically gone after the lazy pass, too.
        assert_eq!(ks.len(), 0);
    }

    #[test]
    fn expire_with_non_positive_ttl_deletes() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        assert!(ks.expire("k", 0));
        assert!(!ks.exists("k"));
        assert!(!ks.expire("missing", 10));
    }

    #[test]
    fn expire_with_huge_ttl_saturates_instead_of_wrapping() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        assert!(ks.expire("k", i64::MAX));
        // The deadline clamps to the far future; the key stays live.
        assert!(ks.exists("k"));
        assert!(ks.ttl("k") > 0);
    }

    #[test]
    fn persist_clears_expiry_once() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("v"));
        ks.expire("k", 100);
        assert!(ks.persist("k"));
        assert!(!ks.persist("k"));
        assert_eq!(ks.ttl("k"), -1);
    }

    #[test]
    fn active_cycle_sweeps_expired_keys() {
        let mut ks = Keyspace::new();
        for i in 0..64 {
            ks.set(format!("k{i}"), string_value("v"));
        }
        let past = now_millis().saturating_sub(10);
        for i in 0..32 {
            ks.get_mut(&format!("k{i}")).unwrap().expires_at = Some(past);
        }
        let mut evicted = 0;
        // Bounded batches; a few full cycles cover the table.
        for _ in 0..256 {
            evicted += ks.active_expire_cycle(4);
            if evicted == 32 {
                break;
            }
        }
        assert_eq!(evicted, 32);
        assert_eq!(ks.len(), 32);
    }

    #[test]
    fn in_place_update_preserves_expiry() {
        let mut ks = Keyspace::new();
        ks.set("k".into(), string_value("1"));
        ks.expire("k", 100);
        let entry = ks.entry_or_insert_with("k", || string_value("0"));
        entry.value.as_string_mut().unwrap().incr_by(1);
        assert!(ks.ttl("k") > 0);
    }
}
