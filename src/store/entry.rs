use crate::types::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// A keyspace slot: the value plus its expiry metadata.
#[derive(Debug, Clone)]
pub struct Entry {
    pub value: Value,
    /// Absolute expiry as milliseconds since the UNIX epoch. None = persistent.
    pub expires_at: Option<u64>,
}

impl Entry {
    pub fn new(value: Value) -> Self {
        Entry {
            value,
            expires_at: None,
        }
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at.is_some_and(|deadline| now_ms >= deadline)
    }

    /// Remaining time-to-live in whole seconds (rounded to nearest),
    /// -1 for persistent entries, -2 for already-expired ones.
    pub fn ttl_seconds(&self, now_ms: u64) -> i64 {
        match self.expires_at {
            None => -1,
            Some(deadline) if now_ms >= deadline => -2,
            Some(deadline) => ((deadline - now_ms).saturating_add(500) / 1000) as i64,
        }
    }
}

/// Current time in milliseconds since the UNIX epoch.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::string::Str;

    fn entry() -> Entry {
        Entry::new(Value::String(Str::new(b"v".to_vec())))
    }

    #[test]
    fn ttl_sentinels() {
        let mut e = entry();
        assert_eq!(e.ttl_seconds(1_000), -1);
        e.expires_at = Some(5_000);
        assert_eq!(e.ttl_seconds(1_000), 4);
        assert_eq!(e.ttl_seconds(5_000), -2);
        assert!(e.is_expired(5_000));
        assert!(!e.is_expired(4_999));
    }

    #[test]
    fn ttl_at_maximum_deadline_does_not_overflow() {
        let mut e = entry();
        e.expires_at = Some(u64::MAX);
        assert!(e.ttl_seconds(1_000) > 0);
        assert!(!e.is_expired(1_000));
    }
}
