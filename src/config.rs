/// Engine tuning knobs. Constructed once and handed to [`Engine`](crate::Engine).
#[derive(Debug, Clone)]
pub struct Config {
    /// Active-expiry sweep frequency: one bounded cycle every `1000 / hz` ms.
    pub hz: u64,
    /// Buckets visited per active-expiry cycle.
    pub active_expire_batch: usize,
    /// Whether the background sweeper runs at all (lazy expiry always does).
    pub active_expire_enabled: bool,
    /// Default SCAN COUNT hint when the caller gives none.
    pub scan_default_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hz: 10,
            active_expire_batch: 20,
            active_expire_enabled: true,
            scan_default_count: 10,
        }
    }
}
