use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

/// Registry of tasks waiting for an append on specific keys.
/// A blocked stream read registers one Notify across all the keys it watches;
/// the first append to any of them wakes it.
#[derive(Debug, Default)]
pub struct KeyWatcher {
    waiters: HashMap<String, Vec<Arc<Notify>>>,
}

impl KeyWatcher {
    pub fn new() -> Self {
        KeyWatcher::default()
    }

    /// Register one shared Notify handle under every key in `keys`.
    pub fn register(&mut self, keys: &[String]) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        for key in keys {
            self.waiters
                .entry(key.clone())
                .or_default()
                .push(notify.clone());
        }
        notify
    }

    /// Wake everything blocked on `key`. Returns how many waiters fired.
    pub fn notify(&mut self, key: &str) -> usize {
        match self.waiters.remove(key) {
            Some(list) => {
                let n = list.len();
                for waiter in list {
                    waiter.notify_one();
                }
                n
            }
            None => 0,
        }
    }

    /// Drop one waiter from every key it was registered under (timeout or
    /// satisfied read).
    pub fn unregister(&mut self, keys: &[String], notify: &Arc<Notify>) {
        for key in keys {
            if let Some(list) = self.waiters.get_mut(key) {
                list.retain(|w| !Arc::ptr_eq(w, notify));
                if list.is_empty() {
                    self.waiters.remove(key);
                }
            }
        }
    }
}

pub type SharedWatcher = Arc<RwLock<KeyWatcher>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn notify_wakes_registered_waiter() {
        let mut w = KeyWatcher::new();
        let keys = vec!["a".to_string(), "b".to_string()];
        let notify = w.register(&keys);
        assert_eq!(w.notify("b"), 1);
        // Permit was stored; this resolves immediately.
        notify.notified().await;
        assert_eq!(w.notify("b"), 0);
    }

    #[test]
    fn unregister_removes_from_all_keys() {
        let mut w = KeyWatcher::new();
        let keys = vec!["a".to_string(), "b".to_string()];
        let notify = w.register(&keys);
        w.unregister(&keys, &notify);
        assert_eq!(w.notify("a"), 0);
        assert_eq!(w.notify("b"), 0);
    }
}
