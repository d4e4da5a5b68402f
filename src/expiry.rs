//! Active expiry: a background task that amortizes removal of expired keys
//! nobody reads. Lazy expiry in the store keeps results correct regardless;
//! this sweep only reclaims memory.

use crate::config::Config;
use crate::store::SharedKeyspace;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Handle to the running sweeper. Dropping it does not stop the task;
/// call [`SweeperHandle::shutdown`] at process teardown.
#[derive(Debug)]
pub struct SweeperHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Cancel the sweep loop and wait for it to finish its current batch.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}

/// Spawn the periodic sweep task. Each tick takes the store lock for one
/// bounded batch only, then sleeps, so foreground commands are never starved.
pub fn spawn_sweeper(store: SharedKeyspace, config: &Config) -> SweeperHandle {
    let token = CancellationToken::new();
    let loop_token = token.clone();
    let interval = Duration::from_millis(1000 / config.hz.max(1));
    let batch = config.active_expire_batch.max(1);

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = loop_token.cancelled() => return,
            }
            let evicted = {
                let mut store = store.write().await;
                store.active_expire_cycle(batch)
            };
            if evicted > 0 {
                debug!(evicted, "active expiry cycle");
            }
        }
    });

    SweeperHandle { token, task }
}
