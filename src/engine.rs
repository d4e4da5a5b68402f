use crate::command;
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::expiry::{self, SweeperHandle};
use crate::reply::Reply;
use crate::store::{Keyspace, SharedKeyspace};
use crate::watch::{KeyWatcher, SharedWatcher};
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::RwLock;

/// External collaborator for command families this engine does not
/// implement (search, JSON documents, server-side functions). The engine
/// forwards the raw command and arguments and relays the result untouched.
pub trait Delegate: Send + Sync {
    fn call(&self, name: &str, args: &[Bytes]) -> EngineResult<Reply>;
}

/// Process-scoped engine instance: the shared keyspace, the blocking-read
/// watcher, and configuration, wired together explicitly at startup.
pub struct Engine {
    store: SharedKeyspace,
    watcher: SharedWatcher,
    config: Config,
    delegate: Option<Arc<dyn Delegate>>,
}

impl Engine {
    pub fn new(config: Config) -> Self {
        Engine {
            store: Arc::new(RwLock::new(Keyspace::new())),
            watcher: Arc::new(RwLock::new(KeyWatcher::new())),
            config,
            delegate: None,
        }
    }

    /// Install the pass-through collaborator for namespaced commands.
    pub fn with_delegate(mut self, delegate: Arc<dyn Delegate>) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Direct access to the keyspace, for callers that want the typed API
    /// without going through command dispatch.
    pub fn store(&self) -> &SharedKeyspace {
        &self.store
    }

    /// Execute one command. Dotted command names (`FT.SEARCH`, `JSON.GET`,
    /// ...) and the server-function family go to the delegate if one is
    /// installed; everything else resolves through the command table.
    pub async fn execute(&self, name: &str, args: &[Bytes]) -> EngineResult<Reply> {
        if is_delegated(name) {
            return match &self.delegate {
                Some(delegate) => delegate.call(name, args),
                None => Err(EngineError::UnknownCommand(name.to_string())),
            };
        }
        command::dispatch(name, args, &self.store, &self.watcher, &self.config).await
    }

    /// Spawn the active-expiry sweeper. Returns None when disabled by
    /// configuration (lazy expiry still applies on every access).
    pub fn start_sweeper(&self) -> Option<SweeperHandle> {
        if !self.config.active_expire_enabled {
            return None;
        }
        Some(expiry::spawn_sweeper(self.store.clone(), &self.config))
    }
}

/// Command families handled by an external collaborator, addressed by the
/// module-prefix convention (`FT.`, `JSON.`, ...) plus the function-execution
/// commands that have no dot in their names.
fn is_delegated(name: &str) -> bool {
    name.contains('.')
        || name.eq_ignore_ascii_case("TFUNCTION")
        || name.eq_ignore_ascii_case("TFCALL")
        || name.eq_ignore_ascii_case("TFCALL_ASYNC")
}
