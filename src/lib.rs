//! # skiff
//!
//! An in-memory key-value data engine: typed values per key (strings,
//! hashes, lists, sets, sorted sets, streams), per-key expiry with lazy and
//! active eviction, a table-driven command dispatcher, and a cursor-based
//! keyspace iterator that stays correct while the keyspace mutates underneath
//! it.
//!
//! There is no wire protocol here — construct an [`Engine`], feed it command
//! names and arguments, and get typed [`Reply`] values back:
//!
//! ```no_run
//! use bytes::Bytes;
//! use skiff::{Config, Engine};
//!
//! # async fn demo() -> skiff::EngineResult<()> {
//! let engine = Engine::new(Config::default());
//! let sweeper = engine.start_sweeper();
//!
//! engine.execute("SET", &[Bytes::from("greeting"), Bytes::from("hello")]).await?;
//! let reply = engine.execute("GET", &[Bytes::from("greeting")]).await?;
//! assert_eq!(reply.as_str(), Some("hello"));
//!
//! if let Some(sweeper) = sweeper {
//!     sweeper.shutdown().await;
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod expiry;
pub mod glob;
pub mod reply;
pub mod store;
pub mod types;
pub mod watch;

pub use config::Config;
pub use engine::{Delegate, Engine};
pub use error::{EngineError, EngineResult};
pub use reply::Reply;
