//! Command dispatch: a fixed table of known commands with arity ranges,
//! checked before any handler runs, then per-family handler modules.

pub mod hash;
pub mod key;
pub mod list;
pub mod set;
pub mod sorted_set;
pub mod stream;
pub mod string;

use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::watch::SharedWatcher;
use bytes::Bytes;
use tracing::trace;

/// One row of the command table.
#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    /// Inclusive bounds on the argument count, command name excluded.
    /// `max_args` of None means unbounded (variadic).
    pub min_args: usize,
    pub max_args: Option<usize>,
}

impl CommandSpec {
    const fn new(name: &'static str, min_args: usize, max_args: Option<usize>) -> Self {
        CommandSpec {
            name,
            min_args,
            max_args,
        }
    }

    fn accepts(&self, argc: usize) -> bool {
        argc >= self.min_args && self.max_args.is_none_or(|max| argc <= max)
    }
}

/// Every command this engine implements. Handlers may impose further shape
/// requirements (e.g. HSET's field/value pairing) on top of these bounds.
static COMMANDS: &[CommandSpec] = &[
    // Strings
    CommandSpec::new("SET", 2, Some(2)),
    CommandSpec::new("GET", 1, Some(1)),
    CommandSpec::new("MGET", 1, None),
    CommandSpec::new("INCR", 1, Some(2)),
    CommandSpec::new("DECR", 1, Some(2)),
    CommandSpec::new("APPEND", 2, Some(2)),
    CommandSpec::new("STRLEN", 1, Some(1)),
    // Keys
    CommandSpec::new("DEL", 1, None),
    CommandSpec::new("EXISTS", 1, None),
    CommandSpec::new("TYPE", 1, Some(1)),
    CommandSpec::new("EXPIRE", 2, Some(2)),
    CommandSpec::new("TTL", 1, Some(1)),
    CommandSpec::new("PERSIST", 1, Some(1)),
    CommandSpec::new("KEYS", 1, Some(1)),
    CommandSpec::new("SCAN", 1, Some(5)),
    CommandSpec::new("DBSIZE", 0, Some(0)),
    CommandSpec::new("FLUSHALL", 0, Some(0)),
    // Hashes
    CommandSpec::new("HSET", 3, None),
    CommandSpec::new("HGET", 2, Some(2)),
    CommandSpec::new("HMGET", 2, None),
    CommandSpec::new("HGETALL", 1, Some(1)),
    CommandSpec::new("HDEL", 2, None),
    CommandSpec::new("HLEN", 1, Some(1)),
    // Lists
    CommandSpec::new("LPUSH", 2, None),
    CommandSpec::new("RPUSH", 2, None),
    CommandSpec::new("LPOP", 1, Some(2)),
    CommandSpec::new("RPOP", 1, Some(2)),
    CommandSpec::new("LRANGE", 3, Some(3)),
    CommandSpec::new("LLEN", 1, Some(1)),
    // Sets
    CommandSpec::new("SADD", 2, None),
    CommandSpec::new("SREM", 2, None),
    CommandSpec::new("SISMEMBER", 2, Some(2)),
    CommandSpec::new("SMEMBERS", 1, Some(1)),
    CommandSpec::new("SCARD", 1, Some(1)),
    // Sorted sets
    CommandSpec::new("ZADD", 3, None),
    CommandSpec::new("ZSCORE", 2, Some(2)),
    CommandSpec::new("ZCARD", 1, Some(1)),
    CommandSpec::new("ZRANGE", 3, Some(4)),
    // Streams
    CommandSpec::new("XADD", 4, None),
    CommandSpec::new("XLEN", 1, Some(1)),
    CommandSpec::new("XRANGE", 3, Some(5)),
    CommandSpec::new("XREAD", 3, None),
];

pub fn lookup(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|spec| spec.name == name)
}

/// Execute one command against the shared keyspace. `name` is matched
/// case-insensitively; arity is validated here so handlers can assume their
/// minimum shape.
pub async fn dispatch(
    name: &str,
    args: &[Bytes],
    store: &SharedKeyspace,
    watcher: &SharedWatcher,
    config: &Config,
) -> EngineResult<Reply> {
    let upper = name.to_uppercase();
    let spec = lookup(&upper).ok_or_else(|| EngineError::UnknownCommand(name.to_string()))?;
    if !spec.accepts(args.len()) {
        return Err(EngineError::WrongArity(spec.name.to_lowercase()));
    }
    trace!(command = spec.name, argc = args.len(), "dispatch");

    match spec.name {
        "SET" => string::set(args, store).await,
        "GET" => string::get(args, store).await,
        "MGET" => string::mget(args, store).await,
        "INCR" => string::incr(args, store, 1).await,
        "DECR" => string::incr(args, store, -1).await,
        "APPEND" => string::append(args, store).await,
        "STRLEN" => string::strlen(args, store).await,

        "DEL" => key::del(args, store).await,
        "EXISTS" => key::exists(args, store).await,
        "TYPE" => key::type_cmd(args, store).await,
        "EXPIRE" => key::expire(args, store).await,
        "TTL" => key::ttl(args, store).await,
        "PERSIST" => key::persist(args, store).await,
        "KEYS" => key::keys(args, store).await,
        "SCAN" => key::scan(args, store, config).await,
        "DBSIZE" => key::dbsize(store).await,
        "FLUSHALL" => key::flushall(store).await,

        "HSET" => hash::hset(args, store).await,
        "HGET" => hash::hget(args, store).await,
        "HMGET" => hash::hmget(args, store).await,
        "HGETALL" => hash::hgetall(args, store).await,
        "HDEL" => hash::hdel(args, store).await,
        "HLEN" => hash::hlen(args, store).await,

        "LPUSH" => list::push(args, store, crate::types::list::End::Head).await,
        "RPUSH" => list::push(args, store, crate::types::list::End::Tail).await,
        "LPOP" => list::pop(args, store, crate::types::list::End::Head).await,
        "RPOP" => list::pop(args, store, crate::types::list::End::Tail).await,
        "LRANGE" => list::lrange(args, store).await,
        "LLEN" => list::llen(args, store).await,

        "SADD" => set::sadd(args, store).await,
        "SREM" => set::srem(args, store).await,
        "SISMEMBER" => set::sismember(args, store).await,
        "SMEMBERS" => set::smembers(args, store).await,
        "SCARD" => set::scard(args, store).await,

        "ZADD" => sorted_set::zadd(args, store).await,
        "ZSCORE" => sorted_set::zscore(args, store).await,
        "ZCARD" => sorted_set::zcard(args, store).await,
        "ZRANGE" => sorted_set::zrange(args, store).await,

        "XADD" => stream::xadd(args, store, watcher).await,
        "XLEN" => stream::xlen(args, store).await,
        "XRANGE" => stream::xrange(args, store).await,
        "XREAD" => stream::xread(args, store, watcher).await,

        _ => unreachable!("command in table without a handler arm"),
    }
}

/// Decode an argument as UTF-8 (keys, fields, option words).
pub(crate) fn arg_str(arg: &Bytes) -> EngineResult<&str> {
    std::str::from_utf8(arg).map_err(|_| EngineError::SyntaxError)
}

/// Decode an argument as a signed integer.
pub(crate) fn arg_i64(arg: &Bytes) -> EngineResult<i64> {
    arg_str(arg)?
        .parse()
        .map_err(|_| EngineError::NotAnInteger)
}

/// Decode an argument as a float score.
pub(crate) fn arg_f64(arg: &Bytes) -> EngineResult<f64> {
    let s = arg_str(arg).map_err(|_| EngineError::NotAFloat)?;
    let v: f64 = s.parse().map_err(|_| EngineError::NotAFloat)?;
    if v.is_nan() {
        return Err(EngineError::NotAFloat);
    }
    Ok(v)
}

/// Render a score the way the server does: integral scores without a
/// trailing fraction.
pub(crate) fn format_score(score: f64) -> String {
    if score == score.trunc() && score.abs() < 1e17 {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}
