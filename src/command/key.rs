use crate::command::{arg_i64, arg_str};
use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use bytes::Bytes;

/// DEL key [key ...] — each key is checked and removed independently;
/// returns how many existed.
pub async fn del(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let mut store = store.write().await;
    let mut removed = 0;
    for arg in args {
        if let Ok(key) = arg_str(arg)
            && store.remove(key)
        {
            removed += 1;
        }
    }
    Ok(Reply::Integer(removed))
}

/// EXISTS key [key ...] — counts keys that exist (a repeated key counts
/// every time it appears).
pub async fn exists(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let mut store = store.write().await;
    let mut found = 0;
    for arg in args {
        if let Ok(key) = arg_str(arg)
            && store.exists(key)
        {
            found += 1;
        }
    }
    Ok(Reply::Integer(found))
}

/// TYPE key — "none" for absent keys.
pub async fn type_cmd(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let mut store = store.write().await;
    let name = store.type_name(key).unwrap_or("none");
    Ok(Reply::bulk(name.as_bytes()))
}

/// EXPIRE key seconds — 1 if the deadline was set (or the key deleted for a
/// non-positive TTL), 0 if the key does not exist.
pub async fn expire(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let seconds = arg_i64(&args[1])?;
    let mut store = store.write().await;
    Ok(Reply::Integer(store.expire(key, seconds) as i64))
}

/// TTL key
pub async fn ttl(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let mut store = store.write().await;
    Ok(Reply::Integer(store.ttl(key)))
}

/// PERSIST key — 1 only if an expiry was actually cleared.
pub async fn persist(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let mut store = store.write().await;
    Ok(Reply::Integer(store.persist(key) as i64))
}

/// KEYS pattern — full keyspace walk, glob applied to raw key bytes.
pub async fn keys(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let store = store.read().await;
    let matched = store.keys(&args[0]);
    Ok(Reply::array(
        matched.into_iter().map(Reply::bulk).collect(),
    ))
}

/// SCAN cursor [MATCH pattern] [COUNT n]
pub async fn scan(args: &[Bytes], store: &SharedKeyspace, config: &Config) -> EngineResult<Reply> {
    let cursor: u64 = arg_str(&args[0])?
        .parse()
        .map_err(|_| EngineError::InvalidCursor)?;

    let mut pattern: Option<Bytes> = None;
    let mut count = config.scan_default_count;
    let mut i = 1;
    while i < args.len() {
        let opt = arg_str(&args[i])?;
        if opt.eq_ignore_ascii_case("MATCH") {
            pattern = Some(args.get(i + 1).ok_or(EngineError::SyntaxError)?.clone());
            i += 2;
        } else if opt.eq_ignore_ascii_case("COUNT") {
            let n = arg_i64(args.get(i + 1).ok_or(EngineError::SyntaxError)?)?;
            if n < 1 {
                return Err(EngineError::SyntaxError);
            }
            count = n as usize;
            i += 2;
        } else {
            return Err(EngineError::SyntaxError);
        }
    }

    let mut store = store.write().await;
    let (next, keys) = store.scan(cursor, pattern.as_deref(), count);
    Ok(Reply::array(vec![
        Reply::bulk(next.to_string()),
        Reply::array(keys.into_iter().map(Reply::bulk).collect()),
    ]))
}

/// DBSIZE
pub async fn dbsize(store: &SharedKeyspace) -> EngineResult<Reply> {
    let store = store.read().await;
    Ok(Reply::Integer(store.len() as i64))
}

/// FLUSHALL — wholesale keyspace reset.
pub async fn flushall(store: &SharedKeyspace) -> EngineResult<Reply> {
    let mut store = store.write().await;
    store.flush();
    Ok(Reply::Ok)
}
