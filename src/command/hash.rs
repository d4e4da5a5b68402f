use crate::command::arg_str;
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::types::Value;
use crate::types::hash::Hash;
use bytes::Bytes;

/// HSET key field value [field value ...] — returns the number of fields
/// that were newly created.
pub async fn hset(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let pairs = &args[1..];
    if pairs.len() % 2 != 0 {
        return Err(EngineError::WrongArity("hset".to_string()));
    }

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::Hash(Hash::new()));
    let h = entry.value.as_hash_mut().ok_or(EngineError::WrongType)?;
    let mut created = 0;
    for pair in pairs.chunks(2) {
        let field = arg_str(&pair[0])?.to_string();
        if h.set(field, pair[1].to_vec()) {
            created += 1;
        }
    }
    Ok(Reply::Integer(created))
}

/// HGET key field
pub async fn hget(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let field = arg_str(&args[1])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let h = entry.value.as_hash().ok_or(EngineError::WrongType)?;
            Ok(h.get(field).map(|v| Reply::bulk(v.clone())).unwrap_or(Reply::Nil))
        }
        None => Ok(Reply::Nil),
    }
}

/// HMGET key field [field ...] — missing fields come back Nil positionally.
pub async fn hmget(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    let hash = match store.get(key) {
        Some(entry) => Some(entry.value.as_hash().ok_or(EngineError::WrongType)?),
        None => None,
    };
    let mut out = Vec::with_capacity(args.len() - 1);
    for arg in &args[1..] {
        let reply = match (hash, arg_str(arg)) {
            (Some(h), Ok(field)) => h.get(field).map(|v| Reply::bulk(v.clone())).unwrap_or(Reply::Nil),
            _ => Reply::Nil,
        };
        out.push(reply);
    }
    Ok(Reply::array(out))
}

/// HGETALL key — flat [field, value, field, value, ...] array.
pub async fn hgetall(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let h = entry.value.as_hash().ok_or(EngineError::WrongType)?;
            let mut out = Vec::with_capacity(h.len() * 2);
            for (field, value) in h.iter() {
                out.push(Reply::bulk(field.as_bytes()));
                out.push(Reply::bulk(value.clone()));
            }
            Ok(Reply::array(out))
        }
        None => Ok(Reply::array(vec![])),
    }
}

/// HDEL key field [field ...] — deletes the key once its last field goes.
pub async fn hdel(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    let Some(entry) = store.get_mut(key) else {
        return Ok(Reply::Integer(0));
    };
    let h = entry.value.as_hash_mut().ok_or(EngineError::WrongType)?;
    let mut removed = 0;
    for arg in &args[1..] {
        if let Ok(field) = arg_str(arg)
            && h.remove(field)
        {
            removed += 1;
        }
    }
    if h.is_empty() {
        store.remove(key);
    }
    Ok(Reply::Integer(removed))
}

/// HLEN key
pub async fn hlen(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let h = entry.value.as_hash().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(h.len() as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}
