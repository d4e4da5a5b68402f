use crate::command::arg_str;
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::types::Value;
use crate::types::set::Set;
use bytes::Bytes;

/// SADD key member [member ...] — returns how many members were new.
pub async fn sadd(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::Set(Set::new()));
    let s = entry.value.as_set_mut().ok_or(EngineError::WrongType)?;
    let mut added = 0;
    for member in &args[1..] {
        if s.add(member.to_vec()) {
            added += 1;
        }
    }
    Ok(Reply::Integer(added))
}

/// SREM key member [member ...] — deletes the key once the set empties.
pub async fn srem(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    let Some(entry) = store.get_mut(key) else {
        return Ok(Reply::Integer(0));
    };
    let s = entry.value.as_set_mut().ok_or(EngineError::WrongType)?;
    let mut removed = 0;
    for member in &args[1..] {
        if s.remove(member) {
            removed += 1;
        }
    }
    if s.is_empty() {
        store.remove(key);
    }
    Ok(Reply::Integer(removed))
}

/// SISMEMBER key member
pub async fn sismember(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let s = entry.value.as_set().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(s.contains(&args[1]) as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}

/// SMEMBERS key — no defined order.
pub async fn smembers(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let s = entry.value.as_set().ok_or(EngineError::WrongType)?;
            Ok(Reply::array(
                s.iter().map(|m| Reply::bulk(m.clone())).collect(),
            ))
        }
        None => Ok(Reply::array(vec![])),
    }
}

/// SCARD key
pub async fn scard(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let s = entry.value.as_set().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(s.len() as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}
