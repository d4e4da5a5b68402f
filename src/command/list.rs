use crate::command::{arg_i64, arg_str};
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::types::Value;
use crate::types::list::{End, List};
use bytes::Bytes;

/// LPUSH / RPUSH key element [element ...] — returns the new length.
pub async fn push(args: &[Bytes], store: &SharedKeyspace, end: End) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::List(List::new()));
    let l = entry.value.as_list_mut().ok_or(EngineError::WrongType)?;
    for element in &args[1..] {
        l.push(end, element.to_vec());
    }
    Ok(Reply::Integer(l.len() as i64))
}

/// LPOP / RPOP key [count]. Without a count: one element or Nil. With a
/// count: an array of up to `count` elements (asking past the length drains
/// the list without error). A list emptied by the pop is deleted.
pub async fn pop(args: &[Bytes], store: &SharedKeyspace, end: End) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let count = match args.get(1) {
        Some(arg) => {
            let n = arg_i64(arg)?;
            if n < 0 {
                return Err(EngineError::NotAnInteger);
            }
            Some(n as usize)
        }
        None => None,
    };

    let mut store = store.write().await;
    let Some(entry) = store.get_mut(key) else {
        return Ok(Reply::Nil);
    };
    let l = entry.value.as_list_mut().ok_or(EngineError::WrongType)?;
    let popped = l.pop(end, count.unwrap_or(1));
    if l.is_empty() {
        store.remove(key);
    }

    Ok(match count {
        None => popped.into_iter().next().map(Reply::Bulk).unwrap_or(Reply::Nil),
        Some(_) => Reply::array(popped.into_iter().map(Reply::Bulk).collect()),
    })
}

/// LRANGE key start stop — inclusive bounds, negative offsets from the tail.
pub async fn lrange(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let start = arg_i64(&args[1])?;
    let stop = arg_i64(&args[2])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let l = entry.value.as_list().ok_or(EngineError::WrongType)?;
            Ok(Reply::array(
                l.range(start, stop)
                    .into_iter()
                    .map(|e| Reply::bulk(e.clone()))
                    .collect(),
            ))
        }
        None => Ok(Reply::array(vec![])),
    }
}

/// LLEN key
pub async fn llen(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let l = entry.value.as_list().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(l.len() as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}
