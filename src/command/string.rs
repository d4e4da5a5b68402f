use crate::command::{arg_i64, arg_str};
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::types::Value;
use crate::types::string::Str;
use bytes::Bytes;

/// SET key value — full overwrite, any prior variant and TTL are dropped.
pub async fn set(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?.to_string();
    let value = args[1].to_vec();

    let mut store = store.write().await;
    store.set(key, Value::String(Str::new(value)));
    Ok(Reply::Ok)
}

/// GET key
pub async fn get(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => match entry.value.as_string() {
            Some(s) => Ok(Reply::bulk(s.as_bytes())),
            None => Err(EngineError::WrongType),
        },
        None => Ok(Reply::Nil),
    }
}

/// MGET key [key ...] — never fails on a bad key; missing or wrong-typed
/// positions come back Nil.
pub async fn mget(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let mut store = store.write().await;
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        let reply = match arg_str(arg).ok().and_then(|k| store.get(k)) {
            Some(entry) => match entry.value.as_string() {
                Some(s) => Reply::bulk(s.as_bytes()),
                None => Reply::Nil,
            },
            None => Reply::Nil,
        };
        out.push(reply);
    }
    Ok(Reply::array(out))
}

/// INCR key [delta] (DECR negates the sign). An absent key starts from 0.
pub async fn incr(args: &[Bytes], store: &SharedKeyspace, sign: i64) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let delta = match args.get(1) {
        Some(arg) => arg_i64(arg)?,
        None => 1,
    };
    let delta = delta.checked_mul(sign).ok_or(EngineError::NotAnInteger)?;

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::String(Str::from_i64(0)));
    let s = entry.value.as_string_mut().ok_or(EngineError::WrongType)?;
    let next = s.incr_by(delta).ok_or(EngineError::NotAnInteger)?;
    Ok(Reply::Integer(next))
}

/// APPEND key value — creates the key when absent; returns the new length.
pub async fn append(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let suffix = args[1].clone();

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::String(Str::default()));
    let s = entry.value.as_string_mut().ok_or(EngineError::WrongType)?;
    Ok(Reply::Integer(s.append(&suffix) as i64))
}

/// STRLEN key
pub async fn strlen(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => match entry.value.as_string() {
            Some(s) => Ok(Reply::Integer(s.len() as i64)),
            None => Err(EngineError::WrongType),
        },
        None => Ok(Reply::Integer(0)),
    }
}
