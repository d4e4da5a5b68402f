use crate::command::{arg_i64, arg_str};
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::store::entry::now_millis;
use crate::types::Value;
use crate::types::stream::{Stream, StreamId, StreamRecord};
use crate::watch::SharedWatcher;
use bytes::Bytes;
use std::time::Duration;

fn record_from_pairs(pairs: &[Bytes]) -> StreamRecord {
    pairs
        .chunks(2)
        .map(|pair| (pair[0].to_vec(), pair[1].to_vec()))
        .collect()
}

/// Render one entry as [id, [field, value, ...]].
fn entry_reply(id: StreamId, record: &StreamRecord) -> Reply {
    let mut fields = Vec::with_capacity(record.len() * 2);
    for (f, v) in record {
        fields.push(Reply::bulk(f.clone()));
        fields.push(Reply::bulk(v.clone()));
    }
    Reply::array(vec![Reply::bulk(id.to_string()), Reply::array(fields)])
}

/// XADD key id|* field value [field value ...] — returns the assigned ID.
/// An explicit ID must be strictly greater than the stream's last one.
pub async fn xadd(args: &[Bytes], store: &SharedKeyspace, watcher: &SharedWatcher) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?.to_string();
    let id_arg = arg_str(&args[1])?.to_string();
    let pairs = &args[2..];
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return Err(EngineError::WrongArity("xadd".to_string()));
    }
    let record = record_from_pairs(pairs);

    let assigned = {
        let mut store = store.write().await;
        let entry = store.entry_or_insert_with(&key, || Value::Stream(Stream::new()));
        let s = entry.value.as_stream_mut().ok_or(EngineError::WrongType)?;
        if id_arg == "*" {
            s.append_auto(now_millis(), record)
        } else {
            let id = StreamId::parse(&id_arg, 0).ok_or_else(|| {
                EngineError::Generic("Invalid stream ID specified as stream command argument".to_string())
            })?;
            s.append_explicit(id, record).ok_or(EngineError::InvalidId)?
        }
    };

    // Wake blocked readers only after the critical section is released.
    watcher.write().await.notify(&key);
    Ok(Reply::bulk(assigned.to_string()))
}

/// XLEN key
pub async fn xlen(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let s = entry.value.as_stream().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(s.len() as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}

/// XRANGE key start end [COUNT n] — inclusive ID range; `-` and `+` are the
/// open bounds, a bare millisecond covers its whole sequence space.
pub async fn xrange(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let start = parse_bound(arg_str(&args[1])?, true)?;
    let end = parse_bound(arg_str(&args[2])?, false)?;
    let count = match args.get(3) {
        Some(arg) => {
            if !arg_str(arg)?.eq_ignore_ascii_case("COUNT") {
                return Err(EngineError::SyntaxError);
            }
            let n = arg_i64(args.get(4).ok_or(EngineError::SyntaxError)?)?;
            if n < 0 {
                return Err(EngineError::SyntaxError);
            }
            Some(n as usize)
        }
        None => None,
    };

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let s = entry.value.as_stream().ok_or(EngineError::WrongType)?;
            let entries = s.range(start, end);
            let take = count.unwrap_or(entries.len());
            Ok(Reply::array(
                entries
                    .into_iter()
                    .take(take)
                    .map(|(id, rec)| entry_reply(id, rec))
                    .collect(),
            ))
        }
        None => Ok(Reply::array(vec![])),
    }
}

fn parse_bound(s: &str, is_start: bool) -> EngineResult<StreamId> {
    match s {
        "-" => Ok(StreamId::MIN),
        "+" => Ok(StreamId::MAX),
        other => StreamId::parse(other, if is_start { 0 } else { u64::MAX }).ok_or_else(|| {
            EngineError::Generic("Invalid stream ID specified as stream command argument".to_string())
        }),
    }
}

/// XREAD [COUNT n] [BLOCK ms] STREAMS key [key ...] id [id ...]
///
/// Returns entries with IDs strictly greater than each supplied ID. With
/// BLOCK and no data, the calling task suspends until an append lands on one
/// of the keys or the timeout passes (0 = wait indefinitely); only this
/// request path waits, never the store.
pub async fn xread(args: &[Bytes], store: &SharedKeyspace, watcher: &SharedWatcher) -> EngineResult<Reply> {
    let mut count: Option<usize> = None;
    let mut block_ms: Option<u64> = None;
    let mut i = 0;
    let streams_at = loop {
        let word = arg_str(args.get(i).ok_or(EngineError::SyntaxError)?)?;
        if word.eq_ignore_ascii_case("COUNT") {
            let n = arg_i64(args.get(i + 1).ok_or(EngineError::SyntaxError)?)?;
            // COUNT 0 means unlimited, same as leaving it off.
            count = if n > 0 { Some(n as usize) } else { None };
            i += 2;
        } else if word.eq_ignore_ascii_case("BLOCK") {
            let ms = arg_i64(args.get(i + 1).ok_or(EngineError::SyntaxError)?)?;
            if ms < 0 {
                return Err(EngineError::Generic("timeout is negative".to_string()));
            }
            block_ms = Some(ms as u64);
            i += 2;
        } else if word.eq_ignore_ascii_case("STREAMS") {
            break i + 1;
        } else {
            return Err(EngineError::SyntaxError);
        }
    };

    let rest = &args[streams_at..];
    if rest.is_empty() || rest.len() % 2 != 0 {
        return Err(EngineError::Generic(
            "Unbalanced XREAD list of streams: for each stream key an ID or '$' must be specified"
                .to_string(),
        ));
    }
    let n = rest.len() / 2;
    let keys: Vec<String> = rest[..n]
        .iter()
        .map(|k| arg_str(k).map(str::to_string))
        .collect::<EngineResult<_>>()?;

    // Resolve starting IDs once, up front: `$` pins to the stream's current
    // last ID, so only entries appended after this call can satisfy it.
    let mut cursors: Vec<(String, StreamId)> = Vec::with_capacity(n);
    {
        let mut store = store.write().await;
        for (key, id_arg) in keys.iter().zip(&rest[n..]) {
            let id_str = arg_str(id_arg)?;
            let after = if id_str == "$" {
                match store.get(key) {
                    Some(entry) => entry.value.as_stream().ok_or(EngineError::WrongType)?.last_id(),
                    None => StreamId::MIN,
                }
            } else {
                StreamId::parse(id_str, 0).ok_or_else(|| {
                    EngineError::Generic(
                        "Invalid stream ID specified as stream command argument".to_string(),
                    )
                })?
            };
            cursors.push((key.clone(), after));
        }
    }

    let deadline = block_ms.map(|ms| {
        if ms == 0 {
            None
        } else {
            Some(tokio::time::Instant::now() + Duration::from_millis(ms))
        }
    });

    loop {
        if let Some(reply) = try_read(store, &cursors, count).await? {
            return Ok(reply);
        }
        let Some(deadline) = deadline else {
            return Ok(Reply::Nil);
        };

        let notify = watcher.write().await.register(&keys);
        // Re-check after registering: an append may have landed in between.
        if let Some(reply) = try_read(store, &cursors, count).await? {
            watcher.write().await.unregister(&keys, &notify);
            return Ok(reply);
        }
        let woke = match deadline {
            Some(at) => tokio::time::timeout_at(at, notify.notified()).await.is_ok(),
            None => {
                notify.notified().await;
                true
            }
        };
        watcher.write().await.unregister(&keys, &notify);
        if !woke {
            return Ok(Reply::Nil);
        }
    }
}

/// One non-blocking pass over every requested stream. Some(reply) when at
/// least one stream has entries past its cursor.
async fn try_read(
    store: &SharedKeyspace,
    cursors: &[(String, StreamId)],
    count: Option<usize>,
) -> EngineResult<Option<Reply>> {
    let mut store = store.write().await;
    let mut per_stream = Vec::new();
    for (key, after) in cursors {
        let Some(entry) = store.get(key) else {
            continue;
        };
        let s = entry.value.as_stream().ok_or(EngineError::WrongType)?;
        let entries = s.read_after(*after, count);
        if entries.is_empty() {
            continue;
        }
        per_stream.push(Reply::array(vec![
            Reply::bulk(key.as_bytes()),
            Reply::array(
                entries
                    .into_iter()
                    .map(|(id, rec)| entry_reply(id, rec))
                    .collect(),
            ),
        ]));
    }
    Ok(if per_stream.is_empty() {
        None
    } else {
        Some(Reply::array(per_stream))
    })
}
