use crate::command::{arg_f64, arg_i64, arg_str, format_score};
use crate::error::{EngineError, EngineResult};
use crate::reply::Reply;
use crate::store::SharedKeyspace;
use crate::types::Value;
use crate::types::sorted_set::SortedSet;
use bytes::Bytes;

/// ZADD key score member [score member ...] — returns the count of newly
/// inserted members; score-only updates do not count.
pub async fn zadd(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let pairs = &args[1..];
    if pairs.len() % 2 != 0 {
        return Err(EngineError::SyntaxError);
    }
    // Validate every score before touching the value, so a bad pair can't
    // leave a partial update behind.
    let mut scored = Vec::with_capacity(pairs.len() / 2);
    for pair in pairs.chunks(2) {
        scored.push((arg_f64(&pair[0])?, pair[1].to_vec()));
    }

    let mut store = store.write().await;
    let entry = store.entry_or_insert_with(key, || Value::SortedSet(SortedSet::new()));
    let z = entry.value.as_sorted_set_mut().ok_or(EngineError::WrongType)?;
    let mut inserted = 0;
    for (score, member) in scored {
        if z.add(member, score) {
            inserted += 1;
        }
    }
    Ok(Reply::Integer(inserted))
}

/// ZSCORE key member
pub async fn zscore(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let z = entry.value.as_sorted_set().ok_or(EngineError::WrongType)?;
            Ok(z.score(&args[1])
                .map(|s| Reply::bulk(format_score(s)))
                .unwrap_or(Reply::Nil))
        }
        None => Ok(Reply::Nil),
    }
}

/// ZCARD key
pub async fn zcard(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let z = entry.value.as_sorted_set().ok_or(EngineError::WrongType)?;
            Ok(Reply::Integer(z.len() as i64))
        }
        None => Ok(Reply::Integer(0)),
    }
}

/// ZRANGE key start stop [WITHSCORES] — ordinal range, ascending
/// (score, member) order, list-style negative indices and clamping.
pub async fn zrange(args: &[Bytes], store: &SharedKeyspace) -> EngineResult<Reply> {
    let key = arg_str(&args[0])?;
    let start = arg_i64(&args[1])?;
    let stop = arg_i64(&args[2])?;
    let with_scores = match args.get(3) {
        Some(arg) => {
            if arg_str(arg)?.eq_ignore_ascii_case("WITHSCORES") {
                true
            } else {
                return Err(EngineError::SyntaxError);
            }
        }
        None => false,
    };

    let mut store = store.write().await;
    match store.get(key) {
        Some(entry) => {
            let z = entry.value.as_sorted_set().ok_or(EngineError::WrongType)?;
            let mut out = Vec::new();
            for (member, score) in z.range(start, stop) {
                out.push(Reply::bulk(member));
                if with_scores {
                    out.push(Reply::bulk(format_score(score)));
                }
            }
            Ok(Reply::array(out))
        }
        None => Ok(Reply::array(vec![])),
    }
}
