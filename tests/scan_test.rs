use bytes::Bytes;
use skiff::{Config, Engine, Reply};
use std::collections::HashSet;

fn args(parts: &[&str]) -> Vec<Bytes> {
    parts.iter().map(|p| Bytes::copy_from_slice(p.as_bytes())).collect()
}

async fn run(engine: &Engine, parts: &[&str]) -> Reply {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    engine
        .execute(parts[0], &args(&parts[1..]))
        .await
        .unwrap_or_else(|e| panic!("{:?} failed: {e}", parts))
}

/// Drive SCAN one step. Returns (next_cursor, batch).
async fn scan_step(engine: &Engine, cursor: u64, extra: &[&str]) -> (u64, Vec<String>) {
    let cursor = cursor.to_string();
    let mut parts = vec!["SCAN", cursor.as_str()];
    parts.extend_from_slice(extra);
    let reply = run(engine, &parts).await;
    let items = reply.as_array().unwrap();
    let next: u64 = items[0].as_str().unwrap().parse().unwrap();
    let keys = items[1]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r.as_str().unwrap().to_string())
        .collect();
    (next, keys)
}

#[tokio::test]
async fn full_cycle_covers_a_frozen_keyspace() {
    let engine = Engine::new(Config::default());
    let mut expected = HashSet::new();
    for i in 0..500 {
        let key = format!("key:{i}");
        run(&engine, &["SET", &key, "v"]).await;
        expected.insert(key);
    }

    let mut seen = HashSet::new();
    let mut cursor = 0;
    let mut calls = 0;
    loop {
        let (next, batch) = scan_step(&engine, cursor, &[]).await;
        seen.extend(batch);
        calls += 1;
        assert!(calls < 10_000, "cursor cycle failed to terminate");
        if next == 0 {
            break;
        }
        cursor = next;
    }
    assert!(calls > 1, "default COUNT should need multiple calls for 500 keys");
    assert_eq!(seen, expected, "scan omitted or invented keys");
}

#[tokio::test]
async fn match_filters_without_affecting_cursor_progress() {
    let engine = Engine::new(Config::default());
    for i in 0..100 {
        run(&engine, &["SET", &format!("user:{i}"), "v"]).await;
        run(&engine, &["SET", &format!("job:{i}"), "v"]).await;
    }

    let mut seen = HashSet::new();
    let mut cursor = 0;
    loop {
        let (next, batch) = scan_step(&engine, cursor, &["MATCH", "user:*"]).await;
        for key in &batch {
            assert!(key.starts_with("user:"), "MATCH leaked {key}");
        }
        seen.extend(batch);
        if next == 0 {
            break;
        }
        cursor = next;
    }
    assert_eq!(seen.len(), 100, "every user:* key must appear");
}

#[tokio::test]
async fn count_hint_tunes_batch_effort() {
    let engine = Engine::new(Config::default());
    for i in 0..400 {
        run(&engine, &["SET", &format!("k{i}"), "v"]).await;
    }

    // A large COUNT finishes in fewer calls than a tiny one.
    async fn calls_with(engine: &Engine, count: &str) -> u32 {
        let mut cursor = 0;
        let mut calls = 0u32;
        loop {
            let (next, _) = scan_step(engine, cursor, &["COUNT", count]).await;
            calls += 1;
            if next == 0 {
                return calls;
            }
            cursor = next;
        }
    }
    let small = calls_with(&engine, "1").await;
    let large = calls_with(&engine, "1000").await;
    assert!(small > large);
    assert_eq!(large, 1);
}

#[tokio::test]
async fn stable_keys_survive_concurrent_inserts() {
    let engine = Engine::new(Config::default());
    let mut stable = HashSet::new();
    for i in 0..50 {
        let key = format!("stable:{i}");
        run(&engine, &["SET", &key, "v"]).await;
        stable.insert(key);
    }

    let mut seen = HashSet::new();
    let mut cursor = 0;
    let mut extra = 0;
    let mut calls = 0;
    loop {
        let (next, batch) = scan_step(&engine, cursor, &["COUNT", "1"]).await;
        seen.extend(batch);
        calls += 1;
        assert!(calls < 100_000, "scan looped forever under concurrent writes");
        if next == 0 {
            break;
        }
        cursor = next;
        // Grow the table mid-scan; these may or may not be returned. The
        // noise stops at 150 keys so the walk can outpace the rehashing.
        while extra < 150 && extra < calls * 6 {
            run(&engine, &["SET", &format!("noise:{extra}"), "v"]).await;
            extra += 1;
        }
    }
    for key in &stable {
        assert!(seen.contains(key), "stable key {key} was skipped");
    }
}

#[tokio::test]
async fn scan_skips_and_reaps_expired_keys() {
    let engine = Engine::new(Config::default());
    for i in 0..30 {
        run(&engine, &["SET", &format!("live:{i}"), "v"]).await;
    }
    for i in 0..30 {
        let key = format!("dead:{i}");
        run(&engine, &["SET", &key, "v"]).await;
        run(&engine, &["EXPIRE", &key, "100"]).await;
    }
    {
        let mut store = engine.store().write().await;
        for i in 0..30 {
            store.get_mut(&format!("dead:{i}")).unwrap().expires_at = Some(1);
        }
    }

    let mut seen = HashSet::new();
    let mut cursor = 0;
    loop {
        let (next, batch) = scan_step(&engine, cursor, &[]).await;
        seen.extend(batch);
        if next == 0 {
            break;
        }
        cursor = next;
    }
    assert_eq!(seen.len(), 30);
    assert!(seen.iter().all(|k| k.starts_with("live:")));
    // The walk physically removed what it skipped.
    assert_eq!(run(&engine, &["DBSIZE"]).await, Reply::Integer(30));
}
