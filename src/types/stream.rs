use std::collections::BTreeMap;
use std::fmt;

/// A stream entry ID: millisecond timestamp plus a per-millisecond sequence.
/// IDs are strictly increasing within one stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId { ms: u64::MAX, seq: u64::MAX };

    pub fn new(ms: u64, seq: u64) -> Self {
        StreamId { ms, seq }
    }

    /// Parse "1234-5" or a bare "1234" (sequence defaults to `default_seq`).
    pub fn parse(s: &str, default_seq: u64) -> Option<Self> {
        match s.split_once('-') {
            Some((ms, seq)) => Some(StreamId {
                ms: ms.parse().ok()?,
                seq: seq.parse().ok()?,
            }),
            None => Some(StreamId {
                ms: s.parse().ok()?,
                seq: default_seq,
            }),
        }
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

/// One appended record: field/value pairs in append order.
pub type StreamRecord = Vec<(Vec<u8>, Vec<u8>)>;

/// Append-only ordered log of (ID, record) entries.
#[derive(Debug, Clone, Default)]
pub struct Stream {
    entries: BTreeMap<StreamId, StreamRecord>,
    last_id: StreamId,
}

impl Stream {
    pub fn new() -> Self {
        Stream::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_id(&self) -> StreamId {
        self.last_id
    }

    /// Append with an auto-assigned ID: `(now_ms, 0)`, bumped to
    /// `(last_ms, last_seq + 1)` whenever `now_ms` would not exceed the last
    /// ID (same-millisecond collision, or a clock that went backwards).
    pub fn append_auto(&mut self, now_ms: u64, record: StreamRecord) -> StreamId {
        let id = if self.entries.is_empty() && now_ms == 0 {
            // A zero clock still has to beat the 0-0 floor.
            StreamId::new(0, 1)
        } else if now_ms > self.last_id.ms {
            StreamId::new(now_ms, 0)
        } else {
            StreamId::new(self.last_id.ms, self.last_id.seq + 1)
        };
        self.entries.insert(id, record);
        self.last_id = id;
        id
    }

    /// Append with a caller-supplied ID. Returns None if the ID is not
    /// strictly greater than the last appended ID (or is 0-0 on an empty
    /// stream); the stream is left untouched in that case.
    pub fn append_explicit(&mut self, id: StreamId, record: StreamRecord) -> Option<StreamId> {
        if id <= self.last_id || id == StreamId::MIN {
            return None;
        }
        self.entries.insert(id, record);
        self.last_id = id;
        Some(id)
    }

    /// Entries with ID strictly greater than `after`, oldest first.
    pub fn read_after(&self, after: StreamId, count: Option<usize>) -> Vec<(StreamId, &StreamRecord)> {
        let iter = self
            .entries
            .range((std::ops::Bound::Excluded(after), std::ops::Bound::Unbounded))
            .map(|(id, rec)| (*id, rec));
        match count {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }

    /// Entries in the inclusive ID range `[start, end]`, oldest first.
    pub fn range(&self, start: StreamId, end: StreamId) -> Vec<(StreamId, &StreamRecord)> {
        self.entries.range(start..=end).map(|(id, rec)| (*id, rec)).collect()
    }
}
