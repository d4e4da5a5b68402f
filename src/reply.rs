//! Command results. Every dispatcher operation resolves to one of these
//! shapes; errors travel separately as [`EngineError`](crate::error::EngineError).

/// A successful command result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Simple "OK" acknowledgement.
    Ok,
    Integer(i64),
    /// A binary-safe string payload.
    Bulk(Vec<u8>),
    Array(Vec<Reply>),
    /// Absent key / missing field.
    Nil,
}

impl Reply {
    pub fn bulk(data: impl Into<Vec<u8>>) -> Reply {
        Reply::Bulk(data.into())
    }

    pub fn array(items: Vec<Reply>) -> Reply {
        Reply::Array(items)
    }

    /// View a bulk reply as bytes.
    pub fn as_bulk(&self) -> Option<&[u8]> {
        match self {
            Reply::Bulk(b) => Some(b),
            _ => None,
        }
    }

    /// View a bulk reply as UTF-8, if it is valid.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bulk()?).ok()
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Reply::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Reply]> {
        match self {
            Reply::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }
}
