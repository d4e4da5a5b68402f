/// Binary-safe string value.
#[derive(Debug, Clone, Default)]
pub struct Str {
    data: Vec<u8>,
}

impl Str {
    pub fn new(data: Vec<u8>) -> Self {
        Str { data }
    }

    pub fn from_i64(n: i64) -> Self {
        Str {
            data: n.to_string().into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn set(&mut self, data: Vec<u8>) {
        self.data = data;
    }

    /// Append bytes, returning the new length.
    pub fn append(&mut self, data: &[u8]) -> usize {
        self.data.extend_from_slice(data);
        self.data.len()
    }

    /// Parse the value as a signed 64-bit integer.
    pub fn as_i64(&self) -> Option<i64> {
        std::str::from_utf8(&self.data)
            .ok()
            .and_then(|s| s.parse::<i64>().ok())
    }

    /// Add `delta` to the integer form of the value, rewriting it in place.
    /// Fails if the value is not an integer or the addition overflows.
    pub fn incr_by(&mut self, delta: i64) -> Option<i64> {
        let next = self.as_i64()?.checked_add(delta)?;
        self.data = next.to_string().into_bytes();
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incr_rewrites_the_stored_bytes() {
        let mut s = Str::new(b"41".to_vec());
        assert_eq!(s.incr_by(1), Some(42));
        assert_eq!(s.as_bytes(), b"42");
    }

    #[test]
    fn incr_rejects_non_numeric() {
        let mut s = Str::new(b"not a number".to_vec());
        assert_eq!(s.incr_by(1), None);
        assert_eq!(s.as_bytes(), b"not a number");
    }

    #[test]
    fn incr_rejects_overflow() {
        let mut s = Str::from_i64(i64::MAX);
        assert_eq!(s.incr_by(1), None);
    }
}
