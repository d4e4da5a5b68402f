//! Glob pattern matching over raw bytes.
//!
//! Supports `*` (any run of bytes), `?` (any single byte), `[abc]` / `[^abc]`
//! / `[a-z]` character classes, and `\` escapes. Patterns are applied to key
//! bytes after a candidate key has been selected; they never influence
//! iteration order.

/// Match `pattern` against `key`, byte-wise.
pub fn glob_match(pattern: &[u8], key: &[u8]) -> bool {
    let mut p = 0;
    let mut k = 0;
    // Most recent `*` position, for backtracking.
    let mut star: Option<(usize, usize)> = None;

    while k < key.len() {
        let step = if p < pattern.len() {
            match pattern[p] {
                b'*' => {
                    star = Some((p, k));
                    p += 1;
                    continue;
                }
                b'?' => true,
                b'[' => match scan_class(&pattern[p..], key[k]) {
                    Some((hit, width)) => {
                        if hit {
                            p += width - 1; // -1: the shared advance below adds 1
                            true
                        } else {
                            false
                        }
                    }
                    None => false,
                },
                b'\\' if p + 1 < pattern.len() => {
                    if pattern[p + 1] == key[k] {
                        p += 1;
                        true
                    } else {
                        false
                    }
                }
                literal => literal == key[k],
            }
        } else {
            false
        };

        if step {
            p += 1;
            k += 1;
        } else if let Some((sp, sk)) = star {
            // Re-anchor after the star, consuming one more key byte.
            p = sp + 1;
            k = sk + 1;
            star = Some((sp, sk + 1));
        } else {
            return false;
        }
    }

    // Trailing stars match the empty suffix.
    while p < pattern.len() && pattern[p] == b'*' {
        p += 1;
    }
    p == pattern.len()
}

/// Scan a `[...]` class at the start of `pattern` against one byte.
/// Returns `(matched, bytes_consumed)`, or None if the class never closes.
fn scan_class(pattern: &[u8], byte: u8) -> Option<(bool, usize)> {
    debug_assert_eq!(pattern.first(), Some(&b'['));
    let mut i = 1;
    let negated = pattern.get(i) == Some(&b'^');
    if negated {
        i += 1;
    }

    let mut hit = false;
    while i < pattern.len() && pattern[i] != b']' {
        if pattern.get(i + 1) == Some(&b'-') && i + 2 < pattern.len() && pattern[i + 2] != b']' {
            if (pattern[i]..=pattern[i + 2]).contains(&byte) {
                hit = true;
            }
            i += 3;
        } else {
            if pattern[i] == byte {
                hit = true;
            }
            i += 1;
        }
    }

    if i >= pattern.len() {
        return None;
    }

    Some((hit != negated, i + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, key: &str) -> bool {
        glob_match(pattern.as_bytes(), key.as_bytes())
    }

    #[test]
    fn literal() {
        assert!(matches("hello", "hello"));
        assert!(!matches("hello", "hallo"));
        assert!(!matches("hello", "hello!"));
    }

    #[test]
    fn star() {
        assert!(matches("*", ""));
        assert!(matches("*", "anything"));
        assert!(matches("user:*", "user:42"));
        assert!(matches("h*llo", "heeeello"));
        assert!(!matches("h*llo", "help"));
    }

    #[test]
    fn question_mark() {
        assert!(matches("h?llo", "hallo"));
        assert!(!matches("h?llo", "hllo"));
    }

    #[test]
    fn classes() {
        assert!(matches("h[ae]llo", "hello"));
        assert!(!matches("h[ae]llo", "hillo"));
        assert!(matches("h[a-e]llo", "hello"));
        assert!(matches("h[^e]llo", "hallo"));
        assert!(!matches("h[^e]llo", "hello"));
        // Unterminated class never matches.
        assert!(!matches("h[ae", "ha"));
    }

    #[test]
    fn escapes() {
        assert!(matches(r"h\*llo", "h*llo"));
        assert!(!matches(r"h\*llo", "hello"));
    }

    #[test]
    fn key_shapes() {
        assert!(matches("session:*:token", "session:9f3a:token"));
        assert!(!matches("session:*:token", "session:9f3a:ttl"));
        assert!(matches("*:?", "job:1"));
    }
}
