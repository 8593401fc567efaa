//! Line-level cursor over an in-memory document.
//!
//! Both canonical codecs read through a [`LineCursor`]: numbered line reads
//! for diagnostics, plus exact character-count reads for `ba` blobs whose
//! content may itself contain newlines. The cursor strips one trailing `\r`
//! per line so CRLF documents parse identically.

use crate::error::ParseError;

pub struct LineCursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(src: &'a str) -> Self {
        Self { src, pos: 0, line: 0 }
    }

    /// Number of the most recently consumed line (1-based; 0 before any read).
    pub fn last_line(&self) -> usize {
        self.line
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.src.len()
    }

    /// Next line without its terminator. A final unterminated line counts.
    pub fn next_line(&mut self) -> Result<&'a str, ParseError> {
        if self.at_end() {
            return Err(ParseError::Eof { line: self.line });
        }
        let rest = &self.src[self.pos..];
        let (raw, consumed) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += consumed;
        self.line += 1;
        Ok(raw.strip_suffix('\r').unwrap_or(raw))
    }

    /// Exactly `count` characters, straight through any newlines.
    pub fn take_chars(&mut self, count: usize) -> Result<&'a str, ParseError> {
        let rest = &self.src[self.pos..];
        let mut end = 0;
        let mut taken = 0;
        for (i, ch) in rest.char_indices() {
            if taken == count {
                break;
            }
            taken += 1;
            end = i + ch.len_utf8();
        }
        if taken < count {
            return Err(ParseError::Eof {
                line: self.line + rest.matches('\n').count(),
            });
        }
        let blob = &rest[..end];
        self.line += blob.matches('\n').count();
        self.pos += end;
        Ok(blob)
    }

    /// Consume the newline that terminates a char-counted blob, if present.
    pub fn skip_newline(&mut self) {
        let rest = &self.src[self.pos..];
        if let Some(stripped) = rest.strip_prefix("\r\n") {
            self.pos += rest.len() - stripped.len();
            self.line += 1;
        } else if rest.starts_with('\n') {
            self.pos += 1;
            self.line += 1;
        }
    }

    /// Next line must equal `expected` exactly.
    pub fn expect_line(&mut self, expected: &str) -> Result<(), ParseError> {
        let actual = self.next_line()?;
        if actual != expected {
            return Err(ParseError::Literal {
                line: self.line,
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    pub fn int_line(&mut self) -> Result<i32, ParseError> {
        let raw = self.next_line()?;
        raw.trim().parse().map_err(|_| ParseError::Value {
            line: self.line,
            expected: "an integer",
            actual: raw.to_string(),
        })
    }

    pub fn count_line(&mut self) -> Result<usize, ParseError> {
        let raw = self.next_line()?;
        raw.trim().parse().map_err(|_| ParseError::Value {
            line: self.line,
            expected: "a count",
            actual: raw.to_string(),
        })
    }

    pub fn f64_line(&mut self) -> Result<f64, ParseError> {
        let raw = self.next_line()?;
        raw.trim().parse().map_err(|_| ParseError::Value {
            line: self.line,
            expected: "a number",
            actual: raw.to_string(),
        })
    }

    /// `True` / `False` line, as the nav grammar spells booleans.
    pub fn bool_line(&mut self) -> Result<bool, ParseError> {
        match self.next_line()? {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(ParseError::Value {
                line: self.line,
                expected: "`True` or `False`",
                actual: other.to_string(),
            }),
        }
    }

    /// Everything after the last rule must be blank.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        while !self.at_end() {
            let raw = self.next_line()?;
            if !raw.trim().is_empty() {
                return Err(ParseError::Syntax {
                    line: self.line,
                    detail: format!("expected end of input, found `{raw}`"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_and_blobs_share_one_position() {
        let mut cur = LineCursor::new("head\nab\ncd\ntail\n");
        assert_eq!(cur.next_line().unwrap(), "head");
        assert_eq!(cur.take_chars(5).unwrap(), "ab\ncd");
        cur.skip_newline();
        assert_eq!(cur.next_line().unwrap(), "tail");
        assert_eq!(cur.last_line(), 4);
        assert!(cur.at_end());
    }

    #[test]
    fn crlf_lines_parse_like_lf() {
        let mut cur = LineCursor::new("a\r\nb\r\n");
        assert_eq!(cur.next_line().unwrap(), "a");
        assert_eq!(cur.next_line().unwrap(), "b");
    }

    #[test]
    fn short_blob_is_eof() {
        let mut cur = LineCursor::new("abc");
        assert!(matches!(cur.take_chars(5), Err(ParseError::Eof { .. })));
    }
}
