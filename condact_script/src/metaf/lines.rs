//! Low-level scanning for Metaf sources: significant lines and the fields
//! within one line.
//!
//! Metaf is line-oriented. Blank lines and `~~` comment lines vanish before
//! the grammar ever sees them; what remains is a tab count (the nesting
//! depth) plus the line's text. Braced fields `{...}` hold free text with
//! `{{` and `}}` escaping literal braces.

use crate::error::ParseError;
use crate::metaf::tables::{COMMENT_RX, HEX_RX, INT_RX, NUM_RX};

/// One significant source line.
#[derive(Debug, Clone, Copy)]
pub(super) struct MetafLine<'a> {
    /// 1-based line number in the original source, comments included.
    pub no: usize,
    /// Leading tab count; the nesting depth for rule bodies.
    pub tabs: usize,
    /// Text after the tabs, trimmed.
    pub text: &'a str,
}

/// Split a source into significant lines.
pub(super) fn scan_lines(src: &str) -> Vec<MetafLine<'_>> {
    let mut out = Vec::new();
    for (i, raw) in src.lines().enumerate() {
        if raw.trim().is_empty() || COMMENT_RX.is_match(raw) {
            continue;
        }
        let tabs = raw.len() - raw.trim_start_matches('\t').len();
        out.push(MetafLine {
            no: i + 1,
            tabs,
            text: raw[tabs..].trim(),
        });
    }
    out
}

/// Cursor over the fields of one line.
pub(super) struct Fields<'a> {
    line: usize,
    rest: &'a str,
}

impl<'a> Fields<'a> {
    pub fn new(line: usize, text: &'a str) -> Self {
        Self { line, rest: text }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    pub fn at_end(&self) -> bool {
        self.rest.trim_start().is_empty()
    }

    /// True when the next field is a braced one.
    pub fn at_braced(&self) -> bool {
        self.rest.trim_start().starts_with('{')
    }

    /// Next whitespace-delimited token.
    pub fn word(&mut self, expected: &'static str) -> Result<&'a str, ParseError> {
        self.skip_ws();
        if self.rest.is_empty() {
            return Err(ParseError::Value {
                line: self.line,
                expected,
                actual: "end of line".to_string(),
            });
        }
        let end = self
            .rest
            .find(|c: char| c.is_whitespace())
            .unwrap_or(self.rest.len());
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(word)
    }

    pub fn int(&mut self) -> Result<i32, ParseError> {
        let word = self.word("an integer")?;
        if !INT_RX.is_match(word) {
            return Err(self.bad_value("an integer", word));
        }
        word.parse().map_err(|_| self.bad_value("an integer", word))
    }

    /// Hex field, as used for landblocks, cells, and follow target ids.
    pub fn hex(&mut self) -> Result<i32, ParseError> {
        let word = self.word("a hex number")?;
        if !HEX_RX.is_match(word) {
            return Err(self.bad_value("a hex number", word));
        }
        u32::from_str_radix(word, 16)
            .map(|v| v as i32)
            .map_err(|_| self.bad_value("a hex number", word))
    }

    pub fn number(&mut self) -> Result<f64, ParseError> {
        let word = self.word("a number")?;
        if !NUM_RX.is_match(word) {
            return Err(self.bad_value("a number", word));
        }
        word.parse().map_err(|_| self.bad_value("a number", word))
    }

    pub fn boolean(&mut self) -> Result<bool, ParseError> {
        match self.word("`True` or `False`")? {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(self.bad_value("`True` or `False`", other)),
        }
    }

    /// Braced free-text field, escapes decoded.
    pub fn braced(&mut self) -> Result<String, ParseError> {
        self.skip_ws();
        if !self.rest.starts_with('{') {
            return Err(ParseError::Literal {
                line: self.line,
                expected: "{".to_string(),
                actual: self.rest.chars().next().map_or_else(|| "end of line".to_string(), |c| c.to_string()),
            });
        }
        let src = self.rest;
        let mut out = String::new();
        let mut i = 1;
        while i < src.len() {
            let tail = &src[i..];
            if tail.starts_with("{{") {
                out.push('{');
                i += 2;
            } else if tail.starts_with("}}") {
                out.push('}');
                i += 2;
            } else if tail.starts_with('}') {
                self.rest = &src[i + 1..];
                return Ok(out);
            } else if tail.starts_with('{') {
                return Err(ParseError::Syntax {
                    line: self.line,
                    detail: "unescaped `{` inside braced text (write `{{`)".to_string(),
                });
            } else {
                let ch = tail.chars().next().expect("tail is non-empty");
                out.push(ch);
                i += ch.len_utf8();
            }
        }
        Err(ParseError::Syntax {
            line: self.line,
            detail: "unterminated braced text".to_string(),
        })
    }

    /// No fields may remain.
    pub fn finish(&self) -> Result<(), ParseError> {
        let rest = self.rest.trim();
        if rest.is_empty() {
            return Ok(());
        }
        Err(ParseError::Syntax {
            line: self.line,
            detail: format!("unexpected trailing text `{rest}`"),
        })
    }

    fn bad_value(&self, expected: &'static str, actual: &str) -> ParseError {
        ParseError::Value {
            line: self.line,
            expected,
            actual: actual.to_string(),
        }
    }
}

/// Escape braces for emission inside a braced field.
pub(super) fn escape_braces(text: &str) -> String {
    text.replace('{', "{{").replace('}', "}}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_are_skipped() {
        let lines = scan_lines("~~ header\n\nSTATE: {a}\n\t~~ indented comment\n\tIF: Never\n");
        let texts: Vec<_> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["STATE: {a}", "IF: Never"]);
        assert_eq!(lines[1].tabs, 1);
        assert_eq!(lines[1].no, 5);
    }

    #[test]
    fn braced_fields_decode_escapes() {
        let mut f = Fields::new(1, "{tell {{you}} this} {next}");
        assert_eq!(f.braced().unwrap(), "tell {you} this");
        assert_eq!(f.braced().unwrap(), "next");
        assert!(f.finish().is_ok());
    }

    #[test]
    fn lone_brace_is_rejected() {
        let mut f = Fields::new(1, "{oops {nested}");
        assert!(matches!(f.braced(), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn escape_round_trips_through_braced() {
        let original = "a{b}c";
        let encoded = format!("{{{}}}", escape_braces(original));
        let mut f = Fields::new(1, &encoded);
        assert_eq!(f.braced().unwrap(), original);
    }
}
