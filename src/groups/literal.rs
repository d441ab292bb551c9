//! List-of-strings literal used by the CSV `Groups` column.
//!
//! The column holds text such as `['smoke', 'fast']`. Strings are written with
//! single quotes unless they contain a single quote and no double quote, so
//! CSVs produced by earlier versions of the report round-trip unchanged.

use serde::{Deserialize, Deserializer, Serializer};

use crate::error::LiteralError;

/// Render a group list as a list literal.
pub fn to_literal(groups: &[String]) -> String {
    let items: Vec<String> = groups.iter().map(|g| quote_string(g)).collect();
    format!("[{}]", items.join(", "))
}

fn quote_string(value: &str) -> String {
    let quote = if value.contains('\'') && !value.contains('"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}

/// Parse a list literal back into its strings.
///
/// Accepts either quote style, arbitrary whitespace and a trailing comma.
pub fn parse_literal(input: &str) -> Result<Vec<String>, LiteralError> {
    LiteralParser::new(input).parse_list()
}

struct LiteralParser<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> LiteralParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn error(&mut self, reason: &'static str) -> LiteralError {
        let offset = self
            .chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len());
        LiteralError {
            input: self.input.to_string(),
            offset,
            reason,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
    }

    fn parse_list(mut self) -> Result<Vec<String>, LiteralError> {
        self.skip_whitespace();
        if self.chars.next_if(|(_, c)| *c == '[').is_none() {
            return Err(self.error("expected '['"));
        }

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.chars.next_if(|(_, c)| *c == ']').is_some() {
                break;
            }

            items.push(self.parse_string()?);

            self.skip_whitespace();
            match self.chars.peek().map(|(_, c)| *c) {
                Some(',') => {
                    self.chars.next();
                }
                Some(']') => {
                    self.chars.next();
                    break;
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }

        self.skip_whitespace();
        if self.chars.peek().is_some() {
            return Err(self.error("unexpected text after ']'"));
        }

        Ok(items)
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.chars.peek().map(|(_, c)| *c) {
            Some(c @ ('\'' | '"')) => {
                self.chars.next();
                c
            }
            _ => return Err(self.error("expected a quoted string")),
        };

        let mut value = String::new();
        loop {
            let Some((_, c)) = self.chars.next() else {
                return Err(self.error("unterminated string"));
            };

            match c {
                c if c == quote => return Ok(value),
                '\\' => self.parse_escape(&mut value)?,
                c => value.push(c),
            }
        }
    }

    fn parse_escape(&mut self, value: &mut String) -> Result<(), LiteralError> {
        let Some((_, c)) = self.chars.next() else {
            return Err(self.error("unterminated escape"));
        };

        match c {
            '\\' | '\'' | '"' => value.push(c),
            'n' => value.push('\n'),
            'r' => value.push('\r'),
            't' => value.push('\t'),
            '0' => value.push('\0'),
            'x' => value.push(self.parse_hex(2)?),
            'u' => value.push(self.parse_hex(4)?),
            // Unknown escapes keep their backslash.
            other => {
                value.push('\\');
                value.push(other);
            }
        }
        Ok(())
    }

    fn parse_hex(&mut self, digits: usize) -> Result<char, LiteralError> {
        let mut code = 0u32;
        for _ in 0..digits {
            let digit = self
                .chars
                .peek()
                .and_then(|(_, c)| c.to_digit(16))
                .ok_or_else(|| self.error("invalid hex escape"))?;
            self.chars.next();
            code = code * 16 + digit;
        }
        char::from_u32(code).ok_or_else(|| self.error("invalid code point"))
    }
}

/// `serialize_with` adapter for the `Groups` column.
pub fn serialize<S>(groups: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&to_literal(groups))
}

/// `deserialize_with` adapter for the `Groups` column.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_literal(&raw).map_err(serde::de::Error::custom)
}
