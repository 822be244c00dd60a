//! Tolerant parser for JavaScript object literals embedded in web pages.
//!
//! Pages such as Bandcamp's album view assign a large object literal to a
//! variable. It is close to JSON but not quite: keys may be unquoted,
//! strings may be single-quoted or split with `" + "`, and trailing commas,
//! comments and statement noise are common. [`parse`] accepts all of that and
//! returns a plain [`serde_json::Value`] tree, leaving interpretation to the
//! caller.
//!
//! [`extract_assignment`] cuts the literal out of the surrounding HTML.

use serde_json::{Map, Number, Value};

/// Errors produced while parsing an object literal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("marker '{0}' not found")]
    MarkerNotFound(String),
}

/// Cut the object literal assigned after `marker` out of `source`.
///
/// The literal ends at the first `};` after the marker. The closing brace is
/// kept, the semicolon dropped. Without a `};` the rest of the input is
/// returned and left to the parser's trailing-noise tolerance.
pub fn extract_assignment<'a>(source: &'a str, marker: &str) -> Result<&'a str, ParseError> {
    let start = source
        .find(marker)
        .map(|i| i + marker.len())
        .ok_or_else(|| ParseError::MarkerNotFound(marker.to_string()))?;

    let rest = &source[start..];
    match rest.find("};") {
        Some(end) => Ok(&rest[..=end]),
        None => Ok(rest),
    }
}

/// Parse one object literal (or any single value) from `input`.
///
/// Anything after the first complete value is ignored.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input);
    parser.skip_trivia();
    parser.value()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::Unexpected {
                found,
                offset: self.pos,
            },
            None => ParseError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        if self.peek() == Some(wanted) {
            self.pos += wanted.len_utf8();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    /// Skip whitespace and comments.
    fn skip_trivia(&mut self) {
        loop {
            let rest = &self.src[self.pos..];
            let trimmed = rest.trim_start();
            self.pos += rest.len() - trimmed.len();

            if trimmed.starts_with("//") {
                let end = trimmed.find('\n').unwrap_or(trimmed.len());
                self.pos += end;
            } else if let Some(body) = trimmed.strip_prefix("/*") {
                let end = body.find("*/").map(|i| i + 4).unwrap_or(trimmed.len());
                self.pos += end;
            } else {
                return;
            }
        }
    }

    fn value(&mut self) -> Result<Value, ParseError> {
        match self.peek() {
            Some('{') => self.object(),
            Some('[') => self.array(),
            Some('"') | Some('\'') => self.concatenated_string().map(Value::String),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if is_ident_start(c) => {
                let word = self.identifier();
                Ok(match word {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    // null, undefined, and references to other variables
                    _ => Value::Null,
                })
            }
            _ => Err(self.unexpected()),
        }
    }

    fn object(&mut self) -> Result<Value, ParseError> {
        self.expect('{')?;
        let mut map = Map::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Object(map));
            }

            let key = self.key()?;
            self.skip_trivia();
            self.expect(':')?;
            self.skip_trivia();
            let value = self.value()?;
            map.insert(key, value);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some('}') => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn array(&mut self) -> Result<Value, ParseError> {
        self.expect('[')?;
        let mut items = Vec::new();

        loop {
            self.skip_trivia();
            if self.peek() == Some(']') {
                self.bump();
                return Ok(Value::Array(items));
            }

            items.push(self.value()?);

            self.skip_trivia();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn key(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some('"') | Some('\'') => self.string(),
            Some(c) if is_ident_start(c) || c.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(is_ident_part) {
                    self.bump();
                }
                Ok(self.src[start..self.pos].to_string())
            }
            _ => Err(self.unexpected()),
        }
    }

    /// A string literal, followed by any number of `+ "more"` pieces.
    fn concatenated_string(&mut self) -> Result<String, ParseError> {
        let mut out = self.string()?;

        loop {
            let checkpoint = self.pos;
            self.skip_trivia();
            if self.peek() != Some('+') {
                self.pos = checkpoint;
                return Ok(out);
            }
            self.bump();
            self.skip_trivia();
            match self.peek() {
                Some('"') | Some('\'') => out.push_str(&self.string()?),
                // `"a" + someVariable`: the variable's value is unknown, drop it
                Some(c) if is_ident_start(c) => {
                    self.identifier();
                }
                _ => {
                    self.pos = checkpoint;
                    return Ok(out);
                }
            }
        }
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let quote = self.bump().ok_or(ParseError::UnexpectedEnd)?;
        let mut out = String::new();

        loop {
            let c = self.bump().ok_or(ParseError::UnexpectedEnd)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escaped = self.bump().ok_or(ParseError::UnexpectedEnd)?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'b' => out.push('\u{8}'),
                        'f' => out.push('\u{c}'),
                        '0' => out.push('\0'),
                        'u' => out.push(self.unicode_escape()?),
                        '\n' => {}
                        // \" \' \\ \/ and unknown escapes map to the character itself
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
    }

    fn unicode_escape(&mut self) -> Result<char, ParseError> {
        let high = self.hex4()?;

        // Surrogate pair
        if (0xD800..0xDC00).contains(&high) && self.src[self.pos..].starts_with("\\u") {
            self.pos += 2;
            let low = self.hex4()?;
            let combined = 0x10000 + ((high - 0xD800) << 10) + (low.wrapping_sub(0xDC00) & 0x3FF);
            return Ok(char::from_u32(combined).unwrap_or('\u{FFFD}'));
        }

        Ok(char::from_u32(high).unwrap_or('\u{FFFD}'))
    }

    fn hex4(&mut self) -> Result<u32, ParseError> {
        let digits = self
            .src
            .get(self.pos..self.pos + 4)
            .ok_or(ParseError::UnexpectedEnd)?;
        let code = u32::from_str_radix(digits, 16).map_err(|_| self.unexpected())?;
        self.pos += 4;
        Ok(code)
    }

    fn number(&mut self) -> Result<Value, ParseError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.'))
        {
            self.bump();
        }
        let raw = &self.src[start..self.pos];
        let text = raw.strip_prefix('+').unwrap_or(raw);

        if let Ok(n) = text.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Ok(n) = text.parse::<u64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
            && let Ok(n) = i64::from_str_radix(hex, 16)
        {
            return Ok(Value::Number(n.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| ParseError::InvalidNumber(raw.to_string()))
    }

    fn identifier(&mut self) -> &'a str {
        let src = self.src;
        let start = self.pos;
        while self.peek().is_some_and(is_ident_part) {
            self.bump();
        }
        &src[start..self.pos]
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        let value = parse(r#"{"a": 1, "b": [true, false, null], "c": {"d": "e"}}"#).unwrap();
        assert_eq!(value, json!({"a": 1, "b": [true, false, null], "c": {"d": "e"}}));
    }

    #[test]
    fn test_single_quotes_and_trailing_semicolon() {
        let source = r#"{
            artist: 'The Band',
            current: { title: 'Album \'Deluxe\'', release_date: '01 Jan 2014 00:00:00 GMT' },
            trackinfo: [
                { title: 'One', track_num: 1, file: { 'mp3-128': '//x.bcbits.com/1' } },
                { title: "Two", track_num: 2, file: null },
                { title: 'Three', track_num: 3, file: { "mp3-128": "https://x.bcbits.com/3" } },
            ],
        };"#;

        let value = parse(source).unwrap();
        assert_eq!(value["artist"], "The Band");
        assert_eq!(value["current"]["title"], "Album 'Deluxe'");

        let tracks = value["trackinfo"].as_array().unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0]["title"], "One");
        assert_eq!(tracks[0]["file"]["mp3-128"], "//x.bcbits.com/1");
        assert!(tracks[1]["file"].is_null());
        assert_eq!(tracks[2]["track_num"], 3);
    }

    #[test]
    fn test_string_concatenation() {
        let value = parse(r#"{ url: "http://example" + ".com" + '/path', n: 1 }"#).unwrap();
        assert_eq!(value["url"], "http://example.com/path");
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_concatenation_with_variable_keeps_literal_part() {
        let value = parse(r#"{ url: "http://host/" + siteroot, next: 2 }"#).unwrap();
        assert_eq!(value["url"], "http://host/");
        assert_eq!(value["next"], 2);
    }

    #[test]
    fn test_comments_and_identifiers() {
        let source = r#"{
            // the band
            artist: "X", /* inline */
            item_type: undefined,
            packages: null,
            url: BandData.url,
            hidden: !0
        }"#;
        // `!0` is not supported; everything before it is still reported as an error
        assert!(parse(source).is_err());

        let source = source.replace("!0", "true");
        let value = parse(&source).unwrap();
        assert_eq!(value["artist"], "X");
        assert!(value["item_type"].is_null());
        assert!(value["url"].is_null());
        assert_eq!(value["hidden"], true);
    }

    #[test]
    fn test_numbers() {
        let value = parse("{ a: -3, b: 2.5, c: 1e3, d: 0x1F, e: +7 }").unwrap();
        assert_eq!(value["a"], -3);
        assert_eq!(value["b"], 2.5);
        assert_eq!(value["c"], 1000.0);
        assert_eq!(value["d"], 31);
        assert_eq!(value["e"], 7);
    }

    #[test]
    fn test_unicode_escapes() {
        let value = parse(r#"{ a: "café", b: "🎵" }"#).unwrap();
        assert_eq!(value["a"], "café");
        assert_eq!(value["b"], "🎵");
    }

    #[test]
    fn test_trailing_noise_ignored() {
        let value = parse("{ a: 1 };\nvar other = 2;").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_unterminated_input() {
        assert_eq!(parse("{ a: 'open"), Err(ParseError::UnexpectedEnd));
        assert_eq!(parse("{ a: 1"), Err(ParseError::UnexpectedEnd));
    }

    #[test]
    fn test_extract_assignment() {
        let html = "<script>var TralbumData = { artist: 'A', x: { y: 1 } };\nvar Other = {};</script>";
        let literal = extract_assignment(html, "var TralbumData = ").unwrap();
        assert_eq!(literal, "{ artist: 'A', x: { y: 1 } }");
        assert_eq!(parse(literal).unwrap()["artist"], "A");
    }

    #[test]
    fn test_extract_assignment_missing_marker() {
        let result = extract_assignment("<html></html>", "var TralbumData = ");
        assert!(matches!(result, Err(ParseError::MarkerNotFound(_))));
    }
}
