//! JSON decoding of blob payloads
//!
//! Reads the format produced by [`super::encode`] back into a subtree. All
//! failures surface as `DataCorrupted` carrying the blob's field path and a
//! detail naming what was malformed.

use crate::tree::Tree;
use base64::Engine;
use redbind_core::{CodecError, Path, RespValue, Result};

/// Decode a JSON blob payload into a subtree.
pub(crate) fn decode_json_tree(text: &str, path: &Path) -> Result<Tree> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(corrupted("unexpected end of blob payload", path));
    }

    let mut parser = JsonParser {
        input: trimmed,
        pos: 0,
        path,
    };
    let tree = parser.parse_value()?;
    parser.skip_whitespace();
    if parser.peek().is_some() {
        return Err(corrupted("trailing characters after blob payload", path));
    }
    Ok(tree)
}

fn corrupted(detail: impl Into<String>, path: &Path) -> CodecError {
    CodecError::corrupted(detail, path.clone())
}

struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
    path: &'a Path,
}

impl<'a> JsonParser<'a> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect_literal(&mut self, literal: &str) -> Result<()> {
        if self.input[self.pos..].starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(corrupted(format!("expected `{}`", literal), self.path))
        }
    }

    fn parse_value(&mut self) -> Result<Tree> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(corrupted("unexpected end of blob payload", self.path)),
            Some('n') => {
                self.expect_literal("null")?;
                Ok(Tree::Single(RespValue::Null))
            }
            // Bare boolean literals never come out of the encoder (booleans
            // pass through the boolean strategy first), but hand-authored
            // payloads may carry them; fold to the textual form.
            Some('t') => {
                self.expect_literal("true")?;
                Ok(Tree::Single(RespValue::bulk(*b"true")))
            }
            Some('f') => {
                self.expect_literal("false")?;
                Ok(Tree::Single(RespValue::bulk(*b"false")))
            }
            Some('"') => {
                let text = self.parse_string()?;
                Ok(Tree::Single(RespValue::Bulk(text.into_bytes())))
            }
            Some('[') => self.parse_array(),
            Some('{') => self.parse_object_or_wrapper(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(corrupted(format!("unexpected character `{}`", c), self.path)),
        }
    }

    fn parse_string(&mut self) -> Result<String> {
        self.advance(); // consume opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(corrupted("unterminated string", self.path)),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"') => {
                            result.push('"');
                            self.advance();
                        }
                        Some('\\') => {
                            result.push('\\');
                            self.advance();
                        }
                        Some('/') => {
                            result.push('/');
                            self.advance();
                        }
                        Some('n') => {
                            result.push('\n');
                            self.advance();
                        }
                        Some('r') => {
                            result.push('\r');
                            self.advance();
                        }
                        Some('t') => {
                            result.push('\t');
                            self.advance();
                        }
                        Some('b') => {
                            result.push('\x08');
                            self.advance();
                        }
                        Some('f') => {
                            result.push('\x0c');
                            self.advance();
                        }
                        Some('u') => {
                            self.advance();
                            let hex: String = (0..4)
                                .filter_map(|_| {
                                    let c = self.peek()?;
                                    self.advance();
                                    Some(c)
                                })
                                .collect();
                            if hex.len() != 4 {
                                return Err(corrupted("invalid unicode escape", self.path));
                            }
                            let code = u32::from_str_radix(&hex, 16)
                                .map_err(|_| corrupted("invalid unicode escape", self.path))?;
                            match char::from_u32(code) {
                                Some(c) => result.push(c),
                                None => {
                                    return Err(corrupted("invalid unicode codepoint", self.path))
                                }
                            }
                        }
                        Some(c) => {
                            return Err(corrupted(format!("invalid escape `\\{}`", c), self.path))
                        }
                        None => return Err(corrupted("unterminated string", self.path)),
                    }
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_number(&mut self) -> Result<Tree> {
        let start = self.pos;

        if self.peek() == Some('-') {
            self.advance();
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let mut is_float = false;
        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        if let Some('e' | 'E') = self.peek() {
            is_float = true;
            self.advance();
            if let Some('+' | '-') = self.peek() {
                self.advance();
            }
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        let num_str = &self.input[start..self.pos];

        if is_float {
            // Floats travel as text leaves; validate the literal here.
            num_str
                .parse::<f64>()
                .map(|_| Tree::Single(RespValue::Bulk(num_str.as_bytes().to_vec())))
                .map_err(|_| corrupted(format!("invalid number `{}`", num_str), self.path))
        } else {
            num_str
                .parse::<i64>()
                .map(|i| Tree::Single(RespValue::Int(i)))
                .map_err(|_| corrupted(format!("invalid number `{}`", num_str), self.path))
        }
    }

    fn parse_array(&mut self) -> Result<Tree> {
        self.advance(); // consume '['
        self.skip_whitespace();

        let mut elements = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(Tree::Unkeyed(elements));
        }

        loop {
            elements.push(self.parse_value()?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some(']') => {
                    self.advance();
                    return Ok(Tree::Unkeyed(elements));
                }
                Some(c) => {
                    return Err(corrupted(format!("unexpected character `{}`", c), self.path))
                }
                None => return Err(corrupted("unterminated array", self.path)),
            }
        }
    }

    fn parse_object_or_wrapper(&mut self) -> Result<Tree> {
        let fields = self.parse_object_raw()?;

        // Single-key `$` objects are wrappers for wire forms JSON cannot
        // carry natively.
        if fields.len() == 1 {
            let (key, value) = &fields[0];
            if let Tree::Single(RespValue::Bulk(bytes)) = value {
                let text = std::str::from_utf8(bytes).ok();
                match (key.as_str(), text) {
                    ("$bytes", Some(b64)) => {
                        let raw = base64::engine::general_purpose::STANDARD
                            .decode(b64)
                            .map_err(|e| {
                                corrupted(format!("invalid base64 in $bytes: {}", e), self.path)
                            })?;
                        return Ok(Tree::Single(RespValue::Bulk(raw)));
                    }
                    ("$text", Some(s)) => {
                        return Ok(Tree::Single(RespValue::Simple(s.to_string())));
                    }
                    ("$error", Some(s)) => {
                        return Ok(Tree::Single(RespValue::Error(s.to_string())));
                    }
                    _ => {}
                }
            }
        }

        Ok(Tree::Keyed(fields))
    }

    fn parse_object_raw(&mut self) -> Result<Vec<(String, Tree)>> {
        self.advance(); // consume '{'
        self.skip_whitespace();

        let mut fields = Vec::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(fields);
        }

        loop {
            self.skip_whitespace();

            if self.peek() != Some('"') {
                return Err(corrupted("expected string key", self.path));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(corrupted("expected `:` after key", self.path));
            }
            self.advance();

            let value = self.parse_value()?;
            fields.push((key, value));

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                Some('}') => {
                    self.advance();
                    return Ok(fields);
                }
                Some(c) => {
                    return Err(corrupted(format!("unexpected character `{}`", c), self.path))
                }
                None => return Err(corrupted("unterminated object", self.path)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(text: &str) -> Result<Tree> {
        decode_json_tree(text, &Path::root())
    }

    // === Leaves ===

    #[test]
    fn test_decode_null() {
        assert_eq!(decode("null").unwrap(), Tree::Single(RespValue::Null));
    }

    #[test]
    fn test_decode_int() {
        assert_eq!(decode("42").unwrap(), Tree::Single(RespValue::Int(42)));
        assert_eq!(decode("-7").unwrap(), Tree::Single(RespValue::Int(-7)));
    }

    #[test]
    fn test_decode_float_literal_becomes_text_leaf() {
        assert_eq!(
            decode("1.5").unwrap(),
            Tree::Single(RespValue::bulk(*b"1.5"))
        );
    }

    #[test]
    fn test_decode_string_becomes_bulk() {
        assert_eq!(
            decode(r#""hello""#).unwrap(),
            Tree::Single(RespValue::bulk(*b"hello"))
        );
    }

    #[test]
    fn test_decode_bool_literals_fold_to_text() {
        assert_eq!(
            decode("true").unwrap(),
            Tree::Single(RespValue::bulk(*b"true"))
        );
        assert_eq!(
            decode("false").unwrap(),
            Tree::Single(RespValue::bulk(*b"false"))
        );
    }

    // === Wrappers ===

    #[test]
    fn test_decode_bytes_wrapper() {
        assert_eq!(
            decode(r#"{"$bytes":"/wA="}"#).unwrap(),
            Tree::Single(RespValue::Bulk(vec![0xff, 0x00]))
        );
    }

    #[test]
    fn test_decode_text_wrapper() {
        assert_eq!(
            decode(r#"{"$text":"OK"}"#).unwrap(),
            Tree::Single(RespValue::simple("OK"))
        );
    }

    #[test]
    fn test_decode_error_wrapper() {
        assert_eq!(
            decode(r#"{"$error":"ERR oops"}"#).unwrap(),
            Tree::Single(RespValue::Error("ERR oops".into()))
        );
    }

    #[test]
    fn test_invalid_base64_is_corrupted() {
        let err = decode(r#"{"$bytes":"!!"}"#).unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    // === Containers ===

    #[test]
    fn test_decode_array() {
        assert_eq!(
            decode("[1,2]").unwrap(),
            Tree::Unkeyed(vec![
                Tree::Single(RespValue::Int(1)),
                Tree::Single(RespValue::Int(2)),
            ])
        );
    }

    #[test]
    fn test_decode_object_preserves_order() {
        let tree = decode(r#"{"z":1,"a":2}"#).unwrap();
        assert_eq!(
            tree,
            Tree::Keyed(vec![
                ("z".to_string(), Tree::Single(RespValue::Int(1))),
                ("a".to_string(), Tree::Single(RespValue::Int(2))),
            ])
        );
    }

    #[test]
    fn test_decode_nested() {
        let tree = decode(r#"{"inner":{"b":[1]}}"#).unwrap();
        assert_eq!(
            tree,
            Tree::Keyed(vec![(
                "inner".to_string(),
                Tree::Keyed(vec![(
                    "b".to_string(),
                    Tree::Unkeyed(vec![Tree::Single(RespValue::Int(1))]),
                )]),
            )])
        );
    }

    // === Malformed payloads ===

    #[test]
    fn test_empty_payload_is_corrupted() {
        assert!(matches!(
            decode("").unwrap_err(),
            CodecError::DataCorrupted { .. }
        ));
    }

    #[test]
    fn test_trailing_garbage_is_corrupted() {
        assert!(matches!(
            decode("1 x").unwrap_err(),
            CodecError::DataCorrupted { .. }
        ));
    }

    #[test]
    fn test_error_carries_path() {
        let path = Path::root().child_field("meta");
        let err = decode_json_tree("{bad", &path).unwrap_err();
        match err {
            CodecError::DataCorrupted { path: p, .. } => {
                assert_eq!(p.to_string(), "$.meta");
            }
            other => panic!("expected DataCorrupted, got {:?}", other),
        }
    }
}
