//! Recursive-descent parser for the protobuf debug-string dialect.

use thiserror::Error;

use crate::cursor::Cursor;
use crate::value::{Document, Value};

/// Errors reported while parsing a debug string.
///
/// The first error aborts the whole parse; there is no recovery mode and no
/// partial result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input ended while a string, object or number was still open.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A character appeared where the grammar disallows it.
    #[error("unexpected character {1:?} at position {0}")]
    UnexpectedToken(usize, char),

    /// A numeric token that parses as neither integer nor float.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
}

/// A parser that converts one protobuf debug string into a [`Document`].
///
/// The debug-string grammar is whitespace separated field/value pairs with
/// curly braces for nested messages and no commas:
///
/// ```text
/// name: "John" age: 30 address { street: "Main St" number: 123 }
/// ```
///
/// A leading `TypeName {` (as printed for a whole message) is the same
/// production as any other nested-message field, so it comes out as a single
/// top-level key named after the type.
#[derive(Debug)]
pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    /// Create a parser over `input`.
    pub fn new(input: &str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse the whole input into a document.
    ///
    /// Empty or whitespace-only input parses to an empty document.
    pub fn parse(mut self) -> Result<Document, ParseError> {
        let mut doc = Document::new();
        self.parse_fields(&mut doc, 0)?;
        Ok(doc)
    }

    /// Parse fields until end of scope: a closing brace when nested, end of
    /// input at the top level.
    fn parse_fields(&mut self, doc: &mut Document, depth: usize) -> Result<(), ParseError> {
        loop {
            self.cursor.skip_whitespace();
            match self.cursor.peek() {
                None if depth == 0 => return Ok(()),
                None => return Err(ParseError::UnexpectedEof),
                Some('}') if depth > 0 => return Ok(()),
                Some(c) if is_ident_start(c) => {
                    let name = self.read_identifier();
                    self.parse_field_body(doc, name, depth)?;
                }
                Some(c) => return Err(ParseError::UnexpectedToken(self.cursor.pos(), c)),
            }
        }
    }

    /// Parse what follows a field name: either `: value` or the nested-message
    /// shorthand `{ fields }` with no colon.
    fn parse_field_body(
        &mut self,
        doc: &mut Document,
        name: String,
        depth: usize,
    ) -> Result<(), ParseError> {
        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some(':') => {
                self.cursor.bump();
                self.cursor.skip_whitespace();
                let value = self.parse_value(depth)?;
                doc.set(name, value);
            }
            Some('{') => {
                self.cursor.bump();
                let nested = self.parse_object(depth + 1)?;
                doc.set(name, Value::Object(nested));
            }
            Some(c) => return Err(ParseError::UnexpectedToken(self.cursor.pos(), c)),
            None => return Err(ParseError::UnexpectedEof),
        }
        Ok(())
    }

    /// Parse the fields of a `{ ... }` scope whose opening brace has already
    /// been consumed, then consume the closing brace.
    fn parse_object(&mut self, depth: usize) -> Result<Document, ParseError> {
        let mut doc = Document::new();
        self.parse_fields(&mut doc, depth)?;
        // parse_fields only returns inside a scope when it sees '}'
        let closed = self.cursor.eat('}');
        debug_assert!(closed);
        Ok(doc)
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, ParseError> {
        match self.cursor.peek() {
            None => Err(ParseError::UnexpectedEof),
            Some('"') => Ok(Value::String(self.parse_quoted_string()?)),
            Some('{') => {
                // colon before a nested message is optional
                self.cursor.bump();
                Ok(Value::Object(self.parse_object(depth + 1)?))
            }
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            Some(c) if is_ident_start(c) => {
                let word = self.read_identifier();
                Ok(match word.as_str() {
                    "true" => Value::Bool(true),
                    "false" => Value::Bool(false),
                    "null" => Value::Null,
                    _ => Value::String(word),
                })
            }
            Some(c) => Err(ParseError::UnexpectedToken(self.cursor.pos(), c)),
        }
    }

    /// Parse a quoted string. A backslash takes the next character literally;
    /// no unicode-escape decoding happens at this layer.
    fn parse_quoted_string(&mut self) -> Result<String, ParseError> {
        self.cursor.bump();
        let mut out = String::new();
        loop {
            match self.cursor.bump() {
                None => return Err(ParseError::UnexpectedEof),
                Some('"') => return Ok(out),
                Some('\\') => match self.cursor.bump() {
                    Some(c) => out.push(c),
                    None => return Err(ParseError::UnexpectedEof),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Parse a numeric token, consuming `[0-9.\-+eE]` greedily. The token is
    /// an integer unless it contains `.`, `e` or `E`; malformed tokens like
    /// `1.2.3` or `1e2e3` are rejected rather than truncated.
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let mut token = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') {
                token.push(c);
                self.cursor.bump();
            } else {
                break;
            }
        }

        // A bare sign at end of input is a number that never got its digits.
        if self.cursor.is_eof() && !token.contains(|c: char| c.is_ascii_digit()) {
            return Err(ParseError::UnexpectedEof);
        }

        if token.contains(['.', 'e', 'E']) {
            match token.parse::<f64>() {
                Ok(f) => Ok(Value::Float(f)),
                Err(_) => Err(ParseError::InvalidNumber(token)),
            }
        } else {
            match token.parse::<i64>() {
                Ok(i) => Ok(Value::Int(i)),
                Err(_) => Err(ParseError::InvalidNumber(token)),
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut out = String::new();
        while let Some(c) = self.cursor.peek() {
            if is_ident_char(c) {
                out.push(c);
                self.cursor.bump();
            } else {
                break;
            }
        }
        out
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Document {
        Parser::new(input).parse().unwrap()
    }

    fn parse_err(input: &str) -> ParseError {
        Parser::new(input).parse().unwrap_err()
    }

    #[test]
    fn test_scalar_typing() {
        let doc = parse(r#"a: 123 b: -7 c: 1.5 d: -0.25 e: true f: false g: null h: "x" i: WORD"#);
        assert_eq!(doc.get("a"), Some(&Value::Int(123)));
        assert_eq!(doc.get("b"), Some(&Value::Int(-7)));
        assert_eq!(doc.get("c"), Some(&Value::Float(1.5)));
        assert_eq!(doc.get("d"), Some(&Value::Float(-0.25)));
        assert_eq!(doc.get("e"), Some(&Value::Bool(true)));
        assert_eq!(doc.get("f"), Some(&Value::Bool(false)));
        assert_eq!(doc.get("g"), Some(&Value::Null));
        assert_eq!(doc.get("h"), Some(&Value::String("x".into())));
        assert_eq!(doc.get("i"), Some(&Value::String("WORD".into())));
    }

    #[test]
    fn test_scientific_notation() {
        let doc = parse("a: 1.23e-4 b: 1e10 c: 2E+3");
        assert_eq!(doc.get("a"), Some(&Value::Float(1.23e-4)));
        assert_eq!(doc.get("b"), Some(&Value::Float(1e10)));
        assert_eq!(doc.get("c"), Some(&Value::Float(2e3)));
    }

    #[test]
    fn test_nested_shorthand_without_colon() {
        let doc = parse("address { street: \"Main St\" number: 123 }");
        let address = doc.get("address").and_then(Value::as_object).unwrap();
        assert_eq!(address.get("street"), Some(&Value::String("Main St".into())));
        assert_eq!(address.get("number"), Some(&Value::Int(123)));
    }

    #[test]
    fn test_colon_before_brace_is_optional() {
        let with = parse("a: { b: 1 }");
        let without = parse("a { b: 1 }");
        assert_eq!(with, without);
    }

    #[test]
    fn test_type_prefix() {
        let doc = parse("User { id: 1 }");
        let user = doc.get("User").and_then(Value::as_object).unwrap();
        assert_eq!(user.get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_consecutive_top_level_objects() {
        let doc = parse("first { value: 1 } second { value: 2 }");
        assert_eq!(doc.len(), 2);
        let second = doc.get("second").and_then(Value::as_object).unwrap();
        assert_eq!(second.get("value"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_repeated_fields_accumulate() {
        let doc = parse("items { id: 1 } items { id: 2 } items { id: 3 }");
        let Some(Value::Array(items)) = doc.get("items") else {
            panic!("expected array, got {:?}", doc.get("items"));
        };
        assert_eq!(items.len(), 3);
        assert_eq!(items[1].get("id"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("   \n\t  ").is_empty());
    }

    #[test]
    fn test_empty_nested_object() {
        let doc = parse("data { }");
        let data = doc.get("data").and_then(Value::as_object).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_string_escapes_taken_literally() {
        let doc = parse(r#"msg: "say \"hi\" and a \\ too""#);
        assert_eq!(
            doc.get("msg"),
            Some(&Value::String(r#"say "hi" and a \ too"#.into()))
        );
    }

    #[test]
    fn test_unicode_string_content() {
        let doc = parse("name: \"Hello 世界 🌍\"");
        assert_eq!(doc.get("name"), Some(&Value::String("Hello 世界 🌍".into())));
    }

    #[test]
    fn test_identifiers_with_underscores_and_digits() {
        let doc = parse("user_name2: \"a\" _private: 1");
        assert_eq!(doc.get("user_name2"), Some(&Value::String("a".into())));
        assert_eq!(doc.get("_private"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_whitespace_insensitivity() {
        let tight = parse("a:1 b{c:2}");
        let loose = parse("  a :\n 1\n\n b\t{\n  c : 2\n }  ");
        assert_eq!(tight, loose);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(parse_err("a: \"oops"), ParseError::UnexpectedEof);
        assert_eq!(parse_err("a: \"oops\\"), ParseError::UnexpectedEof);
    }

    #[test]
    fn test_unclosed_object() {
        assert_eq!(parse_err("a { b: 1"), ParseError::UnexpectedEof);
        assert_eq!(parse_err("a { b { c: 1 }"), ParseError::UnexpectedEof);
    }

    #[test]
    fn test_dangling_field_name() {
        assert_eq!(parse_err("a"), ParseError::UnexpectedEof);
        assert_eq!(parse_err("a:"), ParseError::UnexpectedEof);
        assert_eq!(parse_err("a: -"), ParseError::UnexpectedEof);
    }

    #[test]
    fn test_unexpected_token_positions() {
        assert_eq!(parse_err("@"), ParseError::UnexpectedToken(0, '@'));
        assert_eq!(parse_err("a: 1 }"), ParseError::UnexpectedToken(5, '}'));
        assert_eq!(parse_err("a = 1"), ParseError::UnexpectedToken(2, '='));
        assert_eq!(parse_err("a: #"), ParseError::UnexpectedToken(3, '#'));
    }

    #[test]
    fn test_malformed_numbers_rejected() {
        assert_eq!(
            parse_err("a: 1.2.3"),
            ParseError::InvalidNumber("1.2.3".into())
        );
        assert_eq!(
            parse_err("a: 1e2e3"),
            ParseError::InvalidNumber("1e2e3".into())
        );
        assert_eq!(parse_err("a: 1-2"), ParseError::InvalidNumber("1-2".into()));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ParseError::UnexpectedToken(5, '}').to_string(),
            "unexpected character '}' at position 5"
        );
        assert_eq!(
            ParseError::InvalidNumber("1.2.3".into()).to_string(),
            "invalid number \"1.2.3\""
        );
    }
}
