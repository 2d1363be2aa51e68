//! # protobuf-debug-to-json
//!
//! A parser that converts protobuf debug strings to json
//!
//! The debug string is the human-readable text representation a protobuf
//! library prints for a message (`DebugString()` / `ShortDebugString()`):
//! field/value pairs separated by whitespace, curly braces for nested
//! messages, no commas. This crate parses that dialect into a dynamically
//! typed [`Document`] tree and renders it as compact JSON.
//!
//! ## Features
//! * No schema or compiled descriptor required
//! * Scalar type inference: integers, floats, booleans, `null`, strings
//! * Repeated fields with the same name are grouped into arrays
//! * Nested messages with or without a colon (`address { ... }`)
//! * Malformed input fails fast with a typed [`ParseError`]
//!
//! ## Limitations
//! * Only the textual debug representation is consumed, never the binary
//!   wire format
//! * No validation against a message definition; unquoted enum values come
//!   out as plain strings
//!
//! ## Examples
//!
//! ``` rust
//! use protobuf_debug_to_json::parse_to_json;
//!
//! let debug = r#"User { id: 123 name: "John Doe" email: "john.doe@example.com" }"#;
//! let json = parse_to_json(debug).unwrap();
//! assert_eq!(
//!     json,
//!     r#"{"User":{"id":123,"name":"John Doe","email":"john.doe@example.com"}}"#
//! );
//! ```
//!
//! The parsed tree can also be inspected directly, or handed to `serde_json`:
//!
//! ``` rust
//! use protobuf_debug_to_json::parse;
//! use serde_json::json;
//!
//! let doc = parse("count: 42 ratio: 3.14").unwrap();
//! assert_eq!(doc.get("count").and_then(|v| v.as_int()), Some(42));
//!
//! let value: serde_json::Value = (&doc).into();
//! assert_eq!(value, json!({"count": 42, "ratio": 3.14}));
//! ```
//!

mod cursor;
mod parser;
mod value;

pub use parser::{ParseError, Parser};
pub use value::{Document, Value};

/// Parse a debug string into a [`Document`] tree.
pub fn parse(debug_string: &str) -> Result<Document, ParseError> {
    Parser::new(debug_string).parse()
}

/// Parse a debug string and render it as compact JSON text.
pub fn parse_to_json(debug_string: &str) -> Result<String, ParseError> {
    Ok(parse(debug_string)?.to_json())
}
