//! Dynamically typed value tree and JSON serializer.

/// Dynamically typed value produced by parsing a debug string.
///
/// Mirrors the JSON data model, except that arrays only ever hold objects:
/// the debug-string grammar produces arrays solely for repeated sub-messages,
/// never for repeated scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The `null` keyword.
    Null,

    /// The `true` or `false` keyword.
    Bool(bool),

    /// A numeric token without `.`, `e` or `E`.
    Int(i64),

    /// A numeric token with a decimal point or exponent.
    Float(f64),

    /// A quoted string, or a bare identifier that is not a keyword.
    String(String),

    /// A nested `{ ... }` message.
    Object(Document),

    /// A field name repeated at the same nesting depth.
    Array(Vec<Document>),
}

impl Value {
    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get as float.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as a nested object.
    pub fn as_object(&self) -> Option<&Document> {
        match self {
            Value::Object(doc) => Some(doc),
            _ => None,
        }
    }

    /// Render this value as compact JSON text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        match self {
            Value::Null => out.push_str("null"),
            Value::Bool(true) => out.push_str("true"),
            Value::Bool(false) => out.push_str("false"),
            Value::Int(i) => out.push_str(&i.to_string()),
            // `Display` for f64 is the shortest representation that
            // round-trips, which is all the output contract asks for.
            // Overflowed tokens like `1e999` saturate to infinity when
            // parsed; JSON has no rendering for that, so follow serde_json
            // and emit null.
            Value::Float(f) if !f.is_finite() => out.push_str("null"),
            Value::Float(f) => out.push_str(&f.to_string()),
            Value::String(s) => write_json_string(s, out),
            Value::Object(doc) => doc.write_json(out),
            Value::Array(items) => {
                out.push('[');
                for (i, doc) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    doc.write_json(out);
                }
                out.push(']');
            }
        }
    }
}

/// Escape a string per the JSON grammar and append it, quotes included.
///
/// Quotes and backslashes must be escaped; control characters are escaped as
/// well so the output is always parseable JSON even when the source string
/// carried a raw newline or tab.
fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
}

/// An object: an insertion-ordered mapping of field name to [`Value`].
///
/// The root of every parse is a `Document`, and every nested `{ ... }` message
/// is one too. Keys are unique; the backing store is a plain vector of pairs
/// so that serialization reproduces the order fields appeared in the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, Value)>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, preserving insertion order.
    ///
    /// Re-inserting an existing key accumulates rather than overwrites when
    /// both the old and new values are objects: the slot is promoted to an
    /// [`Value::Array`] and the new object appended, matching protobuf
    /// repeated-field semantics. Repeated scalar values have no array
    /// representation in this model, so the last one wins.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) else {
            self.entries.push((key, value));
            return;
        };
        let slot = &mut self.entries[idx].1;
        match (std::mem::replace(slot, Value::Null), value) {
            (Value::Array(mut items), Value::Object(doc)) => {
                items.push(doc);
                *slot = Value::Array(items);
            }
            (Value::Object(first), Value::Object(doc)) => {
                *slot = Value::Array(vec![first, doc]);
            }
            (_, value) => *slot = value,
        }
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the document has no fields.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render this document as compact JSON text.
    pub fn to_json(&self) -> String {
        let mut out = String::new();
        self.write_json(&mut out);
        out
    }

    fn write_json(&self, out: &mut String) {
        out.push('{');
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_json_string(key, out);
            out.push(':');
            value.write_json(out);
        }
        out.push('}');
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Object(doc) => doc.into(),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Into::into).collect())
            }
        }
    }
}

impl From<&Document> for serde_json::Value {
    fn from(doc: &Document) -> Self {
        let mut map = serde_json::Map::new();
        for (key, value) in doc.iter() {
            map.insert(key.to_string(), value.into());
        }
        serde_json::Value::Object(map)
    }
}
