//! Position-tracking cursor over the input text.
//!
//! All bounds checks live here; the parser only ever asks `peek`, `bump` and
//! `skip_whitespace` questions and never touches indices itself.

/// Character cursor with a current position.
///
/// Works on decoded characters rather than bytes so that multi-byte content
/// inside quoted strings never splits, and so error positions count
/// characters the way a human reading the input would.
#[derive(Debug, Clone)]
pub struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    /// Create a cursor at the start of `input`.
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Current character position, counted from zero.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Whether the cursor has consumed all input.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Look at the current character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Consume and return the current character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume the current character when it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skip past any run of whitespace.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }
}
