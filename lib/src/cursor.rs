/// A cursor over the pattern source, shared by every parser in the crate.
///
/// Each parser consumes the text of the construct it recognizes and leaves
/// the cursor on the first character it does not understand.
#[derive(Clone)]
pub(crate) struct Cursor<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    /// The whole pattern text.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// The text that has not been consumed yet.
    pub fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Byte position of the next unconsumed character.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Moves the cursor back to `pos`. Used when a group body has to be
    /// compiled more than once.
    pub fn set_pos(&mut self, pos: usize) {
        debug_assert!(self.source.is_char_boundary(pos));
        self.pos = pos;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The character after the next one.
    pub fn second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Consumes and returns the next character.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consumes the next character if it equals `ch`.
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.bump();
            true
        } else {
            false
        }
    }
}
