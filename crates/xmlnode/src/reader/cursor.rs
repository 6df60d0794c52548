//! Byte cursor over markup input

use crate::error::Pos;

/// Forward-only cursor with line/column tracking
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
    line: u32,
    col: u32,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    /// Byte under the cursor
    pub fn current(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// True if the unread input begins with `pattern`
    pub fn starts_with(&self, pattern: &[u8]) -> bool {
        self.input
            .get(self.pos..)
            .is_some_and(|rest| rest.starts_with(pattern))
    }

    /// Step over one byte; a `\n` starts a new line
    pub fn advance(&mut self) {
        if let Some(b) = self.current() {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
    }

    /// Step over `n` bytes, stopping at end of input
    pub fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    /// Consume bytes while `pred` holds and return them
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a [u8] {
        let start = self.pos;
        while self.current().is_some_and(&pred) {
            self.advance();
        }
        self.slice_from(start)
    }

    /// Consume through the next `delimiter` and return the bytes before it.
    /// None if the input ends first; the cursor is then at end of input.
    pub fn take_until(&mut self, delimiter: &[u8]) -> Option<&'a [u8]> {
        let start = self.pos;
        while !self.is_eof() {
            if self.starts_with(delimiter) {
                let taken = self.slice_from(start);
                self.advance_by(delimiter.len());
                return Some(taken);
            }
            self.advance();
        }
        None
    }

    /// Skip XML whitespace, returning true if any was skipped
    pub fn skip_whitespace(&mut self) -> bool {
        !self
            .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .is_empty()
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub const fn position(&self) -> Pos {
        Pos::new(self.pos, self.line, self.col)
    }

    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Byte offset of the cursor
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Bytes from `start` up to the cursor
    pub fn slice_from(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}
