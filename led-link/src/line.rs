//! Splits the radio byte stream into `\r`/`\n` terminated lines.

use crate::config::LINE_CAPACITY;

/// Payload bytes a line may hold; the last slot of `LINE_CAPACITY` is the terminator's.
pub const LINE_MAX: usize = LINE_CAPACITY - 1;

#[derive(Debug, PartialEq, Eq)]
pub enum LineEvent<'a> {
    None,
    Complete(&'a [u8]),
    /// The in-progress line was dropped, along with the byte that did not fit.
    Overflow,
}

pub struct LineAssembler {
    buf: [u8; LINE_MAX],
    len: usize,
}

impl LineAssembler {
    pub const fn new() -> Self {
        Self {
            buf: [0; LINE_MAX],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// Empty lines (the `\n` of a `\r\n` pair) complete nothing.
    pub fn feed(&mut self, byte: u8) -> LineEvent<'_> {
        if byte == b'\r' || byte == b'\n' {
            if self.len == 0 {
                return LineEvent::None;
            }
            let complete_len = self.len;
            self.len = 0;
            return LineEvent::Complete(&self.buf[..complete_len]);
        }

        if self.len < LINE_MAX {
            self.buf[self.len] = byte;
            self.len += 1;
            return LineEvent::None;
        }

        self.len = 0;
        warn!("Command buffer overflow, resetting...");
        LineEvent::Overflow
    }
}

impl Default for LineAssembler {
    fn default() -> Self {
        Self::new()
    }
}
