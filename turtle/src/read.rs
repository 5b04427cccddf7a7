use crate::error::{ParseError, ParseErrorKind};
use std::char;
use std::collections::VecDeque;
use std::io;
use std::io::BufRead;
use terrapin_api::parser::{Position, Span};

/// Reads an UTF-8 stream character by character with two characters of
/// lookahead and 1-based line/column tracking.
///
/// Columns count characters, not bytes, so error positions stay meaningful in
/// non-ASCII inputs. Lines are advanced on `\n` only; a `\r\n` pair therefore
/// counts as one line break and one extra column on the old line, which
/// matches how the tokenizer consumes line terminators.
pub struct CharReader<R: BufRead> {
    inner: R,
    pending: VecDeque<char>,
    position: Position,
    eof: bool,
    saw_non_ascii: bool,
}

impl<R: BufRead> CharReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: VecDeque::new(),
            position: Position::new(1, 1),
            eof: false,
            saw_non_ascii: false,
        }
    }

    /// The position of the next character `next` would return.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether any character outside the ASCII range was decoded so far
    /// (including lookahead).
    pub fn saw_non_ascii(&self) -> bool {
        self.saw_non_ascii
    }

    /// The next character, without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>, ParseError> {
        self.fill(1)?;
        Ok(self.pending.front().cloned())
    }

    /// The character after the next one, without consuming anything.
    pub fn peek_next(&mut self) -> Result<Option<char>, ParseError> {
        self.fill(2)?;
        Ok(self.pending.get(1).cloned())
    }

    /// Consumes and returns the next character.
    pub fn next(&mut self) -> Result<Option<char>, ParseError> {
        self.fill(1)?;
        let c = self.pending.pop_front();
        if let Some(c) = c {
            if c == '\n' {
                self.position.line += 1;
                self.position.column = 1;
            } else {
                self.position.column += 1;
            }
        }
        Ok(c)
    }

    fn fill(&mut self, count: usize) -> Result<(), ParseError> {
        while self.pending.len() < count && !self.eof {
            match self.decode_char()? {
                Some(c) => self.pending.push_back(c),
                None => self.eof = true,
            }
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let mut buf = [0u8; 1];
        loop {
            return match self.inner.read(&mut buf) {
                Ok(0) => Ok(None),
                Ok(_) => Ok(Some(buf[0])),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => Err(e.into()),
            };
        }
    }

    fn decode_char(&mut self) -> Result<Option<char>, ParseError> {
        let first = match self.read_byte()? {
            None => return Ok(None),
            Some(b) => b,
        };
        let (len, init) = match first {
            0x00..=0x7F => return Ok(Some(first as char)),
            0xC2..=0xDF => (2, u32::from(first & 0x1F)),
            0xE0..=0xEF => (3, u32::from(first & 0x0F)),
            0xF0..=0xF4 => (4, u32::from(first & 0x07)),
            _ => return Err(self.decoding_error()),
        };
        self.saw_non_ascii = true;
        let mut point = init;
        for _ in 1..len {
            match self.read_byte()? {
                Some(b) if b & 0xC0 == 0x80 => point = (point << 6) | u32::from(b & 0x3F),
                _ => return Err(self.decoding_error()),
            }
        }
        // Reject overlong encodings: they would otherwise alias shorter forms.
        let minimum = match len {
            2 => 0x80,
            3 => 0x800,
            _ => 0x1_0000,
        };
        if point < minimum {
            return Err(self.decoding_error());
        }
        match char::from_u32(point) {
            Some(c) => Ok(Some(c)),
            None => Err(self.decoding_error()),
        }
    }

    fn decoding_error(&self) -> ParseError {
        // The bad sequence sits just past whatever is still buffered.
        let mut position = self.position;
        for c in &self.pending {
            if *c == '\n' {
                position.line += 1;
                position.column = 1;
            } else {
                position.column += 1;
            }
        }
        ParseError::new(ParseErrorKind::InvalidUtf8, Span::point(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_lines_and_columns() {
        let mut read = CharReader::new("ab\ncd".as_bytes());
        assert_eq!(read.position(), Position::new(1, 1));
        assert_eq!(read.next().unwrap(), Some('a'));
        assert_eq!(read.position(), Position::new(1, 2));
        assert_eq!(read.next().unwrap(), Some('b'));
        assert_eq!(read.next().unwrap(), Some('\n'));
        assert_eq!(read.position(), Position::new(2, 1));
        assert_eq!(read.peek().unwrap(), Some('c'));
        assert_eq!(read.peek_next().unwrap(), Some('d'));
        assert_eq!(read.next().unwrap(), Some('c'));
        assert_eq!(read.next().unwrap(), Some('d'));
        assert_eq!(read.next().unwrap(), None);
        assert_eq!(read.next().unwrap(), None);
    }

    #[test]
    fn decodes_multi_byte_sequences() {
        let mut read = CharReader::new("é€𝄞".as_bytes());
        assert_eq!(read.next().unwrap(), Some('é'));
        assert_eq!(read.next().unwrap(), Some('€'));
        assert_eq!(read.next().unwrap(), Some('𝄞'));
        assert_eq!(read.next().unwrap(), None);
    }

    #[test]
    fn rejects_invalid_utf8() {
        let mut read = CharReader::new(&[0x61, 0xFF, 0x62][..]);
        assert_eq!(read.next().unwrap(), Some('a'));
        assert!(read.next().is_err());
    }

    #[test]
    fn rejects_overlong_encodings() {
        // 0xC0 0xAF is an overlong '/'
        let mut read = CharReader::new(&[0xC0, 0xAF][..]);
        assert!(read.next().is_err());
    }

    #[test]
    fn rejects_unpaired_surrogate_encodings() {
        // 0xED 0xA0 0x80 encodes U+D800
        let mut read = CharReader::new(&[0xED, 0xA0, 0x80][..]);
        assert!(read.next().is_err());
    }
}
