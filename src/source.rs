//! Byte input with line tracking and a small pushback buffer.

use std::io::{BufReader, Bytes, Read};

/// Deepest pushback any scan path needs (malformed character constants).
const PUSHBACK_DEPTH: usize = 2;

/// Buffered byte reader that counts lines and lets the scanner return
/// characters it read ahead.
pub struct CharacterSource<R> {
    bytes: Bytes<BufReader<R>>,
    pending: Vec<u8>,
    line: usize,
    exhausted: bool,
}

impl<R: Read> CharacterSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            bytes: BufReader::new(reader).bytes(),
            pending: Vec::with_capacity(PUSHBACK_DEPTH),
            line: 1,
            exhausted: false,
        }
    }

    /// Consume the next byte. `None` means end of stream.
    pub fn next(&mut self) -> Option<u8> {
        let ch = match self.pending.pop() {
            Some(ch) => Some(ch),
            None => self.read_byte(),
        };
        if ch == Some(b'\n') {
            self.line += 1;
        }
        ch
    }

    /// Make `ch` the next byte returned by [`next`](Self::next).
    ///
    /// Bytes pushed back in sequence are returned last-in first-out.
    /// Pushing back end of stream does nothing.
    pub fn pushback(&mut self, ch: Option<u8>) {
        let Some(ch) = ch else {
            return;
        };
        debug_assert!(
            self.pending.len() < PUSHBACK_DEPTH,
            "pushback deeper than {PUSHBACK_DEPTH}"
        );
        if ch == b'\n' {
            self.line -= 1;
        }
        self.pending.push(ch);
    }

    /// Current 1-based line.
    pub const fn line(&self) -> usize {
        self.line
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.exhausted {
            return None;
        }
        match self.bytes.next() {
            Some(Ok(b)) => Some(b),
            Some(Err(e)) => {
                tracing::warn!(
                    line = self.line,
                    error = %e,
                    "read failed, treating as end of input"
                );
                self.exhausted = true;
                None
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn reads_and_counts_lines() {
        let mut src = CharacterSource::new("a\nb".as_bytes());
        assert_eq!(src.next(), Some(b'a'));
        assert_eq!(src.line(), 1);
        assert_eq!(src.next(), Some(b'\n'));
        assert_eq!(src.line(), 2);
        assert_eq!(src.next(), Some(b'b'));
        assert_eq!(src.next(), None);
        assert_eq!(src.next(), None);
    }

    #[test]
    fn pushback_newline_restores_line() {
        let mut src = CharacterSource::new("\nx".as_bytes());
        let nl = src.next();
        assert_eq!(src.line(), 2);
        src.pushback(nl);
        assert_eq!(src.line(), 1);
        assert_eq!(src.next(), Some(b'\n'));
        assert_eq!(src.line(), 2);
    }

    #[test]
    fn two_pushbacks_replay_in_order() {
        let mut src = CharacterSource::new("ab;".as_bytes());
        let a = src.next();
        let b = src.next();
        src.pushback(b);
        src.pushback(a);
        assert_eq!(src.next(), Some(b'a'));
        assert_eq!(src.next(), Some(b'b'));
        assert_eq!(src.next(), Some(b';'));
    }

    #[test]
    fn pushback_end_of_stream_is_noop() {
        let mut src = CharacterSource::new("".as_bytes());
        let end = src.next();
        src.pushback(end);
        assert_eq!(src.next(), None);
        assert_eq!(src.line(), 1);
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn read_error_ends_stream() {
        let mut src = CharacterSource::new(FailingReader);
        assert_eq!(src.next(), None);
        assert_eq!(src.next(), None);
    }
}
