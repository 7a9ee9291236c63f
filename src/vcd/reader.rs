use std::collections::VecDeque;
use std::io;
use std::io::prelude::*;

use super::errors::{Cursor, Line, VcdError, Word};

/// Splits a byte stream into whitespace separated words, remembering where
/// each word came from.
pub(crate) struct WordReader<R: Read> {
    reader: io::BufReader<R>,
    eof: bool,
    buffer: Vec<u8>,
    curr_line: usize,
    words: VecDeque<(String, Cursor)>,
    curr_cursor: Cursor,
}

impl<R: Read> WordReader<R> {
    pub(crate) fn new(reader: R) -> WordReader<R> {
        WordReader {
            reader: io::BufReader::new(reader),
            eof: false,
            buffer: Vec::new(),
            curr_line: 0,
            words: VecDeque::new(),
            curr_cursor: Cursor::start(),
        }
    }

    /// Returns the next word, or `None` once the input is exhausted. A line
    /// that is not valid UTF-8 is a format error.
    pub(crate) fn next_word(&mut self) -> Result<Option<(String, Cursor)>, VcdError> {
        // keep pulling lines until we find one that isn't blank
        while self.words.is_empty() {
            if self.eof {
                return Ok(None);
            }

            self.buffer.clear();
            let bytes_read = self.reader.read_until(b'\n', &mut self.buffer)?;
            if bytes_read == 0 {
                self.eof = true;
                return Ok(None);
            }
            self.curr_line += 1;

            let line = std::str::from_utf8(&self.buffer).map_err(|err| {
                VcdError::format(
                    Cursor(Line(self.curr_line), Word(1)),
                    format!("line is not valid utf-8 ({err})"),
                )
            })?;
            for (word_idx, word) in line.split_ascii_whitespace().enumerate() {
                let position = Cursor(Line(self.curr_line), Word(word_idx + 1));
                self.words.push_back((word.to_string(), position));
            }
        }

        let next = self.words.pop_front();
        if let Some((_, cursor)) = &next {
            self.curr_cursor = *cursor;
        }
        Ok(next)
    }

    /// Location of the most recently returned word.
    pub(crate) fn cursor(&self) -> Cursor {
        self.curr_cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn words_carry_line_and_position() {
        let input = "$scope module top $end\n\n  #10\n1!";
        let mut reader = WordReader::new(input.as_bytes());

        let mut words = vec![];
        while let Some(word) = reader.next_word().unwrap() {
            words.push(word);
        }

        assert_eq!(words.len(), 6);
        assert_eq!(words[2], ("top".to_string(), Cursor(Line(1), Word(3))));
        assert_eq!(words[4], ("#10".to_string(), Cursor(Line(3), Word(1))));
        assert_eq!(words[5], ("1!".to_string(), Cursor(Line(4), Word(1))));
        assert_eq!(reader.cursor(), Cursor(Line(4), Word(1)));
    }

    #[test]
    fn invalid_utf8_is_a_format_error() {
        let input: &[u8] = b"$var wire 1 ! a $end\n1\xff\n";
        let mut reader = WordReader::new(input);
        for _ in 0..6 {
            assert!(reader.next_word().unwrap().is_some());
        }
        match reader.next_word() {
            Err(VcdError::Format { cursor, .. }) => {
                assert_eq!(cursor, Cursor(Line(2), Word(1)))
            }
            other => panic!("expected a format error, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_has_no_words() {
        let mut reader = WordReader::new("   \n\n".as_bytes());
        assert!(reader.next_word().unwrap().is_none());
        assert!(reader.next_word().unwrap().is_none());
    }
}
