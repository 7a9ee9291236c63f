use std::fmt;
use std::io;

use thiserror::Error;

/// 1-based line number within the trace.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Line(pub usize);

/// 1-based position of a word within its line.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Word(pub usize);

/// Location of a word in the trace, used when reporting parse errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cursor(pub Line, pub Word);

impl Cursor {
    /// Position before any word has been read.
    pub(crate) fn start() -> Cursor {
        Cursor(Line(0), Word(0))
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Cursor(Line(line), Word(word)) = self;
        write!(f, "line {line}, word {word}")
    }
}

/// Fatal errors raised while tokenizing or building a trace. Any of these
/// aborts the whole parse.
#[derive(Debug, Error)]
pub enum VcdError {
    /// Malformed input: unterminated command, unknown keyword, bad declaration
    /// or a value change that cannot be decoded.
    #[error("format error at {cursor}: {message}")]
    Format { cursor: Cursor, message: String },

    /// The scope nesting is unbalanced.
    #[error("structural error at {cursor}: {message}")]
    Structural { cursor: Cursor, message: String },

    #[error("failed to read vcd input")]
    Io(#[from] io::Error),
}

impl VcdError {
    pub(crate) fn format(cursor: Cursor, message: impl Into<String>) -> VcdError {
        VcdError::Format {
            cursor,
            message: message.into(),
        }
    }

    pub(crate) fn structural(cursor: Cursor, message: impl Into<String>) -> VcdError {
        VcdError::Structural {
            cursor,
            message: message.into(),
        }
    }
}

/// Errors raised by point-in-time queries on a signal's history.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("signal has no recorded value changes")]
    EmptyTimeline,

    #[error("time {desired_time} precedes the first recorded change at {timeline_start_time}")]
    PreTimeline {
        desired_time: u64,
        timeline_start_time: u64,
    },
}

/// Errors raised while turning an externally supplied pattern description
/// into a [`Pattern`](crate::Pattern).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("`{0}` is neither a scope type nor a signal type")]
    UnknownType(String),
}
