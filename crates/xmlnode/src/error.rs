//! Error types for xmlnode
//!
//! Every failure of a conversion call is reported as one [`Error`]. The error
//! records which direction of the conversion failed ([`Stage`]), what went
//! wrong ([`ErrorKind`]) and, for reader failures, where in the input it went
//! wrong ([`Span`]).

use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    /// True for spans that carry no source location
    pub const fn is_empty(&self) -> bool {
        self.start.line == 0 && self.end.line == 0
    }
}

/// Direction of the conversion that failed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// XML to node
    Decode,
    /// Node to XML
    Encode,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode => write!(f, "decode"),
            Self::Encode => write!(f, "encode"),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidToken,
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    InvalidEntity { entity: String },
    InvalidUtf8,
    NoRootElement,
    MaxDepthExceeded { max: usize },
    MaxChildCountExceeded { max: usize },
    MaxStringLengthExceeded { max: usize },
    InvalidName { name: String },
    UnbalancedWrite,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "invalid token"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::InvalidEntity { entity } => write!(f, "invalid xml entity: &{entity};"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::NoRootElement => write!(f, "document has no root element"),
            Self::MaxDepthExceeded { max } => {
                write!(f, "nesting depth exceeds limit: {max}")
            }
            Self::MaxChildCountExceeded { max } => {
                write!(f, "child count exceeds limit: {max}")
            }
            Self::MaxStringLengthExceeded { max } => {
                write!(f, "string length exceeds limit: {max}")
            }
            Self::InvalidName { name } => write!(f, "invalid xml name: {name:?}"),
            Self::UnbalancedWrite => write!(f, "end tag written without a matching start tag"),
            Self::Io => write!(f, "i/o error"),
        }
    }
}

/// Main error type for xmlnode
#[derive(Error, Clone, Debug)]
pub struct Error {
    stage: Stage,
    kind: ErrorKind,
    span: Span,
    message: String,
    #[source]
    source: Option<Arc<io::Error>>,
}

impl Error {
    pub fn new(stage: Stage, kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            stage,
            kind,
            span,
            message,
            source: None,
        }
    }

    pub fn with_message(
        stage: Stage,
        kind: ErrorKind,
        span: Span,
        message: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            kind,
            span,
            message: message.into(),
            source: None,
        }
    }

    /// Decode-side error without a source location
    pub fn decode(kind: ErrorKind) -> Self {
        Self::new(Stage::Decode, kind, Span::empty())
    }

    /// Encode-side error without a source location
    pub fn encode(kind: ErrorKind) -> Self {
        Self::new(Stage::Encode, kind, Span::empty())
    }

    /// Wrap an I/O failure that happened while reading or writing
    pub fn io(stage: Stage, err: io::Error, context: impl fmt::Display) -> Self {
        Self {
            stage,
            kind: ErrorKind::Io,
            span: Span::empty(),
            message: format!("{context}: {err}"),
            source: Some(Arc::new(err)),
        }
    }

    /// Create error at specific position
    pub fn at(stage: Stage, kind: ErrorKind, offset: usize, line: u32, col: u32) -> Self {
        let pos = Pos::new(offset, line, col);
        Self::new(stage, kind, Span::at(pos))
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_decode(&self) -> bool {
        self.stage == Stage::Decode
    }

    pub fn is_encode(&self) -> bool {
        self.stage == Stage::Encode
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.is_empty() {
            write!(f, "{} error: {}", self.stage, self.message)
        } else {
            write!(
                f,
                "{} error at {}: {}",
                self.stage, self.span.start, self.message
            )
        }
    }
}

/// Result type alias for xmlnode
pub type Result<T> = std::result::Result<T, Error>;

/// Rejected [`Options`](crate::Options) value
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum OptionsError {
    #[error("{field} must be a valid xml name, got {value:?}")]
    InvalidName { field: &'static str, value: String },
}
