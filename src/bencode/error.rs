use std::fmt;

use thiserror::Error;

use super::value::ByteStr;
use crate::constants::ERROR_FRAGMENT_LEN;

/// The category of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ErrorKind {
    /// Decoding was attempted on an empty range.
    #[error("empty input")]
    EmptyInput,

    /// The leading byte is not `i`, `l`, `d` or a digit.
    #[error("unexpected leading byte")]
    UnexpectedLeadByte,

    /// An integer is not of the form `i-?[0-9]+e`.
    #[error("malformed integer")]
    MalformedInteger,

    /// An integer has no digits (`ie`, `i-e`).
    #[error("missing integer digits")]
    MissingDigits,

    /// An integer or string length does not fit its numeric type.
    #[error("numeric overflow")]
    NumericOverflow,

    /// The input ended before an integer's `e`.
    #[error("unterminated integer")]
    UnterminatedInteger,

    /// A byte string does not start with a length prefix.
    #[error("missing string length")]
    MissingLength,

    /// A string length is not followed by `:`.
    #[error("missing string separator")]
    MissingSeparator,

    /// A string length has a redundant leading zero.
    #[error("non-canonical string length")]
    NonCanonicalLength,

    /// Fewer payload bytes remain than the length prefix announces.
    #[error("truncated string payload")]
    TruncatedPayload,

    /// The input ended before a list's `e`.
    #[error("unterminated list")]
    UnterminatedList,

    /// The input ended before a dictionary's `e`.
    #[error("unterminated dictionary")]
    UnterminatedDictionary,

    /// A dictionary key position does not hold a byte string.
    #[error("invalid dictionary key type")]
    InvalidKeyType,

    /// A dictionary key appears more than once.
    #[error("duplicate dictionary key")]
    DuplicateKey,

    /// A dictionary key is not greater than the key before it.
    #[error("unsorted dictionary keys")]
    UnsortedKeys,

    /// Bytes remain after the top-level value.
    #[error("trailing data after value")]
    TrailingData,

    /// Lists and dictionaries nest deeper than the configured limit.
    #[error("nesting too deep")]
    NestingTooDeep,
}

/// An enclosing container of a failed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Element `index` of the list starting at `offset`.
    List { offset: usize, index: usize },
    /// An entry of the dictionary starting at `offset`; `key` is `None`
    /// when the key itself failed to decode.
    Dict {
        offset: usize,
        key: Option<ByteStr<'static>>,
    },
}

impl Frame {
    /// Byte offset of the container's leading marker.
    pub fn offset(&self) -> usize {
        match self {
            Frame::List { offset, .. } | Frame::Dict { offset, .. } => *offset,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::List { offset, index } => {
                write!(f, "list at byte {}, element {}", offset, index)
            }
            Frame::Dict {
                offset,
                key: Some(key),
            } => write!(f, "dictionary at byte {}, key {}", offset, key),
            Frame::Dict { offset, key: None } => {
                write!(f, "dictionary at byte {}, reading a key", offset)
            }
        }
    }
}

/// A failed decode.
///
/// Carries the failure [`ErrorKind`], the byte offset where it was detected,
/// a message quoting the offending input and the chain of containers the
/// failing value sits in (outermost first).
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode, ErrorKind};
///
/// let err = decode(b"l4:spami42x").unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::MalformedInteger);
/// assert_eq!(err.offset(), 10);
/// assert_eq!(err.context().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset}: {detail}{}", render_context(.context))]
pub struct DecodeError {
    kind: ErrorKind,
    offset: usize,
    detail: String,
    context: Vec<Frame>,
}

impl DecodeError {
    pub(crate) fn new(kind: ErrorKind, offset: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            offset,
            detail: detail.into(),
            context: Vec::new(),
        }
    }

    /// Builds an error whose detail quotes the input around `offset`.
    pub(crate) fn at(kind: ErrorKind, data: &[u8], offset: usize, message: &str) -> Self {
        let detail = if offset < data.len() {
            format!("{} near \"{}\"", message, fragment(data, offset))
        } else {
            format!("{} at end of input", message)
        };
        Self::new(kind, offset, detail)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Byte offset in the input where the failure was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Enclosing containers, outermost first.
    pub fn context(&self) -> &[Frame] {
        &self.context
    }

    /// Records that the failing value sits inside `frame`.
    pub(crate) fn within(mut self, frame: Frame) -> Self {
        self.context.insert(0, frame);
        self
    }
}

fn fragment(data: &[u8], offset: usize) -> String {
    let end = data.len().min(offset + ERROR_FRAGMENT_LEN);
    let mut quoted = data[offset..end].escape_ascii().to_string();
    if end < data.len() {
        quoted.push_str("...");
    }
    quoted
}

fn render_context(context: &[Frame]) -> String {
    context
        .iter()
        .rev()
        .map(|frame| format!(" (in {})", frame))
        .collect()
}
