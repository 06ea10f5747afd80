use crate::constants::DEFAULT_MAX_DEPTH;

/// How decoded byte strings hold their bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Representation {
    /// Copy each payload into its own buffer. The tree outlives the input.
    #[default]
    Owned,
    /// Slice payloads out of the input without copying.
    Borrowed,
}

/// What to do when a dictionary repeats a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateKeys {
    /// Fail with [`ErrorKind::DuplicateKey`](super::ErrorKind::DuplicateKey).
    #[default]
    Reject,
    /// Keep the value of the first occurrence.
    FirstWins,
    /// Keep the value of the last occurrence.
    LastWins,
}

/// Whether dictionary keys must appear in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// Accept keys in any order.
    #[default]
    Any,
    /// Require strictly ascending raw byte order.
    Ascending,
}

/// Options for a single decode call.
///
/// The defaults accept any well-formed input: owned byte strings, a nesting
/// limit of [`DEFAULT_MAX_DEPTH`], keys in any order, and duplicate keys
/// rejected. [`DecodeOptions::strict`] additionally enforces the canonical
/// form.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode_with, DecodeOptions, DuplicateKeys, ErrorKind};
///
/// let options = DecodeOptions::default().with_duplicate_keys(DuplicateKeys::LastWins);
/// let value = decode_with(b"d1:ai1e1:ai2ee", &options).unwrap();
/// assert_eq!(value.get(b"a").and_then(|v| v.as_integer()), Some(2));
///
/// let err = decode_with(b"i03e", &DecodeOptions::strict()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::MalformedInteger);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    pub representation: Representation,
    /// Deepest allowed list/dictionary nesting. Zero permits only a top-level scalar.
    pub max_depth: usize,
    pub duplicate_keys: DuplicateKeys,
    pub key_order: KeyOrder,
    /// Reject leading zeros in integers and string lengths, and `i-0e`.
    pub canonical_numbers: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            representation: Representation::Owned,
            max_depth: DEFAULT_MAX_DEPTH,
            duplicate_keys: DuplicateKeys::Reject,
            key_order: KeyOrder::Any,
            canonical_numbers: false,
        }
    }
}

impl DecodeOptions {
    /// Options that accept only canonical bencode.
    pub fn strict() -> Self {
        Self {
            duplicate_keys: DuplicateKeys::Reject,
            key_order: KeyOrder::Ascending,
            canonical_numbers: true,
            ..Self::default()
        }
    }

    /// Default options with borrowed byte strings.
    pub fn borrowed() -> Self {
        Self::default().with_representation(Representation::Borrowed)
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_duplicate_keys(mut self, policy: DuplicateKeys) -> Self {
        self.duplicate_keys = policy;
        self
    }

    pub fn with_key_order(mut self, order: KeyOrder) -> Self {
        self.key_order = order;
        self
    }

    pub fn with_canonical_numbers(mut self, canonical: bool) -> Self {
        self.canonical_numbers = canonical;
        self
    }
}
