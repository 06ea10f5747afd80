//! Wire markers and decoder tuning parameters.
//!
//! The markers are the single-byte tokens of the bencode grammar ([BEP-3]).
//! The limits are defaults for [`DecodeOptions`](crate::bencode::DecodeOptions)
//! and for error reporting.
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

// ============================================================================
// Wire markers
// ============================================================================

/// Leading byte of an integer (`i42e`).
pub const INTEGER_START: u8 = b'i';

/// Leading byte of a list (`l...e`).
pub const LIST_START: u8 = b'l';

/// Leading byte of a dictionary (`d...e`).
pub const DICT_START: u8 = b'd';

/// Terminator shared by integers, lists and dictionaries.
pub const END: u8 = b'e';

/// Separates a byte string's length prefix from its payload.
pub const STRING_SEPARATOR: u8 = b':';

/// Sign byte allowed directly after [`INTEGER_START`].
pub const MINUS: u8 = b'-';

// ============================================================================
// Limits
// ============================================================================

/// Default maximum nesting depth of lists and dictionaries.
///
/// Torrent files rarely nest deeper than four or five levels; 64 leaves
/// ample headroom while keeping recursion well inside the default stack.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Number of input bytes quoted in a decode error's detail message.
pub const ERROR_FRAGMENT_LEN: usize = 16;
