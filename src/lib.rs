//! bdecode - A bencode decoder
//!
//! This library decodes the bencode format used by BitTorrent metadata files
//! into a typed value tree, with either owned or zero-copy byte strings.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode decoding, value model and decode errors
//! - [`load`] - Reading and decoding bencoded files
//! - [`constants`] - Wire markers and default limits

pub mod bencode;
pub mod constants;
pub mod load;

pub use bencode::{
    decode, decode_borrowed, decode_shared, decode_with, ByteStr, DecodeError, DecodeOptions,
    Decoder, DuplicateKeys, ErrorKind, KeyOrder, OwnedValue, Representation, Value,
};
pub use load::{load_file, LoadError};
