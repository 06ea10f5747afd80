//! Bencode decoding ([BEP-3]).
//!
//! Bencode is the serialization format used throughout BitTorrent for
//! `.torrent` files and tracker responses. It has no schema: the first byte of
//! each encoding says which of the four types follows.
//!
//! # Data Types
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` → 42 |
//! | Byte String | `<length>:<data>` | `4:spam` → "spam" |
//! | List | `l<items>e` | `l4:spami42ee` → ["spam", 42] |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` → {"foo": "bar"} |
//!
//! # Examples
//!
//! ## Owned and borrowed trees
//!
//! ```
//! use bdecode::bencode::{decode, decode_borrowed, Value};
//!
//! let input = b"d4:name5:cream5:pricei100ee".to_vec();
//!
//! // Owned: every byte string is copied, the tree outlives `input`.
//! let owned = decode(&input).unwrap();
//!
//! // Borrowed: byte strings are slices of `input`.
//! let borrowed = decode_borrowed(&input).unwrap();
//!
//! assert_eq!(owned, borrowed);
//! assert_eq!(owned.get(b"name").and_then(|v| v.as_str()), Some("cream"));
//! assert_eq!(borrowed.get(b"price"), Some(&Value::Integer(100)));
//! ```
//!
//! ## Options
//!
//! ```
//! use bdecode::bencode::{decode_with, DecodeOptions, ErrorKind, KeyOrder};
//!
//! let options = DecodeOptions::default().with_key_order(KeyOrder::Ascending);
//! let err = decode_with(b"d1:bi1e1:ai2ee", &options).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::UnsortedKeys);
//! ```
//!
//! # Error Handling
//!
//! Every failure is a [`DecodeError`] with an [`ErrorKind`], the byte offset
//! where it was detected and the containers it occurred in:
//!
//! ```
//! use bdecode::bencode::{decode, ErrorKind};
//!
//! let err = decode(b"d4:name5:creami23ei100ee").unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::InvalidKeyType);
//! assert_eq!(err.offset(), 14);
//! ```
//!
//! Lists and dictionaries nest at most [`DecodeOptions::max_depth`] levels
//! (64 by default) before decoding fails with [`ErrorKind::NestingTooDeep`].
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html

mod decode;
mod error;
mod options;
mod value;

pub use decode::{decode, decode_borrowed, decode_shared, decode_with, Decoder};
pub use error::{DecodeError, ErrorKind, Frame};
pub use options::{DecodeOptions, DuplicateKeys, KeyOrder, Representation};
pub use value::{ByteStr, Dictionary, OwnedValue, Value};
