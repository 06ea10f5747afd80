use bytes::Bytes;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

/// A dictionary of decoded values keyed by byte string.
pub type Dictionary<'a> = BTreeMap<ByteStr<'a>, Value<'a>>;

/// A value tree that owns all of its byte strings.
pub type OwnedValue = Value<'static>;

/// The payload of a bencode byte string.
///
/// A byte string is either an independent buffer ([`ByteStr::Owned`]) or a
/// view into the decoded input ([`ByteStr::Borrowed`]). Equality, ordering
/// and hashing only look at the bytes, so an owned and a borrowed string
/// with the same content are interchangeable as dictionary keys.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::ByteStr;
/// use bytes::Bytes;
///
/// let owned = ByteStr::Owned(Bytes::from_static(b"spam"));
/// let borrowed = ByteStr::Borrowed(b"spam");
/// assert_eq!(owned, borrowed);
/// assert!(borrowed.is_borrowed());
/// ```
#[derive(Clone)]
pub enum ByteStr<'a> {
    /// An independent buffer, valid after the input is dropped.
    Owned(Bytes),
    /// A slice of the decoded input.
    Borrowed(&'a [u8]),
}

impl<'a> ByteStr<'a> {
    /// Returns the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            ByteStr::Owned(b) => b,
            ByteStr::Borrowed(s) => s,
        }
    }

    /// Returns true if the bytes are a view into the decoded input.
    pub fn is_borrowed(&self) -> bool {
        matches!(self, ByteStr::Borrowed(_))
    }

    /// Returns the bytes as UTF-8 text, if they are valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_slice()).ok()
    }

    /// Detaches the string from the input, copying borrowed bytes.
    pub fn into_owned(self) -> ByteStr<'static> {
        match self {
            ByteStr::Owned(b) => ByteStr::Owned(b),
            ByteStr::Borrowed(s) => ByteStr::Owned(Bytes::copy_from_slice(s)),
        }
    }

    /// Converts into a `Bytes` buffer, copying borrowed bytes.
    pub fn into_bytes(self) -> Bytes {
        match self {
            ByteStr::Owned(b) => b,
            ByteStr::Borrowed(s) => Bytes::copy_from_slice(s),
        }
    }
}

impl Deref for ByteStr<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for ByteStr<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl Borrow<[u8]> for ByteStr<'_> {
    fn borrow(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for ByteStr<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteStr<'_> {}

impl PartialEq<[u8]> for ByteStr<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.as_slice() == other
    }
}

impl PartialEq<&[u8]> for ByteStr<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.as_slice() == *other
    }
}

impl PartialOrd for ByteStr<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByteStr<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl Hash for ByteStr<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl fmt::Debug for ByteStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "b\"{}\"", self.as_slice().escape_ascii())
    }
}

impl fmt::Display for ByteStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(s) if !s.chars().any(char::is_control) => write!(f, "{:?}", s),
            _ => write!(f, "<{}>", hex_encode(self.as_slice())),
        }
    }
}

impl From<Bytes> for ByteStr<'static> {
    fn from(b: Bytes) -> Self {
        ByteStr::Owned(b)
    }
}

impl<'a> From<&'a [u8]> for ByteStr<'a> {
    fn from(s: &'a [u8]) -> Self {
        ByteStr::Borrowed(s)
    }
}

impl<'a> From<&'a str> for ByteStr<'a> {
    fn from(s: &'a str) -> Self {
        ByteStr::Borrowed(s.as_bytes())
    }
}

/// A bencode value.
///
/// Bencode has four data types: integers, byte strings, lists, and dictionaries.
/// Byte strings are owned or borrowed depending on the
/// [`Representation`](super::Representation) chosen when decoding; a tree
/// decoded in borrowed mode cannot outlive its input.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::Value;
///
/// let int = Value::Integer(42);
/// let string = Value::string("hello");
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// assert_eq!(int.as_integer(), Some(42));
/// assert_eq!(string.as_str(), Some("hello"));
/// assert_eq!(list.as_list().map(|l| l.len()), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<'a> {
    /// A signed 64-bit integer.
    Integer(i64),
    /// A byte string (may or may not be valid UTF-8).
    Bytes(ByteStr<'a>),
    /// An ordered list of values.
    List(Vec<Value<'a>>),
    /// A dictionary with byte string keys.
    Dict(Dictionary<'a>),
}

impl<'a> Value<'a> {
    /// Creates an owned byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Self {
        Value::Bytes(ByteStr::Owned(Bytes::copy_from_slice(s.as_bytes())))
    }

    /// Returns the value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the raw bytes of a byte string value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a valid UTF-8 byte string.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdecode::bencode::decode;
    ///
    /// let value = decode(b"4:spam").unwrap();
    /// assert_eq!(value.as_str(), Some("spam"));
    /// assert_eq!(decode(b"i1e").unwrap().as_str(), None);
    /// ```
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Bytes(b) => b.as_str(),
            _ => None,
        }
    }

    /// Returns the value as a list, if it is one.
    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    /// Returns the value as a dictionary reference, if it is one.
    pub fn as_dict(&self) -> Option<&Dictionary<'a>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Consumes the value and returns the dictionary, if it is one.
    pub fn into_dict(self) -> Option<Dictionary<'a>> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    /// Looks up a key in this value if it is a dictionary.
    ///
    /// # Examples
    ///
    /// ```
    /// use bdecode::bencode::decode;
    ///
    /// let value = decode(b"d3:foo3:bare").unwrap();
    /// assert_eq!(value.get(b"foo").and_then(|v| v.as_str()), Some("bar"));
    /// assert_eq!(value.get(b"missing"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&Value<'a>> {
        self.as_dict()?.get(key)
    }

    /// Returns a short name for the variant, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Bytes(_) => "byte string",
            Value::List(_) => "list",
            Value::Dict(_) => "dictionary",
        }
    }

    /// Returns true if any byte string in the tree borrows from the input.
    pub fn is_borrowed(&self) -> bool {
        match self {
            Value::Integer(_) => false,
            Value::Bytes(b) => b.is_borrowed(),
            Value::List(l) => l.iter().any(Value::is_borrowed),
            Value::Dict(d) => d.iter().any(|(k, v)| k.is_borrowed() || v.is_borrowed()),
        }
    }

    /// Detaches the tree from the input by copying every borrowed string.
    ///
    /// Owned strings are moved, not copied.
    pub fn into_owned(self) -> OwnedValue {
        match self {
            Value::Integer(i) => Value::Integer(i),
            Value::Bytes(b) => Value::Bytes(b.into_owned()),
            Value::List(l) => Value::List(l.into_iter().map(Value::into_owned).collect()),
            Value::Dict(d) => Value::Dict(
                d.into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect(),
            ),
        }
    }
}

impl From<i64> for Value<'_> {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Bytes(ByteStr::from(s))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(s: &'a [u8]) -> Self {
        Value::Bytes(ByteStr::Borrowed(s))
    }
}

impl From<Bytes> for Value<'_> {
    fn from(b: Bytes) -> Self {
        Value::Bytes(ByteStr::Owned(b))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(l: Vec<Value<'a>>) -> Self {
        Value::List(l)
    }
}

impl<'a> From<Dictionary<'a>> for Value<'a> {
    fn from(d: Dictionary<'a>) -> Self {
        Value::Dict(d)
    }
}

/// Renders the tree in a JSON-like notation.
///
/// Byte strings that are printable UTF-8 are quoted; anything else is shown
/// as `<hex>`. The alternate flag (`{:#}`) indents nested containers.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = if f.alternate() { Some(0) } else { None };
        write_value(self, f, indent)
    }
}

fn write_value(value: &Value<'_>, f: &mut fmt::Formatter<'_>, indent: Option<usize>) -> fmt::Result {
    match value {
        Value::Integer(i) => write!(f, "{}", i),
        Value::Bytes(b) => write!(f, "{}", b),
        Value::List(l) if l.is_empty() => f.write_str("[]"),
        Value::Dict(d) if d.is_empty() => f.write_str("{}"),
        Value::List(l) => {
            f.write_str("[")?;
            for (i, item) in l.iter().enumerate() {
                write_separator(f, i, indent)?;
                write_value(item, f, indent.map(|n| n + 1))?;
            }
            write_close(f, indent)?;
            f.write_str("]")
        }
        Value::Dict(d) => {
            f.write_str("{")?;
            for (i, (key, item)) in d.iter().enumerate() {
                write_separator(f, i, indent)?;
                write!(f, "{}: ", key)?;
                write_value(item, f, indent.map(|n| n + 1))?;
            }
            write_close(f, indent)?;
            f.write_str("}")
        }
    }
}

fn write_separator(f: &mut fmt::Formatter<'_>, index: usize, indent: Option<usize>) -> fmt::Result {
    match indent {
        Some(n) => {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "\n{:width$}", "", width = (n + 1) * 2)
        }
        None if index > 0 => f.write_str(", "),
        None => Ok(()),
    }
}

fn write_close(f: &mut fmt::Formatter<'_>, indent: Option<usize>) -> fmt::Result {
    match indent {
        Some(n) => write!(f, "\n{:width$}", "", width = n * 2),
        None => Ok(()),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut s, b| {
        use std::fmt::Write;
        let _ = write!(s, "{:02x}", b);
        s
    })
}
