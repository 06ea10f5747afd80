use super::error::{DecodeError, ErrorKind, Frame};
use super::options::{DecodeOptions, DuplicateKeys, KeyOrder, Representation};
use super::value::{ByteStr, Dictionary, OwnedValue, Value};
use crate::constants::{DICT_START, END, INTEGER_START, LIST_START, MINUS, STRING_SEPARATOR};
use bytes::Bytes;
use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::ops::Range;
use tracing::{debug, trace};

/// Decodes a complete bencode value into an owned tree.
///
/// Uses [`DecodeOptions::default`]. The whole input must be consumed.
///
/// # Errors
///
/// Returns a [`DecodeError`] if the input is empty, malformed, nested deeper
/// than the default limit, repeats a dictionary key, or has bytes left over
/// after the value.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode, ErrorKind, Value};
///
/// assert_eq!(decode(b"i9123e").unwrap(), Value::Integer(9123));
/// assert_eq!(decode(b"i1ei2e").unwrap_err().kind(), ErrorKind::TrailingData);
/// ```
pub fn decode(data: &[u8]) -> Result<OwnedValue, DecodeError> {
    decode_with(data, &DecodeOptions::default()).map(Value::into_owned)
}

/// Decodes a complete bencode value without copying byte strings.
///
/// Every byte string in the returned tree is a slice of `data`.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::decode_borrowed;
///
/// let input = b"l5:jelly4:cakee".to_vec();
/// let value = decode_borrowed(&input).unwrap();
/// assert!(value.is_borrowed());
/// assert_eq!(value.as_list().unwrap()[1].as_str(), Some("cake"));
/// ```
pub fn decode_borrowed(data: &[u8]) -> Result<Value<'_>, DecodeError> {
    decode_with(data, &DecodeOptions::borrowed())
}

/// Decodes a complete bencode value with explicit options.
///
/// The returned tree borrows from `data` only when `options.representation`
/// is [`Representation::Borrowed`].
pub fn decode_with<'a>(data: &'a [u8], options: &DecodeOptions) -> Result<Value<'a>, DecodeError> {
    trace!(
        len = data.len(),
        representation = ?options.representation,
        "decoding bencode"
    );
    let result = decode_all(Decoder::new(data, options));
    log_outcome(&result, data.len());
    result
}

/// Decodes a complete bencode value held in a shared buffer.
///
/// Byte strings in the returned tree are [`Bytes`] slices of `data`, so the
/// tree owns its strings without copying them. `options.representation` is
/// ignored.
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{decode_shared, DecodeOptions};
/// use bytes::Bytes;
///
/// let data = Bytes::from_static(b"d4:name5:creame");
/// let value = decode_shared(&data, &DecodeOptions::default()).unwrap();
/// drop(data);
/// assert_eq!(value.get(b"name").and_then(|v| v.as_str()), Some("cream"));
/// ```
pub fn decode_shared(data: &Bytes, options: &DecodeOptions) -> Result<OwnedValue, DecodeError> {
    trace!(len = data.len(), "decoding shared bencode buffer");
    let result = decode_all(Decoder::shared(data, options));
    log_outcome(&result, data.len());
    result.map(Value::into_owned)
}

fn decode_all<'a>(mut decoder: Decoder<'a, '_>) -> Result<Value<'a>, DecodeError> {
    let value = decoder.decode_value()?;
    decoder.finish()?;
    Ok(value)
}

fn log_outcome(result: &Result<Value<'_>, DecodeError>, len: usize) {
    match result {
        Ok(value) => trace!(len, kind = value.kind_name(), "decoded bencode value"),
        Err(err) => debug!(
            kind = ?err.kind(),
            offset = err.offset(),
            len,
            "bencode decode failed"
        ),
    }
}

/// A cursor over a bencode buffer.
///
/// Each `decode_*` method decodes one value starting at the current position
/// and leaves the cursor immediately after it. On failure the cursor is left
/// where it was. Trailing bytes are only checked by [`Decoder::finish`].
///
/// # Examples
///
/// ```
/// use bdecode::bencode::{DecodeOptions, Decoder};
///
/// let options = DecodeOptions::default();
/// let mut decoder = Decoder::new(b"12:hello world!i7e", &options);
/// let text = decoder.decode_byte_string().unwrap();
/// assert_eq!(&*text, b"hello world!");
/// assert_eq!(decoder.position(), 15);
///
/// assert_eq!(decoder.decode_integer().unwrap().as_integer(), Some(7));
/// assert!(decoder.finish().is_ok());
/// ```
pub struct Decoder<'a, 'o> {
    data: &'a [u8],
    pos: usize,
    options: &'o DecodeOptions,
    shared: Option<&'a Bytes>,
}

impl<'a, 'o> Decoder<'a, 'o> {
    pub fn new(data: &'a [u8], options: &'o DecodeOptions) -> Self {
        Self {
            data,
            pos: 0,
            options,
            shared: None,
        }
    }

    fn shared(data: &'a Bytes, options: &'o DecodeOptions) -> Self {
        Self {
            data: &data[..],
            pos: 0,
            options,
            shared: Some(data),
        }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Checks that the whole input has been consumed.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.is_at_end() {
            return Ok(());
        }
        let message = format!("{} unconsumed bytes", self.data.len() - self.pos);
        Err(self.error(ErrorKind::TrailingData, self.pos, &message))
    }

    /// Decodes whichever value starts at the cursor.
    pub fn decode_value(&mut self) -> Result<Value<'a>, DecodeError> {
        self.restoring(|d| d.value(0))
    }

    /// Decodes an integer (`i<digits>e`).
    pub fn decode_integer(&mut self) -> Result<Value<'a>, DecodeError> {
        self.restoring(Self::integer)
    }

    /// Decodes a byte string (`<length>:<payload>`).
    pub fn decode_byte_string(&mut self) -> Result<ByteStr<'a>, DecodeError> {
        self.restoring(Self::byte_string)
    }

    /// Decodes a list (`l<values>e`).
    pub fn decode_list(&mut self) -> Result<Value<'a>, DecodeError> {
        self.restoring(|d| d.list(0))
    }

    /// Decodes a dictionary (`d<key><value>...e`).
    pub fn decode_dict(&mut self) -> Result<Value<'a>, DecodeError> {
        self.restoring(|d| d.dict(0))
    }

    fn restoring<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, DecodeError>,
    ) -> Result<T, DecodeError> {
        let start = self.pos;
        let result = f(self);
        if result.is_err() {
            self.pos = start;
        }
        result
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn error(&self, kind: ErrorKind, offset: usize, message: &str) -> DecodeError {
        DecodeError::at(kind, self.data, offset, message)
    }

    fn skip_digits(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    /// `depth` is the number of containers enclosing the value.
    fn value(&mut self, depth: usize) -> Result<Value<'a>, DecodeError> {
        match self.peek() {
            None => Err(self.error(ErrorKind::EmptyInput, self.pos, "expected a value")),
            Some(INTEGER_START) => self.integer(),
            Some(LIST_START) => self.list(depth),
            Some(DICT_START) => self.dict(depth),
            Some(b'0'..=b'9') => self.byte_string().map(Value::Bytes),
            Some(c) => {
                let message = format!("byte 0x{:02x} does not start a value", c);
                Err(self.error(ErrorKind::UnexpectedLeadByte, self.pos, &message))
            }
        }
    }

    fn integer(&mut self) -> Result<Value<'a>, DecodeError> {
        match self.peek() {
            None => {
                return Err(self.error(ErrorKind::EmptyInput, self.pos, "expected an integer"));
            }
            Some(INTEGER_START) => {}
            Some(_) => {
                return Err(self.error(
                    ErrorKind::MalformedInteger,
                    self.pos,
                    "expected 'i' to start an integer",
                ));
            }
        }
        self.pos += 1;

        let negative = self.peek() == Some(MINUS);
        if negative {
            self.pos += 1;
        }

        let digits_start = self.pos;
        self.skip_digits();
        if self.pos == digits_start {
            return Err(match self.peek() {
                None => self.error(
                    ErrorKind::UnterminatedInteger,
                    self.pos,
                    "input ended inside an integer",
                ),
                Some(END) => self.error(ErrorKind::MissingDigits, self.pos, "integer has no digits"),
                Some(_) => self.error(
                    ErrorKind::MalformedInteger,
                    self.pos,
                    "expected a decimal digit",
                ),
            });
        }

        match self.peek() {
            Some(END) => {}
            None => {
                return Err(self.error(
                    ErrorKind::UnterminatedInteger,
                    self.pos,
                    "expected 'e' after integer digits",
                ));
            }
            Some(_) => {
                return Err(self.error(
                    ErrorKind::MalformedInteger,
                    self.pos,
                    "expected 'e' after integer digits",
                ));
            }
        }

        let digits = &self.data[digits_start..self.pos];
        if self.options.canonical_numbers {
            if digits.len() > 1 && digits[0] == b'0' {
                return Err(self.error(
                    ErrorKind::MalformedInteger,
                    digits_start,
                    "integer has a leading zero",
                ));
            }
            if negative && digits == b"0" {
                return Err(self.error(
                    ErrorKind::MalformedInteger,
                    digits_start,
                    "negative zero is not a valid integer",
                ));
            }
        }

        let value = parse_integer(digits, negative).ok_or_else(|| {
            self.error(
                ErrorKind::NumericOverflow,
                digits_start,
                "integer does not fit in 64 bits",
            )
        })?;

        self.pos += 1;
        Ok(Value::Integer(value))
    }

    fn byte_string(&mut self) -> Result<ByteStr<'a>, DecodeError> {
        let start = self.pos;
        match self.peek() {
            None => return Err(self.error(ErrorKind::EmptyInput, start, "expected a byte string")),
            Some(b'0'..=b'9') => {}
            Some(_) => {
                return Err(self.error(
                    ErrorKind::MissingLength,
                    start,
                    "expected a decimal length prefix",
                ));
            }
        }

        self.skip_digits();
        let digits = &self.data[start..self.pos];
        if self.options.canonical_numbers && digits.len() > 1 && digits[0] == b'0' {
            return Err(self.error(
                ErrorKind::NonCanonicalLength,
                start,
                "string length has a leading zero",
            ));
        }
        let len = parse_length(digits).ok_or_else(|| {
            self.error(
                ErrorKind::NumericOverflow,
                start,
                "string length does not fit in usize",
            )
        })?;

        if self.peek() != Some(STRING_SEPARATOR) {
            return Err(self.error(
                ErrorKind::MissingSeparator,
                self.pos,
                "expected ':' after string length",
            ));
        }
        self.pos += 1;

        let payload_start = self.pos;
        let remaining = self.data.len() - payload_start;
        if len > remaining {
            let message = format!("string announces {} bytes but {} remain", len, remaining);
            return Err(self.error(ErrorKind::TruncatedPayload, payload_start, &message));
        }
        self.pos += len;

        Ok(self.slice(payload_start..self.pos))
    }

    fn slice(&self, range: Range<usize>) -> ByteStr<'a> {
        let data = self.data;
        match (self.shared, self.options.representation) {
            (Some(shared), _) => ByteStr::Owned(shared.slice(range)),
            (None, Representation::Borrowed) => ByteStr::Borrowed(&data[range]),
            (None, Representation::Owned) => ByteStr::Owned(Bytes::copy_from_slice(&data[range])),
        }
    }

    /// Consumes a container's opening marker, enforcing the depth limit.
    fn open(&mut self, marker: u8, depth: usize, what: &str) -> Result<(), DecodeError> {
        match self.peek() {
            None => {
                let message = format!("expected a {}", what);
                return Err(self.error(ErrorKind::EmptyInput, self.pos, &message));
            }
            Some(b) if b == marker => {}
            Some(_) => {
                let message = format!("expected '{}' to start a {}", marker as char, what);
                return Err(self.error(ErrorKind::UnexpectedLeadByte, self.pos, &message));
            }
        }
        if depth >= self.options.max_depth {
            let message = format!(
                "{} exceeds the nesting limit of {}",
                what, self.options.max_depth
            );
            return Err(self.error(ErrorKind::NestingTooDeep, self.pos, &message));
        }
        self.pos += 1;
        Ok(())
    }

    fn list(&mut self, depth: usize) -> Result<Value<'a>, DecodeError> {
        let start = self.pos;
        self.open(LIST_START, depth, "list")?;

        let mut list = Vec::new();
        loop {
            match self.peek() {
                None => {
                    let message = format!("list opened at byte {} is never closed", start);
                    return Err(self.error(ErrorKind::UnterminatedList, self.pos, &message));
                }
                Some(END) => break,
                Some(_) => {
                    let item = self.value(depth + 1).map_err(|e| {
                        e.within(Frame::List {
                            offset: start,
                            index: list.len(),
                        })
                    })?;
                    list.push(item);
                }
            }
        }

        self.pos += 1;
        Ok(Value::List(list))
    }

    fn dict(&mut self, depth: usize) -> Result<Value<'a>, DecodeError> {
        let start = self.pos;
        self.open(DICT_START, depth, "dictionary")?;

        let mut dict = Dictionary::new();
        let mut previous: Option<ByteStr<'a>> = None;
        loop {
            let key_offset = self.pos;
            match self.peek() {
                None => return Err(self.unterminated_dict(start)),
                Some(END) => break,
                Some(b'0'..=b'9') => {}
                Some(_) => {
                    return Err(self.error(
                        ErrorKind::InvalidKeyType,
                        key_offset,
                        "dictionary keys must be byte strings",
                    ));
                }
            }

            let key = self.byte_string().map_err(|e| {
                e.within(Frame::Dict {
                    offset: start,
                    key: None,
                })
            })?;

            if self.options.key_order == KeyOrder::Ascending {
                if let Some(prev) = &previous {
                    match key.cmp(prev) {
                        Ordering::Greater => {}
                        Ordering::Equal => return Err(self.duplicate_key(&key, key_offset)),
                        Ordering::Less => {
                            let message = format!("key {} sorts before key {}", key, prev);
                            return Err(self.error(ErrorKind::UnsortedKeys, key_offset, &message));
                        }
                    }
                }
                previous = Some(key.clone());
            }

            if self.is_at_end() {
                return Err(self.unterminated_dict(start));
            }
            let value = self.value(depth + 1).map_err(|e| {
                e.within(Frame::Dict {
                    offset: start,
                    key: Some(key.clone().into_owned()),
                })
            })?;

            match dict.entry(key) {
                Entry::Vacant(entry) => {
                    entry.insert(value);
                }
                Entry::Occupied(mut entry) => match self.options.duplicate_keys {
                    DuplicateKeys::Reject => {
                        return Err(self.duplicate_key(entry.key(), key_offset));
                    }
                    DuplicateKeys::FirstWins => {}
                    DuplicateKeys::LastWins => {
                        entry.insert(value);
                    }
                },
            }
        }

        self.pos += 1;
        Ok(Value::Dict(dict))
    }

    fn unterminated_dict(&self, start: usize) -> DecodeError {
        let message = format!("dictionary opened at byte {} is never closed", start);
        self.error(ErrorKind::UnterminatedDictionary, self.pos, &message)
    }

    fn duplicate_key(&self, key: &ByteStr<'_>, offset: usize) -> DecodeError {
        let message = format!("key {} appears more than once", key);
        self.error(ErrorKind::DuplicateKey, offset, &message)
    }
}

fn parse_integer(digits: &[u8], negative: bool) -> Option<i64> {
    digits.iter().try_fold(0i64, |acc, &b| {
        let digit = i64::from(b - b'0');
        let acc = acc.checked_mul(10)?;
        if negative {
            acc.checked_sub(digit)
        } else {
            acc.checked_add(digit)
        }
    })
}

fn parse_length(digits: &[u8]) -> Option<usize> {
    digits.iter().try_fold(0usize, |acc, &b| {
        acc.checked_mul(10)?.checked_add(usize::from(b - b'0'))
    })
}
