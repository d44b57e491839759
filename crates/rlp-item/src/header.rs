use crate::{
    length::{decode_length, length_of_length, to_be_bytes_trimmed},
    Error, ItemKind, Reason, Result, EMPTY_LIST_CODE, EMPTY_STRING_CODE, LONG_LIST_OFFSET,
    LONG_STRING_OFFSET, MAX_SHORT_PAYLOAD,
};
use alloc::vec::Vec;
use bytes::{Buf, BufMut};

/// The header of an RLP item.
///
/// Headers are computed from the leading bytes of a buffer and consumed right
/// away to locate the payload; they are never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    /// Whether the payload is a byte string or a list of items.
    pub kind: ItemKind,
    /// Number of bytes taken by the type/length prefix itself.
    ///
    /// This is `0` for a single byte below `0x80`, which is its own encoding.
    pub header_length: usize,
    /// Length of the payload in bytes.
    pub payload_length: usize,
}

impl Header {
    /// Creates the canonical header for a payload of the given kind and length.
    #[inline]
    pub const fn new(kind: ItemKind, payload_length: usize) -> Self {
        Self { kind, header_length: length_of_length(payload_length), payload_length }
    }

    /// Returns `true` if the header announces a list.
    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self.kind, ItemKind::List)
    }

    /// Parses the header at the start of `buf` without consuming anything.
    ///
    /// When `canonical` is set, encodings that some other encoder would never
    /// produce for the same value are rejected: a single byte below `0x80`
    /// wrapped in a `0x81` header, a long-form length with a leading zero, and
    /// a long-form header for a payload shorter than 56 bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` is empty, if the header is malformed, or if
    /// `buf` is shorter than the header plus the payload it announces.
    pub fn parse(buf: &[u8], canonical: bool) -> Result<Self> {
        let first = *buf.first().ok_or(Error::new(Reason::EmptyInput))?;
        let header = match first {
            0..=0x7F => Self { kind: ItemKind::String, header_length: 0, payload_length: 1 },

            EMPTY_STRING_CODE..=LONG_STRING_OFFSET => {
                let payload_length = (first - EMPTY_STRING_CODE) as usize;
                if canonical
                    && payload_length == 1
                    && matches!(buf.get(1), Some(&b) if b < EMPTY_STRING_CODE)
                {
                    return Err(Error::new(Reason::NonCanonicalSingleByte));
                }
                Self { kind: ItemKind::String, header_length: 1, payload_length }
            }

            0xB8..=0xBF | 0xF8..=0xFF => {
                let list = first > LONG_LIST_OFFSET;
                let code = if list { LONG_LIST_OFFSET } else { LONG_STRING_OFFSET };
                let len_of_len = (first - code) as usize;

                let len = buf.get(1..=len_of_len).ok_or(Error::new(Reason::InputTooShort))?;
                if canonical && len[0] == 0 {
                    return Err(Error::new(Reason::LeadingZero));
                }
                let payload_length = decode_length(len)?;
                if canonical && payload_length <= MAX_SHORT_PAYLOAD {
                    return Err(Error::new(Reason::NonCanonicalSize));
                }

                let kind = if list { ItemKind::List } else { ItemKind::String };
                Self { kind, header_length: 1 + len_of_len, payload_length }
            }

            EMPTY_LIST_CODE..=LONG_LIST_OFFSET => Self {
                kind: ItemKind::List,
                header_length: 1,
                payload_length: (first - EMPTY_LIST_CODE) as usize,
            },
        };

        match header.header_length.checked_add(header.payload_length) {
            Some(end) if end <= buf.len() => Ok(header),
            _ => Err(Error::new(Reason::InputTooShort)),
        }
    }

    /// Decodes an RLP header from the given buffer, advancing it past the
    /// header.
    ///
    /// On success the remaining buffer is guaranteed to hold at least
    /// `payload_length` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short or the header is invalid.
    #[inline]
    pub fn decode(buf: &mut &[u8]) -> Result<Self> {
        let header = Self::parse(buf, true)?;
        buf.advance(header.header_length);
        Ok(header)
    }

    /// Decodes the next payload from the given buffer, advancing it.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short, the header is invalid, or
    /// the item is not of the expected kind.
    #[inline]
    pub fn decode_bytes<'a>(buf: &mut &'a [u8], is_list: bool) -> Result<&'a [u8]> {
        let header = Self::decode(buf)?;
        if header.is_list() != is_list {
            let reason = if is_list { Reason::UnexpectedString } else { Reason::UnexpectedList };
            return Err(Error::new(reason));
        }
        Ok(split_payload(buf, header.payload_length))
    }

    /// Extracts the next payload from the given buffer, advancing it.
    ///
    /// A list payload is split one level deep into the raw encodings of its
    /// children; nothing is copied.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is too short or any header on the way is
    /// invalid.
    pub fn decode_raw<'a>(buf: &mut &'a [u8]) -> Result<PayloadView<'a>> {
        let header = Self::decode(buf)?;
        let mut payload = split_payload(buf, header.payload_length);

        if !header.is_list() {
            return Ok(PayloadView::String(payload));
        }

        let mut items = Vec::new();
        while !payload.is_empty() {
            let item = Self::parse(payload, true)?;
            items.push(split_payload(&mut payload, item.length_with_payload()));
        }
        Ok(PayloadView::List(items))
    }

    /// Encodes the header into the `out` buffer.
    ///
    /// Always writes the canonical form for `payload_length`.
    #[inline]
    pub fn encode(&self, out: &mut dyn BufMut) {
        if self.payload_length <= MAX_SHORT_PAYLOAD {
            let code = if self.is_list() { EMPTY_LIST_CODE } else { EMPTY_STRING_CODE };
            out.put_u8(code + self.payload_length as u8);
        } else {
            let len_be;
            let len_be = to_be_bytes_trimmed!(len_be, self.payload_length as u64);
            let code = if self.is_list() { LONG_LIST_OFFSET } else { LONG_STRING_OFFSET };
            out.put_u8(code + len_be.len() as u8);
            out.put_slice(len_be);
        }
    }

    /// Returns the length of the header.
    #[inline]
    pub const fn length(&self) -> usize {
        self.header_length
    }

    /// Returns the total length of the header and payload.
    #[inline]
    pub const fn length_with_payload(&self) -> usize {
        self.header_length + self.payload_length
    }
}

/// Parses the canonical header at the start of `buf`.
///
/// Shorthand for [`Header::parse`] with canonical checks enabled.
///
/// # Errors
///
/// See [`Header::parse`].
#[inline]
pub fn decode_header(buf: &[u8]) -> Result<Header> {
    Header::parse(buf, true)
}

/// Structured representation of an RLP payload.
#[derive(Debug, PartialEq, Eq)]
pub enum PayloadView<'a> {
    /// Payload is a byte string.
    String(&'a [u8]),
    /// Payload is a list of RLP encoded data.
    List(Vec<&'a [u8]>),
}

/// Same as `let (bytes, rest) = buf.split_at(cnt); *buf = rest; bytes`.
///
/// Callers must have checked `cnt <= buf.len()`, which every parsed header
/// guarantees for its own payload.
#[inline(always)]
fn split_payload<'a>(buf: &mut &'a [u8], cnt: usize) -> &'a [u8] {
    let bytes = &buf[..cnt];
    buf.advance(cnt);
    bytes
}
