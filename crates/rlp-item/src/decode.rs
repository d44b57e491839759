use crate::{Error, Header, Item, ItemKind, Reason, Result, DEFAULT_MAX_DEPTH};
use alloc::vec::Vec;
use bytes::{Buf, Bytes};

/// Decodes a single RLP item that must span the whole of `buf`.
///
/// Uses the default [`Decoder`] settings: canonical encodings only, and at
/// most [`DEFAULT_MAX_DEPTH`] nested lists.
///
/// # Errors
///
/// Returns an error if `buf` is empty, malformed, or has bytes left over after
/// the first item.
#[inline]
pub fn decode(buf: &[u8]) -> Result<Item> {
    Decoder::new().decode(buf)
}

/// Decodes consecutive RLP items that exactly fill `buf`.
///
/// An empty buffer is an empty sequence.
///
/// # Errors
///
/// Returns an error if any item is malformed or the last one is cut short.
#[inline]
pub fn decode_sequence(buf: &[u8]) -> Result<Vec<Item>> {
    Decoder::new().decode_sequence(buf)
}

/// Decodes the entire input, ensuring no trailing bytes remain.
///
/// # Errors
///
/// Returns an error if the encoding is invalid or if data remains after decoding the RLP item.
#[inline]
pub fn decode_exact<T: Decodable>(bytes: impl AsRef<[u8]>) -> Result<T> {
    T::decode_exact(&mut bytes.as_ref())
}

/// RLP decoder settings.
///
/// The decoder is a plain value: it holds no buffers and can be shared freely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decoder {
    max_depth: usize,
    canonical: bool,
}

impl Default for Decoder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    /// Creates a decoder that accepts canonical encodings nested at most
    /// [`DEFAULT_MAX_DEPTH`] lists deep.
    #[inline]
    pub const fn new() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, canonical: true }
    }

    /// Sets the maximum number of nested lists.
    ///
    /// With `0`, only top-level strings are accepted.
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables the canonical-form checks of [`Header::parse`].
    #[inline]
    pub const fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    /// Returns the maximum number of nested lists.
    #[inline]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns `true` if non-canonical encodings are rejected.
    #[inline]
    pub const fn is_canonical(&self) -> bool {
        self.canonical
    }

    /// Decodes a single RLP item that must span the whole of `buf`.
    ///
    /// Byte strings in the result are copied out of `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` is empty, malformed, or has bytes left over
    /// after the first item.
    pub fn decode(&self, buf: &[u8]) -> Result<Item> {
        Walker::new(self, buf, None).exact().map_err(rejected)
    }

    /// Decodes consecutive RLP items that exactly fill `buf`.
    ///
    /// Byte strings in the result are copied out of `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if any item is malformed or the last one is cut short.
    pub fn decode_sequence(&self, buf: &[u8]) -> Result<Vec<Item>> {
        Walker::new(self, buf, None).sequence(0, buf.len(), 0).map_err(rejected)
    }

    /// Same as [`decode`](Self::decode), but byte strings in the result share
    /// the allocation of `buf` instead of being copied.
    ///
    /// # Errors
    ///
    /// See [`decode`](Self::decode).
    pub fn decode_bytes(&self, buf: Bytes) -> Result<Item> {
        Walker::new(self, &buf, Some(&buf)).exact().map_err(rejected)
    }

    /// Same as [`decode_sequence`](Self::decode_sequence), but byte strings in
    /// the result share the allocation of `buf` instead of being copied.
    ///
    /// # Errors
    ///
    /// See [`decode_sequence`](Self::decode_sequence).
    pub fn decode_sequence_bytes(&self, buf: Bytes) -> Result<Vec<Item>> {
        Walker::new(self, &buf, Some(&buf)).sequence(0, buf.len(), 0).map_err(rejected)
    }

    /// Returns a reader yielding the consecutive items of `buf` one at a time.
    #[inline]
    pub fn reader<'a>(&self, buf: &'a [u8]) -> Rlp<'a> {
        Rlp { decoder: *self, buf, pos: 0, end: buf.len(), failed: false }
    }
}

fn rejected(err: Error) -> Error {
    tracing::trace!(
        target: "rlp::decode",
        bytepos = err.bytepos,
        reason = %err.reason,
        "rejected malformed input"
    );
    err
}

/// Recursive descent over one input buffer.
///
/// Positions are absolute offsets into `input`, so errors found at any depth
/// point into the caller's buffer.
struct Walker<'a> {
    decoder: &'a Decoder,
    input: &'a [u8],
    shared: Option<&'a Bytes>,
}

impl<'a> Walker<'a> {
    const fn new(decoder: &'a Decoder, input: &'a [u8], shared: Option<&'a Bytes>) -> Self {
        Self { decoder, input, shared }
    }

    fn payload(&self, start: usize, end: usize) -> Bytes {
        match self.shared {
            Some(bytes) => bytes.slice(start..end),
            None => Bytes::copy_from_slice(&self.input[start..end]),
        }
    }

    /// Decodes the item at `pos`, which must end no later than `end`.
    ///
    /// Returns the item and the position right after it.
    fn item(&self, pos: usize, end: usize, depth: usize) -> Result<(Item, usize)> {
        let header = Header::parse(&self.input[pos..end], self.decoder.canonical)
            .map_err(|err| err.offset_by(pos))?;
        let start = pos + header.header_length;
        let stop = start + header.payload_length;

        let item = match header.kind {
            ItemKind::String => Item::String(self.payload(start, stop)),
            ItemKind::List => {
                if depth >= self.decoder.max_depth {
                    tracing::debug!(
                        target: "rlp::decode",
                        bytepos = pos,
                        max_depth = self.decoder.max_depth,
                        "list nesting exceeds depth limit"
                    );
                    return Err(Error::with_bytepos(Reason::DepthLimitExceeded, pos));
                }
                Item::List(self.sequence(start, stop, depth + 1)?)
            }
        };
        Ok((item, stop))
    }

    /// Decodes the items filling `input[pos..end]`.
    fn sequence(&self, mut pos: usize, end: usize, depth: usize) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        while pos < end {
            let (item, next) = self.item(pos, end, depth)?;
            items.push(item);
            pos = next;
        }
        Ok(items)
    }

    /// Decodes one item spanning the whole input.
    fn exact(&self) -> Result<Item> {
        let (item, end) = self.item(0, self.input.len(), 0)?;
        if end != self.input.len() {
            return Err(Error::with_bytepos(Reason::TrailingBytes, end));
        }
        Ok(item)
    }
}

/// A reader over consecutive RLP items in a buffer.
///
/// Items are decoded lazily, one per call. After the first error the reader
/// is exhausted.
#[derive(Debug)]
pub struct Rlp<'a> {
    decoder: Decoder,
    buf: &'a [u8],
    pos: usize,
    end: usize,
    failed: bool,
}

impl<'a> Rlp<'a> {
    /// Instantiate a reader over the top-level items of `buf`.
    #[inline]
    pub fn new(buf: &'a [u8]) -> Self {
        Decoder::new().reader(buf)
    }

    /// Instantiate a reader over the children of the list at the start of
    /// `buf`.
    ///
    /// # Errors
    ///
    /// Returns an error if `buf` does not start with a well-formed list header.
    pub fn from_list(buf: &'a [u8]) -> Result<Self> {
        let header = Header::parse(buf, true).map_err(rejected)?;
        if !header.is_list() {
            return Err(rejected(Error::new(Reason::UnexpectedString)));
        }
        let mut rlp = Self::new(buf);
        rlp.pos = header.header_length;
        rlp.end = header.length_with_payload();
        Ok(rlp)
    }

    /// Decode the next item from the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if the next item is malformed.
    #[inline]
    pub fn get_next(&mut self) -> Result<Option<Item>> {
        self.next().transpose()
    }

    /// Returns the bytes not yet decoded.
    #[inline]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..self.end]
    }
}

impl Iterator for Rlp<'_> {
    type Item = Result<Item>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.end {
            return None;
        }
        let walker = Walker::new(&self.decoder, self.buf, None);
        match walker.item(self.pos, self.end, 0) {
            Ok((item, next)) => {
                self.pos = next;
                Some(Ok(item))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(rejected(err)))
            }
        }
    }
}

/// A type that can be decoded from an RLP blob.
pub trait Decodable: Sized {
    /// Decodes the blob into the appropriate type, advancing `buf` past it.
    fn decode(buf: &mut &[u8]) -> Result<Self>;

    /// Decode the blob into the appropriate type, ensuring no trailing bytes
    /// remain.
    fn decode_exact(buf: &mut &[u8]) -> Result<Self> {
        let start = buf.len();
        let t = Self::decode(buf)?;
        if !buf.is_empty() {
            return Err(Error::with_bytepos(Reason::TrailingBytes, start - buf.len()));
        }
        Ok(t)
    }
}

impl Decodable for Item {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let decoder = Decoder::new();
        let (item, end) = Walker::new(&decoder, *buf, None).item(0, buf.len(), 0)?;
        buf.advance(end);
        Ok(item)
    }
}

impl Decodable for Vec<Item> {
    /// Decodes a list into its children.
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let header = Header::parse(*buf, true)?;
        if !header.is_list() {
            return Err(Error::new(Reason::UnexpectedString));
        }
        let decoder = Decoder::new();
        let end = header.length_with_payload();
        let items = Walker::new(&decoder, *buf, None).sequence(header.header_length, end, 1)?;
        buf.advance(end);
        Ok(items)
    }
}

impl Decodable for Bytes {
    #[inline]
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Header::decode_bytes(buf, false).map(Self::copy_from_slice)
    }
}

impl Decodable for Vec<u8> {
    #[inline]
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        Header::decode_bytes(buf, false).map(<[u8]>::to_vec)
    }
}

impl Decodable for alloc::string::String {
    fn decode(buf: &mut &[u8]) -> Result<Self> {
        let bytes = Header::decode_bytes(buf, false)?;
        core::str::from_utf8(bytes)
            .map(Into::into)
            .map_err(|_| Error::new(Reason::Custom("invalid utf8 string")))
    }
}
