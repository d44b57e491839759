use crate::{length_of_length, Encodable, Encoder, Header};
use alloc::vec::Vec;
use bytes::Bytes;

/// The two kinds of RLP item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// A byte string.
    String,
    /// A list of items.
    List,
}

/// A node of an RLP tree: either a byte string or an ordered list of items.
///
/// Byte strings are held as [`Bytes`], so a decoded tree owns its data and
/// never borrows from the input buffer. Decoding from a [`Bytes`] buffer
/// shares the input allocation instead of copying it; see
/// [`Decoder::decode_bytes`](crate::Decoder::decode_bytes).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    /// A raw byte string, possibly empty.
    String(Bytes),
    /// An ordered list of items, possibly empty.
    List(Vec<Item>),
}

impl Default for Item {
    /// The empty byte string.
    #[inline]
    fn default() -> Self {
        Self::String(Bytes::new())
    }
}

impl Item {
    /// Creates a byte string item.
    #[inline]
    pub fn string(bytes: impl Into<Bytes>) -> Self {
        Self::String(bytes.into())
    }

    /// Creates a list item from its children.
    #[inline]
    pub fn list(items: impl IntoIterator<Item = Self>) -> Self {
        Self::List(items.into_iter().collect())
    }

    /// Creates an empty list.
    #[inline]
    pub const fn empty_list() -> Self {
        Self::List(Vec::new())
    }

    /// Returns the kind of this item.
    #[inline]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::String(_) => ItemKind::String,
            Self::List(_) => ItemKind::List,
        }
    }

    /// Returns `true` if this item is a byte string.
    #[inline]
    pub const fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }

    /// Returns `true` if this item is a list.
    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns the bytes of a string item.
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::String(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    /// Returns the children of a list item.
    #[inline]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::String(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// Converts a string item into its bytes.
    #[inline]
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::String(bytes) => Some(bytes),
            Self::List(_) => None,
        }
    }

    /// Converts a list item into its children.
    #[inline]
    pub fn into_list(self) -> Option<Vec<Self>> {
        match self {
            Self::String(_) => None,
            Self::List(items) => Some(items),
        }
    }

    /// Returns the length of the payload this item encodes to, without its
    /// header.
    ///
    /// For a single byte below `0x80` the byte is its own encoding, so the
    /// payload and the full encoding coincide.
    pub fn payload_length(&self) -> usize {
        match self {
            Self::String(bytes) => bytes.len(),
            Self::List(items) => items.iter().map(Self::length).sum(),
        }
    }

    /// Returns the length of the full RLP encoding of this item.
    #[inline]
    pub fn length(&self) -> usize {
        match self {
            Self::String(bytes) => bytes[..].rlp_len(),
            Self::List(_) => {
                let payload_length = self.payload_length();
                payload_length + length_of_length(payload_length)
            }
        }
    }
}

impl Encodable for Item {
    #[inline]
    fn rlp_len(&self) -> usize {
        self.length()
    }

    fn rlp_encode(&self, out: &mut Encoder<'_>) {
        match self {
            Self::String(bytes) => bytes[..].rlp_encode(out),
            Self::List(items) => {
                out.put_header(&Header::new(ItemKind::List, self.payload_length()));
                for item in items {
                    item.rlp_encode(out);
                }
            }
        }
    }
}

impl From<Bytes> for Item {
    #[inline]
    fn from(bytes: Bytes) -> Self {
        Self::String(bytes)
    }
}

impl From<Vec<u8>> for Item {
    #[inline]
    fn from(bytes: Vec<u8>) -> Self {
        Self::String(bytes.into())
    }
}

impl From<&[u8]> for Item {
    #[inline]
    fn from(bytes: &[u8]) -> Self {
        Self::String(Bytes::copy_from_slice(bytes))
    }
}

impl<const N: usize> From<[u8; N]> for Item {
    #[inline]
    fn from(bytes: [u8; N]) -> Self {
        Self::String(Bytes::copy_from_slice(&bytes))
    }
}

impl From<&str> for Item {
    #[inline]
    fn from(s: &str) -> Self {
        Self::String(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<Vec<Item>> for Item {
    #[inline]
    fn from(items: Vec<Item>) -> Self {
        Self::List(items)
    }
}

impl FromIterator<Item> for Item {
    #[inline]
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        Self::list(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let s = Item::from("dog");
        assert!(s.is_string());
        assert_eq!(s.kind(), ItemKind::String);
        assert_eq!(s.as_bytes(), Some(&b"dog"[..]));
        assert_eq!(s.as_list(), None);

        let l: Item = [Item::from("cat"), Item::empty_list()].into_iter().collect();
        assert!(l.is_list());
        assert_eq!(l.kind(), ItemKind::List);
        assert_eq!(l.as_bytes(), None);
        assert_eq!(l.as_list().map(<[Item]>::len), Some(2));
        assert_eq!(l.clone().into_list(), Some(vec![Item::from("cat"), Item::empty_list()]));
        assert_eq!(l.into_bytes(), None);
        assert_eq!(s.into_bytes(), Some(Bytes::from_static(b"dog")));
    }

    #[test]
    fn default_is_empty_string() {
        assert_eq!(Item::default(), Item::string(Bytes::new()));
        assert_eq!(Item::default().length(), 1);
    }

    #[test]
    fn lengths() {
        assert_eq!(Item::from([0x2a]).payload_length(), 1);
        assert_eq!(Item::from([0x2a]).length(), 1);
        assert_eq!(Item::from([0x80]).length(), 2);
        assert_eq!(Item::from([0u8; 55]).length(), 56);
        assert_eq!(Item::from([0u8; 56]).length(), 58);

        let nested = Item::list([Item::from([0x2a, 0x20])]);
        assert_eq!(nested.payload_length(), 3);
        assert_eq!(nested.length(), 4);
        assert_eq!(Item::empty_list().length(), 1);
    }
}
