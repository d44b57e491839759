use crate::{length_of_length, Header, ItemKind, EMPTY_STRING_CODE};
use alloc::vec::Vec;
use bytes::{BufMut, Bytes, BytesMut};
use core::borrow::Borrow;

/// An RLP encoder wrapping a [`BufMut`].
pub struct Encoder<'a> {
    out: &'a mut dyn BufMut,
}

impl core::fmt::Debug for Encoder<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Encoder").finish_non_exhaustive()
    }
}

impl<'a> Encoder<'a> {
    /// Creates a new encoder wrapping the given buffer.
    #[inline]
    pub fn new(out: &'a mut dyn BufMut) -> Self {
        Self { out }
    }

    /// Writes a single byte to the buffer.
    #[inline]
    pub fn put_u8(&mut self, n: u8) {
        self.out.put_u8(n)
    }

    /// Writes a byte slice to the buffer.
    #[inline]
    pub fn put_slice(&mut self, src: &[u8]) {
        self.out.put_slice(src)
    }

    /// Writes the canonical encoding of `header` to the buffer.
    #[inline]
    pub fn put_header(&mut self, header: &Header) {
        header.encode(self.out)
    }
}

/// A type that can be encoded via RLP.
pub trait Encodable {
    /// Encodes the type into the `out` buffer.
    fn rlp_encode(&self, out: &mut Encoder<'_>);

    /// Returns the length of the encoding of this type in bytes.
    ///
    /// The default implementation computes this by encoding the type.
    /// When possible, we recommend implementers override this with a
    /// specialized implementation.
    #[inline]
    fn rlp_len(&self) -> usize {
        let mut out = Vec::new();
        self.rlp_encode(&mut Encoder::new(&mut out));
        out.len()
    }
}

// The existence of this function makes the compiler catch if the Encodable
// trait is "object-safe" or not.
fn _assert_trait_object(_b: &dyn Encodable) {}

impl Encodable for [u8] {
    #[inline]
    fn rlp_len(&self) -> usize {
        let mut len = self.len();
        if !is_single_byte(self) {
            len += length_of_length(len);
        }
        len
    }

    /// A single byte below `0x80` is written as is. Every other string,
    /// including a single byte `>= 0x80`, gets a header.
    #[inline]
    fn rlp_encode(&self, out: &mut Encoder<'_>) {
        if !is_single_byte(self) {
            out.put_header(&Header::new(ItemKind::String, self.len()));
        }
        out.put_slice(self);
    }
}

impl<const N: usize> Encodable for [u8; N] {
    #[inline]
    fn rlp_len(&self) -> usize {
        self[..].rlp_len()
    }

    #[inline]
    fn rlp_encode(&self, out: &mut Encoder<'_>) {
        self[..].rlp_encode(out);
    }
}

impl Encodable for str {
    #[inline]
    fn rlp_len(&self) -> usize {
        self.as_bytes().rlp_len()
    }

    #[inline]
    fn rlp_encode(&self, out: &mut Encoder<'_>) {
        self.as_bytes().rlp_encode(out)
    }
}

macro_rules! deref_impl {
    ($($(#[$attr:meta])* [$($gen:tt)*] $t:ty),+ $(,)?) => {$(
        $(#[$attr])*
        impl<$($gen)*> Encodable for $t {
            #[inline]
            fn rlp_len(&self) -> usize {
                (**self).rlp_len()
            }

            #[inline]
            fn rlp_encode(&self, out: &mut Encoder<'_>) {
                (**self).rlp_encode(out)
            }
        }
    )+};
}

deref_impl! {
    [] alloc::string::String,
    [] Vec<u8>,
    [] Bytes,
    [] BytesMut,
    [T: ?Sized + Encodable] &T,
    [T: ?Sized + Encodable] &mut T,
    [T: ?Sized + Encodable] alloc::boxed::Box<T>,
    [T: ?Sized + alloc::borrow::ToOwned + Encodable] alloc::borrow::Cow<'_, T>,
    [T: ?Sized + Encodable] alloc::rc::Rc<T>,
    #[cfg(target_has_atomic = "ptr")]
    [T: ?Sized + Encodable] alloc::sync::Arc<T>,
}

/// Encode a value.
///
/// The output is allocated once, sized with [`Encodable::rlp_len`].
#[inline]
pub fn encode<T: Encodable>(value: T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.rlp_len());
    value.rlp_encode(&mut Encoder::new(&mut out));
    out
}

/// Calculate the length of a list.
#[inline]
pub fn list_length<B, T>(list: &[B]) -> usize
where
    B: Borrow<T>,
    T: ?Sized + Encodable,
{
    let payload_length = rlp_list_header(list).payload_length;
    payload_length + length_of_length(payload_length)
}

/// Encode a list of items.
#[inline]
pub fn encode_list<B, T>(values: &[B], out: &mut Encoder<'_>)
where
    B: Borrow<T>,
    T: ?Sized + Encodable,
{
    out.put_header(&rlp_list_header(values));
    for value in values {
        value.borrow().rlp_encode(out);
    }
}

/// Encode all items from an iterator.
///
/// This clones the iterator. Prefer [`encode_list`] if possible.
#[inline]
pub fn encode_iter<I, B, T>(values: I, out: &mut Encoder<'_>)
where
    I: Iterator<Item = B> + Clone,
    B: Borrow<T>,
    T: ?Sized + Encodable,
{
    let payload_length = values.clone().map(|t| t.borrow().rlp_len()).sum();
    out.put_header(&Header::new(ItemKind::List, payload_length));
    for value in values {
        value.borrow().rlp_encode(out);
    }
}

#[inline]
fn rlp_list_header<B, T>(values: &[B]) -> Header
where
    B: Borrow<T>,
    T: ?Sized + Encodable,
{
    let payload_length = values.iter().map(|value| value.borrow().rlp_len()).sum();
    Header::new(ItemKind::List, payload_length)
}

#[inline]
fn is_single_byte(bytes: &[u8]) -> bool {
    bytes.len() == 1 && bytes[0] < EMPTY_STRING_CODE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Item;
    use hex_literal::hex;

    fn encoded_list<T: Encodable + Clone>(t: &[T]) -> BytesMut {
        let mut out = BytesMut::new();
        encode_list::<T, T>(t, &mut Encoder::new(&mut out));
        assert_eq!(out.len(), list_length::<T, T>(t));
        out
    }

    fn encoded_iter<T: Encodable>(iter: impl Iterator<Item = T> + Clone) -> BytesMut {
        let mut out = BytesMut::new();
        encode_iter::<_, T, T>(iter, &mut Encoder::new(&mut out));
        out
    }

    fn sequence_0_to(n: u8) -> Vec<u8> {
        (0..n).collect()
    }

    #[test]
    fn rlp_str() {
        assert_eq!(encode("")[..], hex!("80")[..]);
        assert_eq!(encode("{")[..], hex!("7b")[..]);
        assert_eq!(encode("test str")[..], hex!("887465737420737472")[..]);
    }

    #[test]
    fn rlp_strings() {
        assert_eq!(encode(hex!(""))[..], hex!("80")[..]);
        assert_eq!(encode(hex!("7B"))[..], hex!("7b")[..]);
        assert_eq!(encode(hex!("2A"))[..], hex!("2a")[..]);
        assert_eq!(encode(hex!("2A20"))[..], hex!("822a20")[..]);
        assert_eq!(encode(hex!("ABBA"))[..], hex!("82abba")[..]);
    }

    #[test]
    fn single_high_byte_is_escaped() {
        assert_eq!(encode(hex!("80"))[..], hex!("8180")[..]);
        assert_eq!(encode(Item::from([0xff]))[..], hex!("81ff")[..]);
    }

    #[test]
    fn long_string() {
        let payload = sequence_0_to(56);
        let mut expected = vec![0xB8, 56];
        expected.extend_from_slice(&payload);
        assert_eq!(encode(&payload[..]), expected);
        assert_eq!(encode(Item::from(payload)), expected);

        let payload = vec![0xAA; 1024];
        let encoded = encode(&payload);
        assert_eq!(encoded[..3], hex!("b90400"));
        assert_eq!(encoded.len(), 1027);
    }

    #[test]
    fn item_lists() {
        assert_eq!(encode(Item::empty_list()), hex!("c0"));
        assert_eq!(encode(Item::list([Item::from([0x2a, 0x20])])), hex!("c3822a20"));
        assert_eq!(
            encode(Item::list([Item::empty_list(), Item::list([Item::empty_list()])])),
            hex!("c3c0c1c0")
        );

        // the set-theoretic representation of three
        let three = Item::list([
            Item::empty_list(),
            Item::list([Item::empty_list()]),
            Item::list([Item::empty_list(), Item::list([Item::empty_list()])]),
        ]);
        assert_eq!(encode(&three), hex!("c7c0c1c0c3c0c1c0"));
    }

    #[test]
    fn item_long_list() {
        let list = Item::list([Item::from(sequence_0_to(56))]);
        let mut expected = vec![0xF8, 58, 0xB8, 56];
        expected.extend(0..56u8);
        assert_eq!(encode(&list), expected);
        assert_eq!(list.length(), expected.len());
    }

    #[test]
    fn lorem_ipsum() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipisicing elit";
        let encoded = encode(text);
        assert_eq!(encoded[..2], hex!("b838"));
        assert_eq!(&encoded[2..], text.as_bytes());
    }

    #[test]
    fn rlp_list() {
        assert_eq!(encoded_list::<Item>(&[]), &hex!("c0")[..]);
        assert_eq!(encoded_list(&["cat", "dog"]), &hex!("c88363617483646f67")[..]);
        assert_eq!(
            encoded_list(&[Item::from("cat"), Item::list([Item::from("dog")])]),
            &hex!("c983636174c483646f67")[..]
        );
    }

    #[test]
    fn rlp_iter() {
        assert_eq!(encoded_iter::<&str>([].into_iter()), &hex!("c0")[..]);
        assert_eq!(encoded_iter(["cat", "dog"].into_iter()), &hex!("c88363617483646f67")[..]);
    }

    #[test]
    fn encode_into_bytes_mut() {
        let mut out = BytesMut::new();
        Item::list([Item::from("cat")]).rlp_encode(&mut Encoder::new(&mut out));
        assert_eq!(&out[..], hex!("c483636174"));
    }
}
