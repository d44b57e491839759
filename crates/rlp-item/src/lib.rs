#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
#[allow(unused_imports)]
extern crate alloc;

mod decode;
pub use decode::{decode, decode_exact, decode_sequence, Decodable, Decoder, Rlp};

mod error;
pub use error::{Error, ErrorKind, Reason, Result};

mod encode;
pub use encode::{encode, encode_iter, encode_list, list_length, Encodable, Encoder};

mod header;
pub use header::{decode_header, Header, PayloadView};

mod item;
pub use item::{Item, ItemKind};

pub mod length;
pub use length::{decode_length, encode_length, length_of_length};

#[doc(no_inline)]
pub use bytes::{self, Buf, BufMut, Bytes, BytesMut};

/// RLP prefix byte for 0-length string.
pub const EMPTY_STRING_CODE: u8 = 0x80;

/// RLP prefix byte for a 0-length array.
pub const EMPTY_LIST_CODE: u8 = 0xC0;

/// Long-form string prefixes are this value plus the width of the length field.
pub const LONG_STRING_OFFSET: u8 = 0xB7;

/// Long-form list prefixes are this value plus the width of the length field.
pub const LONG_LIST_OFFSET: u8 = 0xF7;

/// Largest payload that still fits a single-byte header.
pub const MAX_SHORT_PAYLOAD: usize = 55;

/// Default limit on list nesting when decoding.
pub const DEFAULT_MAX_DEPTH: usize = 1024;
