//! Minimal big-endian length fields used by long-form headers.

use crate::{Error, Reason, Result, MAX_SHORT_PAYLOAD};
use arrayvec::ArrayVec;

/// Maximum width of a length field, in bytes.
pub const MAX_LENGTH_OF_LENGTH: usize = 8;

macro_rules! to_be_bytes_trimmed {
    ($be:ident, $x:expr) => {{
        $be = $x.to_be_bytes();
        &$be[($x.leading_zeros() / 8) as usize..]
    }};
}
pub(crate) use to_be_bytes_trimmed;

/// Encodes `n` as the shortest big-endian byte sequence with no leading zero
/// byte.
///
/// `0` is encoded as a single zero byte.
#[inline]
pub fn encode_length(n: usize) -> ArrayVec<u8, MAX_LENGTH_OF_LENGTH> {
    let mut out = ArrayVec::new();
    if n == 0 {
        out.push(0);
        return out;
    }

    let be;
    let be = to_be_bytes_trimmed!(be, n as u64);
    // `be` is at most 8 bytes wide
    out.extend(be.iter().copied());
    out
}

/// Interprets `bytes` as a big-endian unsigned length.
///
/// # Errors
///
/// Returns an error if `bytes` is empty, longer than
/// [`MAX_LENGTH_OF_LENGTH`], or its value does not fit in `usize`.
#[inline]
pub fn decode_length(bytes: &[u8]) -> Result<usize> {
    if bytes.is_empty() || bytes.len() > MAX_LENGTH_OF_LENGTH {
        return Err(Error::new(Reason::InvalidLengthOfLength));
    }

    let mut be = [0u8; MAX_LENGTH_OF_LENGTH];
    be[MAX_LENGTH_OF_LENGTH - bytes.len()..].copy_from_slice(bytes);
    usize::try_from(u64::from_be_bytes(be)).map_err(|_| Error::new(Reason::Overflow))
}

/// Determine the length in bytes of the header of an RLP item with the given
/// payload length.
#[inline]
pub const fn length_of_length(payload_length: usize) -> usize {
    if payload_length <= MAX_SHORT_PAYLOAD {
        1
    } else {
        1 + (usize::BITS as usize / 8) - payload_length.leading_zeros() as usize / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn encode_length_minimal() {
        assert_eq!(&encode_length(0)[..], &[0x00]);
        assert_eq!(&encode_length(1)[..], &[0x01]);
        assert_eq!(&encode_length(55)[..], &[55]);
        assert_eq!(&encode_length(56)[..], &[56]);
        assert_eq!(&encode_length(255)[..], &[0xff]);
        assert_eq!(&encode_length(256)[..], &hex!("0100"));
        assert_eq!(&encode_length(65535)[..], &hex!("ffff"));
        assert_eq!(&encode_length(65536)[..], &hex!("010000"));
        assert_eq!(&encode_length(0xFFFF_FFFF)[..], &hex!("ffffffff"));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn encode_length_full_width() {
        assert_eq!(&encode_length(usize::MAX)[..], &hex!("ffffffffffffffff"));
        assert_eq!(&encode_length(1 << 56)[..], &hex!("0100000000000000"));
    }

    #[test]
    fn decode_length_big_endian() {
        assert_eq!(decode_length(&[0x00]), Ok(0));
        assert_eq!(decode_length(&[0x38]), Ok(56));
        assert_eq!(decode_length(&hex!("0100")), Ok(256));
        assert_eq!(decode_length(&hex!("0400")), Ok(1024));
        assert_eq!(decode_length(&hex!("ffffffff")), Ok(0xFFFF_FFFF));
    }

    #[test]
    fn decode_length_rejects_bad_width() {
        assert_eq!(decode_length(&[]), Err(Error::new(Reason::InvalidLengthOfLength)));
        assert_eq!(decode_length(&[1; 9]), Err(Error::new(Reason::InvalidLengthOfLength)));
    }

    #[test]
    fn length_codec_idempotent() {
        for n in [0, 1, 55, 56, 256, 65535, 0xFFFF_FFFF] {
            let encoded = encode_length(n);
            assert_eq!(decode_length(&encoded), Ok(n), "n = {n}");
            if n >= 1 {
                assert_ne!(encoded[0], 0, "leading zero for n = {n}");
            }
        }
    }

    #[test]
    fn header_lengths() {
        assert_eq!(length_of_length(0), 1);
        assert_eq!(length_of_length(55), 1);
        assert_eq!(length_of_length(56), 2);
        assert_eq!(length_of_length(255), 2);
        assert_eq!(length_of_length(256), 3);
        assert_eq!(length_of_length(65536), 4);
    }

    #[test]
    fn to_be_bytes_trimmed() {
        macro_rules! test_to_be_bytes_trimmed {
            ($($x:expr => $expected:expr),+ $(,)?) => {$(
                let be;
                assert_eq!(to_be_bytes_trimmed!(be, $x), $expected);
            )+};
        }

        test_to_be_bytes_trimmed! {
            0u64 => [],
            1u64 => [1],
            255u64 => [255],
            256u64 => [1, 0],
            65535u64 => [255, 255],
            65536u64 => [1, 0, 0],
            u64::MAX => [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        }
    }
}
