use core::fmt;

/// RLP result type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// RLP error with byte position context.
///
/// Every failure is reported as [`ErrorKind::InvalidInputFormat`]; the
/// [`Reason`] narrows down which rule the input broke.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Error {
    /// The byte position in the input where the offending item starts.
    pub bytepos: usize,
    /// The kind of error.
    pub kind: ErrorKind,
    /// The specific rule that was violated.
    pub reason: Reason,
}

impl Error {
    /// Creates a new error with the given reason and byte position 0.
    #[inline]
    pub const fn new(reason: Reason) -> Self {
        Self::with_bytepos(reason, 0)
    }

    /// Creates a new error with the given reason and byte position.
    #[inline]
    pub const fn with_bytepos(reason: Reason, bytepos: usize) -> Self {
        Self { bytepos, kind: ErrorKind::InvalidInputFormat, reason }
    }

    /// Shifts the byte position by `base`.
    ///
    /// Used when an error found in a sub-slice is reported against the whole input.
    #[inline]
    #[must_use]
    pub const fn offset_by(mut self, base: usize) -> Self {
        self.bytepos += base;
        self
    }
}

impl From<Reason> for Error {
    #[inline]
    fn from(reason: Reason) -> Self {
        Self::new(reason)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} (at byte {})", self.kind, self.reason, self.bytepos)
    }
}

/// RLP error category.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// The input is not a well-formed RLP encoding.
    InvalidInputFormat,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInputFormat => f.write_str("invalid input format"),
        }
    }
}

/// Why an input was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Reason {
    /// Nothing to decode.
    EmptyInput,
    /// Overran input while decoding.
    InputTooShort,
    /// Bytes remain after the item was decoded.
    TrailingBytes,
    /// Leading zero in a length field.
    LeadingZero,
    /// A single byte below `0x80` was wrapped in a string header.
    NonCanonicalSingleByte,
    /// A long-form header was used for a payload shorter than 56 bytes.
    NonCanonicalSize,
    /// A length field must be between 1 and 8 bytes wide.
    InvalidLengthOfLength,
    /// A length does not fit in `usize`.
    Overflow,
    /// Lists nested deeper than the decoder allows.
    DepthLimitExceeded,
    /// Expected a list, got a string instead.
    UnexpectedString,
    /// Expected a string, got a list instead.
    UnexpectedList,
    /// Custom error.
    Custom(&'static str),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => f.write_str("empty input"),
            Self::InputTooShort => f.write_str("input too short"),
            Self::TrailingBytes => f.write_str("trailing bytes"),
            Self::LeadingZero => f.write_str("leading zero"),
            Self::NonCanonicalSingleByte => f.write_str("non-canonical single byte"),
            Self::NonCanonicalSize => f.write_str("non-canonical size"),
            Self::InvalidLengthOfLength => f.write_str("invalid length of length"),
            Self::Overflow => f.write_str("overflow"),
            Self::DepthLimitExceeded => f.write_str("depth limit exceeded"),
            Self::UnexpectedString => f.write_str("unexpected string"),
            Self::UnexpectedList => f.write_str("unexpected list"),
            Self::Custom(err) => f.write_str(err),
        }
    }
}
