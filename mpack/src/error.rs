use thiserror::Error;

/// The coarse classification shared by every error this crate produces. Callers which only care about *why* a buffer
/// or value could not be processed can match on this instead of the detailed enums.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A string is not valid UTF-8
    InvalidEncoding,
    /// The input ended before the value was complete
    UnexpectedData,
    /// A length or count does not fit into the largest length field
    DataTooLarge,
    /// A lead byte or value has no representation on the other side
    UnsupportedValue,
    /// Bytes remained after the value when none were allowed
    TrailingData,
    /// The underlying writer failed
    Io,
}

/// A `DecodeError` together with the input position at which it occurred.
#[derive(Debug, PartialEq, Error)]
#[error("{inner} at input position {at}")]
pub struct DecoderError {
    #[source]
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn inner(&self) -> &DecodeError {
        &self.inner
    }

    /// The offset into the input buffer where decoding stopped
    pub fn position(&self) -> usize {
        self.at
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind()
    }
}

#[derive(Debug, PartialEq, Error)]
pub enum DecodeError {
    #[error("Unexpected end of buffer while decoding")]
    Eof,
    #[error("Declared {count} entries but only {remaining} bytes remain")]
    Implausible { count: usize, remaining: usize },
    #[error("String slice was not valid Utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("Lead byte {0:#04x} is reserved or an extension type")]
    UnsupportedTag(u8),
    #[error("A value of type {0} cannot be used as a map key")]
    IllegalKey(&'static str),
    #[error("Length {0} exceeds maximum {max}", max = usize::MAX)]
    Length(u64),
    #[error("{0} trailing bytes after the value")]
    Trailing(usize),
    #[error("Containers are nested deeper than {0} levels")]
    Depth(usize),
    #[error("An allocation failed")]
    Allocation,
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Eof | DecodeError::Implausible { .. } => ErrorKind::UnexpectedData,
            DecodeError::Utf8(_) => ErrorKind::InvalidEncoding,
            DecodeError::UnsupportedTag(_) | DecodeError::IllegalKey(_) => ErrorKind::UnsupportedValue,
            DecodeError::Length(_)
                | DecodeError::Depth(_)
                | DecodeError::Allocation => ErrorKind::DataTooLarge,
            DecodeError::Trailing(_) => ErrorKind::TrailingData,
        }
    }
}

impl From<std::collections::TryReserveError> for DecodeError {
    fn from(_e: std::collections::TryReserveError) -> DecodeError {
        DecodeError::Allocation
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("IO error {0}")]
    Io(#[from] std::io::Error),
    #[error("Length {0} exceeds maximum {max}", max = u32::MAX)]
    Length(usize),
    #[error("A value of type {0} cannot be used as a map key")]
    IllegalKey(&'static str),
}

impl EncodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EncodeError::Io(_) => ErrorKind::Io,
            EncodeError::Length(_) => ErrorKind::DataTooLarge,
            EncodeError::IllegalKey(_) => ErrorKind::UnsupportedValue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, EncodeError, ErrorKind};

    #[test]
    fn kinds() {
        assert_eq!(ErrorKind::UnexpectedData, DecodeError::Eof.kind());
        assert_eq!(ErrorKind::UnexpectedData, DecodeError::Implausible { count: 10, remaining: 2 }.kind());
        assert_eq!(ErrorKind::UnsupportedValue, DecodeError::UnsupportedTag(0xc1).kind());
        assert_eq!(ErrorKind::UnsupportedValue, DecodeError::IllegalKey("array").kind());
        assert_eq!(ErrorKind::TrailingData, DecodeError::Trailing(3).kind());
        assert_eq!(ErrorKind::DataTooLarge, DecodeError::Depth(512).kind());
        assert_eq!(ErrorKind::DataTooLarge, EncodeError::Length(usize::MAX).kind());
        assert_eq!(ErrorKind::UnsupportedValue, EncodeError::IllegalKey("nil").kind());
    }

    #[test]
    fn position_in_message() {
        let err = DecodeError::UnsupportedTag(0xc1).at(4);
        assert_eq!(4, err.position());
        assert_eq!("Lead byte 0xc1 is reserved or an extension type at input position 4", err.to_string());
    }
}
