use std::fmt::Display;
use serde::{de, ser};
use mpack::{DecodeError, EncodeError, ErrorKind};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// An `Error` together with the input position at which deserialization stopped.
#[derive(Debug, Error)]
#[error("{inner} at input position {at}")]
pub struct DeserializationError {
    #[source]
    inner: Error,
    at: usize,
}

impl DeserializationError {
    pub fn into_inner(self) -> Error {
        self.inner
    }

    pub fn inner(&self) -> &Error {
        &self.inner
    }

    pub fn position(&self) -> usize {
        self.at
    }

    pub fn kind(&self) -> ErrorKind {
        self.inner.kind()
    }
}

#[derive(Debug, Error)]
pub enum Error {
    // Decode
    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),
    #[error("Trailing bytes in input")]
    Trailing,
    #[error("Unexpected header: expected one of ({expected}), found {found}", expected = .0.join(", "), found = .1)]
    UnexpectedHeader(&'static [&'static str], &'static str),
    #[error("Integer didn't fit into target type")]
    Int,
    // Encode
    #[error("Length required")]
    Length,
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),
    // Both
    #[error("{0}")]
    Message(String),
}

impl Error {
    pub fn at(self, at: usize) -> DeserializationError {
        DeserializationError { inner: self, at }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Decode(e) => e.kind(),
            Error::Encode(e) => e.kind(),
            Error::Trailing  => ErrorKind::TrailingData,
            Error::UnexpectedHeader(..)
                | Error::Int
                | Error::Length
                | Error::Message(_) => ErrorKind::UnsupportedValue,
        }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(_e: std::num::TryFromIntError) -> Error {
        Error::Int
    }
}
