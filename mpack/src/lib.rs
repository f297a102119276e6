//! An implementation of the MessagePack wire format over a dynamic `Value` model.
//!
//! All encoding functions take a value and a writer and return the amount of written bytes. All decoding functions
//! take a buffer and return the decoded value, borrowing strings and byte data from the buffer, together with the
//! number of consumed bytes where that is of interest.
//!
//! Encoding is deterministic: every integer and every length is written with the narrowest tag able to hold it, so
//! equal values always produce equal bytes. Non-negative integers use the unsigned tags regardless of their Rust type.
//! Decoding accepts any valid tag, including wider ones than necessary, and remembers the width it read from in
//! `Value::UInt` and `Value::Int`. Values compare equal if their numbers do, regardless of that width.
//!
//! # A note on `usize`
//!
//! MessagePack lengths are at most 32 bits wide. Strings, byte arrays and containers with more than `u32::MAX` entries
//! cannot be encoded and raise `EncodeError::Length`. On architectures where `usize` is smaller than `u32`, some valid
//! messages can not be decoded and raise `DecodeError::Length`.
//!
//! # A note on Maps
//!
//! The variant `Value::Map` uses a `Vec` of key-value pairs internally because Rust's floating point types `f32` and
//! `f64` implement neither `Ord` nor `Hash`. This keeps the order of entries as it was on the wire and tolerates
//! duplicate keys. By default only scalar values are accepted as keys; see `KeyPolicy`.
//!
//! # Unsupported types
//!
//! Extension types, the timestamp extension and the reserved lead byte `0xc1` are refused with
//! `DecodeError::UnsupportedTag`.
//!
//! # Examples
//!
//! ```
//! use mpack::*;
//!
//! let value = Value::Map(vec![(Value::from("compact"), Value::from(true)), (Value::from("schema"), Value::from(0u8))]);
//! let buf = pack(&value).unwrap();
//! assert_eq!(buf, [
//!     0x82, // Map of length 2
//!     0xa7, // Str of length 7
//!     0x63, 0x6f, 0x6d, 0x70, 0x61, 0x63, 0x74, // 'compact'
//!     0xc3, // true
//!     0xa6, // Str of length 6
//!     0x73, 0x63, 0x68, 0x65, 0x6d, 0x61, // 'schema'
//!     0x00, // 0
//! ]);
//! let decoded = Decoder::decode(&buf).unwrap();
//! assert_eq!(value, decoded.0);
//! assert_eq!(18, decoded.1);
//! assert_eq!(Some(true), decoded.0.get("compact").and_then(Value::as_bool));
//! ```

mod config;
mod cursor;
mod decode;
mod encode;
mod error;
mod header;
mod tag;
mod value;

pub use config::*;
pub use cursor::*;
pub use decode::*;
pub use encode::*;
pub use error::*;
pub use header::*;
pub use tag::*;
pub use value::*;
