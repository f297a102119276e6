//! Conveniently serialize and deserialize your Rust data structures into the MessagePack wire format.
//!
//! Serialization writes straight to the output without building an `mpack::Value` first; deserialization borrows
//! strings and byte slices from the input wherever the target type allows it.
//!
//! # Data model
//!
//! | serde                          | wire                                       |
//! |--------------------------------|--------------------------------------------|
//! | `()`, unit struct, `None`      | nil                                        |
//! | `Some(v)`, newtype struct      | `v`                                        |
//! | integers                       | narrowest int or uint                      |
//! | `f32` / `f64`                  | float 32 / float 64                        |
//! | `char`, `str`                  | str                                        |
//! | bytes                          | bin                                        |
//! | seq, tuple                     | array                                      |
//! | map                            | map                                        |
//! | struct                         | map keyed by field name                    |
//! | unit variant                   | str holding the variant name               |
//! | other variants                 | map with one entry `{variant: content}`    |
//!
//! This is the same mapping `rmp-serde` uses for its named representation, so messages can be exchanged with it in
//! both directions. Structs written compactly as arrays are understood when deserializing, too.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Cat<'a> {
//!     name: &'a str,
//!     species: Species,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message<'a> {
//!     version: u32,
//!     #[serde(borrow)]
//!     cats: Vec<Cat<'a>>,
//! }
//!
//! let msg = Message {
//!     version: 1,
//!     cats: vec![Cat { name: "Jessica", species: Species::LynxLynx }],
//! };
//!
//! let bytes = mpack_serde::to_bytes(&msg).unwrap();
//! assert_eq!(bytes, [
//!   0x82,                                                   // Map of length 2
//!     0xa7,                                                 // Str of length 7
//!       0x76, 0x65, 0x72, 0x73, 0x69, 0x6f, 0x6e,           // 'version'
//!     0x01,                                                 // positive fixint 1
//!     0xa4,                                                 // Str of length 4
//!       0x63, 0x61, 0x74, 0x73,                             // 'cats'
//!     0x91,                                                 // Array of length 1
//!       0x82,                                               // Map of length 2
//!         0xa4,                                             // Str of length 4
//!           0x6e, 0x61, 0x6d, 0x65,                         // 'name'
//!         0xa7,                                             // Str of length 7
//!           0x4a, 0x65, 0x73, 0x73, 0x69, 0x63, 0x61,       // 'Jessica'
//!         0xa7,                                             // Str of length 7
//!           0x73, 0x70, 0x65, 0x63, 0x69, 0x65, 0x73,       // 'species'
//!         0xa8,                                             // Str of length 8
//!           0x4c, 0x79, 0x6e, 0x78, 0x4c, 0x79, 0x6e, 0x78, // 'LynxLynx'
//! ]);
//!
//! let deserialized: Message = mpack_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(msg, deserialized);
//! ```

mod de;
mod error;
mod ser;

pub use de::{from_bytes, Deserializer};
pub use error::{DeserializationError, Error, Result};
pub use ser::{to_bytes, to_writer, Serializer};
