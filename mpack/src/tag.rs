//! The MessagePack type-tag table. Every encoded value starts with a single lead byte which names its format. Small
//! integers, short strings and small containers pack their value or length directly into the low bits of that byte
//! (the fixed forms); everything else is followed by a big-endian field of one, two, four or eight bytes.
//!
//! | Range       | Format                                     |
//! |-------------|--------------------------------------------|
//! | 0x00 - 0x7f | positive fixint                            |
//! | 0x80 - 0x8f | fixmap, low nibble is the entry count      |
//! | 0x90 - 0x9f | fixarray, low nibble is the element count  |
//! | 0xa0 - 0xbf | fixstr, low five bits are the byte length  |
//! | 0xc0        | nil                                        |
//! | 0xc2 / 0xc3 | false / true                               |
//! | 0xc4 - 0xc6 | bin 8/16/32                                |
//! | 0xca / 0xcb | float 32/64                                |
//! | 0xcc - 0xcf | uint 8/16/32/64                            |
//! | 0xd0 - 0xd3 | int 8/16/32/64                             |
//! | 0xd9 - 0xdb | str 8/16/32                                |
//! | 0xdc / 0xdd | array 16/32                                |
//! | 0xde / 0xdf | map 16/32                                  |
//! | 0xe0 - 0xff | negative fixint                            |
//!
//! The remaining bytes (0xc1, the extension formats 0xc7 - 0xc9 and 0xd4 - 0xd8) are not supported.

use crate::error::{DecodeError, EncodeError};
use std::convert::TryFrom;

const POS_FIXINT_MAX: u8 = 0x7f;
const FIXMAP: u8 = 0x80;
const FIXARRAY: u8 = 0x90;
const FIXSTR: u8 = 0xa0;
const NIL: u8 = 0xc0;
const FALSE: u8 = 0xc2;
const TRUE: u8 = 0xc3;
const BIN8: u8 = 0xc4;
const BIN16: u8 = 0xc5;
const BIN32: u8 = 0xc6;
const F32: u8 = 0xca;
const F64: u8 = 0xcb;
const U8: u8 = 0xcc;
const U16: u8 = 0xcd;
const U32: u8 = 0xce;
const U64: u8 = 0xcf;
const I8: u8 = 0xd0;
const I16: u8 = 0xd1;
const I32: u8 = 0xd2;
const I64: u8 = 0xd3;
const STR8: u8 = 0xd9;
const STR16: u8 = 0xda;
const STR32: u8 = 0xdb;
const ARRAY16: u8 = 0xdc;
const ARRAY32: u8 = 0xdd;
const MAP16: u8 = 0xde;
const MAP32: u8 = 0xdf;
const NEG_FIXINT: u8 = 0xe0;

/// Containers with fewer entries than this use the fixed form
pub const FIX_CONTAINER_LIMIT: usize = 1 << 4;
/// Strings shorter than this use the fixed form
pub const FIX_STR_LIMIT: usize = 1 << 5;

/// Size class of an integer or of an extended length field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Number of bytes occupied on wire
    pub const fn bytes(self) -> usize {
        match self {
            Width::W8 => 1,
            Width::W16 => 2,
            Width::W32 => 4,
            Width::W64 => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    PosFixInt(u8),
    FixMap(u8),
    FixArray(u8),
    FixStr(u8),
    Nil,
    False,
    True,
    Bin8,
    Bin16,
    Bin32,
    F32,
    F64,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    Str8,
    Str16,
    Str32,
    Array16,
    Array32,
    Map16,
    Map32,
    NegFixInt(i8),
}

impl Tag {

    /// Returns the mnemonic of the tag. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Tag::PosFixInt(_) => "positive fixint",
            Tag::FixMap(_)    => "fixmap",
            Tag::FixArray(_)  => "fixarray",
            Tag::FixStr(_)    => "fixstr",
            Tag::Nil          => "nil",
            Tag::False        => "false",
            Tag::True         => "true",
            Tag::Bin8         => "bin 8",
            Tag::Bin16        => "bin 16",
            Tag::Bin32        => "bin 32",
            Tag::F32          => "float 32",
            Tag::F64          => "float 64",
            Tag::U8           => "uint 8",
            Tag::U16          => "uint 16",
            Tag::U32          => "uint 32",
            Tag::U64          => "uint 64",
            Tag::I8           => "int 8",
            Tag::I16          => "int 16",
            Tag::I32          => "int 32",
            Tag::I64          => "int 64",
            Tag::Str8         => "str 8",
            Tag::Str16        => "str 16",
            Tag::Str32        => "str 32",
            Tag::Array16      => "array 16",
            Tag::Array32      => "array 32",
            Tag::Map16        => "map 16",
            Tag::Map32        => "map 32",
            Tag::NegFixInt(_) => "negative fixint",
        }
    }

    /// The width of the big-endian field directly following the lead byte. For integers and floats this is the
    /// value itself, for everything else it is a length or count. Fixed forms and constants have none.
    pub fn field(&self) -> Option<Width> {
        match *self {
            Tag::PosFixInt(_)
                | Tag::FixMap(_)
                | Tag::FixArray(_)
                | Tag::FixStr(_)
                | Tag::NegFixInt(_)
                | Tag::Nil
                | Tag::False
                | Tag::True                        => None,
            Tag::Bin8 | Tag::U8 | Tag::I8 | Tag::Str8 => Some(Width::W8),
            Tag::Bin16
                | Tag::U16
                | Tag::I16
                | Tag::Str16
                | Tag::Array16
                | Tag::Map16                       => Some(Width::W16),
            Tag::Bin32
                | Tag::F32
                | Tag::U32
                | Tag::I32
                | Tag::Str32
                | Tag::Array32
                | Tag::Map32                       => Some(Width::W32),
            Tag::F64 | Tag::U64 | Tag::I64         => Some(Width::W64),
        }
    }

    /// The narrowest tag able to hold an unsigned integer
    pub fn for_uint(value: u64) -> Tag {
        if value <= POS_FIXINT_MAX as u64 {
            Tag::PosFixInt(value as u8)
        } else if value <= u8::MAX as u64 {
            Tag::U8
        } else if value <= u16::MAX as u64 {
            Tag::U16
        } else if value <= u32::MAX as u64 {
            Tag::U32
        } else {
            Tag::U64
        }
    }

    /// The narrowest tag able to hold a signed integer. Non-negative values share the tags of unsigned integers, so
    /// that every number has exactly one shortest encoding regardless of the type it came from.
    pub fn for_int(value: i64) -> Tag {
        if value >= 0 {
            Self::for_uint(value as u64)
        } else if value >= -32 {
            Tag::NegFixInt(value as i8)
        } else if value >= i8::MIN as i64 {
            Tag::I8
        } else if value >= i16::MIN as i64 {
            Tag::I16
        } else if value >= i32::MIN as i64 {
            Tag::I32
        } else {
            Tag::I64
        }
    }

    pub fn for_str(len: usize) -> Result<Tag, EncodeError> {
        Ok(match len {
            l if l < FIX_STR_LIMIT => Tag::FixStr(l as u8),
            l => match Self::field_width(l)? {
                Width::W8  => Tag::Str8,
                Width::W16 => Tag::Str16,
                _          => Tag::Str32,
            },
        })
    }

    /// There is no fixed form for binary data
    pub fn for_bin(len: usize) -> Result<Tag, EncodeError> {
        Ok(match Self::field_width(len)? {
            Width::W8  => Tag::Bin8,
            Width::W16 => Tag::Bin16,
            _          => Tag::Bin32,
        })
    }

    pub fn for_array(len: usize) -> Result<Tag, EncodeError> {
        Ok(match len {
            l if l < FIX_CONTAINER_LIMIT => Tag::FixArray(l as u8),
            l => match Self::field_width(l)? {
                Width::W8 | Width::W16 => Tag::Array16,
                _                      => Tag::Array32,
            },
        })
    }

    pub fn for_map(len: usize) -> Result<Tag, EncodeError> {
        Ok(match len {
            l if l < FIX_CONTAINER_LIMIT => Tag::FixMap(l as u8),
            l => match Self::field_width(l)? {
                Width::W8 | Width::W16 => Tag::Map16,
                _                      => Tag::Map32,
            },
        })
    }

    /// Smallest length field able to hold `len`. Length fields are at most 32 bits wide.
    #[inline]
    fn field_width(len: usize) -> Result<Width, EncodeError> {
        match u64::try_from(len) {
            Ok(l) if l <= u8::MAX as u64  => Ok(Width::W8),
            Ok(l) if l <= u16::MAX as u64 => Ok(Width::W16),
            Ok(l) if l <= u32::MAX as u64 => Ok(Width::W32),
            _                             => Err(EncodeError::Length(len)),
        }
    }

}

impl TryFrom<u8> for Tag {
    type Error = DecodeError;

    fn try_from(b: u8) -> Result<Self, Self::Error> {
        match b {
            0x00..=0x7f => Ok(Tag::PosFixInt(b)),
            0x80..=0x8f => Ok(Tag::FixMap(b & 0x0f)),
            0x90..=0x9f => Ok(Tag::FixArray(b & 0x0f)),
            0xa0..=0xbf => Ok(Tag::FixStr(b & 0x1f)),
            NIL         => Ok(Tag::Nil),
            FALSE       => Ok(Tag::False),
            TRUE        => Ok(Tag::True),
            BIN8        => Ok(Tag::Bin8),
            BIN16       => Ok(Tag::Bin16),
            BIN32       => Ok(Tag::Bin32),
            F32         => Ok(Tag::F32),
            F64         => Ok(Tag::F64),
            U8          => Ok(Tag::U8),
            U16         => Ok(Tag::U16),
            U32         => Ok(Tag::U32),
            U64         => Ok(Tag::U64),
            I8          => Ok(Tag::I8),
            I16         => Ok(Tag::I16),
            I32         => Ok(Tag::I32),
            I64         => Ok(Tag::I64),
            STR8        => Ok(Tag::Str8),
            STR16       => Ok(Tag::Str16),
            STR32       => Ok(Tag::Str32),
            ARRAY16     => Ok(Tag::Array16),
            ARRAY32     => Ok(Tag::Array32),
            MAP16       => Ok(Tag::Map16),
            MAP32       => Ok(Tag::Map32),
            0xe0..=0xff => Ok(Tag::NegFixInt(b as i8)),
            x           => Err(DecodeError::UnsupportedTag(x)),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        match tag {
            Tag::PosFixInt(v) => v & POS_FIXINT_MAX,
            Tag::FixMap(n)    => FIXMAP | (n & 0x0f),
            Tag::FixArray(n)  => FIXARRAY | (n & 0x0f),
            Tag::FixStr(n)    => FIXSTR | (n & 0x1f),
            Tag::Nil          => NIL,
            Tag::False        => FALSE,
            Tag::True         => TRUE,
            Tag::Bin8         => BIN8,
            Tag::Bin16        => BIN16,
            Tag::Bin32        => BIN32,
            Tag::F32          => F32,
            Tag::F64          => F64,
            Tag::U8           => U8,
            Tag::U16          => U16,
            Tag::U32          => U32,
            Tag::U64          => U64,
            Tag::I8           => I8,
            Tag::I16          => I16,
            Tag::I32          => I32,
            Tag::I64          => I64,
            Tag::Str8         => STR8,
            Tag::Str16        => STR16,
            Tag::Str32        => STR32,
            Tag::Array16      => ARRAY16,
            Tag::Array32      => ARRAY32,
            Tag::Map16        => MAP16,
            Tag::Map32        => MAP32,
            Tag::NegFixInt(v) => NEG_FIXINT | (v as u8 & 0x1f),
        }
    }
}
