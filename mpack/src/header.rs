//! A header is what a lead byte and its extended field mean once they have been resolved through the tag table: the
//! complete value for nil, booleans and integers, the number of payload bytes for strings and binary data, or the
//! number of entries for containers. Floats are announced by their header and followed by their big-endian bit pattern.
//!
//! Encoding a header always chooses the narrowest tag able to represent it; decoding accepts any valid tag, including
//! wider ones than necessary.

use crate::cursor::Cursor;
use crate::error::{DecodeError, EncodeError};
use crate::tag::{Tag, Width};
use std::convert::TryFrom;
use std::io::Write;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Header {
    /// Also known as unit or null
    Nil,
    Bool(bool),
    /// An unsigned integer and the width of the field it was read from. The width is ignored when encoding.
    UInt(Width, u64),
    /// A signed integer and the width of the field it was read from. The width is ignored when encoding.
    Int(Width, i64),
    /// The following four bytes contain an IEEE-754 32-bit floating point number
    F32,
    /// The following eight bytes contain an IEEE-754 64-bit floating point number
    F64,
    /// The value describes the length in bytes of a following unicode string
    Str(usize),
    /// The value describes the length of a following byte array
    Bin(usize),
    /// The value describes the length in values of the array
    Array(usize),
    /// The value describes the number of entries of the map. The entries are encoded in
    /// key value key value ... order.
    Map(usize),
}

impl Header {

    /// Returns the mnemonic of the header. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Header::Nil       => "Nil",
            Header::Bool(_)   => "Bool",
            Header::UInt(..)  => "UInt",
            Header::Int(..)   => "Int",
            Header::F32       => "F32",
            Header::F64       => "F64",
            Header::Str(_)    => "Str",
            Header::Bin(_)    => "Bin",
            Header::Array(_)  => "Array",
            Header::Map(_)    => "Map",
        }
    }

    /// The tag this header gets encoded with
    pub fn tag(&self) -> Result<Tag, EncodeError> {
        match *self {
            Header::Nil         => Ok(Tag::Nil),
            Header::Bool(true)  => Ok(Tag::True),
            Header::Bool(false) => Ok(Tag::False),
            Header::UInt(_, v)  => Ok(Tag::for_uint(v)),
            Header::Int(_, v)   => Ok(Tag::for_int(v)),
            Header::F32         => Ok(Tag::F32),
            Header::F64         => Ok(Tag::F64),
            Header::Str(l)      => Tag::for_str(l),
            Header::Bin(l)      => Tag::for_bin(l),
            Header::Array(l)    => Tag::for_array(l),
            Header::Map(l)      => Tag::for_map(l),
        }
    }

    /// Returns the number of written bytes
    pub fn encode<W: Write>(&self, w: &mut W) -> Result<usize, EncodeError> {
        let tag = self.tag()?;
        w.write_all(&[u8::from(tag)])?;
        let field = match *self {
            Header::UInt(_, v)    => v,
            Header::Int(_, v)     => v as u64,
            Header::Str(l)
                | Header::Bin(l)
                | Header::Array(l)
                | Header::Map(l)  => l as u64,
            Header::Nil
                | Header::Bool(_)
                | Header::F32
                | Header::F64     => return Ok(1),
        };
        match tag.field() {
            Some(width) => Ok(1 + Self::write_field(w, field, width)?),
            None        => Ok(1),
        }
    }

    /// Returns the decoded header and the number of consumed bytes
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &B) -> Result<(Self, usize), DecodeError> {
        let mut cursor = Cursor::new(buf);
        let header = Self::read(&mut cursor)?;
        Ok((header, cursor.position()))
    }

    /// Reads a header from the cursor, leaving it positioned at the payload, if any
    pub fn read(cursor: &mut Cursor) -> Result<Self, DecodeError> {
        let tag = Tag::try_from(cursor.peek()?)?;
        // only advance once the whole header is known to be present
        let mut ahead = cursor.clone();
        ahead.read_u8()?;
        let header = match tag {
            Tag::PosFixInt(v) => Header::UInt(Width::W8, v as u64),
            Tag::NegFixInt(v) => Header::Int(Width::W8, v as i64),
            Tag::FixMap(n)    => Header::Map(n as usize),
            Tag::FixArray(n)  => Header::Array(n as usize),
            Tag::FixStr(n)    => Header::Str(n as usize),
            Tag::Nil          => Header::Nil,
            Tag::False        => Header::Bool(false),
            Tag::True         => Header::Bool(true),
            Tag::F32          => Header::F32,
            Tag::F64          => Header::F64,
            Tag::U8           => Header::UInt(Width::W8, ahead.read_u8()? as u64),
            Tag::U16          => Header::UInt(Width::W16, ahead.read_u16()? as u64),
            Tag::U32          => Header::UInt(Width::W32, ahead.read_u32()? as u64),
            Tag::U64          => Header::UInt(Width::W64, ahead.read_u64()?),
            Tag::I8           => Header::Int(Width::W8, ahead.read_u8()? as i8 as i64),
            Tag::I16          => Header::Int(Width::W16, ahead.read_u16()? as i16 as i64),
            Tag::I32          => Header::Int(Width::W32, ahead.read_u32()? as i32 as i64),
            Tag::I64          => Header::Int(Width::W64, ahead.read_u64()? as i64),
            Tag::Bin8         => Header::Bin(ahead.read_u8()? as usize),
            Tag::Bin16        => Header::Bin(ahead.read_u16()? as usize),
            Tag::Bin32        => Header::Bin(Self::to_usize(ahead.read_u32()?)?),
            Tag::Str8         => Header::Str(ahead.read_u8()? as usize),
            Tag::Str16        => Header::Str(ahead.read_u16()? as usize),
            Tag::Str32        => Header::Str(Self::to_usize(ahead.read_u32()?)?),
            Tag::Array16      => Header::Array(ahead.read_u16()? as usize),
            Tag::Array32      => Header::Array(Self::to_usize(ahead.read_u32()?)?),
            Tag::Map16        => Header::Map(ahead.read_u16()? as usize),
            Tag::Map32        => Header::Map(Self::to_usize(ahead.read_u32()?)?),
        };
        *cursor = ahead;
        Ok(header)
    }

    /// Writes the lowest `width` bytes of `value` in network byte order. Negative integers arrive here as their two's
    /// complement, so truncation keeps the sign.
    #[inline]
    fn write_field<W: Write>(w: &mut W, value: u64, width: Width) -> Result<usize, EncodeError> {
        let buf = value.to_be_bytes();
        w.write_all(&buf[buf.len() - width.bytes()..])?;
        Ok(width.bytes())
    }

    #[inline]
    fn to_usize(value: u32) -> Result<usize, DecodeError> {
        usize::try_from(value).map_err(|_| DecodeError::Length(value as u64))
    }

}
