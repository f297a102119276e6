use serde::Deserialize;
use serde::de::{self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, Unexpected, VariantAccess, Visitor};
use mpack::{Config, Cursor, DecodeError, Header, Tag};
use serde::de::value::StrDeserializer;
use tracing::debug;

use crate::error::{DeserializationError, Error, Result};

/// Like a Header but with the payload of scalars already read. More than a header less than a value.
enum Atom<'de> {
    Nil,
    Bool(bool),
    UInt(u64),
    Int(i64),
    F32(f32),
    F64(f64),
    Str(&'de str),
    Bin(&'de [u8]),
    Array(usize),
    Map(usize),
}

impl<'de> Atom<'de> {
    fn name(&self) -> &'static str {
        match *self {
            Atom::Nil      => "Nil",
            Atom::Bool(_)  => "Bool",
            Atom::UInt(_)  => "UInt",
            Atom::Int(_)   => "Int",
            Atom::F32(_)   => "F32",
            Atom::F64(_)   => "F64",
            Atom::Str(_)   => "Str",
            Atom::Bin(_)   => "Bin",
            Atom::Array(_) => "Array",
            Atom::Map(_)   => "Map",
        }
    }
}

pub struct Deserializer<'de> {
    cursor: Cursor<'de>,
    depth: usize,
    max_depth: usize,
}

impl<'de> Deserializer<'de> {
    pub fn from_bytes(input: &'de [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Only the nesting limit of `config` applies; serde types decide on their own which keys they accept
    pub fn with_config(input: &'de [u8], config: Config) -> Self {
        Deserializer { cursor: Cursor::new(input), depth: 0, max_depth: config.max_depth }
    }

    pub fn position(&self) -> usize {
        self.cursor.position()
    }
}

/// Deserializes a value which must span the whole input
pub fn from_bytes<'a, T: Deserialize<'a>>(s: &'a [u8]) -> std::result::Result<T, DeserializationError> {
    let mut deserializer = Deserializer::from_bytes(s);
    let result = T::deserialize(&mut deserializer)
        .map_err(|e| e.at(deserializer.position()))
        .and_then(|t| match deserializer.cursor.is_empty() {
            true  => Ok(t),
            false => Err(Error::Trailing.at(deserializer.position())),
        });
    if let Err(e) = &result {
        debug!(position = e.position(), error = %e.inner(), "failed to deserialize");
    }
    result
}

impl<'de> Deserializer<'de> {

    fn decode_atom(&mut self) -> Result<Atom<'de>> {
        Ok(match Header::read(&mut self.cursor)? {
            Header::Nil        => Atom::Nil,
            Header::Bool(v)    => Atom::Bool(v),
            Header::UInt(_, v) => Atom::UInt(v),
            Header::Int(_, v)  => Atom::Int(v),
            Header::F32        => Atom::F32(f32::from_bits(self.cursor.read_u32()?)),
            Header::F64        => Atom::F64(f64::from_bits(self.cursor.read_u64()?)),
            Header::Str(v)     => Atom::Str(std::str::from_utf8(self.cursor.read_slice(v)?).map_err(DecodeError::from)?),
            Header::Bin(v)     => Atom::Bin(self.cursor.read_slice(v)?),
            Header::Array(v)   => Atom::Array(self.plausible(v, 1)?),
            Header::Map(v)     => Atom::Map(self.plausible(v, 2)?),
        })
    }

    /// Refuses counts which could not possibly be backed by the rest of the input
    #[inline]
    fn plausible(&self, count: usize, min_size: usize) -> Result<usize> {
        let remaining = self.cursor.remaining();
        match count.checked_mul(min_size) {
            Some(needed) if needed <= remaining => Ok(count),
            _ => Err(Error::Decode(DecodeError::Implausible { count, remaining })),
        }
    }

    #[inline]
    fn decode_int<T: TryFrom<u64> + TryFrom<i64>>(&mut self) -> Result<T> {
        match self.decode_atom()? {
            Atom::UInt(v) => <T as TryFrom<u64>>::try_from(v).map_err(|_| Error::Int),
            Atom::Int(v)  => <T as TryFrom<i64>>::try_from(v).map_err(|_| Error::Int),
            o => Err(Error::UnexpectedHeader(&["UInt", "Int"], o.name())),
        }
    }

    fn decode_str(&mut self) -> Result<&'de str> {
        match self.decode_atom()? {
            Atom::Str(v) => Ok(v),
            o => Err(Error::UnexpectedHeader(&["Str"], o.name())),
        }
    }

    fn visit_seq<V: Visitor<'de>>(&mut self, len: usize, visitor: V) -> Result<V::Value> {
        self.enter()?;
        let mut access = SeqDeserializer::new(self, len);
        let value = visitor.visit_seq(&mut access)?;
        let remaining = access.remaining;
        self.depth -= 1;
        match remaining {
            0 => Ok(value),
            _ => Err(de::Error::invalid_length(len, &"fewer elements in array")),
        }
    }

    fn visit_map<V: Visitor<'de>>(&mut self, len: usize, visitor: V) -> Result<V::Value> {
        self.enter()?;
        let mut access = MapDeserializer::new(self, len);
        let value = visitor.visit_map(&mut access)?;
        let remaining = access.remaining;
        self.depth -= 1;
        match remaining {
            0 => Ok(value),
            _ => Err(de::Error::invalid_length(len, &"fewer entries in map")),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(Error::Decode(DecodeError::Depth(self.max_depth)));
        }
        self.depth += 1;
        Ok(())
    }

}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Nil      => visitor.visit_unit(),
            Atom::Bool(v)  => visitor.visit_bool(v),
            Atom::UInt(v)  => visitor.visit_u64(v),
            Atom::Int(v)   => visitor.visit_i64(v),
            Atom::F32(v)   => visitor.visit_f32(v),
            Atom::F64(v)   => visitor.visit_f64(v),
            Atom::Str(v)   => visitor.visit_borrowed_str(v),
            Atom::Bin(v)   => visitor.visit_borrowed_bytes(v),
            Atom::Array(v) => self.visit_seq(v, visitor),
            Atom::Map(v)   => self.visit_map(v, visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bool(v) => visitor.visit_bool(v),
            o => Err(Error::UnexpectedHeader(&["Bool"], o.name())),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.decode_int()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.decode_int()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.decode_int()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.decode_int()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.decode_int()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.decode_int()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.decode_int()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.decode_int()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::F32(v) => visitor.visit_f32(v),
            o => Err(Error::UnexpectedHeader(&["F32"], o.name())),
        }
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::F64(v) => visitor.visit_f64(v),
            // widening is lossless
            Atom::F32(v) => visitor.visit_f64(f64::from(v)),
            o => Err(Error::UnexpectedHeader(&["F64", "F32"], o.name())),
        }
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.decode_str()?;
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(de::Error::invalid_value(Unexpected::Str(v), &"a single character")),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.decode_str()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bin(v) => visitor.visit_borrowed_bytes(v),
            o => Err(Error::UnexpectedHeader(&["Bin"], o.name())),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bin(v) => visitor.visit_byte_buf(v.to_vec()),
            Atom::Array(v) => {
                let mut bytes = Vec::with_capacity(v);
                for _ in 0..v {
                    bytes.push(self.decode_int()?);
                }
                visitor.visit_byte_buf(bytes)
            },
            o => Err(Error::UnexpectedHeader(&["Bin", "Array"], o.name())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.cursor.peek()? == u8::from(Tag::Nil) {
            self.cursor.read_u8()?;
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Nil => visitor.visit_unit(),
            o => Err(Error::UnexpectedHeader(&["Nil"], o.name())),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Array(v) => self.visit_seq(v, visitor),
            o => Err(Error::UnexpectedHeader(&["Array"], o.name())),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(self, _name: &'static str, _len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Map(v) => self.visit_map(v, visitor),
            o => Err(Error::UnexpectedHeader(&["Map"], o.name())),
        }
    }

    /// Structs are usually maps keyed by field name, but producers writing them compactly as arrays of their
    /// fields in declaration order are understood as well.
    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, _fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Map(v)   => self.visit_map(v, visitor),
            Atom::Array(v) => self.visit_seq(v, visitor),
            o => Err(Error::UnexpectedHeader(&["Map", "Array"], o.name())),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str],  visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Str(s) => visitor.visit_enum(s.into_deserializer()),
            Atom::Map(1) => {
                let variant = self.decode_str()?;
                self.enter()?;
                let value = visitor.visit_enum(EnumDeserializer::new(self, variant))?;
                self.depth -= 1;
                Ok(value)
            },
            o => Err(Error::UnexpectedHeader(&["Str", "Map"], o.name())),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Str(v)  => visitor.visit_borrowed_str(v),
            Atom::UInt(v) => visitor.visit_u64(v),
            o => Err(Error::UnexpectedHeader(&["Str", "UInt"], o.name())),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_any(visitor)
    }

}

struct MapDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> MapDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, remaining: usize) -> Self {
        Self { de, remaining }
    }
}

impl<'de, 'a, 'b> MapAccess<'de> for &'b mut MapDeserializer<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

struct EnumDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    variant: &'de str,
}

impl<'a, 'de> EnumDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, variant: &'de str) -> Self {
        Self { de, variant }
    }
}

impl<'de, 'a> EnumAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let deserializer: StrDeserializer<'de, Error> = self.variant.into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, self))
    }
}

impl<'de, 'a> VariantAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        de::Deserializer::deserialize_unit(self.de, de::IgnoredAny).map(|_| ())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_seq(self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self.de, "", fields, visitor)
    }

}

struct SeqDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    remaining: usize,
}

impl<'a, 'de> SeqDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, remaining: usize) -> Self {
        Self { de, remaining }
    }
}

impl<'de, 'a, 'b> SeqAccess<'de> for &'b mut SeqDeserializer<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }

}
