use crate::config::{Config, Trailing};
use crate::cursor::Cursor;
use crate::error::{DecodeError, DecoderError};
use crate::header::Header;
use crate::value::Value;
use std::borrow::Cow;
use std::str::from_utf8;
use tracing::debug;

/// Used to decode values. All strings and byte data will be borrowed from the buffer instead of copied. This means
/// that the decoded value may only live as long as the buffer does. However, some allocations still occur: containers
/// need their own heap space.
pub struct Decoder<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: usize,
}

impl<'a> Decoder<'a> {

    /// Decode a single value from the front of the given buffer and return it together with the number of consumed
    /// bytes. Anything after the value is left unread.
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<(Value<'a>, usize), DecoderError> {
        Self::with_config(buf, Config::default()).decode_value()
    }

    pub fn with_config<B: ?Sized + AsRef<[u8]>>(buf: &'a B, config: Config) -> Self {
        Self { cursor: Cursor::new(buf), config, depth: 0 }
    }

    /// Offset of the next unread byte
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    /// Number of bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    /// Decode the next value starting at the current position and return it together with the number of consumed
    /// bytes. With `Trailing::Reject`, the value must end exactly at the end of the buffer. On error the decoder stays
    /// at the start of the failed value.
    pub fn decode_value(&mut self) -> Result<(Value<'a>, usize), DecoderError> {
        let start = self.cursor.clone();
        self.depth = 0;
        let result = self.read_value().and_then(|value| {
            if self.config.trailing == Trailing::Reject && !self.cursor.is_empty() {
                Err(DecodeError::Trailing(self.cursor.remaining()))
            } else {
                Ok(value)
            }
        });
        match result {
            Ok(value) => Ok((value, self.cursor.position() - start.position())),
            Err(e) => {
                let at = self.cursor.position();
                self.cursor = start;
                Err(e.at(at))
            }
        }
    }

    fn read_value(&mut self) -> Result<Value<'a>, DecodeError> {
        match Header::read(&mut self.cursor)? {
            Header::Nil        => Ok(Value::Nil),
            Header::Bool(v)    => Ok(Value::Bool(v)),
            Header::UInt(w, v) => Ok(Value::UInt(w, v)),
            Header::Int(w, v)  => Ok(Value::Int(w, v)),
            Header::F32        => Ok(Value::F32(f32::from_bits(self.cursor.read_u32()?))),
            Header::F64        => Ok(Value::F64(f64::from_bits(self.cursor.read_u64()?))),
            Header::Str(v)     => Ok(Value::Str(Cow::Borrowed(from_utf8(self.cursor.read_slice(v)?)?))),
            Header::Bin(v)     => Ok(Value::Bin(Cow::Borrowed(self.cursor.read_slice(v)?))),
            Header::Array(v)   => {
                self.enter(v, 1)?;
                let mut elements = Vec::with_capacity(0);
                elements.try_reserve(v)?;
                for _ in 0..v {
                    elements.push(self.read_value()?);
                }
                self.depth -= 1;
                Ok(Value::Array(elements))
            },
            Header::Map(v)     => {
                self.enter(v, 2)?;
                let mut entries = Vec::with_capacity(0);
                entries.try_reserve(v)?;
                for _ in 0..v {
                    let key = self.read_value()?;
                    if !self.config.accepts_key(&key) {
                        return Err(DecodeError::IllegalKey(key.type_name()));
                    }
                    let val = self.read_value()?;
                    entries.push((key, val));
                }
                self.depth -= 1;
                Ok(Value::Map(entries))
            },
        }
    }

    /// Every entry occupies at least `min_size` bytes, so a count larger than the rest of the buffer can be refused
    /// before anything gets allocated for it.
    fn enter(&mut self, count: usize, min_size: usize) -> Result<(), DecodeError> {
        let remaining = self.cursor.remaining();
        if count.checked_mul(min_size).map_or(true, |needed| needed > remaining) {
            return Err(DecodeError::Implausible { count, remaining });
        }
        if self.depth >= self.config.max_depth {
            return Err(DecodeError::Depth(self.config.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

}

/// Iterates over values packed one after another into a single buffer, as produced by `pack_all`. Iteration stops at
/// the end of the buffer or after the first error.
pub struct Unpacker<'a> {
    decoder: Decoder<'a>,
    failed: bool,
}

impl<'a> Unpacker<'a> {

    pub fn new<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Self {
        Self::with_config(buf, Config::default())
    }

    /// The trailing policy of `config` does not apply, values are expected to follow each other
    pub fn with_config<B: ?Sized + AsRef<[u8]>>(buf: &'a B, config: Config) -> Self {
        Self { decoder: Decoder::with_config(buf, config.trailing(Trailing::Ignore)), failed: false }
    }

    pub fn position(&self) -> usize {
        self.decoder.position()
    }

}

impl<'a> Iterator for Unpacker<'a> {
    type Item = Result<Value<'a>, DecoderError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.decoder.remaining() == 0 {
            return None;
        }
        match self.decoder.decode_value() {
            Ok((value, _)) => Some(Ok(value)),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Decodes the value at the start of `buf`. Bytes after it are ignored; use `unpack_exact` to refuse them or
/// `Decoder::decode` to learn how many bytes were consumed.
pub fn unpack<'a, B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<Value<'a>, DecoderError> {
    unpack_with(buf, Config::default())
}

/// Decodes the value which must span all of `buf`
pub fn unpack_exact<'a, B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<Value<'a>, DecoderError> {
    unpack_with(buf, Config::default().trailing(Trailing::Reject))
}

pub fn unpack_with<'a, B: ?Sized + AsRef<[u8]>>(buf: &'a B, config: Config) -> Result<Value<'a>, DecoderError> {
    Decoder::with_config(buf, config).decode_value().map(|(value, _)| value).map_err(|e| {
        debug!(position = e.position(), error = %e.inner(), "failed to unpack value");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::{unpack, unpack_exact, unpack_with, Decoder, Unpacker};
    use crate::config::{Config, KeyPolicy, Trailing};
    use crate::encode::{pack, pack_all};
    use crate::error::{DecodeError, ErrorKind};
    use crate::tag::Width;
    use crate::value::Value;
    use std::borrow::Cow;

    #[test]
    fn simple_values() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::Nil, &mut buf);
        assert_roundtrip(Value::Bool(true), &mut buf);
        assert_roundtrip(Value::Bool(false), &mut buf);
        // choose large prime number to make this test terminate in acceptable time
        for i in (0..u64::MAX).step_by(3_203_431_780_337) {
            assert_roundtrip(Value::from(i), &mut buf);
            assert_roundtrip(Value::from(i as i64), &mut buf);
        }
        for i in [i64::MIN, i32::MIN as i64 - 1, i16::MIN as i64, -129, -33, -32, -1, 0] {
            assert_roundtrip(Value::from(i), &mut buf);
        }
    }

    #[test]
    fn floats() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::F64(f64::MAX), &mut buf);
        assert_roundtrip(Value::F64(f64::MIN), &mut buf);
        assert_roundtrip(Value::F64(std::f64::consts::PI), &mut buf);
        assert_roundtrip(Value::F64(f64::NAN), &mut buf);
        assert_roundtrip(Value::F32(f32::MAX), &mut buf);
        assert_roundtrip(Value::F32(f32::MIN), &mut buf);
        assert_roundtrip(Value::F32(std::f32::consts::PI), &mut buf);
        assert_roundtrip(Value::F32(-0.0), &mut buf);
    }

    #[test]
    fn strings() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::from("Üben von Xylophon und Querflöte ist ja zweckmäßig."), &mut buf);
        assert_roundtrip(Value::from(""), &mut buf);
        assert_roundtrip(Value::from("x".repeat(256)), &mut buf);
        assert_roundtrip(Value::from("x".repeat(70000)), &mut buf);
    }

    #[test]
    fn bytes() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::from(&[1u8, 2, 3, 4, 255][..]), &mut buf);
        assert_roundtrip(Value::from(vec![7u8; 70000]), &mut buf);
    }

    #[test]
    fn array_long() {
        let mut buf = Vec::new();
        for i in 0..1 << 10 {
            assert_roundtrip(Value::Array(vec![Value::from(1u8); i]), &mut buf);
        }
        assert_roundtrip(Value::Array(vec![Value::Nil; 1 << 16]), &mut buf);
    }

    #[test]
    fn map() {
        let mut buf = Vec::new();
        assert_roundtrip(Value::Map(vec![
                (Value::from("first"),  Value::from(1u8)),
                (Value::from("second"), Value::Array(vec![Value::from(-2i8), Value::F64(2.5)])),
                (Value::from(3u16),     Value::Map(vec![(Value::Bool(true), Value::Nil)])),
                (Value::from("first"),  Value::from(4u8)),
        ]), &mut buf);
    }

    #[test]
    fn borrowed_from_input() {
        let buf = [0xa3u8, 0x61, 0x62, 0x63, 0xc4, 0x01, 0xff];
        let (value, consumed) = Decoder::decode(&buf).unwrap();
        assert!(matches!(value, Value::Str(Cow::Borrowed("abc"))));
        assert_eq!(4, consumed);
        assert!(matches!(unpack(&buf[4..]).unwrap(), Value::Bin(Cow::Borrowed(&[0xff]))));
    }

    #[test]
    fn wire_widths() {
        assert!(matches!(unpack(&[0xcdu8, 0x00, 0x05]).unwrap(), Value::UInt(Width::W16, 5)));
        assert!(matches!(unpack(&[0xd0u8, 0x05]).unwrap(), Value::Int(Width::W8, 5)));
        assert!(matches!(unpack(&[0xfeu8]).unwrap(), Value::Int(Width::W8, -2)));
        assert!(matches!(unpack(&[0x05u8]).unwrap(), Value::UInt(Width::W8, 5)));
    }

    #[test]
    fn trailing_bytes() {
        let buf = [0x01u8, 0x02];
        assert_eq!(Value::from(1u8), unpack(&buf).unwrap());
        assert_eq!((Value::from(1u8), 1), Decoder::decode(&buf).unwrap());
        let err = unpack_exact(&buf).unwrap_err();
        assert_eq!(DecodeError::Trailing(1), *err.inner());
        assert_eq!(ErrorKind::TrailingData, err.kind());
        assert_eq!(1, err.position());
        assert_eq!(Value::from(1u8), unpack_exact(&buf[..1]).unwrap());
    }

    #[test]
    fn errors() {
        assert_eq!(DecodeError::Eof, unpack(&[0u8; 0]).unwrap_err().into_inner());
        assert_eq!(DecodeError::UnsupportedTag(0xc1), unpack(&[0xc1u8]).unwrap_err().into_inner());
        assert_eq!(ErrorKind::UnsupportedValue, unpack(&[0xd4u8, 0x00, 0x00]).unwrap_err().kind());
        assert_eq!(ErrorKind::UnsupportedValue, unpack(&[0xc7u8, 0x00, 0x00]).unwrap_err().kind());
        let err = unpack(&[0xa2u8, 0xc3, 0x28]).unwrap_err();
        assert!(matches!(err.inner(), DecodeError::Utf8(_)));
        assert_eq!(ErrorKind::InvalidEncoding, err.kind());
        let err = unpack(&[0x92u8, 0x01, 0xc1]).unwrap_err();
        assert_eq!(DecodeError::UnsupportedTag(0xc1), *err.inner());
        assert_eq!(2, err.position());
    }

    #[test]
    fn truncation() {
        let value = Value::Map(vec![
            (Value::from("key"), Value::Array(vec![Value::from(70000u32), Value::F32(1.0), Value::from(vec![1u8, 2])])),
            (Value::from(-1000i16), Value::from("x".repeat(40))),
        ]);
        let buf = pack(&value).unwrap();
        for end in 0..buf.len() {
            let err = unpack(&buf[..end]).unwrap_err();
            assert_eq!(ErrorKind::UnexpectedData, err.kind(), "prefix of length {}", end);
        }
        assert_eq!(value, unpack(&buf).unwrap());
    }

    #[test]
    fn illegal_keys() {
        // {nil: 1}
        let buf = [0x81u8, 0xc0, 0x01];
        assert_eq!(DecodeError::IllegalKey("nil"), unpack(&buf).unwrap_err().into_inner());
        // {[]: 1}
        let buf = [0x81u8, 0x90, 0x01];
        assert_eq!(ErrorKind::UnsupportedValue, unpack(&buf).unwrap_err().kind());
        let any = Config::new().key_policy(KeyPolicy::Any);
        assert_eq!(Value::Map(vec![(Value::Array(vec![]), Value::from(1u8))]), unpack_with(&buf, any).unwrap());
    }

    #[test]
    fn too_big_allocations() {
        let mut buf = [0u8; 5];
        for lead in [0xdd, 0xdf, 0xc6, 0xdb] {
            buf[0] = lead;
            for i in (1..u32::MAX).step_by(3_203_431) {
                buf[1..].copy_from_slice(&i.to_be_bytes());
                let err = unpack(&buf).unwrap_err(); // should never panic
                assert_eq!(ErrorKind::UnexpectedData, err.kind());
            }
        }
        assert_eq!(
            DecodeError::Implausible { count: 0xffff, remaining: 0 },
            unpack(&[0xdcu8, 0xff, 0xff]).unwrap_err().into_inner()
        );
    }

    #[test]
    fn nesting_limit() {
        let mut buf = vec![0x91; 10];
        buf.push(0xc0);
        assert!(unpack(&buf).is_ok());
        let shallow = Config::new().max_depth(4);
        assert_eq!(DecodeError::Depth(4), unpack_with(&buf, shallow).unwrap_err().into_inner());
    }

    #[test]
    fn failed_value_leaves_no_state() {
        // [<invalid utf-8>] followed by [nil]
        let buf = [0x91u8, 0xa1, 0xff, 0x91, 0xc0];
        let mut decoder = Decoder::with_config(&buf, Config::new().max_depth(1));
        for _ in 0..2 {
            let err = decoder.decode_value().unwrap_err();
            assert!(matches!(err.inner(), DecodeError::Utf8(_)));
            assert_eq!(3, err.position());
            assert_eq!(0, decoder.position());
        }
        let mut decoder = Decoder::with_config(&buf[3..], Config::new().max_depth(1));
        assert_eq!((Value::Array(vec![Value::Nil]), 2), decoder.decode_value().unwrap());
    }

    #[test]
    fn rejected_trailing_bytes_are_not_consumed() {
        let buf = [0x01u8, 0x02];
        let mut decoder = Decoder::with_config(&buf, Config::new().trailing(Trailing::Reject));
        assert_eq!(DecodeError::Trailing(1), decoder.decode_value().unwrap_err().into_inner());
        assert_eq!(2, decoder.remaining());
    }

    #[test]
    fn several_values() {
        let values = vec![Value::from(1u8), Value::from("two"), Value::Array(vec![Value::Nil])];
        let buf = pack_all(&values).unwrap();
        let unpacked: Result<Vec<_>, _> = Unpacker::new(&buf).collect();
        assert_eq!(values, unpacked.unwrap());

        let mut broken = buf.clone();
        broken.push(0xc1);
        broken.push(0xc0);
        let mut unpacker = Unpacker::new(&broken);
        assert_eq!(3, unpacker.by_ref().take(3).filter(Result::is_ok).count());
        assert!(unpacker.next().unwrap().is_err());
        assert!(unpacker.next().is_none());
    }

    fn assert_roundtrip(val: Value, buf: &mut Vec<u8>) {
        buf.clear();
        let written = crate::encode::pack_into(&val, buf).unwrap();
        let (decoded, consumed) = Decoder::decode(&buf[..]).unwrap();
        assert_eq!(written, consumed);
        assert_eq!(val, decoded);
    }

}
