use crate::config::Config;
use crate::error::EncodeError;
use crate::header::Header;
use crate::tag::Width;
use crate::value::Value;
use std::io::Write;
use tracing::trace;

/// Used to encode values. Every value is written as its narrowest header followed by its payload; containers recurse
/// into their elements in the order given, map entries as key then value.
pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
    config: Config,
}

impl<'w, W: Write> Encoder<'w, W> {

    /// Encode a value to the given writer. The resulting `usize` is the amount of bytes that got written.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self::with_config(writer, Config::default()).encode_value(value)
    }

    pub fn with_config(writer: &'w mut W, config: Config) -> Self {
        Self { writer, config }
    }

    /// Encode another value with this encoder's configuration. Values encoded one after another simply follow each
    /// other on wire. Map keys and lengths are checked before anything is written, so a value refused with
    /// `IllegalKey` or `Length` leaves the writer untouched.
    pub fn encode_value(&mut self, value: &Value) -> Result<usize, EncodeError> {
        self.check(value)?;
        self.write_value(value)
    }

    fn check(&self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Str(v)       => Header::Str(v.len()).tag().map(drop),
            Value::Bin(v)       => Header::Bin(v.len()).tag().map(drop),
            Value::Array(inner) => {
                Header::Array(inner.len()).tag()?;
                inner.iter().try_for_each(|value| self.check(value))
            },
            Value::Map(inner)   => {
                Header::Map(inner.len()).tag()?;
                for (key, val) in inner.iter() {
                    if !self.config.accepts_key(key) {
                        return Err(EncodeError::IllegalKey(key.type_name()));
                    }
                    self.check(key)?;
                    self.check(val)?;
                }
                Ok(())
            },
            _ => Ok(()),
        }
    }

    fn write_value(&mut self, value: &Value) -> Result<usize, EncodeError> {
        let mut c = 0;
        match value {
            Value::Nil        => Header::Nil.encode(self.writer),
            Value::Bool(v)    => Header::Bool(*v).encode(self.writer),
            Value::UInt(w, v) => Header::UInt(*w, *v).encode(self.writer),
            Value::Int(w, v)  => Header::Int(*w, *v).encode(self.writer),
            Value::F32(v)     => {
                c += Header::F32.encode(self.writer)?;
                self.writer.write_all(&v.to_be_bytes())?;
                Ok(c + Width::W32.bytes())
            },
            Value::F64(v)     => {
                c += Header::F64.encode(self.writer)?;
                self.writer.write_all(&v.to_be_bytes())?;
                Ok(c + Width::W64.bytes())
            },
            Value::Str(v)     => {
                c += Header::Str(v.len()).encode(self.writer)?;
                self.writer.write_all(v.as_bytes())?;
                Ok(c + v.len())
            },
            Value::Bin(v)     => {
                c += Header::Bin(v.len()).encode(self.writer)?;
                self.writer.write_all(v)?;
                Ok(c + v.len())
            },
            Value::Array(inner) => {
                c += Header::Array(inner.len()).encode(self.writer)?;
                for value in inner.iter() {
                    c += self.write_value(value)?;
                }
                Ok(c)
            },
            Value::Map(inner) => {
                c += Header::Map(inner.len()).encode(self.writer)?;
                for (key, val) in inner.iter() {
                    c += self.write_value(key)?;
                    c += self.write_value(val)?;
                }
                Ok(c)
            },
        }
    }

}

/// Packs a single value into a fresh buffer
pub fn pack(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    pack_into(value, &mut buf)?;
    Ok(buf)
}

/// Appends the encoding of `value` to `buf` and returns the number of appended bytes. On error `buf` is left as it
/// was before the call.
pub fn pack_into(value: &Value, buf: &mut Vec<u8>) -> Result<usize, EncodeError> {
    let start = buf.len();
    let len = Encoder::encode(value, buf).map_err(|e| {
        buf.truncate(start);
        e
    })?;
    trace!(len, "packed value");
    Ok(len)
}

/// Packs several values one after another into a single buffer. `Unpacker` reads them back.
pub fn pack_all<'v, 'a: 'v, I: IntoIterator<Item = &'v Value<'a>>>(values: I) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    let mut count = 0;
    {
        let mut encoder = Encoder::with_config(&mut buf, Config::default());
        for value in values {
            encoder.encode_value(value)?;
            count += 1;
        }
    }
    trace!(count, len = buf.len(), "packed values");
    Ok(buf)
}
