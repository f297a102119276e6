//! The atom of a MessagePack message is the `Value`.
//! Values are encoded on wire as headers and, if necessary, additional bytes which directly follow the header. Strings
//! and binary data decoded from a buffer borrow from it, so the decoded value may only live as long as the buffer does
//! unless it gets detached with `Value::into_owned`.

use crate::tag::Width;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::borrow::Cow;

/// The possible values according to the MessagePack data model.
///
/// Integers remember a width: the type they were created from or the wire field they were decoded from. It is purely
/// informative; the encoder always picks the narrowest tag and equality compares integers by their numeric value, so
/// `Value::UInt(Width::W8, 1) == Value::Int(Width::W64, 1)`. Floats compare by bit pattern.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Nil,
    Bool(bool),
    UInt(Width, u64),
    Int(Width, i64),
    F32(f32),
    F64(f64),
    Str(Cow<'a, str>),
    Bin(Cow<'a, [u8]>),
    Array(Vec<Value<'a>>),
    Map(Vec<(Value<'a>, Value<'a>)>),
}

impl<'a> Value<'a> {

    pub fn type_name(&self) -> &'static str {
        match *self {
            Self::Nil       => "nil",
            Self::Bool(_)   => "bool",
            Self::UInt(..)  => "unsigned integer",
            Self::Int(..)   => "integer",
            Self::F32(_)    => "f32",
            Self::F64(_)    => "f64",
            Self::Str(_)    => "string",
            Self::Bin(_)    => "binary",
            Self::Array(_)  => "array",
            Self::Map(_)    => "map",
        }
    }

    /// Scalars can serve as map keys in hash based containers; nil and containers cannot.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Nil | Self::Array(_) | Self::Map(_))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _             => None,
        }
    }

    /// The value as `u64` if it is a non-negative integer
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::UInt(_, v) => Some(v),
            Self::Int(_, v)  => u64::try_from(v).ok(),
            _                => None,
        }
    }

    /// The value as `i64` if it is an integer within range
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::UInt(_, v) => i64::try_from(v).ok(),
            Self::Int(_, v)  => Some(v),
            _                => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v as f64),
            Self::F64(v) => Some(v),
            _            => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _            => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bin(v) => Some(v),
            _            => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Self::Array(v) => Some(v),
            _              => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value<'a>, Value<'a>)]> {
        match self {
            Self::Map(v) => Some(v),
            _            => None,
        }
    }

    /// Looks up the first entry of a map whose key is the given string
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.as_map()?.iter().find(|(k, _)| k.as_str() == Some(key)).map(|(_, v)| v)
    }

    /// Copies all borrowed strings and bytes so that the value no longer depends on the input buffer
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Self::Nil         => Value::Nil,
            Self::Bool(v)     => Value::Bool(v),
            Self::UInt(w, v)  => Value::UInt(w, v),
            Self::Int(w, v)   => Value::Int(w, v),
            Self::F32(v)      => Value::F32(v),
            Self::F64(v)      => Value::F64(v),
            Self::Str(v)      => Value::Str(Cow::Owned(v.into_owned())),
            Self::Bin(v)      => Value::Bin(Cow::Owned(v.into_owned())),
            Self::Array(v)    => Value::Array(v.into_iter().map(Value::into_owned).collect()),
            Self::Map(v)      => Value::Map(v.into_iter().map(|(k, v)| (k.into_owned(), v.into_owned())).collect()),
        }
    }

}

impl<'a> PartialEq for Value<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil)               => true,
            (Self::Bool(a), Self::Bool(b))       => a == b,
            (Self::UInt(_, a), Self::UInt(_, b)) => a == b,
            (Self::Int(_, a), Self::Int(_, b))   => a == b,
            (Self::UInt(_, a), Self::Int(_, b))
                | (Self::Int(_, b), Self::UInt(_, a)) => u64::try_from(*b).map_or(false, |b| *a == b),
            (Self::F32(a), Self::F32(b))         => a.to_bits() == b.to_bits(),
            (Self::F64(a), Self::F64(b))         => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b))         => a == b,
            (Self::Bin(a), Self::Bin(b))         => a == b,
            (Self::Array(a), Self::Array(b))     => a == b,
            (Self::Map(a), Self::Map(b))         => a == b,
            _                                    => false,
        }
    }
}

macro_rules! from_int {
    ($variant:ident, $width:ident, $($t:ty),*) => {
        $(impl<'a> From<$t> for Value<'a> {
            fn from(v: $t) -> Self {
                Value::$variant(Width::$width, v.into())
            }
        })*
    };
}

from_int!(UInt, W8, u8);
from_int!(UInt, W16, u16);
from_int!(UInt, W32, u32);
from_int!(UInt, W64, u64);
from_int!(Int, W8, i8);
from_int!(Int, W16, i16);
from_int!(Int, W32, i32);
from_int!(Int, W64, i64);

impl<'a> From<bool> for Value<'a> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl<'a> From<f32> for Value<'a> {
    fn from(v: f32) -> Self {
        Value::F32(v)
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(v: f64) -> Self {
        Value::F64(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Str(Cow::Borrowed(v))
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(v: String) -> Self {
        Value::Str(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bin(Cow::Borrowed(v))
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(v: Vec<u8>) -> Self {
        Value::Bin(Cow::Owned(v))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(v: Vec<Value<'a>>) -> Self {
        Value::Array(v)
    }
}

impl<'a> From<Vec<(Value<'a>, Value<'a>)>> for Value<'a> {
    fn from(v: Vec<(Value<'a>, Value<'a>)>) -> Self {
        Value::Map(v)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

impl<'a> std::fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil          => f.write_str("nil"),
            Value::Bool(true)   => f.write_str("true"),
            Value::Bool(false)  => f.write_str("false"),
            Value::UInt(_, v)   => write!(f, "{}", v),
            Value::Int(_, v)    => write!(f, "{}", v),
            Value::F32(v)       => write!(f, "${}", v),
            Value::F64(v)       => write!(f, "$${}", v),
            Value::Bin(v)       => write!(f, "'{}'", STANDARD.encode(v)),
            Value::Str(v)       => write!(f, "\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")),
            Value::Map(v) if v.is_empty()   => f.write_str("{}"),
            Value::Array(v) if v.is_empty() => f.write_str("[]"),
            Value::Map(v)       => write!(f, "{{\n{}\n}}", v.iter()
                .flat_map(|(k, f)| format!("{}: {},", k, f).lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
                .collect::<Vec<String>>().join("\n")),
            Value::Array(v)     => write!(f, "[\n{}\n]", v.iter()
                .flat_map(|f| format!("{},", f).lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
                .collect::<Vec<String>>().join("\n")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::tag::Width;
    use std::borrow::Cow;

    #[test]
    fn numeric_equality() {
        assert_eq!(Value::UInt(Width::W8, 5), Value::Int(Width::W64, 5));
        assert_eq!(Value::Int(Width::W16, 300), Value::UInt(Width::W16, 300));
        assert_ne!(Value::Int(Width::W8, -1), Value::UInt(Width::W64, u64::MAX));
        assert_ne!(Value::F32(1.0), Value::F64(1.0));
        assert_ne!(Value::UInt(Width::W8, 1), Value::F64(1.0));
    }

    #[test]
    fn float_bits() {
        assert_eq!(Value::F64(f64::NAN), Value::F64(f64::NAN));
        assert_ne!(Value::F32(0.0), Value::F32(-0.0));
    }

    #[test]
    fn conversions() {
        assert_eq!(Value::UInt(Width::W16, 7), Value::from(7u16));
        assert_eq!(Value::Int(Width::W8, -7), Value::from(-7i8));
        assert_eq!(Value::Nil, Value::from(None::<bool>));
        assert_eq!(Value::Bool(true), Value::from(Some(true)));
        assert_eq!(Value::Str(Cow::Borrowed("a")), Value::from(String::from("a")));
        assert_eq!(Value::Bin(Cow::Borrowed(&[1, 2][..])), Value::from(vec![1u8, 2]));
        assert!(matches!(Value::from(3u32), Value::UInt(Width::W32, 3)));
    }

    #[test]
    fn accessors() {
        let value = Value::Map(vec![
            (Value::from("name"), Value::from("Jessica")),
            (Value::from("age"), Value::from(4u8)),
        ]);
        assert_eq!(Some("Jessica"), value.get("name").and_then(Value::as_str));
        assert_eq!(Some(4), value.get("age").and_then(Value::as_i64));
        assert_eq!(None, value.get("species"));
        assert_eq!(None, Value::from(-1i8).as_u64());
        assert_eq!(None, Value::from(u64::MAX).as_i64());
        assert!(!Value::Array(vec![]).is_scalar());
        assert!(Value::from(1.5f32).is_scalar());
    }

    #[test]
    fn display() {
        let value = Value::Map(vec![
            (Value::from("bytes"), Value::from(&[0xdeu8, 0xad, 0xbe, 0xef][..])),
            (Value::from(-3i32), Value::Array(vec![Value::Nil, Value::F32(1.5)])),
        ]);
        assert_eq!("{\n  \"bytes\": '3q2+7w==',\n  -3: [\n    nil,\n    $1.5,\n  ],\n}", format!("{}", value));
        assert_eq!("[]", format!("{}", Value::Array(vec![])));
    }

    #[test]
    fn owned() {
        let buf = String::from("borrowed");
        let value = Value::Array(vec![Value::from(buf.as_str())]);
        let owned: Value<'static> = value.into_owned();
        drop(buf);
        assert_eq!(Some("borrowed"), owned.as_array().and_then(|a| a[0].as_str()));
    }

}
