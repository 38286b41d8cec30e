//! The atom of a tnetstring is the `Value`.
//! Every value is encoded as a single frame. Lists and maps are frames whose payload is itself a
//! concatenation of frames, so the length of a composite value is known before any of its
//! elements is read.

use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::float;
use crate::frame::{Frame, Tag};
use crate::map::Map;
use crate::text::{Extension, ToText};
use std::borrow::Cow;
use std::io::Write;
use std::iter::repeat;
use std::str::from_utf8;

/// The possible values according to the tnetstring data model.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// The canonical string type. No text encoding is assumed.
    Bytes(Cow<'a, [u8]>),
    List(Vec<Value<'a>>),
    Map(Map<'a>),
    /// Only ever encoded, as a string. The decoder never produces this variant.
    Extension(Extension),
}

impl<'a> Value<'a> {

    pub fn type_name(&self) -> &'static str {
        match *self {
            Self::Null         => "null",
            Self::Bool(_)      => "bool",
            Self::Int(_)       => "integer",
            Self::Float(_)     => "float",
            Self::Bytes(_)     => "bytes",
            Self::List(_)      => "list",
            Self::Map(_)       => "map",
            Self::Extension(ref e) => e.type_name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(&v[..]),
            _ => None,
        }
    }

    /// Byte strings which are valid Utf-8
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|v| from_utf8(v).ok())
    }

    pub fn as_list(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map<'a>> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    /// The string form of a value, as used for map keys. Byte strings are read as Utf-8 with
    /// invalid sequences replaced, numbers use their wire text, null is the empty string and
    /// composites their `Display` notation.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Value::Null         => Cow::Borrowed(""),
            Value::Bool(true)   => Cow::Borrowed("true"),
            Value::Bool(false)  => Cow::Borrowed("false"),
            Value::Int(v)       => Cow::Owned(v.to_string()),
            Value::Float(v)     => Cow::Owned(float::to_text(*v)),
            Value::Bytes(v)     => String::from_utf8_lossy(v),
            Value::Extension(e) => e.to_text().unwrap_or(Cow::Borrowed("")),
            composite           => Cow::Owned(composite.to_string()),
        }
    }

    /// Like `text` but keeps borrowing from the input buffer where possible.
    pub fn into_text(self) -> Cow<'a, str> {
        match self {
            Value::Bytes(Cow::Borrowed(v)) => String::from_utf8_lossy(v),
            Value::Bytes(Cow::Owned(v))    => match String::from_utf8(v) {
                Ok(s)  => Cow::Owned(s),
                Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
            },
            other => Cow::Owned(other.text().into_owned()),
        }
    }

    /// Copies all borrowed data so that the value no longer depends on the input buffer
    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Null         => Value::Null,
            Value::Bool(v)      => Value::Bool(v),
            Value::Int(v)       => Value::Int(v),
            Value::Float(v)     => Value::Float(v),
            Value::Bytes(v)     => Value::Bytes(Cow::Owned(v.into_owned())),
            Value::List(v)      => Value::List(v.into_iter().map(Value::into_owned).collect()),
            Value::Map(v)       => Value::Map(v.into_owned()),
            Value::Extension(e) => Value::Extension(e),
        }
    }

    const ESCAPED: &'static [(&'static str, &'static str)] = &[("\\", "\\\\"), ("\"", "\\\""), ("\n", "\\n")];

    fn quote(s: &str) -> String {
        let escaped = Self::ESCAPED.iter().fold(s.to_string(), |acc, (from, to)| acc.replace(from, to));
        format!("\"{}\"", escaped)
    }

    fn b64(input: &[u8]) -> String {
        const CHAR_SET: &'static [char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N',
            'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g',
            'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
            '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', '+', '/'
        ];
        let mut array = [0; 4];
        input.chunks(3).flat_map(|chunk| {
            let len = chunk.len();
            array[1..1 + len].copy_from_slice(chunk);
            for i in 0..(3 - len) {
                array[3 - i] = 0;
            }
            let x = u32::from_be_bytes(array);
            (0..=len).map(move |o| CHAR_SET[(x >> (18 - 6*o) & 0x3f) as usize]).chain(repeat('=').take(3-len))
        }).collect()
    }

    fn indent(entries: Vec<String>) -> String {
        entries.iter()
            .flat_map(|entry| entry.lines().map(|line| format!("  {}", line)).collect::<Vec<String>>())
            .collect::<Vec<String>>().join("\n")
    }

}

impl<'a> ToText for Value<'a> {
    fn to_text(&self) -> Option<Cow<'_, str>> {
        Some(self.text())
    }

    fn type_name(&self) -> &'static str {
        Value::type_name(self)
    }
}

impl<'a> std::fmt::Display for Value<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null         => f.write_str("null"),
            Value::Bool(true)   => f.write_str("true"),
            Value::Bool(false)  => f.write_str("false"),
            Value::Int(v)       => write!(f, "{}", v),
            Value::Float(v)     => f.write_str(&float::to_text(*v)),
            Value::Bytes(v)     => match from_utf8(v) {
                Ok(s)  => f.write_str(&Self::quote(s)),
                Err(_) => write!(f, "'{}'", Self::b64(v)),
            },
            Value::List(v) if v.is_empty() => f.write_str("[]"),
            Value::List(v)      => write!(f, "[\n{}\n]", Self::indent(v.iter()
                .map(|v| format!("{},", v)).collect())),
            Value::Map(v) if v.is_empty() => f.write_str("{}"),
            Value::Map(v)       => write!(f, "{{\n{}\n}}", Self::indent(v.iter()
                .map(|(k, v)| format!("{}: {},", Self::quote(k), v)).collect())),
            Value::Extension(e) => match e.to_text() {
                Some(text) => f.write_str(&Self::quote(&text)),
                None       => write!(f, "<{}>", e.type_name()),
            },
        }
    }
}

impl<'a> From<bool> for Value<'a> {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

macro_rules! from_int {
    ($($t:ty),*) => {
        $(
            impl<'a> From<$t> for Value<'a> {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

from_int!(i8, i16, i32, i64, u8, u16, u32);

impl<'a> From<f32> for Value<'a> {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl<'a> From<f64> for Value<'a> {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Bytes(Cow::Borrowed(v.as_bytes()))
    }
}

impl<'a> From<String> for Value<'a> {
    fn from(v: String) -> Self {
        Value::Bytes(Cow::Owned(v.into_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(v))
    }
}

impl<'a> From<Vec<u8>> for Value<'a> {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(v))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(v: Vec<Value<'a>>) -> Self {
        Value::List(v)
    }
}

impl<'a> From<Map<'a>> for Value<'a> {
    fn from(v: Map<'a>) -> Self {
        Value::Map(v)
    }
}

impl<'a> From<Extension> for Value<'a> {
    fn from(v: Extension) -> Self {
        Value::Extension(v)
    }
}

impl<'a, T: Into<Value<'a>>> From<Option<T>> for Value<'a> {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// Used to encode values into any writer.
pub struct Encoder<'w, W: Write> {
    writer: &'w mut W,
}

impl<'w, W: Write> Encoder<'w, W> {

    /// Encode a value to the given writer. The resulting `usize` is the amount of bytes that got written.
    pub fn encode(value: &Value, writer: &'w mut W) -> Result<usize, EncodeError> {
        Self { writer }.encode_inner(value)
    }

    fn encode_inner(&mut self, value: &Value) -> Result<usize, EncodeError> {
        match value {
            Value::Null        => Frame::encode(Tag::Null, b"", self.writer),
            Value::Bool(true)  => Frame::encode(Tag::Bool, b"true", self.writer),
            Value::Bool(false) => Frame::encode(Tag::Bool, b"false", self.writer),
            Value::Int(v)      => Frame::encode(Tag::Int, v.to_string().as_bytes(), self.writer),
            Value::Float(v)    => Frame::encode(Tag::Float, float::to_text(*v).as_bytes(), self.writer),
            Value::Bytes(v)    => Frame::encode(Tag::Bytes, v, self.writer),
            Value::List(inner) => {
                let mut payload = Vec::new();
                for element in inner.iter() {
                    Encoder::encode(element, &mut payload)?;
                }
                Frame::encode(Tag::List, &payload, self.writer)
            },
            Value::Map(inner) => {
                let mut payload = Vec::new();
                for (key, val) in inner.iter() {
                    Frame::encode(Tag::Bytes, key.as_bytes(), &mut payload)?;
                    Encoder::encode(val, &mut payload)?;
                }
                Frame::encode(Tag::Map, &payload, self.writer)
            },
            Value::Extension(ext) => match ext.to_text() {
                Some(text) => Frame::encode(Tag::Bytes, text.as_bytes(), self.writer),
                None       => Err(EncodeError::UnserializableType(ext.type_name())),
            },
        }
    }

}

/// Used to decode values. Byte strings and map keys are borrowed from the buffer wherever possible.
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {

    /// Decode a single value from the start of the given buffer. Returns the value and the number
    /// of consumed bytes; anything after them is left untouched.
    pub fn decode<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<(Value<'a>, usize), DecoderError> {
        let buf = buf.as_ref();
        let mut decoder = Self { buf, pos: 0 };
        let value = decoder.decode_value(buf.len()).map_err(|e| e.at(decoder.pos))?;
        Ok((value, decoder.pos))
    }

    /// Decode a concatenation of values until the buffer is exhausted.
    pub fn decode_all<B: ?Sized + AsRef<[u8]>>(buf: &'a B) -> Result<Vec<Value<'a>>, DecoderError> {
        let buf = buf.as_ref();
        let mut decoder = Self { buf, pos: 0 };
        let mut values = Vec::new();
        while decoder.pos < buf.len() {
            values.push(decoder.decode_value(buf.len()).map_err(|e| e.at(decoder.pos))?);
        }
        Ok(values)
    }

    /// Decodes the frame at the current position, which must end before `end`.
    fn decode_value(&mut self, end: usize) -> Result<Value<'a>, DecodeError> {
        let (frame, c) = Frame::decode(&self.buf[self.pos..end])?;
        let frame_end = self.pos + c;
        let payload_end = frame_end - 1;
        let value = match frame.tag {
            Tag::Bytes => Value::Bytes(Cow::Borrowed(frame.payload)),
            Tag::Int   => Value::Int(frame.int()?),
            Tag::Float => Value::Float(frame.float()?),
            Tag::Bool  => Value::Bool(frame.bool()),
            Tag::Null  => {
                frame.null()?;
                Value::Null
            },
            Tag::List  => {
                self.pos = payload_end - frame.payload.len();
                let mut elements = Vec::new();
                while self.pos < payload_end {
                    elements.push(self.decode_value(payload_end)?);
                }
                Value::List(elements)
            },
            Tag::Map   => {
                self.pos = payload_end - frame.payload.len();
                let mut entries = Map::new();
                while self.pos < payload_end {
                    let key = self.decode_value(payload_end)?;
                    if self.pos == payload_end {
                        return Err(DecodeError::UnbalancedMap);
                    }
                    let val = self.decode_value(payload_end)?;
                    entries.insert(key.into_text(), val);
                }
                Value::Map(entries)
            },
        };
        self.pos = frame_end;
        Ok(value)
    }

}

/// Encodes a value into a new buffer.
pub fn dump(value: &Value) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    Encoder::encode(value, &mut buf)?;
    Ok(buf)
}

/// Decodes the first value of `buf` and returns it together with the unconsumed remainder.
pub fn parse<B: ?Sized + AsRef<[u8]>>(buf: &B) -> Result<(Value<'_>, &[u8]), DecoderError> {
    let (value, c) = Decoder::decode(buf)?;
    Ok((value, &buf.as_ref()[c..]))
}
