use serde::Deserialize;
use serde::de::{self, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use tnetstring::{float, DecodeError, Decoder, Frame, Tag};
use std::borrow::Cow;
use std::convert::TryInto;
use std::str::FromStr;

use crate::error::{DeserializationError, Error, Result};

/// The payload bounds of a composite frame within the input
#[derive(Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

/// Like a Frame but with scalar payloads already interpreted. More than a frame less than a value.
enum Atom<'de> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(&'de [u8]),
    List(Span),
    Map(Span),
}

impl<'de> Atom<'de> {
    fn name(&self) -> &'static str {
        match *self {
            Atom::Null => "Null",
            Atom::Bool(_) => "Bool",
            Atom::Int(_) => "Int",
            Atom::Float(_) => "Float",
            Atom::Bytes(_) => "Bytes",
            Atom::List(_) => "List",
            Atom::Map(_) => "Map",
        }
    }
}

pub struct Deserializer<'de> {
    input: &'de [u8],
    pos: usize,
    /// End of the innermost composite payload currently being read
    end: usize,
}

impl<'de> Deserializer<'de> {
    pub fn from_bytes(input: &'de [u8]) -> Self {
        Deserializer { input, pos: 0, end: input.len() }
    }
}

/// Deserializes exactly one value which must span the whole input.
pub fn from_bytes<'a, T: Deserialize<'a>>(s: &'a [u8]) -> std::result::Result<T, DeserializationError> {
    let (t, rest) = from_bytes_partial(s)?;
    if rest.is_empty() {
        Ok(t)
    } else {
        Err(Error::Trailing.at(s.len() - rest.len()))
    }
}

/// Deserializes the first value of the input and returns whatever follows it.
pub fn from_bytes_partial<'a, T: Deserialize<'a>>(s: &'a [u8]) -> std::result::Result<(T, &'a [u8]), DeserializationError> {
    let mut deserializer = Deserializer::from_bytes(s);
    let t = T::deserialize(&mut deserializer).map_err(|e| e.at(deserializer.pos))?;
    Ok((t, &s[deserializer.pos..]))
}

impl<'de> Deserializer<'de> {

    fn decode_frame(&mut self) -> Result<Frame<'de>> {
        let (frame, c) = Frame::decode(&self.input[self.pos..self.end])?;
        self.pos += c;
        Ok(frame)
    }

    fn peek_tag(&self) -> Result<Tag> {
        let (frame, _) = Frame::decode(&self.input[self.pos..self.end])?;
        Ok(frame.tag)
    }

    fn decode_atom(&mut self) -> Result<Atom<'de>> {
        let frame = self.decode_frame()?;
        let end = self.pos - 1;
        let span = Span { start: end - frame.payload.len(), end };
        Ok(match frame.tag {
            Tag::Null => {
                frame.null()?;
                Atom::Null
            },
            Tag::Bool => Atom::Bool(frame.bool()),
            Tag::Int => Atom::Int(frame.int()?),
            Tag::Float => Atom::Float(frame.float()?),
            Tag::Bytes => Atom::Bytes(frame.payload),
            Tag::List => Atom::List(span),
            Tag::Map => Atom::Map(span),
        })
    }

    /// Runs `f` confined to the payload of a composite. The payload must be used up entirely.
    fn nested<T, F: FnOnce(&mut Self) -> Result<T>>(&mut self, span: Span, f: F) -> Result<T> {
        let (pos, end) = (self.pos, self.end);
        self.pos = span.start;
        self.end = span.end;
        let t = f(self)?;
        if self.pos != self.end {
            return Err(Error::Trailing);
        }
        self.pos = pos;
        self.end = end;
        Ok(t)
    }

    #[inline]
    fn decode_int(&mut self) -> Result<i64> {
        match self.decode_atom()? {
            Atom::Int(i) => Ok(i),
            o => Err(Error::UnexpectedTag(&["Int"], o.name())),
        }
    }

    #[inline]
    fn decode_float(&mut self) -> Result<f64> {
        match self.decode_atom()? {
            Atom::Float(f) => Ok(f),
            o => Err(Error::UnexpectedTag(&["Float"], o.name())),
        }
    }

    fn decode_str(&mut self) -> Result<&'de str> {
        match self.decode_atom()? {
            Atom::Bytes(v) => Ok(std::str::from_utf8(v)?),
            o => Err(Error::UnexpectedTag(&["Bytes"], o.name())),
        }
    }

    /// Keys are text. Whatever else is found in key position gets converted the same way the
    /// value decoder converts it.
    fn decode_key(&mut self) -> Result<Cow<'de, str>> {
        let start = self.pos;
        let key = match self.decode_atom()? {
            Atom::Bytes(v) => String::from_utf8_lossy(v),
            Atom::Int(v) => Cow::Owned(v.to_string()),
            Atom::Float(v) => Cow::Owned(float::to_text(v)),
            Atom::Bool(v) => Cow::Owned(v.to_string()),
            Atom::Null => Cow::Borrowed(""),
            Atom::List(_) | Atom::Map(_) => {
                let input: &'de [u8] = self.input;
                let (value, _) = Decoder::decode(&input[start..self.pos])
                    .map_err(|e| Error::Decode(e.into_inner()))?;
                value.into_text()
            },
        };
        if self.pos == self.end {
            return Err(DecodeError::UnbalancedMap.into());
        }
        Ok(key)
    }

}

impl<'de, 'a> de::Deserializer<'de> for &'a mut Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Null => visitor.visit_unit(),
            Atom::Bool(v) => visitor.visit_bool(v),
            Atom::Int(v) => visitor.visit_i64(v),
            Atom::Float(v) => visitor.visit_f64(v),
            Atom::Bytes(v) => match std::str::from_utf8(v) {
                Ok(s) => visitor.visit_borrowed_str(s),
                Err(_) => visitor.visit_borrowed_bytes(v),
            },
            Atom::List(span) => self.nested(span, |de| visitor.visit_seq(SeqDeserializer::new(de))),
            Atom::Map(span) => self.nested(span, |de| visitor.visit_map(MapDeserializer::new(de))),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bool(v) => visitor.visit_bool(v),
            o => Err(Error::UnexpectedTag(&["Bool"], o.name())),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.decode_int()?.try_into()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.decode_int()?.try_into()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.decode_int()?.try_into()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(self.decode_int()?)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.decode_int()?.try_into()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.decode_int()?.try_into()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.decode_int()?.try_into()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.decode_int()?.try_into()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.decode_float()? as f32)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f64(self.decode_float()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.decode_str()?;
        let mut chars = v.chars();
        let c = chars.next().ok_or(Error::Decode(DecodeError::Eof))?;
        match chars.next() {
            Some(_) => Err(Error::Trailing),
            None => visitor.visit_char(c),
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
            Atom::Bytes(v) => visitor.visit_borrowed_bytes(v),
            o => Err(Error::UnexpectedTag(&["Bytes"], o.name())),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bytes(v) => visitor.visit_byte_buf(v.to_vec()),
            Atom::List(span) => {
                let bytes = self.nested(span, |de| {
                    let mut bytes: Vec<u8> = Vec::new();
                    while de.pos < de.end {
                        bytes.push(de.decode_int()?.try_into()?);
                    }
                    Ok(bytes)
                })?;
                visitor.visit_byte_buf(bytes)
            },
            o => Err(Error::UnexpectedTag(&["Bytes", "List"], o.name())),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.peek_tag()? {
            Tag::Null => {
                self.decode_atom()?;
                visitor.visit_none()
            },
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Null => visitor.visit_unit(),
            o => Err(Error::UnexpectedTag(&["Null"], o.name())),
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
            Atom::List(span) => self.nested(span, |de| visitor.visit_seq(SeqDeserializer::new(de))),
            o => Err(Error::UnexpectedTag(&["List"], o.name())),
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
            Atom::Map(span) => self.nested(span, |de| visitor.visit_map(MapDeserializer::new(de))),
            o => Err(Error::UnexpectedTag(&["Map"], o.name())),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, _fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str], visitor: V) -> Result<V::Value> {
        match self.decode_atom()? {
            Atom::Bytes(v) => visitor.visit_enum(std::str::from_utf8(v)?.into_deserializer()),
            Atom::Map(span) => self.nested(span, |de| {
                let variant = de.decode_key()?;
                visitor.visit_enum(EnumDeserializer::new(de, variant))
            }),
            o => Err(Error::UnexpectedTag(&["Bytes", "Map"], o.name())),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_borrowed_str(self.decode_str()?)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.decode_frame()?;
        visitor.visit_unit()
    }

}

/// Map keys arrive as text. Whatever the target key type is gets parsed from it.
struct KeyDeserializer<'de> {
    key: Cow<'de, str>,
}

impl<'de> KeyDeserializer<'de> {
    fn new(key: Cow<'de, str>) -> Self {
        Self { key }
    }

    fn parse<T: FromStr>(&self) -> Result<T> {
        self.key.parse().map_err(|_| Error::Key(self.key.to_string(), std::any::type_name::<T>()))
    }
}

macro_rules! parse_key {
    ($($method:ident => $visit:ident($ty:ty)),* $(,)?) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
                visitor.$visit(self.parse::<$ty>()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for KeyDeserializer<'de> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.key {
            Cow::Borrowed(s) => visitor.visit_borrowed_str(s),
            Cow::Owned(s) => visitor.visit_string(s),
        }
    }

    parse_key! {
        deserialize_bool => visit_bool(bool),
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
        deserialize_char => visit_char(char),
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str], visitor: V) -> Result<V::Value> {
        match self.key {
            Cow::Borrowed(s) => visitor.visit_enum(s.into_deserializer()),
            Cow::Owned(s) => visitor.visit_enum(s.into_deserializer()),
        }
    }

    serde::forward_to_deserialize_any! {
        str string bytes byte_buf unit unit_struct seq tuple tuple_struct map struct identifier
        ignored_any
    }

}

struct MapDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
}

impl<'a, 'de> MapDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>) -> Self {
        Self { de }
    }
}

impl<'de, 'a> MapAccess<'de> for MapDeserializer<'a, 'de> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.de.pos == self.de.end {
            Ok(None)
        } else {
            let key = self.de.decode_key()?;
            seed.deserialize(KeyDeserializer::new(key)).map(Some)
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }
}

struct EnumDeserializer<'a, 'de: 'a> {
    de: &'a mut Deserializer<'de>,
    variant: Cow<'de, str>,
}

impl<'a, 'de> EnumDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>, variant: Cow<'de, str>) -> Self {
        Self { de, variant }
    }
}

impl<'de, 'a> EnumAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let variant = seed.deserialize(KeyDeserializer::new(self.variant.clone()))?;
        Ok((variant, self))
    }
}

impl<'de, 'a> VariantAccess<'de> for EnumDeserializer<'a, 'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.de.decode_atom()? {
            Atom::Null => Ok(()),
            o => Err(Error::UnexpectedTag(&["Null"], o.name())),
        }
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
}

impl<'a, 'de> SeqDeserializer<'a, 'de> {
    fn new(de: &'a mut Deserializer<'de>) -> Self {
        Self { de }
    }
}

impl<'de, 'a> SeqAccess<'de> for SeqDeserializer<'a, 'de> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.de.pos == self.de.end {
            Ok(None)
        } else {
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

}
