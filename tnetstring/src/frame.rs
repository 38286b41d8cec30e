//! A tnetstring frame consists of a decimal length prefix, a colon, exactly that many payload
//! bytes and a single trailing tag byte which defines how the payload is to be interpreted:
//!
//! ```text
//! 3:foo,
//! ^ ^  ^
//! | |  tag
//! | payload
//! length
//! ```
//!
//! Frames know nothing about the meaning of their payload, composite payloads are simply
//! concatenations of further frames.

use crate::error::{DecodeError, EncodeError};
use std::convert::TryFrom;
use std::io::Write;

/// The trailing byte of a frame.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Tag {
    /// Raw bytes, the canonical string type
    Bytes = b',',
    /// Decimal integer text
    Int   = b'#',
    /// Decimal float text
    Float = b'^',
    /// `true` or `false`
    Bool  = b'!',
    /// Empty payload
    Null  = b'~',
    /// Concatenated values
    List  = b']',
    /// Concatenated key value pairs
    Map   = b'}',
}

impl Tag {

    /// Returns the mnemonic of the tag. This is useful for error messages.
    pub fn name(&self) -> &'static str {
        match *self {
            Tag::Bytes => "Bytes",
            Tag::Int   => "Int",
            Tag::Float => "Float",
            Tag::Bool  => "Bool",
            Tag::Null  => "Null",
            Tag::List  => "List",
            Tag::Map   => "Map",
        }
    }

    #[inline]
    pub fn byte(&self) -> u8 {
        *self as u8
    }

}

impl TryFrom<u8> for Tag {
    type Error = DecodeError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            x if x == Tag::Bytes as u8 => Ok(Tag::Bytes),
            x if x == Tag::Int as u8   => Ok(Tag::Int),
            x if x == Tag::Float as u8 => Ok(Tag::Float),
            x if x == Tag::Bool as u8  => Ok(Tag::Bool),
            x if x == Tag::Null as u8  => Ok(Tag::Null),
            x if x == Tag::List as u8  => Ok(Tag::List),
            x if x == Tag::Map as u8   => Ok(Tag::Map),
            x => Err(DecodeError::InvalidPayloadType(x)),
        }
    }
}

/// One length-prefixed, tagged span of the input.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Frame<'a> {
    pub payload: &'a [u8],
    pub tag: Tag,
}

impl<'a> Frame<'a> {

    /// Returns the frame at the start of `buf` and the number of consumed bytes. Everything after
    /// the consumed bytes is left alone.
    pub fn decode(buf: &'a [u8]) -> Result<(Self, usize), DecodeError> {
        if buf.is_empty() {
            return Err(DecodeError::InvalidData);
        }
        let (len, colon) = Self::decode_length(buf)?;
        let rest = &buf[colon + 1..];
        if rest.len() < len {
            return Err(DecodeError::Eof);
        }
        let tag = match rest.get(len) {
            Some(b) => Tag::try_from(*b)?,
            None    => return Err(DecodeError::Eof),
        };
        Ok((Frame { payload: &rest[..len], tag }, colon + len + 2))
    }

    /// Writes a complete frame and returns the number of written bytes.
    pub fn encode<W: Write>(tag: Tag, payload: &[u8], w: &mut W) -> Result<usize, EncodeError> {
        let len = payload.len().to_string();
        w.write_all(len.as_bytes())?;
        w.write_all(b":")?;
        w.write_all(payload)?;
        w.write_all(&[tag.byte()])?;
        Ok(len.len() + payload.len() + 2)
    }

    /// Interprets the payload as integer text
    pub fn int(&self) -> Result<i64, DecodeError> {
        Ok(String::from_utf8_lossy(self.payload).parse::<i64>()?)
    }

    /// Interprets the payload as float text
    pub fn float(&self) -> Result<f64, DecodeError> {
        Ok(crate::float::from_text(&String::from_utf8_lossy(self.payload))?)
    }

    /// Anything but the exact payload `true` is false, even payloads which are neither `true`
    /// nor `false`.
    pub fn bool(&self) -> bool {
        self.payload == b"true"
    }

    pub fn null(&self) -> Result<(), DecodeError> {
        match self.payload.len() {
            0   => Ok(()),
            len => Err(DecodeError::InvalidNullPayload(len)),
        }
    }

    /// Returns the declared payload length and the index of the colon terminating it
    #[inline]
    fn decode_length(buf: &[u8]) -> Result<(usize, usize), DecodeError> {
        let mut len: usize = 0;
        for (i, b) in buf.iter().enumerate() {
            match *b {
                b':' if i > 0 => return Ok((len, i)),
                b'0'..=b'9'   => {
                    len = len.checked_mul(10)
                        .and_then(|l| l.checked_add(usize::from(b - b'0')))
                        .ok_or(DecodeError::Length)?;
                },
                _ => return Err(DecodeError::Length),
            }
        }
        Err(DecodeError::Eof)
    }

}

#[cfg(test)]
mod tests {
    use super::{Frame, Tag};
    use crate::error::DecodeError;
    use std::convert::TryFrom;

    #[test]
    fn all_tags() {
        for b in b",#^!~]}" {
            assert_eq!(*b, Tag::try_from(*b).unwrap().byte());
        }
        assert_eq!(Err(DecodeError::InvalidPayloadType(b'x')), Tag::try_from(b'x'));
    }

    #[test]
    fn leaves_remainder() {
        let buf = b"3:foo,4:true!";
        let (frame, c) = Frame::decode(buf).unwrap();
        assert_eq!(Frame { payload: b"foo", tag: Tag::Bytes }, frame);
        assert_eq!(b"4:true!", &buf[c..]);
    }

    #[test]
    fn empty_payload() {
        assert_eq!((Frame { payload: b"", tag: Tag::Null }, 3), Frame::decode(b"0:~").unwrap());
        assert_eq!((Frame { payload: b"", tag: Tag::List }, 4), Frame::decode(b"00:]").unwrap());
    }

    #[test]
    fn payload_may_contain_colons_and_tags() {
        let (frame, c) = Frame::decode(b"5:a:1,}]").unwrap();
        assert_eq!(b"a:1,}", frame.payload);
        assert_eq!(Tag::List, frame.tag);
        assert_eq!(8, c);
    }

    #[test]
    fn malformed() {
        assert_eq!(Err(DecodeError::InvalidData), Frame::decode(b""));
        assert_eq!(Err(DecodeError::Eof), Frame::decode(b"12"));
        assert_eq!(Err(DecodeError::Eof), Frame::decode(b"3:fo"));
        assert_eq!(Err(DecodeError::Eof), Frame::decode(b"3:foo"));
        assert_eq!(Err(DecodeError::Length), Frame::decode(b":foo,"));
        assert_eq!(Err(DecodeError::Length), Frame::decode(b"-3:foo,"));
        assert_eq!(Err(DecodeError::Length), Frame::decode(b"99999999999999999999999:x,"));
        assert_eq!(Err(DecodeError::InvalidPayloadType(b'?')), Frame::decode(b"3:foo?"));
    }

    #[test]
    fn scalar_payloads() {
        assert_eq!(-42, Frame::decode(b"3:-42#").unwrap().0.int().unwrap());
        assert_eq!(6.67e-11, Frame::decode(b"8:6.67e-11^").unwrap().0.float().unwrap());
        assert!(matches!(Frame::decode(b"2:4x#").unwrap().0.int(), Err(DecodeError::Int(_))));
        assert!(matches!(Frame::decode(b"2:\xff1#").unwrap().0.int(), Err(DecodeError::Int(_))));
        assert!(matches!(Frame::decode(b"3:one^").unwrap().0.float(), Err(DecodeError::Float(_))));
        assert!(Frame::decode(b"4:true!").unwrap().0.bool());
        assert!(!Frame::decode(b"4:TRUE!").unwrap().0.bool());
        assert!(!Frame::decode(b"3:yes!").unwrap().0.bool());
        assert_eq!(Err(DecodeError::InvalidNullPayload(1)), Frame::decode(b"1:x~").unwrap().0.null());
    }

    #[test]
    fn encode_counts_bytes() {
        let mut buf = Vec::new();
        assert_eq!(6, Frame::encode(Tag::Bytes, b"foo", &mut buf).unwrap());
        assert_eq!(9, Frame::encode(Tag::Bytes, "ßöö".as_bytes(), &mut buf).unwrap());
        assert_eq!(b"3:foo,6:\xc3\x9f\xc3\xb6\xc3\xb6,".to_vec(), buf);
    }

}
