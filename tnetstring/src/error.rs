use std::fmt::{Display, Formatter, self};
use std::num::{ParseFloatError, ParseIntError};

/// A `DecodeError` together with the input position at which decoding stopped.
#[derive(Debug, PartialEq)]
pub struct DecoderError {
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn kind(&self) -> &DecodeError {
        &self.inner
    }

    pub fn position(&self) -> usize {
        self.at
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
       Some(&self.inner)
    }
}

impl Display for DecoderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} at input position {}", self.inner, self.at)
    }
}

#[derive(Debug, PartialEq)]
pub enum DecodeError {
    /// The buffer was empty where a tnetstring was expected
    InvalidData,
    /// The tag byte is not one of `, # ^ ! ~ ] }`
    InvalidPayloadType(u8),
    /// A null carried a payload of the given length
    InvalidNullPayload(usize),
    /// A map payload ended after a key
    UnbalancedMap,
    Int(ParseIntError),
    Float(ParseFloatError),
    /// The frame is cut short: no colon, too few payload bytes or no tag
    Eof,
    /// The length prefix is not a decimal number that fits into `usize`
    Length,
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }
}

impl From<ParseIntError> for DecodeError {
    fn from(e: ParseIntError) -> DecodeError {
        DecodeError::Int(e)
    }
}

impl From<ParseFloatError> for DecodeError {
    fn from(e: ParseFloatError) -> DecodeError {
        DecodeError::Float(e)
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Int(e) => Some(e),
            DecodeError::Float(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DecodeError::InvalidData => f.write_str("Invalid data: expected a tnetstring, found an empty buffer"),
            DecodeError::InvalidPayloadType(tag) => write!(f, "Invalid payload type: {:?}", char::from(*tag)),
            DecodeError::InvalidNullPayload(len) => write!(f, "Payload must be 0 length for null, found {}", len),
            DecodeError::UnbalancedMap => f.write_str("Unbalanced map: key without a value"),
            DecodeError::Int(e) => write!(f, "Payload is not a valid integer: {}", e),
            DecodeError::Float(e) => write!(f, "Payload is not a valid float: {}", e),
            DecodeError::Eof => f.write_str("Unexpected end of buffer while decoding"),
            DecodeError::Length => f.write_str("Length prefix is not a decimal number"),
        }
    }
}

#[derive(Debug)]
pub enum EncodeError {
    Io(std::io::Error),
    /// The value has no text representation to fall back on
    UnserializableType(&'static str),
}

impl From<std::io::Error> for EncodeError {
    fn from(e: std::io::Error) -> EncodeError {
        EncodeError::Io(e)
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            EncodeError::Io(e) => write!(f, "IO error {}", e),
            EncodeError::UnserializableType(name) => write!(f, "Can't serialize stuff that's '{}'", name),
        }
    }
}
