//! Tagged netstrings: every value is written as its decimal payload length, a colon, the payload
//! and a single tag byte naming the type of the payload. All encoding functions take a value and
//! a writer and return the amount of written bytes. All decoding functions take a buffer and
//! return the value and the number of consumed bytes, or the unconsumed remainder.
//!
//! # A note on floats
//!
//! Float payloads are text, so two implementations only agree byte for byte if they format floats
//! the same way. This crate writes the shortest text which parses back to the same `f64`, see
//! the `float` module for the exact layout. Decoding accepts any text Rust's `f64` parser does.
//!
//! # A note on Maps
//!
//! `Value::Map` keeps its entries in a `Vec` so that they are encoded in insertion order. Keys
//! are always strings: whatever a map key decodes to is converted with `Value::into_text`.
//!
//! # A note on nesting
//!
//! Lists and maps are decoded by recursion. There is no limit on the nesting depth other than the
//! size of the call stack.
//!
//! # Examples
//!
//! ```
//! use tnetstring::*;
//!
//! let value = Value::Map(Map::from([("key", Value::List(vec![Value::from("value"), Value::Int(42)]))]));
//! let buf = dump(&value).unwrap();
//! assert_eq!(buf, b"23:3:key,13:5:value,2:42#]}");
//! let (decoded, rest) = parse(&buf).unwrap();
//! assert_eq!(value, decoded);
//! assert!(rest.is_empty());
//! ```

mod error;
pub mod float;
mod frame;
mod map;
mod text;
mod value;

pub use error::*;
pub use frame::*;
pub use map::Map;
pub use text::{Extension, ToText};
pub use value::*;
