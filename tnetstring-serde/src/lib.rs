//! Conveniently serialize and deserialize your Rust data structures into tnetstrings.
//!
//! # Mapping
//!
//! Booleans, integers, floats and null map onto their tnetstring counterparts. Strings, chars
//! and byte slices all become byte strings. Sequences and tuples become lists, structs and maps
//! become dictionaries.
//!
//! Dictionary keys are always byte strings on wire, so map keys must be something that has a
//! natural text representation: strings, chars, integers, booleans or unit variants. Integer
//! keys get parsed back from their text when deserializing.
//!
//! Unit variants are written as their name. All other enum variants are written as a dictionary
//! with a single entry, mapping the variant name to its content.
//!
//! Integers are signed 64 bit on wire, a `u64` above `i64::MAX` can't be serialized.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub enum Species {
//!     PrionailurusViverrinus,
//!     LynxLynx,
//!     FelisCatus,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! pub struct Cat<'a> {
//!     name: &'a str,
//!     species: Species,
//! }
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct Message<'a> {
//!     version: u32,
//!     #[serde(borrow)]
//!     cats: Vec<Cat<'a>>,
//! }
//!
//! let msg = Message {
//!     version: 1,
//!     cats: vec![
//!         Cat { name: "Jessica", species: Species::PrionailurusViverrinus },
//!         Cat { name: "Wantan", species: Species::LynxLynx },
//!     ],
//! };
//!
//! let bytes = tnetstring_serde::to_bytes(&msg).unwrap();
//! assert_eq!(&bytes[..], &b"123:7:version,1:1#4:cats,98:\
//!     53:4:name,7:Jessica,7:species,22:PrionailurusViverrinus,}\
//!     37:4:name,6:Wantan,7:species,8:LynxLynx,}]}"[..]);
//!
//! // Strings are borrowed straight from the input
//! let deserialized: Message = tnetstring_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(msg, deserialized);
//! ```

mod de;
mod error;
mod ser;

pub use de::{from_bytes, from_bytes_partial, Deserializer};
pub use error::{DeserializationError, Error, Result};
pub use ser::{to_bytes, to_writer, Serializer};

#[cfg(test)]
mod tests {
    use serde::{Serialize, Serializer, Deserialize};
    use std::collections::{BTreeMap, HashMap};
    use std::net::Ipv4Addr;
    use tnetstring::DecodeError;
    use super::{to_bytes, to_writer, from_bytes, from_bytes_partial, Error};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Enum {
        UnitVariant,
        NewtypeVariant(bool),
        TupleVariant(f32, f32),
        StructVariant{ a: usize, b: usize, c: usize },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Struct {
        field: u8,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct UnitStruct;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct NewtypeStruct(String);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct TupleStruct(char, char, char);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Test {
        bool: bool,
        i8: i8,
        i16: i16,
        i32: i32,
        i64: i64,
        u8: u8,
        u16: u16,
        u32: u32,
        u64: u64,
        f32: f32,
        f64: f64,
        char: char,
        str: String,
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
        none: Option<u8>,
        some: Option<u8>,
        unit: (),
        unit_struct: UnitStruct,
        newtype_struct: NewtypeStruct,
        tuple_struct: TupleStruct,
        seq: Vec<String>,
        tuple: (u16, u16, u16),
        map: HashMap<usize, String>,
        r#struct: Struct,
        unit_variant: Enum,
        newtype_variant: Enum,
        tuple_variant: Enum,
        struct_variant: Enum,
    }

    #[test]
    fn roundtrip() {
        let message = Test {
            bool: true,
            i8: -1,
            i16: -20,
            i32: -7000,
            i64: i64::MIN,
            u8: 1,
            u16: 20,
            u32: 7000,
            u64: i64::MAX as u64,
            f32: 1337.8472,
            f64: 1337.8472,
            char: 'x',
            str: "Test".to_string(),
            bytes: b"5:hello,\xff\x00:]}".to_vec(),
            none: None,
            some: Some(0),
            unit: (),
            unit_struct: UnitStruct,
            newtype_struct: NewtypeStruct("Qapla'".to_string()),
            tuple_struct: TupleStruct('ß', ',', '}'),
            seq: vec![
                "Elen".to_string(),
                "síla".to_string(),
                "lúmenn'".to_string(),
                "omentielvo".to_string(),
            ],
            tuple: (0, 0, 0),
            map: [
                (1701, "Enterprise".to_string()),
                (74656, "Voyager".to_string())
            ].into_iter().collect(),
            r#struct: Struct {
                field: 42,
            },
            unit_variant: Enum::UnitVariant,
            newtype_variant: Enum::NewtypeVariant(false),
            tuple_variant: Enum::TupleVariant(1.0, 0.999),
            struct_variant: Enum::StructVariant {
                a: 255,
                b: 0,
                c: 33,
            }
        };
        assert_eq!(message, from_bytes::<Test>(&to_bytes(&message).unwrap()).unwrap());
    }

    #[test]
    fn wire_format() {
        assert_eq!(b"18:3:foo,3:bar,3:baz,]".to_vec(), to_bytes(&["foo", "bar", "baz"]).unwrap());
        assert_eq!(b"0:~".to_vec(), to_bytes(&None::<u8>).unwrap());
        assert_eq!(b"4:true!".to_vec(), to_bytes(&true).unwrap());
        assert_eq!(b"3:-42#".to_vec(), to_bytes(&-42i8).unwrap());
        assert_eq!(b"8:6.67e-11^".to_vec(), to_bytes(&6.67e-11).unwrap());
        assert_eq!(b"3:1.0^".to_vec(), to_bytes(&1f32).unwrap());
        let map: BTreeMap<&str, (i32, Option<()>)> = [("a", (1, None))].into_iter().collect();
        assert_eq!(b"14:1:a,7:1:1#0:~]}".to_vec(), to_bytes(&map).unwrap());
    }

    #[test]
    fn enums() {
        assert_eq!(b"11:UnitVariant,".to_vec(), to_bytes(&Enum::UnitVariant).unwrap());
        assert_eq!(b"26:14:NewtypeVariant,5:false!}".to_vec(), to_bytes(&Enum::NewtypeVariant(false)).unwrap());
        assert_eq!(b"34:12:TupleVariant,14:3:1.5^5:-0.25^]}".to_vec(), to_bytes(&Enum::TupleVariant(1.5, -0.25)).unwrap());
        let variant = Enum::StructVariant { a: 1, b: 2, c: 3 };
        assert_eq!(variant, from_bytes::<Enum>(&to_bytes(&variant).unwrap()).unwrap());
    }

    #[test]
    fn keys_are_text() {
        let map: BTreeMap<i64, bool> = [(-3, true)].into_iter().collect();
        let bytes = to_bytes(&map).unwrap();
        assert_eq!(b"12:2:-3,4:true!}".to_vec(), bytes);
        assert_eq!(map, from_bytes(&bytes).unwrap());
        // Keys of any scalar type on wire are accepted
        let map: BTreeMap<String, u8> = from_bytes(b"8:1:7#1:1#}").unwrap();
        assert_eq!(Some(&1), map.get("7"));
        assert!(matches!(to_bytes(&HashMap::from([((1, 2), 3)])), Err(Error::KeyType)));
        let err = from_bytes::<BTreeMap<u8, u8>>(b"10:3:abc,1:1#}").unwrap_err();
        assert!(matches!(err.into_inner(), Error::Key(k, "u8") if k == "abc"));
    }

    #[test]
    fn keys_match_the_value_decoder() {
        let inputs: [&[u8]; 5] = [
            b"7:0:]1:1#}",
            b"7:0:}1:1#}",
            b"11:4:1:1#]1:2#}",
            b"8:1:\xff,1:3#}",
            b"20:12:1:a,5:false!}1:4#}",
        ];
        for input in inputs {
            let map: BTreeMap<String, i64> = from_bytes(input).unwrap();
            let (value, _) = tnetstring::parse(input).unwrap();
            let expected: Vec<&str> = value.as_map().unwrap().keys().map(|k| &**k).collect();
            assert_eq!(expected, map.keys().collect::<Vec<_>>());
        }
        let map: BTreeMap<String, i64> = from_bytes(b"7:0:]1:1#}").unwrap();
        assert_eq!(Some(&1), map.get("[]"));
        let map: BTreeMap<String, i64> = from_bytes(b"8:1:\xff,1:3#}").unwrap();
        assert_eq!(Some(&3), map.get("\u{fffd}"));
    }

    #[test]
    fn integers_must_fit() {
        assert!(matches!(to_bytes(&u64::MAX), Err(Error::Int)));
        assert!(matches!(from_bytes::<u8>(b"3:256#").unwrap_err().into_inner(), Error::Int));
        assert!(matches!(from_bytes::<u32>(b"2:-1#").unwrap_err().into_inner(), Error::Int));
    }

    #[test]
    fn unexpected_tag() {
        let err = from_bytes::<String>(b"1:1#").unwrap_err();
        assert_eq!(4, err.position());
        assert!(matches!(err.into_inner(), Error::UnexpectedTag(&["Bytes"], "Int")));
    }

    #[test]
    fn trailing() {
        let err = from_bytes::<u8>(b"1:1#0:~").unwrap_err();
        assert_eq!(4, err.position());
        assert!(matches!(err.into_inner(), Error::Trailing));
        // A tuple which is shorter than the list on wire
        assert!(matches!(from_bytes::<(u8,)>(b"8:1:1#1:2#]").unwrap_err().into_inner(), Error::Trailing));
    }

    #[test]
    fn partial() {
        let (first, rest) = from_bytes_partial::<&str>(b"3:foo,3:bar,").unwrap();
        assert_eq!("foo", first);
        let (second, rest) = from_bytes_partial::<&str>(rest).unwrap();
        assert_eq!("bar", second);
        assert!(rest.is_empty());
    }

    #[test]
    fn malformed() {
        assert!(matches!(from_bytes::<Vec<u8>>(b"4:3:ab],").unwrap_err().into_inner(), Error::Decode(DecodeError::Eof)));
        assert!(matches!(from_bytes::<HashMap<String, u8>>(b"4:1:a,}").unwrap_err().into_inner(), Error::Decode(DecodeError::UnbalancedMap)));
        assert!(matches!(from_bytes::<()>(b"1:x~").unwrap_err().into_inner(), Error::Decode(DecodeError::InvalidNullPayload(1))));
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let s: Struct = from_bytes(b"31:5:other,8:1:x,1:y,]5:field,1:9#}").unwrap();
        assert_eq!(Struct { field: 9 }, s);
    }

    #[test]
    fn display_types_become_text() {
        struct Addr(Ipv4Addr);
        impl Serialize for Addr {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(&self.0)
            }
        }
        assert_eq!(b"9:127.0.0.1,".to_vec(), to_bytes(&Addr(Ipv4Addr::LOCALHOST)).unwrap());
    }

    #[test]
    fn writer() {
        let mut buf = Vec::new();
        to_writer(&mut buf, &vec![1u8, 2]).unwrap();
        assert_eq!(b"8:1:1#1:2#]".to_vec(), buf);
    }
}
