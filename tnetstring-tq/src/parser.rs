use nom::{
    character::complete::{char, digit1, multispace0, one_of},
    Finish,
    IResult,
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, preceded, separated_pair, terminated, tuple},
    branch::alt,
    bytes::complete::{tag, take_while, escaped_transform, is_not},
};
use tnetstring::{float, Map, Value};
use anyhow::{anyhow, Result};
use base64::decode;

const B64_CHARS: &'static str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Surrounds a parser with optional whitespace
fn ws<'a, O, F: FnMut(&'a str) -> IResult<&'a str, O>>(f: F) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    delimited(multispace0, f, multispace0)
}

fn keyword(i: &str) -> IResult<&str, Value<'static>> {
    alt((
            value(Value::Null, tag("null")),
            value(Value::Bool(true), tag("true")),
            value(Value::Bool(false), tag("false")),
    ))(i)
}

fn exponent(i: &str) -> IResult<&str, &str> {
    recognize(tuple((one_of("eE"), opt(one_of("+-")), digit1)))(i)
}

/// Floats need a fraction or an exponent to tell them apart from integers
fn floating(i: &str) -> IResult<&str, f64> {
    alt((
        value(f64::NAN, tag("NaN")),
        value(f64::INFINITY, tag("Infinity")),
        value(f64::NEG_INFINITY, tag("-Infinity")),
        map_res(recognize(tuple((
            opt(char('-')),
            digit1,
            alt((recognize(tuple((char('.'), digit1, opt(exponent)))), exponent)),
        ))), float::from_text),
    ))(i)
}

fn int(i: &str) -> IResult<&str, i64> {
    map_res(recognize(tuple((opt(char('-')), digit1))), |n: &str| n.parse())(i)
}

fn bytes(i: &str) -> IResult<&str, Vec<u8>> {
    delimited(
        char('\''),
        map_res(take_while(move |c| B64_CHARS.contains(c)), |b: &str| decode(b)),
        char('\''),
    )(i)
}

fn string(i: &str) -> IResult<&str, String> {
    delimited(
            char('"'),
            map(opt(escaped_transform(
                is_not("\\\""),
                '\\',
                alt((
                        value("\\", tag("\\")),
                        value("\"", tag("\"")),
                        value("\n", tag("n")),
                )))), |c| c.unwrap_or_default()),
            char('"')
    )(i)
}

fn list(i: &str) -> IResult<&str, Vec<Value<'static>>> {
    delimited(
        char('['),
        terminated(separated_list0(char(','), ws(tnet_value)), opt(ws(char(',')))),
        preceded(multispace0, char(']')),
    )(i)
}

fn dict(i: &str) -> IResult<&str, Map<'static>> {
    map(delimited(
        char('{'),
        terminated(
            separated_list0(char(','), ws(separated_pair(string, ws(char(':')), tnet_value))),
            opt(ws(char(','))),
        ),
        preceded(multispace0, char('}')),
    ), |entries| entries.into_iter().collect())(i)
}

fn tnet_value(i: &str) -> IResult<&str, Value<'static>> {
    alt((
        map(string, Value::from),
        map(bytes, Value::from),
        keyword,
        map(floating, Value::Float),
        map(int, Value::Int),
        map(list, Value::List),
        map(dict, Value::Map),
    ))(i)
}

/// Parses any number of whitespace separated values
pub fn parse(i: &str) -> Result<Vec<Value<'static>>> {
    Ok(all_consuming(preceded(multispace0, many0(terminated(tnet_value, multispace0))))(i)
        .finish().map_err(|e| anyhow!("{}", e))?.1)
}

#[cfg(test)]
mod test {
    use super::parse;
    use tnetstring::{Map, Value};

    fn one(i: &str) -> Value<'static> {
        let mut values = parse(i).unwrap();
        assert_eq!(1, values.len());
        values.remove(0)
    }

    #[test]
    fn scalars() {
        assert_eq!(Value::Null, one("null"));
        assert_eq!(Value::Bool(true), one(" true "));
        assert_eq!(Value::Bool(false), one("false"));
        assert_eq!(Value::Int(-7), one("-7"));
        assert_eq!(Value::Float(100.0), one("100.0"));
        assert_eq!(Value::Float(6.67e-11), one("6.67e-11"));
        assert_eq!(Value::Float(1e16), one("1.0e+16"));
        assert_eq!(Value::Float(f64::NEG_INFINITY), one("-Infinity"));
        assert!(one("NaN").as_float().unwrap().is_nan());
    }

    #[test]
    fn strings() {
        assert_eq!(Value::from(""), one("\"\""));
        assert_eq!(Value::from("a \"quoted\"\\\nline"), one(r#""a \"quoted\"\\\nline""#));
        assert_eq!(Value::from(&b"\xff\x00"[..]), one("'/wA='"));
    }

    #[test]
    fn composites() {
        assert_eq!(Value::List(vec![]), one("[]"));
        assert_eq!(Value::Map(Map::new()), one("{ }"));
        let expected = Value::List(vec![
            Value::Int(1),
            Value::Map(Map::from([("k", Value::List(vec![Value::Null]))])),
        ]);
        assert_eq!(expected, one("[1, {\"k\": [null]}]"));
        assert_eq!(expected, one("[\n  1,\n  {\n    \"k\": [\n      null,\n    ],\n  },\n]"));
    }

    #[test]
    fn display_parses_back() {
        let v = Value::Map(Map::from([
            ("name", Value::from("Jessica")),
            ("bytes", Value::from(&b"\xfe\xed"[..])),
            ("list", Value::List(vec![Value::Float(0.5), Value::Bool(false), Value::List(vec![])])),
            ("map", Value::Map(Map::new())),
        ]));
        assert_eq!(v, one(&v.to_string()));
    }

    #[test]
    fn many() {
        assert_eq!(vec![Value::Int(1), Value::from("two"), Value::Null], parse("1 \"two\"\nnull").unwrap());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn garbage() {
        assert!(parse("[1, 2").is_err());
        assert!(parse("{1: 2}").is_err());
        assert!(parse("nul").is_err());
        assert!(parse("'not base64!'").is_err());
    }
}
