//! Canonical text of `^` payloads.
//!
//! Floats are written with the shortest digit sequence that parses back to the same `f64`. Values
//! whose decimal exponent lies within `-4..16` use fixed notation with at least one fractional
//! digit (`3.1415926`, `100.0`), all others use scientific notation with a signed exponent of at
//! least two digits (`6.67e-11`, `1.0e+16`).

/// Returns the canonical payload text for `v`.
pub fn to_text(v: f64) -> String {
    if v.is_nan() {
        return "NaN".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }
    // `{:e}` yields the shortest round-trip digits, e.g. `6.67e-11` or `1e16`
    let sci = format!("{:e}", v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None         => (sci.as_str(), 0),
    };
    if (-4..16).contains(&exp) {
        with_fraction(format!("{}", v))
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", with_fraction(mantissa.to_string()), sign, exp.abs())
    }
}

/// Parses a `^` payload. Accepts everything `to_text` produces.
pub fn from_text(s: &str) -> Result<f64, std::num::ParseFloatError> {
    s.parse()
}

fn with_fraction(mut s: String) -> String {
    if !s.contains('.') {
        s.push_str(".0");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::{from_text, to_text};

    #[test]
    fn fixed() {
        assert_eq!("3.1415926", to_text(3.1415926));
        assert_eq!("3.1415", to_text(3.1415));
        assert_eq!("100.0", to_text(100.0));
        assert_eq!("-2.5", to_text(-2.5));
        assert_eq!("0.0001", to_text(0.0001));
        assert_eq!("1000000000000000.0", to_text(1e15));
    }

    #[test]
    fn scientific() {
        assert_eq!("6.67e-11", to_text(0.0000000000667));
        assert_eq!("1.0e+16", to_text(1e16));
        assert_eq!("1.0e-05", to_text(0.00001));
        assert_eq!("-1.5e+300", to_text(-1.5e300));
        assert_eq!("5.0e-324", to_text(5e-324));
    }

    #[test]
    fn special() {
        assert_eq!("0.0", to_text(0.0));
        assert_eq!("-0.0", to_text(-0.0));
        assert_eq!("NaN", to_text(f64::NAN));
        assert_eq!("Infinity", to_text(f64::INFINITY));
        assert_eq!("-Infinity", to_text(f64::NEG_INFINITY));
        assert!(from_text("NaN").unwrap().is_nan());
        assert_eq!(f64::NEG_INFINITY, from_text("-Infinity").unwrap());
    }

    #[test]
    fn roundtrip() {
        for v in [f64::MAX, f64::MIN, f64::MIN_POSITIVE, f64::EPSILON, std::f64::consts::PI, 1.0 / 3.0, 123456.789e-20] {
            assert_eq!(v, from_text(&to_text(v)).unwrap());
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(from_text("").is_err());
        assert!(from_text("3.14.15").is_err());
        assert!(from_text("pi").is_err());
    }

}
