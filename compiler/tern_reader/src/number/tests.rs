use super::*;
use pretty_assertions::assert_eq;

fn num(token: &str) -> Option<Number> {
    match classify_number(token) {
        Ok(n) => n,
        Err(e) => panic!("`{token}` failed: {e}"),
    }
}

#[test]
fn unsuffixed_integers_pick_a_width() {
    assert_eq!(num("1"), Some(Number::Int(1)));
    assert_eq!(num("-42"), Some(Number::Int(-42)));
    assert_eq!(num("+7"), Some(Number::Int(7)));
    assert_eq!(num("2147483647"), Some(Number::Int(i32::MAX)));
    assert_eq!(num("2147483648"), Some(Number::Long(2_147_483_648)));
    assert_eq!(num("-9223372036854775808"), Some(Number::Long(i64::MIN)));
}

#[test]
fn decimal_point_or_exponent_means_double() {
    assert_eq!(num("1.0"), Some(Number::Double(1.0)));
    assert_eq!(num("1e3"), Some(Number::Double(1000.0)));
    assert_eq!(num("-2.5E-1"), Some(Number::Double(-0.25)));
    assert_eq!(num("3."), Some(Number::Double(3.0)));
}

#[test]
fn suffixes_coerce() {
    assert_eq!(num("1L"), Some(Number::Long(1)));
    assert_eq!(num("1l"), Some(Number::Long(1)));
    assert_eq!(num("12b"), Some(Number::Byte(12)));
    assert_eq!(num("-300s"), Some(Number::Short(-300)));
    assert_eq!(num("5I"), Some(Number::Int(5)));
    assert_eq!(num("1.0f"), Some(Number::Float(1.0)));
    assert_eq!(num("2F"), Some(Number::Float(2.0)));
    assert_eq!(num("-1.0D"), Some(Number::Double(-1.0)));
    assert_eq!(num("3d"), Some(Number::Double(3.0)));
}

#[test]
fn other_trailing_content_is_not_a_number() {
    assert_eq!(num("1z"), None);
    assert_eq!(num("1.2.3"), None);
    assert_eq!(num("1-2"), None);
    assert_eq!(num("1e"), None);
    assert_eq!(num("12ab"), None);
    assert_eq!(num("-"), None);
    assert_eq!(num("+"), None);
    assert_eq!(num("-x"), None);
    assert_eq!(num("-d"), None);
    assert_eq!(num(".5"), None);
    assert_eq!(num("abc"), None);
}

#[test]
fn narrowing_overflow_fails() {
    assert_eq!(
        classify_number("128b"),
        Err(ClassifyError::OutOfRange {
            value: "128".into(),
            kind: "byte"
        })
    );
    assert_eq!(num("-128b"), Some(Number::Byte(-128)));
    assert!(classify_number("40000s").is_err());
    assert!(classify_number("3000000000i").is_err());
}

#[test]
fn oversized_integer_fails() {
    assert_eq!(
        classify_number("99999999999999999999"),
        Err(ClassifyError::IntegerOverflow("99999999999999999999".into()))
    );
    assert!(classify_number("99999999999999999999L").is_err());
    assert_eq!(
        num("99999999999999999999d"),
        Some(Number::Double(99_999_999_999_999_999_999.0))
    );
}

#[test]
fn non_finite_fails() {
    assert_eq!(classify_number("1e999"), Err(ClassifyError::NotFinite));
    assert_eq!(classify_number("1e39f"), Err(ClassifyError::NotFinite));
}

#[test]
fn fractional_integer_suffix_fails() {
    assert_eq!(
        classify_number("1.5L"),
        Err(ClassifyError::FractionalInteger { kind: "long" })
    );
    assert_eq!(num("1.5.5L"), None);
}
