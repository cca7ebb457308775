use super::*;
use pretty_assertions::assert_eq;

#[test]
fn split_stops_at_first_unescaped_quote() {
    assert_eq!(split_quoted(r#""abc"def"#), Ok(("abc", "def")));
    assert_eq!(split_quoted(r#""a\"b"i"#), Ok((r#"a\"b"#, "i")));
    assert_eq!(split_quoted(r#""a\\"x"#), Ok((r"a\\", "x")));
}

#[test]
fn split_reports_missing_quote() {
    assert_eq!(split_quoted(r#""abc"#), Err(ClassifyError::Unterminated));
    assert_eq!(split_quoted(r#""abc\""#), Err(ClassifyError::Unterminated));
    assert_eq!(split_quoted("abc"), Err(ClassifyError::Unterminated));
}

#[test]
fn cook_known_escapes() {
    assert_eq!(
        cook(r#"\n\t\r\f\b\\\""#).as_deref(),
        Ok("\n\t\r\u{c}\u{8}\\\"")
    );
}

#[test]
fn cook_unknown_escape_is_the_character() {
    assert_eq!(cook(r"\q\(").as_deref(), Ok("q("));
}

#[test]
fn cook_trailing_backslash_fails() {
    assert_eq!(cook("abc\\"), Err(ClassifyError::DanglingEscape));
}

#[test]
fn raw_keeps_regex_escapes() {
    assert_eq!(raw(r#"\d+\"x\""#), r#"\d+"x""#);
    assert_eq!(raw(r"\\"), r"\\");
}

#[test]
fn names_drop_pipes_and_escapes() {
    assert_eq!(unescape_name("|a b|").as_deref(), Ok("a b"));
    assert_eq!(unescape_name(r"a\|b").as_deref(), Ok("a|b"));
    assert_eq!(unescape_name(r"\(x\)").as_deref(), Ok("(x)"));
    assert_eq!(unescape_name("||").as_deref(), Ok(""));
    assert_eq!(unescape_name("x\\"), Err(ClassifyError::DanglingEscape));
}
