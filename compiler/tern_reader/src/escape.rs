//! Escape processing for quoted bodies and symbol names.
//!
//! Quoted literals come in two flavors. Cooked bodies (strings, versions,
//! function references) resolve `\n \t \r \f \b \\ \"`; any other escaped
//! character stands for itself. Raw bodies (regex and glob patterns) only
//! resolve `\"`, so `\d` and friends reach the pattern compiler untouched.

use crate::ClassifyError;

/// Split `"body"rest` at the closing quote.
///
/// `text` must start with `"`. Returns the body with escapes still in place
/// and whatever follows the closing quote.
pub(crate) fn split_quoted(text: &str) -> Result<(&str, &str), ClassifyError> {
    let Some(inner) = text.strip_prefix('"') else {
        return Err(ClassifyError::Unterminated);
    };
    let mut escaped = false;
    for (i, c) in inner.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((&inner[..i], &inner[i + 1..]));
        }
    }
    Err(ClassifyError::Unterminated)
}

/// Resolve the escapes of a cooked body.
pub(crate) fn cook(body: &str) -> Result<String, ClassifyError> {
    if !body.contains('\\') {
        return Ok(body.to_string());
    }

    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('f') => result.push('\u{c}'),
            Some('b') => result.push('\u{8}'),
            Some(other) => result.push(other),
            None => return Err(ClassifyError::DanglingEscape),
        }
    }
    Ok(result)
}

/// Resolve the escapes of a raw body: only `\"` becomes `"`.
pub(crate) fn raw(body: &str) -> String {
    let mut result = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => result.push('"'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}

/// Strip `|` region markers and `\` escapes from a symbol or keyword token.
pub(crate) fn unescape_name(token: &str) -> Result<String, ClassifyError> {
    let mut result = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        match c {
            '|' => {}
            '\\' => match chars.next() {
                Some(escaped) => result.push(escaped),
                None => return Err(ClassifyError::DanglingEscape),
            },
            _ => result.push(c),
        }
    }
    Ok(result)
}

#[cfg(test)]
mod tests;
