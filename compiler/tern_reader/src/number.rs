//! Numeric token classification.
//!
//! A token is numeric when it starts with a digit or a sign and its body
//! (everything before an optional type suffix) is made only of digits,
//! `.`, `e`, `E`, `+` and `-` and parses as a number. Anything else falls
//! through to the symbol classifier; only values that cannot be represented
//! are errors.

use std::num::IntErrorKind;

use tern_ir::Number;

use crate::ClassifyError;

/// Width requested by a trailing type letter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Suffix {
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Suffix {
    fn from_char(c: char) -> Option<Suffix> {
        match c.to_ascii_lowercase() {
            'b' => Some(Suffix::Byte),
            's' => Some(Suffix::Short),
            'i' => Some(Suffix::Int),
            'l' => Some(Suffix::Long),
            'f' => Some(Suffix::Float),
            'd' => Some(Suffix::Double),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Suffix::Byte => "byte",
            Suffix::Short => "short",
            Suffix::Int => "int",
            Suffix::Long => "long",
            Suffix::Float => "float",
            Suffix::Double => "double",
        }
    }
}

#[inline]
fn is_body_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')
}

/// Classify `token` as a number.
///
/// `Ok(None)` means the token is not numeric.
pub(crate) fn classify_number(token: &str) -> Result<Option<Number>, ClassifyError> {
    match token.chars().next() {
        Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => {}
        _ => return Ok(None),
    }

    let (body, suffix) = match token.chars().next_back().and_then(Suffix::from_char) {
        // Suffix letters are all ASCII.
        Some(suffix) => (&token[..token.len() - 1], Some(suffix)),
        None => (token, None),
    };
    if !body.chars().all(is_body_char) || !body.chars().any(|c| c.is_ascii_digit()) {
        return Ok(None);
    }

    let fractional = body.contains(['.', 'e', 'E']);
    match suffix {
        Some(Suffix::Float) => float(body),
        Some(Suffix::Double) => double(body),
        Some(integral) if fractional => {
            if body.parse::<f64>().is_err() {
                return Ok(None);
            }
            Err(ClassifyError::FractionalInteger {
                kind: integral.name(),
            })
        }
        None if fractional => double(body),
        _ => integer(body, suffix),
    }
}

fn float(body: &str) -> Result<Option<Number>, ClassifyError> {
    let Ok(value) = body.parse::<f32>() else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(ClassifyError::NotFinite);
    }
    Ok(Some(Number::Float(value)))
}

fn double(body: &str) -> Result<Option<Number>, ClassifyError> {
    let Ok(value) = body.parse::<f64>() else {
        return Ok(None);
    };
    if !value.is_finite() {
        return Err(ClassifyError::NotFinite);
    }
    Ok(Some(Number::Double(value)))
}

fn integer(body: &str, suffix: Option<Suffix>) -> Result<Option<Number>, ClassifyError> {
    let value = match body.parse::<i64>() {
        Ok(value) => value,
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            return Err(ClassifyError::IntegerOverflow(body.to_string()));
        }
        Err(_) => return Ok(None),
    };

    let out_of_range = |kind: Suffix| ClassifyError::OutOfRange {
        value: body.to_string(),
        kind: kind.name(),
    };
    let number = match suffix {
        None => i32::try_from(value).map_or(Number::Long(value), Number::Int),
        Some(Suffix::Byte) => {
            Number::Byte(i8::try_from(value).map_err(|_| out_of_range(Suffix::Byte))?)
        }
        Some(Suffix::Short) => {
            Number::Short(i16::try_from(value).map_err(|_| out_of_range(Suffix::Short))?)
        }
        Some(Suffix::Int) => {
            Number::Int(i32::try_from(value).map_err(|_| out_of_range(Suffix::Int))?)
        }
        Some(Suffix::Long | Suffix::Float | Suffix::Double) => Number::Long(value),
    };
    Ok(Some(number))
}

#[cfg(test)]
mod tests;
