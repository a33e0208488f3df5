//! This module contains the kernels for the comma-separated decimal text format.
//!
//! Token parsing follows C library prefix semantics: leading whitespace is
//! skipped and the longest numeric prefix is consumed, so `"5\n"` reads as 5.
//! A token with no numeric prefix at all is *unparseable*, which is never an
//! error on its own; `parse_list` drops such tokens and keeps going. A value
//! that does not fit the target width is treated the same way.

use std::fmt::{Display, Write};

use num_traits::{Float, NumCast, PrimInt, Signed, Unsigned};

use crate::error::KzError;

/// Delimiter between tokens in the text format.
pub const DELIMITER: char = ',';

//==================================================================================
// 1. Prefix Scanners
//==================================================================================

/// Returns the longest `[+|-]digits` prefix of `token` (after leading whitespace).
fn integer_prefix(token: &str, allow_minus: bool) -> Option<&str> {
    let s = token.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if let Some(&c) = bytes.first() {
        if c == b'+' || (allow_minus && c == b'-') {
            end = 1;
        }
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (end > digits_start).then(|| &s[..end])
}

/// Returns the longest decimal floating-point prefix of `token`, including
/// the `inf`, `infinity` and `nan` spellings.
fn float_prefix(token: &str) -> Option<&str> {
    let s = token.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let rest = &s[end..];
    for word in ["infinity", "inf", "nan"] {
        if rest.len() >= word.len() && rest.as_bytes()[..word.len()].eq_ignore_ascii_case(word.as_bytes()) {
            return Some(&s[..end + word.len()]);
        }
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // An exponent only counts if it carries at least one digit.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    Some(&s[..end])
}

//==================================================================================
// 2. Scalar Parsers
//==================================================================================

/// Parses a signed decimal integer token.
pub fn parse_signed<T>(token: &str) -> Option<T>
where
    T: PrimInt + Signed,
{
    let value: i64 = integer_prefix(token, true)?.parse().ok()?;
    <T as NumCast>::from(value)
}

/// Parses an unsigned decimal integer token. A leading `-` makes it unparseable.
pub fn parse_unsigned<T>(token: &str) -> Option<T>
where
    T: PrimInt + Unsigned,
{
    let value: u64 = integer_prefix(token, false)?.parse().ok()?;
    <T as NumCast>::from(value)
}

/// Parses a decimal floating-point token with optional fraction and exponent.
pub fn parse_float<T>(token: &str) -> Option<T>
where
    T: Float,
{
    let value: f64 = float_prefix(token)?.parse().ok()?;
    <T as NumCast>::from(value)
}

/// Parses a bit token. A token with no numeric prefix yields `Ok(None)`; any
/// number other than 0 or 1, including one too large to represent, is
/// malformed input and yields `KzError::IllegalBitValue`.
pub fn parse_bit(token: &str) -> Result<Option<bool>, KzError> {
    let digits = match integer_prefix(token, true) {
        Some(digits) => digits,
        None => return Ok(None),
    };
    match digits.parse::<i64>() {
        Ok(0) => Ok(Some(false)),
        Ok(1) => Ok(Some(true)),
        _ => Err(KzError::IllegalBitValue(token.trim().to_string())),
    }
}

//==================================================================================
// 3. Scalar Printers
//==================================================================================

pub fn print_integer<T>(out: &mut String, value: T)
where
    T: PrimInt + Display,
{
    // Formatting into a `String` never fails.
    let _ = write!(out, "{}", value);
}

/// Prints a float in six-digit fixed-point form.
pub fn print_float(out: &mut String, value: f64) {
    // Formatting into a `String` never fails.
    let _ = write!(out, "{:.6}", value);
}

pub fn print_bit(out: &mut String, value: bool) {
    out.push(if value { '1' } else { '0' });
}

//==================================================================================
// 4. List Codec
//==================================================================================

/// Parses a whole comma-separated document.
///
/// Empty tokens (as in `"5,,7"`) are not tokens at all. A document with no
/// tokens, or whose tokens all fail to parse, is `KzError::EmptyInput`.
/// Errors raised by `parse` itself (illegal bit values) abort the whole parse.
pub fn parse_list<T, F>(text: &str, mut parse: F) -> Result<Vec<T>, KzError>
where
    F: FnMut(&str) -> Result<Option<T>, KzError>,
{
    let mut tokens = text.split(DELIMITER).filter(|t| !t.is_empty()).peekable();
    if tokens.peek().is_none() {
        return Err(KzError::EmptyInput);
    }

    let mut values = Vec::new();
    let mut skipped = 0usize;
    for token in tokens {
        match parse(token)? {
            Some(value) => values.push(value),
            None => skipped += 1,
        }
    }

    if values.is_empty() {
        return Err(KzError::EmptyInput);
    }
    if skipped > 0 {
        log::warn!(
            "Skipped {} malformed token(s) while parsing {} value(s)",
            skipped,
            values.len()
        );
    }
    Ok(values)
}

/// Renders `values` as comma-separated tokens with no trailing delimiter.
pub fn format_list<T, F>(values: impl IntoIterator<Item = T>, mut print: F) -> String
where
    F: FnMut(&mut String, T),
{
    let mut out = String::new();
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        print(&mut out, value);
    }
    out
}

//==================================================================================
// Unit Tests
//==================================================================================
