//! Decoding of backslash escapes inside a quoted string literal.
//!
//! Supported escapes:
//!
//! - `\a \b \f \n \r \t \v \\ \' \"`
//! - `\xHH` (one byte, two hex digits)
//! - `\NNN` (one byte, three octal digits, at most `\377`)
//! - `\uHHHH`, `\UHHHHHHHH` (a Unicode scalar value)
//!
//! Byte escapes may spell out a multi-byte UTF-8 sequence, so the literal is
//! decoded into bytes first and validated as UTF-8 at the end.

use std::{fmt, str::Chars};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnescapeError {
    /// `\` followed by a character that is not a known escape.
    UnknownEscape(char),
    /// The literal ends in the middle of an escape sequence.
    Truncated,
    /// A numeric escape with the wrong digits, e.g. `\xZZ`.
    InvalidDigits(String),
    /// An octal escape above `\377`.
    OctalOutOfRange(String),
    /// A `\u`/`\U` escape that is not a Unicode scalar value.
    InvalidCodePoint(u32),
    /// Byte escapes that do not form valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnescapeError::UnknownEscape(c) => write!(f, "unknown escape sequence '\\{}'", c),
            UnescapeError::Truncated => write!(f, "unterminated escape sequence"),
            UnescapeError::InvalidDigits(s) => write!(f, "invalid escape sequence '\\{}'", s),
            UnescapeError::OctalOutOfRange(s) => {
                write!(f, "octal escape '\\{}' is out of range", s)
            }
            UnescapeError::InvalidCodePoint(cp) => {
                write!(f, "escape U+{:04X} is not a valid Unicode character", cp)
            }
            UnescapeError::InvalidUtf8 => write!(f, "byte escapes do not form valid UTF-8"),
        }
    }
}

impl std::error::Error for UnescapeError {}

/// Decode the body of a double-quoted literal (without the quotes).
pub fn unescape(raw: &str) -> Result<String, UnescapeError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out: Vec<u8> = Vec::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            push_char(&mut out, c);
            continue;
        }

        let escaped = chars.next().ok_or(UnescapeError::Truncated)?;
        match escaped {
            'a' => out.push(0x07),
            'b' => out.push(0x08),
            'f' => out.push(0x0c),
            'n' => out.push(b'\n'),
            'r' => out.push(b'\r'),
            't' => out.push(b'\t'),
            'v' => out.push(0x0b),
            '\\' => out.push(b'\\'),
            '\'' => out.push(b'\''),
            '"' => out.push(b'"'),
            'x' => {
                let digits = take_digits(&mut chars, 2, 'x')?;
                let byte = u8::from_str_radix(&digits, 16)
                    .map_err(|_| UnescapeError::InvalidDigits(format!("x{}", digits)))?;
                out.push(byte);
            }
            'u' | 'U' => {
                let len = if escaped == 'u' { 4 } else { 8 };
                let digits = take_digits(&mut chars, len, escaped)?;
                let cp = u32::from_str_radix(&digits, 16)
                    .map_err(|_| UnescapeError::InvalidDigits(format!("{}{}", escaped, digits)))?;
                let decoded = char::from_u32(cp).ok_or(UnescapeError::InvalidCodePoint(cp))?;
                push_char(&mut out, decoded);
            }
            '0'..='7' => {
                let rest = take_digits(&mut chars, 2, escaped)?;
                let digits = format!("{}{}", escaped, rest);
                let value = u16::from_str_radix(&digits, 8)
                    .map_err(|_| UnescapeError::InvalidDigits(digits.clone()))?;
                let byte = u8::try_from(value).map_err(|_| UnescapeError::OctalOutOfRange(digits))?;
                out.push(byte);
            }
            other => return Err(UnescapeError::UnknownEscape(other)),
        }
    }

    String::from_utf8(out).map_err(|_| UnescapeError::InvalidUtf8)
}

fn push_char(out: &mut Vec<u8>, c: char) {
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
}

/// Take exactly `len` characters following an escape letter.
fn take_digits(chars: &mut Chars<'_>, len: usize, prefix: char) -> Result<String, UnescapeError> {
    let digits: String = chars.by_ref().take(len).collect();
    if digits.chars().count() < len {
        return Err(UnescapeError::Truncated);
    }
    if digits.starts_with(['+', '-']) {
        // from_str_radix accepts a sign, escapes do not
        return Err(UnescapeError::InvalidDigits(format!("{}{}", prefix, digits)));
    }
    Ok(digits)
}
