//! Line-oriented `.properties` parser.
//!
//! Follows the classic properties convention: `key=value`, `key:value` or
//! `key value`, `#`/`!` comments, backslash line continuations and
//! `\t \n \r \f \uXXXX` escapes.

use std::borrow::Cow;

use super::ParseError;

/// Byte-order mark some editors prepend to UTF-8 files.
const BOM: char = '\u{feff}';

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Decode raw file bytes into text.
///
/// Valid UTF-8 is used as-is (minus a leading BOM). Anything else is read
/// as ISO-8859-1, the historical encoding of properties files, where every
/// byte maps to the code point of the same value.
///
/// Valid UTF-8 always wins: a Latin-1 file whose bytes also form valid
/// UTF-8 (`\xc3\xa9`) decodes as UTF-8 (`é`), not as Latin-1 (`Ã©`).
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text.strip_prefix(BOM).unwrap_or(text)),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Parse properties text into `(key, value)` pairs in file order.
///
/// Duplicate keys are returned as they appear; callers merging into a map
/// get last-write-wins for free.
pub fn parse(input: &str) -> Result<Vec<(String, String)>, ParseError> {
    let mut entries = Vec::new();
    let mut lines = natural_lines(input).into_iter().enumerate();

    while let Some((index, raw)) = lines.next() {
        let first = raw.trim_start_matches(is_whitespace);
        if first.is_empty() || first.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = String::new();
        let mut current = first;
        loop {
            if !ends_with_continuation(current) {
                logical.push_str(current);
                break;
            }
            logical.push_str(&current[..current.len() - 1]);
            match lines.next() {
                Some((_, next)) => current = next.trim_start_matches(is_whitespace),
                None => break,
            }
        }

        entries.push(parse_entry(&logical, index + 1)?);
    }

    Ok(entries)
}

/// Split on `\n`, `\r` or `\r\n`. A trailing terminator does not produce
/// an extra empty line.
fn natural_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                i += 1;
                if bytes.get(i) == Some(&b'\n') {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    if start < bytes.len() {
        lines.push(&input[start..]);
    }
    lines
}

/// An odd run of trailing backslashes escapes the line terminator.
fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|&b| b == b'\\').count();
    trailing % 2 == 1
}

/// Split one logical line into an unescaped key and value.
fn parse_entry(logical: &str, line: usize) -> Result<(String, String), ParseError> {
    let mut key_end = logical.len();
    let mut value_start = logical.len();
    let mut has_separator = false;
    let mut escaped = false;

    for (i, c) in logical.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = i;
                value_start = i + 1;
                has_separator = true;
                break;
            }
            c if is_whitespace(c) => {
                key_end = i;
                value_start = i + c.len_utf8();
                break;
            }
            _ => {}
        }
    }

    let mut rest = logical[value_start..].trim_start_matches(is_whitespace);
    if !has_separator {
        if let Some(after) = rest.strip_prefix(['=', ':']) {
            rest = after.trim_start_matches(is_whitespace);
        }
    }

    Ok((unescape(&logical[..key_end], line)?, unescape(rest, line)?))
}

fn unescape(raw: &str, line: usize) -> Result<String, ParseError> {
    if !raw.contains('\\') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_code_unit(&mut chars, line)?;
                out.push(decode_code_unit(unit, &mut chars));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Read the four hex digits following `\u`.
fn read_code_unit(chars: &mut std::str::Chars<'_>, line: usize) -> Result<u32, ParseError> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ParseError::MalformedUnicodeEscape { line });
    }
    u32::from_str_radix(&hex, 16).map_err(|_| ParseError::MalformedUnicodeEscape { line })
}

/// Turn a UTF-16 code unit into a char, pairing a high surrogate with an
/// immediately following `\uDC00`-`\uDFFF` escape. Unpaired surrogates
/// become U+FFFD.
fn decode_code_unit(unit: u32, chars: &mut std::str::Chars<'_>) -> char {
    if (0xD800..=0xDBFF).contains(&unit) {
        let mut lookahead = chars.clone();
        if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
            let hex: String = lookahead.by_ref().take(4).collect();
            if let Ok(low) = u32::from_str_radix(&hex, 16) {
                if hex.len() == 4 && (0xDC00..=0xDFFF).contains(&low) {
                    *chars = lookahead;
                    let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    return char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
        }
    }
    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}
