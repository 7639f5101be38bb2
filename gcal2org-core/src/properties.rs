//! Java-style `.properties` parsing.
//!
//! Supports the subset of the format people actually write by hand:
//! `#`/`!` comments, `=`, `:` or whitespace separators, backslash line
//! continuations and the `\t \n \r \f \uXXXX` escapes. Entries come back in
//! file order; applying them in order makes later duplicates win.

use std::path::Path;

use crate::error::Gcal2OrgResult;

/// Parse properties text into ordered key/value pairs.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let line = line.trim_start_matches(is_whitespace);
        if line.is_empty() || line.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = line.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            // a blank line ends the logical line
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start_matches(is_whitespace)),
                None => break,
            }
        }

        entries.push(split_entry(&logical));
    }

    entries
}

/// Read and parse a properties file.
pub fn load_properties(path: &Path) -> Gcal2OrgResult<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_properties(&content))
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut key_end = line.len();
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_whitespace(c) {
            key_end = i;
            break;
        }
    }

    let key = &line[..key_end];
    let rest = line[key_end..].trim_start_matches(is_whitespace);
    let rest = rest
        .strip_prefix(['=', ':'])
        .map(|r| r.trim_start_matches(is_whitespace))
        .unwrap_or(rest);

    (unescape(key), unescape(rest))
}

fn unescape(raw: &str) -> String {
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
                let Some(unit) = read_code_unit(&mut chars) else {
                    out.push('u');
                    continue;
                };
                out.push(decode_code_unit(unit, &mut chars));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

fn read_code_unit<I: Iterator<Item = char> + Clone>(chars: &mut I) -> Option<u16> {
    let hex: String = chars.clone().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let unit = u16::from_str_radix(&hex, 16).ok()?;
    for _ in 0..4 {
        chars.next();
    }
    Some(unit)
}

/// Decode one UTF-16 unit, pulling a following `\uXXXX` low surrogate when
/// `unit` is a high surrogate.
fn decode_code_unit<I: Iterator<Item = char> + Clone>(unit: u16, chars: &mut I) -> char {
    if let Some(c) = char::from_u32(u32::from(unit)) {
        return c;
    }

    let mut lookahead = chars.clone();
    if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
        if let Some(low) = read_code_unit(&mut lookahead) {
            if let Some(Ok(c)) = char::decode_utf16([unit, low]).next() {
                *chars = lookahead;
                return c;
            }
        }
    }

    char::REPLACEMENT_CHARACTER
}
