//! Regex literal parsing
//!
//! Source descriptors carry patterns as delimiter-quoted literals in the
//! source language's notation: a delimiter character, the pattern body, the
//! same delimiter again, then a flag suffix (`/^[a-z]+$/i`). Any of
//! `/ ~ @ ; % # '` can play the delimiter. A string that does not match the
//! quoted form is taken as a bare pattern with no flags.

use regex::Regex;

use crate::error::CompileError;

const DELIMITERS: [char; 7] = ['/', '~', '@', ';', '%', '#', '\''];
const FLAG_CHARS: [char; 6] = ['g', 'i', 'm', 's', 'u', 'y'];

/// Split a quoted literal into `(body, flags)`. Picks the earliest closing
/// delimiter whose suffix consists purely of flag characters, so delimiter
/// characters inside the body stay part of it.
fn split_literal(raw: &str) -> Option<(&str, &str)> {
    let delim = raw.chars().next()?;
    if !DELIMITERS.contains(&delim) {
        return None;
    }
    let rest = &raw[delim.len_utf8()..];
    for (idx, ch) in rest.char_indices() {
        if ch == delim {
            let flags = &rest[idx + ch.len_utf8()..];
            if flags.chars().all(|f| FLAG_CHARS.contains(&f)) {
                return Some((&rest[..idx], flags));
            }
        }
    }
    None
}

/// Deduplicate flag characters, keeping each at its first occurrence, and
/// translate them to an inline-flag prefix. `i`/`m`/`s` carry over;
/// `g`/`u`/`y` have no equivalent here (`g` is a repetition concern of the
/// source runtime, `u`/`y` are modes this engine does not distinguish).
fn inline_flags(flags: &str) -> String {
    let mut seen = Vec::new();
    for ch in flags.chars() {
        if !seen.contains(&ch) {
            seen.push(ch);
        }
    }
    let carried: String = seen
        .into_iter()
        .filter(|ch| matches!(ch, 'i' | 'm' | 's'))
        .collect();
    if carried.is_empty() {
        String::new()
    } else {
        format!("(?{})", carried)
    }
}

/// Parse a pattern literal (quoted or bare) into a ready-to-use `Regex`
pub fn parse_pattern(raw: &str) -> Result<Regex, CompileError> {
    let (body, flags) = split_literal(raw).unwrap_or((raw, ""));
    let source = format!("{}{}", inline_flags(flags), body);
    Regex::new(&source).map_err(|source| CompileError::Pattern {
        pattern: raw.to_string(),
        source,
    })
}
