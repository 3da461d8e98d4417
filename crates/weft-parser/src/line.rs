//! Phase 1: line analysis.
//!
//! Splits source into indented token rows. Blank lines and `#` comments
//! vanish here; indentation is measured in ASCII spaces only (tabs are not
//! recognized), two spaces per level.

use crate::error::{ParseError, Result};

/// An analyzed source line. Transient: consumed by tree construction.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Line {
    /// 1-based physical line number.
    pub number: u32,
    /// Indent level (leading space count / 2).
    pub indent: usize,
    /// Lexemes, left to right. Quoted spans keep their quotes.
    pub tokens: Vec<String>,
}

/// Analyze source text into lines, discarding blanks and comments.
pub(crate) fn analyze(source: &str) -> Result<Vec<Line>> {
    let mut lines = Vec::new();
    for (idx, raw) in source.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let number = idx as u32 + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let spaces = raw.chars().take_while(|&c| c == ' ').count();
        if spaces % 2 != 0 {
            return Err(ParseError::InvalidIndentation {
                line: number,
                count: spaces,
                text: raw.to_string(),
            });
        }
        let tokens = tokenize(trimmed, number, raw)?;
        lines.push(Line {
            number,
            indent: spaces / 2,
            tokens,
        });
    }
    Ok(lines)
}

/// Tokenize a trimmed line.
///
/// A lexeme is either a double-quoted span (quotes included, no escape
/// interpretation) or a maximal run of non-whitespace characters.
fn tokenize(text: &str, line: u32, raw: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after_quote) = rest.strip_prefix('"') {
            match after_quote.find('"') {
                Some(end) => {
                    tokens.push(rest[..end + 2].to_string());
                    rest = &after_quote[end + 1..];
                }
                None => {
                    return Err(ParseError::UnterminatedString {
                        line,
                        text: raw.to_string(),
                    });
                }
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            tokens.push(rest[..end].to_string());
            rest = &rest[end..];
        }
    }
    Ok(tokens)
}
