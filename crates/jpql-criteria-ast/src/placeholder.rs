//! Placeholder tokenizer for `?`, `?N` and `:name` markers
//!
//! Query fragments written by callers may carry their own placeholders. The
//! scanner walks the text once, skipping single-quoted string literals (with
//! `''` escapes), and yields every placeholder together with its byte span.

use jpql_criteria_diagnostics::{Result, Span};

/// The form of a placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind<'a> {
    /// `?` (number `None`) or `?N`
    Positional(Option<usize>),
    /// `:name`
    Named(&'a str),
}

/// A placeholder found in fragment text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind<'a>,
    pub span: Span,
}

impl<'a> Placeholder<'a> {
    pub fn is_positional(&self) -> bool {
        matches!(self.kind, PlaceholderKind::Positional(_))
    }

    /// The parameter name of a `:name` placeholder
    pub fn name(&self) -> Option<&'a str> {
        match self.kind {
            PlaceholderKind::Named(name) => Some(name),
            PlaceholderKind::Positional(_) => None,
        }
    }
}

/// Iterator over the placeholders of a text
pub struct Placeholders<'a> {
    text: &'a str,
    pos: usize,
}

/// Scan `text` for placeholders
pub fn placeholders(text: &str) -> Placeholders<'_> {
    Placeholders { text, pos: 0 }
}

/// Check whether `text` contains a `?` or `?N` placeholder
pub fn has_positional(text: &str) -> bool {
    placeholders(text).any(|p| p.is_positional())
}

/// First `:name` placeholder of `text`
pub fn first_named(text: &str) -> Option<&str> {
    placeholders(text).find_map(|p| p.name())
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

impl<'a> Iterator for Placeholders<'a> {
    type Item = Placeholder<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            match bytes[start] {
                b'\'' => {
                    // string literal, '' is an escaped quote
                    let mut i = start + 1;
                    while i < bytes.len() {
                        if bytes[i] == b'\'' {
                            if bytes.get(i + 1) == Some(&b'\'') {
                                i += 2;
                                continue;
                            }
                            break;
                        }
                        i += 1;
                    }
                    self.pos = i + 1;
                }
                b'?' => {
                    let mut end = start + 1;
                    while end < bytes.len() && bytes[end].is_ascii_digit() {
                        end += 1;
                    }
                    self.pos = end;
                    // numbers too large to index saturate, so they never match a binding
                    let number = if end > start + 1 {
                        Some(self.text[start + 1..end].parse().unwrap_or(usize::MAX))
                    } else {
                        None
                    };
                    return Some(Placeholder {
                        kind: PlaceholderKind::Positional(number),
                        span: Span::new(start, end),
                    });
                }
                // `::` is a cast, not a parameter
                b':' if start > 0 && bytes[start - 1] == b':' => self.pos += 1,
                b':' => {
                    let mut end = start + 1;
                    while end < bytes.len() && is_name_byte(bytes[end]) {
                        end += 1;
                    }
                    self.pos = end;
                    if end > start + 1 {
                        return Some(Placeholder {
                            kind: PlaceholderKind::Named(&self.text[start + 1..end]),
                            span: Span::new(start, end),
                        });
                    }
                }
                _ => self.pos += 1,
            }
        }
        None
    }
}

/// Rewrite the placeholders of `text`
///
/// `replace` is called for every placeholder in encounter order; `Some`
/// substitutes the placeholder text, `None` keeps it unchanged.
pub fn rewrite<F>(text: &str, mut replace: F) -> Result<String>
where
    F: FnMut(&Placeholder<'_>) -> Result<Option<String>>,
{
    let mut out = String::with_capacity(text.len() + 8);
    let mut last = 0;
    for placeholder in placeholders(text) {
        if let Some(replacement) = replace(&placeholder)? {
            out.push_str(&text[last..placeholder.span.start]);
            out.push_str(&replacement);
            last = placeholder.span.end;
        }
    }
    out.push_str(&text[last..]);
    Ok(out)
}
