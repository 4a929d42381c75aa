//! Regex compilation with ASCII word classes
//!
//! `regex` makes `\b`, `\w` and `\d` Unicode-aware, so `éDROP` has no word
//! boundary before `DROP`. Every table pattern is written for ASCII classes
//! and goes through [`ascii_classes`] before compiling, which keeps a keyword
//! detectable no matter which letter is glued to it.

use crate::error::{GuardError, Result};
use regex::{Regex, RegexSet};

/// Rewrite `\b`, `\B`, `\w`, `\W`, `\d` and `\D` to their ASCII forms.
///
/// Inside a bracket class `\w` and `\d` become explicit ASCII ranges.
/// Escaped backslashes are left alone, so `\\b` stays a literal backslash
/// followed by `b`.
pub fn ascii_classes(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + 16);
    let mut chars = source.chars().peekable();
    let mut class_depth = 0usize;
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some(class @ ('w' | 'd')) if class_depth > 0 => {
                    out.push_str(if class == 'w' { "0-9A-Za-z_" } else { "0-9" });
                }
                Some('W') if class_depth == 0 => out.push_str("[^0-9A-Za-z_]"),
                Some('D') if class_depth == 0 => out.push_str("[^0-9]"),
                Some(class @ ('b' | 'B' | 'w' | 'd')) if class_depth == 0 => {
                    out.push_str("(?-u:\\");
                    out.push(class);
                    out.push(')');
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '[' => {
                class_depth += 1;
                out.push(ch);
                // A leading `]` (after an optional `^`) is a literal
                if chars.peek() == Some(&'^') {
                    out.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            ']' if class_depth > 0 => {
                class_depth -= 1;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Compile one pattern with ASCII word classes
pub fn compile(table: &'static str, source: &str) -> Result<Regex> {
    Regex::new(&ascii_classes(source)).map_err(|e| GuardError::pattern(table, source, e))
}

/// Compile a set of patterns with ASCII word classes
pub fn compile_set<I, S>(table: &'static str, sources: I) -> Result<RegexSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let rewritten: Vec<String> = sources
        .into_iter()
        .map(|s| ascii_classes(s.as_ref()))
        .collect();
    RegexSet::new(&rewritten).map_err(|e| GuardError::pattern(table, "<set>", e))
}
