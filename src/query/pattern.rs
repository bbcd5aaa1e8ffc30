//! Compiled text patterns for Glob and RegexMatch
//!
//! Patterns are compiled once per filter call, never per row.

use regex::Regex;

use super::predicate::ComparisonOp;

/// A compiled Glob or RegexMatch pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compiles `text` for the given pattern operator.
    ///
    /// Returns `None` for non-pattern operators.
    pub fn compile(op: ComparisonOp, text: &str) -> Option<Result<Pattern, regex::Error>> {
        let source = match op {
            ComparisonOp::Glob => glob_to_regex(text),
            ComparisonOp::RegexMatch => text.to_string(),
            _ => return None,
        };
        Some(Regex::new(&source).map(|regex| Pattern { regex }))
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Translates a SQLite GLOB pattern into an anchored regex.
fn glob_to_regex(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::with_capacity(glob.len() * 2 + 8);
    out.push_str("(?s)^");

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                // Unterminated class: the bracket is literal.
                None => out.push_str(r"\["),
            },
            c => out.push_str(&regex::escape(c.encode_utf8(&mut [0u8; 4]))),
        }
        i += 1;
    }

    out.push('$');
    out
}

/// Finds the `]` closing the class opened at `open`.
///
/// A `]` directly after `[` or `[^` is a member, not the terminator.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if chars.get(i) == Some(&'^') {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    (i..chars.len()).find(|&j| chars[j] == ']')
}

fn push_class(out: &mut String, body: &[char]) {
    let (negated, body) = match body.first() {
        Some('^') => (true, &body[1..]),
        _ => (false, body),
    };

    out.push('[');
    if negated {
        out.push('^');
    }
    for (idx, c) in body.iter().enumerate() {
        let is_range_dash = *c == '-' && idx > 0 && idx + 1 < body.len();
        if is_range_dash {
            out.push('-');
        } else if matches!(c, '\\' | '[' | ']' | '^' | '-' | '&' | '~') {
            out.push('\\');
            out.push(*c);
        } else {
            out.push(*c);
        }
    }
    out.push(']');
}
