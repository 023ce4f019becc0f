//! Sequence-selection requests: a glob pattern with an optional
//! `:begin-end` coordinate suffix, matched case-sensitively against a
//! sequence name or its post-dot base name (so `chr7` also matches
//! `hg19.chr7`).

use anyhow::{anyhow, Result};
use regex::Regex;

use crate::types::Bp;

#[derive(Debug, Clone)]
pub struct SeqRequest {
    pattern: Regex,
    pub beg: Bp,
    pub end: Bp,
}

/// Compile a shell-style glob into an anchored regex. Supports `*`, `?`,
/// and `[...]` classes (with `[!...]` negation); everything else is literal.
fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut raw = String::new();
                let mut negated = false;
                if chars.peek() == Some(&'!') {
                    chars.next();
                    negated = true;
                }
                let mut closed = false;
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == ']' && !raw.is_empty() {
                        closed = true;
                        break;
                    }
                    raw.push(next);
                }
                if closed {
                    out.push('[');
                    if negated {
                        out.push('^');
                    }
                    for c in raw.chars() {
                        if matches!(c, '\\' | '^' | ']') {
                            out.push('\\');
                        }
                        out.push(c);
                    }
                    out.push(']');
                } else {
                    // Unterminated class: treat the bracket literally.
                    out.push_str(&regex::escape("["));
                    if negated {
                        out.push_str(&regex::escape("!"));
                    }
                    out.push_str(&regex::escape(&raw));
                }
            }
            _ => out.push_str(&regex::escape(&c.to_string())),
        }
    }
    out.push('$');
    Regex::new(&out).map_err(|e| anyhow!("bad sequence pattern {:?}: {}", pattern, e))
}

impl SeqRequest {
    /// Parse request text: `name beg end`, `pattern:beg-end`, or a bare
    /// pattern covering the whole sequence.
    pub fn parse(text: &str) -> Result<Self> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.len() == 3 {
            return Ok(Self {
                pattern: glob_to_regex(words[0])?,
                beg: words[1].parse()?,
                end: words[2].parse()?,
            });
        }
        if let Some((pattern, interval)) = text.rsplit_once(':') {
            if let Some((beg, end)) = interval.rsplit_once('-') {
                if let (Ok(beg), Ok(end)) = (beg.parse(), end.parse()) {
                    return Ok(Self {
                        pattern: glob_to_regex(pattern)?,
                        beg,
                        end,
                    });
                }
            }
        }
        Ok(Self {
            pattern: glob_to_regex(text)?,
            beg: 0,
            end: Bp::MAX,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

/// Post-dot base of a sequence name: `hg19.chr7` gives `chr7`.
pub fn base_name(name: &str) -> &str {
    match name.split_once('.') {
        Some((_, base)) => base,
        None => name,
    }
}

/// The displayed intervals of one sequence, as selected by the requests.
/// With no requests, the whole sequence is selected.
pub fn ranges_from_seq_name(requests: &[SeqRequest], name: &str, seq_len: Bp) -> Vec<(Bp, Bp)> {
    if requests.is_empty() {
        return vec![(0, seq_len)];
    }
    let base = base_name(name);
    let mut ranges: Vec<(Bp, Bp)> = requests
        .iter()
        .filter(|r| r.matches(name) || r.matches(base))
        .map(|r| (r.beg.max(0), r.end.min(seq_len)))
        .collect();
    ranges.sort_unstable();
    ranges
}
