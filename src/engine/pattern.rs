//! Omit-pattern compilation
//!
//! Two kinds of pattern reach the rule set: ignore-file lines, compiled
//! with shell-glob semantics, and user-supplied patterns, compiled as
//! raw regex. Both are pure functions returning a Result so a bad
//! pattern degrades to a dropped rule instead of aborting the run.

use regex::{Regex, RegexBuilder};

/// Regex metacharacters escaped before glob rewriting ('*' and '?' keep
/// their glob meaning)
const ESCAPED: &[char] = &[
    '.', '+', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Compile one trimmed, non-comment ignore-file line into a matcher.
///
/// `*` matches any run of characters and `?` exactly one. A trailing
/// `/` anchors the pattern to a directory: the matcher covers the
/// directory itself and everything beneath it. A leading `/` anchors
/// the match to the root; otherwise the pattern may match at any
/// depth. Matching is case-insensitive against forward-slash relative
/// paths.
pub fn compile_glob_line(line: &str) -> Result<Regex, regex::Error> {
    let root_anchored = line.starts_with('/');
    let mut core = if root_anchored { &line[1..] } else { line };
    let dir_anchored = core.ends_with('/');
    if dir_anchored {
        core = &core[..core.len() - 1];
    }

    let mut pattern = String::with_capacity(core.len() + 8);
    if root_anchored {
        pattern.push('^');
    }
    for ch in core.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            c if ESCAPED.contains(&c) => {
                pattern.push('\\');
                pattern.push(c);
            }
            c => pattern.push(c),
        }
    }
    if dir_anchored {
        pattern.push_str("(/|$)");
    }

    RegexBuilder::new(&pattern).case_insensitive(true).build()
}

/// Compile a user-supplied pattern as raw regex (case-sensitive)
pub fn compile_custom_pattern(raw: &str) -> Result<Regex, regex::Error> {
    Regex::new(raw)
}
