//! Layered omission policy
//!
//! A RuleSet is an ordered list of labeled rules: built-in defaults,
//! then rules compiled from the root ignore file, then user patterns.
//! Evaluation is first-match-wins; the matching rule supplies the omit
//! label. Files that survive every rule must still carry a supported
//! extension, otherwise they are omitted with a synthesized label.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::core::model::EntryKind;
use crate::core::paths::{file_extension, file_name};
use crate::engine::pattern::{compile_custom_pattern, compile_glob_line};

/// The only ignore file consulted, read from the tree root
pub const IGNORE_FILE_NAME: &str = ".gitignore";

const IGNORE_FILE_LABEL: &str = "Matched .gitignore pattern";
const CUSTOM_LABEL: &str = "Matched custom omit pattern";

/// Where a rule came from, in evaluation-order precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOrigin {
    Default,
    IgnoreFile,
    Custom,
}

/// A labeled pattern used to decide omission of a path
#[derive(Debug, Clone)]
pub struct Rule {
    matcher: Regex,
    label: String,
    origin: RuleOrigin,
}

impl Rule {
    fn matches(&self, path: &str) -> bool {
        self.matcher.is_match(path)
    }

    #[allow(dead_code)]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[allow(dead_code)]
    pub fn origin(&self) -> RuleOrigin {
        self.origin
    }
}

/// Built-in omit rules. Each name is anchored as a path segment
/// anywhere in the tree, so the named entry and everything beneath it
/// match, but not names that merely contain it.
static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    [
        (r"(^|/)\.git(/|$)", "Git directory"),
        (r"(^|/)node_modules(/|$)", "Node modules directory"),
        (r"(^|/)\.[^/]+($|/)", "Hidden file/directory"),
        (r"(^|/)dist(/|$)", "Distribution directory"),
        (r"(^|/)build(/|$)", "Build directory"),
        (r"(^|/)out(/|$)", "Output directory"),
        (r"(^|/)coverage(/|$)", "Test coverage directory"),
        (r"(^|/)(temp|\.tmp)(/|$)", "Temporary files directory"),
        (r"(^|/)__pycache__(/|$)", "Python cache directory"),
        (r"(^|/)vendor(/|$)", "Third-party vendor directory"),
        (r"(^|/)bin(/|$)", "Binary files directory"),
        (r"(^|/)obj(/|$)", "Object files directory"),
        (r"(^|/)target(/|$)", "Build target directory"),
    ]
    .into_iter()
    .map(|(pattern, label)| Rule {
        matcher: RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .expect("built-in rule pattern"),
        label: label.to_string(),
        origin: RuleOrigin::Default,
    })
    .collect()
});

/// Extensions whose files may contribute content (lowercase, with dot)
static SUPPORTED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // JavaScript and TypeScript
        ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs",
        // Web development
        ".html", ".htm", ".css", ".scss", ".sass", ".less", ".vue", ".svelte",
        // Documentation and config
        ".md", ".mdx", ".txt", ".yaml", ".yml", ".toml", ".ini", ".env.example",
        ".json", ".jsonc", ".json5",
        // Python
        ".py", ".pyi", ".pyw", ".ipynb",
        // JVM languages
        ".java", ".kt", ".scala",
        // C/C++
        ".c", ".cpp", ".h", ".hpp",
        // C#
        ".cs",
        // Go
        ".go",
        // Ruby
        ".rb",
        // PHP
        ".php",
        // Rust
        ".rs",
        // Swift
        ".swift",
        // Shell scripts
        ".sh", ".bash", ".zsh", ".fish",
        // Perl
        ".pl", ".pm",
        // Build configs
        ".xml", ".gradle", ".properties",
        // Container configs
        ".dockerfile", ".containerfile",
        // Custom rules
        ".rules",
    ]
    .into_iter()
    .collect()
});

/// Media file extensions, offered as an optional custom omit pattern
const MEDIA_EXTENSIONS: &[&str] = &[
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "webp", "tiff", "svg", "ico",
    // Audio
    "mp3", "wav", "ogg", "flac", "m4a", "aac", "wma",
    // Video
    "mp4", "avi", "mkv", "mov", "wmv", "flv", "webm", "3gp",
    // Other media
    "psd", "ai", "eps", "raw",
];

/// A ready-to-use custom pattern omitting common media files
pub fn media_omit_pattern() -> String {
    format!(r"(?i)\.({})$", MEDIA_EXTENSIONS.join("|"))
}

/// The ordered omission policy for one traversal
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
    dropped: Vec<String>,
}

impl RuleSet {
    /// Build the policy for a root: defaults, then the root ignore file
    /// (if present), then user patterns. Unparseable user patterns are
    /// dropped with a warning and recorded for caller diagnostics.
    pub fn build(root: &Path, custom_patterns: &[String]) -> Self {
        let mut rules: Vec<Rule> = DEFAULT_RULES.clone();
        rules.extend(load_ignore_rules(root));

        let mut dropped = Vec::new();
        for raw in custom_patterns {
            match compile_custom_pattern(raw) {
                Ok(matcher) => rules.push(Rule {
                    matcher,
                    label: CUSTOM_LABEL.to_string(),
                    origin: RuleOrigin::Custom,
                }),
                Err(err) => {
                    log::warn!("dropping invalid custom pattern \"{}\": {}", raw, err);
                    dropped.push(raw.clone());
                }
            }
        }

        Self { rules, dropped }
    }

    /// Decide omission for a normalized relative path. Returns the
    /// label of the first matching rule, or the unsupported-extension
    /// label for files no rule claimed, or None to include.
    pub fn evaluate(&self, relative_path: &str, kind: EntryKind) -> Option<String> {
        for rule in &self.rules {
            if rule.matches(relative_path) {
                return Some(rule.label.clone());
            }
        }

        if kind == EntryKind::File {
            let ext = file_extension(file_name(relative_path));
            if !SUPPORTED_EXTENSIONS.contains(ext.as_str()) {
                return Some(format!(
                    "File type \"{}\" is not in supported extensions list",
                    ext
                ));
            }
        }

        None
    }

    /// Custom patterns that failed to compile and were dropped
    #[allow(dead_code)]
    pub fn dropped_patterns(&self) -> &[String] {
        &self.dropped
    }

    #[allow(dead_code)]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Compile the root ignore file, if present. Blank lines and comments
/// are skipped; an unparseable line is skipped with a warning.
fn load_ignore_rules(root: &Path) -> Vec<Rule> {
    let path = root.join(IGNORE_FILE_NAME);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Vec::new(),
    };

    let mut rules = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match compile_glob_line(line) {
            Ok(matcher) => rules.push(Rule {
                matcher,
                label: IGNORE_FILE_LABEL.to_string(),
                origin: RuleOrigin::IgnoreFile,
            }),
            Err(err) => {
                log::warn!("skipping unparseable ignore pattern \"{}\": {}", line, err);
            }
        }
    }
    rules
}
