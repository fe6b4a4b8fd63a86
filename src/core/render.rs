//! Renderer for the per-entry decision report
//!
//! Renders a ProcessResult's entry list to jsonl, json, or markdown.
//! The combined artifact itself is never rendered here; it is emitted
//! verbatim by the combine command.

use crate::core::model::{EntryKind, ProcessResult};

/// Output format for entry reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            pretty: false,
        }
    }

    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for entry reports
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    #[allow(dead_code)]
    pub fn new(format: OutputFormat) -> Self {
        Self {
            config: RenderConfig::new(format),
        }
    }

    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render the entry report of a result to a string
    pub fn render(&self, result: &ProcessResult) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result),
            OutputFormat::Json => self.render_json(result),
            OutputFormat::Markdown => self.render_markdown(result),
        }
    }

    /// One JSON object per entry, one entry per line
    fn render_jsonl(&self, result: &ProcessResult) -> String {
        result
            .entries
            .iter()
            .filter_map(|entry| {
                if self.config.pretty {
                    serde_json::to_string_pretty(entry).ok()
                } else {
                    serde_json::to_string(entry).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// A single JSON array of entries
    fn render_json(&self, result: &ProcessResult) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result.entries).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result.entries).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Human-friendly Markdown with included/excluded sections and totals
    fn render_markdown(&self, result: &ProcessResult) -> String {
        let mut output = String::new();

        let included: Vec<_> = result.entries.iter().filter(|e| e.included).collect();
        let excluded: Vec<_> = result.entries.iter().filter(|e| !e.included).collect();

        if !included.is_empty() {
            output.push_str("## Included\n\n");
            for entry in &included {
                match entry.kind {
                    EntryKind::Directory => {
                        output.push_str(&format!("- `{}` (directory)\n", entry.path));
                    }
                    EntryKind::File => {
                        output.push_str(&format!("- `{}` ({} bytes)\n", entry.path, entry.size));
                    }
                }
            }
            output.push('\n');
        }

        if !excluded.is_empty() {
            output.push_str("## Excluded\n\n");
            for entry in &excluded {
                if entry.omit_reason.is_empty() {
                    output.push_str(&format!("- `{}`\n", entry.path));
                } else {
                    output.push_str(&format!("- `{}`: {}\n", entry.path, entry.omit_reason));
                }
            }
            output.push('\n');
        }

        output.push_str("## Totals\n\n");
        output.push_str(&format!("- included: {}\n", result.included_count()));
        output.push_str(&format!("- excluded: {}\n", result.excluded_count()));
        output.push_str(&format!("- characters: {}\n", result.total_characters));
        output.push_str(&format!("- approx tokens: {}\n", result.approx_tokens));

        output
    }
}
