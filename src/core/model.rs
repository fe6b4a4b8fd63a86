//! Result model for a traversal
//!
//! Every run produces one ProcessResult: the combined artifact, aggregate
//! statistics, and one PreviewEntry per visited filesystem entry in
//! traversal order. Field names serialize in camelCase to keep the wire
//! shape of the result object stable for downstream consumers.

use serde::{Deserialize, Serialize};

/// The kind of filesystem entry a PreviewEntry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// One visited filesystem entry with its inclusion decision
///
/// Entries are recorded once, in visitation order, and never revised
/// after creation; a fresh traversal produces a fresh list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewEntry {
    /// Path relative to root, using '/' as separator
    pub path: String,

    /// File or directory
    pub kind: EntryKind,

    /// Whether the entry contributes to the combined artifact
    pub included: bool,

    /// File size in bytes (0 for directories)
    pub size: u64,

    /// The label of the rule that omitted the entry; empty when the
    /// entry is included or its decision came from an override
    #[serde(default)]
    pub omit_reason: String,
}

impl PreviewEntry {
    /// Create a file entry
    pub fn file(
        path: impl Into<String>,
        included: bool,
        size: u64,
        omit_reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
            included,
            size,
            omit_reason: omit_reason.into(),
        }
    }

    /// Create a directory entry (directories always report size 0)
    pub fn directory(
        path: impl Into<String>,
        included: bool,
        omit_reason: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            included,
            size: 0,
            omit_reason: omit_reason.into(),
        }
    }
}

/// The caller-facing outcome of one traversal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    /// Concatenation of delimiter-framed contents of included files
    pub combined_text: String,

    /// Length of the combined text in Unicode scalar values
    pub total_characters: usize,

    /// ceil(total_characters / 4), a fixed heuristic
    pub approx_tokens: usize,

    /// Per-entry decisions in traversal order
    pub entries: Vec<PreviewEntry>,

    /// False only when the run failed structurally (bad root)
    pub success: bool,

    /// The single error message of a failed run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProcessResult {
    /// A failed run carries one message and no partial result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            combined_text: String::new(),
            total_characters: 0,
            approx_tokens: 0,
            entries: Vec::new(),
            success: false,
            error: Some(message.into()),
        }
    }

    /// Number of entries marked included
    pub fn included_count(&self) -> usize {
        self.entries.iter().filter(|e| e.included).count()
    }

    /// Number of entries marked excluded
    pub fn excluded_count(&self) -> usize {
        self.entries.len() - self.included_count()
    }
}
