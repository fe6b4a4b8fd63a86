//! Selective tree-aggregation engine
//!
//! `process` is the single entry point: it validates the root, builds
//! the layered rule set (built-in defaults, the root ignore file, user
//! patterns), resolves requested overrides against a snapshot walk,
//! then runs the real walk and folds its output into a ProcessResult.
//!
//! One logical thread of control per traversal; a re-run is always a
//! full fresh walk against the stores passed in. Known limitation: a
//! stuck filesystem call blocks the whole operation.

pub mod overrides;
pub mod pattern;
pub mod rules;
pub mod walker;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::model::ProcessResult;
use crate::engine::overrides::OverrideStore;
use crate::engine::rules::RuleSet;
use crate::engine::walker::{TreeWalker, WalkOutput};

/// Structural failures that abort a run outright. Everything else
/// (unreadable files, bad patterns) is isolated per entry.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("selected path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("cannot list root directory {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Caller inputs beyond the root path
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Raw regex omit patterns; invalid entries are dropped with a warning
    pub custom_patterns: Vec<String>,

    /// Relative paths forced included (directories cascade)
    pub force_include: Vec<String>,

    /// Relative paths forced excluded (directories cascade); applied
    /// after force_include, so the later mention of a path wins
    pub force_exclude: Vec<String>,
}

/// Run one full aggregation over `root`.
///
/// A structural root failure yields `success: false` with one message
/// and no partial result; per-entry failures never abort the walk.
pub fn process(root: &Path, options: &ProcessOptions) -> ProcessResult {
    if let Err(err) = validate_root(root) {
        return ProcessResult::failure(err.to_string());
    }

    let rules = RuleSet::build(root, &options.custom_patterns);

    let mut overrides = OverrideStore::new();
    if !options.force_include.is_empty() || !options.force_exclude.is_empty() {
        // cascades are resolved against the current entry snapshot, so
        // take one clean walk before forcing anything
        let snapshot = TreeWalker::new(&rules, &overrides).walk(root);
        for path in &options.force_include {
            overrides.set_forced_cascading(path, true, &snapshot.entries);
        }
        for path in &options.force_exclude {
            overrides.set_forced_cascading(path, false, &snapshot.entries);
        }
    }

    let output = TreeWalker::new(&rules, &overrides).walk(root);
    aggregate(output)
}

/// The root must exist, be a directory, and be listable
fn validate_root(root: &Path) -> Result<(), EngineError> {
    let meta = fs::metadata(root).map_err(|_| EngineError::NotADirectory {
        path: root.to_path_buf(),
    })?;
    if !meta.is_dir() {
        return Err(EngineError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    fs::read_dir(root).map_err(|source| EngineError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Fold a finished walk into the caller-facing result
pub fn aggregate(output: WalkOutput) -> ProcessResult {
    let total_characters = output.combined_text.chars().count();
    ProcessResult {
        combined_text: output.combined_text,
        total_characters,
        approx_tokens: total_characters.div_ceil(4),
        entries: output.entries,
        success: true,
        error: None,
    }
}
