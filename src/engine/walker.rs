//! Tree traversal and artifact assembly
//!
//! One sequential depth-first pass over the tree: every entry gets a
//! recorded decision (override first, rules otherwise), and included
//! files contribute a delimiter-framed block to the combined text.
//! Siblings are visited in lexicographic file-name order so repeated
//! walks over an unchanged tree produce identical output.

use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::core::model::{EntryKind, PreviewEntry};
use crate::core::paths::{file_name, folder_label, make_relative};
use crate::engine::overrides::OverrideStore;
use crate::engine::rules::RuleSet;

/// The raw product of one walk, before aggregation
#[derive(Debug, Clone)]
pub struct WalkOutput {
    pub combined_text: String,
    pub entries: Vec<PreviewEntry>,
}

/// Traversal over one root with an explicit policy and override store
pub struct TreeWalker<'a> {
    rules: &'a RuleSet,
    overrides: &'a OverrideStore,
}

impl<'a> TreeWalker<'a> {
    pub fn new(rules: &'a RuleSet, overrides: &'a OverrideStore) -> Self {
        Self { rules, overrides }
    }

    /// Walk the tree under `root`, recording one PreviewEntry per
    /// visited entry in order and appending content for included files.
    ///
    /// Omitted directories are still descended into so every entry of
    /// the tree appears in the report and stays reachable for
    /// overrides; omission excludes content, not enumeration. Per-entry
    /// I/O failures are logged and skipped. Symlinks are not followed.
    pub fn walk(&self, root: &Path) -> WalkOutput {
        let mut combined_text = String::new();
        let mut entries = Vec::new();

        let walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("error walking directory tree: {}", err);
                    continue;
                }
            };

            let relative = match make_relative(entry.path(), root) {
                Some(relative) => relative,
                None => {
                    log::warn!("could not relativize path: {}", entry.path().display());
                    continue;
                }
            };

            let kind = if entry.file_type().is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let (included, omit_reason) = match self.overrides.is_forced(&relative) {
                Some(forced) => (forced, String::new()),
                None => match self.rules.evaluate(&relative, kind) {
                    Some(label) => (false, label),
                    None => (true, String::new()),
                },
            };

            match kind {
                EntryKind::Directory => {
                    log::trace!("dir  {} included={}", relative, included);
                    entries.push(PreviewEntry::directory(relative, included, omit_reason));
                }
                EntryKind::File => {
                    let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    log::trace!("file {} included={}", relative, included);
                    if included {
                        append_file(&mut combined_text, entry.path(), &relative);
                    }
                    entries.push(PreviewEntry::file(relative, included, size, omit_reason));
                }
            }
        }

        WalkOutput {
            combined_text,
            entries,
        }
    }
}

/// Append one delimiter-framed content block. A failed read leaves the
/// entry included with no content block; the failure is only logged.
fn append_file(combined: &mut String, path: &Path, relative: &str) {
    match fs::read_to_string(path) {
        Ok(content) => {
            combined.push_str(&format!(
                "\n// ===== Folder: {} | File: {} =====\n{}\n",
                folder_label(relative),
                file_name(relative),
                content
            ));
        }
        Err(err) => {
            log::warn!("error reading file {}: {}", path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn walk_bare(root: &Path) -> WalkOutput {
        let rules = RuleSet::build(root, &[]);
        let overrides = OverrideStore::new();
        TreeWalker::new(&rules, &overrides).walk(root)
    }

    fn entry<'a>(output: &'a WalkOutput, path: &str) -> &'a PreviewEntry {
        output
            .entries
            .iter()
            .find(|e| e.path == path)
            .unwrap_or_else(|| panic!("no entry for {}", path))
    }

    #[test]
    fn test_walk_records_all_entries_including_omitted_subtrees() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.ts"), "const x = 1;\n").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "[core]\n").unwrap();

        let output = walk_bare(temp.path());

        let paths: Vec<_> = output.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec![".git", ".git/config", "a.ts"]);

        let git_dir = entry(&output, ".git");
        assert_eq!(git_dir.kind, EntryKind::Directory);
        assert!(!git_dir.included);
        assert_eq!(git_dir.omit_reason, "Git directory");

        let config = entry(&output, ".git/config");
        assert!(!config.included);
        assert_eq!(config.omit_reason, "Git directory");

        assert!(entry(&output, "a.ts").included);
    }

    #[test]
    fn test_combined_text_framing_is_exact() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.ts"), "const x = 1;\n").unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "[core]\n").unwrap();

        let output = walk_bare(temp.path());

        assert_eq!(
            output.combined_text,
            "\n// ===== Folder: . | File: a.ts =====\nconst x = 1;\n\n"
        );
    }

    #[test]
    fn test_nested_folder_label() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src/lib")).unwrap();
        fs::write(temp.path().join("src/lib/util.rs"), "pub fn f() {}\n").unwrap();

        let output = walk_bare(temp.path());

        assert!(output
            .combined_text
            .contains("\n// ===== Folder: src/lib | File: util.rs =====\n"));
    }

    #[test]
    fn test_unsupported_extension_enumerated_without_content() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("notes.xyz"), "data").unwrap();

        let output = walk_bare(temp.path());

        let notes = entry(&output, "notes.xyz");
        assert!(!notes.included);
        assert_eq!(
            notes.omit_reason,
            "File type \".xyz\" is not in supported extensions list"
        );
        assert!(output.combined_text.is_empty());
    }

    #[test]
    fn test_directory_size_is_zero_and_file_size_recorded() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/main.rs"), "fn main() {}\n").unwrap();

        let output = walk_bare(temp.path());

        assert_eq!(entry(&output, "src").size, 0);
        assert_eq!(entry(&output, "src/main.rs").size, 13);
    }

    #[test]
    fn test_override_forces_inclusion_past_rules() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join(".git/config"), "[core]\n").unwrap();

        let rules = RuleSet::build(temp.path(), &[]);
        let mut overrides = OverrideStore::new();
        overrides.set_forced(".git/config", true);
        let output = TreeWalker::new(&rules, &overrides).walk(temp.path());

        let config = entry(&output, ".git/config");
        assert!(config.included);
        assert!(config.omit_reason.is_empty());
        assert!(output
            .combined_text
            .contains("\n// ===== Folder: .git | File: config =====\n[core]\n"));
    }

    #[test]
    fn test_override_forces_exclusion_of_included_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.ts"), "const x = 1;\n").unwrap();

        let rules = RuleSet::build(temp.path(), &[]);
        let mut overrides = OverrideStore::new();
        overrides.set_forced("a.ts", false);
        let output = TreeWalker::new(&rules, &overrides).walk(temp.path());

        let a = entry(&output, "a.ts");
        assert!(!a.included);
        assert!(a.omit_reason.is_empty());
        assert!(output.combined_text.is_empty());
    }

    #[test]
    fn test_unreadable_file_stays_included_without_content() {
        let temp = tempdir().unwrap();
        // invalid UTF-8 under a supported extension fails the text read
        fs::write(temp.path().join("bad.ts"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
        fs::write(temp.path().join("good.ts"), "ok\n").unwrap();

        let output = walk_bare(temp.path());

        let bad = entry(&output, "bad.ts");
        assert!(bad.included);
        assert!(bad.omit_reason.is_empty());

        // only the readable file contributed a block
        assert_eq!(
            output.combined_text,
            "\n// ===== Folder: . | File: good.ts =====\nok\n\n"
        );
    }

    #[test]
    fn test_siblings_visit_in_lexicographic_order() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("b.ts"), "b\n").unwrap();
        fs::write(temp.path().join("a.ts"), "a\n").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/z.ts"), "z\n").unwrap();

        let output = walk_bare(temp.path());

        let paths: Vec<_> = output.entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, vec!["a.ts", "b.ts", "sub", "sub/z.ts"]);
        assert_eq!(
            output.combined_text,
            "\n// ===== Folder: . | File: a.ts =====\na\n\n\
             \n// ===== Folder: . | File: b.ts =====\nb\n\n\
             \n// ===== Folder: sub | File: z.ts =====\nz\n\n"
        );
    }

    #[test]
    fn test_walk_is_idempotent() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.ts"), "const x = 1;\n").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/m.rs"), "fn m() {}\n").unwrap();
        fs::write(temp.path().join("skip.xyz"), "nope").unwrap();

        let first = walk_bare(temp.path());
        let second = walk_bare(temp.path());

        assert_eq!(first.combined_text, second.combined_text);
        assert_eq!(first.entries, second.entries);
    }

    #[test]
    fn test_empty_root() {
        let temp = tempdir().unwrap();
        let output = walk_bare(temp.path());
        assert!(output.combined_text.is_empty());
        assert!(output.entries.is_empty());
    }
}
