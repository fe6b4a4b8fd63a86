//! CLI module - command definitions and dispatch

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use crate::core::model::ProcessResult;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::tokenizer::{count_tokens, TokenModel};
use crate::engine::pattern::compile_custom_pattern;
use crate::engine::rules::media_omit_pattern;
use crate::engine::{process, ProcessOptions};

/// codecat - combine a directory tree into one prompt-ready text artifact.
#[derive(Parser, Debug)]
#[command(name = "codecat")]
#[command(
    author,
    version,
    about,
    long_about = r#"codecat walks a directory, decides per entry whether it belongs in the
combined artifact, and concatenates every included file behind a
`// ===== Folder: ... | File: ... =====` delimiter line.

Inclusion is decided by layered omit rules (built-in defaults, the root
.gitignore, your --pattern regexes), a supported-extension allow-list,
and explicit per-path overrides that bypass the rules entirely.

Examples:
    codecat combine > context.txt
    codecat combine --root ../app --output combined_code.txt --stats
    codecat combine --pattern 'backup' --force-include .env.example
    codecat preview --format md
"#
)]
pub struct Cli {
    /// Root directory to aggregate.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        long_help = "Root directory to aggregate (defaults to the current directory).\n\n\
All reported paths are relative to this root, normalized to '/'."
    )]
    pub root: PathBuf,

    /// Output format for entry reports (jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for the per-entry decision report.\n\n\
Supported values:\n\
- jsonl (default): one JSON object per line\n\
- json: a single JSON array\n\
- md: human-friendly Markdown with totals\n\n\
Only affects `preview`; `combine` always emits the artifact verbatim."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (suppress warnings and stats on stderr).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (more diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Rule and override flags shared by combine and preview
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Custom omit pattern (raw regex, repeatable).
    #[arg(
        long,
        value_name = "REGEX",
        long_help = "Omit every path matching this regex (repeatable).\n\n\
Patterns are matched against '/'-normalized relative paths and apply\n\
after the built-in defaults and the root .gitignore. An invalid regex\n\
is dropped with a warning; the run still proceeds."
    )]
    pub pattern: Vec<String>,

    /// Also omit common media files (images, audio, video).
    #[arg(long)]
    pub omit_media: bool,

    /// Force a path into the artifact regardless of the rules (repeatable).
    #[arg(
        long,
        value_name = "PATH",
        long_help = "Force this relative path to be included, bypassing every rule.\n\n\
Naming a directory forces every entry currently beneath it as well."
    )]
    pub force_include: Vec<String>,

    /// Force a path out of the artifact regardless of the rules (repeatable).
    #[arg(
        long,
        value_name = "PATH",
        long_help = "Force this relative path to be excluded, bypassing every rule.\n\n\
Naming a directory forces every entry currently beneath it as well.\n\
Applied after --force-include, so the exclusion wins for a path named\n\
by both."
    )]
    pub force_exclude: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Combine every included file under ROOT into one text artifact.
    #[command(
        long_about = "Walk ROOT, apply the omit rules and overrides, and emit the combined\n\
artifact on stdout (or into --output).\n\n\
Files that fail to read as UTF-8 text are skipped for content but still\n\
counted as included in the report; the failure is logged.\n\n\
Examples:\n\
  codecat combine > context.txt\n\
  codecat combine --output combined_code.txt --stats\n\
  codecat combine --omit-media --pattern 'fixtures'\n"
    )]
    Combine {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Write the artifact to a file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Print aggregate statistics on stderr.
        #[arg(long)]
        stats: bool,

        /// Token model for the stats line (approx/cl100k/o200k).
        #[arg(
            long,
            default_value = "approx",
            value_name = "MODEL",
            long_help = "Token model used by --stats.\n\n\
Supported values:\n\
- approx (default): the fixed chars/4 heuristic the result reports\n\
- cl100k: tiktoken cl100k_base (GPT-4, Claude 3)\n\
- o200k: tiktoken o200k_base (GPT-4o)"
        )]
        token_model: String,
    },

    /// Report the per-entry inclusion decisions without emitting content.
    #[command(
        long_about = "Walk ROOT with the same rules and overrides as `combine`, but emit the\n\
per-entry decision report instead of the artifact: one record per\n\
visited entry with its kind, size, inclusion flag and omit reason.\n\n\
Use this to inspect what a combine run would pick up, then re-run with\n\
--force-include/--force-exclude toggles.\n\n\
Examples:\n\
  codecat preview\n\
  codecat preview --format md\n\
  codecat preview --pattern 'generated' --format json --pretty\n"
    )]
    Preview {
        #[command(flatten)]
        selection: SelectionArgs,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let root = cli.root.canonicalize().unwrap_or(cli.root.clone());
    let quiet = cli.quiet;

    match cli.command {
        Commands::Combine {
            selection,
            output,
            stats,
            token_model,
        } => {
            let model: TokenModel = token_model
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            run_combine(&root, &selection, output.as_deref(), stats, model, quiet)
        }
        Commands::Preview { selection } => run_preview(&root, &selection, render_config, quiet),
    }
}

fn run_combine(
    root: &std::path::Path,
    selection: &SelectionArgs,
    output: Option<&std::path::Path>,
    stats: bool,
    model: TokenModel,
    quiet: bool,
) -> Result<()> {
    let result = run_engine(root, selection, quiet)?;

    match output {
        Some(path) => {
            fs::write(path, &result.combined_text)
                .with_context(|| format!("failed to write artifact to {}", path.display()))?;
            if !quiet {
                eprintln!("wrote {} to {}", "combined artifact".bold(), path.display());
            }
        }
        None => {
            print!("{}", result.combined_text);
        }
    }

    if stats && !quiet {
        print_stats(&result, model);
    }

    Ok(())
}

fn run_preview(
    root: &std::path::Path,
    selection: &SelectionArgs,
    render_config: RenderConfig,
    quiet: bool,
) -> Result<()> {
    let result = run_engine(root, selection, quiet)?;

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result));

    Ok(())
}

/// Invoke the engine and turn a structural failure into the command's
/// single error
fn run_engine(
    root: &std::path::Path,
    selection: &SelectionArgs,
    quiet: bool,
) -> Result<ProcessResult> {
    let options = build_options(selection, quiet);
    let result = process(root, &options);

    if !result.success {
        bail!(
            "{}",
            result
                .error
                .unwrap_or_else(|| "processing failed".to_string())
        );
    }

    Ok(result)
}

/// Translate CLI selection flags into engine options, warning about
/// regexes that will not compile
fn build_options(selection: &SelectionArgs, quiet: bool) -> ProcessOptions {
    let mut custom_patterns = Vec::new();
    for raw in &selection.pattern {
        match compile_custom_pattern(raw) {
            Ok(_) => custom_patterns.push(raw.clone()),
            Err(err) => {
                if !quiet {
                    eprintln!(
                        "{} invalid omit pattern \"{}\": {}",
                        "warning:".yellow().bold(),
                        raw,
                        err
                    );
                }
            }
        }
    }
    if selection.omit_media {
        custom_patterns.push(media_omit_pattern());
    }

    ProcessOptions {
        custom_patterns,
        force_include: normalize_override_paths(&selection.force_include),
        force_exclude: normalize_override_paths(&selection.force_exclude),
    }
}

/// Override paths are matched against '/'-normalized relative paths
/// with no trailing slash
fn normalize_override_paths(paths: &[String]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.replace('\\', "/").trim_end_matches('/').to_string())
        .collect()
}

fn print_stats(result: &ProcessResult, model: TokenModel) {
    eprintln!(
        "{} included, {} excluded",
        result.included_count(),
        result.excluded_count()
    );
    eprintln!(
        "{} characters, ~{} tokens (chars/4)",
        result.total_characters, result.approx_tokens
    );
    if model != TokenModel::Approx {
        eprintln!(
            "{} tokens ({})",
            count_tokens(&result.combined_text, model),
            model
        );
    }
}
