//! # tokbudget
//!
//! tokbudget estimates how much of a language model's token budget a
//! codebase would consume. The pipeline runs in five stages:
//!
//! 1. **Init** - Log the effective configuration
//! 2. **Resolving** - Map the model name to a tokenizer encoding, once
//! 3. **Counting** - Walk the tree, filter text files, and tokenize each one
//! 4. **Reporting** - Print the sorted per-file listing and the grand total
//! 5. **Complete** - Pipeline finished
//!
//! Everything is sequential. The single tokenizer is shared read-only by
//! every count.
//!
//! Configuration follows hierarchical precedence:
//! 1. User config (~/.config/tokbudget/config.toml)
//! 2. Git root (tokbudget.toml)
//! 3. Current directory (tokbudget.toml)
//! 4. Explicit --config path
//! 5. Environment variables (TOKBUDGET_*)
//! 6. CLI flags (highest precedence)

pub mod cli;
pub mod counter;
pub mod llm;
pub mod output;
pub mod scanner;
pub mod utils;

use anyhow::{Context, Result};
use console::Term;
use counter::TokenReport;
use llm::tokenizer::{EncodingOverrides, Tokenizer, resolve_tokenizer};
use scanner::FileWalker;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use utils::progress::CountingProgress;

/// Final resolved configuration after merging all sources (CLI, env, config files).
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// Root of the traversal
    pub path: PathBuf,
    /// Model name used to pick the encoding
    pub model: String,
    /// Descend into dot-directories and count dotfiles
    pub include_hidden: bool,
    /// Fallback model -> encoding table
    pub encoding_overrides: EncodingOverrides,
    /// Verbosity level (0-2)
    pub verbose: u8,
    /// Quiet mode (warnings and errors only, no spinner)
    pub quiet: bool,
}

/// Tracks the current stage of pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Init,
    Resolving,
    Counting,
    Reporting,
    Complete,
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout only ever carries the report. `RUST_LOG`
/// takes precedence over the verbosity flags.
pub fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // A subscriber may already be installed (e.g. by a test harness)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(Term::stderr().is_term())
        .with_target(false)
        .without_time()
        .try_init();
}

/// Run the full pipeline and write the report to `out`.
///
/// # Errors
///
/// Fails before anything is written if the model cannot be resolved. A
/// missing root is logged and yields an empty report; unreadable files
/// are skipped, not reported as errors.
pub fn run<W: Write + ?Sized>(config: &MergedConfig, out: &mut W) -> Result<TokenReport> {
    tracing::debug!("tokbudget v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        "Configuration: path={}, model={}, include_hidden={}, overrides={}",
        config.path.display(),
        config.model,
        config.include_hidden,
        config.encoding_overrides.len()
    );

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Init);

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Resolving);
    let tokenizer = resolve_tokenizer(&config.model, &config.encoding_overrides)?;

    let progress = CountingProgress::new(config.quiet);
    let report = count_tree(config, &tokenizer, &progress);

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Reporting);
    output::write_report(out, &report).context("Failed to write report")?;

    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Complete);
    Ok(report)
}

/// Walk `config.path` and count every candidate file with `tokenizer`.
///
/// This is the resolution-free half of [`run`], so any [`Tokenizer`] can
/// be plugged in.
pub fn count_tree(
    config: &MergedConfig,
    tokenizer: &dyn Tokenizer,
    progress: &CountingProgress,
) -> TokenReport {
    tracing::debug!("Pipeline stage: {:?}", PipelineStage::Counting);
    let walker = FileWalker::new(&config.path, config.include_hidden);
    let report = counter::count_files(tokenizer, &config.model, walker.candidates(), progress.bar());
    progress.finish(report.file_count());
    report
}
