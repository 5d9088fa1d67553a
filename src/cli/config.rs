//! Configuration management using the `config` crate for hierarchical discovery and merging.
//!
//! ## Configuration Sources (in precedence order, highest to lowest):
//! 1. **CLI flags** - Highest precedence (applied in [`merge_config`])
//! 2. **Environment variables** - `TOKBUDGET_GENERAL__MODEL`, `TOKBUDGET_ENCODINGS__<MODEL>`
//!
//! The `config` crate lowercases environment keys, so `TOKBUDGET_ENCODINGS__HOUSE`
//! becomes the entry `house`. Override lookups ignore ASCII case to compensate.
//! Model names containing characters an environment variable cannot carry
//! (`:` or `.`, for example) belong in the `[encodings]` table instead.
//! 3. **Config files** - Lowest precedence
//!
//! ## Config File Discovery (in merge order, later overrides earlier):
//! 1. `~/.config/tokbudget/config.toml` (user config directory)
//! 2. `tokbudget.toml` in the git repository root (walking up from the current directory)
//! 3. `./tokbudget.toml` in the current directory
//! 4. Explicit `--config` path (must exist when given)
//!
//! ## File format
//! ```toml
//! [general]
//! model = "gpt-4o"
//! include_hidden = false
//!
//! # Encodings for models tiktoken has no preset for
//! [encodings]
//! "gpt-oss:20b" = "cl100k_base"
//! "llama3:8b" = "o200k_base"
//! ```

use crate::MergedConfig;
use crate::cli::args::Args;
use crate::llm::tokenizer::{DEFAULT_MODEL, EncodingOverrides};
use crate::utils::error::TokbudgetError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up in the git root and the current directory.
pub const CONFIG_FILE_NAME: &str = "tokbudget.toml";

/// Root configuration structure loaded from config files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Extra model -> encoding entries for the fallback table
    #[serde(default)]
    pub encodings: BTreeMap<String, String>,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    #[serde(default)]
    pub include_hidden: bool,
}

fn discover_config_paths(explicit_path: &Path) -> Result<Vec<PathBuf>, TokbudgetError> {
    let mut paths = Vec::new();

    if let Some(user_config) = get_user_config_path() {
        paths.push(user_config);
    }

    if let Some(git_root) = find_git_root() {
        let git_config = git_root.join(CONFIG_FILE_NAME);
        if git_config.is_file() {
            paths.push(git_config);
        }
    }

    let current_dir_config = PathBuf::from(CONFIG_FILE_NAME);
    if current_dir_config.is_file() {
        paths.push(current_dir_config);
    }

    if explicit_path != Path::new(CONFIG_FILE_NAME) {
        if !explicit_path.is_file() {
            return Err(TokbudgetError::Config(format!(
                "Config file not found: {}",
                explicit_path.display()
            )));
        }
        paths.push(explicit_path.to_path_buf());
    }

    Ok(paths)
}

fn find_git_root() -> Option<PathBuf> {
    git2::Repository::discover(".")
        .ok()
        .and_then(|repo| repo.workdir().map(Path::to_path_buf))
}

fn get_user_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|config_dir| config_dir.join("tokbudget").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Load configuration from an explicit list of files plus the environment.
pub fn load_from_paths(paths: &[PathBuf]) -> Result<Config> {
    let mut builder = config::Config::builder();

    for config_path in paths {
        tracing::debug!("Loading config file {}", config_path.display());
        builder = builder.add_source(config::File::from(config_path.clone()));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("TOKBUDGET")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let settings = builder
        .build()
        .map_err(TokbudgetError::from)
        .context("Failed to build configuration")?;

    settings
        .try_deserialize()
        .map_err(TokbudgetError::from)
        .context("Failed to deserialize configuration")
}

/// Load configuration from discovered config files and environment variables.
pub fn load(args: &Args) -> Result<Config> {
    let paths = discover_config_paths(&args.config)?;
    load_from_paths(&paths)
}

/// Merge file configuration with CLI arguments.
///
/// CLI values win when given; `--include-hidden` can only switch hidden
/// scanning on.
pub fn merge_config(args: &Args, config: Config) -> MergedConfig {
    let model = args
        .model
        .clone()
        .or(config.general.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_owned());

    MergedConfig {
        path: args.path.clone(),
        model,
        include_hidden: args.include_hidden || config.general.include_hidden,
        encoding_overrides: EncodingOverrides::builtin().with_entries(config.encodings),
        verbose: args.verbose,
        quiet: args.quiet,
    }
}
