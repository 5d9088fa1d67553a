// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

use crate::llm::tokenizer::SUPPORTED_ENCODINGS;

#[derive(Debug, Error)]
pub enum TokbudgetError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("Unknown model: '{model}'")]
    UnknownModel { model: String },

    #[error("Unknown encoding '{encoding}' configured for model '{model}'")]
    UnknownEncoding { model: String, encoding: String },

    #[error("Failed to load encoding: {0}")]
    Encoding(String),
}

impl TokbudgetError {
    pub fn unknown_model(model: &str) -> Self {
        Self::UnknownModel {
            model: model.to_owned(),
        }
    }

    /// A hint shown under the error message, if one applies.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::UnknownModel { model } => Some(format!(
                "Add an entry to the [encodings] table of tokbudget.toml, e.g. \"{model}\" = \"cl100k_base\""
            )),
            Self::UnknownEncoding { .. } => Some(format!(
                "Supported encodings are: {}",
                SUPPORTED_ENCODINGS.join(", ")
            )),
            Self::Config(_) => Some("Check tokbudget.toml and TOKBUDGET_* variables".to_owned()),
            Self::FileSystem(_) | Self::Encoding(_) => None,
        }
    }
}

impl From<config::ConfigError> for TokbudgetError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Render an error for the terminal.
///
/// Verbose mode appends the full source chain.
pub fn format_error(error: &TokbudgetError, verbose: bool) -> String {
    let mut out = format!("\n\u{26a0} Error: {error}");

    if let Some(suggestion) = error.suggestion() {
        out.push_str("\nSuggestion: ");
        out.push_str(&suggestion);
    }

    if verbose {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            out.push_str("\n\u{2514}\u{2500} ");
            out.push_str(&cause.to_string());
            source = cause.source();
        }
    }

    out
}
