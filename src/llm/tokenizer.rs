// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

//! Model-specific tokenizers for counting tokens in text.
//!
//! A model name is resolved to an encoding once per run. Models that
//! tiktoken knows about map to their preset encoding; anything else is
//! looked up in an [`EncodingOverrides`] table before giving up with
//! [`TokbudgetError::UnknownModel`].
//!
//! # Example
//!
//! ```
//! use tokbudget::llm::tokenizer::{EncodingOverrides, Tokenizer, resolve_tokenizer};
//!
//! let tokenizer = resolve_tokenizer("gpt-4o", &EncodingOverrides::builtin()).unwrap();
//! let count = tokenizer.count_tokens("Hello, world!");
//! assert!(count > 0);
//! ```

use std::collections::BTreeMap;

use crate::utils::error::TokbudgetError;
use tiktoken_rs::CoreBPE;
use tiktoken_rs::tokenizer::{Tokenizer as PresetEncoding, get_tokenizer};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Encoding names accepted in the override table.
pub const SUPPORTED_ENCODINGS: &[&str] = &[
    "o200k_base",
    "cl100k_base",
    "p50k_base",
    "p50k_edit",
    "r50k_base",
    "gpt2",
];

/// Trait for counting tokens in text.
///
/// The counting pipeline only sees this trait, so any deterministic
/// encoder can stand in for tiktoken.
pub trait Tokenizer: Send + Sync {
    /// Count the number of tokens in the given text.
    fn count_tokens(&self, text: &str) -> usize;

    /// Name of the encoding scheme, e.g. `o200k_base`.
    fn encoding_name(&self) -> &str;
}

/// Where a resolved encoding came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingSource {
    /// tiktoken knows the model directly.
    Preset,
    /// The model was found in the override table.
    Override,
}

/// Immutable mapping from model name to encoding name, consulted when a
/// model has no preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingOverrides {
    entries: BTreeMap<String, String>,
}

impl EncodingOverrides {
    /// The table shipped with the tool.
    pub fn builtin() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("gpt-oss:20b".to_owned(), "cl100k_base".to_owned());
        Self { entries }
    }

    /// An empty table, mostly useful in tests.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Layer additional entries on top; later entries replace existing ones.
    #[must_use]
    pub fn with_entries<I>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.entries.extend(extra);
        self
    }

    /// Look up the encoding for `model`.
    ///
    /// An exact key wins; otherwise keys are compared ignoring ASCII case,
    /// since entries from the environment arrive lowercased.
    pub fn get(&self, model: &str) -> Option<&str> {
        self.entries
            .get(model)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(model))
                    .map(|(_, encoding)| encoding)
            })
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EncodingOverrides {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Tokenizer backed by a tiktoken BPE encoding.
pub struct TiktokenTokenizer {
    encoding: CoreBPE,
    name: String,
    source: EncodingSource,
}

impl TiktokenTokenizer {
    /// Load a tokenizer for a named encoding such as `cl100k_base`.
    ///
    /// Returns `Ok(None)` when the name is not a supported encoding.
    pub fn from_encoding_name(name: &str) -> Result<Option<Self>, TokbudgetError> {
        let loaded = match name {
            "o200k_base" => tiktoken_rs::o200k_base(),
            "cl100k_base" => tiktoken_rs::cl100k_base(),
            "p50k_base" => tiktoken_rs::p50k_base(),
            "p50k_edit" => tiktoken_rs::p50k_edit(),
            "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
            _ => return Ok(None),
        };
        let encoding = loaded.map_err(|e| TokbudgetError::Encoding(e.to_string()))?;

        Ok(Some(Self {
            encoding,
            name: name.to_owned(),
            source: EncodingSource::Override,
        }))
    }

    /// Load the preset encoding tiktoken associates with `model`.
    ///
    /// Returns `Ok(None)` when tiktoken has no preset for the model.
    pub fn from_preset(model: &str) -> Result<Option<Self>, TokbudgetError> {
        let Some(preset) = get_tokenizer(model) else {
            return Ok(None);
        };
        let name = preset_label(&preset);
        let encoding = tiktoken_rs::get_bpe_from_tokenizer(preset)
            .map_err(|e| TokbudgetError::Encoding(e.to_string()))?;

        Ok(Some(Self {
            encoding,
            name,
            source: EncodingSource::Preset,
        }))
    }

    pub fn source(&self) -> EncodingSource {
        self.source
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str) -> usize {
        self.encoding.encode_with_special_tokens(text).len()
    }

    fn encoding_name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

#[allow(clippy::wildcard_enum_match_arm)]
fn preset_label(preset: &PresetEncoding) -> String {
    match preset {
        PresetEncoding::O200kBase => "o200k_base".to_owned(),
        PresetEncoding::Cl100kBase => "cl100k_base".to_owned(),
        PresetEncoding::P50kBase => "p50k_base".to_owned(),
        PresetEncoding::P50kEdit => "p50k_edit".to_owned(),
        PresetEncoding::R50kBase => "r50k_base".to_owned(),
        other => format!("{other:?}").to_lowercase(),
    }
}

/// Resolve the tokenizer for `model`.
///
/// Tries the tiktoken preset first, then `overrides`. A fallback hit is
/// announced at info level.
///
/// # Errors
///
/// [`TokbudgetError::UnknownModel`] if neither lookup knows the model,
/// [`TokbudgetError::UnknownEncoding`] if the override names an encoding
/// that is not supported.
pub fn resolve_tokenizer(
    model: &str,
    overrides: &EncodingOverrides,
) -> Result<TiktokenTokenizer, TokbudgetError> {
    if let Some(tokenizer) = TiktokenTokenizer::from_preset(model)? {
        tracing::debug!(
            "Model {} uses preset encoding '{}'",
            model,
            tokenizer.encoding_name()
        );
        return Ok(tokenizer);
    }

    let Some(encoding_name) = overrides.get(model) else {
        return Err(TokbudgetError::unknown_model(model));
    };

    let tokenizer = TiktokenTokenizer::from_encoding_name(encoding_name)?.ok_or_else(|| {
        TokbudgetError::UnknownEncoding {
            model: model.to_owned(),
            encoding: encoding_name.to_owned(),
        }
    })?;

    tracing::info!(
        "Model {} has no preset encoder; falling back to '{}'.",
        model,
        encoding_name
    );
    Ok(tokenizer)
}
