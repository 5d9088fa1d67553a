// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

pub mod tokenizer;

pub use tokenizer::{
    DEFAULT_MODEL, EncodingOverrides, EncodingSource, TiktokenTokenizer, Tokenizer,
    resolve_tokenizer,
};
