// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

//! Directory traversal and text-file filtering.

pub mod walker;

pub use walker::{FileWalker, TEXT_EXTENSIONS, is_hidden_name, is_text_file};
