// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-file token counting and aggregation.
//!
//! Each candidate file is read once as strict UTF-8. Files that fail to
//! read or decode, and files that encode to zero tokens, are skipped
//! rather than reported; only [`FileOutcome::Counted`] files land in the
//! [`TokenReport`].

use crate::llm::tokenizer::Tokenizer;
use indicatif::ProgressBar;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

/// Token count for one successfully read file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub tokens: usize,
    pub path: PathBuf,
}

/// Result of counting one candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file produced at least one token.
    Counted(FileRecord),
    /// The file was read but encodes to nothing.
    Empty,
    /// The file could not be opened or is not valid UTF-8.
    Unreadable(std::io::ErrorKind),
}

impl FileOutcome {
    pub fn tokens(&self) -> usize {
        match self {
            Self::Counted(record) => record.tokens,
            Self::Empty | Self::Unreadable(_) => 0,
        }
    }
}

/// Fold `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Read and tokenize a single file.
///
/// Never fails: I/O and decoding errors become [`FileOutcome::Unreadable`].
pub fn count_file(tokenizer: &dyn Tokenizer, path: &Path) -> FileOutcome {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::trace!("Skipping unreadable file {}: {}", path.display(), e);
            return FileOutcome::Unreadable(e.kind());
        }
    };

    match tokenizer.count_tokens(&normalize_newlines(&text)) {
        0 => FileOutcome::Empty,
        tokens => FileOutcome::Counted(FileRecord {
            tokens,
            path: path.to_path_buf(),
        }),
    }
}

/// Aggregated counts for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenReport {
    /// Model the counts were produced for
    pub model: String,
    /// Non-empty files, largest first
    pub records: Vec<FileRecord>,
    /// Sum of all record counts
    pub total: usize,
}

impl TokenReport {
    /// Build a report, sorting records by tokens descending and then by path.
    pub fn new(model: impl Into<String>, mut records: Vec<FileRecord>) -> Self {
        records.sort_by(|a, b| {
            Reverse(a.tokens)
                .cmp(&Reverse(b.tokens))
                .then_with(|| a.path.cmp(&b.path))
        });
        let total = records.iter().map(|r| r.tokens).sum();

        Self {
            model: model.into(),
            records,
            total,
        }
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }
}

/// Count every candidate path and collect the non-empty results.
///
/// `progress` is ticked once per file; pass [`ProgressBar::hidden`] when
/// no display is wanted.
pub fn count_files<I>(
    tokenizer: &dyn Tokenizer,
    model: &str,
    candidates: I,
    progress: &ProgressBar,
) -> TokenReport
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for path in candidates {
        progress.set_message(path.display().to_string());
        match count_file(tokenizer, &path) {
            FileOutcome::Counted(record) => records.push(record),
            FileOutcome::Empty | FileOutcome::Unreadable(_) => {
                skipped = skipped.saturating_add(1);
            }
        }
        progress.inc(1);
    }

    tracing::debug!(
        "Counted {} files, skipped {} empty or unreadable",
        records.len(),
        skipped
    );
    TokenReport::new(model, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// One token per whitespace-separated word.
    struct WordTokenizer;

    impl Tokenizer for WordTokenizer {
        fn count_tokens(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }

        fn encoding_name(&self) -> &str {
            "words"
        }
    }

    fn record(tokens: usize, path: &str) -> FileRecord {
        FileRecord {
            tokens,
            path: PathBuf::from(path),
        }
    }

    #[test]
    fn test_count_file_counts_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "one two three").unwrap();

        assert_eq!(
            count_file(&WordTokenizer, &path),
            FileOutcome::Counted(FileRecord { tokens: 3, path })
        );
    }

    #[test]
    fn test_empty_file_is_empty_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.md");
        fs::write(&path, "").unwrap();

        assert_eq!(count_file(&WordTokenizer, &path), FileOutcome::Empty);
    }

    #[test]
    fn test_invalid_utf8_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, [0x63, 0x61, 0x66, 0xe9, 0x20, 0xff]).unwrap();

        let outcome = count_file(&WordTokenizer, &path);
        assert_eq!(outcome, FileOutcome::Unreadable(std::io::ErrorKind::InvalidData));
        assert_eq!(outcome.tokens(), 0);
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = count_file(&WordTokenizer, &dir.path().join("gone.rs"));
        assert_eq!(outcome, FileOutcome::Unreadable(std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_special_token_literal_counts_as_one_token() {
        use crate::llm::tokenizer::TiktokenTokenizer;

        let tokenizer = TiktokenTokenizer::from_encoding_name("cl100k_base")
            .unwrap()
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.txt");
        fs::write(&path, "<|endoftext|>").unwrap();

        assert_eq!(
            count_file(&tokenizer, &path),
            FileOutcome::Counted(FileRecord { tokens: 1, path })
        );
    }

    #[test]
    fn test_newlines_are_normalized() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("plain\n"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_report_sorted_descending_with_total() {
        let report = TokenReport::new(
            "gpt-4o",
            vec![record(5, "b.md"), record(10, "a.py"), record(7, "c.rs")],
        );

        let tokens: Vec<_> = report.records.iter().map(|r| r.tokens).collect();
        assert_eq!(tokens, vec![10, 7, 5]);
        assert_eq!(report.total, 22);
        assert_eq!(report.file_count(), 3);
    }

    #[test]
    fn test_report_ties_ordered_by_path() {
        let report = TokenReport::new(
            "gpt-4o",
            vec![record(3, "z.rs"), record(3, "a.rs"), record(3, "m.rs")],
        );
        let paths: Vec<_> = report.records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("a.rs"),
                PathBuf::from("m.rs"),
                PathBuf::from("z.rs")
            ]
        );
    }

    #[test]
    fn test_count_files_excludes_zero_token_files() {
        let dir = tempfile::tempdir().unwrap();
        let full = dir.path().join("full.rs");
        let empty = dir.path().join("empty.rs");
        let blank = dir.path().join("blank.rs");
        let binary = dir.path().join("binary.txt");
        fs::write(&full, "fn main ( )").unwrap();
        fs::write(&empty, "").unwrap();
        fs::write(&blank, "   \n\n").unwrap();
        fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let report = count_files(
            &WordTokenizer,
            "words",
            vec![full.clone(), empty, blank, binary],
            &ProgressBar::hidden(),
        );

        assert_eq!(report.records, vec![FileRecord { tokens: 4, path: full }]);
        assert_eq!(report.total, 4);
    }

    #[test]
    fn test_count_files_empty_input() {
        let report = count_files(&WordTokenizer, "words", Vec::new(), &ProgressBar::hidden());
        assert!(report.records.is_empty());
        assert_eq!(report.total, 0);
        assert_eq!(report.model, "words");
    }
}
