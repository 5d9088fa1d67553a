// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::formatting::format_number;

const COUNTING_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {pos} files  {wide_msg}";

/// Spinner shown on stderr while files are being counted.
///
/// Stdout carries the report, so the spinner never draws there. When
/// stderr is not a terminal, or quiet mode is on, the bar is hidden and
/// produces no output.
pub struct CountingProgress {
    bar: ProgressBar,
}

impl CountingProgress {
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let visible = !quiet && Term::stderr().is_term();
        let bar = if visible {
            let spinner = ProgressBar::new_spinner();
            spinner.enable_steady_tick(std::time::Duration::from_millis(100));
            spinner
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(counting_style());
        Self { bar }
    }

    /// A progress handle that never draws.
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }

    /// Clear the spinner and log a summary line.
    pub fn finish(&self, counted: usize) {
        let scanned = self.bar.position();
        self.bar.finish_and_clear();
        tracing::debug!(
            "Counted {} of {} candidate files",
            format_number(counted),
            format_number(usize::try_from(scanned).unwrap_or(usize::MAX))
        );
    }
}

impl std::fmt::Debug for CountingProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingProgress")
            .field("hidden", &self.bar.is_hidden())
            .finish()
    }
}

fn counting_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(COUNTING_TEMPLATE)
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to parse progress template: {e}");
            ProgressStyle::default_spinner()
        })
}
