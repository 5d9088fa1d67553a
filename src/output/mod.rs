// Copyright (c) 2025-2026 the tokbudget contributors
// SPDX-License-Identifier: Apache-2.0

//! Plain-text rendering of a [`TokenReport`].
//!
//! ```text
//!       10  src/a.py
//!        5  src/b.md
//! ========================================
//! Total tokens (gpt-4o): 15
//! ```

use crate::counter::TokenReport;
use std::io::{self, Write};

/// Width of the right-aligned token column.
pub const COUNT_WIDTH: usize = 8;

/// Length of the line separating the listing from the total.
pub const SEPARATOR_WIDTH: usize = 40;

/// Write the per-file listing, separator and total to `out`.
pub fn write_report<W: Write + ?Sized>(out: &mut W, report: &TokenReport) -> io::Result<()> {
    for record in &report.records {
        writeln!(
            out,
            "{:>width$}  {}",
            record.tokens,
            record.path.display(),
            width = COUNT_WIDTH
        )?;
    }
    writeln!(out, "{}", "=".repeat(SEPARATOR_WIDTH))?;
    writeln!(out, "Total tokens ({}): {}", report.model, report.total)?;
    out.flush()
}

/// Render the report into a string.
pub fn render_report(report: &TokenReport) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_report(&mut buf, report);
    String::from_utf8_lossy(&buf).into_owned()
}
