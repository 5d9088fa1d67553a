//! Number formatting for human-facing messages.

/// Format a count with comma thousand separators, e.g. `48,234`.
///
/// Only used for log and progress messages; the report itself prints raw
/// integers so its output stays easy to parse.
pub fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));

    for (i, c) in digits.chars().enumerate() {
        if i != 0 && i % 3 == lead {
            out.push(',');
        }
        out.push(c);
    }

    out
}
