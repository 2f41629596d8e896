//! Table row and cell model
//!
//! A document line is tabular if it contains at least one `|`. Cells are
//! produced by splitting on `|`, trimming each segment, and discarding empty
//! segments — leading/trailing pipes and padding must not produce phantom
//! empty cells that would shift cell indices.

// ─────────────────────────────────────────────────────────────────────────────
// Row Recognition
// ─────────────────────────────────────────────────────────────────────────────

/// Whether a line is recognized as a table row.
pub fn is_table_row(line: &str) -> bool {
    line.contains('|')
}

/// Whether a line is a table delimiter row (`| --- | :---: |`).
///
/// Delimiter rows are tabular but never contain checkbox tokens, so the
/// structural row index skips them.
pub fn is_delimiter_row(line: &str) -> bool {
    let cells = split_cells(line);
    !cells.is_empty()
        && cells
            .iter()
            .all(|cell| !cell.is_empty() && cell.chars().all(|c| c == '-' || c == ':'))
}

// ─────────────────────────────────────────────────────────────────────────────
// Cell Splitting and Rebuilding
// ─────────────────────────────────────────────────────────────────────────────

/// Split a table row into its cells.
///
/// Segments are trimmed and empty segments are dropped, so `| a | b |`
/// yields exactly `["a", "b"]` regardless of leading/trailing pipes or
/// padding.
pub fn split_cells(line: &str) -> Vec<&str> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Rebuild a table row from its cells in canonical pipe-joined form.
///
/// The result always carries leading and trailing pipes with one space of
/// padding: `["a", "b"]` becomes `| a | b |`. Rebuilding a row that was not
/// already in this form normalizes incidental whitespace around pipes; that
/// is the documented side effect of the rendered-mode repair path.
pub fn rebuild_row<S: AsRef<str>>(cells: &[S]) -> String {
    let mut row = String::from("|");
    for cell in cells {
        row.push(' ');
        row.push_str(cell.as_ref());
        row.push_str(" |");
    }
    row
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
