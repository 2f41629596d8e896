//! Host editor capabilities as traits
//!
//! The live locator runs inside a host editor it does not own. It needs
//! exactly three capabilities: read the buffer (text, visible ranges,
//! cursor), mutate a byte range atomically, and ask the host's syntax tree
//! which sub-ranges are table rows. Each is a trait here so the locator is
//! testable without a live host; `MemoryBuffer` and `LineStructure` are the
//! in-process implementations used by tests and the demo binary.

// ─────────────────────────────────────────────────────────────────────────────
// Spans
// ─────────────────────────────────────────────────────────────────────────────

/// A half-open byte range `[from, to)` in buffer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: usize,
    pub to: usize,
}

impl Span {
    pub fn new(from: usize, to: usize) -> Self {
        Span { from, to }
    }

    /// Whether this span intersects `[from, to)`.
    pub fn intersects(&self, from: usize, to: usize) -> bool {
        self.from < to && from < self.to
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Buffer Capability
// ─────────────────────────────────────────────────────────────────────────────

/// A position-addressable, observable text buffer.
///
/// The host notifies the locator of document and viewport changes out of
/// band; on each notification the locator recomputes its control set from
/// the state these methods expose.
pub trait TextBuffer {
    /// The full current text of the buffer.
    fn text(&self) -> &str;

    /// The currently visible byte ranges of the buffer.
    fn visible_ranges(&self) -> Vec<Span>;

    /// The current cursor position as a byte offset, if any.
    fn cursor(&self) -> Option<usize>;

    /// Atomically replace the byte range `[start, end)` with `text`.
    fn replace_range(&mut self, start: usize, end: usize, text: &str);
}

/// Structural query over the host's syntax tree.
///
/// The locator only ever asks one question: which table-row spans exist
/// within a byte range.
pub trait StructureQuery {
    /// Table-row spans intersecting `[from, to)`, in document order.
    fn table_row_spans(&self, from: usize, to: usize) -> Vec<Span>;
}

// ─────────────────────────────────────────────────────────────────────────────
// In-Memory Buffer
// ─────────────────────────────────────────────────────────────────────────────

/// An owned in-memory `TextBuffer`.
///
/// Defaults to the whole text being visible and no cursor, so simple tests
/// only set what they care about.
#[derive(Debug, Clone)]
pub struct MemoryBuffer {
    text: String,
    visible: Option<Vec<Span>>,
    cursor: Option<usize>,
}

impl MemoryBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        MemoryBuffer {
            text: text.into(),
            visible: None,
            cursor: None,
        }
    }

    /// Restrict visibility to the given ranges (the default is the whole text).
    pub fn with_visible(mut self, ranges: Vec<Span>) -> Self {
        self.visible = Some(ranges);
        self
    }

    /// Place the cursor at a byte offset.
    pub fn with_cursor(mut self, offset: usize) -> Self {
        self.cursor = Some(offset);
        self
    }

    pub fn set_cursor(&mut self, offset: Option<usize>) {
        self.cursor = offset;
    }
}

impl TextBuffer for MemoryBuffer {
    fn text(&self) -> &str {
        &self.text
    }

    fn visible_ranges(&self) -> Vec<Span> {
        match &self.visible {
            Some(ranges) => ranges.clone(),
            None => vec![Span::new(0, self.text.len())],
        }
    }

    fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        self.text.replace_range(start..end, text);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line-Based Structure Query
// ─────────────────────────────────────────────────────────────────────────────

/// A `StructureQuery` that treats every pipe-bearing line as a table row,
/// excluding header delimiter rows.
///
/// Hosts back this with a real syntax tree; for tests and the demo a line
/// scan over the same text is structurally equivalent.
#[derive(Debug)]
pub struct LineStructure {
    rows: Vec<Span>,
}

impl LineStructure {
    /// Index the table-row spans of `text`. Spans cover the line content
    /// without the trailing newline.
    pub fn new(text: &str) -> Self {
        let mut rows = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            if crate::markdown::is_table_row(line) && !crate::markdown::is_delimiter_row(line) {
                rows.push(Span::new(offset, offset + line.len()));
            }
            offset += line.len() + 1;
        }
        LineStructure { rows }
    }
}

impl StructureQuery for LineStructure {
    fn table_row_spans(&self, from: usize, to: usize) -> Vec<Span> {
        self.rows
            .iter()
            .filter(|span| span.intersects(from, to))
            .copied()
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // MemoryBuffer Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_memory_buffer_defaults() {
        let buffer = MemoryBuffer::new("hello");
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.visible_ranges(), vec![Span::new(0, 5)]);
        assert_eq!(buffer.cursor(), None);
    }

    #[test]
    fn test_memory_buffer_replace_range() {
        let mut buffer = MemoryBuffer::new("[ ] task");
        buffer.replace_range(1, 2, "x");
        assert_eq!(buffer.text(), "[x] task");
    }

    #[test]
    fn test_memory_buffer_visible_override() {
        let buffer = MemoryBuffer::new("0123456789").with_visible(vec![Span::new(2, 5)]);
        assert_eq!(buffer.visible_ranges(), vec![Span::new(2, 5)]);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Span Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_span_intersects() {
        let span = Span::new(5, 10);
        assert!(span.intersects(0, 6));
        assert!(span.intersects(9, 20));
        assert!(span.intersects(6, 8));
        assert!(!span.intersects(10, 20)); // Touching is not intersecting
        assert!(!span.intersects(0, 5));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // LineStructure Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_line_structure_finds_table_rows() {
        let text = "# Title\n| a | b |\nplain\n| c | d |";
        let structure = LineStructure::new(text);
        let rows = structure.table_row_spans(0, text.len());
        assert_eq!(rows.len(), 2);
        assert_eq!(&text[rows[0].from..rows[0].to], "| a | b |");
        assert_eq!(&text[rows[1].from..rows[1].to], "| c | d |");
    }

    #[test]
    fn test_line_structure_respects_query_range() {
        let text = "| a |\nplain\n| b |";
        let structure = LineStructure::new(text);
        // Query only the first line
        let rows = structure.table_row_spans(0, 5);
        assert_eq!(rows.len(), 1);
        assert_eq!(&text[rows[0].from..rows[0].to], "| a |");
    }

    #[test]
    fn test_line_structure_skips_delimiter_rows() {
        let text = "| a | b |\n|---|---|\n| c | d |";
        let structure = LineStructure::new(text);
        let rows = structure.table_row_spans(0, text.len());
        assert_eq!(rows.len(), 2);
        assert_eq!(&text[rows[0].from..rows[0].to], "| a | b |");
        assert_eq!(&text[rows[1].from..rows[1].to], "| c | d |");
    }

    #[test]
    fn test_line_structure_no_rows() {
        let structure = LineStructure::new("just\nplain\ntext");
        assert!(structure.table_row_spans(0, 100).is_empty());
    }
}
