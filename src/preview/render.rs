//! Rendered-text locator
//!
//! This module generates the static HTML render of a document with comrak
//! and then rewrites every table cell that carries checkbox tokens: each
//! token becomes an interactive `<input type="checkbox">` control with its
//! context fingerprint serialized into a `data-tickcell` attribute. The
//! render tree offers no mapping back to source offsets, so the fingerprint
//! is the only identity a control has; the click side re-derives everything
//! from it (see `relocate`).

use comrak::{markdown_to_html, Options};
use log::warn;
use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::markdown::{scan_tokens, CheckboxToken, TokenMatch};
use crate::preview::fingerprint::Fingerprint;
use crate::string_utils::byte_index_to_char_index;

/// CSS class carried by every instrumented checkbox control.
pub const CONTROL_CLASS: &str = "tickcell-checkbox";

/// Attribute holding the serialized fingerprint payload.
pub const PAYLOAD_ATTR: &str = "data-tickcell";

static ROW_RE: OnceLock<Regex> = OnceLock::new();
static CELL_RE: OnceLock<Regex> = OnceLock::new();
static TAG_RE: OnceLock<Regex> = OnceLock::new();

fn row_regex() -> &'static Regex {
    ROW_RE.get_or_init(|| Regex::new(r"(?s)<tr[^>]*>.*?</tr>").expect("row pattern is valid"))
}

fn cell_regex() -> &'static Regex {
    CELL_RE.get_or_init(|| {
        Regex::new(r"(?s)<t([dh])((?:\s[^>]*)?)>(.*?)</t[dh]>").expect("cell pattern is valid")
    })
}

fn tag_regex() -> &'static Regex {
    TAG_RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Render markdown to HTML with the GFM extensions tables depend on.
pub fn render_document(markdown: &str) -> String {
    let mut options = Options::default();

    // Enable common extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.header_ids = Some(String::new());

    // Render options
    options.render.unsafe_ = true; // Allow raw HTML

    markdown_to_html(markdown, &options)
}

/// Render markdown and instrument all table-cell checkboxes in one pass.
pub fn render_instrumented(markdown: &str) -> String {
    instrument_tables(&render_document(markdown))
}

// ─────────────────────────────────────────────────────────────────────────────
// Table Instrumentation
// ─────────────────────────────────────────────────────────────────────────────

/// Rewrite every table cell of `html` so checkbox tokens become controls.
///
/// Only `<td>`/`<th>` content is touched; checkbox-shaped text anywhere else
/// in the render (paragraphs, list items) is left alone. All surrounding
/// cell markup is preserved unchanged.
pub fn instrument_tables(html: &str) -> String {
    row_regex()
        .replace_all(html, |caps: &Captures| {
            instrument_row(caps.get(0).map(|m| m.as_str()).unwrap_or_default())
        })
        .into_owned()
}

/// Rewrite one `<tr>...</tr>` block.
fn instrument_row(row_html: &str) -> String {
    // The fingerprint's row text is the concatenated text of every cell,
    // joined like a source row so it tokenizes the same way a document
    // line does.
    let cell_texts: Vec<String> = cell_regex()
        .captures_iter(row_html)
        .map(|caps| cell_text(caps.get(3).map(|m| m.as_str()).unwrap_or_default()))
        .collect();
    let row_text = cell_texts.join(" | ");

    if !row_text.contains('[') {
        return row_html.to_string();
    }

    // Cell indices count only non-empty cells, mirroring how the source
    // line splits (empty pipe segments are dropped there too).
    let mut cell_number = 0usize;
    cell_regex()
        .replace_all(row_html, |caps: &Captures| {
            let tag = &caps[1];
            let attrs = &caps[2];
            let inner = caps.get(3).map(|m| m.as_str()).unwrap_or_default();

            let text = cell_text(inner);
            if text.trim().is_empty() {
                return caps[0].to_string();
            }
            let cell_index = cell_number;
            cell_number += 1;

            match instrument_cell(inner, &text, &row_text, cell_index) {
                Some(instrumented) => format!("<t{}{}>{}</t{}>", tag, attrs, instrumented, tag),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Replace each checkbox token in one cell's inner markup with a control.
///
/// Token positions are found twice: in the raw markup (where the control is
/// spliced in) and in the tag-stripped text (where the fingerprint's
/// character offset lives). The two scans must agree on the token sequence;
/// if markup hides or fabricates tokens the cell is left untouched.
fn instrument_cell(
    inner_html: &str,
    text: &str,
    row_text: &str,
    cell_index: usize,
) -> Option<String> {
    let text_matches: Vec<TokenMatch> = scan_tokens(text).collect();
    if text_matches.is_empty() {
        return None;
    }

    let html_matches: Vec<TokenMatch> = scan_tokens(inner_html).collect();
    if html_matches.len() != text_matches.len() {
        warn!(
            "skipping cell: {} token(s) in markup vs {} in text",
            html_matches.len(),
            text_matches.len()
        );
        return None;
    }

    let mut out = String::with_capacity(inner_html.len());
    let mut last_end = 0;
    for (html_match, text_match) in html_matches.iter().zip(&text_matches) {
        out.push_str(&inner_html[last_end..html_match.start]);

        let offset = byte_index_to_char_index(text, text_match.start);
        let fingerprint = Fingerprint::new(row_text, cell_index, offset, text_match.token);
        match fingerprint.to_json() {
            Ok(json) => out.push_str(&control_markup(text_match.token, &json)),
            Err(err) => {
                // Leave the literal token in place rather than lose it
                warn!("failed to serialize fingerprint: {}", err);
                out.push_str(&inner_html[html_match.start..html_match.end]);
            }
        }
        last_end = html_match.end;
    }
    out.push_str(&inner_html[last_end..]);
    Some(out)
}

/// The markup of one interactive control.
fn control_markup(token: CheckboxToken, payload_json: &str) -> String {
    format!(
        "<input type=\"checkbox\" class=\"{}\" {}=\"{}\"{} />",
        CONTROL_CLASS,
        PAYLOAD_ATTR,
        attr_escape(payload_json),
        if token.checked() { " checked" } else { "" },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Extraction and Escaping
// ─────────────────────────────────────────────────────────────────────────────

/// The visible text of a cell: tags stripped, entities decoded.
fn cell_text(inner_html: &str) -> String {
    decode_entities(&tag_regex().replace_all(inner_html, ""))
}

/// Escape text for embedding in a double-quoted HTML attribute.
fn attr_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decode the entities comrak emits for text content.
///
/// `&amp;` is decoded last so `&amp;lt;` round-trips correctly.
pub fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
