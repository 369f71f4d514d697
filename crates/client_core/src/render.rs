//! Draft text to displayable markup.
//!
//! The whole text is escaped before `**bold**` spans are converted, so nothing
//! inside a draft can open a tag of its own.

use std::sync::LazyLock;

use regex::Regex;

static BOLD_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold span pattern is valid"));

pub const LINE_BREAK: &str = "<br />";

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn transform_text_to_html(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let escaped = escape_html(&normalize_line_endings(text));
    let emphasized = BOLD_SPAN.replace_all(&escaped, "<strong>$1</strong>");
    emphasized.replace('\n', LINE_BREAK)
}

/// Text a reader would copy out of the rendered draft: bold delimiters
/// dropped, line endings normalized.
pub fn transform_text_to_plain(text: &str) -> String {
    let normalized = normalize_line_endings(text);
    BOLD_SPAN.replace_all(&normalized, "$1").into_owned()
}

pub fn human_readable_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        return format!("{bytes} B");
    }
    if bytes < MB {
        return format_scaled_unit(bytes, KB, "KB");
    }
    if bytes < GB {
        return format_scaled_unit(bytes, MB, "MB");
    }
    format_scaled_unit(bytes, GB, "GB")
}

fn format_scaled_unit(bytes: u64, unit_size: u64, unit_label: &str) -> String {
    let value = bytes as f64 / unit_size as f64;
    let value_text = format!("{value:.1}");
    let compact_value = value_text.strip_suffix(".0").unwrap_or(&value_text);
    format!("{compact_value} {unit_label}")
}
