//! Getting the draft out of the client: clipboard, text export, HTML export.

use std::{
    fs,
    path::{Path, PathBuf},
};

use arboard::Clipboard;
use chrono::{DateTime, Local};
use client_core::{transform_text_to_html, transform_text_to_plain};

/// Clipboard handle opened on first copy and kept for the life of the app.
/// On X11 and Wayland the copied text is only served while it is alive.
#[derive(Default)]
pub struct DraftClipboard {
    inner: Option<Clipboard>,
}

impl DraftClipboard {
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    pub fn copy(&mut self, draft: &str) -> Result<(), String> {
        let mut clipboard = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => Clipboard::new().map_err(|err| err.to_string())?,
        };
        let copied = clipboard
            .set_text(transform_text_to_plain(draft))
            .map_err(|err| err.to_string());
        self.inner = Some(clipboard);
        copied
    }
}

/// `minuta-YYYYMMDD-HHMMSS.<extension>` in the working directory.
pub fn default_export_path(now: DateTime<Local>, extension: &str) -> PathBuf {
    PathBuf::from(format!("minuta-{}.{extension}", now.format("%Y%m%d-%H%M%S")))
}

pub fn html_document(draft: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Minuta</title>\n</head>\n<body>\n<div class=\"minuta\">{}</div>\n</body>\n</html>\n",
        transform_text_to_html(draft)
    )
}

pub fn export_plain(draft: &str, path: &Path) -> Result<(), String> {
    write_file(path, &transform_text_to_plain(draft))
}

pub fn export_html(draft: &str, path: &Path) -> Result<(), String> {
    write_file(path, &html_document(draft))
}

fn write_file(path: &Path, contents: &str) -> Result<(), String> {
    fs::write(path, contents)
        .map_err(|err| format!("failed to write '{}': {err}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "draft exported");
    Ok(())
}
