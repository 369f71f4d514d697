//! Plain-text rendering of the session screens.

use std::fmt::Write as _;

use client_core::{human_readable_bytes, transform_text_to_plain, Screen, Session};
use shared::domain::MAX_FILES;

const RULE: &str = "----------------------------------------";

pub fn render_screen(session: &Session) -> String {
    let mut out = String::new();
    match session.screen() {
        Screen::Upload(upload) => {
            let _ = writeln!(out, "{RULE}\nNew analysis\n{RULE}");
            if !upload.prior_sources.is_empty() {
                let _ = writeln!(out, "Previously processed:");
                for name in &upload.prior_sources {
                    let _ = writeln!(out, "  - {name}");
                }
            }
            let pending = upload.pending.files();
            let _ = writeln!(out, "Selected files ({}/{MAX_FILES}):", pending.len());
            if pending.is_empty() {
                let _ = writeln!(out, "  (none; use 'add <path>')");
            }
            for file in pending {
                let _ = writeln!(
                    out,
                    "  [{}] {} ({})",
                    file.id,
                    file.name,
                    human_readable_bytes(file.size_bytes)
                );
            }
        }
        Screen::Result(result) => {
            let _ = writeln!(out, "{RULE}\nGenerated draft\n{RULE}");
            if !result.sources.is_empty() {
                let _ = writeln!(out, "Based on: {}", result.sources.join(", "));
                let _ = writeln!(out, "{RULE}");
            }
            let _ = writeln!(out, "{}", transform_text_to_plain(&result.draft));
            let _ = writeln!(out, "{RULE}");
            let _ = writeln!(
                out,
                "Use 'adjust <instructions>' to revise, 'copy' or 'export' to keep it, 'new' to start over."
            );
        }
    }
    if session.is_busy() {
        let _ = writeln!(out, "(request in flight...)");
    }
    out
}

/// Error and warning lines, or an empty string when there are none.
pub fn render_notices(session: &Session) -> String {
    let mut out = String::new();
    if let Some(error) = session.error_message() {
        let _ = writeln!(out, "Error: {error}");
    }
    if !session.warnings().is_empty() {
        let _ = writeln!(out, "Warnings:");
        for warning in session.warnings() {
            let _ = writeln!(out, "  - {warning}");
        }
    }
    out
}
