use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("unknown adjustment failure policy '{0}' (expected keep_last_draft or revert_to_upload)")]
    InvalidPolicy(String),
    #[error("invalid settings file '{}': {}", .path.display(), .reason)]
    SettingsFile { path: PathBuf, reason: String },
    #[error("failed to access '{}': {}", .path.display(), .source)]
    FileAccess {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),
    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
