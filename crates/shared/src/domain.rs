use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const MAX_FILES: usize = 5;
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(FileId);

/// A file offered to the intake, not yet accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    pub name: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub path: PathBuf,
}

impl FileCandidate {
    pub fn new(
        name: impl Into<String>,
        size_bytes: u64,
        media_type: Option<String>,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            media_type,
            path: path.into(),
        }
    }

    /// Declared media type or filename extension indicates PDF.
    pub fn is_pdf(&self) -> bool {
        self.media_type.as_deref() == Some(PDF_MEDIA_TYPE)
            || self.name.to_ascii_lowercase().ends_with(".pdf")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingFile {
    pub id: FileId,
    pub name: String,
    pub size_bytes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    pub path: PathBuf,
}

impl PendingFile {
    pub fn from_candidate(id: FileId, candidate: FileCandidate) -> Self {
        Self {
            id,
            name: candidate.name,
            size_bytes: candidate.size_bytes,
            media_type: candidate.media_type,
            path: candidate.path,
        }
    }
}
