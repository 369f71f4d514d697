//! Pending file set for the upload screen: capacity, type and size rules.

use std::{fmt, fs, path::Path};

use shared::domain::{FileCandidate, FileId, PendingFile, MAX_FILES, MAX_FILE_SIZE_BYTES};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeWarning {
    TooManyFiles { ignored: usize },
    NotPdf { names: Vec<String> },
    TooLarge { name: String, size_bytes: u64 },
}

impl fmt::Display for IntakeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyFiles { ignored } => write!(
                f,
                "You can send at most {MAX_FILES} files in total. {ignored} file(s) were ignored."
            ),
            Self::NotPdf { names } => write!(
                f,
                "Only PDF files are allowed. Ignored: {}.",
                names.join(", ")
            ),
            Self::TooLarge { name, size_bytes } => write!(
                f,
                "File '{name}' ({:.1}MB) exceeds the {}MB limit.",
                *size_bytes as f64 / (1024.0 * 1024.0),
                MAX_FILE_SIZE_BYTES / (1024 * 1024)
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntakeOutcome {
    pub accepted: Vec<FileId>,
    pub warnings: Vec<IntakeWarning>,
}

impl IntakeOutcome {
    /// All warnings joined into one user-facing sentence block.
    pub fn warning_message(&self) -> Option<String> {
        if self.warnings.is_empty() {
            return None;
        }
        Some(
            self.warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFileSet {
    files: Vec<PendingFile>,
    next_id: u64,
}

impl Default for PendingFileSet {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            next_id: 1,
        }
    }
}

impl PendingFileSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[PendingFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn remaining_capacity(&self) -> usize {
        MAX_FILES.saturating_sub(self.files.len())
    }

    pub fn add_files(&mut self, candidates: impl IntoIterator<Item = FileCandidate>) -> IntakeOutcome {
        let capacity = self.remaining_capacity();
        let mut outcome = IntakeOutcome::default();
        let mut offered = 0usize;
        let mut rejected_type = Vec::new();

        for candidate in candidates {
            offered += 1;
            if offered > capacity {
                continue;
            }
            if !candidate.is_pdf() {
                rejected_type.push(candidate.name);
                continue;
            }
            if candidate.size_bytes > MAX_FILE_SIZE_BYTES {
                outcome.warnings.push(IntakeWarning::TooLarge {
                    name: candidate.name,
                    size_bytes: candidate.size_bytes,
                });
                continue;
            }

            let id = FileId(self.next_id);
            self.next_id += 1;
            self.files.push(PendingFile::from_candidate(id, candidate));
            outcome.accepted.push(id);
        }

        if !rejected_type.is_empty() {
            outcome.warnings.insert(
                0,
                IntakeWarning::NotPdf {
                    names: rejected_type,
                },
            );
        }
        if offered > capacity {
            outcome.warnings.push(IntakeWarning::TooManyFiles {
                ignored: offered - capacity,
            });
        }

        tracing::debug!(
            offered,
            accepted = outcome.accepted.len(),
            held = self.files.len(),
            "intake: files offered"
        );
        outcome
    }

    pub fn remove(&mut self, id: FileId) -> Option<PendingFile> {
        let index = self.files.iter().position(|file| file.id == id)?;
        Some(self.files.remove(index))
    }

    /// Removes every entry carrying `name`; duplicates collapse together.
    pub fn remove_named(&mut self, name: &str) -> usize {
        let before = self.files.len();
        self.files.retain(|file| file.name != name);
        before - self.files.len()
    }
}

/// Builds a candidate from a local file, guessing its media type from the
/// extension.
pub fn candidate_from_path(path: &Path) -> Result<FileCandidate, ClientError> {
    let metadata = fs::metadata(path).map_err(|source| ClientError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(ClientError::NotAFile(path.to_path_buf()));
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string());

    Ok(FileCandidate::new(name, metadata.len(), media_type, path))
}
