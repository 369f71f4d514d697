//! Backend commands queued from the terminal UI to the backend worker.

use shared::domain::PendingFile;

#[derive(Debug, Clone)]
pub enum BackendCommand {
    SubmitFiles {
        files: Vec<PendingFile>,
    },
    RequestAdjustment {
        instructions: String,
        current_draft: String,
    },
    CheckStatus,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubmitFiles { .. } => "submit_files",
            Self::RequestAdjustment { .. } => "request_adjustment",
            Self::CheckStatus => "check_status",
        }
    }
}
