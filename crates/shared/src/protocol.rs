use serde::{Deserialize, Serialize};

use crate::error::{ApiException, ErrorCode};

pub const ACTION_FIELD: &str = "action";
pub const FILES_FIELD: &str = "pdfs";
pub const INSTRUCTIONS_FIELD: &str = "instrucoes_ajuste";

pub const UNKNOWN_FAILURE_MESSAGE: &str =
    "An unknown error occurred while processing the request.";
pub const MISSING_DRAFT_MESSAGE: &str = "The server reply did not contain a draft.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendAction {
    UploadPdfs,
    AjustarMinuta,
}

impl BackendAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UploadPdfs => "upload_pdfs",
            Self::AjustarMinuta => "ajustar_minuta",
        }
    }
}

/// JSON body the backend answers with, on success and on failure alike.
/// Every field is optional and `null` is accepted wherever a value may appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReplyWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(default, rename = "minutaGerada", skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(
        default,
        rename = "filenamesProcessados",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_filenames: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warnings: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DraftReplyWire {
    /// `error` when present and non-blank, else `message`.
    pub fn failure_message(&self) -> Option<String> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .find(|text| !text.trim().is_empty())
            .map(str::to_string)
    }
}

/// Body of `GET /` while the backend is online.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftReply {
    pub draft: String,
    pub source_filenames: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReply {
    pub code: ErrorCode,
    pub error: Option<String>,
    pub warnings: Vec<String>,
    /// Draft that was on screen when an adjustment failed in transit.
    pub preserved_draft: Option<String>,
}

impl FailureReply {
    pub fn new(code: ErrorCode, error: impl Into<String>) -> Self {
        Self {
            code,
            error: Some(error.into()),
            warnings: Vec::new(),
            preserved_draft: None,
        }
    }

    /// Error text to show, falling back to a generic message when the reply
    /// carried none.
    pub fn display_message(&self) -> String {
        match self.error.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => UNKNOWN_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl From<ApiException> for FailureReply {
    fn from(value: ApiException) -> Self {
        Self::new(value.code, value.message)
    }
}

/// Normalized outcome of one backend exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendResponse {
    Success(DraftReply),
    Failure(FailureReply),
}

impl BackendResponse {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Failure(FailureReply::new(ErrorCode::Validation, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure(&self) -> Option<&FailureReply> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Attaches the draft that was displayed before a failed adjustment.
    pub fn with_preserved_draft(self, draft: impl Into<String>) -> Self {
        match self {
            Self::Failure(mut failure) => {
                failure.preserved_draft = Some(draft.into());
                Self::Failure(failure)
            }
            success => success,
        }
    }
}

impl From<DraftReplyWire> for BackendResponse {
    fn from(wire: DraftReplyWire) -> Self {
        if wire.success != Some(true) {
            return Self::Failure(FailureReply {
                code: ErrorCode::Application,
                error: wire.failure_message(),
                warnings: wire.warnings.unwrap_or_default(),
                preserved_draft: None,
            });
        }

        match wire.draft {
            Some(draft) if !draft.is_empty() => Self::Success(DraftReply {
                draft,
                source_filenames: wire.source_filenames.unwrap_or_default(),
                warnings: wire.warnings.unwrap_or_default(),
            }),
            _ => Self::Failure(FailureReply {
                code: ErrorCode::Application,
                error: Some(MISSING_DRAFT_MESSAGE.to_string()),
                warnings: wire.warnings.unwrap_or_default(),
                preserved_draft: None,
            }),
        }
    }
}
