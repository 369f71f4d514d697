//! Session controller: the upload/result screen state machine.
//!
//! A [`Session`] is a plain value. Every transition consumes it and returns
//! the next value together with the effects the caller must carry out
//! (dispatching a request, scrolling the view). Nothing here touches the
//! network, so the whole state machine is testable without a terminal or a
//! backend.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::{
    domain::{FileCandidate, FileId, PendingFile},
    protocol::{BackendResponse, DraftReply, FailureReply},
};
use tracing::debug;

use crate::{error::ClientError, intake::PendingFileSet};

pub const NO_FILES_MESSAGE: &str = "Please select at least one PDF file.";
pub const NO_INSTRUCTIONS_MESSAGE: &str = "Please provide instructions for the adjustment.";
pub const NOT_ON_UPLOAD_MESSAGE: &str =
    "Files can only be changed or submitted on the upload screen. Start a new analysis first.";
pub const NOT_ON_RESULT_MESSAGE: &str = "There is no draft to adjust yet.";

/// What happens to the displayed draft when an adjustment request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentFailurePolicy {
    /// Stay on the result screen with the last good draft and show the error.
    #[default]
    KeepLastDraft,
    /// Drop the draft and return to the upload screen.
    RevertToUpload,
}

impl AdjustmentFailurePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepLastDraft => "keep_last_draft",
            Self::RevertToUpload => "revert_to_upload",
        }
    }
}

impl fmt::Display for AdjustmentFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdjustmentFailurePolicy {
    type Err = ClientError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "keep_last_draft" | "keep" => Ok(Self::KeepLastDraft),
            "revert_to_upload" | "revert" => Ok(Self::RevertToUpload),
            _ => Err(ClientError::InvalidPolicy(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadScreen {
    pub pending: PendingFileSet,
    /// Files the backend had already processed when a failure sent the user
    /// back here. Kept visible for context only.
    pub prior_sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultScreen {
    pub draft: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Upload(UploadScreen),
    Result(ResultScreen),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Upload,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Upload,
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    ScrollToTop,
    SubmitFiles(Vec<PendingFile>),
    RequestAdjustment {
        instructions: String,
        current_draft: String,
    },
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    FilesOffered(Vec<FileCandidate>),
    FileRemoved(FileId),
    FilesRemovedByName(String),
    SubmitRequested,
    AdjustmentRequested(String),
    BackendResponded {
        kind: RequestKind,
        response: BackendResponse,
    },
    NewAnalysisRequested,
}

#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub effects: Vec<SessionEffect>,
}

impl Transition {
    fn stay(session: Session) -> Self {
        Self {
            session,
            effects: Vec::new(),
        }
    }

    fn with_effect(session: Session, effect: SessionEffect) -> Self {
        Self {
            session,
            effects: vec![effect],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    screen: Screen,
    busy: bool,
    error: Option<String>,
    warnings: Vec<String>,
    policy: AdjustmentFailurePolicy,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AdjustmentFailurePolicy::default())
    }
}

impl Session {
    pub fn new(policy: AdjustmentFailurePolicy) -> Self {
        Self {
            screen: Screen::Upload(UploadScreen::default()),
            busy: false,
            error: None,
            warnings: Vec::new(),
            policy,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn kind(&self) -> ScreenKind {
        match self.screen {
            Screen::Upload(_) => ScreenKind::Upload,
            Screen::Result(_) => ScreenKind::Result,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match &self.screen {
            Screen::Result(result) => Some(&result.draft),
            Screen::Upload(_) => None,
        }
    }

    /// Filenames to list alongside the current screen.
    pub fn source_filenames(&self) -> &[String] {
        match &self.screen {
            Screen::Result(result) => &result.sources,
            Screen::Upload(upload) => &upload.prior_sources,
        }
    }

    pub fn pending(&self) -> Option<&PendingFileSet> {
        match &self.screen {
            Screen::Upload(upload) => Some(&upload.pending),
            Screen::Result(_) => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn policy(&self) -> AdjustmentFailurePolicy {
        self.policy
    }

    pub fn apply(self, event: SessionEvent) -> Transition {
        match event {
            SessionEvent::FilesOffered(candidates) => self.offer_files(candidates),
            SessionEvent::FileRemoved(id) => self.remove_file(id),
            SessionEvent::FilesRemovedByName(name) => self.remove_files_named(&name),
            SessionEvent::SubmitRequested => self.request_submit(),
            SessionEvent::AdjustmentRequested(instructions) => {
                self.request_adjustment(&instructions)
            }
            SessionEvent::BackendResponded {
                kind: RequestKind::Upload,
                response,
            } => self.handle_backend_response(response),
            SessionEvent::BackendResponded {
                kind: RequestKind::Adjustment,
                response,
            } => self.handle_adjustment_response(response),
            SessionEvent::NewAnalysisRequested => self.start_new_analysis(),
        }
    }

    /// Applies a backend reply. Failures always land on the upload screen.
    pub fn handle_backend_response(mut self, response: BackendResponse) -> Transition {
        self.busy = false;
        match response {
            BackendResponse::Success(reply) => self.show_result(reply),
            BackendResponse::Failure(failure) => {
                debug!(code = ?failure.code, "session: request failed, showing upload screen");
                self.error = Some(failure.display_message());
                self.warnings = failure.warnings;
                self.screen = match self.screen {
                    Screen::Result(result) => Screen::Upload(UploadScreen {
                        pending: PendingFileSet::default(),
                        prior_sources: result.sources,
                    }),
                    upload @ Screen::Upload(_) => upload,
                };
                Transition::stay(self)
            }
        }
    }

    /// Applies the reply to an adjustment request, honoring the configured
    /// [`AdjustmentFailurePolicy`].
    pub fn handle_adjustment_response(mut self, response: BackendResponse) -> Transition {
        let keep_draft = self.policy == AdjustmentFailurePolicy::KeepLastDraft
            && matches!(self.screen, Screen::Result(_));
        match response {
            BackendResponse::Failure(failure) if keep_draft => {
                self.busy = false;
                self.keep_result_with_error(failure);
                Transition::stay(self)
            }
            response => self.handle_backend_response(response),
        }
    }

    pub fn start_new_analysis(self) -> Transition {
        debug!("session: starting new analysis");
        Transition::stay(Session::new(self.policy))
    }

    pub fn offer_files(mut self, candidates: Vec<FileCandidate>) -> Transition {
        let Screen::Upload(upload) = &mut self.screen else {
            self.error = Some(NOT_ON_UPLOAD_MESSAGE.to_string());
            return Transition::stay(self);
        };

        let outcome = upload.pending.add_files(candidates);
        if let Some(message) = outcome.warning_message() {
            self.error = Some(message);
        }
        Transition::stay(self)
    }

    pub fn remove_file(mut self, id: FileId) -> Transition {
        if let Screen::Upload(upload) = &mut self.screen {
            upload.pending.remove(id);
        }
        Transition::stay(self)
    }

    pub fn remove_files_named(mut self, name: &str) -> Transition {
        if let Screen::Upload(upload) = &mut self.screen {
            upload.pending.remove_named(name);
        }
        Transition::stay(self)
    }

    pub fn request_submit(mut self) -> Transition {
        if self.busy {
            debug!("session: submit ignored while a request is in flight");
            return Transition::stay(self);
        }

        let files = match &self.screen {
            Screen::Upload(upload) if !upload.pending.is_empty() => {
                upload.pending.files().to_vec()
            }
            Screen::Upload(_) => {
                self.error = Some(NO_FILES_MESSAGE.to_string());
                return Transition::stay(self);
            }
            Screen::Result(_) => {
                self.error = Some(NOT_ON_UPLOAD_MESSAGE.to_string());
                return Transition::stay(self);
            }
        };

        self.busy = true;
        self.error = None;
        Transition::with_effect(self, SessionEffect::SubmitFiles(files))
    }

    pub fn request_adjustment(mut self, instructions: &str) -> Transition {
        if self.busy {
            debug!("session: adjustment ignored while a request is in flight");
            return Transition::stay(self);
        }

        let current_draft = match &self.screen {
            Screen::Result(result) => result.draft.clone(),
            Screen::Upload(_) => {
                self.error = Some(NOT_ON_RESULT_MESSAGE.to_string());
                return Transition::stay(self);
            }
        };
        if instructions.trim().is_empty() {
            self.error = Some(NO_INSTRUCTIONS_MESSAGE.to_string());
            return Transition::stay(self);
        }

        self.busy = true;
        self.error = None;
        self.warnings.clear();
        Transition::with_effect(
            self,
            SessionEffect::RequestAdjustment {
                instructions: instructions.to_string(),
                current_draft,
            },
        )
    }

    fn show_result(mut self, reply: DraftReply) -> Transition {
        debug!(
            sources = reply.source_filenames.len(),
            warnings = reply.warnings.len(),
            "session: showing result"
        );
        self.screen = Screen::Result(ResultScreen {
            draft: reply.draft,
            sources: reply.source_filenames,
        });
        self.error = None;
        self.warnings = reply.warnings;
        Transition::with_effect(self, SessionEffect::ScrollToTop)
    }

    fn keep_result_with_error(&mut self, failure: FailureReply) {
        debug!(code = ?failure.code, "session: adjustment failed, keeping last draft");
        self.error = Some(failure.display_message());
        if let (Screen::Result(result), Some(preserved)) =
            (&mut self.screen, failure.preserved_draft)
        {
            result.draft = preserved;
        }
        self.warnings = failure.warnings;
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
