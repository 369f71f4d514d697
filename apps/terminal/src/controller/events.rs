//! UI/backend events and error modeling for the terminal controller.

use client_core::RequestKind;
use shared::protocol::BackendResponse;

#[derive(Debug)]
pub enum UiEvent {
    Info(String),
    Responded {
        kind: RequestKind,
        response: BackendResponse,
    },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Io,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Status,
    Intake,
    Clipboard,
    Export,
    Command,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnected")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
            || message_lower.contains("usage")
            || message_lower.contains("unknown command")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("permission denied")
            || message_lower.contains("no such file")
            || message_lower.contains("failed to access")
            || message_lower.contains("not a regular file")
            || message_lower.contains("failed to write")
        {
            UiErrorCategory::Io
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-line label shown in front of the message.
    pub fn label(&self) -> &'static str {
        match (self.context, self.category) {
            (UiErrorContext::BackendStartup, _) => "Backend worker failure",
            (_, UiErrorCategory::Transport) => "Backend unreachable",
            (UiErrorContext::Clipboard, _) => "Clipboard error",
            (UiErrorContext::Export, _) => "Export failed",
            (UiErrorContext::Intake, _) => "Cannot add file",
            (UiErrorContext::Status, _) => "Status check failed",
            (UiErrorContext::Command, _) => "Invalid command",
        }
    }
}

impl std::fmt::Display for UiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.message)
    }
}
