//! Command orchestration helpers between the session reducer and the backend worker.

use client_core::{RequestKind, SessionEffect};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Maps a request-issuing effect to the backend command carrying it.
/// `ScrollToTop` stays in the view and yields `None`.
pub fn command_for_effect(effect: SessionEffect) -> Option<(RequestKind, BackendCommand)> {
    match effect {
        SessionEffect::ScrollToTop => None,
        SessionEffect::SubmitFiles(files) => {
            Some((RequestKind::Upload, BackendCommand::SubmitFiles { files }))
        }
        SessionEffect::RequestAdjustment {
            instructions,
            current_draft,
        } => Some((
            RequestKind::Adjustment,
            BackendCommand::RequestAdjustment {
                instructions,
                current_draft,
            },
        )),
    }
}

/// Queues `cmd` for the backend worker. On failure returns the message the
/// caller reports back into the session so the busy flag is released.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "backend command queue is full");
            Err("Command queue is full; please retry.".to_string())
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "backend command processor disconnected");
            Err(
                "Backend command processor disconnected (possible startup/runtime failure); restart the client."
                    .to_string(),
            )
        }
    }
}
