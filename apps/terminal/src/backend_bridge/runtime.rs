//! Backend worker: owns the tokio runtime and the gateway, answers every
//! command with exactly one UI event.

use std::{sync::Arc, thread};

use client_core::{DraftGateway, RequestKind};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    gateway: Arc<dyn DraftGateway>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let event = execute(gateway.as_ref(), cmd).await;
                if ui_tx.send(event).is_err() {
                    tracing::debug!("ui event channel closed; stopping backend worker");
                    break;
                }
            }
        });
    })
}

async fn execute(gateway: &dyn DraftGateway, cmd: BackendCommand) -> UiEvent {
    let cmd_name = cmd.name();
    tracing::debug!(command = cmd_name, "backend worker: executing command");
    match cmd {
        BackendCommand::SubmitFiles { files } => UiEvent::Responded {
            kind: RequestKind::Upload,
            response: gateway.submit_files(&files).await,
        },
        BackendCommand::RequestAdjustment {
            instructions,
            current_draft,
        } => UiEvent::Responded {
            kind: RequestKind::Adjustment,
            response: gateway
                .request_adjustment(&instructions, &current_draft)
                .await,
        },
        BackendCommand::CheckStatus => match gateway.service_status().await {
            Ok(status) if status.message.is_empty() => UiEvent::Info("Backend is online.".to_string()),
            Ok(status) => UiEvent::Info(format!("Backend is online: {}", status.message)),
            Err(err) => UiEvent::Error(UiError::from_message(
                UiErrorContext::Status,
                format!("backend status check failed: {err:#}"),
            )),
        },
    }
}
