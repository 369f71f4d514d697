//! HTTP exchange with the draft-generation backend.
//!
//! Every outcome, including local validation and transport failures, comes
//! back as a [`BackendResponse`]; callers never see a `reqwest` error.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use shared::{
    domain::{PendingFile, PDF_MEDIA_TYPE},
    error::{ApiException, ErrorCode},
    protocol::{
        BackendAction, BackendResponse, DraftReplyWire, FailureReply, ServiceStatus,
        ACTION_FIELD, FILES_FIELD, INSTRUCTIONS_FIELD,
    },
};
use tracing::{info, warn};

use crate::{
    error::ClientError,
    session::{NO_FILES_MESSAGE, NO_INSTRUCTIONS_MESSAGE},
};

pub const UPLOAD_CONNECTIVITY_MESSAGE: &str =
    "Failed to connect to the server or generate the draft.";
pub const ADJUST_CONNECTIVITY_MESSAGE: &str =
    "Failed to connect to the server or adjust the draft.";
pub const UNREADABLE_REPLY_MESSAGE: &str = "The server returned a reply that could not be read.";

#[async_trait]
pub trait DraftGateway: Send + Sync {
    async fn submit_files(&self, files: &[PendingFile]) -> BackendResponse;
    async fn request_adjustment(&self, instructions: &str, current_draft: &str)
        -> BackendResponse;
    async fn service_status(&self) -> Result<ServiceStatus>;
}

pub struct HttpDraftGateway {
    http: Client,
    endpoint: String,
}

impl HttpDraftGateway {
    /// `api_base_url` is expected to be normalized (no trailing slash).
    pub fn new(api_base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            endpoint: format!("{}/", api_base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn upload_form(files: &[PendingFile]) -> Result<Form, ApiException> {
        let mut form = Form::new();
        for file in files {
            let bytes = tokio::fs::read(&file.path).await.map_err(|err| {
                ApiException::validation(format!("Could not read file '{}': {err}", file.name))
            })?;
            let part = Part::bytes(bytes)
                .file_name(file.name.clone())
                .mime_str(PDF_MEDIA_TYPE)
                .map_err(|err| ApiException::validation(err.to_string()))?;
            form = form.part(FILES_FIELD, part);
        }
        Ok(form.text(ACTION_FIELD, BackendAction::UploadPdfs.as_str()))
    }

    async fn exchange(
        &self,
        request: RequestBuilder,
        action: BackendAction,
        connectivity_message: &str,
    ) -> BackendResponse {
        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(action = action.as_str(), "backend: request did not complete: {err}");
                return BackendResponse::Failure(FailureReply::new(
                    ErrorCode::Transport,
                    connectivity_message,
                ));
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                warn!(
                    action = action.as_str(),
                    status = status.as_u16(),
                    "backend: failed to read reply body: {err}"
                );
                return BackendResponse::Failure(FailureReply::new(
                    ErrorCode::Transport,
                    connectivity_message,
                ));
            }
        };
        let wire = serde_json::from_slice::<DraftReplyWire>(&body).ok();

        if !status.is_success() {
            let wire = wire.unwrap_or_default();
            let error = wire.failure_message();
            warn!(
                action = action.as_str(),
                status = status.as_u16(),
                structured = error.is_some(),
                "backend: request rejected"
            );
            return BackendResponse::Failure(FailureReply {
                code: if error.is_some() {
                    ErrorCode::Application
                } else {
                    ErrorCode::Transport
                },
                error: Some(error.unwrap_or_else(|| connectivity_message.to_string())),
                warnings: wire.warnings.unwrap_or_default(),
                preserved_draft: None,
            });
        }

        let Some(wire) = wire else {
            warn!(
                action = action.as_str(),
                status = status.as_u16(),
                "backend: reply is not a json object"
            );
            return BackendResponse::Failure(FailureReply::new(
                ErrorCode::Application,
                UNREADABLE_REPLY_MESSAGE,
            ));
        };

        let response = BackendResponse::from(wire);
        info!(
            action = action.as_str(),
            status = status.as_u16(),
            success = response.is_success(),
            "backend: reply received"
        );
        response
    }
}

#[async_trait]
impl DraftGateway for HttpDraftGateway {
    async fn submit_files(&self, files: &[PendingFile]) -> BackendResponse {
        if files.is_empty() {
            return BackendResponse::validation(NO_FILES_MESSAGE);
        }

        let form = match Self::upload_form(files).await {
            Ok(form) => form,
            Err(err) => return BackendResponse::Failure(err.into()),
        };
        info!(
            action = BackendAction::UploadPdfs.as_str(),
            file_count = files.len(),
            endpoint = %self.endpoint,
            "backend: submitting files"
        );

        let request = self.http.post(&self.endpoint).multipart(form);
        self.exchange(request, BackendAction::UploadPdfs, UPLOAD_CONNECTIVITY_MESSAGE)
            .await
    }

    async fn request_adjustment(
        &self,
        instructions: &str,
        current_draft: &str,
    ) -> BackendResponse {
        if instructions.trim().is_empty() {
            return BackendResponse::validation(NO_INSTRUCTIONS_MESSAGE);
        }

        info!(
            action = BackendAction::AjustarMinuta.as_str(),
            instructions_len = instructions.len(),
            endpoint = %self.endpoint,
            "backend: requesting adjustment"
        );
        let request = self.http.post(&self.endpoint).form(&[
            (ACTION_FIELD, BackendAction::AjustarMinuta.as_str()),
            (INSTRUCTIONS_FIELD, instructions),
        ]);
        self.exchange(
            request,
            BackendAction::AjustarMinuta,
            ADJUST_CONNECTIVITY_MESSAGE,
        )
        .await
        .with_preserved_draft(current_draft)
    }

    async fn service_status(&self) -> Result<ServiceStatus> {
        let status = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.endpoint))?
            .error_for_status()?
            .json::<ServiceStatus>()
            .await
            .context("service status reply is not valid json")?;
        Ok(status)
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
