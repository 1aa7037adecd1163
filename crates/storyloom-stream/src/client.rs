//! HTTP client for the generation backend
//!
//! Owns the reqwest client and endpoint configuration; issues streaming
//! sessions and the sibling single-shot completion call.

use std::time::Duration;

use futures::{StreamExt, TryStreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use url::Url;

use crate::cancellation::CancelHandle;
use crate::error::StreamError;
use crate::handler::StreamHandler;
use crate::session::StreamSession;

/// Configuration for a [`GenerationClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the generation backend.
    pub base_url: Url,
    /// Timeout applied to the non-streaming completion call. Streaming
    /// sessions carry no timeout; callers compose one by racing the
    /// cancel handle against a delay.
    pub completion_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            completion_timeout: Duration::from_secs(120),
        }
    }
}

/// Request for one streaming session: where to send it and what to send.
/// The payload is opaque to the pipeline.
#[derive(Debug, Clone)]
pub struct StreamRequest {
    /// Endpoint path, resolved against the client's base URL.
    pub path: String,
    /// JSON request body, forwarded verbatim.
    pub payload: Value,
}

impl StreamRequest {
    pub fn new(path: impl Into<String>, payload: Value) -> Self {
        Self {
            path: path.into(),
            payload,
        }
    }
}

/// Critique-and-refine envelope returned by the single-shot completion
/// call. The streaming pipeline's `end` event corresponds to the point at
/// which `final_response` has been fully emitted chunk by chunk.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionEnvelope {
    pub original_response: String,
    pub critique_response: String,
    pub problems_detected: bool,
    pub final_response: String,
    pub refined_response: String,
}

/// Client for the text-generation backend.
pub struct GenerationClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl GenerationClient {
    pub fn new(config: ClientConfig) -> Result<Self, StreamError> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, config })
    }

    /// Open a streaming session.
    ///
    /// Returns immediately with the cancel handle; the session runs as its
    /// own task and reports through `handler`. Each call owns its own
    /// handle, so starting a new session never orphans an earlier one.
    pub fn start_stream<H>(&self, request: StreamRequest, handler: H) -> CancelHandle
    where
        H: StreamHandler + 'static,
    {
        let handle = CancelHandle::new();
        let token = handle.token();
        let http = self.http.clone();
        let base_url = self.config.base_url.clone();

        tokio::spawn(async move {
            let connect = async move {
                let url = base_url.join(&request.path)?;
                info!(%url, "opening generation stream");
                let response = http.post(url).json(&request.payload).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(StreamError::Status { status });
                }
                Ok(response
                    .bytes_stream()
                    .map_err(StreamError::from)
                    .boxed())
            };
            StreamSession::new(handler, token).run(connect).await;
        });

        handle
    }

    /// Single-shot completion call: one request, one critique-and-refine
    /// envelope. Shares the streaming call's transport-error taxonomy.
    pub async fn invoke(&self, path: &str, payload: &Value) -> Result<CompletionEnvelope, StreamError> {
        let url = self.config.base_url.join(path)?;
        info!(%url, "issuing completion request");
        let response = self
            .http
            .post(url)
            .json(payload)
            .timeout(self.config.completion_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::Status { status });
        }
        Ok(response.json().await?)
    }
}
