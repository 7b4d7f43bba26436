use std::{sync::Arc, time::Duration};

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use actuator_core::Dispatcher;
use actuator_model::WebhookPayload;

use crate::error::ApiError;

/// One webhook endpoint: a dispatcher plus its request policy.
#[derive(Clone)]
pub struct Receiver {
    dispatcher: Dispatcher,
    token: Option<String>,
    timeout: Option<Duration>,
}

impl Receiver {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            token: None,
            timeout: None,
        }
    }

    /// Require `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Cancel dispatch of a payload that runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = &self.token else {
            return Ok(());
        };
        let presented = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match presented {
            Some(token) if token.trim() == expected => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }

    /// Dispatch `payload`, cancelling it once the configured deadline passes.
    async fn dispatch(&self, payload: &WebhookPayload) -> usize {
        let cancel = CancellationToken::new();
        let _guard = cancel.clone().drop_guard();

        let dispatch = self.dispatcher.handle_payload(&cancel, payload);
        tokio::pin!(dispatch);

        let result = match self.timeout {
            Some(limit) => tokio::select! {
                res = &mut dispatch => res,
                _ = tokio::time::sleep(limit) => {
                    warn!(
                        receiver = %payload.receiver,
                        timeout_ms = limit.as_millis() as u64,
                        "dispatch deadline exceeded; canceling"
                    );
                    cancel.cancel();
                    dispatch.await
                }
            },
            None => dispatch.await,
        };

        match result {
            Ok(()) => 0,
            Err(e) => {
                warn!(receiver = %payload.receiver, error = %e, "errors while processing");
                e.failures.len()
            }
        }
    }
}

/// Body of a processed webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveResponse {
    /// Alerts carried by the payload.
    pub alerts: usize,
    /// Reactions that failed.
    pub failures: usize,
}

/// POST handler for a configured webhook path.
pub(crate) async fn receive(
    State(rx): State<Arc<Receiver>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ReceiveResponse>, ApiError> {
    rx.authorize(&headers)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !content_type.starts_with("application/json") {
        warn!(bad_content_type = content_type, "got unexpected Content-Type from client");
        return Err(ApiError::UnsupportedContentType(content_type.to_string()));
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        warn!(error = %e, "failed receiving payload from client");
        ApiError::InvalidPayload(e.to_string())
    })?;
    if !payload.is_supported_version() {
        warn!(bad_version = %payload.version, "got unexpected payload version from client");
        return Err(ApiError::UnsupportedVersion(payload.version));
    }

    debug!(receiver = %payload.receiver, group_key = %payload.group_key, "payload accepted");
    let failures = rx.dispatch(&payload).await;

    Ok(Json(ReceiveResponse {
        alerts: payload.alerts.len(),
        failures,
    }))
}
