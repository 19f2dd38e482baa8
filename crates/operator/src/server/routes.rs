use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

use super::Server;
use crate::{metrics, sources::DispatchOutcome, Error};

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

pub async fn export_metrics() -> String {
    metrics::gather_metrics()
}

/// Receives alerts from Alertmanager, filters them, and conditionally
/// triggers the self-healing playbook.
pub async fn receive_alert(State(server): State<Arc<Server>>, body: Bytes) -> Response {
    match server.dispatcher.dispatch(&body).await {
        Ok(DispatchOutcome::Remediated { output }) => (
            StatusCode::OK,
            Json(json!({
                "status": "Self-healing triggered and successful",
                "ansible_output": output,
            })),
        )
            .into_response(),
        Ok(DispatchOutcome::NoAction) => (
            StatusCode::OK,
            Json(json!({
                "status": "Alert received, but no self-healing action triggered",
            })),
        )
            .into_response(),
        Err(e @ Error::Parse(_)) => {
            error!("Error processing webhook: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "Internal Server Error during processing" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Self-healing failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "Self-healing failed (Ansible error)",
                    "ansible_error": ansible_error_text(&e),
                })),
            )
                .into_response()
        }
    }
}

/// Kept for direct testing purposes; restarts the service regardless of the
/// request body.
pub async fn deploy_direct(State(server): State<Arc<Server>>) -> Response {
    match server.dispatcher.trigger_direct().await {
        Ok(output) => (
            StatusCode::OK,
            Json(json!({
                "status": "Direct deployment successful",
                "ansible_output": output,
            })),
        )
            .into_response(),
        Err(e) => {
            error!("Direct deployment failed: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "Direct deployment failed",
                    "ansible_error": ansible_error_text(&e),
                })),
            )
                .into_response()
        }
    }
}

// The tool's own error stream goes back verbatim; launch and timeout errors
// are stringified.
fn ansible_error_text(err: &Error) -> String {
    match err {
        Error::PlaybookExit { stderr, .. } => stderr.clone(),
        other => other.to_string(),
    }
}
