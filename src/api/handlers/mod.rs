use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::OkrError;
use crate::models::*;
use crate::store::OkrStore;

// ============================================================
// Error Handling
// ============================================================

/// Map each error kind to its own status so clients can tell them apart.
///
/// Request problems carry their message. Document and storage failures are logged
/// server-side and still describe which stage failed, since the document is the
/// user's own file and the message tells them what to fix.
fn error_response(e: OkrError) -> (StatusCode, String) {
    let status = match &e {
        OkrError::Validation(_) => StatusCode::BAD_REQUEST,
        OkrError::NotFound(_) => StatusCode::NOT_FOUND,
        OkrError::Timeout { .. } => StatusCode::SERVICE_UNAVAILABLE,
        OkrError::Parse(_) | OkrError::Read { .. } | OkrError::Persist { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        tracing::error!("{} error: {}", e.stage(), e);
    } else {
        tracing::warn!("{} error: {}", e.stage(), e);
    }
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Objectives
// ============================================================

pub async fn list_objectives(
    State(store): State<OkrStore>,
) -> Result<Json<Vec<Objective>>, (StatusCode, String)> {
    store.load_objectives().map(Json).map_err(error_response)
}

pub async fn increment_key_result(
    State(store): State<OkrStore>,
    Path((objective, key_result)): Path<(String, String)>,
) -> Result<Response, (StatusCode, String)> {
    let objective = ObjectiveRef::parse(&objective).map_err(error_response)?;
    let update = store
        .increment_key_result(&objective, &key_result)
        .map_err(error_response)?;

    match update.outcome {
        MutationOutcome::Updated => Ok(Json(update.key_result).into_response()),
        MutationOutcome::AlreadyComplete => Ok(StatusCode::NOT_MODIFIED.into_response()),
    }
}
