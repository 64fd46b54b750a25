//! Router-facing HTTP handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use deskhand_core::{
    AutopressStartRequest, AutopressStatus, OperationListing, SequenceRecord, SequenceRequest,
};
use deskhand_protocols::{ActionError, InvocationResponse};

use crate::state::AppState;

/// Body of `GET /autopress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutopressListing {
    pub active: Vec<String>,
    pub entries: Vec<AutopressStatus>,
}

fn status_for(err: &ActionError) -> StatusCode {
    match err {
        ActionError::NotFound { .. } => StatusCode::NOT_FOUND,
        ActionError::InvalidConfig(_)
        | ActionError::InvalidParameter { .. }
        | ActionError::InvalidTarget { .. } => StatusCode::BAD_REQUEST,
        ActionError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(err: ActionError) -> Response {
    (status_for(&err), Json(InvocationResponse::failure(&err))).into_response()
}

/// An empty body means "no parameters".
fn parse_params(body: &Bytes) -> Result<Value, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| {
        failure(ActionError::invalid_parameter(
            "body",
            format!("body is not valid JSON: {}", e),
        ))
    })
}

pub async fn list_capabilities(State(state): State<Arc<AppState>>) -> Json<Vec<OperationListing>> {
    Json(state.router.list_capability_operations())
}

pub async fn invoke(
    State(state): State<Arc<AppState>>,
    Path((capability, operation)): Path<(String, String)>,
    body: Bytes,
) -> Response {
    let params = match parse_params(&body) {
        Ok(params) => params,
        Err(rejection) => return rejection,
    };
    debug!("HTTP invoke {}.{}", capability, operation);
    Json(state.router.invoke(&capability, &operation, params).await).into_response()
}

pub async fn dispatch(
    State(state): State<Arc<AppState>>,
    Path(operation_id): Path<String>,
    body: Bytes,
) -> Response {
    let params = match parse_params(&body) {
        Ok(params) => params,
        Err(rejection) => return rejection,
    };
    debug!("HTTP dispatch {}", operation_id);
    Json(state.router.dispatch(&operation_id, params).await).into_response()
}

pub async fn sequence(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SequenceRequest>,
) -> Json<SequenceRecord> {
    debug!("HTTP sequence with {} commands", request.commands.len());
    Json(state.router.invoke_sequence(request).await)
}

pub async fn autopress_list(State(state): State<Arc<AppState>>) -> Json<AutopressListing> {
    Json(AutopressListing {
        active: state.router.autopress_list(),
        entries: state.router.autopress_status(),
    })
}

pub async fn autopress_start(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AutopressStartRequest>,
) -> Response {
    let id = request.id.clone();
    match state.router.autopress_start(request) {
        Ok(()) => {
            info!("Autopress '{}' started over HTTP", id);
            (
                StatusCode::CREATED,
                Json(json!({ "success": true, "id": id })),
            )
                .into_response()
        }
        Err(e) => failure(e),
    }
}

pub async fn autopress_stop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let stopped = state.router.autopress_stop(Some(&id));
    Json(json!({ "success": true, "stopped": stopped })).into_response()
}

pub async fn autopress_stop_all(State(state): State<Arc<AppState>>) -> Response {
    let stopped = state.router.autopress_stop(None);
    Json(json!({ "success": true, "stopped": stopped })).into_response()
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
