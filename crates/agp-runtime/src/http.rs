//! # HTTP Dispatch Surface
//!
//! One POST route per entity kind and action, every body the same shape:
//! `{ "tokenized": "<envelope string>" }`. The route segments only select
//! which resolver operation runs; everything the operation consumes rides
//! inside the envelope.

use std::sync::Arc;

use agp_envelope::EnvelopeError;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::json;

use agp_records::{
    BiosecurityCheck, CropRecord, CsvWorkbookRenderer, FarmRecord, FileBackedRecordStore,
    LivestockRecord, ProductionRecord, RecordFields, RecordResolver, RegistryError,
    StaticSessionGate, SystemTimeSource, UuidGenerator,
};

/// The resolver wiring used by the runtime.
pub type PortalResolver = RecordResolver<
    FileBackedRecordStore,
    SystemTimeSource,
    UuidGenerator,
    StaticSessionGate<SystemTimeSource>,
>;

/// Shared application state.
pub struct AppState {
    pub resolver: Mutex<PortalResolver>,
    pub renderer: CsvWorkbookRenderer,
}

impl AppState {
    pub fn new(resolver: PortalResolver) -> Self {
        Self {
            resolver: Mutex::new(resolver),
            renderer: CsvWorkbookRenderer::new(),
        }
    }
}

/// Every request body carries exactly one envelope string.
#[derive(Debug, Deserialize)]
pub struct TokenizedRequest {
    pub tokenized: String,
}

/// Build the dispatch router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/records/:kind/:action", post(dispatch))
        .with_state(state)
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    Path((kind, action)): Path<(String, String)>,
    Json(body): Json<TokenizedRequest>,
) -> Response {
    match kind.as_str() {
        "farms" => handle::<FarmRecord>(&state, &action, &body.tokenized),
        "crops" => handle::<CropRecord>(&state, &action, &body.tokenized),
        "livestock" => handle::<LivestockRecord>(&state, &action, &body.tokenized),
        "biosecurity" => handle::<BiosecurityCheck>(&state, &action, &body.tokenized),
        "production" => handle::<ProductionRecord>(&state, &action, &body.tokenized),
        _ => not_found(&format!("unknown entity kind '{}'", kind)),
    }
}

fn handle<F: RecordFields>(state: &AppState, action: &str, tokenized: &str) -> Response {
    let mut resolver = state.resolver.lock();

    let result = match action {
        "create" => resolver.create::<F>(tokenized).map(receipt_response),
        "update" => resolver.update::<F>(tokenized).map(receipt_response),
        "delete" => resolver.delete::<F>(tokenized).map(receipt_response),
        "list" => resolver
            .list::<F>(tokenized)
            .map(|sealed| Json(json!({ "tokenized": sealed })).into_response()),
        "export" => resolver
            .export::<F>(tokenized, &state.renderer)
            .map(workbook_response),
        _ => return not_found(&format!("unknown action '{}'", action)),
    };

    match result {
        Ok(response) => response,
        Err(error) => error_response(&error),
    }
}

fn receipt_response(receipt: agp_records::MutationReceipt) -> Response {
    Json(receipt).into_response()
}

fn workbook_response(bytes: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, "text/csv")], bytes).into_response()
}

fn not_found(message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

/// Map registry failures onto HTTP statuses; messages surface verbatim.
fn error_response(error: &RegistryError) -> Response {
    let status = match error {
        RegistryError::Auth(_) => StatusCode::UNAUTHORIZED,
        RegistryError::Envelope(EnvelopeError::IntegrityFailure) => StatusCode::UNAUTHORIZED,
        RegistryError::Envelope(_) => StatusCode::BAD_REQUEST,
        RegistryError::MissingRelation { .. }
        | RegistryError::DuplicateUniqueKey { .. }
        | RegistryError::InvalidFields { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        RegistryError::RelationNotFound { .. } | RegistryError::NotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        RegistryError::Store(_) | RegistryError::Workbook(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status.is_server_error() {
        tracing::error!("[agp-runtime] request failed: {}", error);
    } else {
        tracing::debug!("[agp-runtime] request rejected: {}", error);
    }

    (
        status,
        Json(json!({ "status": "error", "message": error.to_string() })),
    )
        .into_response()
}
