//! API request handlers

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::PlantillaResult;
use crate::excel::TemplateFiller;
use crate::transform::transform_document;

use super::server::AppState;

/// Content type of the generated workbook
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Fixed message for bodies that fail JSON validation
const INVALID_JSON_MESSAGE: &str = "Invalid JSON format.";

/// Error body for 400/500 responses
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RootResponse {
        name: "Plantilla".to_string(),
        version: state.version.clone(),
        description: "Fills the configured Excel template from nested JSON".to_string(),
        endpoints: vec![
            EndpointInfo {
                path: "/health".to_string(),
                method: "GET".to_string(),
                description: "Health check endpoint".to_string(),
            },
            EndpointInfo {
                path: "/fill-template".to_string(),
                method: "POST".to_string(),
                description: "Fill the template and download the result".to_string(),
            },
        ],
    })
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// POST /fill-template - Fill the template from the request document
///
/// The raw body is parsed here rather than through the JSON extractor so
/// that every malformed body gets the same fixed 400 message. Transform and
/// fill failures become a 500 carrying the error description. The request's
/// temporary directory is removed on every path.
pub async fn fill_template(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();

    let Some(document) = parse_document(&body) else {
        warn!("[{request_id}] Rejected request: empty or invalid JSON body");
        return error_response(StatusCode::BAD_REQUEST, INVALID_JSON_MESSAGE.to_string());
    };

    match fill_document(&state, &document) {
        Ok((file_name, bytes)) => {
            info!(
                "[{request_id}] Returning {file_name} ({} bytes)",
                bytes.len()
            );
            attachment_response(&file_name, bytes)
        }
        Err(e) => {
            error!("[{request_id}] Error processing request: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error processing the request: {e}"),
            )
        }
    }
}

/// Parse the body into a non-empty JSON object
///
/// Unparseable bytes, non-object JSON, and the empty object all count as
/// invalid input for this endpoint.
fn parse_document(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body).ok()? {
        Value::Object(map) if !map.is_empty() => Some(map),
        _ => None,
    }
}

/// Run transform and fill, returning the download name and file contents
///
/// The filled copy's temporary directory is cleaned up before returning,
/// success or not.
fn fill_document(
    state: &AppState,
    document: &Map<String, Value>,
) -> PlantillaResult<(String, Vec<u8>)> {
    let assignments = transform_document(document, &state.mapping)?;
    let filler = TemplateFiller::new(
        state.settings.template_path(),
        &state.settings.sheet_name,
    );
    let filled = filler.fill(&assignments)?;

    let file_name = filled.file_name().to_string();
    let bytes = match filled.read_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            filled.cleanup();
            return Err(e);
        }
    };
    filled.cleanup();
    Ok((file_name, bytes))
}

fn attachment_response(file_name: &str, bytes: Vec<u8>) -> Response {
    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    (StatusCode::OK, headers, bytes).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}
