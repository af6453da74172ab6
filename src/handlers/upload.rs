use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tracing::{error, info};

use crate::analyzer::AnalyzerError;
use crate::state::AppState;
use crate::templates::dashboard;
use crate::templates::layout::Alert;

use super::analyze::ErrorResponse;

pub const MISSING_FILE_MESSAGE: &str = "Please select a PDF file to upload";
pub const NOT_PDF_MESSAGE: &str = "Only PDF documents are supported";

/// Form posts and API clients share this endpoint; the Accept header
/// decides whether the outcome comes back as JSON or as a dashboard
/// banner.
fn accepts_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|accept| accept.contains("application/json"))
        .unwrap_or(false)
}

pub async fn upload_document(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let wants_json = accepts_json(&headers);

    let mut document: Option<(String, Vec<u8>)> = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                error!("[clauselens] Failed to read upload body: {}", e);
                return rejection(
                    wants_json,
                    StatusCode::BAD_REQUEST,
                    "Could not read the uploaded file",
                );
            }
        };
        document = Some((filename, bytes));
        break;
    }

    let Some((filename, bytes)) = document else {
        return rejection(wants_json, StatusCode::BAD_REQUEST, MISSING_FILE_MESSAGE);
    };
    if filename.is_empty() || bytes.is_empty() {
        return rejection(wants_json, StatusCode::BAD_REQUEST, MISSING_FILE_MESSAGE);
    }
    if !filename.to_ascii_lowercase().ends_with(".pdf") {
        return rejection(wants_json, StatusCode::BAD_REQUEST, NOT_PDF_MESSAGE);
    }
    if bytes.len() > state.config.max_upload_bytes {
        let message = format!(
            "Document exceeds the {} MiB upload limit",
            state.config.max_upload_bytes / (1024 * 1024)
        );
        return rejection(wants_json, StatusCode::PAYLOAD_TOO_LARGE, &message);
    }

    info!(
        "[clauselens] Uploading document {} ({} bytes)",
        filename,
        bytes.len()
    );
    match state.analyzer.upload_document(&filename, bytes).await {
        Ok((outcome, raw)) => {
            if wants_json {
                return Json(raw).into_response();
            }
            let alert = Alert::success(format!(
                "Document processed successfully! {} clauses analyzed.",
                outcome.clauses_analyzed
            ));
            Html(dashboard::render(Some(&alert))).into_response()
        }
        Err(e) => {
            error!("[clauselens] Document upload failed: {}", e);
            if wants_json {
                return (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorResponse {
                        error: e.to_string(),
                        hint: None,
                    }),
                )
                    .into_response();
            }
            let alert = match &e {
                AnalyzerError::Backend(message) => Alert::error(format!("Error: {}", message)),
                AnalyzerError::Network(message) => {
                    Alert::error(format!("Upload error: {}", message))
                }
            };
            (
                StatusCode::BAD_GATEWAY,
                Html(dashboard::render(Some(&alert))),
            )
                .into_response()
        }
    }
}

fn rejection(wants_json: bool, status: StatusCode, message: &str) -> Response {
    if wants_json {
        return (
            status,
            Json(ErrorResponse {
                error: message.to_string(),
                hint: None,
            }),
        )
            .into_response();
    }
    (
        status,
        Html(dashboard::render(Some(&Alert::error(message)))),
    )
        .into_response()
}
