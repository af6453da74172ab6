use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::{debug, error};

use crate::report::AnalysisReport;
use crate::state::AppState;
use crate::templates::results::{self, ResultsView};

use super::analyze::ErrorResponse;

/// Serves a stored analysis as HTML or, when the client asks for it,
/// as the raw analyzer JSON with the share link added.
pub async fn get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let Some(record) = state.history.get(&id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Analysis not found".to_string(),
                hint: Some("Check the analysis ID".to_string()),
            }),
        )
            .into_response();
    };

    let raw: Value = match serde_json::from_str(&record.report_json) {
        Ok(value) => value,
        Err(e) => {
            error!("[clauselens] Stored analysis {} is unreadable: {}", id, e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Stored analysis is unreadable".to_string(),
                    hint: None,
                }),
            )
                .into_response();
        }
    };

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html");
    if accept.contains("application/json") {
        let mut body = raw;
        if let Some(obj) = body.as_object_mut() {
            obj.insert(
                "analysis_url".to_string(),
                Value::String(format!("{}/analysis/{}", state.config.base_url, record.id)),
            );
        }
        return Json(body).into_response();
    }

    let report: AnalysisReport = serde_json::from_value(raw).unwrap_or_default();
    let mut view = ResultsView::new(results::section_table());
    view.apply(&report);
    debug!(
        "[clauselens] Rendering analysis {} ({} sections, {} skipped)",
        record.id,
        view.rendered().len(),
        view.skipped().len()
    );
    Html(results::analysis_page(&record, &view, &state.config.base_url)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use tower::ServiceExt;

    use crate::analyzer::AnalyzerClient;
    use crate::config::Config;
    use crate::history::{AnalysisRecord, HistoryStore};

    fn test_state() -> AppState {
        let config = Config {
            port: 0,
            analyzer_url: "http://127.0.0.1:1".to_string(),
            base_url: "http://localhost:3000".to_string(),
            database_path: std::path::PathBuf::from(":memory:"),
            cors_origins: None,
            request_timeout_secs: 2,
            max_upload_bytes: 16 * 1024 * 1024,
        };
        AppState {
            analyzer: AnalyzerClient::new(&config).unwrap(),
            history: HistoryStore::open_in_memory().unwrap(),
            config,
        }
    }

    fn seeded_state() -> AppState {
        let state = test_state();
        let raw = serde_json::json!({
            "analysis_id": "abc123def456",
            "processing_model": "Enterprise AI",
            "original_clause": "No claim shall be payable after ninety days.",
            "compliance_check": {
                "compliance_score": 4.0,
                "status": "needs_review",
                "regulatory_issues": ["Claim window below IRDAI minimum"],
                "recommendations": [],
                "irdai_compliant": false
            }
        });
        let report: AnalysisReport = serde_json::from_value(raw.clone()).unwrap();
        let record = AnalysisRecord::summarize(
            "abc123def456".to_string(),
            "No claim shall be payable after ninety days.",
            &report,
            &raw,
            Utc::now(),
        );
        state.history.insert_sync(record);
        state
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/analysis/{id}", get(get_analysis))
            .with_state(state)
    }

    #[tokio::test]
    async fn stored_analysis_serves_html_and_json() {
        let app = app(seeded_state());

        let html_response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/analysis/abc123def456")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(html_response.status(), StatusCode::OK);
        let body = to_bytes(html_response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("abc123def456"));
        assert!(html.contains("Compliance"));
        assert!(html.contains("Claim window below IRDAI minimum"));

        let json_response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/analysis/abc123def456")
                    .header(header::ACCEPT, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(json_response.status(), StatusCode::OK);
        let body = to_bytes(json_response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["analysis_id"], "abc123def456");
        assert_eq!(
            json["analysis_url"],
            "http://localhost:3000/analysis/abc123def456"
        );
    }

    #[tokio::test]
    async fn unknown_id_returns_not_found() {
        let response = app(test_state())
            .oneshot(
                axum::http::Request::builder()
                    .uri("/analysis/000000000000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Analysis not found");
    }
}
