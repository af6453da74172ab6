use axum::extract::{FromRequest, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::analyzer::AnalyzerError;
use crate::fingerprint;
use crate::history::AnalysisRecord;
use crate::state::AppState;
use crate::templates::dashboard;
use crate::templates::layout::Alert;

pub const BLANK_CLAUSE_MESSAGE: &str = "Please enter a policy clause to analyze";

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub clause_text: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// How the submission arrived decides how the outcome comes back: JSON
/// bodies get JSON, form posts get the dashboard banner or a redirect to
/// the analysis page.
pub enum Submission {
    Api(AnalyzeRequest),
    Browser(AnalyzeRequest),
}

impl<S> FromRequest<S> for Submission
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);
        if is_json {
            let Json(body) = Json::<AnalyzeRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Submission::Api(body))
        } else {
            let Form(body) = Form::<AnalyzeRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Submission::Browser(body))
        }
    }
}

pub async fn analyze(State(state): State<AppState>, submission: Submission) -> Response {
    match submission {
        Submission::Api(request) => analyze_api(&state, request).await,
        Submission::Browser(request) => analyze_browser(&state, request).await,
    }
}

async fn analyze_api(state: &AppState, request: AnalyzeRequest) -> Response {
    let clause_text = request.clause_text.trim();
    if clause_text.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: BLANK_CLAUSE_MESSAGE.to_string(),
                hint: Some("Provide {\"clause_text\": \"...\"}".to_string()),
            }),
        )
            .into_response();
    }

    match run_clause_analysis(state, clause_text).await {
        Ok(stored) => {
            let mut body = stored.raw;
            if let Some(obj) = body.as_object_mut() {
                if !obj.contains_key("analysis_id") {
                    obj.insert(
                        "analysis_id".to_string(),
                        Value::String(stored.id.clone()),
                    );
                }
                obj.insert(
                    "analysis_url".to_string(),
                    Value::String(format!("{}/analysis/{}", state.config.base_url, stored.id)),
                );
            }
            Json(body).into_response()
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponse {
                error: e.to_string(),
                hint: None,
            }),
        )
            .into_response(),
    }
}

async fn analyze_browser(state: &AppState, request: AnalyzeRequest) -> Response {
    let clause_text = request.clause_text.trim();
    if clause_text.is_empty() {
        return dashboard_with(StatusCode::BAD_REQUEST, Alert::error(BLANK_CLAUSE_MESSAGE));
    }

    match run_clause_analysis(state, clause_text).await {
        Ok(stored) => Redirect::to(&format!("/analysis/{}", stored.id)).into_response(),
        Err(e) => {
            let alert = match &e {
                AnalyzerError::Backend(message) => Alert::error(format!("Error: {}", message)),
                AnalyzerError::Network(message) => {
                    Alert::error(format!("Network error: {}", message))
                }
            };
            dashboard_with(StatusCode::BAD_GATEWAY, alert)
        }
    }
}

fn dashboard_with(status: StatusCode, alert: Alert) -> Response {
    (status, Html(dashboard::render(Some(&alert)))).into_response()
}

struct StoredAnalysis {
    id: String,
    raw: Value,
}

/// Shared clause pipeline: call the analyzer, settle on an id and record
/// the result in history.
async fn run_clause_analysis(
    state: &AppState,
    clause_text: &str,
) -> Result<StoredAnalysis, AnalyzerError> {
    info!(
        "[clauselens] Analyzing clause ({} bytes)",
        clause_text.len()
    );
    let (report, raw) = match state.analyzer.analyze_clause(clause_text).await {
        Ok(result) => result,
        Err(e) => {
            error!("[clauselens] Clause analysis failed: {}", e);
            return Err(e);
        }
    };

    let created_at = Utc::now();
    let id = report
        .analysis_id
        .clone()
        .unwrap_or_else(|| fingerprint::analysis_id(clause_text, &created_at.to_rfc3339()));
    let record = AnalysisRecord::summarize(id.clone(), clause_text, &report, &raw, created_at);
    state.history.insert(record);
    info!("[clauselens] Analysis {} recorded", id);

    Ok(StoredAnalysis { id, raw })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;

    use crate::analyzer::AnalyzerClient;
    use crate::config::Config;
    use crate::history::HistoryStore;

    fn test_state() -> AppState {
        // Port 1 has no listener, so any attempt to reach the analyzer
        // fails immediately instead of timing out.
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

    fn app() -> Router {
        Router::new()
            .route("/analyze-clause", post(analyze))
            .with_state(test_state())
    }

    fn form_request(body: &'static str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/analyze-clause")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(body: &'static str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/analyze-clause")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn blank_form_submission_never_reaches_the_analyzer() {
        let response = app().oneshot(form_request("clause_text=+++")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains(BLANK_CLAUSE_MESSAGE));
        // A network banner would mean the analyzer was actually called.
        assert!(!text.contains("Network error"));
    }

    #[tokio::test]
    async fn blank_json_submission_returns_the_error_shape() {
        let response = app()
            .oneshot(json_request(r#"{"clause_text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], BLANK_CLAUSE_MESSAGE);
    }

    #[tokio::test]
    async fn analyzer_outage_shows_a_network_banner() {
        let response = app()
            .oneshot(form_request("clause_text=No+claim+shall+be+payable"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("Network error: "));
        assert!(text.contains(r#"class="alert alert-danger""#));
        // The dashboard comes back so the visitor can retry.
        assert!(text.contains(r#"action="/analyze-clause""#));
    }

    #[tokio::test]
    async fn analyzer_outage_returns_json_error_for_api_clients() {
        let response = app()
            .oneshot(json_request(r#"{"clause_text": "No claim shall be payable"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("network error"));
    }
}
