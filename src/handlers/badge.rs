use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::history::ComplianceStatus;
use crate::state::AppState;

/// Embeddable SVG badge showing an analysis's compliance verdict.
pub async fn badge(State(state): State<AppState>, Path(analysis_id): Path<String>) -> Response {
    let record = match state.history.get(&analysis_id) {
        Some(r) => r,
        None => {
            return (StatusCode::NOT_FOUND, "Analysis not found").into_response();
        }
    };

    let (status_text, color, bg_color, cache_control) = match record.compliance_status {
        ComplianceStatus::Compliant => ("compliant", "#155724", "#d4edda", "public, max-age=3600"),
        ComplianceStatus::NeedsReview => {
            ("needs review", "#856404", "#fff3cd", "public, max-age=3600")
        }
        ComplianceStatus::HighRisk => ("high risk", "#721c24", "#f8d7da", "public, max-age=3600"),
        ComplianceStatus::Unscored => ("unscored", "#383d41", "#e2e3e5", "no-cache"),
    };

    let label = "clauselens";
    let label_width = label.len() as u32 * 7 + 10;
    let value_width = status_text.len() as u32 * 7 + 10;
    let total_width = label_width + value_width;

    let label_x = label_width / 2;
    let value_x = label_width + value_width / 2;
    let white = "#fff";
    let gray = "#555";
    let grad_stop = "#bbb";
    let shadow = "#010101";

    let svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total_width}" height="20" role="img" aria-label="{label}: {status_text}">
  <title>{label}: {status_text}</title>
  <linearGradient id="s" x2="0" y2="100%">
    <stop offset="0" stop-color="{grad_stop}" stop-opacity=".1"/>
    <stop offset="1" stop-opacity=".1"/>
  </linearGradient>
  <clipPath id="r"><rect width="{total_width}" height="20" rx="3" fill="{white}"/></clipPath>
  <g clip-path="url(#r)">
    <rect width="{label_width}" height="20" fill="{gray}"/>
    <rect x="{label_width}" width="{value_width}" height="20" fill="{bg_color}"/>
    <rect width="{total_width}" height="20" fill="url(#s)"/>
  </g>
  <g fill="{white}" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" text-rendering="geometricPrecision" font-size="110">
    <text aria-hidden="true" x="{label_x}0" y="150" fill="{shadow}" fill-opacity=".3" transform="scale(.1)">{label}</text>
    <text x="{label_x}0" y="140" transform="scale(.1)">{label}</text>
    <text aria-hidden="true" x="{value_x}0" y="150" fill="{shadow}" fill-opacity=".3" transform="scale(.1)">{status_text}</text>
    <text x="{value_x}0" y="140" transform="scale(.1)" fill="{color}">{status_text}</text>
  </g>
</svg>"#
    );

    (
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, cache_control),
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        svg,
    )
        .into_response()
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
    use crate::report::AnalysisReport;
    use crate::state::AppState;

    fn badge_app(id: &str, raw: serde_json::Value) -> Router {
        let config = Config {
            port: 0,
            analyzer_url: "http://127.0.0.1:1".to_string(),
            base_url: "http://localhost:3000".to_string(),
            database_path: std::path::PathBuf::from(":memory:"),
            cors_origins: None,
            request_timeout_secs: 2,
            max_upload_bytes: 16 * 1024 * 1024,
        };
        let state = AppState {
            analyzer: AnalyzerClient::new(&config).unwrap(),
            history: HistoryStore::open_in_memory().unwrap(),
            config,
        };
        let report: AnalysisReport = serde_json::from_value(raw.clone()).unwrap();
        state.history.insert_sync(AnalysisRecord::summarize(
            id.to_string(),
            "Waiting period applies.",
            &report,
            &raw,
            Utc::now(),
        ));
        Router::new()
            .route("/badge/{id}", get(badge))
            .with_state(state)
    }

    #[tokio::test]
    async fn badge_reflects_the_compliance_verdict() {
        let app = badge_app(
            "badge0000001",
            serde_json::json!({
                "compliance_check": {
                    "compliance_score": 5.0,
                    "status": "needs_review",
                    "regulatory_issues": ["Ambiguous waiting period"],
                    "recommendations": [],
                    "irdai_compliant": false
                }
            }),
        );
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/badge/badge0000001")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/svg+xml"
        );
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=3600"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let svg = String::from_utf8_lossy(&body);
        assert!(svg.contains("needs review"));
        assert!(svg.contains("clauselens"));
    }

    #[tokio::test]
    async fn unscored_badge_is_not_cached() {
        // A report without a compliance check summarizes to Unscored.
        let app = badge_app("badge0000002", serde_json::json!({}));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/badge/badge0000002")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-cache"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("unscored"));
    }
}
