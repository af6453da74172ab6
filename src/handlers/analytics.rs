use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::history::HistoryStats;
use crate::state::AppState;
use crate::templates;

pub async fn analytics_page(State(state): State<AppState>) -> Html<String> {
    let stats = state.history.get_stats();
    let recent = state.history.list_recent(10);
    Html(templates::analytics::render(&stats, &recent))
}

/// Same aggregates as the analytics page, for dashboards and scripts.
pub async fn metrics(State(state): State<AppState>) -> Json<HistoryStats> {
    Json(state.history.get_stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use chrono::Utc;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analyzer::AnalyzerClient;
    use crate::config::Config;
    use crate::history::{AnalysisRecord, HistoryStore};
    use crate::report::AnalysisReport;

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

    #[tokio::test]
    async fn metrics_reports_recorded_analyses() {
        let state = test_state();
        let raw = serde_json::json!({
            "compliance_check": {
                "compliance_score": 8.5,
                "status": "compliant",
                "regulatory_issues": [],
                "recommendations": [],
                "irdai_compliant": true
            }
        });
        let report: AnalysisReport = serde_json::from_value(raw.clone()).unwrap();
        state.history.insert_sync(AnalysisRecord::summarize(
            "feedface0000".to_string(),
            "Premium shall be payable annually.",
            &report,
            &raw,
            Utc::now(),
        ));

        let app = Router::new()
            .route("/metrics", get(metrics))
            .with_state(state);
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["total_analyses"], 1);
        assert_eq!(json["by_status"]["compliant"], 1);
    }

    #[tokio::test]
    async fn analytics_page_lists_recent_analyses() {
        let state = test_state();
        let raw = serde_json::json!({ "original_clause": "Deductible applies per claim." });
        let report: AnalysisReport = serde_json::from_value(raw.clone()).unwrap();
        state.history.insert_sync(AnalysisRecord::summarize(
            "c0ffee000001".to_string(),
            "Deductible applies per claim.",
            &report,
            &raw,
            Utc::now(),
        ));

        let app = Router::new()
            .route("/analytics", get(analytics_page))
            .with_state(state);
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&body);
        assert!(html.contains("Deductible applies per claim."));
        assert!(html.contains("/analysis/c0ffee000001"));
    }
}
