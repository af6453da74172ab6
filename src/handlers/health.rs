use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::analyzer::ProbeResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub analyzer_url: String,
    pub analyzer: ProbeResult,
    pub analyses_recorded: u64,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let analyzer = state.analyzer.probe().await;
    let stats = state.history.get_stats();
    Json(HealthResponse {
        status: "ok".to_string(),
        version: "clauselens-v0.1.0".to_string(),
        analyzer_url: state.config.analyzer_url.clone(),
        analyzer,
        analyses_recorded: stats.total_analyses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::analyzer::AnalyzerClient;
    use crate::config::Config;
    use crate::history::HistoryStore;

    #[tokio::test]
    async fn health_reports_an_unreachable_analyzer() {
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

        let app = Router::new().route("/health", get(health)).with_state(state);
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], "clauselens-v0.1.0");
        assert_eq!(json["analyzer"]["reachable"], false);
        assert_eq!(json["analyses_recorded"], 0);
    }
}
