mod analyzer;
mod config;
mod fingerprint;
mod handlers;
mod history;
mod report;
mod state;
mod templates;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use std::time::Duration;
use tower::buffer::BufferLayer;
use tower::limit::RateLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

use crate::analyzer::AnalyzerClient;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    info!("[clauselens] Starting clauselens server");
    info!("[clauselens] Analyzer URL: {}", config.analyzer_url);
    info!("[clauselens] Base URL: {}", config.base_url);
    info!("[clauselens] Database path: {:?}", config.database_path);

    // A section nobody can render must fail loudly at startup, not 500
    // on the first analysis page.
    if let Err(missing) = templates::results::section_table().verify_complete() {
        anyhow::bail!(
            "section renderer missing bindings for: {}",
            missing.join(", ")
        );
    }

    // Initialize SQLite
    let history = HistoryStore::new(&config.database_path)?;
    info!("[clauselens] SQLite history store initialized");

    let analyzer = AnalyzerClient::new(&config)?;

    let state = AppState {
        config: config.clone(),
        analyzer,
        history,
    };

    // Periodic cache eviction (SQLite is persistent; DashMap is hot cache)
    let history_clone = state.history.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            history_clone.cleanup_cache(Duration::from_secs(3600));
        }
    });

    let app = router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("[clauselens] Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = if let Some(ref origins) = state.config.cors_origins {
        let origins: Vec<_> = origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Rate limit middleware builders
    let analyze_rate_limit = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(32))
        .layer(RateLimitLayer::new(10, Duration::from_secs(60)));

    // The upload stack also carries the wire-level body cap, with headroom
    // above the document limit for multipart framing. A route gets exactly
    // one layer stack.
    let upload_limits = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(|_: tower::BoxError| async {
            StatusCode::TOO_MANY_REQUESTS
        }))
        .layer(BufferLayer::new(4))
        .layer(RateLimitLayer::new(2, Duration::from_secs(60)))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes + 64 * 1024));

    Router::new()
        .route("/", get(dashboard))
        .route("/health", get(handlers::health::health))
        .route(
            "/analyze-clause",
            post(handlers::analyze::analyze).layer(analyze_rate_limit),
        )
        .route(
            "/upload-document",
            post(handlers::upload::upload_document).layer(upload_limits),
        )
        .route("/analysis/{id}", get(handlers::analysis::get_analysis))
        .route("/analytics", get(handlers::analytics::analytics_page))
        .route("/metrics", get(handlers::analytics::metrics))
        .route("/badge/{id}", get(handlers::badge::badge))
        .layer(cors)
        .with_state(state)
}

async fn dashboard() -> Html<String> {
    Html(templates::dashboard::render(None))
}
