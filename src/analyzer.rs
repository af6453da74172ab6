use std::time::{Duration, Instant};

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::Config;
use crate::report::{AnalysisReport, UploadOutcome};

/// The two failure kinds the dashboard tells apart. A `Backend` error is a
/// message the analyzer itself reported in its body; a `Network` error is
/// anything that kept us from getting a parseable body at all.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Backend(String),
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        AnalyzerError::Network(err.to_string())
    }
}

#[derive(Clone)]
pub struct AnalyzerClient {
    client: Client,
    base_url: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ProbeResult {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalyzerClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.analyzer_url.clone(),
        })
    }

    /// Submit one clause for analysis and decode the full report.
    pub async fn analyze_clause(
        &self,
        clause_text: &str,
    ) -> Result<(AnalysisReport, Value), AnalyzerError> {
        let url = format!("{}/analyze-clause", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "clause_text": clause_text }))
            .send()
            .await?;
        let body: Value = response.json().await?;
        interpret_report(body)
    }

    /// Forward an uploaded policy document for whole-document analysis.
    pub async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<(UploadOutcome, Value), AnalyzerError> {
        let url = format!("{}/upload-document", self.base_url);
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("application/pdf")
            .map_err(|e| AnalyzerError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);
        let response = self.client.post(&url).multipart(form).send().await?;
        let body: Value = response.json().await?;
        interpret_upload(body)
    }

    /// Quick reachability check against the analyzer's health endpoint.
    pub async fn probe(&self) -> ProbeResult {
        let url = format!("{}/health", self.base_url);
        let start = Instant::now();
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => ProbeResult {
                reachable: true,
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: None,
            },
            Ok(response) => ProbeResult {
                reachable: false,
                latency_ms: Some(start.elapsed().as_millis() as u64),
                error: Some(format!("analyzer returned HTTP {}", response.status())),
            },
            Err(e) => ProbeResult {
                reachable: false,
                latency_ms: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// The analyzer's body is what decides, not the HTTP status line: a body
/// carrying an `error` field is a backend failure, and a body that does not
/// decode as a report counts as a transport failure.
fn interpret_report(body: Value) -> Result<(AnalysisReport, Value), AnalyzerError> {
    if let Some(message) = reported_error(&body) {
        return Err(AnalyzerError::Backend(message));
    }
    let report: AnalysisReport = serde_json::from_value(body.clone())
        .map_err(|e| AnalyzerError::Network(format!("unexpected analyzer response: {}", e)))?;
    Ok((report, body))
}

fn interpret_upload(body: Value) -> Result<(UploadOutcome, Value), AnalyzerError> {
    if let Some(message) = reported_error(&body) {
        return Err(AnalyzerError::Backend(message));
    }
    let outcome: UploadOutcome = serde_json::from_value(body.clone())
        .map_err(|e| AnalyzerError::Network(format!("unexpected analyzer response: {}", e)))?;
    Ok((outcome, body))
}

/// An `error` field is taken at its word when it holds anything non-empty.
fn reported_error(body: &Value) -> Option<String> {
    match body.get("error") {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Null) | Some(Value::String(_)) | None => None,
        Some(other) => Some(other.to_string()),
    }
}
