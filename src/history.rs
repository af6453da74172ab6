use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

use crate::report::AnalysisReport;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NeedsReview,
    HighRisk,
    Unscored,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::NeedsReview => "needs_review",
            ComplianceStatus::HighRisk => "high_risk",
            ComplianceStatus::Unscored => "unscored",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "compliant" => ComplianceStatus::Compliant,
            "needs_review" => ComplianceStatus::NeedsReview,
            "high_risk" => ComplianceStatus::HighRisk,
            _ => ComplianceStatus::Unscored,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NeedsReview => "Needs review",
            ComplianceStatus::HighRisk => "High risk",
            ComplianceStatus::Unscored => "Unscored",
        }
    }
}

/// One stored analysis: the summary columns we query plus the full analyzer
/// response as it came off the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub clause_excerpt: String,
    pub created_at: DateTime<Utc>,
    pub processing_model: Option<String>,
    pub readability_gain: Option<f64>,
    pub compliance_score: Option<f64>,
    pub compliance_status: ComplianceStatus,
    pub risk_score: Option<f64>,
    pub risk_level: Option<String>,
    pub issue_count: u64,
    pub translation_count: u64,
    pub report_json: String,
}

impl AnalysisRecord {
    pub fn summarize(
        id: String,
        clause_text: &str,
        report: &AnalysisReport,
        raw: &Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        let compliance = report.compliance_check.as_ref();
        let risk = report.risk_score.as_ref();
        Self {
            id,
            clause_excerpt: excerpt(
                report.original_clause.as_deref().unwrap_or(clause_text),
                160,
            ),
            created_at,
            processing_model: report.processing_model.clone(),
            readability_gain: report
                .plain_english
                .as_ref()
                .map(|p| p.readability_improvement),
            compliance_score: compliance.map(|c| c.compliance_score),
            compliance_status: compliance
                .map(|c| ComplianceStatus::from_str(&c.status))
                .unwrap_or(ComplianceStatus::Unscored),
            risk_score: risk.map(|r| r.risk_score),
            risk_level: risk
                .map(|r| r.risk_level.clone())
                .filter(|level| !level.is_empty()),
            issue_count: compliance
                .map(|c| c.regulatory_issues.len() as u64)
                .unwrap_or(0),
            translation_count: report
                .multilingual
                .as_ref()
                .map(|m| m.translations.len() as u64)
                .unwrap_or(0),
            report_json: serde_json::to_string(raw).unwrap_or_default(),
        }
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}\u{2026}", cut.trim_end())
}

pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init()?;
        Ok(store)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().expect("SQLite connection lock poisoned");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                clause_excerpt TEXT NOT NULL,
                created_at TEXT NOT NULL,
                processing_model TEXT,
                readability_gain REAL,
                compliance_score REAL,
                compliance_status TEXT NOT NULL,
                risk_score REAL,
                risk_level TEXT,
                issue_count INTEGER NOT NULL,
                translation_count INTEGER NOT NULL,
                report_json TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_analyses_status ON analyses(compliance_status);
            CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses(created_at DESC);",
        )?;
        Ok(())
    }

    pub fn insert(&self, record: &AnalysisRecord) {
        let conn = self.conn.lock().expect("SQLite connection lock poisoned");
        if let Err(e) = conn.execute(
            "INSERT OR REPLACE INTO analyses (id, clause_excerpt, created_at, processing_model, readability_gain, compliance_score, compliance_status, risk_score, risk_level, issue_count, translation_count, report_json) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                record.id,
                record.clause_excerpt,
                record.created_at.to_rfc3339(),
                record.processing_model,
                record.readability_gain,
                record.compliance_score,
                record.compliance_status.as_str(),
                record.risk_score,
                record.risk_level,
                record.issue_count as i64,
                record.translation_count as i64,
                record.report_json,
            ],
        ) {
            error!("[clauselens] SQLite insert failed: {:?}", e);
        }
    }

    pub fn get(&self, id: &str) -> Option<AnalysisRecord> {
        let conn = self.conn.lock().expect("SQLite connection lock poisoned");
        conn.query_row(
            "SELECT id, clause_excerpt, created_at, processing_model, readability_gain, compliance_score, compliance_status, risk_score, risk_level, issue_count, translation_count, report_json FROM analyses WHERE id = ?1",
            rusqlite::params![id],
            |row| {
                let created_str: String = row.get(2)?;
                let status_str: String = row.get(6)?;
                let issue_count: i64 = row.get(9)?;
                let translation_count: i64 = row.get(10)?;

                Ok(AnalysisRecord {
                    id: row.get(0)?,
                    clause_excerpt: row.get(1)?,
                    created_at: DateTime::parse_from_rfc3339(&created_str)
                        .map(|dt| dt.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                    processing_model: row.get(3)?,
                    readability_gain: row.get(4)?,
                    compliance_score: row.get(5)?,
                    compliance_status: ComplianceStatus::from_str(&status_str),
                    risk_score: row.get(7)?,
                    risk_level: row.get(8)?,
                    issue_count: issue_count as u64,
                    translation_count: translation_count as u64,
                    report_json: row.get(11)?,
                })
            },
        )
        .ok()
    }

    pub fn get_stats(&self) -> HistoryStats {
        let conn = self.conn.lock().expect("SQLite connection lock poisoned");
        let mut stats = HistoryStats::default();

        // Single query for counts and averages
        let _ = conn.query_row(
            "SELECT \
                COUNT(*), \
                AVG(readability_gain), \
                AVG(compliance_score), \
                AVG(risk_score), \
                SUM(issue_count), \
                MAX(translation_count) \
            FROM analyses",
            [],
            |row| {
                stats.total_analyses = row.get(0).unwrap_or(0);
                stats.avg_readability_gain = row.get(1).unwrap_or(None);
                stats.avg_compliance_score = row.get(2).unwrap_or(None);
                stats.avg_risk_score = row.get(3).unwrap_or(None);
                stats.compliance_issues_found = row.get(4).unwrap_or(0);
                stats.languages_supported = row.get(5).unwrap_or(0);
                Ok(())
            },
        );

        // Verdict counts need their own GROUP BY pass
        if let Ok(mut stmt) =
            conn.prepare("SELECT compliance_status, COUNT(*) FROM analyses GROUP BY compliance_status")
        {
            if let Ok(rows) = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
            }) {
                for row in rows.flatten() {
                    stats.by_status.insert(row.0, row.1);
                }
            }
        }

        stats
    }

    pub fn list_recent(&self, limit: u64) -> Vec<AnalysisSummary> {
        let conn = self.conn.lock().expect("SQLite connection lock poisoned");
        let mut stmt = match conn.prepare(
            "SELECT id, clause_excerpt, created_at, compliance_status, compliance_score, risk_level, risk_score FROM analyses ORDER BY created_at DESC LIMIT ?1",
        ) {
            Ok(s) => s,
            Err(e) => {
                error!("[clauselens] list_recent query failed: {:?}", e);
                return vec![];
            }
        };

        let rows = stmt.query_map(rusqlite::params![limit as i64], |row| {
            let created_str: String = row.get(2)?;
            Ok(AnalysisSummary {
                id: row.get(0)?,
                clause_excerpt: row.get(1)?,
                created_at: DateTime::parse_from_rfc3339(&created_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now()),
                compliance_status: row.get(3)?,
                compliance_score: row.get(4)?,
                risk_level: row.get(5)?,
                risk_score: row.get(6)?,
            })
        });

        match rows {
            Ok(iter) => iter.flatten().collect(),
            Err(e) => {
                error!("[clauselens] list_recent rows failed: {:?}", e);
                vec![]
            }
        }
    }
}

impl Clone for SqliteStore {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub id: String,
    pub clause_excerpt: String,
    pub created_at: DateTime<Utc>,
    pub compliance_status: String,
    pub compliance_score: Option<f64>,
    pub risk_level: Option<String>,
    pub risk_score: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Default)]
pub struct HistoryStats {
    pub total_analyses: u64,
    pub avg_readability_gain: Option<f64>,
    pub avg_compliance_score: Option<f64>,
    pub avg_risk_score: Option<f64>,
    pub compliance_issues_found: u64,
    /// Widest translation coverage seen on any single analysis.
    pub languages_supported: u64,
    pub by_status: std::collections::HashMap<String, u64>,
}

#[derive(Clone)]
pub struct HistoryStore {
    cache: Arc<DashMap<String, AnalysisRecord>>,
    db: SqliteStore,
}

impl HistoryStore {
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        let db = SqliteStore::new(db_path)?;
        Ok(Self {
            cache: Arc::new(DashMap::new()),
            db,
        })
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self {
            cache: Arc::new(DashMap::new()),
            db: SqliteStore::open_in_memory()?,
        })
    }

    pub fn insert(&self, record: AnalysisRecord) {
        self.cache.insert(record.id.clone(), record.clone());
        let db = self.db.clone();
        let _ = tokio::task::spawn_blocking(move || {
            db.insert(&record);
        });
    }

    /// Insert without deferring the SQLite write, so reads that bypass
    /// the cache see the record immediately.
    #[cfg(test)]
    pub(crate) fn insert_sync(&self, record: AnalysisRecord) {
        self.cache.insert(record.id.clone(), record.clone());
        self.db.insert(&record);
    }

    pub fn get(&self, id: &str) -> Option<AnalysisRecord> {
        // DashMap first (hot cache)
        if let Some(r) = self.cache.get(id) {
            return Some(r.value().clone());
        }
        // SQLite fallback
        let record = self.db.get(id)?;
        // Populate cache for future reads
        self.cache.insert(record.id.clone(), record.clone());
        Some(record)
    }

    pub fn cleanup_cache(&self, max_age: std::time::Duration) {
        let cutoff = Utc::now() - chrono::Duration::from_std(max_age).unwrap_or_default();
        let before = self.cache.len();
        self.cache.retain(|_, record| record.created_at > cutoff);
        let removed = before - self.cache.len();
        if removed > 0 {
            info!("[clauselens] Evicted {} analyses from cache", removed);
        }
    }

    pub fn get_stats(&self) -> HistoryStats {
        self.db.get_stats()
    }

    pub fn list_recent(&self, limit: u64) -> Vec<AnalysisSummary> {
        self.db.list_recent(limit)
    }
}
