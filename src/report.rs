use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One analyzed clause as returned by the analyzer. Every section is
/// optional; a missing section simply does not render.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_clause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_english: Option<PlainEnglish>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_check: Option<ComplianceCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_scenario: Option<CustomerScenario>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multilingual: Option<Multilingual>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<RiskScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_materials: Option<TrainingMaterials>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_analysis: Option<BenchmarkAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_metadata: Option<EnterpriseMetadata>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlainEnglish {
    #[serde(default)]
    pub plain_english_text: String,
    #[serde(default)]
    pub original_metrics: ReadabilityMetrics,
    #[serde(default)]
    pub improved_metrics: ReadabilityMetrics,
    #[serde(default)]
    pub readability_improvement: f64,
    #[serde(default)]
    pub meets_irdai_standards: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReadabilityMetrics {
    #[serde(default)]
    pub flesch_score: f64,
    #[serde(default)]
    pub grade_level: f64,
    #[serde(default)]
    pub word_count: u64,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ComplianceCheck {
    #[serde(default)]
    pub compliance_score: f64,
    /// Verdict string such as `compliant`, `needs_review` or `high_risk`.
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub regulatory_issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl ComplianceCheck {
    /// Human label for the verdict: underscores become spaces, upper-cased.
    pub fn status_label(&self) -> String {
        self.status.replace('_', " ").to_uppercase()
    }

    pub fn status_class(&self) -> String {
        format!("compliance-{}", self.status)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CustomerScenario {
    #[serde(default)]
    pub main_scenario: String,
    #[serde(default)]
    pub simple_explanation: String,
    #[serde(default)]
    pub real_life_examples: String,
    #[serde(default)]
    pub customer_script: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Multilingual {
    /// Language code -> translation, kept in the order the analyzer emitted.
    #[serde(default)]
    pub translations: serde_json::Map<String, Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Translation {
    #[serde(default)]
    pub language_name: String,
    #[serde(default)]
    pub translated_text: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RiskScore {
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub financial_risk: String,
    #[serde(default)]
    pub dispute_potential: String,
    #[serde(default)]
    pub mitigation_suggestions: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub requires_underwriter_review: bool,
}

impl RiskScore {
    pub fn level_badge_class(&self) -> &'static str {
        match self.risk_level.as_str() {
            "High" => "badge-danger",
            "Medium" => "badge-warning",
            _ => "badge-success",
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingMaterials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration: Option<String>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub key_learning_points: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub training_objectives: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practical_examples: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_play_scenarios: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_mistakes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment_criteria: Option<Vec<String>>,
}

/// Quiz entries come back either as structured objects or as bare strings,
/// depending on how much the generator could extract.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizQuestion {
    Structured {
        #[serde(default)]
        question: String,
        #[serde(default)]
        options: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        correct_answer: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        difficulty: Option<String>,
    },
    Text(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkAnalysis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_summary: Option<String>,
    #[serde(default)]
    pub similar_clauses: Vec<SimilarClause>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_comparison: Option<IndustryComparison>,
}

/// Similar-clause entries are objects with text and a similarity figure,
/// or a bare string when the benchmark corpus had no score for the match.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SimilarClause {
    Entry {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        similarity: Option<f64>,
    },
    Text(String),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IndustryComparison {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EnterpriseMetadata {
    /// Fraction in [0, 1]; rendered as a one-decimal percentage.
    #[serde(default)]
    pub processing_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_metrics: Option<ProcessingMetrics>,
}

impl EnterpriseMetadata {
    pub fn processing_time_ms(&self) -> Option<f64> {
        self.processing_metrics
            .as_ref()
            .and_then(|m| m.performance_metrics.as_ref())
            .and_then(|p| p.processing_time_ms)
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProcessingMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

/// Summary the analyzer returns for a whole-document upload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UploadOutcome {
    #[serde(default)]
    pub clauses_analyzed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

/// How closely a clause matches the benchmark corpus. Scores of 80 and up
/// count as a high match, 60 and up as medium, anything else as low.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchTier {
    High,
    Medium,
    Low,
}

impl MatchTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            MatchTier::High
        } else if score >= 60.0 {
            MatchTier::Medium
        } else {
            MatchTier::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::High => "High Match",
            MatchTier::Medium => "Medium Match",
            MatchTier::Low => "Low Match",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            MatchTier::High => "badge-success",
            MatchTier::Medium => "badge-warning",
            MatchTier::Low => "badge-danger",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_tier_boundaries() {
        assert_eq!(MatchTier::from_score(80.0), MatchTier::High);
        assert_eq!(MatchTier::from_score(95.5), MatchTier::High);
        assert_eq!(MatchTier::from_score(79.9), MatchTier::Medium);
        assert_eq!(MatchTier::from_score(60.0), MatchTier::Medium);
        assert_eq!(MatchTier::from_score(59.9), MatchTier::Low);
        assert_eq!(MatchTier::from_score(0.0), MatchTier::Low);
    }

    #[test]
    fn status_label_replaces_underscores() {
        let check = ComplianceCheck {
            status: "needs_review".to_string(),
            ..Default::default()
        };
        assert_eq!(check.status_label(), "NEEDS REVIEW");
        assert_eq!(check.status_class(), "compliance-needs_review");
    }

    #[test]
    fn risk_level_maps_to_badge_class() {
        let high = RiskScore { risk_level: "High".into(), ..Default::default() };
        let medium = RiskScore { risk_level: "Medium".into(), ..Default::default() };
        let low = RiskScore { risk_level: "Low".into(), ..Default::default() };
        assert_eq!(high.level_badge_class(), "badge-danger");
        assert_eq!(medium.level_badge_class(), "badge-warning");
        assert_eq!(low.level_badge_class(), "badge-success");
    }

    #[test]
    fn quiz_questions_decode_both_shapes() {
        let json = serde_json::json!([
            "What does this clause exclude?",
            {
                "question": "Which waiting period applies?",
                "options": ["30 days", "90 days"],
                "correct_answer": "30 days"
            }
        ]);
        let questions: Vec<QuizQuestion> = serde_json::from_value(json).unwrap();
        assert!(matches!(questions[0], QuizQuestion::Text(_)));
        match &questions[1] {
            QuizQuestion::Structured { question, options, correct_answer, .. } => {
                assert_eq!(question, "Which waiting period applies?");
                assert_eq!(options.len(), 2);
                assert_eq!(correct_answer.as_deref(), Some("30 days"));
            }
            other => panic!("expected structured question, got {:?}", other),
        }
    }

    #[test]
    fn similar_clauses_decode_both_shapes() {
        let json = serde_json::json!([
            { "text": "Pre-existing conditions are excluded.", "similarity": 82.5 },
            "Standard exclusion wording"
        ]);
        let clauses: Vec<SimilarClause> = serde_json::from_value(json).unwrap();
        match &clauses[0] {
            SimilarClause::Entry { similarity, .. } => assert_eq!(*similarity, Some(82.5)),
            other => panic!("expected entry, got {:?}", other),
        }
        assert!(matches!(clauses[1], SimilarClause::Text(_)));
    }

    #[test]
    fn partial_report_decodes_with_sections_missing() {
        let json = serde_json::json!({
            "analysis_id": "abc123def456",
            "risk_score": { "risk_score": 7.5, "risk_level": "High" }
        });
        let report: AnalysisReport = serde_json::from_value(json).unwrap();
        assert_eq!(report.analysis_id.as_deref(), Some("abc123def456"));
        assert!(report.risk_score.is_some());
        assert!(report.plain_english.is_none());
        assert!(report.compliance_check.is_none());
        assert!(report.benchmark_analysis.is_none());
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let json = serde_json::json!({
            "compliance_check": {
                "compliance_score": 85,
                "status": "compliant",
                "vague_language_detected": ["reasonable care"],
                "some_future_field": { "nested": true }
            }
        });
        let report: AnalysisReport = serde_json::from_value(json).unwrap();
        let check = report.compliance_check.unwrap();
        assert_eq!(check.compliance_score, 85.0);
        assert_eq!(check.status, "compliant");
    }

    #[test]
    fn processing_time_survives_partial_metadata() {
        let full: EnterpriseMetadata = serde_json::from_value(serde_json::json!({
            "processing_confidence": 0.94,
            "processing_metrics": {
                "performance_metrics": { "processing_time_ms": 1250.0 }
            }
        }))
        .unwrap();
        assert_eq!(full.processing_time_ms(), Some(1250.0));

        let bare: EnterpriseMetadata = serde_json::from_value(serde_json::json!({
            "processing_confidence": 0.94
        }))
        .unwrap();
        assert_eq!(bare.processing_time_ms(), None);
    }
}
