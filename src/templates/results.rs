use std::sync::OnceLock;

use crate::history::AnalysisRecord;
use crate::report::{
    AnalysisReport, MatchTier, QuizQuestion, SimilarClause, Translation,
};

use super::layout::{self, inline_alert};
use super::text::{format_module_text, html_escape};

/// Logical sections of an analysis, in the order they appear on the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Overview,
    PlainEnglish,
    Compliance,
    Scenario,
    Multilingual,
    Risk,
    Training,
    Benchmark,
}

impl Section {
    pub const ALL: [Section; 8] = [
        Section::Overview,
        Section::PlainEnglish,
        Section::Compliance,
        Section::Scenario,
        Section::Multilingual,
        Section::Risk,
        Section::Training,
        Section::Benchmark,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::PlainEnglish => "plain-english",
            Section::Compliance => "compliance",
            Section::Scenario => "scenario",
            Section::Multilingual => "translations",
            Section::Risk => "risk",
            Section::Training => "training",
            Section::Benchmark => "benchmark",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::PlainEnglish => "Plain English",
            Section::Compliance => "Compliance",
            Section::Scenario => "Customer scenario",
            Section::Multilingual => "Translations",
            Section::Risk => "Risk",
            Section::Training => "Training materials",
            Section::Benchmark => "Market benchmark",
        }
    }
}

type RenderFn = fn(&AnalysisReport) -> Option<String>;

struct SectionBinding {
    section: Section,
    render: RenderFn,
}

/// Binding table from logical section to the block that renders it. Checked
/// for completeness at startup so a section nobody renders cannot ship.
pub struct SectionTable {
    bindings: Vec<SectionBinding>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self {
            bindings: vec![
                SectionBinding { section: Section::Overview, render: render_overview },
                SectionBinding { section: Section::PlainEnglish, render: render_plain_english },
                SectionBinding { section: Section::Compliance, render: render_compliance },
                SectionBinding { section: Section::Scenario, render: render_scenario },
                SectionBinding { section: Section::Multilingual, render: render_multilingual },
                SectionBinding { section: Section::Risk, render: render_risk },
                SectionBinding { section: Section::Training, render: render_training },
                SectionBinding { section: Section::Benchmark, render: render_benchmark },
            ],
        }
    }

    /// Every section in [`Section::ALL`] must have a binding; returns the
    /// titles of any that do not.
    pub fn verify_complete(&self) -> Result<(), Vec<&'static str>> {
        let missing: Vec<&'static str> = Section::ALL
            .iter()
            .filter(|section| !self.bindings.iter().any(|b| b.section == **section))
            .map(|section| section.title())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

impl Default for SectionTable {
    fn default() -> Self {
        Self::new()
    }
}

pub fn section_table() -> &'static SectionTable {
    static TABLE: OnceLock<SectionTable> = OnceLock::new();
    TABLE.get_or_init(SectionTable::new)
}

pub struct RenderedSection {
    pub section: Section,
    pub html: String,
}

/// View-model for one render pass: built empty, filled from a report by
/// `apply`, then read out by the page assembler. Nothing in here touches
/// shared state, so concurrent renders cannot see each other.
pub struct ResultsView<'t> {
    table: &'t SectionTable,
    sections: Vec<RenderedSection>,
    skipped: Vec<Section>,
}

impl<'t> ResultsView<'t> {
    pub fn new(table: &'t SectionTable) -> Self {
        Self {
            table,
            sections: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn apply(&mut self, report: &AnalysisReport) {
        self.sections.clear();
        self.skipped.clear();
        for binding in &self.table.bindings {
            match (binding.render)(report) {
                Some(html) => self.sections.push(RenderedSection {
                    section: binding.section,
                    html,
                }),
                None => self.skipped.push(binding.section),
            }
        }
    }

    pub fn rendered(&self) -> &[RenderedSection] {
        &self.sections
    }

    pub fn skipped(&self) -> &[Section] {
        &self.skipped
    }
}

/// Full analysis page for one stored record. The caller builds the view so
/// it can inspect what rendered and what was skipped.
pub fn analysis_page(record: &AnalysisRecord, view: &ResultsView<'_>, base_url: &str) -> String {
    let status = record.compliance_status;
    let header_badge = format!(
        r#"<span class="status-badge compliance-{}" aria-label="Compliance status: {}"><span class="status-dot"></span>{}</span>"#,
        status.as_str(),
        status.label(),
        status.label(),
    );

    let mut body = String::new();
    if view.rendered().is_empty() {
        body.push_str(
            r#"<div class="empty-note">The analyzer returned no sections for this clause.</div>"#,
        );
    }
    for rendered in view.rendered() {
        body.push_str(&section_card(rendered.section, &rendered.html));
    }

    body.push_str(&format!(
        r#"<div class="card">
            <div class="card-header">Metadata</div>
            <div class="row"><span class="row-label">Analysis ID</span><span class="row-value mono">{}</span></div>
            <div class="row last"><span class="row-label">Analyzed</span><span class="row-value">{}</span></div>
        </div>"#,
        html_escape(&record.id),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
    ));

    let share_url = format!("{}/analysis/{}", base_url, record.id);
    body.push_str(&format!(
        r#"<div class="share-bar">
            <span class="share-url" id="share-url">{}</span>
            <button class="copy-btn" onclick="navigator.clipboard.writeText(document.getElementById('share-url').textContent)">Copy</button>
        </div>"#,
        html_escape(&share_url),
    ));

    layout::page(
        &format!("Analysis {} \u{2014} clauselens", record.id),
        "analysis",
        &header_badge,
        &body,
    )
}

fn section_card(section: Section, inner: &str) -> String {
    format!(
        r#"<section class="card" id="{}">
            <div class="card-header">{}</div>
            <div class="card-body">{}</div>
        </section>"#,
        section.anchor(),
        section.title(),
        inner,
    )
}

fn render_overview(report: &AnalysisReport) -> Option<String> {
    let meta = report.enterprise_metadata.as_ref()?;
    let analysis_id = report.analysis_id.as_deref().unwrap_or("\u{2014}");
    let model = report.processing_model.as_deref().unwrap_or("Enterprise AI");
    let processing_time = meta
        .processing_time_ms()
        .map(|ms| format!("{} ms", ms))
        .unwrap_or_else(|| "\u{2014}".to_string());
    Some(format!(
        r#"<div class="metric-grid">
            <div class="metric"><span class="metric-label">Analysis ID</span><span class="metric-value mono">{}</span></div>
            <div class="metric"><span class="metric-label">Model</span><span class="metric-value"><span class="badge badge-info">{}</span></span></div>
            <div class="metric"><span class="metric-label">Confidence</span><span class="metric-value"><span class="badge badge-success">{:.1}%</span></span></div>
            <div class="metric"><span class="metric-label">Processing time</span><span class="metric-value">{}</span></div>
        </div>"#,
        html_escape(analysis_id),
        html_escape(model),
        meta.processing_confidence * 100.0,
        processing_time,
    ))
}

fn render_plain_english(report: &AnalysisReport) -> Option<String> {
    let plain = report.plain_english.as_ref()?;
    let mut out = String::new();

    if let Some(original) = report.original_clause.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!(
            r#"<div class="subsection">Original clause</div><div class="clause-text">{}</div>"#,
            html_escape(original),
        ));
    }
    out.push_str(&format!(
        r#"<div class="subsection">Plain English rewrite</div><div class="clause-text">{}</div>"#,
        html_escape(&plain.plain_english_text),
    ));

    out.push_str(&format!(
        r#"<div class="subsection">Readability</div>
        <table class="metrics-table">
            <tr><th></th><th>Flesch score</th><th>Grade level</th><th>Words</th></tr>
            <tr><td>Original</td><td>{}</td><td>{}</td><td>{}</td></tr>
            <tr><td>Rewritten</td><td>{}</td><td>{}</td><td>{}</td></tr>
        </table>"#,
        plain.original_metrics.flesch_score,
        plain.original_metrics.grade_level,
        plain.original_metrics.word_count,
        plain.improved_metrics.flesch_score,
        plain.improved_metrics.grade_level,
        plain.improved_metrics.word_count,
    ));

    let irdai = if plain.meets_irdai_standards {
        r#"<span class="badge badge-success">Yes</span>"#
    } else {
        r#"<span class="badge badge-warning">No</span>"#
    };
    out.push_str(&format!(
        r#"<div class="row"><span class="row-label">Readability improvement</span><span class="row-value">{:+} points</span></div>
        <div class="row last"><span class="row-label">Meets IRDAI standards</span><span class="row-value">{}</span></div>"#,
        plain.readability_improvement, irdai,
    ));

    Some(out)
}

fn render_compliance(report: &AnalysisReport) -> Option<String> {
    let check = report.compliance_check.as_ref()?;
    let mut out = format!(
        r#"<div class="score-hero"><div class="score-value">{}</div><div class="score-note">compliance score</div></div>
        <div class="row"><span class="row-label">Status</span><span class="row-value"><span class="status-badge {}"><span class="status-dot"></span>{}</span></span></div>"#,
        check.compliance_score,
        html_escape(&check.status_class()),
        html_escape(&check.status_label()),
    );

    out.push_str(r#"<div class="subsection">Regulatory issues</div>"#);
    if check.regulatory_issues.is_empty() {
        out.push_str(&inline_alert("success", "No major issues found"));
    } else {
        for issue in &check.regulatory_issues {
            out.push_str(&inline_alert("warning", issue));
        }
    }

    out.push_str(r#"<div class="subsection">Recommendations</div>"#);
    if check.recommendations.is_empty() {
        out.push_str(&inline_alert("info", "No recommendations provided"));
    } else {
        for recommendation in &check.recommendations {
            out.push_str(&inline_alert("info", recommendation));
        }
    }

    Some(out)
}

fn render_scenario(report: &AnalysisReport) -> Option<String> {
    let scenario = report.customer_scenario.as_ref()?;
    let blocks = [
        ("Main scenario", &scenario.main_scenario),
        ("Simple explanation", &scenario.simple_explanation),
        ("Real-life examples", &scenario.real_life_examples),
        ("Customer conversation script", &scenario.customer_script),
    ];
    let mut out = String::new();
    for (title, text) in blocks {
        if text.is_empty() {
            continue;
        }
        out.push_str(&format!(
            r#"<div class="subsection">{}</div><div class="clause-text">{}</div>"#,
            title,
            html_escape(text),
        ));
    }
    if out.is_empty() {
        out.push_str(r#"<div class="empty-note">No scenario details provided</div>"#);
    }
    Some(out)
}

fn render_multilingual(report: &AnalysisReport) -> Option<String> {
    let multilingual = report.multilingual.as_ref()?;
    if multilingual.translations.is_empty() {
        return Some(r#"<div class="empty-note">No translations available</div>"#.to_string());
    }
    // Map iteration order is the order the analyzer emitted.
    let mut cards = String::new();
    for (code, value) in &multilingual.translations {
        let translation: Translation = serde_json::from_value(value.clone()).unwrap_or_default();
        let name = if translation.language_name.is_empty() {
            code.as_str()
        } else {
            translation.language_name.as_str()
        };
        cards.push_str(&format!(
            r#"<div class="translation-card"><div class="translation-lang">{}</div><p>{}</p></div>"#,
            html_escape(name),
            html_escape(&translation.translated_text),
        ));
    }
    Some(format!(r#"<div class="translation-grid">{}</div>"#, cards))
}

fn render_risk(report: &AnalysisReport) -> Option<String> {
    let risk = report.risk_score.as_ref()?;
    let level_badge = if risk.risk_level.is_empty() {
        String::new()
    } else {
        format!(
            r#"<span class="badge {}">{} risk</span>"#,
            risk.level_badge_class(),
            html_escape(&risk.risk_level),
        )
    };
    let mut out = format!(
        r#"<div class="score-hero"><div class="score-value">{}</div><div class="score-note">{}</div></div>"#,
        risk.risk_score, level_badge,
    );

    if !risk.financial_risk.is_empty() {
        out.push_str(&format!(
            r#"<div class="row"><span class="row-label">Financial risk</span><span class="row-value">{}</span></div>"#,
            html_escape(&risk.financial_risk),
        ));
    }
    if !risk.dispute_potential.is_empty() {
        out.push_str(&format!(
            r#"<div class="row last"><span class="row-label">Dispute potential</span><span class="row-value">{}</span></div>"#,
            html_escape(&risk.dispute_potential),
        ));
    }
    if !risk.explanation.is_empty() {
        out.push_str(&format!(
            r#"<div class="subsection">Why this score</div><div class="clause-text">{}</div>"#,
            html_escape(&risk.explanation),
        ));
    }
    if risk.requires_underwriter_review {
        out.push_str(&inline_alert(
            "warning",
            "Requires underwriter review before issuance",
        ));
    }

    out.push_str(r#"<div class="subsection">Mitigation suggestions</div>"#);
    if risk.mitigation_suggestions.is_empty() {
        out.push_str(&inline_alert("light", "No mitigation suggestions provided"));
    } else {
        for suggestion in &risk.mitigation_suggestions {
            out.push_str(&inline_alert("light", suggestion));
        }
    }

    Some(out)
}

fn render_training(report: &AnalysisReport) -> Option<String> {
    let training = report.training_materials.as_ref()?;
    let audience = training.target_audience.as_deref().unwrap_or("Not specified");
    let difficulty = training.difficulty_level.as_deref().unwrap_or("Not specified");
    let duration = training.estimated_duration.as_deref().unwrap_or("Not specified");

    let mut out = format!(
        r#"<div class="metric-grid">
            <div class="metric"><span class="metric-label">Audience</span><span class="metric-value">{}</span></div>
            <div class="metric"><span class="metric-label">Difficulty</span><span class="metric-value">{}</span></div>
            <div class="metric"><span class="metric-label">Duration</span><span class="metric-value">{}</span></div>
        </div>"#,
        html_escape(audience),
        html_escape(difficulty),
        html_escape(duration),
    );

    let module = training
        .training_module
        .as_deref()
        .unwrap_or("Training module content will be displayed here.");
    out.push_str(&format!(
        r#"<div class="subsection">Module</div><div class="module-text">{}</div>"#,
        format_module_text(module),
    ));

    if let Some(objectives) = &training.training_objectives {
        out.push_str(r#"<div class="subsection">Objectives</div>"#);
        for objective in objectives {
            out.push_str(&format!(
                r#"<div class="check-row">{}</div>"#,
                html_escape(objective),
            ));
        }
    }

    out.push_str(r#"<div class="subsection">Quiz</div>"#);
    if training.quiz_questions.is_empty() {
        out.push_str(&inline_alert(
            "info",
            "Quiz questions will be generated based on clause complexity",
        ));
    } else {
        for (i, question) in training.quiz_questions.iter().enumerate() {
            out.push_str(&quiz_card(i + 1, question));
        }
    }

    out.push_str(r#"<div class="subsection">Key learning points</div>"#);
    if training.key_learning_points.is_empty() {
        out.push_str(&inline_alert(
            "info",
            "Learning points will be customized for your training needs",
        ));
    } else {
        for (i, point) in training.key_learning_points.iter().enumerate() {
            out.push_str(&format!(
                r#"<div class="key-point"><strong>Key Point {}:</strong> {}</div>"#,
                i + 1,
                html_escape(point),
            ));
        }
    }

    let prose_blocks = [
        ("Practical examples", &training.practical_examples),
        ("Role-play scenarios", &training.role_play_scenarios),
        ("Common mistakes", &training.common_mistakes),
    ];
    for (title, text) in prose_blocks {
        if let Some(text) = text {
            out.push_str(&format!(
                r#"<div class="subsection">{}</div><div class="prose">{}</div>"#,
                title,
                html_escape(text),
            ));
        }
    }

    if let Some(criteria) = &training.assessment_criteria {
        out.push_str(r#"<div class="subsection">Assessment criteria</div>"#);
        for criterion in criteria {
            out.push_str(&format!(
                r#"<div class="check-row">{}</div>"#,
                html_escape(criterion),
            ));
        }
    }

    Some(out)
}

fn render_benchmark(report: &AnalysisReport) -> Option<String> {
    let benchmark = report.benchmark_analysis.as_ref()?;

    // A missing score shows a placeholder and, deliberately, no tier badge.
    let score_text = benchmark
        .similarity_score
        .map(|score| format!("{}%", score))
        .unwrap_or_else(|| "--".to_string());
    let tier_badge = benchmark
        .similarity_score
        .map(|score| {
            let tier = MatchTier::from_score(score);
            format!(
                r#"<span class="badge {}">{}</span>"#,
                tier.badge_class(),
                tier.label(),
            )
        })
        .unwrap_or_default();
    let mut out = format!(
        r#"<div class="score-hero"><div class="score-value">{}</div><div class="score-note">benchmark similarity {}</div></div>"#,
        score_text, tier_badge,
    );

    out.push_str(r#"<div class="subsection">Summary</div>"#);
    let summary = benchmark
        .analysis_summary
        .as_deref()
        .unwrap_or("No analysis summary available.");
    out.push_str(&format!(
        r#"<div class="clause-text">{}</div>"#,
        html_escape(summary),
    ));

    out.push_str(r#"<div class="subsection">Similar clauses</div>"#);
    if benchmark.similar_clauses.is_empty() {
        out.push_str(&inline_alert("light", "No similar clauses found"));
    } else {
        for (i, clause) in benchmark.similar_clauses.iter().enumerate() {
            out.push_str(&similar_clause_block(i + 1, clause));
        }
    }

    out.push_str(r#"<div class="subsection">Industry comparison</div>"#);
    match &benchmark.industry_comparison {
        Some(comparison) => {
            let standard = comparison.standard.as_deref().unwrap_or("Not available");
            let rating = comparison.rating.as_deref().unwrap_or("Not rated");
            let recommendation = comparison
                .recommendation
                .as_deref()
                .unwrap_or("No specific recommendation");
            out.push_str(&format!(
                r#"<div class="row"><span class="row-label">Standard</span><span class="row-value">{}</span></div>
                <div class="row"><span class="row-label">Rating</span><span class="row-value">{}</span></div>
                <div class="row last"><span class="row-label">Recommendation</span><span class="row-value">{}</span></div>"#,
                html_escape(standard),
                html_escape(rating),
                html_escape(recommendation),
            ));
        }
        None => out.push_str(&inline_alert("light", "No industry comparison available")),
    }

    Some(out)
}

fn quiz_card(number: usize, question: &QuizQuestion) -> String {
    match question {
        QuizQuestion::Text(text) => format!(
            r#"<div class="quiz-card"><div class="quiz-head"><strong>Q{}.</strong></div><p>{}</p></div>"#,
            number,
            html_escape(text),
        ),
        QuizQuestion::Structured {
            question,
            options,
            correct_answer,
            explanation,
            difficulty,
        } => {
            let difficulty_badge = difficulty
                .as_deref()
                .map(|d| format!(r#"<span class="badge badge-secondary">{}</span>"#, html_escape(d)))
                .unwrap_or_default();
            let mut inner = format!(
                r#"<div class="quiz-head"><strong>Q{}. {}</strong>{}</div>"#,
                number,
                html_escape(question),
                difficulty_badge,
            );
            for option in options {
                inner.push_str(&format!(
                    r#"<div class="quiz-option">{}</div>"#,
                    html_escape(option),
                ));
            }
            if let Some(answer) = correct_answer {
                inner.push_str(&format!(
                    r#"<div class="quiz-answer"><strong>Answer:</strong> {}</div>"#,
                    html_escape(answer),
                ));
            }
            if let Some(explanation) = explanation {
                inner.push_str(&format!(
                    r#"<div class="quiz-explanation">{}</div>"#,
                    html_escape(explanation),
                ));
            }
            format!(r#"<div class="quiz-card">{}</div>"#, inner)
        }
    }
}

fn similar_clause_block(number: usize, clause: &SimilarClause) -> String {
    let (text, similarity) = match clause {
        SimilarClause::Entry { text, similarity } => (text.as_str(), *similarity),
        SimilarClause::Text(text) => (text.as_str(), None),
    };
    let similarity = similarity
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        r#"<div class="similar-clause"><strong>Match {} ({}% similar):</strong> {}</div>"#,
        number,
        similarity,
        html_escape(text),
    )
}
