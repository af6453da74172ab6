use crate::history::{AnalysisSummary, ComplianceStatus, HistoryStats};

use super::layout;
use super::text::html_escape;

/// Usage analytics page: aggregate stat cards plus the most recent analyses.
pub fn render(stats: &HistoryStats, recent: &[AnalysisSummary]) -> String {
    let avg_gain = stats
        .avg_readability_gain
        .map(|g| format!("{:+.1}", g))
        .unwrap_or_else(|| "\u{2014}".to_string());
    let avg_compliance = stats
        .avg_compliance_score
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "\u{2014}".to_string());

    let mut body = format!(
        r#"        <div class="stat-grid">
            <div class="stat-card"><div class="stat-value">{total}</div><div class="stat-label">Analyses</div></div>
            <div class="stat-card"><div class="stat-value">{avg_gain}</div><div class="stat-label">Avg readability gain</div></div>
            <div class="stat-card"><div class="stat-value">{avg_compliance}</div><div class="stat-label">Avg compliance score</div></div>
            <div class="stat-card"><div class="stat-value">{issues}</div><div class="stat-label">Issues flagged</div></div>
            <div class="stat-card"><div class="stat-value">{languages}</div><div class="stat-label">Languages covered</div></div>
        </div>"#,
        total = stats.total_analyses,
        avg_gain = avg_gain,
        avg_compliance = avg_compliance,
        issues = stats.compliance_issues_found,
        languages = stats.languages_supported,
    );

    body.push_str(r#"<div class="card"><div class="card-header">Recent analyses</div>"#);
    if recent.is_empty() {
        body.push_str(r#"<div class="card-body"><div class="empty-note">No analyses recorded yet</div></div>"#);
    } else {
        body.push_str(
            r#"<table class="metrics-table">
            <tr><th>When</th><th>Clause</th><th>Verdict</th><th>Risk</th><th></th></tr>"#,
        );
        for summary in recent {
            body.push_str(&summary_row(summary));
        }
        body.push_str("</table>");
    }
    body.push_str("</div>");

    layout::page(
        "Analytics \u{2014} clauselens",
        "analytics",
        layout::nav_links(),
        &body,
    )
}

fn summary_row(summary: &AnalysisSummary) -> String {
    let status = ComplianceStatus::from_str(&summary.compliance_status);
    let risk = match (&summary.risk_level, summary.risk_score) {
        (Some(level), Some(score)) => format!("{} ({})", level, score),
        (Some(level), None) => level.clone(),
        (None, Some(score)) => score.to_string(),
        (None, None) => "\u{2014}".to_string(),
    };
    format!(
        r#"<tr>
            <td class="muted">{}</td>
            <td>{}</td>
            <td><span class="status-badge compliance-{}"><span class="status-dot"></span>{}</span></td>
            <td>{}</td>
            <td><a href="/analysis/{}">view</a></td>
        </tr>"#,
        summary.created_at.format("%Y-%m-%d %H:%M"),
        html_escape(&summary.clause_excerpt),
        status.as_str(),
        status.label(),
        html_escape(&risk),
        html_escape(&summary.id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stats() -> HistoryStats {
        HistoryStats {
            total_analyses: 12,
            avg_readability_gain: Some(18.34),
            avg_compliance_score: Some(81.2),
            avg_risk_score: Some(4.1),
            compliance_issues_found: 7,
            languages_supported: 5,
            by_status: Default::default(),
        }
    }

    #[test]
    fn renders_stat_cards_and_rows() {
        let recent = vec![AnalysisSummary {
            id: "abc123def456".into(),
            clause_excerpt: "No claim shall be payable\u{2026}".into(),
            created_at: Utc::now(),
            compliance_status: "needs_review".into(),
            compliance_score: Some(72.0),
            risk_level: Some("Medium".into()),
            risk_score: Some(6.5),
        }];
        let html = render(&stats(), &recent);
        assert!(html.contains("+18.3"));
        assert!(html.contains("Issues flagged"));
        assert!(html.contains("compliance-needs_review"));
        assert!(html.contains("Medium (6.5)"));
        assert!(html.contains(r#"href="/analysis/abc123def456""#));
    }

    #[test]
    fn empty_history_shows_placeholder() {
        let html = render(&HistoryStats::default(), &[]);
        assert!(html.contains("No analyses recorded yet"));
        assert!(html.contains("\u{2014}"));
    }
}
