use super::text::html_escape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

impl AlertKind {
    fn css_class(self) -> &'static str {
        match self {
            AlertKind::Error => "alert-danger",
            AlertKind::Success => "alert-success",
        }
    }
}

/// Banner shown above the dashboard forms after a submission.
#[derive(Clone, Debug)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<div class="alert {}" role="alert">{}</div>"#,
            self.kind.css_class(),
            html_escape(&self.message)
        )
    }
}

/// Inline alert block used inside result cards for list items and their
/// canned empty-state messages.
pub fn inline_alert(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="alert alert-{}">{}</div>"#,
        kind,
        html_escape(message)
    )
}

/// Shared page shell: header with wordmark and crumb, the page body, footer
/// and the full stylesheet.
pub fn page(title: &str, crumb: &str, header_right: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        *, *::before, *::after {{ margin: 0; padding: 0; box-sizing: border-box; }}

        :root {{
            --bg: #ffffff;
            --bg-secondary: #f7f8fa;
            --border: #d8dce3;
            --border-light: #e8ebf0;
            --text-primary: #111827;
            --text-secondary: #4b5563;
            --text-tertiary: #9ca3af;
            --green: #16a34a;
            --green-bg: #f0fdf4;
            --green-border: #bbf7d0;
            --amber: #d97706;
            --amber-bg: #fffbeb;
            --amber-border: #fde68a;
            --red: #dc2626;
            --red-bg: #fef2f2;
            --red-border: #fecaca;
            --blue: #2563eb;
            --blue-bg: #eff6ff;
            --blue-border: #bfdbfe;
            --gray: #4b5563;
            --gray-bg: #f3f4f6;
            --gray-border: #e5e7eb;
            --link: #2563eb;
            --mono: 'SF Mono', 'Fira Code', 'JetBrains Mono', 'Cascadia Code', Menlo, monospace;
        }}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Inter', system-ui, sans-serif;
            background: var(--bg); color: var(--text-primary); min-height: 100vh;
            -webkit-font-smoothing: antialiased;
        }}

        .page {{ max-width: 720px; margin: 0 auto; padding: 3rem 1.25rem 4rem; }}

        .page-header {{
            display: flex; align-items: center; justify-content: space-between;
            margin-bottom: 1.5rem;
        }}
        .wordmark {{
            font-size: 1rem; font-weight: 600; color: var(--text-primary);
            text-decoration: none;
        }}
        .wordmark span {{ color: var(--text-tertiary); font-weight: 400; }}
        .nav {{ display: flex; gap: 0.875rem; }}
        .nav a {{ font-size: 0.8125rem; color: var(--text-secondary); text-decoration: none; }}
        .nav a:hover {{ color: var(--text-primary); }}

        .status-badge {{
            display: inline-flex; align-items: center; gap: 0.375rem;
            padding: 0.25rem 0.625rem; border-radius: 9999px; font-size: 0.75rem; font-weight: 500;
        }}
        .status-badge.compliance-compliant {{ background: var(--green-bg); color: var(--green); border: 1px solid var(--green-border); }}
        .status-badge.compliance-needs_review {{ background: var(--amber-bg); color: var(--amber); border: 1px solid var(--amber-border); }}
        .status-badge.compliance-high_risk {{ background: var(--red-bg); color: var(--red); border: 1px solid var(--red-border); }}
        .status-badge.compliance-unscored {{ background: var(--gray-bg); color: var(--gray); border: 1px solid var(--gray-border); }}
        .status-dot {{ width: 5px; height: 5px; border-radius: 50%; background: currentColor; }}

        .badge {{
            display: inline-flex; align-items: center;
            padding: 0.25rem 0.625rem; border-radius: 9999px; font-size: 0.75rem; font-weight: 500;
        }}
        .badge-success {{ background: var(--green-bg); color: var(--green); border: 1px solid var(--green-border); }}
        .badge-warning {{ background: var(--amber-bg); color: var(--amber); border: 1px solid var(--amber-border); }}
        .badge-danger {{ background: var(--red-bg); color: var(--red); border: 1px solid var(--red-border); }}
        .badge-info {{ background: var(--blue-bg); color: var(--blue); border: 1px solid var(--blue-border); }}
        .badge-secondary {{ background: var(--gray-bg); color: var(--gray); border: 1px solid var(--gray-border); }}

        .alert {{
            padding: 0.625rem 0.875rem; border-radius: 6px; border: 1px solid;
            font-size: 0.8125rem; margin-bottom: 0.625rem;
        }}
        .alert-danger {{ background: var(--red-bg); color: var(--red); border-color: var(--red-border); }}
        .alert-success {{ background: var(--green-bg); color: var(--green); border-color: var(--green-border); }}
        .alert-warning {{ background: var(--amber-bg); color: var(--amber); border-color: var(--amber-border); }}
        .alert-info {{ background: var(--blue-bg); color: var(--blue); border-color: var(--blue-border); }}
        .alert-light {{ background: var(--bg-secondary); color: var(--text-secondary); border-color: var(--border-light); }}

        /* Cards */
        .card {{
            border: 1px solid var(--border); border-radius: 8px; margin-bottom: 1rem; overflow: hidden;
        }}
        .card-header {{
            font-size: 0.6875rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em;
            color: var(--text-tertiary); padding: 0.75rem 1rem 0.5rem; background: var(--bg-secondary);
            border-bottom: 1px solid var(--border-light);
        }}
        .card-body {{ padding: 0.875rem 1rem; }}
        .row {{
            display: flex; justify-content: space-between; align-items: flex-start;
            padding: 0.5rem 1rem; border-bottom: 1px solid var(--border-light); gap: 1rem;
        }}
        .card-body .row {{ padding: 0.5rem 0; }}
        .row.last {{ border-bottom: none; }}
        .row-label {{ font-size: 0.8125rem; color: var(--text-tertiary); flex-shrink: 0; white-space: nowrap; }}
        .row-value {{
            font-size: 0.8125rem; color: var(--text-primary); text-align: right; word-break: break-all;
            min-width: 0;
        }}
        .mono {{ font-family: var(--mono); font-size: 0.75rem; }}
        .muted {{ color: var(--text-tertiary); }}
        .empty-note {{ font-size: 0.8125rem; color: var(--text-tertiary); padding: 0.25rem 0; }}

        /* Section content */
        .metric-grid {{
            display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 0.75rem;
        }}
        .metric {{ display: flex; flex-direction: column; gap: 0.25rem; align-items: flex-start; }}
        .metric-label {{
            font-size: 0.6875rem; text-transform: uppercase; letter-spacing: 0.05em;
            color: var(--text-tertiary);
        }}
        .metric-value {{ font-size: 0.8125rem; color: var(--text-primary); word-break: break-all; }}

        .score-hero {{ text-align: center; padding: 0.5rem 0 0.75rem; }}
        .score-value {{ font-size: 1.75rem; font-weight: 600; letter-spacing: -0.01em; }}
        .score-note {{ color: var(--text-tertiary); font-size: 0.8125rem; margin-top: 0.125rem; }}

        .clause-text {{
            background: var(--bg-secondary); border: 1px solid var(--border-light); border-radius: 6px;
            padding: 0.625rem 0.75rem; font-size: 0.8125rem; color: var(--text-secondary);
            white-space: pre-wrap;
        }}
        .subsection {{
            font-size: 0.6875rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em;
            color: var(--text-tertiary); margin: 0.875rem 0 0.5rem;
        }}

        .metrics-table {{ width: 100%; border-collapse: collapse; font-size: 0.8125rem; }}
        .metrics-table th {{
            text-align: left; font-size: 0.6875rem; font-weight: 600; text-transform: uppercase;
            letter-spacing: 0.05em; color: var(--text-tertiary);
            padding: 0.375rem 0.5rem; border-bottom: 1px solid var(--border-light);
        }}
        .metrics-table td {{
            padding: 0.375rem 0.5rem; border-bottom: 1px solid var(--border-light);
            color: var(--text-primary);
        }}
        .metrics-table tr:last-child td {{ border-bottom: none; }}
        .metrics-table a {{ color: var(--link); text-decoration: none; }}

        .module-text p {{ margin: 0 0 0.625rem; font-size: 0.8125rem; color: var(--text-secondary); }}
        .module-heading {{
            font-size: 0.75rem; font-weight: 600; color: var(--text-primary);
            margin: 0.75rem 0 0.375rem;
        }}

        .translation-grid {{ display: grid; grid-template-columns: 1fr; gap: 0.625rem; }}
        .translation-card {{ border: 1px solid var(--border-light); border-radius: 6px; padding: 0.625rem 0.75rem; }}
        .translation-lang {{
            font-size: 0.6875rem; font-weight: 600; text-transform: uppercase; letter-spacing: 0.05em;
            color: var(--text-tertiary); margin-bottom: 0.25rem;
        }}
        .translation-card p {{ font-size: 0.8125rem; color: var(--text-primary); }}

        .quiz-card {{
            border: 1px solid var(--border-light); border-radius: 6px; padding: 0.625rem 0.75rem;
            margin-bottom: 0.625rem;
        }}
        .quiz-head {{
            display: flex; justify-content: space-between; align-items: center;
            margin-bottom: 0.375rem; font-size: 0.8125rem;
        }}
        .quiz-option {{
            font-size: 0.8125rem; color: var(--text-secondary); padding: 0.25rem 0 0.25rem 0.75rem;
            border-left: 2px solid var(--border-light); margin: 0.25rem 0;
        }}
        .quiz-answer {{ font-size: 0.8125rem; color: var(--green); margin-top: 0.375rem; }}
        .quiz-explanation {{ font-size: 0.8125rem; color: var(--text-secondary); margin-top: 0.25rem; }}

        .key-point {{
            background: var(--bg-secondary); border-left: 3px solid var(--link); border-radius: 4px;
            padding: 0.5rem 0.75rem; font-size: 0.8125rem; color: var(--text-secondary);
            margin-bottom: 0.5rem;
        }}
        .prose {{
            white-space: pre-wrap; font-size: 0.8125rem; color: var(--text-secondary);
            background: var(--bg-secondary); border: 1px solid var(--border-light); border-radius: 6px;
            padding: 0.625rem 0.75rem;
        }}
        .check-row {{ display: flex; gap: 0.5rem; font-size: 0.8125rem; color: var(--text-secondary); padding: 0.25rem 0; }}
        .check-row::before {{ content: "\2713"; color: var(--green); }}

        .similar-clause {{
            border: 1px solid var(--border-light); border-radius: 6px; padding: 0.625rem 0.75rem;
            margin-bottom: 0.625rem; font-size: 0.8125rem; color: var(--text-secondary);
        }}
        .similar-clause strong {{ color: var(--text-primary); }}

        /* Forms */
        .form-body {{ padding: 0.875rem 1rem; display: flex; flex-direction: column; gap: 0.75rem; }}
        textarea {{
            width: 100%; padding: 0.625rem 0.75rem; border: 1px solid var(--border); border-radius: 6px;
            font: inherit; font-size: 0.8125rem; resize: vertical; min-height: 120px;
        }}
        textarea:focus {{ outline: none; border-color: var(--link); }}
        input[type="file"] {{ font-size: 0.8125rem; color: var(--text-secondary); }}
        .btn {{
            align-self: flex-start; padding: 0.5rem 1rem; font-size: 0.8125rem; font-weight: 500;
            color: #ffffff; background: var(--link); border: none; border-radius: 6px; cursor: pointer;
        }}
        .btn:hover {{ background: #1d4ed8; }}

        .loading {{
            display: flex; align-items: center; gap: 0.625rem; padding: 0.875rem 1rem;
            color: var(--text-secondary); font-size: 0.8125rem;
        }}
        .loading[hidden] {{ display: none; }}
        .spinner {{
            width: 16px; height: 16px; border: 2px solid var(--border); border-top-color: var(--amber);
            border-radius: 50%; animation: spin 0.8s linear infinite; flex-shrink: 0;
        }}
        @keyframes spin {{ to {{ transform: rotate(360deg); }} }}

        /* Share link */
        .share-bar {{
            display: flex; align-items: center; justify-content: space-between;
            padding: 0.625rem 0.75rem; border: 1px solid var(--border-light);
            border-radius: 6px; background: var(--bg-secondary); margin-bottom: 1rem;
        }}
        .share-url {{
            font-family: var(--mono); font-size: 0.6875rem; color: var(--text-secondary);
            word-break: break-all; min-width: 0;
        }}
        .copy-btn {{
            flex-shrink: 0; margin-left: 0.75rem; padding: 0.25rem 0.5rem;
            font-size: 0.6875rem; font-weight: 500; color: var(--text-secondary); background: var(--bg);
            border: 1px solid var(--border); border-radius: 4px; cursor: pointer;
            transition: background 0.15s;
        }}
        .copy-btn:hover {{ background: var(--bg-secondary); }}

        /* Analytics */
        .stat-grid {{
            display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 0.75rem;
            margin-bottom: 1rem;
        }}
        .stat-card {{ border: 1px solid var(--border); border-radius: 8px; padding: 1rem; text-align: center; }}
        .stat-value {{ font-size: 1.5rem; font-weight: 600; }}
        .stat-label {{
            font-size: 0.6875rem; text-transform: uppercase; letter-spacing: 0.05em;
            color: var(--text-tertiary); margin-top: 0.25rem;
        }}

        .footer {{
            text-align: center; margin-top: 2.5rem; padding-top: 1.25rem;
            border-top: 1px solid var(--border-light); color: var(--text-tertiary); font-size: 0.75rem;
        }}
        .footer a {{ color: var(--text-tertiary); text-decoration: none; }}
        .footer a:hover {{ color: var(--text-secondary); }}
    </style>
</head>
<body>
    <div class="page">
        <div class="page-header">
            <a class="wordmark" href="/">clauselens <span>/ {crumb}</span></a>
            {header_right}
        </div>
{body}
        <div class="footer">
            <a href="/">Dashboard</a> &middot; <a href="/analytics">Analytics</a> &middot; <a href="/health">API health</a>
        </div>
    </div>
</body>
</html>"#
    )
}

/// Header navigation shown on pages that do not carry a status badge.
pub fn nav_links() -> &'static str {
    r#"<nav class="nav"><a href="/">Dashboard</a><a href="/analytics">Analytics</a></nav>"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_escapes_its_message() {
        let alert = Alert::error(r#"Error: <img src=x onerror="x">"#);
        let html = alert.to_html();
        assert!(html.contains("alert-danger"));
        assert!(html.contains("&lt;img"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn page_embeds_title_crumb_and_body() {
        let html = page("Dashboard \u{2014} clauselens", "dashboard", nav_links(), "<p>hello</p>");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Dashboard \u{2014} clauselens</title>"));
        assert!(html.contains("/ dashboard"));
        assert!(html.contains("<p>hello</p>"));
    }
}
