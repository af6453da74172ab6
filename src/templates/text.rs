use std::sync::LazyLock;

use regex::Regex;

/// Numbered ALL-CAPS headings inside generated training text, e.g.
/// `1. POLICY OVERVIEW:`.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\s*[A-Z][A-Z\s]+):").unwrap());

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Format a free-text training module for display: numbered ALL-CAPS
/// headings become subheadings, blank lines become paragraph breaks and
/// single newlines become line breaks. Escaping happens before any markup
/// is introduced, so analyzer text can never smuggle tags in.
pub fn format_module_text(content: &str) -> String {
    let escaped = html_escape(content).replace("\r\n", "\n");
    let with_headings =
        HEADING_RE.replace_all(&escaped, r#"<h6 class="module-heading">$1:</h6>"#);
    let body = with_headings.replace("\n\n", "</p><p>").replace('\n', "<br>");
    format!("<p>{}</p>", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            html_escape(r#"<b>"claims" & 'riders'</b>"#),
            "&lt;b&gt;&quot;claims&quot; &amp; &#39;riders&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn promotes_numbered_caps_headings() {
        let out = format_module_text("1. POLICY OVERVIEW: This module covers exclusions.");
        assert!(out.contains(r#"<h6 class="module-heading">1. POLICY OVERVIEW:</h6>"#));
        assert!(out.starts_with("<p>"));
        assert!(out.ends_with("</p>"));
    }

    #[test]
    fn leaves_ordinary_numbered_text_alone() {
        // Mixed-case heading text must not be promoted.
        let out = format_module_text("1. Policy overview: this is prose.");
        assert!(!out.contains("module-heading"));
    }

    #[test]
    fn blank_lines_split_paragraphs_and_newlines_break() {
        let out = format_module_text("First paragraph.\n\nSecond paragraph.\nSecond line.");
        assert_eq!(
            out,
            "<p>First paragraph.</p><p>Second paragraph.<br>Second line.</p>"
        );
    }

    #[test]
    fn escapes_before_formatting() {
        let out = format_module_text("1. SCOPE OF COVER: <script>alert(1)</script>");
        assert!(out.contains("&lt;script&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn windows_line_endings_are_normalized() {
        let out = format_module_text("One.\r\n\r\nTwo.");
        assert_eq!(out, "<p>One.</p><p>Two.</p>");
    }
}
