use super::layout::{self, Alert};

/// Landing page: clause form, document upload form and an optional outcome
/// banner from the previous submission.
pub fn render(banner: Option<&Alert>) -> String {
    let banner_html = banner.map(Alert::to_html).unwrap_or_default();

    let body = format!(
        r#"        {banner_html}
        <form method="post" action="/analyze-clause" class="card">
            <div class="card-header">Analyze a policy clause</div>
            <div class="form-body">
                <textarea name="clause_text" placeholder="Paste a policy clause, e.g. &quot;No claim shall be admissible unless written notice is received within thirty days...&quot;"></textarea>
                <button type="submit" class="btn">Analyze Clause</button>
            </div>
        </form>

        <form method="post" action="/upload-document" enctype="multipart/form-data" class="card">
            <div class="card-header">Upload a policy document</div>
            <div class="form-body">
                <input type="file" name="file" accept=".pdf">
                <button type="submit" class="btn">Upload &amp; Analyze</button>
            </div>
        </form>

        <div id="loading" class="loading" hidden>
            <div class="spinner"></div>
            <span>Analyzing policy language. This can take a moment.</span>
        </div>
        <script>
            for (const form of document.querySelectorAll('form')) {{
                form.addEventListener('submit', () => {{
                    document.getElementById('loading').hidden = false;
                }});
            }}
        </script>"#
    );

    layout::page(
        "clauselens \u{2014} policy clause analysis",
        "dashboard",
        layout::nav_links(),
        &body,
    )
}
