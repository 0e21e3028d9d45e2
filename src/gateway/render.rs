//! Server-rendered HTML for the evaluation form.

use std::fmt::Write;

use crate::evaluation::WorkflowState;

/// Everything the page needs to draw one state of the workflow.
#[derive(Debug)]
pub struct PageView<'a> {
    pub reference: &'a str,
    pub candidate: &'a str,
    pub state: &'a WorkflowState,
    pub error: Option<&'a str>,
    pub model: &'a str,
    pub stub: bool,
}

static IDLE: WorkflowState = WorkflowState::Idle;

impl<'a> PageView<'a> {
    pub fn idle(model: &'a str, stub: bool) -> Self {
        Self {
            reference: "",
            candidate: "",
            state: &IDLE,
            error: None,
            model,
            stub,
        }
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
.inputs{display:flex;gap:1rem}.inputs label{flex:1}\
textarea{width:100%;box-sizing:border-box;font:inherit}\
.grade{font-size:2rem;font-weight:bold}\
.band-excellent{color:#1a7f37}.band-partial{color:#9a6700}.band-poor{color:#cf222e}\
.error{color:#cf222e}.note{color:#57606a}";

pub fn page(view: &PageView<'_>) -> String {
    let mut html = String::with_capacity(4096);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>AI Semantic Grader</title>\n");
    let _ = writeln!(html, "<style>{STYLE}</style>");
    html.push_str("</head>\n<body>\n<h1>AI Semantic Grader</h1>\n");
    html.push_str(
        "<p>Compare a student's answer to the reference answer by meaning rather than wording.</p>\n",
    );

    if view.stub {
        let _ = writeln!(
            html,
            "<p class=\"note\">Running with the testing embedder ({}); grades are not meaningful.</p>",
            escape_html(view.model)
        );
    }

    html.push_str("<form method=\"post\" action=\"/evaluate\">\n<div class=\"inputs\">\n");
    push_textarea(
        &mut html,
        "reference",
        "Reference Answer",
        "The correct answer from the teacher...",
        view.reference,
    );
    push_textarea(
        &mut html,
        "candidate",
        "Candidate Answer",
        "The answer written by the student...",
        view.candidate,
    );
    html.push_str("</div>\n<p><button type=\"submit\">Evaluate</button></p>\n</form>\n");

    if let Some(error) = view.error {
        let _ = writeln!(
            html,
            "<p class=\"error\" role=\"alert\">{}</p>",
            escape_html(error)
        );
    }

    if let WorkflowState::Evaluated(evaluation) = view.state {
        let band = evaluation.band();
        html.push_str("<section class=\"result\">\n");
        let _ = writeln!(
            html,
            "<p class=\"grade\">Semantic Grade: {}</p>",
            evaluation.grade_display()
        );
        let _ = writeln!(
            html,
            "<p class=\"band-{}\"><strong>{}:</strong> {}</p>",
            band.label().to_ascii_lowercase(),
            band.label(),
            band.feedback()
        );

        html.push_str("<details>\n<summary>Technical details</summary>\n<ul>\n");
        let _ = writeln!(
            html,
            "<li>Cosine similarity: {}</li>",
            evaluation.similarity_display()
        );
        let _ = writeln!(html, "<li>Model: {}</li>", escape_html(&evaluation.model));
        for warning in &evaluation.warnings {
            let _ = writeln!(html, "<li>Warning: {}</li>", escape_html(&warning.to_string()));
        }
        html.push_str("</ul>\n</details>\n</section>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn push_textarea(html: &mut String, name: &str, label: &str, placeholder: &str, value: &str) {
    let _ = writeln!(
        html,
        "<label>{label}<br><textarea name=\"{name}\" rows=\"8\" placeholder=\"{placeholder}\">{}</textarea></label>",
        escape_html(value)
    );
}

/// Escapes text for element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
