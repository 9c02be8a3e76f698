use regex::Regex;
use std::sync::OnceLock;

use cybercj_types::Role;

/// Content of a transcript bubble, ready for the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Markup produced by `render_markdown`; safe to insert as HTML
    Markup(String),
    /// Literal text; must be inserted as a text node
    Text(String),
}

impl MessageBody {
    pub fn as_str(&self) -> &str {
        match self {
            MessageBody::Markup(s) | MessageBody::Text(s) => s,
        }
    }
}

struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Substitutions applied in order; later rules see the output of earlier ones
fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?m)^### (.*)$", "<h3>${1}</h3>"),
            (r"(?m)^## (.*)$", "<h2>${1}</h2>"),
            (r"(?m)^# (.*)$", "<h1>${1}</h1>"),
            (r"\*\*(.*?)\*\*", "<strong>${1}</strong>"),
            (r"\*(.*?)\*", "<em>${1}</em>"),
            (r"`(.*?)`", "<code>${1}</code>"),
            (r"(?m)^- (.*)$", "<li>${1}</li>"),
            // one list spanning the first to the last bullet
            (r"(?s)(<li>.*</li>)", "<ul>${1}</ul>"),
            (r"(?m)^\d+\. (.*)$", "<li>${1}</li>"),
            (r"\n", "<br>"),
        ]
        .into_iter()
        .map(|(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).expect("markdown pattern is a valid regex"),
            replacement,
        })
        .collect()
    })
}

/// Render the tutor's markdown subset to HTML
///
/// Supports `#`/`##`/`###` headers, `**bold**`, `*italic*`, `` `code` ``,
/// `- ` bullets, `1. ` numbered lines and line breaks. The input is escaped
/// first, so raw HTML in the text is shown, never interpreted.
pub fn render_markdown(markdown: &str) -> String {
    rules()
        .iter()
        .fold(escape_html(markdown), |html, rule| {
            rule.pattern.replace_all(&html, rule.replacement).into_owned()
        })
}

/// Render a message for the given author
pub fn render_message_content(role: Role, content: &str) -> MessageBody {
    if role.renders_markdown() {
        MessageBody::Markup(render_markdown(content))
    } else {
        MessageBody::Text(content.to_string())
    }
}

/// Escape HTML to prevent XSS
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
