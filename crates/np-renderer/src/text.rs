//! Rich text formatting.
//!
//! Every span becomes one `<span>`. Active annotations add their utility
//! classes together, a non-default color adds an inline style, and a linked
//! span wraps its content in an anchor.

use np_notion::{Annotations, RichText};

use crate::escape::escape_html;

const LINK_CLASS: &str = "text-blue-500 hover:text-blue-700";

/// Render spans to inline HTML.
///
/// Absent input renders as an empty string.
#[must_use]
pub fn render_rich_text(spans: Option<&[RichText]>) -> String {
    let mut out = String::new();
    if let Some(spans) = spans {
        push_rich_text(spans, &mut out);
    }
    out
}

/// Append inline HTML for `spans` to `out`.
pub fn push_rich_text(spans: &[RichText], out: &mut String) {
    for span in spans {
        push_span(span, out);
    }
}

fn push_span(span: &RichText, out: &mut String) {
    out.push_str("<span");

    let classes = annotation_classes(span.annotations);
    if !classes.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&classes.join(" "));
        out.push('"');
    }
    if let Some((property, value)) = span.annotations.color.css() {
        out.push_str(" style=\"");
        out.push_str(property);
        out.push_str(": ");
        out.push_str(value);
        out.push('"');
    }
    out.push('>');

    let content = escape_html(span.content());
    match span.link() {
        Some(url) => {
            out.push_str("<a href=\"");
            out.push_str(&escape_html(url));
            out.push_str("\" class=\"");
            out.push_str(LINK_CLASS);
            out.push_str("\">");
            out.push_str(&content);
            out.push_str("</a>");
        }
        None => out.push_str(&content),
    }

    out.push_str("</span>");
}

fn annotation_classes(annotations: Annotations) -> Vec<&'static str> {
    [
        (annotations.bold, "font-bold"),
        (annotations.code, "font-mono bg-gray-100 p-1 rounded"),
        (annotations.italic, "italic"),
        (annotations.strikethrough, "line-through"),
        (annotations.underline, "underline"),
    ]
    .into_iter()
    .filter_map(|(active, class)| active.then_some(class))
    .collect()
}
