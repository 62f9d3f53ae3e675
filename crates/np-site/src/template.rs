//! HTML documents for the listing and post pages.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use np_notion::Page;
use np_renderer::{RenderError, escape_html, push_rich_text, render_blocks};
use serde::{Deserialize, Serialize};

use crate::resolve::PostProps;

/// Markup served while a post has no data yet.
pub const PLACEHOLDER: &str = "<div></div>";

/// Site-wide text shown on the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteMeta {
    /// Document title and header of the listing page.
    pub title: String,
    /// Tagline under the header.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Notion Next.js blog".to_owned(),
            description: String::new(),
        }
    }
}

/// Render a post page.
///
/// Returns [`PLACEHOLDER`] when there are no props or the page has no title.
///
/// # Errors
///
/// Returns [`RenderError`] if a block payload is malformed.
pub fn render_post(props: Option<&PostProps>) -> Result<String, RenderError> {
    let Some(props) = props else {
        return Ok(PLACEHOLDER.to_owned());
    };
    let title = props.page.title();
    let Some(first) = title.first() else {
        return Ok(PLACEHOLDER.to_owned());
    };

    let fragments = render_blocks(&props.blocks)?;

    let mut html = String::with_capacity(4096);
    open_document(&mut html, &first.plain_text);
    html.push_str("<div>\n<article class=\"container mx-auto px-4\">\n");
    html.push_str("<h1 class=\"text-3xl font-bold my-4\">");
    push_rich_text(title, &mut html);
    html.push_str("</h1>\n<section>\n");
    for fragment in &fragments {
        html.push_str(&fragment.html);
        html.push('\n');
    }
    html.push_str("<a href=\"/\" class=\"text-blue-600 hover:text-blue-800\">← Go home</a>\n");
    html.push_str("</section>\n</article>\n</div>\n");
    close_document(&mut html);
    Ok(html)
}

/// Render the listing page, keeping the order of `posts`.
#[must_use]
pub fn render_index(posts: &[Page], meta: &SiteMeta) -> String {
    let mut html = String::with_capacity(2048 + posts.len() * 512);
    open_document(&mut html, &meta.title);
    html.push_str("<div class=\"container mx-auto px-4\">\n<main>\n");

    html.push_str("<header class=\"my-12\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"text-3xl font-bold my-2\">{}</h1>",
        escape_html(&meta.title)
    );
    let _ = writeln!(
        html,
        "<p class=\"text-gray-600\">{}</p>",
        escape_html(&meta.description)
    );
    html.push_str("</header>\n");

    html.push_str("<h2 class=\"text-xl font-semibold my-4 uppercase tracking-wide\">All Posts</h2>\n");
    html.push_str("<ol>\n");
    for post in posts {
        render_post_entry(&mut html, post);
    }
    html.push_str("</ol>\n</main>\n</div>\n");
    close_document(&mut html);
    html
}

fn render_post_entry(html: &mut String, post: &Page) {
    let href = format!("/{}", escape_html(&post.id));

    html.push_str("<li class=\"mb-6\">\n<h3 class=\"text-lg font-semibold\">");
    let _ = write!(
        html,
        "<a href=\"{href}\" class=\"text-blue-600 hover:text-blue-800\">"
    );
    push_rich_text(post.title(), html);
    html.push_str("</a></h3>\n");
    let _ = writeln!(
        html,
        "<p class=\"text-sm text-gray-500\">{}</p>",
        format_date(post.last_edited_time)
    );
    let _ = writeln!(
        html,
        "<a href=\"{href}\" class=\"text-blue-500 hover:underline\">Read post →</a>"
    );
    html.push_str("</li>\n");
}

/// Format a timestamp as `Mar 05, 2024`.
fn format_date(time: DateTime<Utc>) -> String {
    time.format("%b %d, %Y").to_string()
}

fn open_document(html: &mut String, title: &str) {
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(title));
    html.push_str("<link rel=\"icon\" href=\"/favicon.ico\">\n");
    html.push_str("</head>\n<body>\n");
}

fn close_document(html: &mut String) {
    html.push_str("</body>\n</html>\n");
}
