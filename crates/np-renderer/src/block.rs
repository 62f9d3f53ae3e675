//! Block rendering.
//!
//! Maps each [`BlockKind`] to its markup. Rendering is pure: children are
//! rendered only when they were already fetched into [`Block::children`].
//!
//! Known limitations, kept on purpose:
//! - A nested list is ordered or unordered depending on its first child only.
//! - Quote and code blocks show the first text span only.

use np_notion::{Block, BlockKind, MediaBlock, RichText};

use crate::error::RenderError;
use crate::escape::escape_html;
use crate::text::push_rich_text;

/// Rendered markup of one top-level block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedBlock {
    /// Id of the source block, stable across renders.
    pub id: String,
    /// Block markup.
    pub html: String,
}

/// Render a block sequence, one fragment per block in input order.
///
/// # Errors
///
/// Returns [`RenderError::MalformedPayload`] for the first block whose
/// payload lacks a field the renderer needs.
pub fn render_blocks(blocks: &[Block]) -> Result<Vec<RenderedBlock>, RenderError> {
    blocks
        .iter()
        .map(|block| -> Result<RenderedBlock, RenderError> {
            let mut html = String::new();
            render_block(block, &mut html)?;
            Ok(RenderedBlock {
                id: block.id.clone(),
                html,
            })
        })
        .collect()
}

/// Append markup for one block to `out`.
///
/// # Errors
///
/// Returns [`RenderError::MalformedPayload`] when a quote or code block has
/// no text, or a list item has an empty children list.
pub fn render_block(block: &Block, out: &mut String) -> Result<(), RenderError> {
    match &block.kind {
        BlockKind::Paragraph(p) => push_text_element("p", "mb-4", &p.text, out),
        BlockKind::Heading1(h) => push_text_element("h1", "text-3xl font-bold my-4", &h.text, out),
        BlockKind::Heading2(h) => {
            push_text_element("h2", "text-2xl font-semibold my-3", &h.text, out);
        }
        BlockKind::Heading3(h) => push_text_element("h3", "text-xl font-medium my-2", &h.text, out),
        BlockKind::BulletedListItem(item) | BlockKind::NumberedListItem(item) => {
            out.push_str(r#"<li class="ml-4 list-disc">"#);
            push_rich_text(&item.text, out);
            if let Some(children) = &block.children {
                push_nested_list(block, children, out)?;
            }
            out.push_str("</li>");
        }
        BlockKind::ToDo(todo) => {
            let id = escape_html(&block.id);
            out.push_str(r#"<div class="flex items-center mb-2"><input type="checkbox" id=""#);
            out.push_str(&id);
            out.push('"');
            if todo.checked {
                out.push_str(" checked");
            }
            out.push_str(r#" class="mr-2"><label for=""#);
            out.push_str(&id);
            out.push_str(r#"" class="flex-1">"#);
            push_rich_text(&todo.text, out);
            out.push_str("</label></div>");
        }
        BlockKind::Toggle(toggle) => {
            out.push_str(r#"<details class="mb-2"><summary>"#);
            push_rich_text(&toggle.text, out);
            out.push_str("</summary>");
            for child in block.children.as_deref().unwrap_or_default() {
                render_block(child, out)?;
            }
            out.push_str("</details>");
        }
        BlockKind::ChildPage(child) => {
            out.push_str(r#"<p class="mb-2">"#);
            out.push_str(&escape_html(&child.title));
            out.push_str("</p>");
        }
        BlockKind::Image(image) => push_image(image, out),
        BlockKind::Divider => out.push_str(r#"<hr class="my-4">"#),
        BlockKind::Quote(quote) => {
            let text = first_plain_text(block, &quote.text)?;
            out.push_str(r#"<blockquote class="italic border-l-4 border-gray-500 pl-4 my-4">"#);
            out.push_str(&escape_html(text));
            out.push_str("</blockquote>");
        }
        BlockKind::Code(code) => {
            let text = first_plain_text(block, &code.text)?;
            out.push_str(r#"<pre class="bg-gray-100 p-4 rounded-lg my-4"><code class="block whitespace-pre-wrap">"#);
            out.push_str(&escape_html(text));
            out.push_str("</code></pre>");
        }
        BlockKind::File(file) => push_file(file, out),
        BlockKind::Bookmark(bookmark) => {
            let url = escape_html(&bookmark.url);
            out.push_str(r#"<a href=""#);
            out.push_str(&url);
            out.push_str(r#"" target="_blank" rel="noopener noreferrer" class="block underline text-blue-600 hover:text-blue-800 my-2">"#);
            out.push_str(&url);
            out.push_str("</a>");
        }
        BlockKind::Unsupported => out.push_str("❌ Unsupported block (unsupported by Notion API)"),
        BlockKind::Other(type_name) => {
            out.push_str("❌ Unsupported block (");
            out.push_str(&escape_html(type_name));
            out.push(')');
        }
    }
    Ok(())
}

fn push_text_element(tag: &str, class: &str, text: &[RichText], out: &mut String) {
    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">");
    push_rich_text(text, out);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Nested list under a list item, typed after its first child.
fn push_nested_list(parent: &Block, children: &[Block], out: &mut String) -> Result<(), RenderError> {
    let Some(first) = children.first() else {
        return Err(malformed(parent, "nested list has no items"));
    };
    let (tag, class) = if matches!(first.kind, BlockKind::NumberedListItem(_)) {
        ("ol", "list-decimal list-inside")
    } else {
        ("ul", "list-disc list-inside")
    };

    out.push('<');
    out.push_str(tag);
    out.push_str(" class=\"");
    out.push_str(class);
    out.push_str("\">");
    for child in children {
        out.push_str("<li>");
        render_block(child, out)?;
        out.push_str("</li>");
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    Ok(())
}

fn push_image(image: &MediaBlock, out: &mut String) {
    let caption = escape_html(image.caption_text());
    out.push_str(r#"<figure class="my-4"><img src=""#);
    out.push_str(&escape_html(image.source.url()));
    out.push_str(r#"" alt=""#);
    out.push_str(&caption);
    out.push_str(r#"" class="w-full">"#);
    push_figcaption(&caption, out);
    out.push_str("</figure>");
}

fn push_file(file: &MediaBlock, out: &mut String) {
    let src = file.source.url();
    out.push_str(r#"<figure class="my-4"><div class="flex items-center">📎 <a href=""#);
    out.push_str(&escape_html(src));
    out.push_str(r#"" class="ml-2 underline text-blue-600 hover:text-blue-800">"#);
    out.push_str(&escape_html(file_name(src)));
    out.push_str("</a></div>");
    push_figcaption(&escape_html(file.caption_text()), out);
    out.push_str("</figure>");
}

fn push_figcaption(caption: &str, out: &mut String) {
    if !caption.is_empty() {
        out.push_str(r#"<figcaption class="text-sm text-gray-500">"#);
        out.push_str(caption);
        out.push_str("</figcaption>");
    }
}

/// Last path segment of a URL without its query string.
fn file_name(url: &str) -> &str {
    let last = url.rsplit('/').next().unwrap_or(url);
    last.split_once('?').map_or(last, |(name, _)| name)
}

fn first_plain_text<'a>(block: &Block, text: &'a [RichText]) -> Result<&'a str, RenderError> {
    text.first()
        .map(|span| span.plain_text.as_str())
        .ok_or_else(|| malformed(block, "text is empty"))
}

fn malformed(block: &Block, reason: &'static str) -> RenderError {
    RenderError::MalformedPayload {
        block_id: block.id.clone(),
        block_type: block.kind.type_name().to_owned(),
        reason,
    }
}
