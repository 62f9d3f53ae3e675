//! HTML rendering of Notion content.
//!
//! Two layers, leaf first:
//! - [`text`]: rich text spans to inline markup
//! - [`block`]: content blocks to block-level markup, recursing into
//!   children that were fetched
//!
//! Output carries utility class names only; styling lives elsewhere.
//!
//! # Example
//!
//! ```ignore
//! use np_renderer::render_blocks;
//!
//! for fragment in render_blocks(&blocks)? {
//!     println!("{}: {}", fragment.id, fragment.html);
//! }
//! ```

pub mod block;
mod error;
mod escape;
pub mod text;

pub use block::{RenderedBlock, render_block, render_blocks};
pub use error::RenderError;
pub use escape::escape_html;
pub use text::{push_rich_text, render_rich_text};
