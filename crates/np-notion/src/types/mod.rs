//! Notion API data types.

mod block;
mod page;
mod rich_text;

pub use block::{
    Block, BlockKind, BookmarkBlock, ChildPageBlock, CodeBlock, ExternalFile, FileSource,
    HostedFile, MediaBlock, TextBlock, ToDoBlock,
};
pub use page::{ListResponse, Page, PropertyValue};
pub use rich_text::{Annotations, Color, Link, RichText, TextContent};
