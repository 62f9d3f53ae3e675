//! Content blocks.
//!
//! On the wire a block carries its payload under a key equal to its `type`:
//!
//! ```json
//! { "id": "…", "type": "to_do", "has_children": false,
//!   "to_do": { "rich_text": [ … ], "checked": true } }
//! ```
//!
//! [`Block`] lifts that into the [`BlockKind`] sum type when decoding and
//! writes it back under the same key when encoding. A `children` array found
//! inside the payload is hoisted onto [`Block::children`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::InvalidBlock;
use crate::types::RichText;

/// One content unit of a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    /// Block identifier.
    pub id: String,
    /// Whether the block has nested blocks in the source document.
    pub has_children: bool,
    /// Nested blocks, when they have been fetched.
    ///
    /// The blocks endpoint does not return nested content, so a block can
    /// report `has_children` while this is still `None`.
    pub children: Option<Vec<Block>>,
    /// Typed payload.
    pub kind: BlockKind,
}

impl Block {
    /// Create a block without children.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            children: None,
            kind,
        }
    }

    /// Attach already-fetched children.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.has_children = true;
        self.children = Some(children);
        self
    }

    /// Mark the block as having children that were not fetched yet.
    #[must_use]
    pub fn with_unfetched_children(mut self) -> Self {
        self.has_children = true;
        self.children = None;
        self
    }

    /// Whether the block declares children that are missing from its payload.
    #[must_use]
    pub fn needs_children(&self) -> bool {
        self.has_children && self.children.is_none()
    }
}

/// Block payload, one variant per supported discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Paragraph(TextBlock),
    Heading1(TextBlock),
    Heading2(TextBlock),
    Heading3(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    ToDo(ToDoBlock),
    Toggle(TextBlock),
    ChildPage(ChildPageBlock),
    Image(MediaBlock),
    Divider,
    Quote(TextBlock),
    Code(CodeBlock),
    File(MediaBlock),
    Bookmark(BookmarkBlock),
    /// Block type the Notion API itself cannot export.
    Unsupported,
    /// Any discriminant this crate does not model, kept by name.
    Other(String),
}

impl BlockKind {
    /// Wire discriminant of this variant.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Paragraph(_) => "paragraph",
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::ToDo(_) => "to_do",
            Self::Toggle(_) => "toggle",
            Self::ChildPage(_) => "child_page",
            Self::Image(_) => "image",
            Self::Divider => "divider",
            Self::Quote(_) => "quote",
            Self::Code(_) => "code",
            Self::File(_) => "file",
            Self::Bookmark(_) => "bookmark",
            Self::Unsupported => "unsupported",
            Self::Other(name) => name,
        }
    }
}

/// Payload made of a rich text run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TextBlock {
    /// Text spans (`rich_text` in newer API versions).
    #[serde(default, alias = "rich_text")]
    pub text: Vec<RichText>,
}

impl TextBlock {
    /// Create a payload from spans.
    #[must_use]
    pub fn new(text: Vec<RichText>) -> Self {
        Self { text }
    }
}

/// Payload of a `to_do` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ToDoBlock {
    #[serde(default, alias = "rich_text")]
    pub text: Vec<RichText>,
    #[serde(default)]
    pub checked: bool,
}

/// Payload of a `child_page` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChildPageBlock {
    #[serde(default)]
    pub title: String,
}

/// Payload of a `code` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CodeBlock {
    #[serde(default, alias = "rich_text")]
    pub text: Vec<RichText>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Payload of `image` and `file` blocks.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MediaBlock {
    /// Where the file lives.
    #[serde(flatten)]
    pub source: FileSource,
    /// Caption spans.
    #[serde(default)]
    pub caption: Vec<RichText>,
}

impl MediaBlock {
    /// Create a payload for an externally hosted URL.
    #[must_use]
    pub fn external(url: impl Into<String>) -> Self {
        Self {
            source: FileSource::External {
                external: ExternalFile { url: url.into() },
            },
            caption: Vec::new(),
        }
    }

    /// Create a payload for a file hosted by Notion.
    #[must_use]
    pub fn hosted(url: impl Into<String>) -> Self {
        Self {
            source: FileSource::Hosted {
                file: HostedFile {
                    url: url.into(),
                    expiry_time: None,
                },
            },
            caption: Vec::new(),
        }
    }

    /// Replace the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: Vec<RichText>) -> Self {
        self.caption = caption;
        self
    }

    /// Plain text of the first caption span, or `""` without a caption.
    #[must_use]
    pub fn caption_text(&self) -> &str {
        self.caption.first().map_or("", |span| span.plain_text.as_str())
    }
}

/// File location, discriminated by the inner `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum FileSource {
    /// File linked from elsewhere on the web.
    #[serde(rename = "external")]
    External { external: ExternalFile },
    /// File uploaded to Notion (URL expires).
    #[serde(rename = "file")]
    Hosted { file: HostedFile },
}

impl FileSource {
    /// Source URL regardless of where the file is hosted.
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::External { external } => &external.url,
            Self::Hosted { file } => &file.url,
        }
    }
}

/// Externally hosted file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExternalFile {
    pub url: String,
}

/// Notion-hosted file with a temporary URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostedFile {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<DateTime<Utc>>,
}

/// Payload of a `bookmark` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BookmarkBlock {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub caption: Vec<RichText>,
}

/// Wire form of a block before its payload is typed.
#[derive(Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    has_children: bool,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

impl TryFrom<RawBlock> for Block {
    type Error = InvalidBlock;

    fn try_from(mut raw: RawBlock) -> Result<Self, Self::Error> {
        let mut payload = match raw.rest.remove(&raw.block_type) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };
        let children = payload.remove("children");

        let invalid = |source| InvalidBlock {
            block_id: raw.id.clone(),
            block_type: raw.block_type.clone(),
            source,
        };

        let children = match children {
            Some(Value::Null) | None => None,
            Some(value) => Some(serde_json::from_value::<Vec<Block>>(value).map_err(invalid)?),
        };
        let kind = decode_kind(&raw.block_type, Value::Object(payload)).map_err(invalid)?;

        Ok(Self {
            id: raw.id,
            has_children: raw.has_children,
            children,
            kind,
        })
    }
}

fn decode_kind(block_type: &str, payload: Value) -> Result<BlockKind, serde_json::Error> {
    fn typed<T: DeserializeOwned>(payload: Value) -> Result<T, serde_json::Error> {
        serde_json::from_value(payload)
    }

    let kind = match block_type {
        "paragraph" => BlockKind::Paragraph(typed(payload)?),
        "heading_1" => BlockKind::Heading1(typed(payload)?),
        "heading_2" => BlockKind::Heading2(typed(payload)?),
        "heading_3" => BlockKind::Heading3(typed(payload)?),
        "bulleted_list_item" => BlockKind::BulletedListItem(typed(payload)?),
        "numbered_list_item" => BlockKind::NumberedListItem(typed(payload)?),
        "to_do" => BlockKind::ToDo(typed(payload)?),
        "toggle" => BlockKind::Toggle(typed(payload)?),
        "child_page" => BlockKind::ChildPage(typed(payload)?),
        "image" => BlockKind::Image(typed(payload)?),
        "divider" => BlockKind::Divider,
        "quote" => BlockKind::Quote(typed(payload)?),
        "code" => BlockKind::Code(typed(payload)?),
        "file" => BlockKind::File(typed(payload)?),
        "bookmark" => BlockKind::Bookmark(typed(payload)?),
        "unsupported" => BlockKind::Unsupported,
        other => BlockKind::Other(other.to_owned()),
    };
    Ok(kind)
}

/// Payload with the block's children folded back in.
#[derive(Serialize)]
struct PayloadRef<'a, T: Serialize> {
    #[serde(flatten)]
    payload: &'a T,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<&'a [Block]>,
}

/// Payload of variants without fields.
#[derive(Serialize)]
struct EmptyPayload;

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        fn entry<M: SerializeMap, T: Serialize>(
            map: &mut M,
            key: &str,
            payload: &T,
            children: Option<&[Block]>,
        ) -> Result<(), M::Error> {
            map.serialize_entry(key, &PayloadRef { payload, children })
        }

        let type_name = self.kind.type_name();
        let children = self.children.as_deref();

        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("object", "block")?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("type", type_name)?;
        map.serialize_entry("has_children", &self.has_children)?;
        match &self.kind {
            BlockKind::Paragraph(p)
            | BlockKind::Heading1(p)
            | BlockKind::Heading2(p)
            | BlockKind::Heading3(p)
            | BlockKind::BulletedListItem(p)
            | BlockKind::NumberedListItem(p)
            | BlockKind::Toggle(p)
            | BlockKind::Quote(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::ToDo(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::ChildPage(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::Image(p) | BlockKind::File(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::Code(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::Bookmark(p) => entry(&mut map, type_name, p, children)?,
            BlockKind::Divider | BlockKind::Unsupported | BlockKind::Other(_) => {
                entry(&mut map, type_name, &EmptyPayload, children)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn span(content: &str) -> Value {
        json!({
            "type": "text",
            "text": { "content": content, "link": null },
            "annotations": {
                "bold": false, "italic": false, "strikethrough": false,
                "underline": false, "code": false, "color": "default"
            },
            "plain_text": content,
            "href": null
        })
    }

    #[test]
    fn test_decode_paragraph_from_rich_text_key() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "paragraph",
            "has_children": false,
            "paragraph": { "rich_text": [span("Hello")], "color": "default" }
        }))
        .unwrap();

        assert_eq!(block.id, "b1");
        assert_eq!(
            block.kind,
            BlockKind::Paragraph(TextBlock::new(vec![RichText::plain("Hello")]))
        );
        assert!(block.children.is_none());
    }

    #[test]
    fn test_decode_legacy_text_key() {
        let block: Block = serde_json::from_value(json!({
            "id": "b1",
            "type": "heading_2",
            "heading_2": { "text": [span("Title")] }
        }))
        .unwrap();

        let BlockKind::Heading2(heading) = block.kind else {
            panic!("expected heading_2, got {:?}", block.kind);
        };
        assert_eq!(heading.text[0].plain_text, "Title");
    }

    #[test]
    fn test_decode_to_do() {
        let block: Block = serde_json::from_value(json!({
            "id": "t1",
            "type": "to_do",
            "to_do": { "rich_text": [span("Ship it")], "checked": true }
        }))
        .unwrap();

        let BlockKind::ToDo(todo) = block.kind else {
            panic!("expected to_do");
        };
        assert!(todo.checked);
    }

    #[test]
    fn test_decode_hoists_children() {
        let block: Block = serde_json::from_value(json!({
            "id": "parent",
            "type": "toggle",
            "has_children": true,
            "toggle": {
                "rich_text": [span("More")],
                "children": [
                    { "id": "child", "type": "divider", "divider": {} }
                ]
            }
        }))
        .unwrap();

        assert!(block.has_children);
        let children = block.children.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].kind, BlockKind::Divider);
    }

    #[test]
    fn test_decode_external_image() {
        let block: Block = serde_json::from_value(json!({
            "id": "img",
            "type": "image",
            "image": {
                "type": "external",
                "external": { "url": "https://example.com/cat.png" },
                "caption": [span("A cat")]
            }
        }))
        .unwrap();

        let BlockKind::Image(image) = block.kind else {
            panic!("expected image");
        };
        assert_eq!(image.source.url(), "https://example.com/cat.png");
        assert_eq!(image.caption_text(), "A cat");
    }

    #[test]
    fn test_decode_hosted_file() {
        let block: Block = serde_json::from_value(json!({
            "id": "f",
            "type": "file",
            "file": {
                "type": "file",
                "file": {
                    "url": "https://s3.example.com/report.pdf?X-Amz-Signature=abc",
                    "expiry_time": "2024-03-05T11:00:00.000Z"
                },
                "caption": []
            }
        }))
        .unwrap();

        let BlockKind::File(file) = block.kind else {
            panic!("expected file");
        };
        assert!(matches!(file.source, FileSource::Hosted { .. }));
        assert_eq!(
            file.source.url(),
            "https://s3.example.com/report.pdf?X-Amz-Signature=abc"
        );
        assert_eq!(file.caption_text(), "");
    }

    #[test]
    fn test_decode_unsupported_and_unknown() {
        let unsupported: Block = serde_json::from_value(json!({
            "id": "u", "type": "unsupported", "unsupported": {}
        }))
        .unwrap();
        assert_eq!(unsupported.kind, BlockKind::Unsupported);

        let table: Block = serde_json::from_value(json!({
            "id": "t", "type": "table", "table": { "table_width": 2 }
        }))
        .unwrap();
        assert_eq!(table.kind, BlockKind::Other("table".to_owned()));
        assert_eq!(table.kind.type_name(), "table");
    }

    #[test]
    fn test_decode_invalid_payload() {
        let err = serde_json::from_value::<Block>(json!({
            "id": "bad", "type": "to_do", "to_do": { "checked": "yes" }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("to_do"));
    }

    #[test]
    fn test_encode_writes_payload_under_type_key() {
        let block = Block::new(
            "q",
            BlockKind::Quote(TextBlock::new(vec![RichText::plain("Wise")])),
        )
        .with_children(vec![Block::new("d", BlockKind::Divider)]);

        let value = serde_json::to_value(&block).unwrap();

        assert_eq!(value["type"], "quote");
        assert_eq!(value["has_children"], true);
        assert_eq!(value["quote"]["text"][0]["plain_text"], "Wise");
        assert_eq!(value["quote"]["children"][0]["type"], "divider");

        let decoded: Block = serde_json::from_value(value).unwrap();
        assert_eq!(decoded, block);
    }

    #[test]
    fn test_needs_children() {
        let pending = Block::new("a", BlockKind::Divider).with_unfetched_children();
        assert!(pending.needs_children());

        let fetched = Block::new("b", BlockKind::Divider).with_children(Vec::new());
        assert!(!fetched.needs_children());

        assert!(!Block::new("c", BlockKind::Divider).needs_children());
    }
}
