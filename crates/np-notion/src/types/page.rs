//! Notion page and list response types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::RichText;

/// Notion page (a database row).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Page {
    /// Page ID.
    pub id: String,
    /// Last modification timestamp.
    pub last_edited_time: DateTime<Utc>,
    /// Page properties keyed by property name.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Page {
    /// Create a page with a single `Name` title property.
    #[must_use]
    pub fn new(id: impl Into<String>, last_edited_time: DateTime<Utc>, title: &str) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(
            "Name".to_owned(),
            PropertyValue::Title {
                title: vec![RichText::plain(title)],
            },
        );
        Self {
            id: id.into(),
            last_edited_time,
            properties,
        }
    }

    /// Spans of the title property.
    ///
    /// Every database has exactly one title property, whatever its name.
    /// Returns an empty slice when none is present.
    #[must_use]
    pub fn title(&self) -> &[RichText] {
        self.properties
            .values()
            .find_map(|value| match value {
                PropertyValue::Title { title } => Some(title.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }
}

/// Page property value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title {
        #[serde(default)]
        title: Vec<RichText>,
    },
    RichText {
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    /// Property type this crate does not read.
    #[serde(other)]
    Other,
}

/// Paginated list returned by query and children endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    /// Items on this page of results.
    pub results: Vec<T>,
    /// Whether more results are available.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor for the next request.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_deserialize_page_title() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "abc",
            "last_edited_time": "2024-03-05T10:00:00.000Z",
            "properties": {
                "Date": { "id": "d", "type": "date", "date": { "start": "2024-03-01" } },
                "Post": {
                    "id": "title",
                    "type": "title",
                    "title": [{ "type": "text", "plain_text": "Hello",
                                "text": { "content": "Hello", "link": null } }]
                }
            }
        }))
        .unwrap();

        assert_eq!(page.id, "abc");
        assert_eq!(
            page.last_edited_time,
            Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
        );
        assert_eq!(page.title().len(), 1);
        assert_eq!(page.title()[0].plain_text, "Hello");
        assert_eq!(page.properties["Date"], PropertyValue::Other);
    }

    #[test]
    fn test_title_missing() {
        let page: Page = serde_json::from_value(json!({
            "id": "abc",
            "last_edited_time": "2024-03-05T10:00:00Z"
        }))
        .unwrap();
        assert!(page.title().is_empty());
    }

    #[test]
    fn test_list_response_defaults() {
        let list: ListResponse<Page> = serde_json::from_value(json!({ "results": [] })).unwrap();
        assert!(list.results.is_empty());
        assert!(!list.has_more);
        assert_eq!(list.next_cursor, None);
    }
}
