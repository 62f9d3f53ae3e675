//! Page data resolution.
//!
//! Fetches everything a page needs before it is rendered. The database id is
//! passed in by the caller; nothing here reads configuration.

use np_notion::{Block, DocumentStore, NotionError, Page};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Data for one post page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostProps {
    /// Page metadata.
    pub page: Page,
    /// Top-level blocks with one level of children filled in.
    pub blocks: Vec<Block>,
}

/// Data for the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexProps {
    /// Posts in database order.
    pub posts: Vec<Page>,
}

/// Ids of every post known at build time.
///
/// Ids created later are still served through on-demand generation.
///
/// # Errors
///
/// Returns [`NotionError`] if the database query fails.
pub fn static_paths(
    store: &dyn DocumentStore,
    database_id: &str,
) -> Result<Vec<String>, NotionError> {
    let pages = store.query_database(database_id)?;
    Ok(pages.into_iter().map(|page| page.id).collect())
}

/// Fetch a post's metadata and blocks.
///
/// Blocks that declare children the API did not include get their immediate
/// children fetched, all in parallel. Deeper levels are not fetched.
///
/// # Errors
///
/// Returns the first [`NotionError`] among the page, block and child
/// requests. No partial result is returned.
pub fn resolve_post(store: &dyn DocumentStore, page_id: &str) -> Result<PostProps, NotionError> {
    let page = store.retrieve_page(page_id)?;
    let mut blocks = store.list_block_children(page_id)?;
    let backfilled = backfill_children(store, &mut blocks)?;

    info!(page_id, blocks = blocks.len(), backfilled, "Resolved post");
    Ok(PostProps { page, blocks })
}

/// Fetch the listing data.
///
/// # Errors
///
/// Returns [`NotionError`] if the database query fails.
pub fn resolve_index(
    store: &dyn DocumentStore,
    database_id: &str,
) -> Result<IndexProps, NotionError> {
    let posts = store.query_database(database_id)?;
    info!(database_id, count = posts.len(), "Resolved index");
    Ok(IndexProps { posts })
}

/// Fill in missing children one level deep. Returns how many blocks were filled.
fn backfill_children(store: &dyn DocumentStore, blocks: &mut [Block]) -> Result<usize, NotionError> {
    let fetched = blocks
        .par_iter()
        .enumerate()
        .filter(|(_, block)| block.needs_children())
        .map(|(index, block)| {
            store
                .list_block_children(&block.id)
                .map(|children| (index, children))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = fetched.len();
    for (index, children) in fetched {
        blocks[index].children = Some(children);
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use np_notion::{BlockKind, MockStore, RichText, TextBlock};
    use pretty_assertions::assert_eq;

    use super::*;

    fn edited() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
    }

    fn paragraph(id: &str, content: &str) -> Block {
        Block::new(
            id,
            BlockKind::Paragraph(TextBlock::new(vec![RichText::plain(content)])),
        )
    }

    fn toggle(id: &str) -> Block {
        Block::new(
            id,
            BlockKind::Toggle(TextBlock::new(vec![RichText::plain("More")])),
        )
    }

    #[test]
    fn test_static_paths_lists_every_post() {
        let store = MockStore::new().with_database(
            "db",
            vec![Page::new("a", edited(), "A"), Page::new("b", edited(), "B")],
        );
        assert_eq!(static_paths(&store, "db").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_resolve_post_backfills_one_level() {
        let nested_pending = paragraph("deep", "Deep").with_unfetched_children();
        let store = MockStore::new()
            .with_page(Page::new("post", edited(), "Post"))
            .with_children(
                "post",
                vec![
                    paragraph("p1", "Intro"),
                    toggle("t1").with_unfetched_children(),
                    paragraph("p2", "Middle"),
                    toggle("t2").with_unfetched_children(),
                    toggle("t3").with_children(vec![paragraph("inline", "Inline")]),
                ],
            )
            .with_children("t1", vec![paragraph("t1c", "First"), nested_pending.clone()])
            .with_children("t2", vec![paragraph("t2c", "Second")]);

        let props = resolve_post(&store, "post").unwrap();

        assert_eq!(props.page.id, "post");
        assert_eq!(props.blocks.len(), 5);

        let filled: Vec<_> = props
            .blocks
            .iter()
            .filter(|b| b.children.is_some())
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(filled, ["t1", "t2", "t3"]);

        assert_eq!(props.blocks[0], paragraph("p1", "Intro"));
        assert_eq!(props.blocks[2], paragraph("p2", "Middle"));
        assert_eq!(
            props.blocks[1].children.as_deref().unwrap(),
            [paragraph("t1c", "First"), nested_pending]
        );
        assert_eq!(
            props.blocks[4].children.as_deref().unwrap(),
            [paragraph("inline", "Inline")]
        );

        let mut requests = store.requests();
        requests.sort();
        assert_eq!(requests, ["post", "post", "t1", "t2"]);
    }

    #[test]
    fn test_resolve_post_fails_if_any_child_fetch_fails() {
        let store = MockStore::new()
            .with_page(Page::new("post", edited(), "Post"))
            .with_children(
                "post",
                vec![
                    toggle("ok").with_unfetched_children(),
                    toggle("broken").with_unfetched_children(),
                ],
            )
            .with_children("ok", vec![paragraph("c", "Child")])
            .with_failure("broken");

        let err = resolve_post(&store, "post").unwrap_err();
        assert!(matches!(err, NotionError::HttpResponse { status: 502, .. }));
    }

    #[test]
    fn test_resolve_post_missing_page() {
        let store = MockStore::new();
        assert!(resolve_post(&store, "missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_index_keeps_order() {
        let store = MockStore::new().with_database(
            "db",
            vec![
                Page::new("z", edited(), "Zed"),
                Page::new("a", edited(), "Aye"),
            ],
        );
        let props = resolve_index(&store, "db").unwrap();
        let ids: Vec<_> = props.posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["z", "a"]);
    }
}
