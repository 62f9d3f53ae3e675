//! Revalidating page cache.
//!
//! A rendered page is reused until it is older than the revalidation
//! interval. The first request after that regenerates it from Notion.
//!
//! Regeneration is serialized per page. While one request regenerates a
//! page, concurrent requests get the stale copy if there is one, and
//! otherwise wait and reuse the result.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, TryLockError};
use std::time::{Duration, Instant};

use np_notion::DocumentStore;
use tracing::{info, warn};

use crate::error::SiteError;
use crate::resolve::{resolve_index, resolve_post, static_paths};
use crate::template::{SiteMeta, render_index, render_post};

/// Cache key of the listing page.
const INDEX_KEY: &str = "";

/// Site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Database holding the posts.
    pub database_id: String,
    /// Listing page text.
    pub meta: SiteMeta,
    /// Minimum age before a cached page is regenerated.
    pub revalidate: Duration,
}

impl SiteConfig {
    /// Create a configuration with default text and a one second interval.
    #[must_use]
    pub fn new(database_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            meta: SiteMeta::default(),
            revalidate: Duration::from_secs(1),
        }
    }
}

struct CachedPage {
    html: Arc<str>,
    rendered_at: Instant,
}

/// Blog site with on-demand regeneration.
///
/// Safe to share across threads. Rendering runs on the caller's thread and
/// blocks on Notion requests.
pub struct Site {
    store: Arc<dyn DocumentStore>,
    config: SiteConfig,
    cache: RwLock<HashMap<String, CachedPage>>,
    /// Per-page locks held while a page is regenerated.
    regenerating: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl Site {
    /// Create a site over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: SiteConfig) -> Self {
        Self {
            store,
            config,
            cache: RwLock::new(HashMap::new()),
            regenerating: Mutex::new(HashMap::new()),
        }
    }

    /// Site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Ids of posts known to the database right now.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Notion`] if the database query fails.
    pub fn static_paths(&self) -> Result<Vec<String>, SiteError> {
        Ok(static_paths(self.store.as_ref(), &self.config.database_id)?)
    }

    /// Listing page HTML.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if regeneration fails and nothing was rendered before.
    pub fn render_index(&self) -> Result<Arc<str>, SiteError> {
        self.cached_or_render(INDEX_KEY, || {
            let props = resolve_index(self.store.as_ref(), &self.config.database_id)?;
            Ok(render_index(&props.posts, &self.config.meta))
        })
    }

    /// Post page HTML.
    ///
    /// Ids not seen before are generated on first request.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if regeneration fails and nothing was rendered
    /// before. [`SiteError::is_not_found`] tells a missing page apart.
    pub fn render_post(&self, page_id: &str) -> Result<Arc<str>, SiteError> {
        self.cached_or_render(page_id, || {
            let props = resolve_post(self.store.as_ref(), page_id)?;
            Ok(render_post(Some(&props))?)
        })
    }

    /// Drop every cached page.
    pub fn invalidate(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn cached_or_render(
        &self,
        key: &str,
        render: impl FnOnce() -> Result<String, SiteError>,
    ) -> Result<Arc<str>, SiteError> {
        if let Some(html) = self.fresh(key) {
            return Ok(html);
        }

        let lock = self.regeneration_lock(key);
        let _guard = match lock.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(err)) => err.into_inner(),
            Err(TryLockError::WouldBlock) => {
                if let Some(html) = self.stale(key) {
                    return Ok(html);
                }
                lock.lock().unwrap_or_else(PoisonError::into_inner)
            }
        };

        // Another request may have finished while we waited.
        if let Some(html) = self.fresh(key) {
            return Ok(html);
        }

        let result = render().map(|html| {
            let html: Arc<str> = html.into();
            info!(page = key, "Regenerated page");
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(
                    key.to_owned(),
                    CachedPage {
                        html: Arc::clone(&html),
                        rendered_at: Instant::now(),
                    },
                );
            html
        });
        self.regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);

        result.or_else(|err| match self.stale(key) {
            Some(html) if !err.is_not_found() => {
                warn!(page = key, error = %err, "Regeneration failed, serving stale page");
                Ok(html)
            }
            _ => Err(err),
        })
    }

    fn regeneration_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .regenerating
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(key.to_owned()).or_default())
    }

    fn fresh(&self, key: &str) -> Option<Arc<str>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache
            .get(key)
            .filter(|page| page.rendered_at.elapsed() < self.config.revalidate)
            .map(|page| Arc::clone(&page.html))
    }

    fn stale(&self, key: &str) -> Option<Arc<str>> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(key).map(|page| Arc::clone(&page.html))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use chrono::{TimeZone, Utc};
    use np_notion::{Block, BlockKind, MockStore, NotionError, Page};

    use super::*;

    fn page(id: &str, title: &str) -> Page {
        Page::new(id, Utc.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap(), title)
    }

    fn site(store: &Arc<MockStore>, revalidate: Duration) -> Site {
        let mut config = SiteConfig::new("db");
        config.revalidate = revalidate;
        Site::new(Arc::clone(store) as Arc<dyn DocumentStore>, config)
    }

    fn blog() -> Arc<MockStore> {
        Arc::new(
            MockStore::new()
                .with_database("db", vec![page("p1", "First")])
                .with_children("p1", vec![Block::new("d", BlockKind::Divider)]),
        )
    }

    #[test]
    fn test_render_index() {
        let store = blog();
        let site = site(&store, Duration::from_secs(60));
        let html = site.render_index().unwrap();
        assert!(html.contains("/p1"));
        assert_eq!(site.static_paths().unwrap(), vec!["p1"]);
    }

    #[test]
    fn test_cached_within_interval() {
        let store = blog();
        let site = site(&store, Duration::from_secs(60));

        let first = site.render_post("p1").unwrap();
        store.insert_page(page("p1", "Renamed"));
        let second = site.render_post("p1").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.requests(), vec!["p1", "p1"]);
    }

    #[test]
    fn test_regenerates_after_interval() {
        let store = blog();
        let site = site(&store, Duration::from_millis(10));

        let first = site.render_post("p1").unwrap();
        assert!(first.contains("<title>First</title>"));

        store.insert_page(page("p1", "Renamed"));
        thread::sleep(Duration::from_millis(20));

        let second = site.render_post("p1").unwrap();
        assert!(second.contains("<title>Renamed</title>"));
    }

    #[test]
    fn test_serves_stale_page_when_regeneration_fails() {
        let store = blog();
        let site = site(&store, Duration::from_millis(10));

        let first = site.render_post("p1").unwrap();
        store.set_failing("p1", true);
        thread::sleep(Duration::from_millis(20));

        assert_eq!(site.render_post("p1").unwrap(), first);
    }

    #[test]
    fn test_fallback_generation_for_unknown_id() {
        let store = blog();
        let site = site(&store, Duration::from_secs(60));

        store.insert_page(page("late", "Late post"));
        store.set_children("late", Vec::new());

        let html = site.render_post("late").unwrap();
        assert!(html.contains("Late post"));
    }

    #[test]
    fn test_missing_post_is_not_found() {
        let store = blog();
        let site = site(&store, Duration::from_secs(60));
        assert!(site.render_post("missing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalidate_forces_regeneration() {
        let store = blog();
        let site = site(&store, Duration::from_secs(60));

        site.render_index().unwrap();
        site.invalidate();
        site.render_index().unwrap();

        assert_eq!(store.requests(), vec!["db", "db"]);
    }

    /// Store whose page fetches take a while.
    struct SlowStore {
        inner: MockStore,
        delay: Duration,
        page_fetches: AtomicUsize,
    }

    impl SlowStore {
        fn new(inner: MockStore, delay: Duration) -> Self {
            Self {
                inner,
                delay,
                page_fetches: AtomicUsize::new(0),
            }
        }
    }

    impl DocumentStore for SlowStore {
        fn query_database(&self, database_id: &str) -> Result<Vec<Page>, NotionError> {
            self.inner.query_database(database_id)
        }

        fn retrieve_page(&self, page_id: &str) -> Result<Page, NotionError> {
            self.page_fetches.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            self.inner.retrieve_page(page_id)
        }

        fn list_block_children(&self, block_id: &str) -> Result<Vec<Block>, NotionError> {
            self.inner.list_block_children(block_id)
        }
    }

    fn slow_site(store: &Arc<SlowStore>, revalidate: Duration) -> Site {
        let mut config = SiteConfig::new("db");
        config.revalidate = revalidate;
        Site::new(Arc::clone(store) as Arc<dyn DocumentStore>, config)
    }

    fn slow_blog(delay: Duration) -> Arc<SlowStore> {
        let inner = MockStore::new()
            .with_database("db", vec![page("p1", "First")])
            .with_children("p1", vec![Block::new("d", BlockKind::Divider)]);
        Arc::new(SlowStore::new(inner, delay))
    }

    #[test]
    fn test_concurrent_requests_share_one_regeneration() {
        let store = slow_blog(Duration::from_millis(100));
        let site = slow_site(&store, Duration::from_secs(60));

        let pages: Vec<Arc<str>> = thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| site.render_post("p1").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(store.page_fetches.load(Ordering::SeqCst), 1);
        assert!(pages.iter().all(|html| **html == *pages[0]));
    }

    #[test]
    fn test_stale_page_served_while_regenerating() {
        let store = slow_blog(Duration::from_millis(200));
        let site = slow_site(&store, Duration::from_millis(10));

        let first = site.render_post("p1").unwrap();
        store.inner.insert_page(page("p1", "Renamed"));
        thread::sleep(Duration::from_millis(20));

        let (during, regenerated) = thread::scope(|scope| {
            let regenerating = scope.spawn(|| site.render_post("p1").unwrap());
            thread::sleep(Duration::from_millis(50));
            let during = site.render_post("p1").unwrap();
            (during, regenerating.join().unwrap())
        });

        assert_eq!(during, first);
        assert!(regenerated.contains("<title>Renamed</title>"));
        assert_eq!(store.page_fetches.load(Ordering::SeqCst), 2);
    }
}
