//! Static site builder.
//!
//! Output layout:
//!
//! ```text
//! out/
//! ├── index.html
//! ├── {id}/index.html
//! └── _data/
//!     ├── index.json
//!     └── {id}.json
//! ```

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;

use np_notion::DocumentStore;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::SiteError;
use crate::resolve::{PostProps, resolve_index, resolve_post, static_paths};
use crate::site::SiteConfig;
use crate::template::{render_index, render_post};

/// Directory holding page data next to the HTML.
const DATA_DIR: &str = "_data";

/// Summary of a finished build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildReport {
    /// Number of post pages written.
    pub posts: usize,
}

struct BuiltPost {
    props: PostProps,
    html: String,
}

/// Builds every page of the site into a directory.
pub struct StaticSiteBuilder {
    store: Arc<dyn DocumentStore>,
    config: SiteConfig,
}

impl StaticSiteBuilder {
    /// Create a builder over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: SiteConfig) -> Self {
        Self { store, config }
    }

    /// Resolve and render every page, then write them to `output_dir`.
    ///
    /// Nothing is written unless every page resolves and renders. Posts left
    /// over from an earlier build into the same directory are removed.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] on the first fetch, render or write failure.
    pub fn build(&self, output_dir: &Path) -> Result<BuildReport, SiteError> {
        let store = self.store.as_ref();
        let database_id = &self.config.database_id;

        let index = resolve_index(store, database_id)?;
        let index_html = render_index(&index.posts, &self.config.meta);

        let paths: Vec<String> = static_paths(store, database_id)?
            .into_iter()
            .filter(|id| {
                let safe = is_path_segment(id);
                if !safe {
                    warn!(page_id = %id, "Skipping post with unsafe id");
                }
                safe
            })
            .collect();

        let posts = paths
            .par_iter()
            .map(|id| -> Result<BuiltPost, SiteError> {
                let props = resolve_post(store, id)?;
                let html = render_post(Some(&props))?;
                Ok(BuiltPost { props, html })
            })
            .collect::<Result<Vec<_>, _>>()?;

        remove_stale_posts(output_dir, &paths)?;
        fs::create_dir_all(output_dir.join(DATA_DIR))?;
        fs::write(output_dir.join("index.html"), index_html)?;
        write_json(&output_dir.join(DATA_DIR).join("index.json"), &index)?;

        for (id, post) in paths.iter().zip(&posts) {
            let page_dir = output_dir.join(id);
            fs::create_dir_all(&page_dir)?;
            fs::write(page_dir.join("index.html"), &post.html)?;
            write_json(
                &output_dir.join(DATA_DIR).join(format!("{id}.json")),
                &post.props,
            )?;
        }

        info!(
            path = %output_dir.display(),
            count = posts.len(),
            "Static build complete"
        );
        Ok(BuildReport { posts: posts.len() })
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), SiteError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Delete posts written by an earlier build that are no longer in `keep`.
///
/// Only ids recorded in `_data/{id}.json` are touched, so unrelated files in
/// the output directory survive.
fn remove_stale_posts(output_dir: &Path, keep: &[String]) -> Result<(), SiteError> {
    let entries = match fs::read_dir(output_dir.join(DATA_DIR)) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let keep: HashSet<&str> = keep.iter().map(String::as_str).collect();

    for entry in entries {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        if id == "index" || keep.contains(id) || !is_path_segment(id) {
            continue;
        }

        let page_dir = output_dir.join(id);
        if page_dir.is_dir() {
            fs::remove_dir_all(&page_dir)?;
        }
        fs::remove_file(&path)?;
        info!(page_id = id, "Removed stale post");
    }
    Ok(())
}

/// Whether an id can be used as a single directory name.
fn is_path_segment(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}
