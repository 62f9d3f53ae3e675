//! `np build` command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use np_config::{CliSettings, Config};
use np_notion::{DocumentStore, NotionClient};
use np_site::{SiteConfig, SiteMeta, StaticSiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Output directory for the generated site (default: out/ next to np.toml).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Notion database holding the posts (overrides config).
    #[arg(long)]
    database_id: Option<String>,

    /// Path to configuration file (default: auto-discover np.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output (fetch logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            database_id: self.database_id,
            output_dir: self.output_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let notion = config.require_notion()?;
        let output_dir = &config.build_resolved.output_dir;

        output.info(&format!("Notion database: {}", notion.database_id));
        output.info(&format!("Output: {}", output_dir.display()));

        let store: Arc<dyn DocumentStore> = Arc::new(NotionClient::new(
            &notion.base_url,
            &notion.token,
            &notion.version,
        ));
        let site_config = SiteConfig {
            database_id: notion.database_id.clone(),
            meta: SiteMeta {
                title: config.site.title.clone(),
                description: config.site.description.clone(),
            },
            revalidate: Duration::from_secs(config.site.revalidate_secs),
        };

        let report = StaticSiteBuilder::new(store, site_config).build(output_dir)?;

        output.success(&format!(
            "Built {} posts to {}",
            report.posts,
            output_dir.display()
        ));
        Ok(())
    }
}
