//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod check;
pub(crate) mod nav;
pub(crate) mod theme;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use wm_config::{CliSettings, Config, Theme};
use wm_site::{NavigationWarning, Site};
use wm_storage::Storage;
use wm_storage_fs::FsStorage;

pub(crate) use build::BuildArgs;
pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use theme::ThemeCommand;

use crate::error::CliError;
use crate::output::Output;

/// Options shared by commands that load the site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover waymark.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Content source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Base path the site is served under (overrides config).
    #[arg(long, env = "WAYMARK_BASE")]
    base: Option<String>,
}

impl SiteArgs {
    /// Load configuration with CLI overrides applied.
    pub(crate) fn load_config(&self, default_theme: Option<Theme>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
            base: self.base.clone(),
            default_theme,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Load configuration and attach filesystem content.
    pub(crate) fn load_site(&self) -> Result<Site, CliError> {
        let config = self.load_config(None)?;
        tracing::info!(
            source_dir = %config.docs_resolved.source_dir.display(),
            config = ?config.config_path,
            "Loading site"
        );
        let storage: Arc<dyn Storage> =
            Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
        Ok(Site::new(config, storage))
    }
}

/// Print navigation warnings, returning how many there were.
pub(crate) fn print_warnings<'a>(
    output: &Output,
    warnings: impl IntoIterator<Item = (&'a str, &'a NavigationWarning)>,
) -> usize {
    let mut count = 0;
    for (locale, warning) in warnings {
        output.warning(&format!("Warning [{locale}]: {warning}"));
        count += 1;
    }
    count
}

/// Create the project directory with a `.gitignore` for generated files.
pub(crate) fn ensure_project_dir(project_dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(project_dir)?;

    let gitignore_path = project_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let _ = std::fs::write(&gitignore_path, "# Automatically created by wm\n*\n");
    }

    Ok(())
}
