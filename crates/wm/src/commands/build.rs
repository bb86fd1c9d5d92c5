//! `wm build` command implementation.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use super::{SiteArgs, ensure_project_dir, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Manifest output file (default: .waymark/manifest.json).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site fails to build or the manifest cannot be
    /// written. Nothing is written when the build fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.load_site()?;

        output.info(&format!(
            "Source: {}",
            site.config().docs_resolved.source_dir.display()
        ));

        let manifest = site.build()?;
        print_warnings(&output, manifest.warnings());

        let manifest_path = match self.output {
            Some(path) => path,
            None => {
                ensure_project_dir(&site.config().docs_resolved.project_dir)?;
                site.config().docs_resolved.manifest_path()
            }
        };

        let mut json = serde_json::to_string_pretty(&manifest)?;
        json.push('\n');
        if let Some(parent) = manifest_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&manifest_path, json)?;

        output.success(&format!(
            "Wrote manifest ({} pages) to {}",
            manifest.pages.len(),
            manifest_path.display()
        ));
        Ok(())
    }
}
