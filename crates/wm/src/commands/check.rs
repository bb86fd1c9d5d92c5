//! `wm check` command implementation.

use clap::Args;

use super::{SiteArgs, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or any sidebar has a
    /// broken link.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.load_site()?;

        output.info(&format!(
            "Source: {}",
            site.config().docs_resolved.source_dir.display()
        ));

        let manifest = site.build()?;
        let warnings = print_warnings(&output, manifest.warnings());

        output.success(&format!(
            "Sidebar OK: {} pages, {} locale(s), {warnings} warning(s)",
            manifest.pages.len(),
            manifest.navigation.len(),
        ));
        Ok(())
    }
}
