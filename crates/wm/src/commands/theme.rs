//! `wm theme` command implementations.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use wm_config::Theme;
use wm_site::{JsonFileStore, bootstrap_script, ensure_default};

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Theme preference commands.
#[derive(Subcommand)]
pub(crate) enum ThemeCommand {
    /// Store the default theme unless a preference already exists.
    Init(InitArgs),
    /// Print the inline head script that applies the default theme.
    Script(ScriptArgs),
}

impl ThemeCommand {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Init(args) => args.execute(),
            Self::Script(args) => args.execute(),
        }
    }
}

/// Arguments for `wm theme init`.
#[derive(Args)]
pub(crate) struct InitArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Preference file (default: .waymark/preferences.json).
    #[arg(long)]
    store: Option<PathBuf>,

    /// Theme to store when none is set (overrides config).
    #[arg(long)]
    default: Option<Theme>,
}

impl InitArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.site.load_config(self.default)?;
        let path = self
            .store
            .unwrap_or_else(|| config.docs_resolved.preferences_path());
        let mut store = JsonFileStore::new(path);

        match ensure_default(&mut store, &config.theme.storage_key, config.theme.default) {
            Some(theme) => output.success(&format!(
                "Theme preference `{}` is {theme} ({})",
                config.theme.storage_key,
                store.path().display()
            )),
            None => output.warning(&format!(
                "Theme preference left unchanged: {} is unavailable or holds an unknown value",
                store.path().display()
            )),
        }
        Ok(())
    }
}

/// Arguments for `wm theme script`.
#[derive(Args)]
pub(crate) struct ScriptArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Theme applied when none is stored (overrides config).
    #[arg(long)]
    default: Option<Theme>,
}

impl ScriptArgs {
    fn execute(self) -> Result<(), CliError> {
        let config = self.site.load_config(self.default)?;
        Output::new().print(bootstrap_script(&config.theme.storage_key, config.theme.default).trim_end());
        Ok(())
    }
}
