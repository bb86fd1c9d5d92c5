//! Configuration management for Waymark.
//!
//! Parses `waymark.toml` with serde and provides auto-discovery of the
//! config file in parent directories. The sidebar declaration is validated
//! into [`SidebarItem`]s during load, so a loaded [`Config`] never carries a
//! malformed section.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site`
//! - `base`
//! - `social[].href`

mod expand;
mod sidebar;

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sidebar::SidebarItemRaw;
pub use sidebar::{AutogenerateSection, Label, SidebarGroup, SidebarItem, SidebarLink};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "waymark.toml";

/// Locale key that maps to unprefixed content.
pub const ROOT_LOCALE: &str = "root";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override docs source directory.
    pub source_dir: Option<PathBuf>,
    /// Override base path.
    pub base: Option<String>,
    /// Override the default theme.
    pub default_theme: Option<Theme>,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site title.
    pub title: String,
    /// Site description for meta tags.
    pub description: Option<String>,
    /// Deployed site origin (e.g. `https://garywu.github.io`).
    pub site: Option<String>,
    /// Base path the site is served under (e.g. `/dotfiles`).
    #[serde(alias = "base_path")]
    pub base: String,
    /// Locale whose navigation is built first and used by default.
    pub default_locale: String,
    /// Locale table keyed by locale code (`root` for the unprefixed locale).
    pub locales: BTreeMap<String, LocaleConfig>,
    /// Site logo.
    pub logo: Option<LogoConfig>,
    /// Social links shown in the header, in order.
    pub social: Vec<SocialLink>,
    /// Extra stylesheets passed through to the renderer.
    pub custom_css: Vec<String>,
    /// Sidebar declaration as written.
    sidebar: Vec<SidebarItemRaw>,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Theme defaults.
    pub theme: ThemeConfig,

    /// Validated sidebar tree (set after loading).
    #[serde(skip)]
    pub sidebar_resolved: Vec<SidebarItem>,
    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Locale label and language tag.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LocaleConfig {
    /// Human-readable name shown in the language picker.
    pub label: String,
    /// BCP 47 language tag (e.g. `en`, `pt-BR`).
    pub lang: String,
}

/// Logo reference.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct LogoConfig {
    /// Path to the logo asset.
    pub src: String,
    /// Hide the text title when the logo is shown.
    #[serde(default)]
    pub replaces_title: bool,
}

/// Social link in the site header.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct SocialLink {
    pub label: String,
    /// Icon identifier (e.g. `github`).
    pub icon: String,
    pub href: String,
}

/// Color theme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value persisted in preference stores.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ConfigError::Validation(format!(
                "unknown theme `{other}` (expected `light` or `dark`)"
            ))),
        }
    }
}

/// Theme defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Theme applied when no preference is stored.
    pub default: Theme,
    /// Key the preference is persisted under.
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: Theme::Light,
            storage_key: "theme".to_owned(),
        }
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
}

/// Resolved documentation configuration with absolute paths.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Content directory scanned for pages.
    pub source_dir: PathBuf,
    /// Project directory for waymark data (.waymark/).
    pub project_dir: PathBuf,
}

impl DocsConfig {
    /// Default manifest output path (.waymark/manifest.json).
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.project_dir.join("manifest.json")
    }

    /// Default theme preference store (.waymark/preferences.json).
    #[must_use]
    pub fn preferences_path(&self) -> PathBuf {
        self.project_dir.join("preferences.json")
    }
}

/// Locale to build navigation for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocaleContext {
    /// Locale key from the config (`root` for unprefixed content).
    pub key: String,
    /// Content path prefix, `None` for the root locale.
    pub prefix: Option<String>,
    /// Language tag used to pick label translations.
    pub lang: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Sidebar entry that is not exactly one of link, group, or autogenerate.
    #[error("Malformed sidebar section `{section}`: {reason}")]
    MalformedSection {
        /// Label path to the entry (e.g. "Guides > Deeper").
        section: String,
        reason: String,
    },
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`social[0].href`").
        field: String,
        /// Error message (e.g., "${`GITHUB_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `waymark.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the sidebar contains a malformed section.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse and resolve configuration from TOML text.
    ///
    /// Relative paths resolve against `config_dir`.
    ///
    /// # Errors
    ///
    /// Returns error on TOML, expansion, sidebar, or validation failure.
    pub fn from_toml_str(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before validation
        config.expand_env_vars()?;
        config.resolve_paths(config_dir);
        config.sidebar_resolved = sidebar::parse_sidebar(&config.sidebar)?;
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(base) = &settings.base {
            self.base.clone_from(base);
        }
        if let Some(theme) = settings.default_theme {
            self.theme.default = theme;
        }
    }

    /// Locales to build navigation for, root locale first.
    ///
    /// An empty locale table yields a single root locale without a language tag.
    #[must_use]
    pub fn locale_contexts(&self) -> Vec<LocaleContext> {
        if self.locales.is_empty() {
            return vec![LocaleContext {
                key: ROOT_LOCALE.to_owned(),
                prefix: None,
                lang: None,
            }];
        }

        let mut contexts: Vec<LocaleContext> = self
            .locales
            .iter()
            .map(|(key, locale)| LocaleContext {
                key: key.clone(),
                prefix: (key != ROOT_LOCALE).then(|| key.clone()),
                lang: Some(locale.lang.clone()),
            })
            .collect();
        // Default locale first; BTreeMap keeps the rest in key order.
        contexts.sort_by_key(|c| c.key != self.default_locale);
        contexts
    }

    /// Base path without its trailing slash (`/` becomes an empty string).
    #[must_use]
    pub fn base_prefix(&self) -> &str {
        self.base.trim_end_matches('/')
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            title: "Documentation".to_owned(),
            description: None,
            site: None,
            base: "/".to_owned(),
            default_locale: ROOT_LOCALE.to_owned(),
            locales: BTreeMap::new(),
            logo: None,
            social: Vec::new(),
            custom_css: Vec::new(),
            sidebar: Vec::new(),
            docs: DocsConfigRaw::default(),
            theme: ThemeConfig::default(),
            sidebar_resolved: Vec::new(),
            docs_resolved: DocsConfig {
                source_dir: base.join("src/content/docs"),
                project_dir: base.join(".waymark"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_identity()?;
        self.validate_social()?;
        self.validate_locales()?;
        require_non_empty(&self.theme.storage_key, "theme.storage_key")?;
        Ok(())
    }

    fn validate_identity(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.title, "title")?;
        if !self.base.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "base must start with `/` (got `{}`)",
                self.base
            )));
        }
        if let Some(site) = &self.site {
            require_http_url(site, "site")?;
        }
        if let Some(logo) = &self.logo {
            require_non_empty(&logo.src, "logo.src")?;
        }
        Ok(())
    }

    fn validate_social(&self) -> Result<(), ConfigError> {
        for (i, link) in self.social.iter().enumerate() {
            require_non_empty(&link.label, &format!("social[{i}].label"))?;
            require_non_empty(&link.icon, &format!("social[{i}].icon"))?;
            require_http_url(&link.href, &format!("social[{i}].href"))?;
        }
        Ok(())
    }

    fn validate_locales(&self) -> Result<(), ConfigError> {
        if self.locales.is_empty() {
            return Ok(());
        }
        if !self.locales.contains_key(&self.default_locale) {
            return Err(ConfigError::Validation(format!(
                "default_locale `{}` is not defined in [locales]",
                self.default_locale
            )));
        }
        for (key, locale) in &self.locales {
            require_non_empty(&locale.label, &format!("locales.{key}.label"))?;
            require_non_empty(&locale.lang, &format!("locales.{key}.lang"))?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.base = expand::expand_env(&self.base, "base")?;
        if let Some(ref site) = self.site {
            self.site = Some(expand::expand_env(site, "site")?);
        }
        for (i, link) in self.social.iter_mut().enumerate() {
            link.href = expand::expand_env(&link.href, &format!("social[{i}].href"))?;
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(
                self.docs
                    .source_dir
                    .as_deref()
                    .unwrap_or("src/content/docs"),
            ),
            project_dir: config_dir.join(".waymark"),
        };
    }
}
