//! Site build: content scan, per-locale navigation, and the manifest.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use wm_config::Config;
//! use wm_site::Site;
//! use wm_storage_fs::FsStorage;
//!
//! let config = Config::load(None, None)?;
//! let storage = Arc::new(FsStorage::new(config.docs_resolved.source_dir.clone()));
//! let manifest = Site::new(config, storage).build()?;
//! println!("{}", serde_json::to_string_pretty(&manifest)?);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use wm_config::{Config, LocaleConfig, LocaleContext, LogoConfig, SocialLink, Theme};
use wm_storage::{Storage, StorageError};

use crate::components::ComponentRegistry;
use crate::content::ContentIndex;
use crate::navigation::{Navigation, NavigationError, NavigationWarning, Resolver};
use crate::theme::bootstrap_script;

/// Error from a site build.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    /// Content could not be scanned.
    #[error("Failed to scan content: {0}")]
    Storage(#[from] StorageError),
    /// Sidebar resolution failed for a locale.
    #[error("Sidebar for locale `{locale}` is invalid: {source}")]
    Navigation {
        locale: String,
        #[source]
        source: NavigationError,
    },
    /// Requested locale is not configured.
    #[error("Unknown locale `{0}`")]
    UnknownLocale(String),
}

/// Page summary in the manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageEntry {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Theme settings handed to the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ThemeManifest {
    pub default: Theme,
    pub storage_key: String,
    /// Inline head script applying the default before first paint.
    pub bootstrap_script: String,
}

/// Everything the renderer needs, serialized to JSON.
#[derive(Debug, Serialize)]
pub struct SiteManifest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    pub base: String,
    pub default_locale: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub locales: BTreeMap<String, LocaleConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoConfig>,
    pub social: Vec<SocialLink>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_css: Vec<String>,
    pub theme: ThemeManifest,
    pub components: ComponentRegistry,
    /// Resolved sidebar per locale key.
    pub navigation: BTreeMap<String, Navigation>,
    pub pages: Vec<PageEntry>,
}

impl SiteManifest {
    /// Warnings from every locale as `(locale, warning)`.
    pub fn warnings(&self) -> impl Iterator<Item = (&str, &NavigationWarning)> {
        self.navigation
            .iter()
            .flat_map(|(locale, nav)| nav.warnings.iter().map(move |w| (locale.as_str(), w)))
    }
}

/// A configured site over one content source.
pub struct Site {
    config: Config,
    storage: Arc<dyn Storage>,
}

impl Site {
    #[must_use]
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan storage into a content index.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Storage`] if the scan fails.
    pub fn content_index(&self) -> Result<ContentIndex, SiteError> {
        let documents = self.storage.scan()?;
        tracing::debug!(pages = documents.len(), "Built content index");
        Ok(ContentIndex::new(documents))
    }

    /// Resolve the sidebar for one locale against `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Navigation`] on a broken link.
    pub fn navigation(
        &self,
        index: &ContentIndex,
        locale: &LocaleContext,
    ) -> Result<Navigation, SiteError> {
        Resolver::new(index)
            .with_base(self.config.base_prefix())
            .with_locale(locale)
            .resolve(&self.config.sidebar_resolved)
            .map_err(|source| SiteError::Navigation {
                locale: locale.key.clone(),
                source,
            })
    }

    /// Locale context for `key`, or the default locale when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::UnknownLocale`] if `key` is not configured.
    pub fn locale(&self, key: Option<&str>) -> Result<LocaleContext, SiteError> {
        let mut contexts = self.config.locale_contexts();
        match key {
            None => Ok(contexts.remove(0)),
            Some(key) => contexts
                .into_iter()
                .find(|c| c.key == key)
                .ok_or_else(|| SiteError::UnknownLocale(key.to_owned())),
        }
    }

    /// Build the manifest: scan content, then resolve every locale.
    ///
    /// Fails on the first broken link; no partial manifest is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError`] if scanning or navigation resolution fails.
    pub fn build(&self) -> Result<SiteManifest, SiteError> {
        let index = self.content_index()?;

        let mut navigation = BTreeMap::new();
        for locale in self.config.locale_contexts() {
            let nav = self.navigation(&index, &locale)?;
            navigation.insert(locale.key, nav);
        }

        let config = &self.config;
        let manifest = SiteManifest {
            title: config.title.clone(),
            description: config.description.clone(),
            site: config.site.clone(),
            base: config.base.clone(),
            default_locale: config.default_locale.clone(),
            locales: config.locales.clone(),
            logo: config.logo.clone(),
            social: config.social.clone(),
            custom_css: config.custom_css.clone(),
            theme: ThemeManifest {
                default: config.theme.default,
                storage_key: config.theme.storage_key.clone(),
                bootstrap_script: bootstrap_script(&config.theme.storage_key, config.theme.default),
            },
            components: ComponentRegistry,
            navigation,
            pages: index
                .iter()
                .map(|doc| PageEntry {
                    slug: doc.path.clone(),
                    title: doc.title.clone(),
                    description: doc.description.clone(),
                })
                .collect(),
        };

        tracing::info!(
            pages = manifest.pages.len(),
            locales = manifest.navigation.len(),
            warnings = manifest.warnings().count(),
            "Built site manifest"
        );
        Ok(manifest)
    }
}
