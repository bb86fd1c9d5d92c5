//! Navigation core for Waymark.
//!
//! This crate provides:
//! - [`ContentIndex`]: pages known at build time
//! - [`navigation`]: sidebar resolution into a validated [`Navigation`] tree
//! - [`theme`]: theme preference bootstrap
//! - [`ComponentRegistry`]: components available to content pages
//! - [`Site`]: the build that ties them together into a [`SiteManifest`]
//!
//! # Quick Start
//!
//! ```ignore
//! use std::path::Path;
//! use wm_config::Config;
//! use wm_site::{ContentIndex, resolve};
//! use wm_storage::Document;
//!
//! let config = Config::from_toml_str(
//!     r#"
//! [[sidebar]]
//! label = "Getting Started"
//! items = [{ label = "Start", link = "/intro/start/" }]
//! "#,
//!     Path::new("."),
//! )?;
//! let index = ContentIndex::new([Document::new("intro/start", "Start")]);
//!
//! let nav = resolve(&config.sidebar_resolved, &index)?;
//! assert_eq!(nav.entries()[0].depth, 1);
//! ```

mod components;
mod content;
pub mod navigation;
mod site;
pub mod theme;

pub use components::{Component, ComponentRegistry};
pub use content::ContentIndex;
pub use navigation::{
    NavGroup, NavLink, NavNode, Navigation, NavigationError, NavigationWarning,
    ResolvedNavigationEntry, Resolver, resolve,
};
pub use site::{PageEntry, Site, SiteError, SiteManifest, ThemeManifest};
pub use theme::{JsonFileStore, MemoryStore, StoreError, ThemeStore, bootstrap_script, ensure_default};
