//! Content storage abstraction for Waymark.
//!
//! This crate provides a [`Storage`] trait that abstracts how the set of
//! documentation pages is discovered, so navigation can be resolved and
//! tested without touching the real filesystem.
//!
//! The crate provides:
//! - [`Storage`] trait with a single `scan()` method
//! - [`Document`] content units carrying front-matter [`SidebarHints`]
//! - [`MockStorage`] for testing (behind `mock` feature flag)

#[cfg(feature = "mock")]
mod mock;
mod storage;

#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    Document, SidebarHints, Storage, StorageError, StorageErrorKind, slugify_path, slugify_segment,
    titlecase_from_slug,
};
