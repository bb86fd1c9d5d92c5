//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for scanning the documentation
//! content set, along with [`StorageError`] for unified error handling
//! across backends.
//!
//! # Slug Convention
//!
//! Document paths are **slugs**, not file paths:
//! - `""` - root (home page)
//! - `"01-introduction"` - directory index page
//! - `"01-introduction/installation"` - page inside a directory
//!
//! Slugs never carry a leading or trailing slash.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Sidebar hints read from a page's front matter (`sidebar:` block).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarHints {
    /// Explicit position among autogenerated siblings (lower sorts first).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    /// Label used instead of the page title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Exclude the page from autogenerated sections.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,
}

/// A content unit returned by storage scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Slug (e.g., "", "01-introduction", "01-introduction/installation").
    pub path: String,
    /// Document title (resolved: front matter > H1 > file name).
    pub title: String,
    /// Page description from front matter.
    pub description: Option<String>,
    /// Sidebar hints from front matter.
    pub sidebar: SidebarHints,
}

impl Document {
    /// Create a document with only a slug and title.
    #[must_use]
    pub fn new(path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            description: None,
            sidebar: SidebarHints::default(),
        }
    }

    /// Set the sidebar order hint.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.sidebar.order = Some(order);
        self
    }

    /// Set the sidebar label override.
    #[must_use]
    pub fn with_sidebar_label(mut self, label: impl Into<String>) -> Self {
        self.sidebar.label = Some(label.into());
        self
    }

    /// Mark the document as hidden from autogenerated sections.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.sidebar.hidden = true;
        self
    }

    /// Last slug segment, which is the file (or directory) name.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::Unavailable => "Unavailable",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Convert a slug (kebab-case or `snake_case`) to title case.
///
/// Replaces `-` and `_` with spaces, then capitalizes the first letter of each word.
///
/// # Examples
///
/// ```
/// # use wm_storage::titlecase_from_slug;
/// assert_eq!(titlecase_from_slug("setup-guide"), "Setup Guide");
/// assert_eq!(titlecase_from_slug("my_page"), "My Page");
/// ```
#[must_use]
pub fn titlecase_from_slug(slug: &str) -> String {
    let mut result = String::with_capacity(slug.len());
    for word in slug.split(['-', '_', ' ']).filter(|w| !w.is_empty()) {
        if !result.is_empty() {
            result.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Slug form of one path segment: trimmed, lowercased, spaces as `-`.
///
/// # Examples
///
/// ```
/// # use wm_storage::slugify_segment;
/// assert_eq!(slugify_segment("CLI Tools"), "cli-tools");
/// ```
#[must_use]
pub fn slugify_segment(segment: &str) -> String {
    segment.trim().to_lowercase().replace(' ', "-")
}

/// Apply [`slugify_segment`] to every `/`-separated segment of `path`.
#[must_use]
pub fn slugify_path(path: &str) -> String {
    path.split('/').map(slugify_segment).collect::<Vec<_>>().join("/")
}

/// Source of the content set a site build resolves navigation against.
///
/// Implementations handle backend-specific details like front matter
/// parsing and title extraction.
pub trait Storage: Send + Sync {
    /// Scan and return all documents, sorted by slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if scanning fails (e.g., the content
    /// directory is missing or unreadable).
    fn scan(&self) -> Result<Vec<Document>, StorageError>;
}
