//! Filesystem content backend for Waymark.
//!
//! This crate provides [`FsStorage`], a filesystem implementation of the
//! [`Storage`](wm_storage::Storage) trait. It handles:
//!
//! - Recursive directory scanning for `.md`, `.mdx` and `.mdoc` pages
//! - YAML front matter (`title`, `description`, `sidebar`)
//! - Title fallback to the first H1 heading, then the file name
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use wm_storage::Storage;
//! use wm_storage_fs::FsStorage;
//!
//! let storage = FsStorage::new(PathBuf::from("src/content/docs"));
//! for doc in storage.scan()? {
//!     println!("{}: {}", doc.path, doc.title);
//! }
//! ```

mod front_matter;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use regex::Regex;
use wm_storage::{Document, Storage, StorageError, StorageErrorKind, titlecase_from_slug};

use scanner::DocumentRef;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Title used for a root index page without any heading.
const HOME_TITLE: &str = "Home";

/// Filesystem storage implementation.
///
/// Scans a content directory recursively and reads every page's front
/// matter. Pages are read in parallel.
pub struct FsStorage {
    /// Root content directory.
    source_dir: PathBuf,
    /// Regex for extracting the first H1 heading.
    h1_regex: Regex,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    ///
    /// # Panics
    ///
    /// Panics if the internal regex for H1 heading extraction fails to compile.
    /// This should never happen as the regex is a compile-time constant.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            h1_regex: Regex::new(r"(?m)^#\s+(.+)$").unwrap(),
        }
    }

    /// Root content directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Read a page and build its [`Document`].
    fn build_document(&self, doc_ref: &DocumentRef) -> Result<Document, StorageError> {
        let content = fs::read_to_string(&doc_ref.content_path).map_err(|e| {
            StorageError::io(e, Some(doc_ref.content_path.clone())).with_backend(BACKEND)
        })?;

        let (yaml, body) = front_matter::split(&content);
        let front_matter = match yaml.map(front_matter::parse).transpose() {
            Ok(fm) => fm.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(
                    path = %doc_ref.content_path.display(),
                    error = %e,
                    "Invalid front matter, using derived values"
                );
                front_matter::FrontMatter::default()
            }
        };

        let title = front_matter
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.extract_h1(body))
            .unwrap_or_else(|| Self::derive_title(doc_ref));

        Ok(Document {
            path: doc_ref.slug.clone(),
            title,
            description: front_matter.description,
            sidebar: front_matter.sidebar,
        })
    }

    /// Extract the first H1 heading from the page body.
    fn extract_h1(&self, body: &str) -> Option<String> {
        let caps = self.h1_regex.captures(body)?;
        let title = caps[1].trim();
        (!title.is_empty()).then(|| title.to_owned())
    }

    /// Title from the file name, or the directory name for index pages.
    fn derive_title(doc_ref: &DocumentRef) -> String {
        let name = if doc_ref.is_index() {
            doc_ref.slug.rsplit('/').next().unwrap_or_default()
        } else {
            doc_ref
                .content_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default()
        };
        if name.is_empty() {
            HOME_TITLE.to_owned()
        } else {
            titlecase_from_slug(name)
        }
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        if !self.source_dir.is_dir() {
            return Err(StorageError::new(StorageErrorKind::NotFound)
                .with_path(&self.source_dir)
                .with_backend(BACKEND));
        }

        let mut refs = scanner::scan(&self.source_dir);
        refs.sort_by(|a, b| {
            a.slug
                .cmp(&b.slug)
                .then_with(|| a.content_path.cmp(&b.content_path))
        });
        refs.dedup_by(|later, first| {
            let duplicate = later.slug == first.slug;
            if duplicate {
                tracing::warn!(
                    slug = %first.slug,
                    kept = %first.content_path.display(),
                    ignored = %later.content_path.display(),
                    "Two files map to the same page"
                );
            }
            duplicate
        });

        let documents: Vec<Document> = refs
            .par_iter()
            .filter_map(|r| {
                self.build_document(r)
                    .inspect_err(|e| {
                        tracing::warn!(error = %e, "Failed to read page, skipping");
                    })
                    .ok()
            })
            .collect();

        tracing::debug!(
            source_dir = %self.source_dir.display(),
            count = documents.len(),
            "Scanned content"
        );
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wm_storage::SidebarHints;

    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn scan(root: &Path) -> Vec<Document> {
        FsStorage::new(root.to_path_buf()).scan().unwrap()
    }

    #[test]
    fn test_scan_missing_directory_is_not_found() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope");

        let err = FsStorage::new(missing.clone()).scan().unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
        assert_eq!(err.backend, Some("Fs"));
        assert_eq!(err.path.as_deref(), Some(missing.as_path()));
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp = tempfile::tempdir().unwrap();
        assert!(scan(temp.path()).is_empty());
    }

    #[test]
    fn test_scan_sorted_by_slug() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "x/c.md", "# C");
        write(temp.path(), "x/a.md", "# A");
        write(temp.path(), "x/b.md", "# B");
        write(temp.path(), "index.mdx", "# Home");

        let paths: Vec<String> = scan(temp.path()).into_iter().map(|d| d.path).collect();

        assert_eq!(paths, vec!["", "x/a", "x/b", "x/c"]);
    }

    #[test]
    fn test_title_from_front_matter() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "guide.md",
            "---\ntitle: Front Matter Title\ndescription: About\n---\n# Heading Title\n",
        );

        let docs = scan(temp.path());

        assert_eq!(docs[0].title, "Front Matter Title");
        assert_eq!(docs[0].description.as_deref(), Some("About"));
    }

    #[test]
    fn test_title_from_h1() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "guide.md", "Intro text\n\n# Heading Title\n");

        assert_eq!(scan(temp.path())[0].title, "Heading Title");
    }

    #[test]
    fn test_title_from_file_name() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "setup-guide.md", "No heading here.\n");
        write(temp.path(), "shell-basics/index.md", "");
        write(temp.path(), "index.md", "");

        let titles: Vec<String> = scan(temp.path()).into_iter().map(|d| d.title).collect();

        assert_eq!(titles, vec!["Home", "Setup Guide", "Shell Basics"]);
    }

    #[test]
    fn test_sidebar_hints_from_front_matter() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "01-introduction/installation.md",
            "---\ntitle: Installation\nsidebar:\n  order: 2\n  label: Install\n  hidden: true\n---\n",
        );

        let docs = scan(temp.path());

        assert_eq!(docs[0].path, "01-introduction/installation");
        assert_eq!(
            docs[0].sidebar,
            SidebarHints {
                order: Some(2),
                label: Some("Install".to_owned()),
                hidden: true,
            }
        );
    }

    #[test]
    fn test_invalid_front_matter_falls_back() {
        let temp = tempfile::tempdir().unwrap();
        write(
            temp.path(),
            "broken.md",
            "---\ntitle: [unclosed\n---\n# Recovered\n",
        );

        let docs = scan(temp.path());

        assert_eq!(docs[0].title, "Recovered");
        assert_eq!(docs[0].sidebar, SidebarHints::default());
    }

    #[test]
    fn test_duplicate_slug_prefers_directory_index() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "guide.md", "# From File");
        write(temp.path(), "guide/index.md", "# From Index");

        let docs = scan(temp.path());

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "guide");
        assert_eq!(docs[0].title, "From Index");
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "good.md", "# Good");
        fs::write(temp.path().join("latin1.md"), b"# Caf\xe9").unwrap();

        let docs = scan(temp.path());

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].path, "good");
    }
}
