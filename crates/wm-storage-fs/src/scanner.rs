//! Content discovery by filesystem walking.
//!
//! The scanner only identifies files that form pages and returns lightweight
//! references. Reading and front matter parsing happen in `FsStorage`.

use std::fs;
use std::path::{Path, PathBuf};

use wm_storage::slugify_segment;

/// Extensions recognized as content pages.
const CONTENT_EXTENSIONS: [&str; 3] = ["md", "mdx", "mdoc"];

/// Reference to a page's source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DocumentRef {
    /// Slug (e.g., "", "01-introduction", "01-introduction/installation").
    pub slug: String,
    /// Path to the content file.
    pub content_path: PathBuf,
}

impl DocumentRef {
    /// Whether the page is a directory index (`index.md` and friends).
    pub fn is_index(&self) -> bool {
        self.content_path
            .file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("index"))
    }
}

/// Walk `source_dir` and return a reference for every content file.
///
/// Hidden files and directories are skipped. Unreadable subdirectories are
/// logged and skipped.
pub(crate) fn scan(source_dir: &Path) -> Vec<DocumentRef> {
    let mut refs = Vec::new();
    scan_directory(source_dir, "", &mut refs);
    refs
}

fn scan_directory(dir_path: &Path, slug_prefix: &str, refs: &mut Vec<DocumentRef>) {
    let entries = match fs::read_dir(dir_path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir_path.display(), error = %e, "Failed to read content directory, skipping");
            return;
        }
    };

    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if entry.file_type().is_ok_and(|t| t.is_dir()) {
            let child_slug = join_slug(slug_prefix, &slugify_segment(&name));
            scan_directory(&path, &child_slug, refs);
            continue;
        }

        let Some(stem) = content_stem(&path) else {
            continue;
        };

        let slug = if stem.eq_ignore_ascii_case("index") {
            slug_prefix.to_owned()
        } else {
            join_slug(slug_prefix, &slugify_segment(stem))
        };
        refs.push(DocumentRef {
            slug,
            content_path: path,
        });
    }
}

/// File stem when `path` has a content extension.
fn content_stem(path: &Path) -> Option<&str> {
    let ext = path.extension()?.to_str()?;
    if !CONTENT_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known))
    {
        return None;
    }
    path.file_stem()?.to_str()
}

fn join_slug(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}/{segment}")
    }
}
