//! Content index: the set of pages known at build time.

use std::collections::BTreeMap;
use std::ops::Bound;

use wm_storage::Document;

/// Read-only map from slug to page.
///
/// Slugs have no leading or trailing slash (`""` is the home page).
#[derive(Clone, Debug, Default)]
pub struct ContentIndex {
    documents: BTreeMap<String, Document>,
}

impl ContentIndex {
    /// Build an index from scanned documents.
    ///
    /// When two documents share a slug the first one wins.
    #[must_use]
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut map = BTreeMap::new();
        for doc in documents {
            map.entry(doc.path.clone()).or_insert(doc);
        }
        Self { documents: map }
    }

    /// Whether a page exists at `slug`.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.documents.contains_key(slug)
    }

    #[must_use]
    pub fn get(&self, slug: &str) -> Option<&Document> {
        self.documents.get(slug)
    }

    /// Pages at or below `directory`, in slug order.
    ///
    /// The directory's own index page (slug equal to `directory`) is
    /// included. An empty directory matches every page.
    pub fn under<'a>(&'a self, directory: &'a str) -> impl Iterator<Item = &'a Document> + 'a {
        self.documents
            .range::<str, _>((Bound::Included(directory), Bound::Unbounded))
            .take_while(move |(slug, _)| slug.starts_with(directory))
            .filter(move |(slug, _)| is_within(slug, directory))
            .map(|(_, doc)| doc)
    }

    /// Whether any page lives at or below `directory`.
    #[must_use]
    pub fn has_under(&self, directory: &str) -> bool {
        self.under(directory).next().is_some()
    }

    /// All pages in slug order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl FromIterator<Document> for ContentIndex {
    fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// `slug` equals `directory` or sits below it on a segment boundary.
fn is_within(slug: &str, directory: &str) -> bool {
    if directory.is_empty() {
        return true;
    }
    slug.strip_prefix(directory)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}
