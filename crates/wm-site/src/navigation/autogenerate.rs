//! Expansion of autogenerate sections from the content index.

use std::collections::BTreeMap;

use wm_storage::{Document, titlecase_from_slug};

use super::{NavGroup, NavLink, NavNode};
use crate::ContentIndex;

/// Sort name given to a directory's own index page, ahead of every file name.
const INDEX_NAME: &str = "";

/// Pages of one directory level, keyed by slug segment.
#[derive(Default)]
struct DirTrie<'a> {
    /// Page whose slug ends at this node (the directory index for non-leaves).
    page: Option<&'a Document>,
    children: BTreeMap<&'a str, DirTrie<'a>>,
}

impl<'a> DirTrie<'a> {
    fn insert(&mut self, segments: &[&'a str], doc: &'a Document) {
        match segments.split_first() {
            None => self.page = Some(doc),
            Some((first, rest)) => self.children.entry(*first).or_default().insert(rest, doc),
        }
    }
}

/// Pages with an order hint first, then by hint, then by file name.
type SortKey<'a> = (bool, Option<i32>, &'a str);

fn sort_key(order: Option<i32>, name: &str) -> SortKey<'_> {
    (order.is_none(), order, name)
}

/// Content directory an autogenerate section reads from.
///
/// A localized copy under `{locale}/{directory}` wins when it has pages.
pub(super) fn source_directory(
    index: &ContentIndex,
    directory: &str,
    locale_prefix: Option<&str>,
) -> String {
    if let Some(prefix) = locale_prefix {
        let localized = format!("{prefix}/{directory}");
        if index.has_under(&localized) {
            return localized;
        }
    }
    directory.to_owned()
}

/// Entries for every visible page at or below `directory`.
///
/// Top-level entries get `depth`; subdirectories become nested groups
/// labeled by their index page's sidebar label or the titlecased directory
/// name. Returns an empty list when the directory has no visible pages.
pub(super) fn expand(
    index: &ContentIndex,
    directory: &str,
    depth: usize,
    collapsed: bool,
) -> Vec<NavNode> {
    let mut root = DirTrie::default();
    for doc in index.under(directory).filter(|d| !d.sidebar.hidden) {
        let relative = doc.path[directory.len()..].trim_start_matches('/');
        let segments: Vec<&str> = if relative.is_empty() {
            Vec::new()
        } else {
            relative.split('/').collect()
        };
        root.insert(&segments, doc);
    }
    build_level(&root, depth, collapsed)
}

fn build_level(trie: &DirTrie<'_>, depth: usize, collapsed: bool) -> Vec<NavNode> {
    let mut keyed: Vec<(SortKey<'_>, NavNode)> = Vec::new();

    if let Some(page) = trie.page {
        keyed.push((sort_key(page.sidebar.order, INDEX_NAME), page_link(page, depth)));
    }

    for (name, child) in &trie.children {
        if child.children.is_empty() {
            if let Some(page) = child.page {
                keyed.push((sort_key(page.sidebar.order, name), page_link(page, depth)));
            }
            continue;
        }

        let label = child
            .page
            .and_then(|p| p.sidebar.label.clone())
            .unwrap_or_else(|| titlecase_from_slug(name));
        let order = child.page.and_then(|p| p.sidebar.order);
        keyed.push((
            sort_key(order, name),
            NavNode::Group(NavGroup {
                label,
                depth,
                ordinal: 0,
                collapsed,
                children: build_level(child, depth + 1, collapsed),
            }),
        ));
    }

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed
        .into_iter()
        .enumerate()
        .map(|(ordinal, (_, mut node))| {
            match &mut node {
                NavNode::Link(link) => link.ordinal = ordinal,
                NavNode::Group(group) => group.ordinal = ordinal,
            }
            node
        })
        .collect()
}

fn page_link(page: &Document, depth: usize) -> NavNode {
    NavNode::Link(NavLink {
        label: page
            .sidebar
            .label
            .clone()
            .unwrap_or_else(|| page.title.clone()),
        target: page_target(&page.path),
        depth,
        ordinal: 0,
        external: false,
    })
}

/// Site-relative URL for a slug (`/` for the home page).
pub(super) fn page_target(slug: &str) -> String {
    if slug.is_empty() {
        "/".to_owned()
    } else {
        format!("/{slug}/")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn labels(nodes: &[NavNode]) -> Vec<&str> {
        nodes.iter().map(NavNode::label).collect()
    }

    #[test]
    fn test_alphabetical_by_file_name() {
        let index = ContentIndex::new([
            Document::new("x/c", "c"),
            Document::new("x/a", "a"),
            Document::new("x/b", "b"),
        ]);

        let nodes = expand(&index, "x", 1, false);

        assert_eq!(labels(&nodes), vec!["a", "b", "c"]);
        let targets: Vec<&str> = nodes
            .iter()
            .map(|n| match n {
                NavNode::Link(link) => link.target.as_str(),
                NavNode::Group(_) => panic!("expected link"),
            })
            .collect();
        assert_eq!(targets, vec!["/x/a/", "/x/b/", "/x/c/"]);
    }

    #[test]
    fn test_order_hints_sort_first() {
        let index = ContentIndex::new([
            Document::new("x/a", "A"),
            Document::new("x/b", "B").with_order(2),
            Document::new("x/c", "C").with_order(1),
            Document::new("x/d", "D"),
        ]);

        assert_eq!(labels(&expand(&index, "x", 0, false)), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn test_equal_order_falls_back_to_file_name() {
        let index = ContentIndex::new([
            Document::new("x/zeta", "Zeta").with_order(1),
            Document::new("x/alpha", "Alpha").with_order(1),
        ]);

        assert_eq!(labels(&expand(&index, "x", 0, false)), vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_hidden_pages_excluded() {
        let index = ContentIndex::new([
            Document::new("x/a", "A"),
            Document::new("x/b", "B").hidden(),
        ]);

        assert_eq!(labels(&expand(&index, "x", 0, false)), vec!["A"]);
    }

    #[test]
    fn test_sidebar_label_overrides_title() {
        let index = ContentIndex::new([Document::new("x/ripgrep", "ripgrep (rg)").with_sidebar_label("rg")]);

        assert_eq!(labels(&expand(&index, "x", 0, false)), vec!["rg"]);
    }

    #[test]
    fn test_subdirectories_become_groups() {
        let index = ContentIndex::new([
            Document::new("x", "Overview"),
            Document::new("x/shell-basics/pipes", "Pipes"),
            Document::new("x/shell-basics/globs", "Globs"),
            Document::new("x/tools", "Tools Index").with_sidebar_label("Toolbox"),
            Document::new("x/tools/fzf", "fzf"),
            Document::new("x/zz", "Last"),
        ]);

        let nodes = expand(&index, "x", 1, true);

        assert_eq!(labels(&nodes), vec!["Overview", "Shell Basics", "Toolbox", "Last"]);

        let NavNode::Group(shell) = &nodes[1] else {
            panic!("expected group");
        };
        assert_eq!(shell.depth, 1);
        assert_eq!(shell.ordinal, 1);
        assert!(shell.collapsed);
        assert_eq!(labels(&shell.children), vec!["Globs", "Pipes"]);
        assert_eq!(shell.children[0].depth(), 2);

        let NavNode::Group(tools) = &nodes[2] else {
            panic!("expected group");
        };
        assert_eq!(labels(&tools.children), vec!["Toolbox", "fzf"]);
    }

    #[test]
    fn test_group_uses_index_order_hint() {
        let index = ContentIndex::new([
            Document::new("x/a", "A"),
            Document::new("x/later", "Later").with_order(1),
            Document::new("x/later/page", "Page"),
        ]);

        assert_eq!(labels(&expand(&index, "x", 0, false)), vec!["Later", "A"]);
    }

    #[test]
    fn test_empty_directory_yields_nothing() {
        let index = ContentIndex::new([Document::new("y/a", "A")]);
        assert!(expand(&index, "x", 0, false).is_empty());
    }

    #[test]
    fn test_source_directory_prefers_localized_copy() {
        let index = ContentIndex::new([
            Document::new("guides/a", "A"),
            Document::new("de/guides/a", "A (de)"),
        ]);

        assert_eq!(source_directory(&index, "guides", Some("de")), "de/guides");
        assert_eq!(source_directory(&index, "guides", Some("fr")), "guides");
        assert_eq!(source_directory(&index, "guides", None), "guides");
    }

    #[test]
    fn test_page_target() {
        assert_eq!(page_target(""), "/");
        assert_eq!(page_target("intro/start"), "/intro/start/");
    }
}
