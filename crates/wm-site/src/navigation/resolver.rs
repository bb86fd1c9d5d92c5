//! Sidebar tree resolution against the content index.

use std::collections::HashSet;

use wm_config::{AutogenerateSection, LocaleContext, SidebarItem, SidebarLink};
use wm_storage::slugify_path;

use super::autogenerate;
use super::{NavGroup, NavLink, NavNode, Navigation, NavigationError, NavigationWarning};
use crate::ContentIndex;

/// URL schemes that point outside the site and are never validated.
const EXTERNAL_SCHEMES: [&str; 3] = ["http://", "https://", "mailto:"];

/// Section name used for top-level entries in warnings.
const TOP_LEVEL: &str = "sidebar";

/// Resolve `sidebar` for the root locale with no base path.
///
/// # Errors
///
/// Returns [`NavigationError::BrokenLink`] for the first link whose target
/// matches no page.
pub fn resolve(sidebar: &[SidebarItem], index: &ContentIndex) -> Result<Navigation, NavigationError> {
    Resolver::new(index).resolve(sidebar)
}

/// Resolves sidebar declarations against one content index.
///
/// A resolver holds no state between calls, so resolving the same sidebar
/// twice yields equal output.
#[derive(Clone, Copy, Debug)]
pub struct Resolver<'a> {
    index: &'a ContentIndex,
    /// Base path without trailing slash (empty when served at `/`).
    base: &'a str,
    /// Content prefix of a non-root locale.
    locale_prefix: Option<&'a str>,
    /// Language tag for label translations.
    lang: Option<&'a str>,
}

impl<'a> Resolver<'a> {
    #[must_use]
    pub fn new(index: &'a ContentIndex) -> Self {
        Self {
            index,
            base: "",
            locale_prefix: None,
            lang: None,
        }
    }

    /// Strip `base` from internal link targets before lookup.
    #[must_use]
    pub fn with_base(mut self, base: &'a str) -> Self {
        self.base = base.trim_end_matches('/');
        self
    }

    /// Resolve for `locale`: localized content first, translated labels.
    #[must_use]
    pub fn with_locale(mut self, locale: &'a LocaleContext) -> Self {
        self.locale_prefix = locale.prefix.as_deref();
        self.lang = locale.lang.as_deref();
        self
    }

    /// Resolve a sidebar declaration into a navigation tree.
    ///
    /// # Errors
    ///
    /// Returns [`NavigationError::BrokenLink`] for the first link whose
    /// target matches no page. No partial navigation is returned.
    pub fn resolve(&self, sidebar: &[SidebarItem]) -> Result<Navigation, NavigationError> {
        let mut pass = Pass {
            resolver: self,
            warnings: Vec::new(),
        };
        let items = pass.resolve_items(sidebar, 0, &[])?;

        tracing::debug!(
            locale = self.locale_prefix.unwrap_or("root"),
            entries = items.len(),
            warnings = pass.warnings.len(),
            "Resolved navigation"
        );
        Ok(Navigation {
            items,
            warnings: pass.warnings,
        })
    }

    /// Slug a link target points at, or `None` when no page matches.
    fn lookup(&self, target: &str) -> Option<String> {
        let key = self.lookup_key(target);
        if let Some(prefix) = self.locale_prefix {
            let localized = if key.is_empty() {
                prefix.to_owned()
            } else {
                format!("{prefix}/{key}")
            };
            if self.index.contains(&localized) {
                return Some(localized);
            }
        }
        self.index.contains(&key).then_some(key)
    }

    /// Slug form of an internal target: no fragment, query, base, or outer
    /// slashes, with each segment slugified like scanned file names.
    fn lookup_key(&self, target: &str) -> String {
        let path = target.split(['#', '?']).next().unwrap_or_default();
        let path = match path.strip_prefix(self.base) {
            Some(rest) if !self.base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                rest
            }
            _ => path,
        };
        slugify_path(path.trim_matches('/'))
    }
}

fn is_external(target: &str) -> bool {
    EXTERNAL_SCHEMES
        .iter()
        .any(|scheme| target.starts_with(scheme))
}

/// One resolution run; collects warnings.
struct Pass<'r, 'a> {
    resolver: &'r Resolver<'a>,
    warnings: Vec<NavigationWarning>,
}

impl Pass<'_, '_> {
    fn resolve_items(
        &mut self,
        items: &[SidebarItem],
        depth: usize,
        parent: &[&str],
    ) -> Result<Vec<NavNode>, NavigationError> {
        let mut nodes = Vec::with_capacity(items.len());
        let mut seen = HashSet::new();

        for item in items {
            let mut path = parent.to_vec();
            path.push(&item.label().text);
            let label = item.label().localized(self.resolver.lang).to_owned();
            let ordinal = nodes.len();

            match item {
                SidebarItem::Link(link) => {
                    let (target, key, external) = self.resolve_link(link, &path)?;
                    if !seen.insert(key) {
                        self.warn(NavigationWarning::DuplicateLink {
                            section: section_name(parent),
                            target,
                        });
                        continue;
                    }
                    nodes.push(NavNode::Link(NavLink {
                        label,
                        target,
                        depth,
                        ordinal,
                        external,
                    }));
                }
                SidebarItem::Group(group) => {
                    let children = self.resolve_items(&group.items, depth + 1, &path)?;
                    nodes.push(NavNode::Group(NavGroup {
                        label,
                        depth,
                        ordinal,
                        collapsed: group.collapsed,
                        children,
                    }));
                }
                SidebarItem::Autogenerate(section) => {
                    let children = self.autogenerate(section, depth + 1, &path);
                    nodes.push(NavNode::Group(NavGroup {
                        label,
                        depth,
                        ordinal,
                        collapsed: section.collapsed,
                        children,
                    }));
                }
            }
        }

        Ok(nodes)
    }

    /// Target as emitted, duplicate key, and whether the link is external.
    fn resolve_link(
        &self,
        link: &SidebarLink,
        path: &[&str],
    ) -> Result<(String, String, bool), NavigationError> {
        if is_external(&link.link) {
            return Ok((link.link.clone(), link.link.clone(), true));
        }

        match self.resolver.lookup(&link.link) {
            Some(slug) => Ok((link.link.clone(), slug, false)),
            None => Err(NavigationError::BrokenLink {
                target: link.link.clone(),
                section: section_name(path),
            }),
        }
    }

    fn autogenerate(
        &mut self,
        section: &AutogenerateSection,
        depth: usize,
        path: &[&str],
    ) -> Vec<NavNode> {
        let resolver = self.resolver;
        let directory = autogenerate::source_directory(
            resolver.index,
            &slugify_path(&section.directory),
            resolver.locale_prefix,
        );
        let children = autogenerate::expand(resolver.index, &directory, depth, section.collapsed);

        if children.is_empty() {
            self.warn(NavigationWarning::EmptyDirectory {
                section: section_name(path),
                directory,
            });
        }
        children
    }

    fn warn(&mut self, warning: NavigationWarning) {
        tracing::warn!(%warning, "Navigation warning");
        self.warnings.push(warning);
    }
}

fn section_name(path: &[&str]) -> String {
    if path.is_empty() {
        TOP_LEVEL.to_owned()
    } else {
        path.join(" > ")
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use wm_config::Config;
    use wm_storage::Document;

    use super::*;
    use crate::navigation::ResolvedNavigationEntry;

    fn sidebar(toml_src: &str) -> Vec<SidebarItem> {
        Config::from_toml_str(toml_src, Path::new("/project"))
            .unwrap()
            .sidebar_resolved
    }

    fn index(slugs: &[&str]) -> ContentIndex {
        slugs.iter().map(|s| Document::new(*s, *s)).collect()
    }

    fn entry(label: &str, target: &str, depth: usize, ordinal: usize) -> ResolvedNavigationEntry {
        ResolvedNavigationEntry {
            label: label.to_owned(),
            target: target.to_owned(),
            depth,
            ordinal,
        }
    }

    #[test]
    fn test_group_with_link_resolves_at_depth_one() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Getting Started"
items = [{ label = "Start", link = "/intro/start/" }]
"#,
        );

        let nav = resolve(&tree, &index(&["intro/start"])).unwrap();

        assert_eq!(nav.entries(), vec![entry("Start", "/intro/start/", 1, 0)]);
        assert!(nav.warnings.is_empty());
    }

    #[test]
    fn test_dangling_link_is_broken_link_error() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Bad"
items = [{ label = "X", link = "/missing/" }]
"#,
        );

        let err = resolve(&tree, &index(&["intro/start"])).unwrap_err();

        assert_eq!(
            err,
            NavigationError::BrokenLink {
                target: "/missing/".to_owned(),
                section: "Bad > X".to_owned(),
            }
        );
    }

    #[test]
    fn test_only_the_dangling_link_is_named() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Guides"
items = [
  { label = "A", link = "/a/" },
  { label = "B", link = "/b/" },
  { label = "Gone", link = "/gone/" },
  { label = "C", link = "/c/" },
]
"#,
        );

        let NavigationError::BrokenLink { target, .. } =
            resolve(&tree, &index(&["a", "b", "c"])).unwrap_err();

        assert_eq!(target, "/gone/");
    }

    #[test]
    fn test_existing_links_never_fail() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Home"
link = "/"

[[sidebar]]
label = "Guides"
items = [
  { label = "A", link = "/a/" },
  { label = "B", link = "b" },
  { label = "C", link = "/c/#usage" },
  { label = "D", link = "/d/?tab=1" },
  { label = "Nested", items = [{ label = "E", link = "/e/f/" }] },
]
"#,
        );

        let nav = resolve(&tree, &index(&["", "a", "b", "c", "d", "e/f"])).unwrap();

        assert_eq!(nav.entries().len(), 6);
    }

    #[test]
    fn test_external_links_are_not_validated() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Links"
items = [
  { label = "GitHub", link = "https://github.com/garywu/dotfiles" },
  { label = "Mail", link = "mailto:docs@example.com" },
]
"#,
        );

        let nav = resolve(&tree, &ContentIndex::default()).unwrap();

        let NavNode::Group(group) = &nav.items[0] else {
            panic!("expected group");
        };
        let NavNode::Link(github) = &group.children[0] else {
            panic!("expected link");
        };
        assert!(github.external);
        assert_eq!(github.target, "https://github.com/garywu/dotfiles");
    }

    #[test]
    fn test_base_path_is_stripped_for_lookup() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Start"
link = "/dotfiles/intro/start/"

[[sidebar]]
label = "Home"
link = "/dotfiles"
"#,
        );
        let index = index(&["", "intro/start"]);

        let nav = Resolver::new(&index)
            .with_base("/dotfiles/")
            .resolve(&tree)
            .unwrap();

        assert_eq!(
            nav.entries(),
            vec![
                entry("Start", "/dotfiles/intro/start/", 0, 0),
                entry("Home", "/dotfiles", 0, 1),
            ]
        );
    }

    #[test]
    fn test_base_prefix_requires_segment_boundary() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Other"
link = "/dotfiles-extra/"
"#,
        );
        let index = index(&["extra"]);

        let err = Resolver::new(&index)
            .with_base("/dotfiles")
            .resolve(&tree)
            .unwrap_err();

        assert!(matches!(err, NavigationError::BrokenLink { .. }));
    }

    #[test]
    fn test_duplicate_link_in_section_keeps_first() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Guides"
items = [
  { label = "Start", link = "/intro/start/" },
  { label = "Again", link = "/intro/start" },
  { label = "Next", link = "/intro/next/" },
]
"#,
        );

        let nav = resolve(&tree, &index(&["intro/start", "intro/next"])).unwrap();

        assert_eq!(
            nav.entries(),
            vec![
                entry("Start", "/intro/start/", 1, 0),
                entry("Next", "/intro/next/", 1, 1),
            ]
        );
        assert_eq!(
            nav.warnings,
            vec![NavigationWarning::DuplicateLink {
                section: "Guides".to_owned(),
                target: "/intro/start".to_owned(),
            }]
        );
    }

    #[test]
    fn test_same_target_in_different_sections_is_allowed() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "One"
items = [{ label = "Start", link = "/intro/start/" }]

[[sidebar]]
label = "Two"
items = [{ label = "Start", link = "/intro/start/" }]
"#,
        );

        let nav = resolve(&tree, &index(&["intro/start"])).unwrap();

        assert_eq!(nav.entries().len(), 2);
        assert!(nav.warnings.is_empty());
    }

    #[test]
    fn test_empty_autogenerate_is_warning() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Reference"
autogenerate = { directory = "99-reference" }

[[sidebar]]
label = "Start"
link = "/intro/start/"
"#,
        );

        let nav = resolve(&tree, &index(&["intro/start"])).unwrap();

        let NavNode::Group(reference) = &nav.items[0] else {
            panic!("expected group");
        };
        assert!(reference.children.is_empty());
        assert_eq!(
            nav.warnings,
            vec![NavigationWarning::EmptyDirectory {
                section: "Reference".to_owned(),
                directory: "99-reference".to_owned(),
            }]
        );
        assert_eq!(nav.entries(), vec![entry("Start", "/intro/start/", 0, 1)]);
    }

    #[test]
    fn test_autogenerate_inside_group_keeps_depth() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Learn"
items = [{ label = "Tools", autogenerate = { directory = "x" } }]
"#,
        );

        let nav = resolve(&tree, &index(&["x/c", "x/a", "x/b"])).unwrap();

        assert_eq!(
            nav.entries(),
            vec![
                entry("x/a", "/x/a/", 2, 0),
                entry("x/b", "/x/b/", 2, 1),
                entry("x/c", "/x/c/", 2, 2),
            ]
        );
    }

    #[test]
    fn test_sibling_ordinals_preserve_declaration_order() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Same"
items = [{ label = "Z", link = "/z/" }]

[[sidebar]]
label = "Same"
items = [{ label = "A", link = "/a/" }]
"#,
        );

        let nav = resolve(&tree, &index(&["a", "z"])).unwrap();

        let ordinals: Vec<(&str, usize)> = nav
            .items
            .iter()
            .map(|n| match n {
                NavNode::Group(g) => (g.children[0].label(), g.ordinal),
                NavNode::Link(_) => panic!("expected group"),
            })
            .collect();
        assert_eq!(ordinals, vec![("Z", 0), ("A", 1)]);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let tree = sidebar(
            r#"
[[sidebar]]
label = "Getting Started"
autogenerate = { directory = "01-introduction" }

[[sidebar]]
label = "Links"
items = [
  { label = "Home", link = "/" },
  { label = "Home again", link = "/" },
]
"#,
        );
        let index = ContentIndex::new([
            Document::new("", "Home"),
            Document::new("01-introduction/installation", "Installation").with_order(2),
            Document::new("01-introduction/overview", "Overview").with_order(1),
        ]);

        let first = resolve(&tree, &index).unwrap();
        let second = resolve(&tree, &index).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_locale_prefers_localized_pages_and_labels() {
        let config = Config::from_toml_str(
            r#"
default_locale = "root"

[locales.root]
label = "English"
lang = "en"

[locales.de]
label = "Deutsch"
lang = "de"

[[sidebar]]
label = "Guides"
translations = { de = "Anleitungen" }
items = [
  { label = "Start", translations = { de = "Beginn" }, link = "/intro/start/" },
  { label = "Only English", link = "/intro/next/" },
]

[[sidebar]]
label = "Reference"
autogenerate = { directory = "reference" }
"#,
            Path::new("/project"),
        )
        .unwrap();
        let index = ContentIndex::new([
            Document::new("intro/start", "Start"),
            Document::new("intro/next", "Next"),
            Document::new("de/intro/start", "Beginn"),
            Document::new("reference/cli", "CLI"),
            Document::new("de/reference/cli", "Kommandozeile"),
        ]);
        let contexts = config.locale_contexts();
        let de = contexts.iter().find(|c| c.key == "de").unwrap();

        let nav = Resolver::new(&index)
            .with_locale(de)
            .resolve(&config.sidebar_resolved)
            .unwrap();

        assert_eq!(nav.items[0].label(), "Anleitungen");
        assert_eq!(
            nav.entries(),
            vec![
                entry("Beginn", "/intro/start/", 1, 0),
                entry("Only English", "/intro/next/", 1, 1),
                entry("Kommandozeile", "/de/reference/cli/", 1, 0),
            ]
        );
    }

    #[test]
    fn test_directory_names_match_scanned_slugs() {
        let temp = tempfile::tempdir().unwrap();
        let tools = temp.path().join("CLI Tools");
        std::fs::create_dir(&tools).unwrap();
        std::fs::write(tools.join("ripgrep.md"), "# ripgrep").unwrap();
        std::fs::write(tools.join("Fd Find.md"), "# fd").unwrap();
        let storage = wm_storage_fs::FsStorage::new(temp.path().to_path_buf());
        let index = ContentIndex::new(wm_storage::Storage::scan(&storage).unwrap());
        let tree = sidebar(
            r#"
[[sidebar]]
label = "CLI"
autogenerate = { directory = "CLI Tools" }

[[sidebar]]
label = "Search"
link = "/CLI Tools/Fd Find/"
"#,
        );

        let nav = resolve(&tree, &index).unwrap();

        assert!(nav.warnings.is_empty(), "{:?}", nav.warnings);
        assert_eq!(
            nav.entries(),
            vec![
                entry("fd", "/cli-tools/fd-find/", 1, 0),
                entry("ripgrep", "/cli-tools/ripgrep/", 1, 1),
                entry("Search", "/CLI Tools/Fd Find/", 0, 1),
            ]
        );
    }
}
