//! Sidebar resolution.
//!
//! Turns the validated sidebar declaration from `wm-config` into a
//! [`Navigation`] tree: explicit links are checked against the
//! [`ContentIndex`](crate::ContentIndex), autogenerate sections are expanded
//! from the pages under their directory, and nested groups keep their depth.
//!
//! Resolution either produces a complete tree or fails on the first broken
//! link. Recoverable conditions are collected as [`NavigationWarning`]s.

mod autogenerate;
mod resolver;

use std::fmt;

use serde::Serialize;

pub use resolver::{Resolver, resolve};

/// Fatal navigation error.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    /// Sidebar link whose target matches no page.
    #[error("Broken link `{target}` in sidebar section `{section}`")]
    BrokenLink {
        /// Link target as written.
        target: String,
        /// Label path to the link (e.g. "Guides > Start").
        section: String,
    },
}

/// Recoverable condition found during resolution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavigationWarning {
    /// Autogenerate section whose directory holds no visible pages.
    EmptyDirectory { section: String, directory: String },
    /// Link dropped because an earlier sibling has the same target.
    DuplicateLink { section: String, target: String },
}

impl fmt::Display for NavigationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDirectory { section, directory } => write!(
                f,
                "section `{section}` autogenerates from `{directory}`, which has no pages"
            ),
            Self::DuplicateLink { section, target } => {
                write!(f, "section `{section}` links to `{target}` more than once")
            }
        }
    }
}

/// Resolved sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NavNode {
    Link(NavLink),
    Group(NavGroup),
}

impl NavNode {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Link(link) => &link.label,
            Self::Group(group) => &group.label,
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Link(link) => link.depth,
            Self::Group(group) => group.depth,
        }
    }
}

/// Resolved link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    /// Link target (e.g. `/intro/start/` or `https://github.com/...`).
    pub target: String,
    pub depth: usize,
    /// Position among siblings.
    pub ordinal: usize,
    /// Target points outside the site.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
}

/// Resolved group of links and subgroups.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavGroup {
    pub label: String,
    pub depth: usize,
    /// Position among siblings.
    pub ordinal: usize,
    pub collapsed: bool,
    pub children: Vec<NavNode>,
}

/// Flattened link with its position in the tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedNavigationEntry {
    pub label: String,
    pub target: String,
    pub depth: usize,
    pub ordinal: usize,
}

/// Resolved sidebar for one locale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub items: Vec<NavNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<NavigationWarning>,
}

impl Navigation {
    /// Links in render order, depth-first.
    ///
    /// Groups contribute only their descendants.
    #[must_use]
    pub fn entries(&self) -> Vec<ResolvedNavigationEntry> {
        fn walk(nodes: &[NavNode], out: &mut Vec<ResolvedNavigationEntry>) {
            for node in nodes {
                match node {
                    NavNode::Link(link) => out.push(ResolvedNavigationEntry {
                        label: link.label.clone(),
                        target: link.target.clone(),
                        depth: link.depth,
                        ordinal: link.ordinal,
                    }),
                    NavNode::Group(group) => walk(&group.children, out),
                }
            }
        }

        let mut entries = Vec::new();
        walk(&self.items, &mut entries);
        entries
    }
}
