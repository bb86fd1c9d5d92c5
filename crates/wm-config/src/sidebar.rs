//! Sidebar declaration parsing.
//!
//! `[[sidebar]]` entries arrive as loose tables where `link`, `items` and
//! `autogenerate` are all optional. [`parse_sidebar`] turns them into the
//! [`SidebarItem`] sum type so downstream code never checks field presence.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::ConfigError;

/// Sidebar entry as written in `waymark.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SidebarItemRaw {
    label: Option<String>,
    link: Option<String>,
    items: Option<Vec<SidebarItemRaw>>,
    autogenerate: Option<AutogenerateRaw>,
    collapsed: Option<bool>,
    #[serde(default)]
    translations: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AutogenerateRaw {
    directory: String,
    collapsed: Option<bool>,
}

/// Display label with optional per-language overrides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Label {
    /// Label used when no translation matches.
    pub text: String,
    /// Language tag (e.g. `de`, `pt-BR`) to translated label.
    pub translations: BTreeMap<String, String>,
}

impl Label {
    /// Create a label without translations.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            translations: BTreeMap::new(),
        }
    }

    /// Label for `lang`, falling back to the untranslated text.
    #[must_use]
    pub fn localized(&self, lang: Option<&str>) -> &str {
        lang.and_then(|lang| self.translations.get(lang))
            .map_or(self.text.as_str(), String::as_str)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A validated sidebar entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SidebarItem {
    /// Single link to a page or an external URL.
    Link(SidebarLink),
    /// Labeled group of nested entries.
    Group(SidebarGroup),
    /// Labeled section whose entries come from a content directory.
    Autogenerate(AutogenerateSection),
}

impl SidebarItem {
    /// Label of the entry regardless of its kind.
    #[must_use]
    pub fn label(&self) -> &Label {
        match self {
            Self::Link(link) => &link.label,
            Self::Group(group) => &group.label,
            Self::Autogenerate(section) => &section.label,
        }
    }
}

/// Explicit link entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarLink {
    pub label: Label,
    /// Link target as written (e.g. `/intro/start/`).
    pub link: String,
}

/// Group of nested sidebar entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SidebarGroup {
    pub label: Label,
    pub items: Vec<SidebarItem>,
    /// Render the group collapsed by default.
    pub collapsed: bool,
}

/// Request to derive entries from every page under `directory`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutogenerateSection {
    pub label: Label,
    /// Content directory relative to the docs root, without surrounding slashes.
    pub directory: String,
    pub collapsed: bool,
}

/// Validate raw sidebar entries into [`SidebarItem`]s.
///
/// Fails on the first malformed entry with the label path leading to it.
pub(crate) fn parse_sidebar(raw: &[SidebarItemRaw]) -> Result<Vec<SidebarItem>, ConfigError> {
    parse_items(raw, &[])
}

fn parse_items(raw: &[SidebarItemRaw], parent: &[String]) -> Result<Vec<SidebarItem>, ConfigError> {
    raw.iter()
        .enumerate()
        .map(|(index, item)| {
            let mut path = parent.to_vec();
            path.push(segment_name(item, index));
            parse_item(item, &path)
        })
        .collect()
}

/// Path segment for error messages: the label, or `#index` when unlabeled.
fn segment_name(item: &SidebarItemRaw, index: usize) -> String {
    match item.label.as_deref().map(str::trim) {
        Some(label) if !label.is_empty() => label.to_owned(),
        _ => format!("#{index}"),
    }
}

fn parse_item(item: &SidebarItemRaw, path: &[String]) -> Result<SidebarItem, ConfigError> {
    let malformed = |reason: String| ConfigError::MalformedSection {
        section: path.join(" > "),
        reason,
    };

    let present: Vec<&str> = [
        ("link", item.link.is_some()),
        ("items", item.items.is_some()),
        ("autogenerate", item.autogenerate.is_some()),
    ]
    .into_iter()
    .filter_map(|(name, set)| set.then_some(name))
    .collect();

    if present.len() > 1 {
        return Err(malformed(format!(
            "sets more than one of `link`, `items`, `autogenerate` (found: {})",
            present.join(", ")
        )));
    }

    let label = match item.label.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Label {
            text: text.to_owned(),
            translations: item.translations.clone(),
        },
        _ => return Err(malformed("missing label".to_owned())),
    };

    if let Some(link) = &item.link {
        if item.collapsed.is_some() {
            return Err(malformed("`collapsed` only applies to groups".to_owned()));
        }
        let link = link.trim();
        if link.is_empty() {
            return Err(malformed("`link` cannot be empty".to_owned()));
        }
        return Ok(SidebarItem::Link(SidebarLink {
            label,
            link: link.to_owned(),
        }));
    }

    if let Some(items) = &item.items {
        return Ok(SidebarItem::Group(SidebarGroup {
            label,
            items: parse_items(items, path)?,
            collapsed: item.collapsed.unwrap_or(false),
        }));
    }

    if let Some(auto) = &item.autogenerate {
        let directory = auto.directory.trim().trim_matches('/');
        if directory.is_empty() {
            return Err(malformed(
                "`autogenerate.directory` cannot be empty".to_owned(),
            ));
        }
        return Ok(SidebarItem::Autogenerate(AutogenerateSection {
            label,
            directory: directory.to_owned(),
            collapsed: auto.collapsed.or(item.collapsed).unwrap_or(false),
        }));
    }

    Err(malformed(
        "must set one of `link`, `items`, or `autogenerate`".to_owned(),
    ))
}
