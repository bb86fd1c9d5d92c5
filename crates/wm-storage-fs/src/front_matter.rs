//! YAML front matter extraction.

use serde::Deserialize;
use wm_storage::SidebarHints;

/// Front matter fields used for navigation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sidebar: SidebarHints,
}

/// Split `content` into its front matter block and the remaining body.
///
/// Front matter is the YAML between a leading `---` line and the next
/// `---` line. Returns `(None, content)` when there is no closed block.
pub(crate) fn split(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = &rest[offset + line.len()..];
            return (Some(&rest[..offset]), body);
        }
        offset += line.len();
    }
    (None, content)
}

/// Parse a front matter block.
///
/// An empty block yields default values.
///
/// # Errors
///
/// Returns an error if the YAML is malformed or a field has the wrong type.
pub(crate) fn parse(yaml: &str) -> Result<FrontMatter, serde_yaml::Error> {
    if yaml.trim().is_empty() {
        return Ok(FrontMatter::default());
    }
    serde_yaml::from_str(yaml)
}
