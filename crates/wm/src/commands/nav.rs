//! `wm nav` command implementation.

use clap::Args;
use wm_site::NavNode;

use super::{SiteArgs, print_warnings};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Locale to resolve (default: the configured default locale).
    #[arg(short, long)]
    locale: Option<String>,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the locale is
    /// unknown, or the sidebar has a broken link.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let site = self.site.load_site()?;
        let locale = site.locale(self.locale.as_deref())?;
        let index = site.content_index()?;
        let nav = site.navigation(&index, &locale)?;

        for line in tree_lines(&nav.items) {
            let text = match line {
                TreeLine::Group { indent, label } => format!("{indent}{}", output.heading(&label)),
                TreeLine::Link {
                    indent,
                    label,
                    target,
                } => format!("{indent}{label}  {}", output.muted(&target)),
            };
            output.print(&text);
        }

        print_warnings(
            &output,
            nav.warnings.iter().map(|w| (locale.key.as_str(), w)),
        );
        Ok(())
    }
}

/// One printed row of the sidebar tree.
#[derive(Debug, PartialEq, Eq)]
enum TreeLine {
    Group { indent: String, label: String },
    Link {
        indent: String,
        label: String,
        target: String,
    },
}

fn tree_lines(nodes: &[NavNode]) -> Vec<TreeLine> {
    fn walk(nodes: &[NavNode], lines: &mut Vec<TreeLine>) {
        for node in nodes {
            let indent = "  ".repeat(node.depth());
            match node {
                NavNode::Link(link) => lines.push(TreeLine::Link {
                    indent,
                    label: link.label.clone(),
                    target: link.target.clone(),
                }),
                NavNode::Group(group) => {
                    let label = if group.collapsed {
                        format!("{} (collapsed)", group.label)
                    } else {
                        group.label.clone()
                    };
                    lines.push(TreeLine::Group { indent, label });
                    walk(&group.children, lines);
                }
            }
        }
    }

    let mut lines = Vec::new();
    walk(nodes, &mut lines);
    lines
}
