//! Registry of components available to content pages.
//!
//! The table is fixed at compile time. Unknown names are reported by the
//! renderer that consumes the manifest, so lookups just return `None`.

use serde::Serialize;

/// Component name and the module implementing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Component {
    pub name: &'static str,
    /// Module path relative to the components directory.
    pub module: &'static str,
}

static COMPONENTS: [Component; 4] = [
    Component {
        name: "CommandComparison",
        module: "./CommandComparison.astro",
    },
    Component {
        name: "LearningPath",
        module: "./LearningPath.astro",
    },
    Component {
        name: "ProgressTracker",
        module: "./ProgressTracker.astro",
    },
    Component {
        name: "ToolSelector",
        module: "./ToolSelector.astro",
    },
];

/// Fixed mapping from component name to implementation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ComponentRegistry;

impl ComponentRegistry {
    #[must_use]
    pub fn get(self, name: &str) -> Option<&'static Component> {
        COMPONENTS.iter().find(|c| c.name == name)
    }

    /// Components in registration order.
    pub fn iter(self) -> impl Iterator<Item = &'static Component> {
        COMPONENTS.iter()
    }

    pub fn names(self) -> impl Iterator<Item = &'static str> {
        COMPONENTS.iter().map(|c| c.name)
    }
}

impl Serialize for ComponentRegistry {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(COMPONENTS.iter())
    }
}
