//! Change-type registry
//!
//! Item `type` values mirror the structured-changelog taxonomy. The validator
//! only needs to ask whether a name is recognized, so the registry is a trait
//! and callers can supply their own.

use std::collections::BTreeSet;

/// Built-in change type names, in changelog display order
pub const DEFAULT_CHANGE_TYPES: &[&str] = &[
    "Highlights",
    "Breaking",
    "Upgrade Guide",
    "Security",
    "Added",
    "Changed",
    "Deprecated",
    "Removed",
    "Fixed",
    "Performance",
    "Dependencies",
    "Documentation",
    "Build",
    "Tests",
    "Infrastructure",
    "Observability",
    "Compliance",
    "Internal",
    "Known Issues",
    "Contributors",
];

/// Answers whether a name is a recognized change-type label
pub trait ChangeTypeRegistry {
    fn is_valid_name(&self, name: &str) -> bool;
}

impl<F> ChangeTypeRegistry for F
where
    F: Fn(&str) -> bool,
{
    fn is_valid_name(&self, name: &str) -> bool {
        self(name)
    }
}

/// Set of accepted change type names (exact, case-sensitive match)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeTypes {
    names: BTreeSet<String>,
}

impl ChangeTypes {
    /// Registry with no names at all
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Adds names on top of the current set
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in extra {
            let name = name.into();
            if !name.is_empty() {
                self.names.insert(name);
            }
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ChangeTypes {
    fn default() -> Self {
        Self::empty().with_extra(DEFAULT_CHANGE_TYPES.iter().copied())
    }
}

impl ChangeTypeRegistry for ChangeTypes {
    fn is_valid_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}
