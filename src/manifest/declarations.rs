//! Declared requirement strings, grouped the way the project declares them

/// Name of the group holding `[project].dependencies`
pub const CORE_GROUP: &str = "core";

/// A named bucket of raw requirement strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGroup {
    /// `core` or the optional-dependency extra name
    pub name: String,
    /// Requirement strings in declaration order
    pub requirements: Vec<String>,
}

impl DependencyGroup {
    /// Creates a new group
    pub fn new(name: impl Into<String>, requirements: Vec<String>) -> Self {
        Self {
            name: name.into(),
            requirements,
        }
    }
}

/// Immutable table of dependency groups
///
/// The core group always comes first; optional groups follow in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationStore {
    groups: Vec<DependencyGroup>,
}

impl DeclarationStore {
    /// Creates a store from groups in declaration order
    pub fn new(groups: Vec<DependencyGroup>) -> Self {
        Self { groups }
    }

    /// All groups
    pub fn groups(&self) -> &[DependencyGroup] {
        &self.groups
    }

    /// Every requirement, all groups merged, declaration order kept
    pub fn requirements(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|g| g.requirements.iter().map(String::as_str))
    }

    /// Total number of requirements
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.requirements.len()).sum()
    }

    /// Returns true if nothing is declared
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
