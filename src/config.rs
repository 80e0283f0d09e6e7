use core::fmt;
use core::str::FromStr;

use alloc::string::String;

/// The balancing discipline of a tree, fixed when the tree is constructed.
///
/// # Examples
///
/// ```
/// use ordtree::Discipline;
///
/// let discipline: Discipline = "red-black".parse().unwrap();
/// assert_eq!(discipline, Discipline::ColorBalanced);
/// assert_eq!(discipline.to_string(), "red-black");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Discipline {
    /// A plain binary search tree. Sorted insertions degrade it to a list.
    Unbalanced,
    /// An AVL tree: sibling subtree heights differ by at most one.
    #[default]
    HeightBalanced,
    /// A red-black tree: equal black height on every root-to-leaf path.
    ColorBalanced,
}

impl Discipline {
    /// All disciplines, in declaration order.
    pub const ALL: [Discipline; 3] = [Discipline::Unbalanced, Discipline::HeightBalanced, Discipline::ColorBalanced];

    /// Returns the canonical short name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Discipline::Unbalanced => "bst",
            Discipline::HeightBalanced => "avl",
            Discipline::ColorBalanced => "red-black",
        }
    }
}

impl fmt::Display for Discipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error returned when parsing a [`Discipline`] from an unknown name.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown balancing discipline `{name}` (expected one of: bst, avl, red-black)")]
pub struct ParseDisciplineError {
    name: String,
}

impl ParseDisciplineError {
    /// The name that failed to parse.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for Discipline {
    type Err = ParseDisciplineError;

    /// Parses a discipline name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let is_one_of = |candidates: &[&str]| candidates.iter().any(|c| c.eq_ignore_ascii_case(name));

        if is_one_of(&["bst", "unbalanced"]) {
            Ok(Discipline::Unbalanced)
        } else if is_one_of(&["avl", "height-balanced"]) {
            Ok(Discipline::HeightBalanced)
        } else if is_one_of(&["rb", "red-black", "color-balanced"]) {
            Ok(Discipline::ColorBalanced)
        } else {
            Err(ParseDisciplineError { name: name.into() })
        }
    }
}

/// Construction-time settings for an [`OrderedTree`](crate::OrderedTree).
///
/// A configuration loader supplies these once; the tree never consults them again.
///
/// # Examples
///
/// ```
/// use ordtree::{Discipline, OrderedCollection, OrderedTree, TreeConfig};
///
/// let config = TreeConfig::new(Discipline::ColorBalanced).allow_duplicates(true);
/// let mut tree = OrderedTree::with_config(config);
/// tree.insert(4);
/// tree.insert(4);
/// assert_eq!(tree.size(), 2);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct TreeConfig {
    /// The balancing discipline.
    pub discipline: Discipline,
    /// Whether equal keys are counted (`true`) or rejected (`false`).
    pub allow_duplicates: bool,
}

impl TreeConfig {
    /// A configuration for `discipline` that rejects duplicate keys.
    #[must_use]
    pub const fn new(discipline: Discipline) -> Self {
        Self {
            discipline,
            allow_duplicates: false,
        }
    }

    /// Sets the duplicate mode.
    #[must_use]
    pub const fn allow_duplicates(mut self, allow: bool) -> Self {
        self.allow_duplicates = allow;
        self
    }
}
