use core::fmt;
use core::ops::Index;

use crate::{
    AvlTree, BsTree, Discipline, Natural, Occurrences, Order, OrderedCollection, OrderingPolicy, Rank, RbTree,
    Traversal, TreeConfig,
};

/// A collection whose balancing discipline is chosen at runtime.
///
/// Each variant wraps the corresponding concrete tree; every operation is forwarded
/// to it. Use this when the discipline comes from configuration, and the concrete
/// types when it is known at compile time.
///
/// # Examples
///
/// ```
/// use ordtree::{Discipline, OrderedCollection, OrderedTree, TreeConfig};
///
/// let config = TreeConfig::new("red-black".parse::<Discipline>()?).allow_duplicates(true);
/// let mut tree = OrderedTree::with_config(config);
/// tree.extend([3, 1, 3]);
///
/// assert_eq!(tree.discipline(), Discipline::ColorBalanced);
/// assert_eq!(tree.count(&3), 2);
/// assert_eq!(tree.rank(&3), 2);
/// # Ok::<(), ordtree::ParseDisciplineError>(())
/// ```
pub enum OrderedTree<T, C = Natural> {
    /// See [`BsTree`].
    Unbalanced(BsTree<T, C>),
    /// See [`AvlTree`].
    HeightBalanced(AvlTree<T, C>),
    /// See [`RbTree`].
    ColorBalanced(RbTree<T, C>),
}

impl<T> OrderedTree<T> {
    /// Makes a new, empty tree of the given discipline ordered by [`Ord`] that
    /// ignores repeated keys.
    #[must_use]
    pub fn new(discipline: Discipline) -> Self {
        Self::with_config(TreeConfig::new(discipline))
    }

    /// Makes a new, empty tree ordered by [`Ord`] as described by `config`.
    #[must_use]
    pub fn with_config(config: TreeConfig) -> Self {
        Self::with_config_and_ordering(config, Natural)
    }
}

impl<T, C> OrderedTree<T, C> {
    /// Makes a new, empty tree ordered by `ordering` as described by `config`.
    pub fn with_config_and_ordering(config: TreeConfig, ordering: C) -> Self {
        let TreeConfig {
            discipline,
            allow_duplicates,
        } = config;
        match (discipline, allow_duplicates) {
            (Discipline::Unbalanced, false) => OrderedTree::Unbalanced(BsTree::with_ordering(ordering)),
            (Discipline::Unbalanced, true) => OrderedTree::Unbalanced(BsTree::with_ordering_and_duplicates(ordering)),
            (Discipline::HeightBalanced, false) => OrderedTree::HeightBalanced(AvlTree::with_ordering(ordering)),
            (Discipline::HeightBalanced, true) => {
                OrderedTree::HeightBalanced(AvlTree::with_ordering_and_duplicates(ordering))
            }
            (Discipline::ColorBalanced, false) => OrderedTree::ColorBalanced(RbTree::with_ordering(ordering)),
            (Discipline::ColorBalanced, true) => OrderedTree::ColorBalanced(RbTree::with_ordering_and_duplicates(ordering)),
        }
    }

    /// Returns a reference to the tree's ordering policy.
    pub fn ordering(&self) -> &C {
        match self {
            OrderedTree::Unbalanced(tree) => tree.ordering(),
            OrderedTree::HeightBalanced(tree) => tree.ordering(),
            OrderedTree::ColorBalanced(tree) => tree.ordering(),
        }
    }
}

impl<T, C: OrderingPolicy<T>> OrderedTree<T, C> {
    fn as_dyn(&self) -> &dyn OrderedCollection<T> {
        match self {
            OrderedTree::Unbalanced(tree) => tree,
            OrderedTree::HeightBalanced(tree) => tree,
            OrderedTree::ColorBalanced(tree) => tree,
        }
    }

    fn as_dyn_mut(&mut self) -> &mut dyn OrderedCollection<T> {
        match self {
            OrderedTree::Unbalanced(tree) => tree,
            OrderedTree::HeightBalanced(tree) => tree,
            OrderedTree::ColorBalanced(tree) => tree,
        }
    }
}

impl<T, C: OrderingPolicy<T>> OrderedCollection<T> for OrderedTree<T, C> {
    fn discipline(&self) -> Discipline {
        self.as_dyn().discipline()
    }

    fn allows_duplicates(&self) -> bool {
        self.as_dyn().allows_duplicates()
    }

    fn insert(&mut self, key: T) {
        self.as_dyn_mut().insert(key);
    }

    fn delete(&mut self, key: &T) {
        self.as_dyn_mut().delete(key);
    }

    fn search(&self, key: &T) -> Option<Occurrences<'_, T>> {
        self.as_dyn().search(key)
    }

    fn size(&self) -> usize {
        self.as_dyn().size()
    }

    fn rank(&self, key: &T) -> usize {
        self.as_dyn().rank(key)
    }

    fn select(&self, k: usize) -> Option<&T> {
        self.as_dyn().select(k)
    }

    fn height(&self) -> usize {
        self.as_dyn().height()
    }

    fn clear(&mut self) {
        self.as_dyn_mut().clear();
    }

    fn traverse(&self, order: Order) -> Traversal<'_, T> {
        self.as_dyn().traverse(order)
    }
}

/// Indexes into the tree by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is `0` or greater than the tree's size.
impl<T, C: OrderingPolicy<T>> Index<Rank> for OrderedTree<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).expect("rank out of bounds")
    }
}

impl<T: Clone, C: Clone> Clone for OrderedTree<T, C> {
    fn clone(&self) -> Self {
        match self {
            OrderedTree::Unbalanced(tree) => OrderedTree::Unbalanced(tree.clone()),
            OrderedTree::HeightBalanced(tree) => OrderedTree::HeightBalanced(tree.clone()),
            OrderedTree::ColorBalanced(tree) => OrderedTree::ColorBalanced(tree.clone()),
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for OrderedTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderedTree::Unbalanced(tree) => f.debug_tuple("Unbalanced").field(tree).finish(),
            OrderedTree::HeightBalanced(tree) => f.debug_tuple("HeightBalanced").field(tree).finish(),
            OrderedTree::ColorBalanced(tree) => f.debug_tuple("ColorBalanced").field(tree).finish(),
        }
    }
}

impl<T> Default for OrderedTree<T> {
    fn default() -> Self {
        OrderedTree::with_config(TreeConfig::default())
    }
}

impl<T, C: OrderingPolicy<T>> Extend<T> for OrderedTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> From<BsTree<T>> for OrderedTree<T> {
    fn from(tree: BsTree<T>) -> Self {
        OrderedTree::Unbalanced(tree)
    }
}

impl<T> From<AvlTree<T>> for OrderedTree<T> {
    fn from(tree: AvlTree<T>) -> Self {
        OrderedTree::HeightBalanced(tree)
    }
}

impl<T> From<RbTree<T>> for OrderedTree<T> {
    fn from(tree: RbTree<T>) -> Self {
        OrderedTree::ColorBalanced(tree)
    }
}
