use core::fmt;
use core::ops::Index;

use crate::raw::{HeightBalanced, RawSearchTree};
use crate::traversal::{self, Order, Traversal};
use crate::{Discipline, Natural, Occurrences, OrderedCollection, OrderingPolicy, Rank};

/// A height-balanced (AVL) order-statistic binary search tree.
///
/// After every insertion and deletion each node on the affected path is checked,
/// bottom-up, so that the heights of its two subtrees differ by at most one. The tree
/// height therefore stays below `1.44 * log2(n + 2)` and every operation is
/// O(log n) regardless of insertion order.
///
/// See [`BsTree`](crate::BsTree) for the logic-error contract on keys.
///
/// # Examples
///
/// ```
/// use ordtree::{AvlTree, OrderedCollection, Rank};
///
/// let tree: AvlTree<i32> = (1..=7).collect();
///
/// assert_eq!(tree.height(), 3);
/// assert_eq!(tree.level_order(), [&4, &2, &6, &1, &3, &5, &7]);
/// assert_eq!(tree[Rank(5)], 5);
/// ```
pub struct AvlTree<T, C = Natural> {
    raw: RawSearchTree<T, C, HeightBalanced>,
}

impl<T> AvlTree<T> {
    /// Makes a new, empty `AvlTree` ordered by [`Ord`] that ignores repeated keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ordering(Natural)
    }

    /// Makes a new, empty `AvlTree` ordered by [`Ord`] that counts repeated keys.
    #[must_use]
    pub fn with_duplicates() -> Self {
        Self::with_ordering_and_duplicates(Natural)
    }
}

impl<T, C> AvlTree<T, C> {
    /// Makes a new, empty `AvlTree` ordered by `ordering` that ignores repeated keys.
    pub fn with_ordering(ordering: C) -> Self {
        AvlTree {
            raw: RawSearchTree::new(ordering, false),
        }
    }

    /// Makes a new, empty `AvlTree` ordered by `ordering` that counts repeated keys.
    pub fn with_ordering_and_duplicates(ordering: C) -> Self {
        AvlTree {
            raw: RawSearchTree::new(ordering, true),
        }
    }

    /// Returns a reference to the tree's ordering policy.
    pub fn ordering(&self) -> &C {
        self.raw.ordering()
    }

    fn keys(&self, order: Order) -> Traversal<'_, T> {
        Traversal::new(self.raw.nodes(), self.raw.root(), self.raw.len(), order)
    }
}

impl<T, C: OrderingPolicy<T>> OrderedCollection<T> for AvlTree<T, C> {
    fn discipline(&self) -> Discipline {
        Discipline::HeightBalanced
    }

    fn allows_duplicates(&self) -> bool {
        self.raw.allows_duplicates()
    }

    fn insert(&mut self, key: T) {
        self.raw.insert(key);
    }

    fn delete(&mut self, key: &T) {
        self.raw.delete(key);
    }

    fn search(&self, key: &T) -> Option<Occurrences<'_, T>> {
        let node = self.raw.nodes().get(self.raw.search(key)?);
        Some(Occurrences::new(&node.key, node.count))
    }

    fn size(&self) -> usize {
        self.raw.len()
    }

    fn rank(&self, key: &T) -> usize {
        self.raw.rank(key)
    }

    fn select(&self, k: usize) -> Option<&T> {
        self.raw.select(k)
    }

    /// O(1): read from the root's cached height.
    fn height(&self) -> usize {
        self.raw
            .root()
            .map_or(0, |root| self.raw.nodes().get(root).meta as usize)
    }

    fn clear(&mut self) {
        self.raw.clear();
    }

    fn traverse(&self, order: Order) -> Traversal<'_, T> {
        self.keys(order)
    }
}

/// Indexes into the tree by one-based rank.
///
/// # Panics
///
/// Panics if `rank` is `0` or greater than the tree's size.
impl<T, C: OrderingPolicy<T>> Index<Rank> for AvlTree<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).expect("rank out of bounds")
    }
}

impl<T: Clone, C: Clone> Clone for AvlTree<T, C> {
    fn clone(&self) -> Self {
        AvlTree { raw: self.raw.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for AvlTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys(Order::InOrder)).finish()
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        AvlTree::new()
    }
}

impl<T, C: OrderingPolicy<T>> Extend<T> for AvlTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T, C: OrderingPolicy<T> + Default> FromIterator<T> for AvlTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = AvlTree::with_ordering(C::default());
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for AvlTree<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}
