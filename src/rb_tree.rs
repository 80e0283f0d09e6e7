use core::fmt;
use core::ops::Index;

use crate::raw::RawRbTree;
use crate::traversal::{self, Order, Traversal};
use crate::{Discipline, Natural, Occurrences, OrderedCollection, OrderingPolicy, Rank};

/// A red-black order-statistic binary search tree.
///
/// Every node is colored red or black; no red node has a red child and every path
/// from a node down to an absent link passes the same number of black nodes. The
/// longest root-to-leaf path is thus at most twice the shortest, and every
/// operation is O(log n). Compared with [`AvlTree`](crate::AvlTree), insertions
/// and deletions rotate less often at the cost of a slightly taller tree.
///
/// Nodes also keep a link to their parent, which the recoloring passes walk
/// upward after a mutation.
///
/// See [`BsTree`](crate::BsTree) for the logic-error contract on keys.
///
/// # Examples
///
/// ```
/// use ordtree::{OrderedCollection, RbTree};
///
/// let mut tree = RbTree::new();
/// for key in 1..=10 {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.level_order()[0], &4);
/// assert_eq!(tree.select(7), Some(&7));
/// assert_eq!(tree.rank(&10), 10);
///
/// tree.delete(&4);
/// assert_eq!(tree.size(), 9);
/// assert!(!tree.contains(&4));
/// ```
pub struct RbTree<T, C = Natural> {
    raw: RawRbTree<T, C>,
}

impl<T> RbTree<T> {
    /// Makes a new, empty `RbTree` ordered by [`Ord`] that ignores repeated keys.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ordering(Natural)
    }

    /// Makes a new, empty `RbTree` ordered by [`Ord`] that counts repeated keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{OrderedCollection, RbTree};
    ///
    /// let mut tree = RbTree::with_duplicates();
    /// tree.extend(["b", "a", "b"]);
    /// assert_eq!(tree.in_order(), [&"a", &"b", &"b"]);
    /// ```
    #[must_use]
    pub fn with_duplicates() -> Self {
        Self::with_ordering_and_duplicates(Natural)
    }
}

impl<T, C> RbTree<T, C> {
    /// Makes a new, empty `RbTree` ordered by `ordering` that ignores repeated keys.
    pub fn with_ordering(ordering: C) -> Self {
        RbTree {
            raw: RawRbTree::new(ordering, false),
        }
    }

    /// Makes a new, empty `RbTree` ordered by `ordering` that counts repeated keys.
    pub fn with_ordering_and_duplicates(ordering: C) -> Self {
        RbTree {
            raw: RawRbTree::new(ordering, true),
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

impl<T, C: OrderingPolicy<T>> OrderedCollection<T> for RbTree<T, C> {
    fn discipline(&self) -> Discipline {
        Discipline::ColorBalanced
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

    fn height(&self) -> usize {
        traversal::height(self.raw.nodes(), self.raw.root())
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
impl<T, C: OrderingPolicy<T>> Index<Rank> for RbTree<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).expect("rank out of bounds")
    }
}

impl<T: Clone, C: Clone> Clone for RbTree<T, C> {
    fn clone(&self) -> Self {
        RbTree { raw: self.raw.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RbTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys(Order::InOrder)).finish()
    }
}

impl<T> Default for RbTree<T> {
    fn default() -> Self {
        RbTree::new()
    }
}

impl<T, C: OrderingPolicy<T>> Extend<T> for RbTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T, C: OrderingPolicy<T> + Default> FromIterator<T> for RbTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = RbTree::with_ordering(C::default());
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RbTree<T> {
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}
