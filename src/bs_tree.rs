use core::fmt;
use core::ops::Index;

use crate::raw::{RawSearchTree, Unbalanced};
use crate::traversal::{self, Order, Traversal};
use crate::{Discipline, Natural, Occurrences, OrderedCollection, OrderingPolicy, Rank};

/// An unbalanced order-statistic binary search tree.
///
/// Keys are placed by plain binary-search-tree descent and the shape is never
/// adjusted, so sorted or reverse-sorted input degenerates into a linked list and
/// every operation becomes O(n). Use [`AvlTree`](crate::AvlTree) or
/// [`RbTree`](crate::RbTree) when the insertion order is not known to be random.
///
/// Every node caches the number of elements in its subtree, which gives
/// [`rank`](OrderedCollection::rank) and [`select`](OrderedCollection::select) the
/// same cost as a lookup.
///
/// It is a logic error for a key to be modified in such a way that its ordering
/// relative to any other key, as determined by the tree's [`OrderingPolicy`],
/// changes while it is in the tree. The behavior resulting from such a logic error is
/// not specified, but will be encapsulated to the `BsTree` that observed it and not
/// result in undefined behavior.
///
/// # Examples
///
/// ```
/// use ordtree::{BsTree, OrderedCollection};
///
/// let mut tree = BsTree::new();
/// tree.insert(17);
/// tree.insert(6);
/// tree.insert(23);
/// tree.insert(6); // ignored: duplicates are off
///
/// assert_eq!(tree.size(), 3);
/// assert_eq!(tree.rank(&17), 2);
/// assert_eq!(tree.pre_order(), [&17, &6, &23]);
///
/// tree.delete(&17);
/// assert_eq!(tree.in_order(), [&6, &23]);
/// ```
///
/// A `BsTree` with a known list of keys can be initialized from an array:
///
/// ```
/// use ordtree::BsTree;
///
/// let tree = BsTree::from([1, 2, 3]);
/// ```
pub struct BsTree<T, C = Natural> {
    raw: RawSearchTree<T, C, Unbalanced>,
}

impl<T> BsTree<T> {
    /// Makes a new, empty `BsTree` ordered by [`Ord`] that ignores repeated keys.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{BsTree, OrderedCollection};
    ///
    /// let mut tree = BsTree::new();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.size(), 1);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_ordering(Natural)
    }

    /// Makes a new, empty `BsTree` ordered by [`Ord`] that counts repeated keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{BsTree, OrderedCollection};
    ///
    /// let mut tree = BsTree::with_duplicates();
    /// tree.insert(1);
    /// tree.insert(1);
    /// assert_eq!(tree.size(), 2);
    /// assert_eq!(tree.count(&1), 2);
    /// ```
    #[must_use]
    pub fn with_duplicates() -> Self {
        Self::with_ordering_and_duplicates(Natural)
    }
}

impl<T, C> BsTree<T, C> {
    /// Makes a new, empty `BsTree` ordered by `ordering` that ignores repeated keys.
    pub fn with_ordering(ordering: C) -> Self {
        BsTree {
            raw: RawSearchTree::new(ordering, false),
        }
    }

    /// Makes a new, empty `BsTree` ordered by `ordering` that counts repeated keys.
    pub fn with_ordering_and_duplicates(ordering: C) -> Self {
        BsTree {
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

impl<T, C: OrderingPolicy<T>> OrderedCollection<T> for BsTree<T, C> {
    fn discipline(&self) -> Discipline {
        Discipline::Unbalanced
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
///
/// # Examples
///
/// ```
/// use ordtree::{BsTree, Rank};
///
/// let tree = BsTree::from([10, 20, 30]);
/// assert_eq!(tree[Rank(2)], 20);
/// ```
impl<T, C: OrderingPolicy<T>> Index<Rank> for BsTree<T, C> {
    type Output = T;

    fn index(&self, rank: Rank) -> &Self::Output {
        self.select(rank.0).expect("rank out of bounds")
    }
}

impl<T: Clone, C: Clone> Clone for BsTree<T, C> {
    fn clone(&self) -> Self {
        BsTree { raw: self.raw.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for BsTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.keys(Order::InOrder)).finish()
    }
}

impl<T> Default for BsTree<T> {
    fn default() -> Self {
        BsTree::new()
    }
}

impl<T, C: OrderingPolicy<T>> Extend<T> for BsTree<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T, C: OrderingPolicy<T> + Default> FromIterator<T> for BsTree<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = BsTree::with_ordering(C::default());
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for BsTree<T> {
    /// Converts a `[T; N]` into a `BsTree<T>`, inserting keys in array order.
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}
