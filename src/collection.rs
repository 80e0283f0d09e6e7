use alloc::vec::Vec;

use crate::{Discipline, Order, Traversal};

/// A key found in a collection, with the number of times it occurs.
///
/// Returned by [`OrderedCollection::search`].
#[derive(Debug, Eq, PartialEq)]
pub struct Occurrences<'a, T> {
    key: &'a T,
    count: usize,
}

impl<T> Clone for Occurrences<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Occurrences<'_, T> {}

impl<'a, T> Occurrences<'a, T> {
    pub(crate) const fn new(key: &'a T, count: usize) -> Self {
        Self { key, count }
    }

    /// The stored key. It compares equal to the searched key under the collection's
    /// ordering policy, but need not be identical to it.
    #[must_use]
    pub const fn key(&self) -> &'a T {
        self.key
    }

    /// How many times the key occurs. Always `1` unless duplicates are allowed.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }
}

/// The capabilities shared by [`BsTree`](crate::BsTree), [`AvlTree`](crate::AvlTree),
/// [`RbTree`](crate::RbTree) and [`OrderedTree`](crate::OrderedTree).
///
/// Collections hold a sorted multiset of keys. Without duplicate mode a repeated
/// insertion is ignored; with it, equal keys fold into one node whose count grows and
/// shrinks. Ranks are one-based and a key that occurs `c` times occupies `c`
/// consecutive ranks.
///
/// # Examples
///
/// ```
/// use ordtree::{AvlTree, OrderedCollection};
///
/// let mut tree = AvlTree::with_duplicates();
/// for key in [30, 10, 20, 20] {
///     tree.insert(key);
/// }
///
/// assert_eq!(tree.size(), 4);
/// assert_eq!(tree.rank(&20), 2);
/// assert_eq!(tree.select(3), Some(&20));
/// assert_eq!(tree.select(4), Some(&30));
/// assert_eq!(tree.in_order(), [&10, &20, &20, &30]);
///
/// tree.delete(&20);
/// assert_eq!(tree.count(&20), 1);
/// ```
pub trait OrderedCollection<T> {
    /// The balancing discipline of this collection.
    fn discipline(&self) -> Discipline;

    /// Whether equal keys are counted rather than rejected.
    fn allows_duplicates(&self) -> bool;

    /// Inserts one occurrence of `key`.
    ///
    /// If an equal key is present, its count grows by one in duplicate mode; otherwise
    /// the insertion is silently ignored.
    ///
    /// # Complexity
    ///
    /// O(log n) for the balanced disciplines, O(n) worst case for `BsTree`.
    fn insert(&mut self, key: T);

    /// Removes one occurrence of `key`. Removing an absent key is a no-op.
    ///
    /// # Complexity
    ///
    /// O(log n) for the balanced disciplines, O(n) worst case for `BsTree`.
    fn delete(&mut self, key: &T);

    /// Looks up `key`, returning the stored key and its occurrence count.
    fn search(&self, key: &T) -> Option<Occurrences<'_, T>>;

    /// The total number of elements, duplicates included.
    ///
    /// # Complexity
    ///
    /// O(1)
    fn size(&self) -> usize;

    /// The one-based rank of `key` (the position of its first occurrence in sorted
    /// order), or `0` if `key` is absent.
    fn rank(&self, key: &T) -> usize;

    /// The key at one-based position `k` in sorted order, or `None` if `k` is `0` or
    /// greater than [`size`](Self::size).
    fn select(&self, k: usize) -> Option<&T>;

    /// The number of levels in the tree; `0` when empty.
    ///
    /// # Complexity
    ///
    /// O(n)
    fn height(&self) -> usize;

    /// Removes every element.
    fn clear(&mut self);

    /// Walks the collection in `order`, yielding each key once per occurrence.
    fn traverse(&self, order: Order) -> Traversal<'_, T>;

    /// Returns `true` if the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns `true` if an equal key is present.
    fn contains(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// The number of occurrences of `key`; `0` if absent.
    fn count(&self, key: &T) -> usize {
        self.search(key).map_or(0, |found| found.count())
    }

    /// The smallest key.
    fn first(&self) -> Option<&T> {
        self.select(1)
    }

    /// The largest key.
    fn last(&self) -> Option<&T> {
        self.select(self.size())
    }

    /// Keys in ascending order.
    fn in_order(&self) -> Vec<&T> {
        self.traverse(Order::InOrder).collect()
    }

    /// Keys with every node before its subtrees.
    fn pre_order(&self) -> Vec<&T> {
        self.traverse(Order::PreOrder).collect()
    }

    /// Keys with every node after its subtrees.
    fn post_order(&self) -> Vec<&T> {
        self.traverse(Order::PostOrder).collect()
    }

    /// Keys level by level from the root, left to right within a level.
    fn level_order(&self) -> Vec<&T> {
        self.traverse(Order::LevelOrder).collect()
    }
}
