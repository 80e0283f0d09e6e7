use core::cmp::Ordering;

/// A total order over keys.
///
/// Every structural decision a tree makes (which subtree to descend into, how many
/// elements precede a key) goes through its policy; keys are never inspected any other
/// way.
///
/// The policy must be a consistent total order for the lifetime of the tree. A policy
/// that violates this is a logic error: the resulting behavior is unspecified but will
/// not be undefined behavior. It could include incorrect results or panics.
///
/// Any `Fn(&T, &T) -> Ordering` closure is a policy.
///
/// # Examples
///
/// ```
/// use std::cmp::Ordering;
/// use ordtree::{AvlTree, OrderedCollection};
///
/// // Order strings by length, then alphabetically.
/// let by_length = |a: &&str, b: &&str| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
/// let mut tree = AvlTree::with_ordering(by_length);
/// for word in ["pear", "fig", "banana", "kiwi"] {
///     tree.insert(word);
/// }
/// assert_eq!(tree.in_order(), [&"fig", &"kiwi", &"pear", &"banana"]);
/// ```
pub trait OrderingPolicy<T: ?Sized> {
    /// Compares `a` with `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The natural order of keys, as given by [`Ord`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Natural;

impl<T: Ord + ?Sized> OrderingPolicy<T> for Natural {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.cmp(b)
    }
}

/// Inverts another policy.
///
/// # Examples
///
/// ```
/// use ordtree::{Natural, OrderedCollection, Reversed, RbTree};
///
/// let mut tree = RbTree::with_ordering(Reversed(Natural));
/// tree.extend([1, 3, 2]);
/// assert_eq!(tree.select(1), Some(&3));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Reversed<C>(pub C);

impl<T: ?Sized, C: OrderingPolicy<T>> OrderingPolicy<T> for Reversed<C> {
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(b, a)
    }
}

impl<T: ?Sized, F> OrderingPolicy<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}
