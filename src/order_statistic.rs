/// A one-based rank into the sorted order of a collection.
///
/// `Rank(1)` is the smallest key. A key that occurs `c` times occupies `c`
/// consecutive ranks, so indexing at any of them yields that key.
///
/// # Examples
///
/// ```
/// use ordtree::{BsTree, Rank};
///
/// let tree = BsTree::from([30, 10, 20]);
///
/// assert_eq!(tree[Rank(1)], 10);
/// assert_eq!(tree[Rank(3)], 30);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Rank(pub usize);
