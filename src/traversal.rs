use core::fmt;
use core::iter::FusedIterator;

use alloc::collections::VecDeque;
use alloc::vec::Vec;
use smallvec::SmallVec;

use crate::raw::{Handle, Link, NodeView};

/// The order in which [`traverse`](crate::OrderedCollection::traverse) visits nodes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree: ascending key order.
    #[default]
    InOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
    /// Breadth-first from the root, left to right within each level.
    LevelOrder,
}

impl Order {
    /// All orders, in declaration order.
    pub const ALL: [Order; 4] = [Order::InOrder, Order::PreOrder, Order::PostOrder, Order::LevelOrder];
}

/// An iterator over the keys of a collection in a chosen [`Order`].
///
/// A node whose key occurs `c` times yields that key `c` times in a row. The
/// iterator borrows the collection, so the collection cannot change while it is being
/// walked; call `traverse` again to restart.
///
/// This `struct` is created by the [`traverse`] method on
/// [`OrderedCollection`](crate::OrderedCollection).
///
/// # Examples
///
/// ```
/// use ordtree::{Order, OrderedCollection, RbTree};
///
/// let mut tree = RbTree::with_duplicates();
/// tree.extend([2, 1, 3, 3]);
///
/// let keys: Vec<_> = tree.traverse(Order::LevelOrder).copied().collect();
/// assert_eq!(keys, [2, 1, 3, 3]);
/// ```
///
/// [`traverse`]: crate::OrderedCollection::traverse
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Traversal<'a, T: 'a> {
    nodes: &'a dyn NodeView<T>,
    order: Order,
    // Depth-first work list. The flag marks a post-order node whose subtrees are done.
    stack: SmallVec<[(Handle, bool); 32]>,
    // Breadth-first work list.
    queue: VecDeque<Handle>,
    // The node being emitted and how many copies of its key are still owed.
    current: Option<(Handle, usize)>,
    remaining: usize,
}

impl<'a, T: 'a> Traversal<'a, T> {
    pub(crate) fn new(nodes: &'a dyn NodeView<T>, root: Link, len: usize, order: Order) -> Self {
        let mut traversal = Self {
            nodes,
            order,
            stack: SmallVec::new(),
            queue: VecDeque::new(),
            current: None,
            remaining: len,
        };

        match order {
            Order::InOrder => traversal.push_left_spine(root),
            Order::PreOrder | Order::PostOrder => traversal.stack.extend(root.map(|r| (r, false))),
            Order::LevelOrder => traversal.queue.extend(root),
        }

        traversal
    }

    fn push_left_spine(&mut self, mut link: Link) {
        while let Some(handle) = link {
            self.stack.push((handle, false));
            link = self.nodes.left(handle);
        }
    }

    /// The next node in `order`, or `None` once every node has been visited.
    fn next_node(&mut self) -> Option<Handle> {
        match self.order {
            Order::InOrder => {
                let (handle, _) = self.stack.pop()?;
                self.push_left_spine(self.nodes.right(handle));
                Some(handle)
            }
            Order::PreOrder => {
                let (handle, _) = self.stack.pop()?;
                // Right goes first so that left is popped first.
                self.stack.extend(self.nodes.right(handle).map(|r| (r, false)));
                self.stack.extend(self.nodes.left(handle).map(|l| (l, false)));
                Some(handle)
            }
            Order::PostOrder => loop {
                let (handle, expanded) = self.stack.pop()?;
                if expanded {
                    return Some(handle);
                }
                self.stack.push((handle, true));
                self.stack.extend(self.nodes.right(handle).map(|r| (r, false)));
                self.stack.extend(self.nodes.left(handle).map(|l| (l, false)));
            },
            Order::LevelOrder => {
                let handle = self.queue.pop_front()?;
                self.queue.extend(self.nodes.left(handle));
                self.queue.extend(self.nodes.right(handle));
                Some(handle)
            }
        }
    }
}

impl<'a, T: 'a> Iterator for Traversal<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let nodes = self.nodes;
        loop {
            if let Some((handle, owed)) = &mut self.current
                && *owed > 0
            {
                *owed -= 1;
                self.remaining -= 1;
                return Some(nodes.key(*handle));
            }

            let handle = self.next_node()?;
            self.current = Some((handle, nodes.count(handle)));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Traversal<'a, T> {}

impl<'a, T: 'a> FusedIterator for Traversal<'a, T> {}

impl<'a, T: 'a> Clone for Traversal<'a, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            order: self.order,
            stack: self.stack.clone(),
            queue: self.queue.clone(),
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<'a, T: 'a + fmt::Debug> fmt::Debug for Traversal<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// Number of levels below `root`, counting the root's own level.
pub(crate) fn height<T>(nodes: &dyn NodeView<T>, root: Link) -> usize {
    let mut height = 0;
    let mut level: Vec<Handle> = root.into_iter().collect();
    while !level.is_empty() {
        height += 1;
        level = level
            .iter()
            .flat_map(|&h| [nodes.left(h), nodes.right(h)])
            .flatten()
            .collect();
    }
    height
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::raw::{Arena, Node, Nodes};
    use alloc::vec;

    //        4 (x2)
    //       / \
    //      2   6
    //     / \
    //    1   3
    fn sample() -> (Nodes<i32, ()>, Link) {
        let mut nodes: Nodes<i32, ()> = Arena::new();
        let one = nodes.alloc(Node::new(1, ()));
        let three = nodes.alloc(Node::new(3, ()));
        let six = nodes.alloc(Node::new(6, ()));
        let two = nodes.alloc(Node::new(2, ()));
        let four = nodes.alloc(Node::new(4, ()));
        nodes.get_mut(two).left = Some(one);
        nodes.get_mut(two).right = Some(three);
        let root = nodes.get_mut(four);
        root.left = Some(two);
        root.right = Some(six);
        root.count = 2;
        (nodes, Some(four))
    }

    fn walk(nodes: &Nodes<i32, ()>, root: Link, order: Order) -> Vec<i32> {
        Traversal::new(nodes, root, 6, order).copied().collect()
    }

    #[test]
    fn every_order_expands_counts() {
        let (nodes, root) = sample();
        assert_eq!(walk(&nodes, root, Order::InOrder), vec![1, 2, 3, 4, 4, 6]);
        assert_eq!(walk(&nodes, root, Order::PreOrder), vec![4, 4, 2, 1, 3, 6]);
        assert_eq!(walk(&nodes, root, Order::PostOrder), vec![1, 3, 2, 6, 4, 4]);
        assert_eq!(walk(&nodes, root, Order::LevelOrder), vec![4, 4, 2, 6, 1, 3]);
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let nodes: Nodes<i32, ()> = Arena::new();
        for order in Order::ALL {
            let mut traversal = Traversal::new(&nodes, None, 0, order);
            assert_eq!(traversal.len(), 0);
            assert_eq!(traversal.next(), None);
            assert_eq!(traversal.next(), None);
        }
        assert_eq!(height(&nodes, None), 0);
    }

    #[test]
    fn length_is_exact_while_iterating() {
        let (nodes, root) = sample();
        let mut traversal = Traversal::new(&nodes, root, 6, Order::PostOrder);
        assert_eq!(traversal.len(), 6);
        traversal.next();
        traversal.next();
        assert_eq!(traversal.len(), 4);

        let restarted = traversal.clone();
        assert_eq!(restarted.copied().collect::<Vec<_>>(), vec![2, 6, 4, 4]);
    }

    #[test]
    fn height_counts_levels() {
        let (nodes, root) = sample();
        assert_eq!(height(&nodes, root), 3);
    }
}
