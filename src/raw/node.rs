use core::ops::Not;

use super::arena::Arena;
use super::handle::{Handle, Link};

/// Which child slot of a node.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Not for Side {
    type Output = Side;

    #[inline]
    fn not(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// A tree node. `M` carries the balance metadata of the owning discipline.
#[derive(Clone)]
pub(crate) struct Node<K, M> {
    pub(crate) key: K,
    // Occurrences of `key`; never zero while the node is linked.
    pub(crate) count: usize,
    // `count` plus the sizes of both subtrees.
    pub(crate) size: usize,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) meta: M,
}

impl<K, M> Node<K, M> {
    /// Creates a detached node holding a single occurrence of `key`.
    pub(crate) fn new(key: K, meta: M) -> Self {
        Self {
            key,
            count: 1,
            size: 1,
            left: None,
            right: None,
            meta,
        }
    }

    #[inline]
    pub(crate) fn child(&self, side: Side) -> Link {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Link) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }
}

pub(crate) type Nodes<K, M> = Arena<Node<K, M>>;

/// Cached size of the subtree behind `link`; the absent node has size zero.
#[inline]
pub(crate) fn subtree_size<K, M>(nodes: &Nodes<K, M>, link: Link) -> usize {
    link.map_or(0, |h| nodes.get(h).size)
}

/// Recomputes the cached size of `handle` from its count and its children.
pub(crate) fn update_size<K, M>(nodes: &mut Nodes<K, M>, handle: Handle) {
    let node = nodes.get(handle);
    let size = node.count + subtree_size(nodes, node.left) + subtree_size(nodes, node.right);
    nodes.get_mut(handle).size = size;
}

/// Leftmost descendant of `handle`.
pub(crate) fn find_min<K, M>(nodes: &Nodes<K, M>, handle: Handle) -> Handle {
    let mut current = handle;
    while let Some(left) = nodes.get(current).left {
        current = left;
    }
    current
}

/// Read-only access to node structure, shared by every discipline.
pub(crate) trait NodeView<K> {
    fn left(&self, handle: Handle) -> Link;
    fn right(&self, handle: Handle) -> Link;
    fn key(&self, handle: Handle) -> &K;
    fn count(&self, handle: Handle) -> usize;
}

impl<K, M> NodeView<K> for Nodes<K, M> {
    #[inline]
    fn left(&self, handle: Handle) -> Link {
        self.get(handle).left
    }

    #[inline]
    fn right(&self, handle: Handle) -> Link {
        self.get(handle).right
    }

    #[inline]
    fn key(&self, handle: Handle) -> &K {
        &self.get(handle).key
    }

    #[inline]
    fn count(&self, handle: Handle) -> usize {
        self.get(handle).count
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn size_counts_duplicates_and_children() {
        let mut nodes: Nodes<i32, ()> = Arena::new();
        let left = nodes.alloc(Node::new(1, ()));
        let right = nodes.alloc(Node::new(3, ()));
        let root = nodes.alloc(Node::new(2, ()));
        nodes.get_mut(left).count = 2;
        update_size(&mut nodes, left);
        {
            let node = nodes.get_mut(root);
            node.left = Some(left);
            node.right = Some(right);
            node.count = 4;
        }
        update_size(&mut nodes, root);

        assert_eq!(subtree_size(&nodes, Some(left)), 2);
        assert_eq!(subtree_size(&nodes, Some(root)), 7);
        assert_eq!(subtree_size(&nodes, None), 0);
        assert_eq!(find_min(&nodes, root), left);
        assert_eq!(find_min(&nodes, right), right);
    }

    #[test]
    fn sides_are_mirrored() {
        let mut node: Node<u8, ()> = Node::new(0, ());
        let h = Handle::from_index(5);
        node.set_child(!Side::Left, Some(h));
        assert_eq!(node.child(Side::Right), Some(h));
        assert_eq!(node.child(Side::Left), None);
        assert_eq!(!!Side::Right, Side::Right);
    }
}
