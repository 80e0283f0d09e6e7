//! Descent and order-statistic queries shared by every discipline.

use core::cmp::Ordering;

use super::handle::{Handle, Link};
use super::node::{Nodes, subtree_size};
use crate::OrderingPolicy;

/// Finds the node holding a key equal to `key`.
pub(crate) fn search<K, M, C>(nodes: &Nodes<K, M>, root: Link, ordering: &C, key: &K) -> Link
where
    C: OrderingPolicy<K>,
{
    let mut current = root;
    while let Some(handle) = current {
        let node = nodes.get(handle);
        current = match ordering.compare(key, &node.key) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(handle),
        };
    }
    None
}

/// One-based rank of the first occurrence of `key`, or zero if it is absent.
pub(crate) fn rank<K, M, C>(nodes: &Nodes<K, M>, root: Link, ordering: &C, key: &K) -> usize
where
    C: OrderingPolicy<K>,
{
    let mut preceding = 0;
    let mut current = root;
    while let Some(handle) = current {
        let node = nodes.get(handle);
        let left_size = subtree_size(nodes, node.left);
        match ordering.compare(key, &node.key) {
            Ordering::Equal => return preceding + left_size + 1,
            Ordering::Less => current = node.left,
            Ordering::Greater => {
                preceding += left_size + node.count;
                current = node.right;
            }
        }
    }
    0
}

/// The node occupying one-based position `k`. A node with count `c` occupies `c`
/// consecutive positions.
pub(crate) fn select<K, M>(nodes: &Nodes<K, M>, root: Link, k: usize) -> Option<Handle> {
    if k == 0 || k > subtree_size(nodes, root) {
        return None;
    }

    let mut remaining = k;
    let mut current = root;
    while let Some(handle) = current {
        let node = nodes.get(handle);
        let left_size = subtree_size(nodes, node.left);
        if remaining <= left_size {
            current = node.left;
        } else if remaining <= left_size + node.count {
            return Some(handle);
        } else {
            remaining -= left_size + node.count;
            current = node.right;
        }
    }
    None
}
