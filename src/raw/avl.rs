use tracing::trace;

use super::handle::{Handle, Link};
use super::node::{Nodes, Side, subtree_size};
use super::raw_search_tree::Rebalance;
use crate::Discipline;

/// Height of a subtree; a leaf has height one.
pub(crate) type Height = u32;

/// The AVL hook: keeps sibling heights within one of each other.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HeightBalanced;

#[inline]
fn height<K>(nodes: &Nodes<K, Height>, link: Link) -> Height {
    link.map_or(0, |h| nodes.get(h).meta)
}

/// Recomputes height and size of `handle` from its children.
fn update<K>(nodes: &mut Nodes<K, Height>, handle: Handle) {
    let node = nodes.get(handle);
    let height = 1 + height(nodes, node.left).max(height(nodes, node.right));
    let size = node.count + subtree_size(nodes, node.left) + subtree_size(nodes, node.right);

    let node = nodes.get_mut(handle);
    node.meta = height;
    node.size = size;
}

/// `height(left) - height(right)`.
fn balance_factor<K>(nodes: &Nodes<K, Height>, handle: Handle) -> i64 {
    let node = nodes.get(handle);
    i64::from(height(nodes, node.left)) - i64::from(height(nodes, node.right))
}

/// Rotates the subtree at `node` so that `node` moves down towards `side`; its child on
/// the opposite side becomes the subtree root and is returned.
///
/// ```text
///     |                        |
///     N                        P
///    / \    rotate(N, Left)   / \
///   A   P   ==============>  N   C
///      / \                  / \
///     B   C                A   B
/// ```
fn rotate<K>(nodes: &mut Nodes<K, Height>, node: Handle, side: Side) -> Handle {
    let Some(pivot) = nodes.get(node).child(!side) else {
        return node;
    };
    let inner = nodes.get(pivot).child(side);

    nodes.get_mut(node).set_child(!side, inner);
    nodes.get_mut(pivot).set_child(side, Some(node));

    // The old root is now a child of the pivot, so it must be refreshed first.
    update(nodes, node);
    update(nodes, pivot);

    trace!(node = node.to_index(), pivot = pivot.to_index(), ?side, "avl rotation");
    pivot
}

impl Rebalance for HeightBalanced {
    type Meta = Height;

    const DISCIPLINE: Discipline = Discipline::HeightBalanced;

    fn leaf_meta() -> Self::Meta {
        1
    }

    fn rebalance<K>(nodes: &mut Nodes<K, Self::Meta>, node: Handle) -> Handle {
        update(nodes, node);

        let factor = balance_factor(nodes, node);
        let heavy = match factor {
            2.. => Side::Left,
            ..=-2 => Side::Right,
            _ => return node,
        };

        // Left-Right / Right-Left: straighten the heavy child first.
        if let Some(child) = nodes.get(node).child(heavy) {
            let child_factor = balance_factor(nodes, child);
            let leans_inward = match heavy {
                Side::Left => child_factor < 0,
                Side::Right => child_factor > 0,
            };
            if leans_inward {
                let straightened = rotate(nodes, child, heavy);
                nodes.get_mut(node).set_child(heavy, Some(straightened));
            }
        }

        // Left-Left / Right-Right.
        rotate(nodes, node, !heavy)
    }
}
