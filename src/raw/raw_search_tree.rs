use core::cmp::Ordering;
use core::marker::PhantomData;

use smallvec::SmallVec;
use tracing::debug;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{Node, Nodes, Side, subtree_size, update_size};
use super::order_statistic;
use crate::{Discipline, OrderingPolicy};

/// A post-mutation repair hook for [`RawSearchTree`].
pub(crate) trait Rebalance {
    /// Per-node balance metadata.
    type Meta: Clone;

    const DISCIPLINE: Discipline;

    /// Metadata of a freshly inserted leaf.
    fn leaf_meta() -> Self::Meta;

    /// Refreshes the cached data of `node` from its children and restores the balance
    /// invariant of the subtree rooted there. Returns the subtree's (possibly new) root.
    ///
    /// Both children must already be repaired.
    fn rebalance<K>(nodes: &mut Nodes<K, Self::Meta>, node: Handle) -> Handle;
}

/// The identity hook: sizes are refreshed, shape is left alone.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Unbalanced;

impl Rebalance for Unbalanced {
    type Meta = ();

    const DISCIPLINE: Discipline = Discipline::Unbalanced;

    fn leaf_meta() -> Self::Meta {}

    fn rebalance<K>(nodes: &mut Nodes<K, Self::Meta>, node: Handle) -> Handle {
        update_size(nodes, node);
        node
    }
}

/// One step of a root-to-node descent.
struct PathElement {
    /// The node stepped through.
    node: Handle,
    /// The child slot taken.
    side: Side,
}

type Path = SmallVec<[PathElement; 32]>;

/// The binary search tree engine behind `BsTree` and `AvlTree`.
///
/// Mutations record the descent path and then repair it bottom-up through `B`, each
/// step reattaching the repaired child subtree before repairing itself.
#[derive(Clone)]
pub(crate) struct RawSearchTree<K, C, B: Rebalance> {
    nodes: Nodes<K, B::Meta>,
    root: Link,
    ordering: C,
    allow_duplicates: bool,
    balance: PhantomData<B>,
}

impl<K, C, B: Rebalance> RawSearchTree<K, C, B> {
    pub(crate) fn new(ordering: C, allow_duplicates: bool) -> Self {
        debug!(discipline = %B::DISCIPLINE, allow_duplicates, "creating search tree");
        Self {
            nodes: Arena::new(),
            root: None,
            ordering,
            allow_duplicates,
            balance: PhantomData,
        }
    }

    /// Total number of stored elements, duplicates included.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        subtree_size(&self.nodes, self.root)
    }

    pub(crate) const fn allows_duplicates(&self) -> bool {
        self.allow_duplicates
    }

    pub(crate) const fn ordering(&self) -> &C {
        &self.ordering
    }

    pub(crate) const fn root(&self) -> Link {
        self.root
    }

    pub(crate) const fn nodes(&self) -> &Nodes<K, B::Meta> {
        &self.nodes
    }

    pub(crate) fn clear(&mut self) {
        debug!(discipline = %B::DISCIPLINE, nodes = self.nodes.len(), "clearing search tree");
        self.nodes.clear();
        self.root = None;
    }

    /// Writes `child` back into each step of `path`, deepest first, repairing every
    /// step. Returns the root of the repaired subtree.
    fn repair_path(&mut self, path: &[PathElement], mut child: Link) -> Link {
        for element in path.iter().rev() {
            self.nodes.get_mut(element.node).set_child(element.side, child);
            child = Some(B::rebalance(&mut self.nodes, element.node));
        }
        child
    }

    /// Grows or shrinks every size along `path` by one occurrence; the shape does not change.
    fn adjust_sizes_along_path(&mut self, path: &[PathElement], grow: bool) {
        for element in path {
            let node = self.nodes.get_mut(element.node);
            if grow {
                node.size += 1;
            } else {
                node.size -= 1;
            }
        }
    }

    /// Unlinks the minimum of the subtree rooted at `root`.
    /// Returns the repaired subtree and the detached node.
    fn detach_min(&mut self, root: Handle) -> (Link, Handle) {
        let mut path: Path = SmallVec::new();
        let mut current = root;
        while let Some(left) = self.nodes.get(current).left {
            path.push(PathElement {
                node: current,
                side: Side::Left,
            });
            current = left;
        }

        let rest = self.nodes.get(current).right;
        (self.repair_path(&path, rest), current)
    }
}

impl<K, C: OrderingPolicy<K>, B: Rebalance> RawSearchTree<K, C, B> {
    /// Descends towards `key`. Returns the path taken and the node holding an equal
    /// key, if any.
    fn descend(&self, key: &K) -> (Path, Link) {
        let mut path: Path = SmallVec::new();
        let mut current = self.root;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let side = match self.ordering.compare(key, &node.key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => break,
            };
            path.push(PathElement { node: handle, side });
            current = node.child(side);
        }

        (path, current)
    }

    pub(crate) fn search(&self, key: &K) -> Link {
        order_statistic::search(&self.nodes, self.root, &self.ordering, key)
    }

    pub(crate) fn insert(&mut self, key: K) {
        let (path, found) = self.descend(&key);

        if let Some(handle) = found {
            if self.allow_duplicates {
                let node = self.nodes.get_mut(handle);
                node.count += 1;
                node.size += 1;
                self.adjust_sizes_along_path(&path, true);
            }
            return;
        }

        let leaf = self.nodes.alloc(Node::new(key, B::leaf_meta()));
        self.root = self.repair_path(&path, Some(leaf));
    }

    pub(crate) fn delete(&mut self, key: &K) {
        let (path, found) = self.descend(key);
        let Some(handle) = found else {
            return;
        };

        let node = self.nodes.get_mut(handle);
        if node.count > 1 {
            node.count -= 1;
            node.size -= 1;
            self.adjust_sizes_along_path(&path, false);
            return;
        }

        let replacement = match (node.left, node.right) {
            (None, child) | (child, None) => {
                self.nodes.free(handle);
                child
            }
            (Some(_), Some(right)) => {
                // The in-order successor's key and count move into this node.
                let (rest, successor) = self.detach_min(right);
                let Node { key, count, .. } = self.nodes.take(successor);
                let node = self.nodes.get_mut(handle);
                node.key = key;
                node.count = count;
                node.right = rest;
                Some(B::rebalance(&mut self.nodes, handle))
            }
        };

        self.root = self.repair_path(&path, replacement);
    }

    pub(crate) fn rank(&self, key: &K) -> usize {
        order_statistic::rank(&self.nodes, self.root, &self.ordering, key)
    }

    pub(crate) fn select(&self, k: usize) -> Option<&K> {
        order_statistic::select(&self.nodes, self.root, k).map(|h| &self.nodes.get(h).key)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use crate::Natural;
    use alloc::collections::BTreeMap;
    use alloc::string::String;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    impl<K, C: OrderingPolicy<K>, B: Rebalance> RawSearchTree<K, C, B> {
        /// Validates order, size and ownership invariants. Panics with a descriptive
        /// message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut reachable = 0usize;

            if let Some(root) = self.root {
                self.validate_node(root, None, None, &mut reachable, &mut errors);
            }

            if reachable != self.nodes.len() {
                errors.push(alloc::format!(
                    "Arena holds {} nodes but {} are reachable",
                    self.nodes.len(),
                    reachable
                ));
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        // Returns the actual subtree size.
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&K>,
            upper: Option<&K>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) -> usize {
            *reachable += 1;
            let node = self.nodes.get(handle);

            if node.count == 0 {
                errors.push(alloc::format!("Zero count at handle {:?}", handle));
            }
            if !self.allow_duplicates && node.count != 1 {
                errors.push(alloc::format!("Count {} without duplicates at handle {:?}", node.count, handle));
            }
            if lower.is_some_and(|lower| self.ordering.compare(&node.key, lower) != Ordering::Greater) {
                errors.push(alloc::format!("Key at handle {:?} not above its lower bound", handle));
            }
            if upper.is_some_and(|upper| self.ordering.compare(&node.key, upper) != Ordering::Less) {
                errors.push(alloc::format!("Key at handle {:?} not below its upper bound", handle));
            }

            let left = node
                .left
                .map_or(0, |l| self.validate_node(l, lower, Some(&node.key), reachable, errors));
            let right = node
                .right
                .map_or(0, |r| self.validate_node(r, Some(&node.key), upper, reachable, errors));

            let actual = node.count + left + right;
            if node.size != actual {
                errors.push(alloc::format!(
                    "Size mismatch at handle {:?}: stored={}, actual={}",
                    handle,
                    node.size,
                    actual
                ));
            }
            actual
        }

        /// Depth of the deepest node.
        pub(crate) fn depth(&self) -> usize {
            let mut deepest = 0;
            let mut stack: Vec<(Handle, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
            while let Some((handle, depth)) = stack.pop() {
                deepest = deepest.max(depth);
                let node = self.nodes.get(handle);
                stack.extend(node.left.map(|l| (l, depth + 1)));
                stack.extend(node.right.map(|r| (r, depth + 1)));
            }
            deepest
        }
    }

    type Tree = RawSearchTree<i32, Natural, Unbalanced>;

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Delete(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..200).prop_map(Op::Insert),
            2 => (0i32..200).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn invariants_hold_after_every_operation(
            ops in prop::collection::vec(op_strategy(), 0..400),
            allow_duplicates in any::<bool>(),
        ) {
            let mut tree = Tree::new(Natural, allow_duplicates);
            let mut model: BTreeMap<i32, usize> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key);
                        let count = model.entry(key).or_insert(0);
                        if *count == 0 || allow_duplicates {
                            *count += 1;
                        }
                    }
                    Op::Delete(key) => {
                        tree.delete(&key);
                        if let Some(count) = model.get_mut(&key) {
                            *count -= 1;
                            if *count == 0 {
                                model.remove(&key);
                            }
                        }
                    }
                }

                tree.validate_invariants();
                prop_assert_eq!(tree.len(), model.values().sum::<usize>());
            }

            let mut k = 1;
            for (key, &count) in &model {
                prop_assert_eq!(tree.rank(key), k);
                for offset in 0..count {
                    prop_assert_eq!(tree.select(k + offset), Some(key));
                }
                k += count;
            }
            prop_assert_eq!(tree.select(k), None);
        }
    }

    #[test]
    fn empty_tree_queries() {
        let mut tree = Tree::new(Natural, false);
        tree.validate_invariants();

        assert_eq!(tree.len(), 0);
        assert_eq!(tree.search(&1), None);
        assert_eq!(tree.rank(&1), 0);
        assert_eq!(tree.select(0), None);
        assert_eq!(tree.select(1), None);

        tree.delete(&1);
        tree.validate_invariants();
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn duplicates_rejected_without_duplicate_mode() {
        let mut tree = Tree::new(Natural, false);
        for _ in 0..3 {
            tree.insert(5);
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 1);

        tree.delete(&5);
        assert_eq!(tree.search(&5), None);
    }

    #[test]
    fn duplicates_occupy_consecutive_ranks() {
        let mut tree = Tree::new(Natural, true);
        for key in [4, 5, 5, 5, 6] {
            tree.insert(key);
        }
        tree.validate_invariants();

        assert_eq!(tree.rank(&4), 1);
        assert_eq!(tree.rank(&5), 2);
        assert_eq!(tree.rank(&6), 5);
        assert_eq!(tree.select(2), Some(&5));
        assert_eq!(tree.select(4), Some(&5));
        assert_eq!(tree.select(5), Some(&6));
    }

    #[test]
    fn rank_of_absent_key_is_zero() {
        let mut tree = Tree::new(Natural, false);
        for key in [10, 20, 30] {
            tree.insert(key);
        }
        assert_eq!(tree.rank(&25), 0);
        assert_eq!(tree.rank(&40), 0);
        assert_eq!(tree.rank(&5), 0);
    }

    #[test]
    fn two_child_delete_takes_successor() {
        let mut tree = Tree::new(Natural, true);
        for key in [50, 30, 70, 60, 80, 65] {
            tree.insert(key);
        }
        // The successor carries its count into the vacated node.
        tree.insert(60);
        tree.delete(&50);
        tree.validate_invariants();

        let root = tree.root().expect("tree is not empty");
        assert_eq!(tree.nodes().get(root).key, 60);
        assert_eq!(tree.nodes().get(root).count, 2);
        assert_eq!(tree.len(), 6);
        assert_eq!(tree.select(2), Some(&60));
        assert_eq!(tree.select(3), Some(&60));
        assert_eq!(tree.select(4), Some(&65));
    }

    #[test]
    fn sorted_insertions_degenerate_without_recursion() {
        let mut tree = Tree::new(Natural, false);
        for key in 0..5_000 {
            tree.insert(key);
        }
        assert_eq!(tree.depth(), 5_000);
        assert_eq!(tree.select(4_321), Some(&4_320));

        for key in 0..5_000 {
            tree.delete(&key);
        }
        assert_eq!(tree.len(), 0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn custom_ordering_drives_structure() {
        let mut tree: RawSearchTree<i32, _, Unbalanced> = RawSearchTree::new(|a: &i32, b: &i32| b.cmp(a), false);
        for key in [1, 3, 2] {
            tree.insert(key);
        }
        tree.validate_invariants();
        assert_eq!(tree.select(1), Some(&3));
        assert_eq!(tree.rank(&1), 3);
    }
}
