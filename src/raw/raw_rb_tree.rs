use tracing::{debug, trace};

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::{Node, Nodes, Side, find_min, subtree_size, update_size};
use super::order_statistic;
use crate::OrderingPolicy;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Red-black balance metadata.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RbMeta {
    pub(crate) color: Color,
    // Non-owning; `None` for the root.
    pub(crate) parent: Link,
}

/// The red-black engine behind `RbTree`.
///
/// An absent link (`None`) is the shared sentinel: it is black, its children are
/// itself, and its parent is the writable `nil_parent` slot. Delete fixup may start at
/// the sentinel and relies on that slot to find its way back into the tree.
#[derive(Clone)]
pub(crate) struct RawRbTree<K, C> {
    nodes: Nodes<K, RbMeta>,
    root: Link,
    nil_parent: Link,
    ordering: C,
    allow_duplicates: bool,
}

impl<K, C> RawRbTree<K, C> {
    pub(crate) fn new(ordering: C, allow_duplicates: bool) -> Self {
        debug!(allow_duplicates, "creating red-black tree");
        Self {
            nodes: Arena::new(),
            root: None,
            nil_parent: None,
            ordering,
            allow_duplicates,
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

    pub(crate) const fn nodes(&self) -> &Nodes<K, RbMeta> {
        &self.nodes
    }

    pub(crate) fn clear(&mut self) {
        debug!(nodes = self.nodes.len(), "clearing red-black tree");
        self.nodes.clear();
        self.root = None;
        self.nil_parent = None;
    }

    #[inline]
    fn color(&self, x: Link) -> Color {
        x.map_or(Color::Black, |h| self.nodes.get(h).meta.color)
    }

    /// Recolors `x`; the sentinel stays black.
    #[inline]
    fn set_color(&mut self, x: Link, color: Color) {
        if let Some(h) = x {
            self.nodes.get_mut(h).meta.color = color;
        }
    }

    #[inline]
    fn parent(&self, x: Link) -> Link {
        match x {
            Some(h) => self.nodes.get(h).meta.parent,
            None => self.nil_parent,
        }
    }

    #[inline]
    fn set_parent(&mut self, x: Link, parent: Link) {
        match x {
            Some(h) => self.nodes.get_mut(h).meta.parent = parent,
            None => self.nil_parent = parent,
        }
    }

    #[inline]
    fn child(&self, x: Link, side: Side) -> Link {
        x.and_then(|h| self.nodes.get(h).child(side))
    }

    /// Which child of `parent` the link `x` is. The sentinel matches an empty left slot
    /// first.
    #[inline]
    fn side_of(&self, x: Link, parent: Handle) -> Side {
        if self.nodes.get(parent).left == x {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Points whatever referenced `old` from above (a parent slot or the root) at `new`.
    fn replace_child(&mut self, parent: Link, old: Handle, new: Link) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(Some(old), p);
                self.nodes.get_mut(p).set_child(side, new);
            }
        }
    }

    fn update_size_up(&mut self, mut x: Link) {
        while let Some(h) = x {
            update_size(&mut self.nodes, h);
            x = self.nodes.get(h).meta.parent;
        }
    }

    /// Rotates at `node` so that it moves down towards `side` and its child on the
    /// opposite side takes its place.
    ///
    /// ```text
    ///     |                        |
    ///     N                        P
    ///    / \    rotate(N, Left)   / \
    ///   A   P   ==============>  N   C
    ///      / \                  / \
    ///     B   C                A   B
    /// ```
    fn rotate(&mut self, node: Handle, side: Side) {
        let Some(pivot) = self.nodes.get(node).child(!side) else {
            return;
        };
        let inner = self.nodes.get(pivot).child(side);

        self.nodes.get_mut(node).set_child(!side, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).meta.parent = Some(node);
        }

        let parent = self.nodes.get(node).meta.parent;
        self.nodes.get_mut(pivot).meta.parent = parent;
        self.replace_child(parent, node, Some(pivot));

        self.nodes.get_mut(pivot).set_child(side, Some(node));
        self.nodes.get_mut(node).meta.parent = Some(pivot);

        // Sizes above the pivot are unchanged: the subtree holds the same elements.
        update_size(&mut self.nodes, node);
        update_size(&mut self.nodes, pivot);

        trace!(node = node.to_index(), pivot = pivot.to_index(), ?side, "red-black rotation");
    }

    /// Replaces the subtree at `u` with the subtree at `v` in `u`'s parent.
    fn transplant(&mut self, u: Handle, v: Link) {
        let parent = self.nodes.get(u).meta.parent;
        self.replace_child(parent, u, v);
        self.set_parent(v, parent);
    }

    fn insert_fixup(&mut self, mut node: Handle) {
        loop {
            let Some(mut parent) = self.nodes.get(node).meta.parent else {
                break;
            };
            if self.color(Some(parent)) == Color::Black {
                break;
            }
            // A red parent is never the root, so the grandparent exists.
            let Some(grand) = self.nodes.get(parent).meta.parent else {
                break;
            };

            let side = self.side_of(Some(parent), grand);
            let uncle = self.nodes.get(grand).child(!side);

            if self.color(uncle) == Color::Red {
                trace!(node = node.to_index(), "insert fixup: red uncle");
                self.set_color(Some(parent), Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(Some(grand), Color::Red);
                node = grand;
                continue;
            }

            if self.nodes.get(parent).child(!side) == Some(node) {
                trace!(node = node.to_index(), "insert fixup: inner child");
                node = parent;
                self.rotate(node, side);
                let Some(lifted) = self.nodes.get(node).meta.parent else {
                    break;
                };
                parent = lifted;
            }

            trace!(node = node.to_index(), "insert fixup: outer child");
            self.set_color(Some(parent), Color::Black);
            self.set_color(Some(grand), Color::Red);
            self.rotate(grand, !side);
        }

        self.set_color(self.root, Color::Black);
    }

    fn delete_fixup(&mut self, mut x: Link) {
        while self.color(x) == Color::Black {
            let Some(parent) = self.parent(x) else {
                break;
            };
            let side = self.side_of(x, parent);
            let mut sibling = self.nodes.get(parent).child(!side);

            if self.color(sibling) == Color::Red {
                trace!(parent = parent.to_index(), "delete fixup: red sibling");
                self.set_color(sibling, Color::Black);
                self.set_color(Some(parent), Color::Red);
                self.rotate(parent, side);
                sibling = self.nodes.get(parent).child(!side);
            }

            let near = self.child(sibling, side);
            let far = self.child(sibling, !side);
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                trace!(parent = parent.to_index(), "delete fixup: black nephews");
                self.set_color(sibling, Color::Red);
                x = Some(parent);
                continue;
            }

            if self.color(far) == Color::Black {
                trace!(parent = parent.to_index(), "delete fixup: red near nephew");
                self.set_color(near, Color::Black);
                self.set_color(sibling, Color::Red);
                if let Some(s) = sibling {
                    self.rotate(s, !side);
                }
                sibling = self.nodes.get(parent).child(!side);
            }

            trace!(parent = parent.to_index(), "delete fixup: red far nephew");
            let parent_color = self.color(Some(parent));
            self.set_color(sibling, parent_color);
            self.set_color(Some(parent), Color::Black);
            self.set_color(self.child(sibling, !side), Color::Black);
            self.rotate(parent, side);
            x = self.root;
        }

        self.set_color(x, Color::Black);
    }
}

impl<K, C: OrderingPolicy<K>> RawRbTree<K, C> {
    pub(crate) fn search(&self, key: &K) -> Link {
        order_statistic::search(&self.nodes, self.root, &self.ordering, key)
    }

    pub(crate) fn insert(&mut self, key: K) {
        let mut parent: Link = None;
        let mut side = Side::Left;
        let mut current = self.root;

        while let Some(h) = current {
            let node = self.nodes.get(h);
            side = match self.ordering.compare(&key, &node.key) {
                core::cmp::Ordering::Less => Side::Left,
                core::cmp::Ordering::Greater => Side::Right,
                core::cmp::Ordering::Equal => {
                    if self.allow_duplicates {
                        self.nodes.get_mut(h).count += 1;
                        self.update_size_up(Some(h));
                    }
                    return;
                }
            };
            parent = Some(h);
            current = node.child(side);
        }

        let node = self.nodes.alloc(Node::new(
            key,
            RbMeta {
                color: Color::Red,
                parent,
            },
        ));
        match parent {
            None => self.root = Some(node),
            Some(p) => self.nodes.get_mut(p).set_child(side, Some(node)),
        }

        self.update_size_up(parent);
        self.insert_fixup(node);
    }

    pub(crate) fn delete(&mut self, key: &K) {
        let Some(z) = self.search(key) else {
            return;
        };

        let node = self.nodes.get_mut(z);
        if node.count > 1 {
            node.count -= 1;
            self.update_size_up(Some(z));
            return;
        }

        let mut removed_color = node.meta.color;
        // The link that moves into the vacated position; may be the sentinel.
        let x = match (node.left, node.right) {
            (None, child) | (child, None) => {
                self.transplant(z, child);
                child
            }
            (Some(left), Some(right)) => {
                let y = find_min(&self.nodes, right);
                removed_color = self.nodes.get(y).meta.color;
                let x = self.nodes.get(y).right;

                if self.nodes.get(y).meta.parent == Some(z) {
                    self.set_parent(x, Some(y));
                } else {
                    self.transplant(y, x);
                    self.nodes.get_mut(y).right = Some(right);
                    self.nodes.get_mut(right).meta.parent = Some(y);
                }

                self.transplant(z, Some(y));
                let z_color = self.nodes.get(z).meta.color;
                let successor = self.nodes.get_mut(y);
                successor.left = Some(left);
                successor.meta.color = z_color;
                self.nodes.get_mut(left).meta.parent = Some(y);
                x
            }
        };

        // Every node whose subtree lost `z` lies on the path from x's parent upwards.
        self.update_size_up(self.parent(x));
        self.nodes.free(z);

        if removed_color == Color::Black {
            self.delete_fixup(x);
        }
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
    use core::cmp::Ordering;
    use proptest::prelude::*;

    impl<K, C: OrderingPolicy<K>> RawRbTree<K, C> {
        /// Validates order, size, parent-link and color invariants. Panics with a
        /// descriptive message if any are violated.
        pub(crate) fn validate_invariants(&self) {
            let mut errors: Vec<String> = Vec::new();
            let mut reachable = 0usize;

            if let Some(root) = self.root {
                if self.color(Some(root)) != Color::Black {
                    errors.push("Root is red".into());
                }
                if self.nodes.get(root).meta.parent.is_some() {
                    errors.push("Root has a parent".into());
                }
                self.validate_node(root, None, None, &mut reachable, &mut errors);
            }

            if reachable != self.nodes.len() {
                errors.push(alloc::format!(
                    "Arena holds {} nodes but {} are reachable",
                    self.nodes.len(),
                    reachable
                ));
            }

            assert!(errors.is_empty(), "Red-black invariant violations:\n{}", errors.join("\n"));
        }

        // Returns (actual size, black height).
        fn validate_node(
            &self,
            handle: Handle,
            lower: Option<&K>,
            upper: Option<&K>,
            reachable: &mut usize,
            errors: &mut Vec<String>,
        ) -> (usize, usize) {
            *reachable += 1;
            let node = self.nodes.get(handle);

            if lower.is_some_and(|lower| self.ordering.compare(&node.key, lower) != Ordering::Greater) {
                errors.push(alloc::format!("Key at handle {:?} not above its lower bound", handle));
            }
            if upper.is_some_and(|upper| self.ordering.compare(&node.key, upper) != Ordering::Less) {
                errors.push(alloc::format!("Key at handle {:?} not below its upper bound", handle));
            }

            let mut visit = |child: Link, lower: Option<&K>, upper: Option<&K>| match child {
                None => (0, 1),
                Some(c) => {
                    if self.nodes.get(c).meta.parent != Some(handle) {
                        errors.push(alloc::format!("Parent link of {:?} does not point at {:?}", c, handle));
                    }
                    if node.meta.color == Color::Red && self.nodes.get(c).meta.color == Color::Red {
                        errors.push(alloc::format!("Red node {:?} has red child {:?}", handle, c));
                    }
                    self.validate_node(c, lower, upper, reachable, errors)
                }
            };
            let (left_size, left_black) = visit(node.left, lower, Some(&node.key));
            let (right_size, right_black) = visit(node.right, Some(&node.key), upper);

            if left_black != right_black {
                errors.push(alloc::format!(
                    "Black height mismatch at handle {:?}: left={}, right={}",
                    handle,
                    left_black,
                    right_black
                ));
            }

            let actual = node.count + left_size + right_size;
            if node.size != actual {
                errors.push(alloc::format!(
                    "Size mismatch at handle {:?}: stored={}, actual={}",
                    handle,
                    node.size,
                    actual
                ));
            }

            let black = left_black + usize::from(node.meta.color == Color::Black);
            (actual, black)
        }
    }

    type Tree = RawRbTree<i32, Natural>;

    #[test]
    fn insert_recolors_and_rotates() {
        let mut tree = Tree::new(Natural, false);
        for key in 1..=10 {
            tree.insert(key);
            tree.validate_invariants();
        }
        let root = tree.root().expect("not empty");
        assert_eq!(tree.nodes().get(root).key, 4);
        assert_eq!(tree.len(), 10);
    }

    #[test]
    fn deleting_root_of_single_node_tree_empties_it() {
        let mut tree = Tree::new(Natural, false);
        tree.insert(1);
        tree.delete(&1);
        tree.validate_invariants();
        assert!(tree.root().is_none());
        assert_eq!(tree.len(), 0);

        tree.insert(2);
        tree.validate_invariants();
        assert_eq!(tree.select(1), Some(&2));
    }

    #[test]
    fn successor_that_is_direct_child() {
        let mut tree = Tree::new(Natural, false);
        for key in [20, 10, 30, 40] {
            tree.insert(key);
        }
        tree.delete(&20);
        tree.validate_invariants();
        assert_eq!(tree.select(2), Some(&30));
        assert_eq!(tree.rank(&40), 3);
    }

    #[test]
    fn deep_successor_keeps_sizes() {
        let mut tree = Tree::new(Natural, false);
        for key in 0..64 {
            tree.insert(key);
        }
        // The root's successor sits several levels down its right subtree.
        let root = tree.root().expect("not empty");
        let key = tree.nodes().get(root).key;
        tree.delete(&key);
        tree.validate_invariants();
        assert_eq!(tree.len(), 63);
        assert_eq!(tree.rank(&(key + 1)), usize::try_from(key).unwrap() + 1);
    }

    #[test]
    fn duplicate_counts_fold_and_unfold() {
        let mut tree = Tree::new(Natural, true);
        for key in [5, 5, 5, 1, 9] {
            tree.insert(key);
        }
        tree.validate_invariants();
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.rank(&9), 5);

        tree.delete(&5);
        tree.validate_invariants();
        let five = tree.search(&5).expect("still present");
        assert_eq!(tree.nodes().get(five).count, 2);
        assert_eq!(tree.len(), 4);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Delete(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..256).prop_map(Op::Insert),
            2 => (0i32..256).prop_map(Op::Delete),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn colors_hold_after_every_operation(
            ops in prop::collection::vec(op_strategy(), 0..500),
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
                prop_assert_eq!(tree.select(k + count - 1), Some(key));
                k += count;
            }
        }
    }
}
