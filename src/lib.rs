//! Order-statistic binary search trees for Rust.
//!
//! This crate provides three in-memory ordered collections that share one
//! interface, [`OrderedCollection`], and differ only in how they keep their shape:
//!
//! - [`BsTree`] - a plain binary search tree, never rebalanced
//! - [`AvlTree`] - height-balanced: sibling heights differ by at most one
//! - [`RbTree`] - red-black: equal black height on every path
//!
//! [`OrderedTree`] picks one of them at runtime from a [`TreeConfig`].
//!
//! Every node caches the size of its subtree, so besides lookup, insertion and
//! deletion the collections answer order-statistic queries in the time of a lookup:
//!
//! - [`rank`](OrderedCollection::rank) - the one-based sorted position of a key
//! - [`select`](OrderedCollection::select) - the key at a one-based sorted position
//! - Indexing by [`Rank`] - e.g., `tree[Rank(1)]` for the smallest key
//!
//! Collections can optionally count repeated keys instead of rejecting them, and can
//! be ordered by any [`OrderingPolicy`] rather than [`Ord`].
//!
//! # Example
//!
//! ```
//! use ordtree::{AvlTree, Order, OrderedCollection, Rank};
//!
//! let mut tree = AvlTree::with_duplicates();
//! tree.extend([17, 18, 23, 34, 27, 15, 9, 6, 25, 13, 10, 37, 23]);
//!
//! assert_eq!(tree.size(), 13);
//! assert_eq!(tree.count(&23), 2);
//!
//! // Order-statistic operations (O(log n))
//! assert_eq!(tree.rank(&23), 8);
//! assert_eq!(tree.select(9), Some(&23));
//! assert_eq!(tree[Rank(1)], 6);
//!
//! // Lazy traversal in any of four orders
//! let smallest: Vec<_> = tree.traverse(Order::InOrder).take(3).collect();
//! assert_eq!(smallest, [&6, &9, &10]);
//!
//! tree.delete(&23);
//! assert_eq!(tree.count(&23), 1);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **`serde`** - `Serialize`/`Deserialize` for [`Discipline`] and [`TreeConfig`]
//!
//! # Implementation
//!
//! Nodes live in a slot arena and refer to each other through 32-bit handles. The
//! unbalanced and AVL trees repair the recorded descent path bottom-up after each
//! mutation; the red-black tree keeps parent links and runs the classic recoloring
//! fixups. Rotations and fixup cases are reported as `tracing` events at `TRACE`
//! level.

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod order_statistic;
mod raw;

pub mod avl_tree;
pub mod bs_tree;
pub mod collection;
pub mod config;
pub mod ordered_tree;
pub mod ordering;
pub mod rb_tree;
pub mod traversal;

pub use avl_tree::AvlTree;
pub use bs_tree::BsTree;
pub use collection::{Occurrences, OrderedCollection};
pub use config::{Discipline, ParseDisciplineError, TreeConfig};
pub use order_statistic::Rank;
pub use ordered_tree::OrderedTree;
pub use ordering::{Natural, OrderingPolicy, Reversed};
pub use rb_tree::RbTree;
pub use traversal::{Order, Traversal};
