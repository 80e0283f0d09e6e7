mod arena;
mod avl;
mod handle;
mod node;
mod order_statistic;
mod raw_rb_tree;
mod raw_search_tree;

#[cfg(test)]
pub(crate) use arena::Arena;
pub(crate) use avl::HeightBalanced;
pub(crate) use handle::{Handle, Link};
#[cfg(test)]
pub(crate) use node::{Node, Nodes};
pub(crate) use node::NodeView;
pub(crate) use raw_rb_tree::RawRbTree;
pub(crate) use raw_search_tree::{RawSearchTree, Unbalanced};
