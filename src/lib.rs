//! A sequoia tree: an ordered, self-balancing binary search tree of integer keys.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` stores a key and will
//! sometimes have child `Node`s. The most important invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than or equal to its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! ## Sequoia
//!
//! Every node caches its height (a leaf has height 1, a missing child counts as 0). A sequoia
//! keeps its nodes "tall": wherever a node has two children, one child is at least twice as tall
//! as the other. After every insert and remove the tree walks from the changed node up to the
//! root, recomputing heights and promoting a child with a single rotation where the two
//! children are too close in height.
//!
//! Nodes are stored in an arena owned by the [`Tree`]. Each node refers to its parent by handle
//! so the upward walk never needs to borrow back through its ancestors.
//!
//! ```
//! use sequoia::Tree;
//!
//! let mut tree = Tree::new();
//! for key in [5, 3, 8] {
//!     tree.insert(key);
//! }
//!
//! // 3 and 8 were both leaves under 5, so 8 was promoted.
//! assert_eq!(tree.to_string(), "(8 L:(5 L:(3)))");
//! assert!(tree.check_height() && tree.is_tall());
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod driver;
mod node;
pub mod render;
mod tree;

#[cfg(test)]
mod test;

pub use node::NodeRef;
pub use tree::Tree;
