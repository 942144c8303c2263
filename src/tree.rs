//! The owning container. A [`Tree`] holds the arena of nodes, the handle of the current root,
//! and a counter of insertions.
//!
//! # Examples
//!
//! ```
//! use sequoia::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.search(1).is_none());
//! assert_eq!(tree.to_string(), "empty");
//!
//! tree.insert(1);
//! tree.insert(2);
//! assert_eq!(tree.search(2).map(|n| n.value()), Some(2));
//! assert_eq!(tree.to_string(), "(1 R:(2))");
//!
//! // Removing returns the key that was removed.
//! assert_eq!(tree.remove(1), Some(1));
//! assert_eq!(tree.remove(1), None);
//! assert!(tree.is_verified());
//! ```

use std::fmt;

use generational_arena::Index;
use log::{debug, warn};

use crate::node::{NodeRef, Nodes};

/// An ordered tree of integer keys where, at every node with two children, one child is at least
/// twice as tall as the other.
#[derive(Clone)]
pub struct Tree {
    nodes: Nodes,
    root: Option<Index>,
    size: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("size", &self.size)
            .field("root", &self.root())
            .finish()
    }
}

impl Tree {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self {
            nodes: Nodes::new(),
            root: None,
            size: 0,
        }
    }

    /// Inserts `key` as a new leaf and rebalances on the way back up. Keys equal to an existing
    /// key are stored again, to the right of it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequoia::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(5);
    /// tree.insert(5);
    ///
    /// assert_eq!(tree.to_string(), "(5 R:(5))");
    /// ```
    pub fn insert(&mut self, key: i64) {
        debug!("inserting {}", key);
        let root = match self.root {
            Some(root) => self.nodes.insert_below(root, key),
            None => self.nodes.alloc_root(key),
        };
        self.reanchor(Some(root));
        self.size += 1;
    }

    /// Removes one node holding `key` and returns the key. If the tree does not contain `key`,
    /// nothing happens and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequoia::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.remove(1), Some(1));
    /// assert_eq!(tree.remove(1), None);
    /// assert!(tree.is_empty());
    /// ```
    pub fn remove(&mut self, key: i64) -> Option<i64> {
        let index = self.root.and_then(|root| self.nodes.search(root, key))?;
        debug!("removing {}", key);

        let (detached, root) = self.nodes.remove(index);
        self.reanchor(root);
        Some(detached.value)
    }

    fn reanchor(&mut self, root: Option<Index>) {
        if root != self.root {
            debug!(
                "root is now {:?}",
                root.map(|index| self.nodes.get(index).value)
            );
        }
        self.root = root;
    }

    /// Finds a node holding `key`. Equal keys are found from the top down, so with duplicates
    /// this is the shallowest one.
    ///
    /// # Examples
    ///
    /// ```
    /// use sequoia::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.search(1).map(|n| n.height()), Some(1));
    /// assert!(tree.search(42).is_none());
    /// ```
    pub fn search(&self, key: i64) -> Option<NodeRef<'_>> {
        self.root
            .and_then(|root| self.nodes.search(root, key))
            .map(|index| NodeRef::new(&self.nodes, index))
    }

    /// Whether any node holds `key`.
    pub fn contains(&self, key: i64) -> bool {
        self.search(key).is_some()
    }

    /// The root node, or `None` for an empty tree.
    pub fn root(&self) -> Option<NodeRef<'_>> {
        self.root.map(|index| NodeRef::new(&self.nodes, index))
    }

    /// How many times [`Tree::insert`] has been called.
    ///
    /// **Note** Removals do not decrement this. Use [`Tree::len`] for the number of keys currently
    /// stored.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The number of keys currently stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The height of the root, or 0 for an empty tree.
    pub fn height(&self) -> usize {
        self.root().map_or(0, |root| root.height())
    }

    /// Every stored key in sorted order.
    pub fn in_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len());
        if let Some(root) = self.root {
            self.nodes.in_order(root, &mut out);
        }
        out
    }

    /// Returns `true` if every node's cached height is one more than its taller child's.
    pub fn check_height(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        match self.nodes.check_height(root) {
            Ok(_) => true,
            Err(violation) => {
                warn!("{}", violation);
                false
            }
        }
    }

    /// Returns `true` if at every node one child is at least twice as tall as the other, or
    /// a child is missing. An empty tree is tall. Assumes [`Tree::check_height`] holds.
    pub fn is_tall(&self) -> bool {
        let Some(root) = self.root else {
            return true;
        };
        match self.nodes.is_tall(root) {
            Ok(()) => true,
            Err(violation) => {
                warn!("{}", violation);
                false
            }
        }
    }

    /// Both [`Tree::check_height`] and [`Tree::is_tall`].
    pub fn is_verified(&self) -> bool {
        self.check_height() && self.is_tall()
    }
}
