//! The balancing primitive. Every node lives in a [`Nodes`] arena owned by its [`Tree`] and
//! refers to its children and parent through arena handles. Children are owned through the arena
//! by whichever node links to them. The parent handle is only ever followed upwards during
//! fix-ups and rotations.
//!
//! [`Tree`]: crate::Tree

use std::fmt;

use generational_arena::{Arena, Index};
use log::trace;
use thiserror::Error;

/// A reason a subtree failed verification. These never escape the crate - [`Tree`] logs them and
/// reduces them to a `bool`.
///
/// [`Tree`]: crate::Tree
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum Violation {
    #[error(
        "height of node {value} incorrect: left height = {left}, right height = {right}, \
         node height = {height}"
    )]
    Height {
        value: i64,
        left: usize,
        right: usize,
        height: usize,
    },
    #[error("node {value} is not tall: left height = {left}, right height = {right}")]
    NotTall { value: i64, left: usize, right: usize },
}

/// Which child gets promoted into its parent's slot during a fix-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    /// Promote the right child, i.e. rotate it left.
    Left,
    /// Promote the left child, i.e. rotate it right.
    Right,
}

/// Picks the rotation performed while walking up after an insert, given the heights of the left
/// and right children of a node that has both.
pub(crate) fn insert_rotation(left: usize, right: usize) -> Option<Rotation> {
    if 2 * right > left && right <= left {
        Some(Rotation::Left)
    } else if 2 * left > right && left <= right {
        Some(Rotation::Right)
    } else {
        None
    }
}

/// Picks the rotation performed while walking up after a removal. The comparisons are written
/// differently from [`insert_rotation`] but select the same rotation for every pair of heights.
pub(crate) fn remove_rotation(left: usize, right: usize) -> Option<Rotation> {
    if right <= left && 2 * right > left {
        Some(Rotation::Left)
    } else if right >= left && right < 2 * left {
        Some(Rotation::Right)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) value: i64,
    /// How many levels are in the subtree rooted at this node. A node with no children has a
    /// height of 1.
    pub(crate) height: usize,
    pub(crate) left: Option<Index>,
    pub(crate) right: Option<Index>,
    pub(crate) parent: Option<Index>,
}

impl Node {
    fn leaf(value: i64, parent: Option<Index>) -> Self {
        Self {
            value,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }
}

/// The arena holding every node of one tree.
#[derive(Debug, Clone)]
pub(crate) struct Nodes(Arena<Node>);

impl Nodes {
    pub(crate) fn new() -> Self {
        Self(Arena::new())
    }

    /// The number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn get(&self, index: Index) -> &Node {
        &self.0[index]
    }

    /// Allocates a parentless leaf. Used for the first node of an empty tree.
    pub(crate) fn alloc_root(&mut self, value: i64) -> Index {
        self.0.insert(Node::leaf(value, None))
    }

    fn height_of(&self, link: Option<Index>) -> usize {
        link.map_or(0, |index| self.0[index].height)
    }

    /// Adjusts the height of `index` to be the max of its children's heights + 1.
    pub(crate) fn update_height(&mut self, index: Index) {
        let node = &self.0[index];
        let height = self.height_of(node.left).max(self.height_of(node.right)) + 1;
        self.0[index].height = height;
    }

    /// Finds the node holding `key` in the subtree rooted at `from`.
    pub(crate) fn search(&self, from: Index, key: i64) -> Option<Index> {
        let mut current = from;
        loop {
            let node = &self.0[current];
            current = if key == node.value {
                return Some(current);
            } else if key < node.value {
                node.left?
            } else {
                node.right?
            };
        }
    }

    /// Inserts `key` as a new leaf below `root`, sending equal keys to the right, then repairs
    /// heights and balance on the way back up. Returns the node the repair finished at, which is
    /// the root of the whole tree.
    pub(crate) fn insert_below(&mut self, root: Index, key: i64) -> Index {
        let mut current = root;
        loop {
            let node = &self.0[current];
            let next = if key < node.value {
                node.left
            } else {
                node.right
            };
            match next {
                Some(child) => current = child,
                None => break,
            }
        }

        let leaf = self.0.insert(Node::leaf(key, Some(current)));
        let parent = &mut self.0[current];
        if key < parent.value {
            parent.left = Some(leaf);
        } else {
            parent.right = Some(leaf);
        }
        trace!("attached {} below {}", key, parent.value);

        self.fix_after_insert(current)
    }

    /// Removes the node at `index` from the tree. A node with two children first trades keys
    /// with its in-order predecessor, which is then removed in its place.
    ///
    /// Returns the detached node (holding the removed key, with its links cleared) and the new
    /// root of the tree, if any nodes remain.
    pub(crate) fn remove(&mut self, index: Index) -> (Node, Option<Index>) {
        let mut target = index;
        while let (Some(left), Some(_)) = (self.0[target].left, self.0[target].right) {
            let predecessor = self.rightmost(left);
            let key = self.0[target].value;
            self.0[target].value = self.0[predecessor].value;
            self.0[predecessor].value = key;
            trace!(
                "swapped {} down to its predecessor's slot",
                self.0[predecessor].value
            );
            target = predecessor;
        }

        let node = &self.0[target];
        let child = node.left.or(node.right);
        let parent = node.parent;
        if let Some(child) = child {
            self.0[child].parent = parent;
        }
        if let Some(parent) = parent {
            self.replace_child(parent, target, child);
        }

        let mut detached = self
            .0
            .remove(target)
            .expect("spliced-out node is still live in the arena");
        detached.left = None;
        detached.right = None;
        detached.parent = None;

        let root = match parent {
            Some(parent) => Some(self.fix_after_remove(parent)),
            // The root was removed. Its only child (if any) takes over unchanged.
            None => child,
        };
        (detached, root)
    }

    fn rightmost(&self, from: Index) -> Index {
        let mut current = from;
        while let Some(right) = self.0[current].right {
            current = right;
        }
        current
    }

    /// Points whichever child link of `parent` referenced `old` at `new` instead.
    fn replace_child(&mut self, parent: Index, old: Index, new: Option<Index>) {
        let parent = &mut self.0[parent];
        if parent.left == Some(old) {
            parent.left = new;
        } else {
            parent.right = new;
        }
    }

    pub(crate) fn fix_after_insert(&mut self, from: Index) -> Index {
        self.fix_up(from, insert_rotation)
    }

    pub(crate) fn fix_after_remove(&mut self, from: Index) -> Index {
        self.fix_up(from, remove_rotation)
    }

    /// Walks from `from` to the root recomputing heights. Each node with two children may
    /// promote one of them with a single rotation, as decided by `choose`. Returns the root.
    fn fix_up(&mut self, from: Index, choose: fn(usize, usize) -> Option<Rotation>) -> Index {
        let mut current = from;
        loop {
            self.update_height(current);

            let node = &self.0[current];
            if let (Some(left), Some(right)) = (node.left, node.right) {
                let (left_height, right_height) = (self.0[left].height, self.0[right].height);
                match choose(left_height, right_height) {
                    Some(Rotation::Left) => self.rotate_left(right),
                    Some(Rotation::Right) => self.rotate_right(left),
                    None => {}
                }
                self.update_height(current);
            }

            match self.0[current].parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Promotes `index`, the right child of its parent, into its parent's slot. The old parent
    /// becomes its left child and adopts its old left subtree.
    ///
    /// ## Panics
    ///
    /// When `index` has no parent.
    ///
    /// # Diagram
    ///
    /// ```text
    ///  Option<grandparent>         Option<grandparent>
    ///      /                           /
    ///   old_parent                  index
    ///    /    \                    /     \
    ///   x    index    rotate ->  old_parent  z
    ///        /   \               /   \
    ///       y     z             x     y
    /// ```
    pub(crate) fn rotate_left(&mut self, index: Index) {
        let old_parent = self.0[index]
            .parent
            .expect("only a node with a parent can be promoted by a rotation");
        trace!(
            "rotating {} left over {}",
            self.0[index].value,
            self.0[old_parent].value
        );

        let grandparent = self.0[old_parent].parent;
        self.0[index].parent = grandparent;
        if let Some(grandparent) = grandparent {
            self.replace_child(grandparent, old_parent, Some(index));
        }

        let moved = self.0[index].left;
        self.0[old_parent].right = moved;
        if let Some(moved) = moved {
            self.0[moved].parent = Some(old_parent);
        }

        self.0[old_parent].parent = Some(index);
        self.0[index].left = Some(old_parent);
        self.update_height(old_parent);
    }

    /// Promotes `index`, the left child of its parent, into its parent's slot. The mirror image
    /// of [`Nodes::rotate_left`].
    ///
    /// ## Panics
    ///
    /// When `index` has no parent.
    pub(crate) fn rotate_right(&mut self, index: Index) {
        let old_parent = self.0[index]
            .parent
            .expect("only a node with a parent can be promoted by a rotation");
        trace!(
            "rotating {} right over {}",
            self.0[index].value,
            self.0[old_parent].value
        );

        let grandparent = self.0[old_parent].parent;
        self.0[index].parent = grandparent;
        if let Some(grandparent) = grandparent {
            self.replace_child(grandparent, old_parent, Some(index));
        }

        let moved = self.0[index].right;
        self.0[old_parent].left = moved;
        if let Some(moved) = moved {
            self.0[moved].parent = Some(old_parent);
        }

        self.0[old_parent].parent = Some(index);
        self.0[index].right = Some(old_parent);
        self.update_height(old_parent);
    }

    /// Every node of the subtree rooted at `index`, children before their parent and left
    /// subtrees before right ones.
    fn post_order(&self, index: Index) -> Vec<Index> {
        let mut order = Vec::new();
        let mut stack = vec![index];
        while let Some(index) = stack.pop() {
            order.push(index);
            let node = &self.0[index];
            stack.extend(node.left);
            stack.extend(node.right);
        }
        order.reverse();
        order
    }

    /// Checks that every cached height in the subtree rooted at `index` is one more than the
    /// taller of its children. Returns the subtree's height.
    pub(crate) fn check_height(&self, index: Index) -> Result<usize, Violation> {
        for current in self.post_order(index) {
            let node = &self.0[current];
            let left = self.height_of(node.left);
            let right = self.height_of(node.right);
            if node.height != left.max(right) + 1 {
                return Err(Violation::Height {
                    value: node.value,
                    left,
                    right,
                    height: node.height,
                });
            }
        }
        Ok(self.0[index].height)
    }

    /// Checks that at every node in the subtree rooted at `index` one child is at least twice as
    /// tall as the other. A missing child always satisfies this. Assumes the heights are correct.
    pub(crate) fn is_tall(&self, index: Index) -> Result<(), Violation> {
        for current in self.post_order(index) {
            let node = &self.0[current];
            let left = self.height_of(node.left);
            let right = self.height_of(node.right);
            if left < 2 * right && right < 2 * left {
                return Err(Violation::NotTall {
                    value: node.value,
                    left,
                    right,
                });
            }
        }
        Ok(())
    }

    /// Appends the keys of the subtree rooted at `index` to `out` in sorted order.
    pub(crate) fn in_order(&self, index: Index, out: &mut Vec<i64>) {
        let mut stack = Vec::new();
        let mut current = Some(index);
        while current.is_some() || !stack.is_empty() {
            while let Some(index) = current {
                stack.push(index);
                current = self.0[index].left;
            }
            if let Some(index) = stack.pop() {
                out.push(self.0[index].value);
                current = self.0[index].right;
            }
        }
    }
}

#[cfg(test)]
impl Nodes {
    /// Builds a right chain of `keys` without running any fix-up. This is the shape ascending
    /// inserts produce. Returns the top of the chain.
    pub(crate) fn right_chain(&mut self, keys: impl IntoIterator<Item = i64>) -> Option<Index> {
        let mut chain: Vec<Index> = Vec::new();
        for key in keys {
            let parent = chain.last().copied();
            let index = self.0.insert(Node::leaf(key, parent));
            if let Some(parent) = parent {
                self.0[parent].right = Some(index);
            }
            chain.push(index);
        }
        for &index in chain.iter().rev() {
            self.update_height(index);
        }
        chain.first().copied()
    }
}

/// A borrowed view of one node in a [`Tree`], as returned by [`Tree::search`] and
/// [`Tree::root`].
///
/// [`Tree`]: crate::Tree
/// [`Tree::search`]: crate::Tree::search
/// [`Tree::root`]: crate::Tree::root
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    pub(crate) nodes: &'a Nodes,
    pub(crate) index: Index,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(nodes: &'a Nodes, index: Index) -> Self {
        Self { nodes, index }
    }

    fn node(&self) -> &'a Node {
        self.nodes.get(self.index)
    }

    /// The key stored in this node.
    pub fn value(&self) -> i64 {
        self.node().value
    }

    /// The cached height of the subtree rooted at this node. A leaf has height 1.
    pub fn height(&self) -> usize {
        self.node().height
    }

    /// The root of this node's left subtree.
    pub fn left(&self) -> Option<NodeRef<'a>> {
        self.node().left.map(|index| Self::new(self.nodes, index))
    }

    /// The root of this node's right subtree.
    pub fn right(&self) -> Option<NodeRef<'a>> {
        self.node().right.map(|index| Self::new(self.nodes, index))
    }

    /// The node this one hangs from. `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|index| Self::new(self.nodes, index))
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.nodes, other.nodes) && self.index == other.index
    }
}

// Only one level deep. The `Display` rendering shows the whole subtree.
impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value())
            .field("height", &self.height())
            .field("left", &self.left().map(|n| n.value()))
            .field("right", &self.right().map(|n| n.value()))
            .finish()
    }
}
