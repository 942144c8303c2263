//! Parenthesized rendering: `(value L:<left> R:<right>)`, leaving out the segment for a missing
//! child. An empty tree renders as [`EMPTY`].

use std::fmt;

use generational_arena::Index;

use crate::node::NodeRef;
use crate::Tree;

/// What an empty tree renders as.
pub const EMPTY: &str = "empty";

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root() {
            Some(root) => fmt::Display::fmt(&root, f),
            None => f.write_str(EMPTY),
        }
    }
}

/// One pending piece of output while rendering.
enum Step {
    Node(Index),
    Text(&'static str),
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pushed in reverse so the left subtree is written before the right one.
        let mut stack = vec![Step::Node(self.index)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Node(index) => {
                    let node = self.nodes.get(index);
                    write!(f, "({}", node.value)?;
                    stack.push(Step::Text(")"));
                    if let Some(right) = node.right {
                        stack.push(Step::Node(right));
                        stack.push(Step::Text(" R:"));
                    }
                    if let Some(left) = node.left {
                        stack.push(Step::Node(left));
                        stack.push(Step::Text(" L:"));
                    }
                }
            }
        }
        Ok(())
    }
}
