//! Pending positions awaiting their next code.
//!
//! The traversal policy is entirely a question of which pending position
//! the next code is paired with: the newest one (a stack) or the oldest
//! one (a queue).

use std::collections::VecDeque;
use std::fmt;

use serde::Deserialize;

use crate::types::NodeId;

/// Order in which pending positions receive codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Resolve a child's whole subtree before visiting its next sibling.
    DepthFirst,
    /// Pair each code with the oldest position not yet branched, growing
    /// one generation at a time.
    #[default]
    BreadthFirst,
}

impl Policy {
    pub const ALL: [Policy; 2] = [Policy::DepthFirst, Policy::BreadthFirst];

    pub fn label(self) -> &'static str {
        match self {
            Policy::DepthFirst => "depth-first",
            Policy::BreadthFirst => "breadth-first",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub enum Frontier {
    Stack(Vec<NodeId>),
    Queue(VecDeque<NodeId>),
}

impl Frontier {
    /// A frontier for `policy` holding only `start`.
    pub fn new(policy: Policy, start: NodeId) -> Self {
        match policy {
            Policy::DepthFirst => Frontier::Stack(vec![start]),
            Policy::BreadthFirst => Frontier::Queue(VecDeque::from([start])),
        }
    }

    /// Takes the position that the next code applies to.
    #[inline]
    pub fn pop(&mut self) -> Option<NodeId> {
        match self {
            Frontier::Stack(stack) => stack.pop(),
            Frontier::Queue(queue) => queue.pop_front(),
        }
    }

    /// Adds freshly created children, given in creation order.
    ///
    /// On a stack they are pushed in reverse so the first child is popped
    /// first.
    pub fn extend(&mut self, children: &[NodeId]) {
        match self {
            Frontier::Stack(stack) => stack.extend(children.iter().rev()),
            Frontier::Queue(queue) => queue.extend(children),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Frontier::Stack(stack) => stack.len(),
            Frontier::Queue(queue) => queue.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_pops_first_child_first_then_its_descendants() {
        let mut f = Frontier::new(Policy::DepthFirst, 0);
        assert_eq!(f.pop(), Some(0));

        f.extend(&[1, 2]);
        assert_eq!(f.pop(), Some(1));

        f.extend(&[3, 4]);
        assert_eq!(f.pop(), Some(3));
        assert_eq!(f.pop(), Some(4));
        assert_eq!(f.pop(), Some(2));
        assert_eq!(f.pop(), None);
    }

    #[test]
    fn queue_pops_oldest_first() {
        let mut f = Frontier::new(Policy::BreadthFirst, 0);
        assert_eq!(f.pop(), Some(0));

        f.extend(&[1, 2]);
        assert_eq!(f.pop(), Some(1));

        f.extend(&[3, 4]);
        assert_eq!(f.pop(), Some(2));
        assert_eq!(f.pop(), Some(3));
        assert_eq!(f.pop(), Some(4));
        assert!(f.is_empty());
    }

    #[test]
    fn policy_labels() {
        assert_eq!(Policy::DepthFirst.to_string(), "depth-first");
        assert_eq!(Policy::BreadthFirst.to_string(), "breadth-first");
        assert_eq!(Policy::default(), Policy::BreadthFirst);
    }
}
