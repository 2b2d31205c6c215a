use crate::frontier::{Frontier, Policy};
use crate::segment::Segment;
use crate::types::{Code, NodeId, TERMINAL};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub pos: Vec3,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Branch steps from the root.
    pub generation: u32,
    /// Code paired with this node, or `None` if the sequence ran out first.
    pub code: Option<Code>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new_root(pos: Vec3) -> Self {
        Self {
            pos,
            parent: None,
            children: Vec::with_capacity(2),
            generation: 0,
            code: None,
        }
    }

    pub fn new_child(pos: Vec3, parent: NodeId, generation: u32) -> Self {
        Self {
            pos,
            parent: Some(parent),
            children: Vec::with_capacity(2),
            generation,
            code: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl Tree {
    pub const ROOT: NodeId = 0;

    pub fn new(root_pos: Vec3) -> Self {
        Self {
            nodes: vec![TreeNode::new_root(root_pos)],
        }
    }

    pub fn add_child(&mut self, parent: NodeId, pos: Vec3) -> NodeId {
        let id: usize = self.nodes.len();
        let generation = self.nodes[parent].generation + 1;
        self.nodes.push(TreeNode::new_child(pos, parent, generation));
        self.nodes[parent].children.push(id);
        id
    }

    /// One segment per non-root node, in node creation order.
    pub fn segments(&self) -> Vec<Segment> {
        self.nodes
            .iter()
            .filter_map(|n| n.parent.map(|p| Segment::new(self.nodes[p].pos, n.pos)))
            .collect()
    }

    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn leaves(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.is_leaf().then_some(id))
    }

    /// Highest generation in the tree; `0` for a bare root.
    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.generation).max().unwrap_or(0)
    }

    pub fn find_nearest_node(&self, pos: Vec3) -> Option<(NodeId, f32)> {
        self.find_nearest_by(|p| (p - pos).length_squared())
    }

    /// Node minimizing `dist2(node.pos)`, with that value.
    ///
    /// Lets callers measure in a projection instead of in 3-D.
    pub fn find_nearest_by(&self, dist2: impl Fn(Vec3) -> f32) -> Option<(NodeId, f32)> {
        let mut best = None;
        let mut best_d2 = f32::MAX;
        for (id, n) in self.nodes.iter().enumerate() {
            let d2 = dist2(n.pos);
            if d2 < best_d2 {
                best_d2 = d2;
                best = Some(id);
            }
        }
        best.map(|id| (id, best_d2))
    }

    /// Re-encodes a generated tree as a code sequence for `policy`.
    ///
    /// Replaying the result from the same origin, with the same rules and
    /// step length, yields the same segments (as a multiset). Nodes that
    /// never received a code encode as [`TERMINAL`]; trailing terminals are
    /// dropped.
    pub fn to_codes(&self, policy: Policy) -> Vec<Code> {
        let mut codes = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return codes;
        }

        let mut frontier = Frontier::new(policy, Self::ROOT);
        while let Some(id) = frontier.pop() {
            let node = &self.nodes[id];
            codes.push(node.code.unwrap_or(TERMINAL));
            frontier.extend(&node.children);
        }

        while codes.last() == Some(&TERMINAL) {
            codes.pop();
        }
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fork() -> Tree {
        let mut tree = Tree::new(Vec3::ZERO);
        let a = tree.add_child(Tree::ROOT, Vec3::Z);
        tree.nodes[Tree::ROOT].code = Some(1);
        tree.add_child(a, Vec3::new(0.0, 1.0, 2.0));
        tree.add_child(a, Vec3::new(0.0, -1.0, 2.0));
        tree.nodes[a].code = Some(2);
        tree
    }

    #[test]
    fn add_child_links_parent_and_generation() {
        let tree = fork();

        assert_eq!(tree.nodes.len(), 4);
        assert_eq!(tree.nodes[0].children, vec![1]);
        assert_eq!(tree.nodes[1].children, vec![2, 3]);
        assert_eq!(tree.nodes[3].parent, Some(1));
        assert_eq!(tree.nodes[3].generation, 2);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn segments_follow_creation_order() {
        let tree = fork();
        let segs = tree.segments();

        assert_eq!(tree.segment_count(), 3);
        assert_eq!(
            segs,
            vec![
                Segment::new(Vec3::ZERO, Vec3::Z),
                Segment::new(Vec3::Z, Vec3::new(0.0, 1.0, 2.0)),
                Segment::new(Vec3::Z, Vec3::new(0.0, -1.0, 2.0)),
            ]
        );
    }

    #[test]
    fn bare_root_has_no_segments() {
        let tree = Tree::new(Vec3::new(5.0, 5.0, 5.0));
        assert!(tree.segments().is_empty());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaves().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn leaves_are_childless_nodes() {
        assert_eq!(fork().leaves().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn find_nearest_node_picks_closest() {
        let tree = fork();
        let (id, d2) = tree.find_nearest_node(Vec3::new(0.0, -1.0, 2.5)).unwrap();
        assert_eq!(id, 3);
        assert_eq!(d2, 0.25);
    }

    #[test]
    fn find_nearest_by_uses_the_given_metric() {
        let tree = fork();
        // Ignoring z, node 3 at (0, -1) is an exact hit.
        let (id, d2) = tree
            .find_nearest_by(|p| (p.truncate() - glam::Vec2::new(0.0, -1.0)).length_squared())
            .unwrap();
        assert_eq!(id, 3);
        assert_eq!(d2, 0.0);
    }

    #[test]
    fn find_nearest_node_on_empty_tree_is_none() {
        let tree = Tree { nodes: Vec::new() };
        assert!(tree.find_nearest_node(Vec3::ZERO).is_none());
        assert!(tree.to_codes(Policy::DepthFirst).is_empty());
    }

    #[test]
    fn to_codes_drops_trailing_unreached_nodes() {
        let tree = fork();
        assert_eq!(tree.to_codes(Policy::DepthFirst), vec![1, 2]);
        assert_eq!(tree.to_codes(Policy::BreadthFirst), vec![1, 2]);
    }

    #[test]
    fn to_codes_orders_by_policy() {
        // root forks; only the second child carries a further code.
        let mut tree = Tree::new(Vec3::ZERO);
        tree.nodes[0].code = Some(2);
        let a = tree.add_child(0, Vec3::new(0.0, 1.0, 1.0));
        let b = tree.add_child(0, Vec3::new(0.0, -1.0, 1.0));
        tree.nodes[a].code = Some(0);
        tree.nodes[b].code = Some(1);
        let c = tree.add_child(b, Vec3::new(0.0, -1.0, 2.0));
        tree.nodes[c].code = Some(7);

        assert_eq!(tree.to_codes(Policy::DepthFirst), vec![2, 0, 1, 7]);
        assert_eq!(tree.to_codes(Policy::BreadthFirst), vec![2, 0, 1, 7]);

        tree.nodes[a].code = Some(1);
        tree.add_child(a, Vec3::new(0.0, 1.0, 2.0));
        assert_eq!(tree.to_codes(Policy::DepthFirst), vec![2, 1, 0, 1, 7]);
        assert_eq!(tree.to_codes(Policy::BreadthFirst), vec![2, 1, 1, 0, 7]);
    }
}
