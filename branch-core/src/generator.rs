//! Turns a code sequence into a branching structure.
//!
//! Both traversal policies run the same loop:
//! 1. Consume the next code from the owned [`CodeSeq`].
//! 2. Pop the position it applies to from the [`Frontier`] (a stack for
//!    [`Policy::DepthFirst`], a queue for [`Policy::BreadthFirst`]).
//! 3. Look the code up in the [`RuleTable`]; each offset of its rule adds
//!    one child node, and the children go back into the frontier.
//!
//! The loop ends only when the code sequence is exhausted, so every code
//! is consumed exactly once even after the frontier runs dry.

use glam::Vec3;
use tracing::{debug, instrument, trace};

use crate::{
    codes::CodeSeq,
    config::Config,
    frontier::Frontier,
    rules::RuleTable,
    segment::Segment,
    tree::Tree,
    types::Code,
};

pub use crate::frontier::Policy;

#[derive(Clone, Debug)]
pub struct Generator {
    rules: RuleTable,
    step_len: f32,
}

/// The result of one [`Generator::run`].
#[derive(Clone, Debug)]
pub struct Generation {
    /// Every generated position, in creation (traversal) order.
    pub tree: Tree,
    pub policy: Policy,
    /// Codes taken from the sequence; always the input length.
    pub consumed: usize,
    /// Codes consumed while no position was pending.
    pub idle: usize,
}

impl Generation {
    pub fn segments(&self) -> Vec<Segment> {
        self.tree.segments()
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new(RuleTable::default(), 1.0)
    }
}

impl Generator {
    pub fn new(rules: RuleTable, step_len: f32) -> Self {
        Self { rules, step_len }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.rules.clone(), cfg.step_len)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Grows a branching structure from `origin`.
    ///
    /// ### Parameters
    /// - `origin` - Position of the root node.
    /// - `codes` - Working copy of the code sequence. The generator owns it
    ///   and drains it completely.
    /// - `policy` - Which pending position each code is paired with.
    ///
    /// ### Returns
    /// A [`Generation`] holding the tree and consumption counts. Codes with
    /// no rule (and `0` always) end their branch without output.
    #[instrument(level = "debug", skip(self, codes), fields(codes = codes.len()))]
    pub fn run(&self, origin: Vec3, mut codes: CodeSeq, policy: Policy) -> Generation {
        let mut tree = Tree::new(origin);
        let mut frontier = Frontier::new(policy, Tree::ROOT);
        let mut born = Vec::with_capacity(4);
        let mut consumed = 0;
        let mut idle = 0;

        while let Some(code) = codes.next_code() {
            consumed += 1;

            let Some(id) = frontier.pop() else {
                idle += 1;
                trace!(code, "no pending position");
                continue;
            };
            tree.nodes[id].code = Some(code);

            let Some(rule) = self.rules.get(code) else {
                trace!(code, node = id, "terminal");
                continue;
            };

            let base = tree.nodes[id].pos;
            born.clear();
            for &offset in rule.offsets() {
                born.push(tree.add_child(id, base + offset * self.step_len));
            }
            frontier.extend(&born);
            trace!(code, node = id, children = born.len(), "branched");
        }

        debug!(
            segments = tree.segment_count(),
            consumed, idle, "generation finished"
        );

        Generation {
            tree,
            policy,
            consumed,
            idle,
        }
    }
}

/// Segments grown from `origin` with the default rules and a unit step.
pub fn generate(origin: Vec3, codes: impl IntoIterator<Item = Code>, policy: Policy) -> Vec<Segment> {
    Generator::default()
        .run(origin, CodeSeq::new(codes), policy)
        .segments()
}

pub fn depth_first(origin: Vec3, codes: impl IntoIterator<Item = Code>) -> Vec<Segment> {
    generate(origin, codes, Policy::DepthFirst)
}

pub fn breadth_first(origin: Vec3, codes: impl IntoIterator<Item = Code>) -> Vec<Segment> {
    generate(origin, codes, Policy::BreadthFirst)
}
