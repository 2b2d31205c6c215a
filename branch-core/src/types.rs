/// Identifier for a node in a [`crate::tree::Tree`].
///
/// This is an index into `Tree::nodes`, and is only meaningful within
/// the lifetime of a given `Tree` instance.
pub type NodeId = usize;

/// A single instruction read from a code sequence.
///
/// What a code does is decided by the [`crate::rules::RuleTable`] in use;
/// `0` never branches.
pub type Code = u32;

/// The code that always terminates the position it is applied to.
pub const TERMINAL: Code = 0;
