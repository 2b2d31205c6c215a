//! Code-driven branching structure generator.
//!
//! Main components:
//! - [`generator`] — the generation loop and its two traversal policies.
//! - [`codes`] — the owned code sequence consumed by a generation.
//! - [`rules`] — the table mapping codes to child offsets.
//! - [`frontier`] — pending positions, as a stack or a queue.
//! - [`tree`] — generated positions and the segments between them.
//! - [`segment`] — line segments and order-independent comparison.
//! - [`config`] — generator configuration and TOML loading.
//! - [`error`] — errors raised while parsing codes or loading config.
//! - [`types`] — shared type aliases and IDs.

pub mod codes;
pub mod config;
pub mod error;
pub mod frontier;
pub mod generator;
pub mod rules;
pub mod segment;
pub mod tree;
pub mod types;

pub use codes::CodeSeq;
pub use config::Config;
pub use error::{BranchError, Result};
pub use generator::{Generation, Generator, Policy, breadth_first, depth_first, generate};
pub use rules::{BranchRule, RuleTable};
pub use segment::Segment;
pub use tree::Tree;
pub use types::{Code, NodeId};
