//! Decision tree forests
//!
//! A FIGS model is dumped as indented text, one section per tree. This
//! module parses that dump into an arena-backed `Forest` and validates the
//! result, structurally and against a data schema.
//!
//! # Design Principles
//!
//! - Nodes live in a per-tree arena; edges are `NodeId` indices
//! - Parsing is total except for child overflow under `OverflowPolicy::Reject`
//! - Traversal uses an explicit stack, never recursion
//! - Validators report every defect, in forest order

mod errors;
mod forest;
mod node;
mod parser;
mod validator;

pub use errors::{TreeParseError, TreeResult};
pub use forest::{Forest, Tree, Walk};
pub use node::{Node, NodeId, Operator, Side};
pub use parser::{
    LinePolicy, OverflowPolicy, ParseOptions, ParsedForest, TreeParser, FALLBACK_FEATURE,
};
pub use validator::TreeValidator;
