//! Decision tree nodes
//!
//! A node is either a decision (feature, operator, threshold, two child
//! slots) or a leaf (terminal value). Children are indices into the owning
//! tree's node arena, so edges are plain data and trees serialize as-is.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Comparison operator of a decision node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl Operator {
    /// Returns the ASCII token used in tree dumps
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Le => "<=",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Gt => ">",
            Operator::Eq => "=",
            Operator::Ne => "!=",
        }
    }

    /// Parses an ASCII comparison token. `==` is accepted as `=`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<=" => Some(Operator::Le),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            ">" => Some(Operator::Gt),
            "=" | "==" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which child slot of a decision a node occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A tree node.
///
/// `operator`, `threshold` and leaf `value` are optional so that trees
/// assembled by hand or decoded from JSON can be incomplete; the structural
/// validator reports the gaps. The text parser always fills them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    Decision {
        feature: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        operator: Option<Operator>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        left: Option<NodeId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        right: Option<NodeId>,
    },
    Leaf {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
    },
}

impl Node {
    /// Create a decision node with no children
    pub fn decision(feature: impl Into<String>, operator: Operator, threshold: f64) -> Self {
        Node::Decision {
            feature: feature.into(),
            operator: Some(operator),
            threshold: Some(threshold),
            left: None,
            right: None,
        }
    }

    /// Create a leaf node
    pub fn leaf(value: f64) -> Self {
        Node::Leaf { value: Some(value) }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// Returns the feature name of a decision node
    pub fn feature(&self) -> Option<&str> {
        match self {
            Node::Decision { feature, .. } => Some(feature),
            Node::Leaf { .. } => None,
        }
    }

    /// Returns the (left, right) child slots; leaves have none
    pub fn children(&self) -> (Option<NodeId>, Option<NodeId>) {
        match self {
            Node::Decision { left, right, .. } => (*left, *right),
            Node::Leaf { .. } => (None, None),
        }
    }

    /// Places `child` in the first free slot, left before right.
    ///
    /// Returns `None` when the node is a leaf or both slots are taken.
    pub fn attach(&mut self, child: NodeId) -> Option<Side> {
        match self {
            Node::Decision { left, right, .. } => {
                if left.is_none() {
                    *left = Some(child);
                    Some(Side::Left)
                } else if right.is_none() {
                    *right = Some(child);
                    Some(Side::Right)
                } else {
                    None
                }
            }
            Node::Leaf { .. } => None,
        }
    }

    /// Whether both child slots are taken (always true for leaves)
    pub fn is_full(&self) -> bool {
        match self {
            Node::Decision { left, right, .. } => left.is_some() && right.is_some(),
            Node::Leaf { .. } => true,
        }
    }
}
