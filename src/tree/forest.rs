//! Trees and forests
//!
//! A `Tree` owns its nodes in an arena (`nodes`), addressed by `NodeId`.
//! A `Forest` is the ordered list of trees from one dump, in document order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::node::{Node, NodeId, Side};

/// A single decision tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    /// Tree identifier (the number after `Tree #`)
    pub id: String,
    /// Display name
    pub name: String,
    /// Root node, absent until the first node of the section is seen
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<NodeId>,
    /// Node arena
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Contribution weight used by scoring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Tree {
    /// Create an empty tree named `Tree #<id>`
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: format!("Tree #{}", id),
            id,
            root: None,
            nodes: Vec::new(),
            weight: None,
        }
    }

    /// Adds a node to the arena without linking it
    pub fn add_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Adds a node and makes it the root
    pub fn set_root(&mut self, node: Node) -> NodeId {
        let id = self.add_node(node);
        self.root = Some(id);
        id
    }

    /// Adds `node` as the next free child of `parent`.
    ///
    /// Returns `None` and leaves the arena untouched when `parent` is missing,
    /// a leaf, or already has two children.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Option<(NodeId, Side)> {
        if self.nodes.get(parent.0)?.is_full() {
            return None;
        }
        let child = self.add_node(node);
        let side = self.nodes[parent.0].attach(child)?;
        Some((child, side))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn root_node(&self) -> Option<&Node> {
        self.root.and_then(|id| self.node(id))
    }

    /// Left child of a decision node
    pub fn left(&self, id: NodeId) -> Option<&Node> {
        self.node(id)?.children().0.and_then(|c| self.node(c))
    }

    /// Right child of a decision node
    pub fn right(&self, id: NodeId) -> Option<&Node> {
        self.node(id)?.children().1.and_then(|c| self.node(c))
    }

    /// Depth-first walk from the root, left before right.
    ///
    /// Each node is yielded at most once. Out-of-range child indices are
    /// skipped, so the walk terminates even on malformed arenas.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.root.into_iter().collect(),
            visited: vec![false; self.nodes.len()],
        }
    }

    /// Number of leaves reachable from the root
    pub fn leaf_count(&self) -> usize {
        self.walk().filter(|(_, node)| node.is_leaf()).count()
    }
}

/// Iterator returned by [`Tree::walk`]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
    visited: Vec<bool>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.stack.pop() {
            let Some(node) = tree.nodes.get(id.0) else {
                continue;
            };
            if self.visited[id.0] {
                continue;
            }
            self.visited[id.0] = true;

            let (left, right) = node.children();
            self.stack.extend(right);
            self.stack.extend(left);
            return Some((id, node));
        }
        None
    }
}

/// Ordered collection of trees from one dump
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Forest {
    pub trees: Vec<Tree>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Finds a tree by identifier
    pub fn get(&self, id: &str) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id == id)
    }

    /// All feature names referenced by decision nodes, sorted
    pub fn features(&self) -> BTreeSet<&str> {
        self.trees
            .iter()
            .flat_map(|t| t.walk())
            .filter_map(|(_, node)| node.feature())
            .filter(|f| !f.is_empty())
            .collect()
    }
}
