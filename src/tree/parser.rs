//! Tree dump parser
//!
//! Input format (line oriented, indentation significant):
//!
//! ```text
//! Tree #<n> root                 starts a new tree
//! <feature> <op> <threshold>     decision node, op in <=, <, >=, >, =, ==, !=
//! Val: <number>                  leaf node
//! ```
//!
//! Depth is the number of leading whitespace characters. A node is the
//! child of the nearest preceding decision with a strictly smaller depth;
//! the first child attached to a decision is its left child, the second its
//! right child.
//!
//! A header line may itself carry the root (`x <= 0.5 (Tree #0 root)`, or
//! `Val: 0.3 (Tree #1 root)` for a single-leaf tree). A bare header leaves
//! the root pending, and the first node of the section becomes the root.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

use super::errors::{TreeParseError, TreeResult};
use super::forest::{Forest, Tree};
use super::node::{Node, NodeId, Operator};
use crate::observability::{log_event_with_fields, Event};
use crate::validation::{IssueCode, ValidationWarning};

/// Feature name used when a decision line cannot be decoded
pub const FALLBACK_FEATURE: &str = "unknown";

/// What to do with lines that are skipped or decoded with defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinePolicy {
    /// Skip and default silently
    Lenient,
    /// Emit one warning per skipped or defaulted line
    #[default]
    Warn,
}

/// What to do when a decision already has two children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Abort the parse with `TreeParseError::ChildOverflow`
    #[default]
    Reject,
    /// Drop the extra node
    Ignore,
}

/// Parser configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub line_policy: LinePolicy,
    pub overflow_policy: OverflowPolicy,
}

impl ParseOptions {
    /// Silent skipping, third children dropped
    pub fn lenient() -> Self {
        Self {
            line_policy: LinePolicy::Lenient,
            overflow_policy: OverflowPolicy::Ignore,
        }
    }
}

/// Parser output: the forest plus any line-level warnings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedForest {
    pub forest: Forest,
    pub warnings: Vec<ValidationWarning>,
}

struct Patterns {
    tree_index: Regex,
    header_marker: Regex,
    leaf_value: Regex,
    decision_loose: Regex,
    decision: Regex,
}

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        tree_index: Regex::new(r"Tree #(\d+)").expect("tree index pattern"),
        header_marker: Regex::new(r"\(?\s*Tree #\d*\s*root\s*\)?").expect("header pattern"),
        leaf_value: Regex::new(&format!(r"^Val:\s*({})", NUMBER)).expect("leaf pattern"),
        decision_loose: Regex::new(r"\w+\s*[<>=!]+\s*[-+]?\d*\.?\d+").expect("loose pattern"),
        decision: Regex::new(&format!(r"([\w.]+)\s*(<=|>=|==|!=|<|>|=)\s*({})", NUMBER))
            .expect("decision pattern"),
    })
}

/// Classification of one non-empty line
enum Line {
    Header,
    Leaf,
    Decision,
    Separator,
    Unrecognized,
}

fn classify(trimmed: &str) -> Line {
    if trimmed.contains("Tree #") && trimmed.contains("root") {
        Line::Header
    } else if trimmed.starts_with("Val:") {
        Line::Leaf
    } else if patterns().decision_loose.is_match(trimmed) {
        Line::Decision
    } else if is_separator(trimmed) {
        Line::Separator
    } else {
        Line::Unrecognized
    }
}

/// Rules like `-----` and the `+` between FIGS trees
fn is_separator(trimmed: &str) -> bool {
    trimmed.chars().all(|c| matches!(c, '-' | '=' | '+' | '*' | '_' | '~'))
}

/// Parse state of the tree currently being built
struct Section {
    tree: usize,
    /// (decision, depth) pairs, depths strictly increasing
    stack: Vec<(NodeId, usize)>,
}

/// Indentation-aware tree dump parser.
pub struct TreeParser {
    options: ParseOptions,
}

impl TreeParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Parses a full dump into a forest.
    ///
    /// # Errors
    ///
    /// Only `ChildOverflow`, and only under `OverflowPolicy::Reject`.
    pub fn parse(&self, text: &str) -> TreeResult<ParsedForest> {
        let mut run = Run {
            options: self.options,
            forest: Forest::new(),
            warnings: Vec::new(),
            section: None,
        };

        for (index, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let line_no = index + 1;
            let depth = raw.chars().take_while(|c| c.is_whitespace()).count();

            let outcome = match classify(trimmed) {
                Line::Header => {
                    run.start_tree(trimmed, depth, line_no);
                    Ok(())
                }
                Line::Leaf => {
                    let node = run.leaf_node(trimmed, line_no);
                    run.place(node, depth, line_no)
                }
                Line::Decision => {
                    let node = run.decision_node(trimmed, line_no);
                    run.place(node, depth, line_no)
                }
                Line::Separator => Ok(()),
                Line::Unrecognized => {
                    run.warn(
                        IssueCode::TreeSkippedLine,
                        format!("Skipped unrecognized line '{}'", trimmed),
                        line_no,
                    );
                    Ok(())
                }
            };

            if let Err(e) = outcome {
                let line = line_no.to_string();
                log_event_with_fields(
                    Event::TreesRejected,
                    &[("code", e.code()), ("line", line.as_str())],
                );
                return Err(e);
            }
        }

        let trees = run.forest.len().to_string();
        let warnings = run.warnings.len().to_string();
        log_event_with_fields(
            Event::TreesParsed,
            &[("trees", trees.as_str()), ("warnings", warnings.as_str())],
        );

        Ok(ParsedForest {
            forest: run.forest,
            warnings: run.warnings,
        })
    }

    /// Reads a dump from disk and parses it.
    pub async fn parse_file(&self, path: &Path) -> TreeResult<ParsedForest> {
        let bytes = tokio::fs::read(path).await.map_err(|e| TreeParseError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let text = String::from_utf8(bytes).map_err(|_| TreeParseError::Encoding {
            path: path.display().to_string(),
        })?;
        self.parse(&text)
    }
}

impl Default for TreeParser {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

/// Mutable state of a single `parse` call
struct Run {
    options: ParseOptions,
    forest: Forest,
    warnings: Vec<ValidationWarning>,
    section: Option<Section>,
}

impl Run {
    fn warn(&mut self, code: IssueCode, message: String, line: usize) {
        if self.options.line_policy == LinePolicy::Warn {
            self.warnings
                .push(ValidationWarning::new(code, message).with_line(line));
        }
    }

    fn start_tree(&mut self, trimmed: &str, depth: usize, line_no: usize) {
        let id = patterns()
            .tree_index
            .captures(trimmed)
            .map(|c| c[1].to_string())
            .unwrap_or_else(|| self.forest.len().to_string());

        let mut tree = Tree::new(id);
        let mut stack = Vec::new();

        if trimmed.starts_with("Val:") {
            // A leaf root has no children, so nothing goes on the stack
            let node = self.leaf_node(trimmed, line_no);
            tree.set_root(node);
        } else if patterns().decision_loose.is_match(trimmed) {
            let node = self.decision_node(trimmed, line_no);
            let root = tree.set_root(node);
            stack.push((root, depth));
        } else {
            let rest = patterns().header_marker.replace(trimmed, "");
            let rest = rest.trim();
            if !rest.is_empty() && !is_separator(rest) {
                self.warn(
                    IssueCode::TreeSkippedLine,
                    format!("Ignored '{}' on header of tree {}", rest, tree.id),
                    line_no,
                );
            }
        }

        self.forest.push(tree);
        self.section = Some(Section {
            tree: self.forest.len() - 1,
            stack,
        });
    }

    fn leaf_node(&mut self, trimmed: &str, line_no: usize) -> Node {
        let value = patterns()
            .leaf_value
            .captures(trimmed)
            .and_then(|c| c[1].parse::<f64>().ok())
            .filter(|v| v.is_finite());

        match value {
            Some(v) => Node::leaf(v),
            None => {
                self.warn(
                    IssueCode::TreeDefaultedValue,
                    format!("Leaf value in '{}' is not a number, using 0", trimmed),
                    line_no,
                );
                Node::leaf(0.0)
            }
        }
    }

    fn decision_node(&mut self, trimmed: &str, line_no: usize) -> Node {
        let parsed = patterns().decision.captures(trimmed).and_then(|c| {
            let operator = Operator::from_token(&c[2])?;
            let threshold = c[3].parse::<f64>().ok().filter(|t| t.is_finite())?;
            Some(Node::decision(&c[1], operator, threshold))
        });

        match parsed {
            Some(node) => node,
            None => {
                self.warn(
                    IssueCode::TreeMalformedLine,
                    format!(
                        "Could not decode decision '{}', using '{} <= 0'",
                        trimmed, FALLBACK_FEATURE
                    ),
                    line_no,
                );
                Node::decision(FALLBACK_FEATURE, Operator::Le, 0.0)
            }
        }
    }

    /// Attaches a node to the current tree at the given depth.
    fn place(&mut self, node: Node, depth: usize, line_no: usize) -> TreeResult<()> {
        let Some(section) = self.section.as_mut() else {
            self.warn(
                IssueCode::TreeOrphanNode,
                "Node appears before any tree header".to_string(),
                line_no,
            );
            return Ok(());
        };
        let tree = &mut self.forest.trees[section.tree];
        let is_decision = !node.is_leaf();

        if tree.root.is_none() {
            let id = tree.set_root(node);
            if is_decision {
                section.stack.push((id, depth));
            }
            return Ok(());
        }

        while section.stack.last().is_some_and(|&(_, d)| d >= depth) {
            section.stack.pop();
        }

        let Some(&(parent, _)) = section.stack.last() else {
            let message = format!("Node has no shallower parent in tree {}", tree.id);
            self.warn(IssueCode::TreeOrphanNode, message, line_no);
            return Ok(());
        };

        match tree.add_child(parent, node) {
            Some((id, _)) => {
                if is_decision {
                    section.stack.push((id, depth));
                }
                Ok(())
            }
            None => match self.options.overflow_policy {
                OverflowPolicy::Reject => Err(TreeParseError::ChildOverflow {
                    tree: tree.id.clone(),
                    line: line_no,
                }),
                OverflowPolicy::Ignore => {
                    let message =
                        format!("Dropped third child of a decision in tree {}", tree.id);
                    self.warn(IssueCode::TreeChildOverflow, message, line_no);
                    Ok(())
                }
            },
        }
    }
}
