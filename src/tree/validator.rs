//! Forest validation
//!
//! Structural checks look at each tree on its own. Feature checks compare
//! decision features against a schema. Both accumulate every defect in
//! forest order, depth-first, left before right. Every public check logs
//! one `TREES_VALIDATED` event naming the check it ran.

use super::forest::{Forest, Tree};
use super::node::Node;
use crate::observability::{log_report, Event};
use crate::schema::DataSchema;
use crate::validation::{IssueCode, ValidationError, ValidationResult};

/// Stateless forest validator
pub struct TreeValidator;

impl TreeValidator {
    /// Checks that every tree has a root and every node is complete.
    pub fn validate_structure(forest: &Forest) -> ValidationResult {
        let result = structure(forest);
        log_validated(forest, &result, "structure");
        result
    }

    /// Checks that every decision feature is declared in `schema`.
    pub fn validate_features(forest: &Forest, schema: &DataSchema) -> ValidationResult {
        let result = features(forest, schema);
        log_validated(forest, &result, "features");
        result
    }

    /// Structure, then features when a schema is given, merged with a summary.
    pub fn validate(forest: &Forest, schema: Option<&DataSchema>) -> ValidationResult {
        let mut result = structure(forest);
        if let Some(schema) = schema {
            result.merge(features(forest, schema));
        }
        result.summarize("Forest");
        log_validated(forest, &result, "all");
        result
    }
}

fn log_validated(forest: &Forest, result: &ValidationResult, check: &str) {
    let trees = forest.len().to_string();
    log_report(
        Event::TreesValidated,
        result,
        &[("check", check), ("trees", trees.as_str())],
    );
}

fn structure(forest: &Forest) -> ValidationResult {
    let mut result = ValidationResult::new();
    for tree in forest.iter() {
        check_tree(tree, &mut result);
    }
    result
}

fn features(forest: &Forest, schema: &DataSchema) -> ValidationResult {
    let mut result = ValidationResult::new();
    for tree in forest.iter() {
        for (_, node) in tree.walk() {
            let Some(feature) = node.feature() else {
                continue;
            };
            if feature.is_empty() || schema.is_mapped(feature) {
                continue;
            }
            result.push_error(
                ValidationError::new(
                    IssueCode::TreeUnknownFeature,
                    format!("Feature '{}' in tree {} not found in schema", feature, tree.id),
                )
                .with_field(feature),
            );
        }
    }
    result
}

fn check_tree(tree: &Tree, result: &mut ValidationResult) {
    let Some(root) = tree.root else {
        result.push_error(ValidationError::new(
            IssueCode::TreeMissingRoot,
            format!("Tree {} has no root node", tree.id),
        ));
        return;
    };

    let mut visited = vec![false; tree.nodes.len()];
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        let Some(node) = tree.node(id) else {
            result.push_error(ValidationError::new(
                IssueCode::TreeDanglingChild,
                format!("Tree {} references missing node {}", tree.id, id),
            ));
            continue;
        };
        if visited[id.0] {
            result.push_error(ValidationError::new(
                IssueCode::TreeSharedNode,
                format!("Node {} in tree {} is reached more than once", id, tree.id),
            ));
            continue;
        }
        visited[id.0] = true;

        check_node(tree, node, result);

        let (left, right) = node.children();
        stack.extend(right);
        stack.extend(left);
    }
}

fn check_node(tree: &Tree, node: &Node, result: &mut ValidationResult) {
    match node {
        Node::Decision {
            feature,
            operator,
            threshold,
            ..
        } => {
            if feature.is_empty() {
                result.push_error(missing(tree, "feature", IssueCode::TreeMissingFeature));
            }
            if operator.is_none() {
                result.push_error(missing(tree, "operator", IssueCode::TreeMissingOperator));
            }
            if !threshold.is_some_and(f64::is_finite) {
                result.push_error(missing(tree, "threshold", IssueCode::TreeMissingThreshold));
            }
        }
        Node::Leaf { value } => {
            if value.map_or(true, f64::is_nan) {
                result.push_error(ValidationError::new(
                    IssueCode::TreeMissingLeafValue,
                    format!("Leaf node in tree {} missing value", tree.id),
                ));
            }
        }
    }
}

fn missing(tree: &Tree, what: &str, code: IssueCode) -> ValidationError {
    ValidationError::new(
        code,
        format!("Decision node in tree {} missing {}", tree.id, what),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::DataType;
    use crate::tree::{NodeId, Operator};
    use std::collections::BTreeMap;

    fn stump(id: &str, feature: &str) -> Tree {
        let mut tree = Tree::new(id);
        let root = tree.set_root(Node::decision(feature, Operator::Le, 1.5));
        tree.add_child(root, Node::leaf(0.2)).unwrap();
        tree.add_child(root, Node::leaf(-0.1)).unwrap();
        tree
    }

    fn schema() -> DataSchema {
        let mut types = BTreeMap::new();
        types.insert("x".to_string(), DataType::Float64);
        types.insert("claim_id".to_string(), DataType::Object);
        DataSchema::new("claim_id", vec!["claim_id".to_string()], types)
    }

    fn forest(trees: Vec<Tree>) -> Forest {
        Forest { trees }
    }

    #[test]
    fn test_complete_forest_is_valid() {
        let forest = forest(vec![stump("0", "x"), stump("1", "x")]);
        let result = TreeValidator::validate_structure(&forest);
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_missing_root() {
        let forest = forest(vec![Tree::new("4")]);
        let result = TreeValidator::validate_structure(&forest);
        assert!(!result.is_valid());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].message, "Tree 4 has no root node");
        assert!(result.has_error(IssueCode::TreeMissingRoot));
    }

    #[test]
    fn test_incomplete_decision_reports_each_gap() {
        let mut tree = Tree::new("2");
        tree.set_root(Node::Decision {
            feature: String::new(),
            operator: None,
            threshold: Some(f64::INFINITY),
            left: None,
            right: None,
        });
        let result = TreeValidator::validate_structure(&forest(vec![tree]));

        let codes: Vec<_> = result.errors().iter().filter_map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![
                IssueCode::TreeMissingFeature,
                IssueCode::TreeMissingOperator,
                IssueCode::TreeMissingThreshold,
            ]
        );
        assert_eq!(
            result.errors()[0].message,
            "Decision node in tree 2 missing feature"
        );
    }

    #[test]
    fn test_absent_children_are_not_errors() {
        let mut tree = Tree::new("0");
        tree.set_root(Node::decision("x", Operator::Gt, 0.0));
        let result = TreeValidator::validate_structure(&forest(vec![tree]));
        assert!(result.is_valid());
    }

    #[test]
    fn test_leaf_without_value() {
        let mut tree = Tree::new("0");
        let root = tree.set_root(Node::decision("x", Operator::Le, 1.0));
        tree.add_child(root, Node::Leaf { value: None }).unwrap();
        tree.add_child(root, Node::Leaf { value: Some(f64::NAN) }).unwrap();

        let result = TreeValidator::validate_structure(&forest(vec![tree]));
        assert_eq!(result.errors().len(), 2);
        assert!(result
            .errors()
            .iter()
            .all(|e| e.message == "Leaf node in tree 0 missing value"));
    }

    #[test]
    fn test_errors_follow_forest_order() {
        let forest = forest(vec![Tree::new("0"), stump("1", "x"), Tree::new("2")]);
        let result = TreeValidator::validate_structure(&forest);
        let messages: Vec<_> = result.errors().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["Tree 0 has no root node", "Tree 2 has no root node"]
        );
    }

    #[test]
    fn test_dangling_and_shared_nodes() {
        let mut tree = Tree::new("0");
        tree.nodes.push(Node::Decision {
            feature: "x".into(),
            operator: Some(Operator::Le),
            threshold: Some(1.0),
            left: Some(NodeId(1)),
            right: Some(NodeId(1)),
        });
        tree.nodes.push(Node::Decision {
            feature: "y".into(),
            operator: Some(Operator::Gt),
            threshold: Some(2.0),
            left: Some(NodeId(9)),
            right: None,
        });
        tree.root = Some(NodeId(0));

        let result = TreeValidator::validate_structure(&forest(vec![tree]));
        let codes: Vec<_> = result.errors().iter().filter_map(|e| e.code).collect();
        assert_eq!(
            codes,
            vec![IssueCode::TreeDanglingChild, IssueCode::TreeSharedNode]
        );
    }

    #[test]
    fn test_unknown_features() {
        let mut deep = Tree::new("1");
        let root = deep.set_root(Node::decision("x", Operator::Le, 1.5));
        let (child, _) = deep
            .add_child(root, Node::decision("age", Operator::Gt, 40.0))
            .unwrap();
        deep.add_child(child, Node::leaf(1.0)).unwrap();

        let forest = forest(vec![stump("0", "zip"), deep]);
        let result = TreeValidator::validate_features(&forest, &schema());

        assert_eq!(result.errors().len(), 2);
        assert_eq!(
            result.errors()[0].message,
            "Feature 'zip' in tree 0 not found in schema"
        );
        assert_eq!(result.errors()[0].field.as_deref(), Some("zip"));
        assert_eq!(result.errors()[1].field.as_deref(), Some("age"));
    }

    #[test]
    fn test_feature_check_tolerates_incomplete_nodes() {
        let mut tree = Tree::new("0");
        tree.set_root(Node::Decision {
            feature: "x".into(),
            operator: None,
            threshold: None,
            left: None,
            right: None,
        });
        let result = TreeValidator::validate_features(&forest(vec![tree]), &schema());
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_merges_and_summarizes() {
        let forest = forest(vec![Tree::new("0"), stump("1", "zip")]);

        let structural = TreeValidator::validate(&forest, None);
        assert_eq!(structural.errors().len(), 1);

        let full = TreeValidator::validate(&forest, Some(&schema()));
        assert_eq!(full.errors().len(), 2);
        assert!(full.has_error(IssueCode::TreeUnknownFeature));
        assert_eq!(
            full.summary(),
            Some("Forest is invalid: 2 error(s), 0 warning(s)")
        );
    }
}
