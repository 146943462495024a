//! Random forest classifier loaded from a JSON export
//!
//! File layout:
//!
//! ```json
//! {
//!   "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
//!   "classes": ["maize", "rice"],
//!   "trees": [
//!     { "nodes": [
//!         { "feature": 6, "threshold": 150.0, "left": 1, "right": 2 },
//!         { "value": [12.0, 3.0] },
//!         { "value": [0.0, 20.0] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! A split sends the sample left when `x[feature] <= threshold`. Leaf values are
//! per-class weights (training sample counts); each tree votes with its
//! normalised leaf distribution and the forest averages the votes.

use super::CropClassifier;
use crate::error::{AdvisorError, AdvisorResult};
use crate::sample::{AgronomicSample, FEATURE_NAMES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Serialized forest as written by the export script
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub trees: Vec<TreeModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeModel {
    pub nodes: Vec<NodeModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeModel {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        /// Index into `AgronomicSample::feature_vector()`
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

/// Fitted random forest, validated at load time
#[derive(Debug, Clone)]
pub struct ForestClassifier {
    classes: Vec<String>,
    trees: Vec<Vec<Node>>,
}

impl ForestClassifier {
    /// Load a forest from a JSON file
    pub fn load(path: &Path) -> AdvisorResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AdvisorError::ModelUnavailable(format!("failed to read model {:?}: {}", path, e))
        })?;

        let forest = Self::from_json_str(&contents)?;
        tracing::info!(
            "Loaded forest model {:?} ({} trees, {} classes)",
            path,
            forest.trees.len(),
            forest.classes.len()
        );
        Ok(forest)
    }

    pub fn from_json_str(json: &str) -> AdvisorResult<Self> {
        let model: ForestModel = serde_json::from_str(json).map_err(|e| {
            AdvisorError::ModelUnavailable(format!("failed to parse model JSON: {}", e))
        })?;
        Self::from_model(model)
    }

    /// Validate a deserialized model and resolve its feature order
    pub fn from_model(model: ForestModel) -> AdvisorResult<Self> {
        if model.classes.is_empty() {
            return Err(unavailable("model declares no classes"));
        }
        if model.trees.is_empty() {
            return Err(unavailable("model contains no trees"));
        }

        let feature_map = resolve_features(&model.feature_names)?;
        let n_classes = model.classes.len();

        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(tree_idx, tree)| build_tree(tree_idx, tree, &feature_map, n_classes))
            .collect::<AdvisorResult<Vec<_>>>()?;

        Ok(Self {
            classes: model.classes,
            trees,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl CropClassifier for ForestClassifier {
    fn class_labels(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, sample: &AgronomicSample) -> AdvisorResult<Vec<f64>> {
        let x = sample.feature_vector();
        let mut proba = vec![0.0; self.classes.len()];

        for tree in &self.trees {
            let distribution = walk(tree, &x);
            for (acc, p) in proba.iter_mut().zip(distribution) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }

        Ok(proba)
    }
}

fn walk<'a>(tree: &'a [Node], x: &[f64; 7]) -> &'a [f64] {
    let mut idx = 0;
    loop {
        match &tree[idx] {
            Node::Split { feature, threshold, left, right } => {
                idx = if x[*feature] <= *threshold { *left } else { *right };
            }
            Node::Leaf { distribution } => return distribution,
        }
    }
}

fn unavailable(message: impl Into<String>) -> AdvisorError {
    AdvisorError::ModelUnavailable(message.into())
}

/// Map model feature positions onto sample feature positions
///
/// The model must use exactly the seven sample features, in any order.
fn resolve_features(names: &[String]) -> AdvisorResult<Vec<usize>> {
    if names.len() != FEATURE_NAMES.len() {
        return Err(unavailable(format!(
            "model expects {} features, samples provide {}",
            names.len(),
            FEATURE_NAMES.len()
        )));
    }

    let mut map = Vec::with_capacity(names.len());
    for name in names {
        let position = FEATURE_NAMES
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| unavailable(format!("unknown model feature '{}'", name)))?;
        if map.contains(&position) {
            return Err(unavailable(format!("duplicate model feature '{}'", name)));
        }
        map.push(position);
    }
    Ok(map)
}

fn build_tree(
    tree_idx: usize,
    tree: TreeModel,
    feature_map: &[usize],
    n_classes: usize,
) -> AdvisorResult<Vec<Node>> {
    let n_nodes = tree.nodes.len();
    if n_nodes == 0 {
        return Err(unavailable(format!("tree {} has no nodes", tree_idx)));
    }

    tree.nodes
        .into_iter()
        .enumerate()
        .map(|(node_idx, node)| -> AdvisorResult<Node> {
            match node {
                NodeModel::Split { feature, threshold, left, right } => {
                    let mapped = *feature_map.get(feature).ok_or_else(|| {
                        unavailable(format!(
                            "tree {} node {}: feature index {} out of range",
                            tree_idx, node_idx, feature
                        ))
                    })?;
                    if !threshold.is_finite() {
                        return Err(unavailable(format!(
                            "tree {} node {}: non-finite threshold",
                            tree_idx, node_idx
                        )));
                    }
                    // Children must point forward, which also rules out cycles
                    for child in [left, right] {
                        if child <= node_idx || child >= n_nodes {
                            return Err(unavailable(format!(
                                "tree {} node {}: invalid child index {}",
                                tree_idx, node_idx, child
                            )));
                        }
                    }
                    Ok(Node::Split { feature: mapped, threshold, left, right })
                }
                NodeModel::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(unavailable(format!(
                            "tree {} node {}: leaf has {} values for {} classes",
                            tree_idx,
                            node_idx,
                            value.len(),
                            n_classes
                        )));
                    }
                    let total: f64 = value.iter().sum();
                    if !total.is_finite() || total <= 0.0 || value.iter().any(|v| *v < 0.0) {
                        return Err(unavailable(format!(
                            "tree {} node {}: leaf weights must be non-negative with a positive sum",
                            tree_idx, node_idx
                        )));
                    }
                    Ok(Node::Leaf {
                        distribution: value.iter().map(|v| v / total).collect(),
                    })
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::score_sample;
    use crate::sample::RawInputs;
    use approx::assert_relative_eq;

    // Two stumps on rainfall and N, classes [maize, rice]
    const TWO_STUMPS: &str = r#"{
        "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
        "classes": ["maize", "rice"],
        "trees": [
            { "nodes": [
                { "feature": 6, "threshold": 150.0, "left": 1, "right": 2 },
                { "value": [30.0, 10.0] },
                { "value": [0.0, 20.0] }
            ] },
            { "nodes": [
                { "feature": 0, "threshold": 60.0, "left": 1, "right": 2 },
                { "value": [5.0, 5.0] },
                { "value": [8.0, 2.0] }
            ] }
        ]
    }"#;

    fn sample(n: f64, rainfall: f64) -> AgronomicSample {
        AgronomicSample::new(&RawInputs { n, rainfall, ..RawInputs::default() }).unwrap()
    }

    #[test]
    fn test_predict_averages_trees() {
        let forest = ForestClassifier::from_json_str(TWO_STUMPS).unwrap();
        assert_eq!(forest.n_trees(), 2);

        // Tree 1: rainfall 200 > 150 -> [0, 1]; tree 2: N 70 > 60 -> [0.8, 0.2]
        let proba = forest.predict_proba(&sample(70.0, 200.0)).unwrap();
        assert_relative_eq!(proba[0], 0.4);
        assert_relative_eq!(proba[1], 0.6);

        // Tree 1: rainfall 100 -> [0.75, 0.25]; tree 2: N 60 (<= threshold) -> [0.5, 0.5]
        let proba = forest.predict_proba(&sample(60.0, 100.0)).unwrap();
        assert_relative_eq!(proba[0], 0.625);
        assert_relative_eq!(proba[1], 0.375);
    }

    #[test]
    fn test_output_passes_probability_checks() {
        let forest = ForestClassifier::from_json_str(TWO_STUMPS).unwrap();
        let scores = score_sample(&forest, &sample(20.0, 250.0)).unwrap();
        assert_eq!(scores.len(), 2);
        let total: f64 = scores.iter().map(|s| s.probability).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_order_is_resolved_by_name() {
        // Same first stump, but the model lists rainfall first
        let json = r#"{
            "feature_names": ["rainfall", "N", "P", "K", "temperature", "humidity", "ph"],
            "classes": ["maize", "rice"],
            "trees": [ { "nodes": [
                { "feature": 0, "threshold": 150.0, "left": 1, "right": 2 },
                { "value": [1.0, 0.0] },
                { "value": [0.0, 1.0] }
            ] } ]
        }"#;
        let forest = ForestClassifier::from_json_str(json).unwrap();
        assert_eq!(forest.predict_proba(&sample(70.0, 200.0)).unwrap(), vec![0.0, 1.0]);
        assert_eq!(forest.predict_proba(&sample(70.0, 100.0)).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_unknown_feature_rejected() {
        let json = TWO_STUMPS.replace("\"ph\"", "\"moisture\"");
        let err = ForestClassifier::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("moisture"));
    }

    #[test]
    fn test_backward_child_rejected() {
        let json = r#"{
            "feature_names": ["N", "P", "K", "temperature", "humidity", "ph", "rainfall"],
            "classes": ["maize", "rice"],
            "trees": [ { "nodes": [
                { "feature": 0, "threshold": 10.0, "left": 0, "right": 1 },
                { "value": [1.0, 0.0] }
            ] } ]
        }"#;
        assert!(matches!(
            ForestClassifier::from_json_str(json),
            Err(AdvisorError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn test_leaf_width_must_match_classes() {
        let json = TWO_STUMPS.replace("[0.0, 20.0]", "[0.0, 20.0, 1.0]");
        assert!(ForestClassifier::from_json_str(&json).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = ForestClassifier::load(Path::new("models/does_not_exist.json")).unwrap_err();
        assert!(matches!(err, AdvisorError::ModelUnavailable(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ForestClassifier::from_json_str("{ not json"),
            Err(AdvisorError::ModelUnavailable(_))
        ));
    }
}
