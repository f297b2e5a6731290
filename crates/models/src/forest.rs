//! Random forest classifier loaded from a JSON artifact.
//!
//! Each tree is stored as parallel arrays in pre-order, the layout most
//! tree exporters produce:
//!
//! ```json
//! { "feature": [0, -1, -1], "threshold": [-70.0, 0.0, 0.0],
//!   "left": [1, -1, -1], "right": [2, -1, -1], "class_index": [0, 0, 1] }
//! ```
//!
//! Node `i` is a leaf when `left[i] == -1`; otherwise samples with
//! `x[feature[i]] <= threshold[i]` go to `left[i]`, the rest to `right[i]`.
//! The forest predicts by majority vote; ties go to the lowest class index.

use serde::{Deserialize, Serialize};

use wifispot_core::classifier::check_shape;
use wifispot_core::{Classifier, FullObservation, InferenceError, Prediction};

const NO_CHILD: i64 = -1;

/// A single decision tree in flattened form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatTree {
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub left: Vec<i64>,
    pub right: Vec<i64>,
    pub class_index: Vec<usize>,
}

impl FlatTree {
    fn node_count(&self) -> usize {
        self.feature.len()
    }

    /// Structural checks: equal array lengths, children after parents,
    /// in-range feature and class indices.
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        let n = self.node_count();
        if n == 0 {
            return Err("tree has no nodes".into());
        }
        if [
            self.threshold.len(),
            self.left.len(),
            self.right.len(),
            self.class_index.len(),
        ]
        .iter()
        .any(|&len| len != n)
        {
            return Err("tree arrays have different lengths".into());
        }

        for i in 0..n {
            let (left, right) = (self.left[i], self.right[i]);
            if left == NO_CHILD {
                if right != NO_CHILD {
                    return Err(format!("node {i} has a right child but no left child"));
                }
                if self.class_index[i] >= n_classes {
                    return Err(format!(
                        "leaf {i} predicts class {} but only {n_classes} classes exist",
                        self.class_index[i]
                    ));
                }
                continue;
            }

            // Pre-order: children always come after their parent, so
            // traversal can never loop.
            for child in [left, right] {
                if child <= i as i64 || child >= n as i64 {
                    return Err(format!("node {i} has invalid child index {child}"));
                }
            }
            let feature = self.feature[i];
            if feature < 0 || feature as usize >= n_features {
                return Err(format!("node {i} splits on unknown feature {feature}"));
            }
            if self.threshold[i].is_nan() {
                return Err(format!("node {i} has a NaN threshold"));
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf and return its class index.
    fn predict_one(&self, x: &[f64]) -> usize {
        let mut node = 0usize;
        loop {
            let left = self.left[node];
            if left == NO_CHILD {
                return self.class_index[node];
            }
            let feature = self.feature[node] as usize;
            node = if x[feature] <= self.threshold[node] {
                left as usize
            } else {
                self.right[node] as usize
            };
        }
    }
}

/// On-disk form of a random forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestModel {
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub trees: Vec<FlatTree>,
}

/// A validated, ready-to-use random forest.
#[derive(Debug, Clone)]
pub struct RandomForestClassifier {
    model: RandomForestModel,
}

impl RandomForestClassifier {
    pub fn from_model(model: RandomForestModel) -> Result<Self, String> {
        if model.feature_names.is_empty() {
            return Err("forest has no features".into());
        }
        if model.classes.is_empty() {
            return Err("forest has no classes".into());
        }
        if model.trees.is_empty() {
            return Err("forest has no trees".into());
        }
        let (n_features, n_classes) = (model.feature_names.len(), model.classes.len());
        for (t, tree) in model.trees.iter().enumerate() {
            tree.validate(n_features, n_classes)
                .map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(Self { model })
    }

    pub fn n_trees(&self) -> usize {
        self.model.trees.len()
    }

    pub fn classes(&self) -> &[String] {
        &self.model.classes
    }

    fn vote(&self, x: &[f64]) -> usize {
        let mut votes = vec![0usize; self.model.classes.len()];
        for tree in &self.model.trees {
            votes[tree.predict_one(x)] += 1;
        }

        let mut best = 0;
        for (class, &count) in votes.iter().enumerate() {
            if count > votes[best] {
                best = class;
            }
        }
        best
    }
}

impl Classifier for RandomForestClassifier {
    fn name(&self) -> &str {
        "random_forest"
    }

    fn n_features(&self) -> usize {
        self.model.feature_names.len()
    }

    fn feature_names(&self) -> Option<&[String]> {
        Some(&self.model.feature_names)
    }

    fn predict(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError> {
        check_shape(rows, self.n_features())?;
        Ok(rows
            .iter()
            .map(|row| Prediction::new(self.model.classes[self.vote(row.values())].clone()))
            .collect())
    }
}
