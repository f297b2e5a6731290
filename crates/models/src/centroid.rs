//! Nearest-centroid classifier.
//!
//! Stores one mean RSSI vector per spot and predicts the spot whose centroid
//! is closest in squared Euclidean distance (ties → lowest class index).

use serde::{Deserialize, Serialize};

use wifispot_core::classifier::check_shape;
use wifispot_core::{Classifier, FullObservation, InferenceError, Prediction};

/// On-disk form of a nearest-centroid model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearestCentroidModel {
    pub feature_names: Vec<String>,
    pub classes: Vec<String>,
    pub centroids: Vec<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct NearestCentroidClassifier {
    model: NearestCentroidModel,
}

impl NearestCentroidClassifier {
    pub fn from_model(model: NearestCentroidModel) -> Result<Self, String> {
        if model.feature_names.is_empty() {
            return Err("model has no features".into());
        }
        if model.classes.is_empty() {
            return Err("model has no classes".into());
        }
        if model.centroids.len() != model.classes.len() {
            return Err(format!(
                "{} centroids for {} classes",
                model.centroids.len(),
                model.classes.len()
            ));
        }
        let width = model.feature_names.len();
        if let Some((i, c)) = model
            .centroids
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != width || c.iter().any(|v| !v.is_finite()))
        {
            return Err(format!(
                "centroid {i} must hold {width} finite values, has {}",
                c.len()
            ));
        }
        Ok(Self { model })
    }

    fn nearest(&self, x: &[f64]) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (class, centroid) in self.model.centroids.iter().enumerate() {
            let dist: f64 = centroid
                .iter()
                .zip(x)
                .map(|(c, v)| (c - v).powi(2))
                .sum();
            if dist < best_dist {
                best = class;
                best_dist = dist;
            }
        }
        best
    }
}

impl Classifier for NearestCentroidClassifier {
    fn name(&self) -> &str {
        "nearest_centroid"
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
            .map(|row| Prediction::new(self.model.classes[self.nearest(row.values())].clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> NearestCentroidClassifier {
        NearestCentroidClassifier::from_model(NearestCentroidModel {
            feature_names: vec!["AP1".into(), "AP2".into()],
            classes: vec!["lobby".into(), "lab".into()],
            centroids: vec![vec![-50.0, -90.0], vec![-90.0, -50.0]],
        })
        .unwrap()
    }

    #[test]
    fn picks_closest_centroid() {
        let preds = classifier()
            .predict(&[
                FullObservation::new(vec![-55.0, -85.0]),
                FullObservation::new(vec![-88.0, -52.0]),
            ])
            .unwrap();
        assert_eq!(preds, vec![Prediction::new("lobby"), Prediction::new("lab")]);
    }

    #[test]
    fn equidistant_goes_to_first_class() {
        let preds = classifier()
            .predict(&[FullObservation::new(vec![-70.0, -70.0])])
            .unwrap();
        assert_eq!(preds, vec![Prediction::new("lobby")]);
    }

    #[test]
    fn centroid_width_must_match_features() {
        let err = NearestCentroidClassifier::from_model(NearestCentroidModel {
            feature_names: vec!["AP1".into(), "AP2".into()],
            classes: vec!["lobby".into()],
            centroids: vec![vec![-50.0]],
        })
        .unwrap_err();
        assert!(err.contains("centroid 0"));
    }

    #[test]
    fn centroid_count_must_match_classes() {
        let err = NearestCentroidClassifier::from_model(NearestCentroidModel {
            feature_names: vec!["AP1".into()],
            classes: vec!["lobby".into(), "lab".into()],
            centroids: vec![vec![-50.0]],
        })
        .unwrap_err();
        assert!(err.contains("1 centroids for 2 classes"));
    }
}
