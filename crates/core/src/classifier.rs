//! Classifier trait: the abstraction over trained location models.
//!
//! A classifier maps a schema-aligned RSSI vector to a spot label. The
//! pipeline never inspects how it was trained; it only relies on
//! `predict` returning one label per input row, in input order.
//!
//! Implementations: JSON random forest, nearest centroid, test stubs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::InferenceError;
use crate::observation::FullObservation;

/// A predicted spot label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(pub String);

impl Prediction {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Prediction {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The core Classifier trait.
///
/// Implementations are immutable after loading, so a single instance can
/// be shared across threads behind an `Arc` without locking.
pub trait Classifier: Send + Sync {
    /// A human-readable name for this model (e.g. "random_forest").
    fn name(&self) -> &str;

    /// Number of features each input row must carry.
    fn n_features(&self) -> usize;

    /// Feature names the model was trained on, in training order, when the
    /// artifact records them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Predict one label per row, preserving row order.
    fn predict(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError>;
}

/// Reject any row whose width differs from `expected`.
pub fn check_shape(rows: &[FullObservation], expected: usize) -> Result<(), InferenceError> {
    match rows.iter().find(|r| r.len() != expected) {
        Some(row) => Err(InferenceError::ShapeMismatch {
            expected,
            actual: row.len(),
        }),
        None => Ok(()),
    }
}
