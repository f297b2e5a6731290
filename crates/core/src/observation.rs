//! RSSI observations: partial (hand-entered) and full (schema-aligned).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::schema::FeatureSchema;

/// Strongest representable reading (no attenuation).
pub const RSSI_MAX: f64 = 0.0;

/// Weakest representable reading.
pub const RSSI_MIN: f64 = -100.0;

/// Fill value meaning "this access point was not observed".
pub const NOT_OBSERVED: f64 = RSSI_MIN;

/// Whether `value` lies in the closed RSSI range [-100, 0].
///
/// NaN is never in range.
pub fn in_range(value: f64) -> bool {
    (RSSI_MIN..=RSSI_MAX).contains(&value)
}

/// Check a single reading, producing a `RangeViolation` on failure.
pub fn check_range(feature: &str, row: Option<usize>, value: f64) -> Result<(), ValidationError> {
    if in_range(value) {
        Ok(())
    } else {
        Err(ValidationError::RangeViolation {
            feature: feature.to_string(),
            row,
            value,
        })
    }
}

/// Readings for a subset of features, keyed by feature name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartialObservation {
    readings: BTreeMap<String, f64>,
}

impl PartialObservation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a reading.
    pub fn insert(&mut self, feature: impl Into<String>, value: f64) {
        self.readings.insert(feature.into(), value);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, feature: impl Into<String>, value: f64) -> Self {
        self.insert(feature, value);
        self
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.readings.get(feature).copied()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PartialObservation {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            readings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A reading for every schema feature, positionally aligned with the schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullObservation {
    values: Vec<f64>,
}

impl FullObservation {
    /// Wrap an already-aligned vector.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// A vector where every access point is unobserved.
    pub fn unobserved(len: usize) -> Self {
        Self {
            values: vec![NOT_OBSERVED; len],
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pair each value with its schema feature name, in schema order.
    ///
    /// The observation must have been built against `schema`.
    pub fn labeled<'a>(&'a self, schema: &'a FeatureSchema) -> Vec<(&'a str, f64)> {
        schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
            .collect()
    }
}
