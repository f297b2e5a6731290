//! Feature schema: the ordered access-point layout the classifier was trained on.
//!
//! The schema is built once at startup from the reference dataset's header
//! (minus the label column) and never mutated afterwards. Position `i` of
//! every full observation holds the RSSI reading of `names()[i]`.
//!
//! A leading prefix of the schema is designated as manually enterable; the
//! rest of the access points are filled with the "not observed" sentinel
//! when an operator types readings by hand.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::error::ArtifactError;

/// Ordered, immutable list of feature (access point) names.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
    manual_count: usize,
    label_column: String,
}

impl FeatureSchema {
    /// Build the schema from a reference dataset's column list.
    ///
    /// The label column is removed; the remaining columns keep their
    /// original order. The first `manual_count` features become the
    /// manual-entry subset.
    pub fn from_columns<I, S>(
        columns: I,
        label_column: &str,
        manual_count: usize,
    ) -> Result<Self, ArtifactError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut index = HashMap::new();
        let mut saw_label = false;

        for column in columns {
            let column: String = column.into();
            if column == label_column {
                if saw_label {
                    return Err(ArtifactError::DuplicateColumn { name: column });
                }
                saw_label = true;
                continue;
            }
            if index.contains_key(&column) {
                return Err(ArtifactError::DuplicateColumn { name: column });
            }
            index.insert(column.clone(), names.len());
            names.push(column);
        }

        if !saw_label {
            return Err(ArtifactError::MissingLabelColumn {
                label: label_column.to_string(),
            });
        }

        if names.len() < manual_count {
            return Err(ArtifactError::TooFewFeatures {
                available: names.len(),
                required: manual_count,
            });
        }

        tracing::debug!(
            features = names.len(),
            manual = manual_count,
            label = label_column,
            "Feature schema built"
        );

        Ok(Self {
            names,
            index,
            manual_count,
            label_column: label_column.to_string(),
        })
    }

    /// All feature names in classifier order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of features (N).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The manually enterable features (first M names, schema order).
    pub fn manual_features(&self) -> &[String] {
        &self.names[..self.manual_count]
    }

    /// Whether `name` belongs to the manual-entry subset.
    pub fn is_manual(&self, name: &str) -> bool {
        self.index_of(name).is_some_and(|i| i < self.manual_count)
    }

    /// Position of a feature in the schema.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// The label column that was excluded from the schema.
    pub fn label_column(&self) -> &str {
        &self.label_column
    }

    /// Stable digest of the ordered feature names.
    ///
    /// Two deployments with the same fingerprint feed the classifier
    /// identically laid-out vectors.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for name in &self.names {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
        }
        let digest = hex::encode(hasher.finalize());
        digest[..16].to_string()
    }

    /// Serializable summary for status output and the HTTP API.
    pub fn info(&self) -> SchemaInfo {
        SchemaInfo {
            feature_count: self.len(),
            fingerprint: self.fingerprint(),
            label_column: self.label_column.clone(),
            features: self.names.clone(),
            manual_features: self.manual_features().to_vec(),
        }
    }
}

/// Schema summary for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub feature_count: usize,
    pub fingerprint: String,
    pub label_column: String,
    pub features: Vec<String>,
    pub manual_features: Vec<String>,
}
