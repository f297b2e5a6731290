//! Error types for the WifiSpot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all WifiSpot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Input validation (caller can fix and retry) ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Classifier invocation (invariant breach) ---
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    // --- Startup artifacts (fatal) ---
    #[error("Artifact load error: {0}")]
    Artifact(#[from] ArtifactError),

    // --- Result export ---
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Short machine-readable tag for the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(ValidationError::SchemaMismatch { .. }) => "schema_mismatch",
            Error::Validation(ValidationError::RangeViolation { .. }) => "range_violation",
            Error::Validation(_) => "invalid_input",
            Error::Inference(_) => "inference_error",
            Error::Artifact(_) => "artifact_load_error",
            Error::Export(_) => "export_error",
            Error::Config { .. } => "config_error",
        }
    }

    /// Whether this error is an internal failure rather than a problem with
    /// the caller's input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Inference(_) | Error::Export(_))
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error(
        "Columns do not match the feature schema (missing: [{}], unexpected: [{}], duplicated: [{}])",
        .missing.join(", "),
        .unexpected.join(", "),
        .duplicated.join(", ")
    )]
    SchemaMismatch {
        missing: Vec<String>,
        unexpected: Vec<String>,
        duplicated: Vec<String>,
    },

    #[error("RSSI value {value} for '{feature}'{} is outside [-100, 0]", row_suffix(.row))]
    RangeViolation {
        feature: String,
        row: Option<usize>,
        value: f64,
    },

    #[error("'{name}' is not a manually enterable feature")]
    UnknownFeature { name: String },

    #[error("No reading supplied for manual feature '{name}'")]
    MissingFeature { name: String },

    #[error("Malformed input at row {row}, column '{column}': {reason}")]
    Malformed {
        row: usize,
        column: String,
        reason: String,
    },

    #[error("Uploaded table has no data rows")]
    EmptyTable,
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(r) => format!(" in row {r}"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InferenceError {
    #[error("Classifier expects {expected} features per row, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Classifier returned {actual} predictions for {expected} rows")]
    OutputLength { expected: usize, actual: usize },

    #[error("Classifier failure: {0}")]
    Model(String),
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("Reference dataset has no label column '{label}'")]
    MissingLabelColumn { label: String },

    #[error("Reference dataset has {available} features, but {required} are needed for manual entry")]
    TooFewFeatures { available: usize, required: usize },

    #[error("Reference dataset has duplicate column '{name}'")]
    DuplicateColumn { name: String },

    #[error("Model features do not match the schema: {0}")]
    FeatureMismatch(String),

    #[error("Unknown model kind: {0}")]
    UnknownKind(String),
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ExportError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_lists_offending_columns() {
        let err = Error::Validation(ValidationError::SchemaMismatch {
            missing: vec!["AP3".into()],
            unexpected: vec!["AP9".into()],
            duplicated: vec![],
        });
        let text = err.to_string();
        assert!(text.contains("AP3"));
        assert!(text.contains("AP9"));
        assert_eq!(err.kind(), "schema_mismatch");
        assert!(!err.is_internal());
    }

    #[test]
    fn range_violation_mentions_row_when_present() {
        let err = ValidationError::RangeViolation {
            feature: "AP1".into(),
            row: Some(4),
            value: 12.0,
        };
        assert!(err.to_string().contains("row 4"));

        let single = ValidationError::RangeViolation {
            feature: "AP1".into(),
            row: None,
            value: -120.0,
        };
        assert!(!single.to_string().contains("row"));
        assert!(single.to_string().contains("-120"));
    }

    #[test]
    fn inference_errors_are_internal() {
        let err = Error::from(InferenceError::ShapeMismatch {
            expected: 78,
            actual: 77,
        });
        assert!(err.is_internal());
        assert_eq!(err.kind(), "inference_error");
    }

    #[test]
    fn artifact_error_displays_path() {
        let err = ArtifactError::NotFound {
            path: PathBuf::from("rf_model.json"),
        };
        assert!(err.to_string().contains("rf_model.json"));
    }
}
