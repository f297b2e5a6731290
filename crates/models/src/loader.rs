//! Artifact loader: turns a model file into a shared `Classifier`.
//!
//! Artifacts are JSON documents tagged by `kind`. The loader parses the
//! artifact, validates its structure, and checks that the features it was
//! trained on line up with the deployment's feature schema. Every failure
//! here is fatal for startup.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wifispot_core::{ArtifactError, Classifier, FeatureSchema};

use crate::centroid::{NearestCentroidClassifier, NearestCentroidModel};
use crate::forest::{RandomForestClassifier, RandomForestModel};

/// Model kinds a config may request.
pub const KNOWN_KINDS: &[&str] = &["auto", "random_forest", "nearest_centroid"];

/// A parsed (but not yet validated) model artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    RandomForest(RandomForestModel),
    NearestCentroid(NearestCentroidModel),
}

impl ModelArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelArtifact::RandomForest(_) => "random_forest",
            ModelArtifact::NearestCentroid(_) => "nearest_centroid",
        }
    }

    /// Validate and build the classifier.
    pub fn into_classifier(self) -> Result<Arc<dyn Classifier>, String> {
        Ok(match self {
            ModelArtifact::RandomForest(m) => Arc::new(RandomForestClassifier::from_model(m)?),
            ModelArtifact::NearestCentroid(m) => {
                Arc::new(NearestCentroidClassifier::from_model(m)?)
            }
        })
    }
}

/// Description of a loaded model, for status output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub kind: String,
    pub path: PathBuf,
    pub n_features: usize,
    pub loaded_at: DateTime<Utc>,
}

/// A classifier plus its description.
#[derive(Clone)]
pub struct LoadedModel {
    pub classifier: Arc<dyn Classifier>,
    pub info: ModelInfo,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("classifier", &self.classifier.name())
            .field("info", &self.info)
            .finish()
    }
}

/// Load a model artifact from `path`.
///
/// `kind` is `"auto"` to accept whatever the artifact declares, or a
/// specific kind that the artifact must match.
pub fn load_model(path: &Path, kind: &str) -> Result<LoadedModel, ArtifactError> {
    if !KNOWN_KINDS.contains(&kind) {
        return Err(ArtifactError::UnknownKind(kind.to_string()));
    }

    tracing::info!("Loading model artifact from: {}", path.display());

    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut loaded = parse_model(&content, kind).map_err(|reason| ArtifactError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;
    loaded.info.path = path.to_path_buf();

    tracing::info!(
        kind = %loaded.info.kind,
        features = loaded.info.n_features,
        "Model artifact loaded"
    );

    Ok(loaded)
}

/// Parse and validate an artifact held in memory.
pub fn parse_model(content: &str, kind: &str) -> Result<LoadedModel, String> {
    let artifact: ModelArtifact = serde_json::from_str(content).map_err(|e| e.to_string())?;

    if kind != "auto" && kind != artifact.kind() {
        return Err(format!(
            "artifact is a {} model, but {kind} was configured",
            artifact.kind()
        ));
    }

    let kind = artifact.kind().to_string();
    let classifier = artifact.into_classifier()?;
    Ok(LoadedModel {
        info: ModelInfo {
            kind,
            path: PathBuf::from("<memory>"),
            n_features: classifier.n_features(),
            loaded_at: Utc::now(),
        },
        classifier,
    })
}

/// Check that a classifier consumes exactly the schema's features, in order.
pub fn ensure_aligned(
    classifier: &dyn Classifier,
    schema: &FeatureSchema,
) -> Result<(), ArtifactError> {
    if classifier.n_features() != schema.len() {
        return Err(ArtifactError::FeatureMismatch(format!(
            "model expects {} features, schema has {}",
            classifier.n_features(),
            schema.len()
        )));
    }

    if let Some(names) = classifier.feature_names() {
        if let Some((i, (model_name, schema_name))) = names
            .iter()
            .zip(schema.names())
            .enumerate()
            .find(|(_, (a, b))| a != b)
        {
            return Err(ArtifactError::FeatureMismatch(format!(
                "position {i} is '{model_name}' in the model but '{schema_name}' in the schema"
            )));
        }
    }

    Ok(())
}

/// Load the configured model and verify it against `schema`.
pub fn build_from_config(
    config: &wifispot_config::AppConfig,
    schema: &FeatureSchema,
) -> Result<LoadedModel, ArtifactError> {
    let loaded = load_model(&config.model.path, &config.model.kind)?;
    ensure_aligned(loaded.classifier.as_ref(), schema)?;
    Ok(loaded)
}
