//! Classifier implementations for WifiSpot.
//!
//! All models implement the `wifispot_core::Classifier` trait.
//! The loader selects the correct one from the artifact's `kind` tag.

pub mod centroid;
pub mod forest;
pub mod loader;

pub use centroid::{NearestCentroidClassifier, NearestCentroidModel};
pub use forest::{FlatTree, RandomForestClassifier, RandomForestModel};
pub use loader::{LoadedModel, ModelArtifact, ModelInfo, build_from_config, ensure_aligned, load_model};
