//! # WifiSpot Core
//!
//! Domain types, traits, and error definitions for predicting a location
//! ("spot") from WiFi RSSI readings. This crate does **no I/O**; it defines
//! the domain model that the pipeline, model, and hosting crates build on.
//!
//! ## Design Philosophy
//!
//! The classifier is a trait here; concrete models live in `wifispot-models`.
//! This enables:
//! - Swapping model artifacts via configuration
//! - Testing every acquisition mode with a deterministic stub classifier
//! - A schema object that is passed explicitly instead of living in a global

pub mod classifier;
pub mod error;
pub mod mode;
pub mod observation;
pub mod schema;
pub mod table;

// Re-export key types at crate root for ergonomics
pub use classifier::{Classifier, Prediction};
pub use error::{ArtifactError, Error, ExportError, InferenceError, Result, ValidationError};
pub use mode::{AcquisitionMode, BatchPrediction, ModeOutcome, SinglePrediction};
pub use observation::{FullObservation, NOT_OBSERVED, PartialObservation, RSSI_MAX, RSSI_MIN};
pub use schema::{FeatureSchema, SchemaInfo};
pub use table::{ExtraColumn, ObservationTable};
