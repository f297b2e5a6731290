//! Acquisition modes and their outcomes.
//!
//! Exactly one mode is chosen per request. Each variant carries the input
//! its pipeline needs, so dispatch is a plain `match`.

use serde::{Deserialize, Serialize};

use crate::classifier::Prediction;
use crate::observation::{FullObservation, PartialObservation};
use crate::table::ObservationTable;

/// How the RSSI readings for a request were obtained.
#[derive(Debug, Clone)]
pub enum AcquisitionMode {
    /// Readings typed in by hand for the manual-entry features.
    Manual(PartialObservation),
    /// A bulk table read from an uploaded file.
    Upload(ObservationTable),
    /// A simulated scan; no input.
    Snapshot,
}

impl AcquisitionMode {
    pub fn name(&self) -> &'static str {
        match self {
            AcquisitionMode::Manual(_) => "manual",
            AcquisitionMode::Upload(_) => "upload",
            AcquisitionMode::Snapshot => "snapshot",
        }
    }
}

/// Result of a single-vector mode (manual or snapshot).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinglePrediction {
    pub spot: Prediction,
    /// The full vector that was sent to the classifier.
    pub observation: FullObservation,
    /// True when the readings were generated rather than measured.
    pub simulated: bool,
}

/// Result of an upload: the augmented table and its CSV export.
#[derive(Debug, Clone)]
pub struct BatchPrediction {
    pub table: ObservationTable,
    pub csv: String,
}

/// What a mode run produced.
#[derive(Debug, Clone)]
pub enum ModeOutcome {
    Single(SinglePrediction),
    Batch(BatchPrediction),
}

impl ModeOutcome {
    pub fn into_single(self) -> Option<SinglePrediction> {
        match self {
            ModeOutcome::Single(single) => Some(single),
            ModeOutcome::Batch(_) => None,
        }
    }

    pub fn into_batch(self) -> Option<BatchPrediction> {
        match self {
            ModeOutcome::Batch(batch) => Some(batch),
            ModeOutcome::Single(_) => None,
        }
    }
}
