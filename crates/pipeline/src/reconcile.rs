//! Input reconciler: expands hand-entered readings into a full vector.
//!
//! Every access point outside the manual-entry subset is filled with the
//! "not observed" sentinel (-100). Positions are found by name through the
//! schema, never by the order the readings arrived in.

use wifispot_core::observation::check_range;
use wifispot_core::{FeatureSchema, FullObservation, PartialObservation, ValidationError};

/// Reconcile a partial observation against the schema.
///
/// The partial observation must supply exactly the manual-entry features,
/// each within [-100, 0]. Out-of-range values are rejected, not clamped.
pub fn reconcile(
    schema: &FeatureSchema,
    partial: &PartialObservation,
) -> Result<FullObservation, ValidationError> {
    if let Some((name, _)) = partial.iter().find(|(name, _)| !schema.is_manual(name)) {
        return Err(ValidationError::UnknownFeature {
            name: name.to_string(),
        });
    }

    let mut full = FullObservation::unobserved(schema.len());
    for feature in schema.manual_features() {
        let value = partial
            .get(feature)
            .ok_or_else(|| ValidationError::MissingFeature {
                name: feature.clone(),
            })?;
        check_range(feature, None, value)?;

        let position =
            schema
                .index_of(feature)
                .ok_or_else(|| ValidationError::UnknownFeature {
                    name: feature.clone(),
                })?;
        full.values_mut()[position] = value;
    }

    tracing::debug!(
        supplied = partial.len(),
        filled = schema.len() - partial.len(),
        "Manual readings reconciled"
    );

    Ok(full)
}
