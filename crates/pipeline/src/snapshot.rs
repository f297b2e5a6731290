//! Snapshot simulator: stands in for a live WiFi scan.
//!
//! The vectors produced here are random, not measured. They exist so the
//! full inference path can be exercised without scanning hardware, and
//! callers must present them as simulated.

use rand::Rng;

use wifispot_core::{FeatureSchema, FullObservation};

/// Lowest simulated reading (inclusive).
pub const SNAPSHOT_LOW: i32 = -90;

/// Upper bound of simulated readings (exclusive).
pub const SNAPSHOT_HIGH: i32 = -40;

/// Draw one simulated full observation for `schema`.
pub fn simulate(schema: &FeatureSchema) -> FullObservation {
    let mut rng = rand::rng();
    simulate_with(schema.len(), &mut rng)
}

fn simulate_with<R: Rng>(len: usize, rng: &mut R) -> FullObservation {
    FullObservation::new(
        (0..len)
            .map(|_| {
                let dbm: i32 = rng.random_range(SNAPSHOT_LOW..SNAPSHOT_HIGH);
                f64::from(dbm)
            })
            .collect(),
    )
}
