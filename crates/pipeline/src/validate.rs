//! Batch validator: gatekeeper for uploaded tables.
//!
//! A table is only handed to the classifier when its column set equals the
//! schema's name set exactly and every cell is a valid RSSI reading. Any
//! failure rejects the whole table: no partial predictions are produced.
//!
//! On success the rows are re-laid out in schema order, so the input
//! file's column order never reaches the classifier.

use std::collections::HashSet;

use wifispot_core::observation::check_range;
use wifispot_core::{FeatureSchema, FullObservation, ObservationTable, ValidationError};

/// A table that passed validation, plus its schema-ordered vectors.
#[derive(Debug, Clone)]
pub struct ValidatedBatch {
    /// The table exactly as uploaded (input column order).
    pub table: ObservationTable,
    /// One schema-ordered vector per table row.
    pub rows: Vec<FullObservation>,
}

/// Compare a column list against the schema.
///
/// `missing` follows schema order; `unexpected` and `duplicated` follow
/// input order.
pub fn check_columns(schema: &FeatureSchema, columns: &[String]) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    let mut duplicated = Vec::new();
    let mut unexpected = Vec::new();

    for column in columns {
        if !seen.insert(column.as_str()) {
            if !duplicated.contains(column) {
                duplicated.push(column.clone());
            }
        } else if !schema.contains(column) {
            unexpected.push(column.clone());
        }
    }

    let missing: Vec<String> = schema
        .names()
        .iter()
        .filter(|name| !seen.contains(name.as_str()))
        .cloned()
        .collect();

    if missing.is_empty() && unexpected.is_empty() && duplicated.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::SchemaMismatch {
            missing,
            unexpected,
            duplicated,
        })
    }
}

/// Validate an uploaded table and reorder its rows to schema order.
pub fn validate_batch(
    schema: &FeatureSchema,
    table: ObservationTable,
) -> Result<ValidatedBatch, ValidationError> {
    if let Err(err) = check_columns(schema, table.columns()) {
        tracing::warn!(error = %err, "Upload rejected: column set does not match schema");
        return Err(err);
    }

    if table.is_empty() {
        return Err(ValidationError::EmptyTable);
    }

    // source[j] = input column index holding schema feature j
    let source: Vec<usize> = schema
        .names()
        .iter()
        .map(|name| {
            table
                .columns()
                .iter()
                .position(|c| c == name)
                .unwrap_or_default()
        })
        .collect();

    // Whole table is range-checked before anything is reordered.
    for (i, row) in table.rows().iter().enumerate() {
        for (column, &value) in table.columns().iter().zip(row) {
            if let Err(err) = check_range(column, Some(i + 1), value) {
                tracing::warn!(error = %err, "Upload rejected: value out of range");
                return Err(err);
            }
        }
    }

    let rows: Vec<FullObservation> = table
        .rows()
        .iter()
        .map(|row| FullObservation::new(source.iter().map(|&s| row[s]).collect()))
        .collect();

    let in_order = source.iter().enumerate().all(|(j, &s)| j == s);
    tracing::debug!(
        rows = rows.len(),
        reordered = !in_order,
        "Upload validated"
    );

    Ok(ValidatedBatch { table, rows })
}
