//! CSV readers for the reference dataset and uploaded observation tables.
//!
//! Reading is deliberately separate from validation: these functions only
//! turn text into numbers. Schema and range checks live in `validate`.

use std::io::Read;
use std::path::Path;

use wifispot_core::{ArtifactError, FeatureSchema, ObservationTable, ValidationError};

/// Read only the header row of the reference dataset.
pub fn read_reference_columns(path: &Path, delimiter: u8) -> Result<Vec<String>, ArtifactError> {
    if !path.exists() {
        return Err(ArtifactError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| ArtifactError::Read {
            path: path.to_path_buf(),
            reason: format!("Failed to open CSV: {e}"),
        })?;

    let headers = reader.headers().map_err(|e| ArtifactError::Parse {
        path: path.to_path_buf(),
        reason: format!("Failed to read headers: {e}"),
    })?;

    if headers.is_empty() {
        return Err(ArtifactError::Parse {
            path: path.to_path_buf(),
            reason: "header row is empty".into(),
        });
    }

    Ok(headers.iter().map(str::to_string).collect())
}

/// Build the feature schema from the reference dataset header.
pub fn load_schema(
    path: &Path,
    delimiter: u8,
    label_column: &str,
    manual_count: usize,
) -> Result<FeatureSchema, ArtifactError> {
    let columns = read_reference_columns(path, delimiter)?;
    let schema = FeatureSchema::from_columns(columns, label_column, manual_count)?;
    tracing::info!(
        features = schema.len(),
        fingerprint = %schema.fingerprint(),
        "Feature schema loaded from {}",
        path.display()
    );
    Ok(schema)
}

/// Parse an uploaded CSV into a table.
///
/// Every data cell must be a number. Blank lines are skipped and cells are
/// trimmed. Row numbers in errors count data rows from 1.
pub fn read_table<R: Read>(input: R, delimiter: u8) -> Result<ObservationTable, ValidationError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| ValidationError::Malformed {
            row: 0,
            column: "<header>".into(),
            reason: format!("Failed to read headers: {e}"),
        })?
        .clone();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();

    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(ValidationError::Malformed {
            row: 0,
            column: "<header>".into(),
            reason: "header row is empty".into(),
        });
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row_number = i + 1;
        let record = record.map_err(|e| ValidationError::Malformed {
            row: row_number,
            column: "<record>".into(),
            reason: e.to_string(),
        })?;

        if record.len() != columns.len() {
            return Err(ValidationError::Malformed {
                row: row_number,
                column: columns
                    .get(record.len())
                    .cloned()
                    .unwrap_or_else(|| "<extra>".into()),
                reason: format!(
                    "expected {} values, found {}",
                    columns.len(),
                    record.len()
                ),
            });
        }

        let mut values = Vec::with_capacity(columns.len());
        for (field, column) in record.iter().zip(&columns) {
            values.push(parse_cell(field).map_err(|reason| ValidationError::Malformed {
                row: row_number,
                column: column.clone(),
                reason,
            })?);
        }
        rows.push(values);
    }

    ObservationTable::new(columns, rows)
}

fn parse_cell(field: &str) -> Result<f64, String> {
    if field.is_empty() {
        return Err("missing value".into());
    }
    field
        .parse::<f64>()
        .map_err(|_| format!("'{field}' is not a number"))
}
