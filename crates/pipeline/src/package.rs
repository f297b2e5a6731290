//! Result packager: appends predictions and serializes the table to CSV.
//!
//! The exported file keeps the uploaded column order and every input value
//! unchanged. Numbers are written in their shortest round-trip form.

use wifispot_config::ExportConfig;
use wifispot_core::{BatchPrediction, ExportError, ObservationTable, Prediction};

/// Default name of the appended prediction column.
pub const DEFAULT_PREDICTION_COLUMN: &str = "Predicted Spot";

/// Default download name for the exported table.
pub const EXPORT_FILE_NAME: &str = "predicted_output.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub prediction_column: String,
    pub delimiter: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            prediction_column: DEFAULT_PREDICTION_COLUMN.into(),
            delimiter: b',',
        }
    }
}

impl From<&ExportConfig> for ExportOptions {
    fn from(config: &ExportConfig) -> Self {
        Self {
            prediction_column: config.prediction_column.clone(),
            delimiter: config.delimiter_byte(),
        }
    }
}

/// Append one prediction per row and render the result as CSV.
pub fn package(
    mut table: ObservationTable,
    predictions: Vec<Prediction>,
    options: &ExportOptions,
) -> Result<BatchPrediction, ExportError> {
    let labels = predictions.into_iter().map(|p| p.0).collect();
    table.append_column(options.prediction_column.clone(), labels)?;
    let csv = to_csv(&table, options.delimiter)?;
    Ok(BatchPrediction { table, csv })
}

/// Serialize a table (numeric columns then appended columns) to CSV text.
pub fn to_csv(table: &ObservationTable, delimiter: u8) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    writer
        .write_record(table.header())
        .map_err(|e| ExportError(format!("Failed to write header: {e}")))?;

    for (i, row) in table.rows().iter().enumerate() {
        let record = row.iter().map(|v| format!("{v}")).chain(
            table
                .extra_columns()
                .iter()
                .map(|c| c.values[i].clone()),
        );
        writer
            .write_record(record)
            .map_err(|e| ExportError(format!("Failed to write row {}: {e}", i + 1)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes).map_err(|e| ExportError(format!("CSV is not UTF-8: {e}")))
}
