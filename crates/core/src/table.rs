//! Observation tables: bulk RSSI rows as read from an uploaded file.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ValidationError};

/// A non-numeric column appended after inference (e.g. the predicted spot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraColumn {
    pub name: String,
    pub values: Vec<String>,
}

/// Rows of numeric readings under named columns, in input column order.
///
/// Column order is whatever the source file used; the batch validator
/// produces schema-ordered vectors separately so this table can be exported
/// exactly as it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationTable {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    extra: Vec<ExtraColumn>,
}

impl ObservationTable {
    /// Build a table; every row must have one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ValidationError::Malformed {
                    row: i + 1,
                    column: columns
                        .get(row.len())
                        .cloned()
                        .unwrap_or_else(|| "<extra>".into()),
                    reason: format!("expected {} values, found {}", columns.len(), row.len()),
                });
            }
        }
        Ok(Self {
            columns,
            rows,
            extra: Vec::new(),
        })
    }

    /// Numeric column names in input order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appended text columns, in append order.
    pub fn extra_columns(&self) -> &[ExtraColumn] {
        &self.extra
    }

    /// Every column name: numeric columns first, then appended ones.
    pub fn header(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(String::as_str)
            .chain(self.extra.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Values of a numeric column, top to bottom.
    pub fn column_values(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Append a text column holding one value per row.
    pub fn append_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<(), ExportError> {
        let name = name.into();
        if values.len() != self.rows.len() {
            return Err(ExportError(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }
        if self.header().contains(&name.as_str()) {
            return Err(ExportError(format!("column '{name}' already exists")));
        }
        self.extra.push(ExtraColumn { name, values });
        Ok(())
    }
}
