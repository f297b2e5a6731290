//! The spot pipeline: one entry point per acquisition mode.
//!
//! `SpotPipeline` owns the feature schema, the classifier and the export
//! settings. It is immutable after construction and shared behind an `Arc`
//! by the CLI and the gateway.

use std::io::Read;
use std::sync::Arc;

use wifispot_config::AppConfig;
use wifispot_core::{
    AcquisitionMode, ArtifactError, BatchPrediction, Classifier, FeatureSchema, ModeOutcome,
    ObservationTable, PartialObservation, Result, SinglePrediction,
};
use wifispot_models::{ModelInfo, ensure_aligned};

use crate::dataset::{load_schema, read_table};
use crate::invoke::InferenceInvoker;
use crate::package::{ExportOptions, package};
use crate::reconcile::reconcile;
use crate::snapshot::simulate;
use crate::validate::validate_batch;

#[derive(Debug, Clone)]
pub struct SpotPipeline {
    schema: Arc<FeatureSchema>,
    invoker: InferenceInvoker,
    export: ExportOptions,
    model_info: Option<ModelInfo>,
}

impl SpotPipeline {
    /// Pair a schema with a classifier, rejecting models trained on a
    /// different feature layout.
    pub fn new(
        schema: FeatureSchema,
        classifier: Arc<dyn Classifier>,
    ) -> std::result::Result<Self, ArtifactError> {
        ensure_aligned(classifier.as_ref(), &schema)?;
        Ok(Self {
            schema: Arc::new(schema),
            invoker: InferenceInvoker::new(classifier),
            export: ExportOptions::default(),
            model_info: None,
        })
    }

    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = export;
        self
    }

    pub fn with_model_info(mut self, info: ModelInfo) -> Self {
        self.model_info = Some(info);
        self
    }

    /// Load the reference dataset and model named by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let schema = load_schema(
            &config.dataset.path,
            config.dataset.delimiter_byte(),
            &config.dataset.label_column,
            config.dataset.manual_features,
        )?;
        let loaded = wifispot_models::build_from_config(config, &schema)?;

        Ok(Self::new(schema, loaded.classifier)?
            .with_export(ExportOptions::from(&config.export))
            .with_model_info(loaded.info))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        self.model_info.as_ref()
    }

    pub fn classifier_name(&self) -> &str {
        self.invoker.classifier().name()
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.export
    }

    /// Run whichever mode was selected.
    pub fn run(&self, mode: AcquisitionMode) -> Result<ModeOutcome> {
        let name = mode.name();
        let outcome = match mode {
            AcquisitionMode::Manual(partial) => self.predict_manual(&partial).map(ModeOutcome::Single),
            AcquisitionMode::Upload(table) => self.predict_batch(table).map(ModeOutcome::Batch),
            AcquisitionMode::Snapshot => self.predict_snapshot().map(ModeOutcome::Single),
        };
        if let Err(ref e) = outcome {
            tracing::warn!(mode = name, kind = e.kind(), error = %e, "Prediction failed");
        }
        outcome
    }

    /// Manual entry: reconcile, then predict one vector.
    pub fn predict_manual(&self, partial: &PartialObservation) -> Result<SinglePrediction> {
        let observation = reconcile(&self.schema, partial)?;
        let spot = self.invoker.predict_one(&observation)?;
        tracing::info!(mode = "manual", spot = %spot, "Spot predicted");
        Ok(SinglePrediction {
            spot,
            observation,
            simulated: false,
        })
    }

    /// Upload: validate the whole table, predict every row, export.
    pub fn predict_batch(&self, table: ObservationTable) -> Result<BatchPrediction> {
        let batch = validate_batch(&self.schema, table)?;
        let predictions = self.invoker.predict_all(&batch.rows)?;
        let packaged = package(batch.table, predictions, &self.export)?;
        tracing::info!(
            mode = "upload",
            rows = packaged.table.row_count(),
            "Batch predicted"
        );
        Ok(packaged)
    }

    /// Snapshot: predict on a simulated scan.
    pub fn predict_snapshot(&self) -> Result<SinglePrediction> {
        let observation = simulate(&self.schema);
        let spot = self.invoker.predict_one(&observation)?;
        tracing::info!(mode = "snapshot", spot = %spot, "Spot predicted from simulated scan");
        Ok(SinglePrediction {
            spot,
            observation,
            simulated: true,
        })
    }

    /// Parse uploaded CSV bytes with the configured delimiter.
    pub fn read_upload<R: Read>(&self, input: R) -> Result<ObservationTable> {
        Ok(read_table(input, self.export.delimiter)?)
    }
}
