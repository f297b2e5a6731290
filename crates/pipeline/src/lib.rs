//! The WifiSpot prediction pipeline.
//!
//! Turns each acquisition mode's raw input into a schema-aligned vector,
//! invokes the classifier and packages the result:
//!
//! - manual: `reconcile` fills unobserved access points with -100
//! - upload: `dataset::read_table` then `validate` then `package`
//! - snapshot: `snapshot::simulate` draws a random scan
//!
//! [`SpotPipeline`] ties these together behind one `run` entry point.

pub mod dataset;
pub mod engine;
pub mod invoke;
pub mod package;
pub mod reconcile;
pub mod snapshot;
pub mod validate;

pub use dataset::{load_schema, read_reference_columns, read_table};
pub use engine::SpotPipeline;
pub use invoke::InferenceInvoker;
pub use package::{EXPORT_FILE_NAME, ExportOptions, package, to_csv};
pub use reconcile::reconcile;
pub use snapshot::simulate;
pub use validate::{ValidatedBatch, check_columns, validate_batch};
