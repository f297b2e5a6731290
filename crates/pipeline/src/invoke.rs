//! Inference invoker: the single point where the classifier is called.
//!
//! Rows arrive already schema-ordered and range-checked. A whole batch is
//! one classifier call so output order matches input order. A classifier
//! that rejects the shape or returns the wrong number of labels indicates a
//! broken invariant upstream, reported as `InferenceError`.

use std::sync::Arc;
use std::time::Instant;

use wifispot_core::{Classifier, FullObservation, InferenceError, Prediction};

#[derive(Clone)]
pub struct InferenceInvoker {
    classifier: Arc<dyn Classifier>,
}

impl InferenceInvoker {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Predict the spot for a single observation.
    pub fn predict_one(&self, row: &FullObservation) -> Result<Prediction, InferenceError> {
        let mut predictions = self.predict_all(std::slice::from_ref(row))?;
        predictions.pop().ok_or(InferenceError::OutputLength {
            expected: 1,
            actual: 0,
        })
    }

    /// Predict one spot per row, in row order.
    pub fn predict_all(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let started = Instant::now();
        let predictions = self.classifier.predict(rows).inspect_err(|e| {
            tracing::error!(model = self.classifier.name(), error = %e, "Classifier rejected input");
        })?;

        if predictions.len() != rows.len() {
            return Err(InferenceError::OutputLength {
                expected: rows.len(),
                actual: predictions.len(),
            });
        }

        tracing::debug!(
            model = self.classifier.name(),
            rows = rows.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Inference complete"
        );

        Ok(predictions)
    }
}

impl std::fmt::Debug for InferenceInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceInvoker")
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Labels each row with the index of its strongest reading and
    /// records every call it receives.
    struct StrongestAp {
        width: usize,
        calls: Mutex<Vec<usize>>,
    }

    impl Classifier for StrongestAp {
        fn name(&self) -> &str {
            "strongest_ap"
        }
        fn n_features(&self) -> usize {
            self.width
        }
        fn predict(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError> {
            self.calls.lock().unwrap().push(rows.len());
            wifispot_core::classifier::check_shape(rows, self.width)?;
            Ok(rows
                .iter()
                .map(|r| {
                    let (idx, _) = r
                        .values()
                        .iter()
                        .enumerate()
                        .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
                    Prediction::new(format!("AP{}", idx + 1))
                })
                .collect())
        }
    }

    /// Drops the first label, as a broken model would.
    struct Lossy;

    impl Classifier for Lossy {
        fn name(&self) -> &str {
            "lossy"
        }
        fn n_features(&self) -> usize {
            2
        }
        fn predict(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError> {
            Ok(rows.iter().skip(1).map(|_| Prediction::new("x")).collect())
        }
    }

    #[test]
    fn batch_is_one_call_in_row_order() {
        let model = Arc::new(StrongestAp {
            width: 2,
            calls: Mutex::new(Vec::new()),
        });
        let invoker = InferenceInvoker::new(model.clone());
        let preds = invoker
            .predict_all(&[
                FullObservation::new(vec![-50.0, -90.0]),
                FullObservation::new(vec![-90.0, -50.0]),
                FullObservation::new(vec![-40.0, -90.0]),
            ])
            .unwrap();
        assert_eq!(
            preds,
            vec![
                Prediction::new("AP1"),
                Prediction::new("AP2"),
                Prediction::new("AP1")
            ]
        );
        assert_eq!(*model.calls.lock().unwrap(), vec![3]);
    }

    #[test]
    fn empty_batch_skips_classifier() {
        let model = Arc::new(StrongestAp {
            width: 2,
            calls: Mutex::new(Vec::new()),
        });
        let invoker = InferenceInvoker::new(model.clone());
        assert!(invoker.predict_all(&[]).unwrap().is_empty());
        assert!(model.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn shape_rejection_surfaces_as_inference_error() {
        let invoker = InferenceInvoker::new(Arc::new(StrongestAp {
            width: 3,
            calls: Mutex::new(Vec::new()),
        }));
        let err = invoker
            .predict_one(&FullObservation::new(vec![-50.0, -60.0]))
            .unwrap_err();
        assert!(matches!(err, InferenceError::ShapeMismatch { expected: 3, actual: 2 }));
    }

    #[test]
    fn short_output_is_detected() {
        let invoker = InferenceInvoker::new(Arc::new(Lossy));
        let err = invoker
            .predict_all(&[
                FullObservation::new(vec![-50.0, -60.0]),
                FullObservation::new(vec![-50.0, -60.0]),
            ])
            .unwrap_err();
        assert_eq!(err, InferenceError::OutputLength { expected: 2, actual: 1 });
    }

    #[test]
    fn single_prediction_from_lossy_model_fails() {
        let invoker = InferenceInvoker::new(Arc::new(Lossy));
        assert!(invoker.predict_one(&FullObservation::new(vec![-50.0, -60.0])).is_err());
    }
}
