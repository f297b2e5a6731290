//! HTTP API gateway for WifiSpot.
//!
//! Exposes the three acquisition modes as REST endpoints, plus health and
//! schema introspection. The pipeline is immutable, so handlers share it
//! through an `Arc` without locking.
//!
//! Built on Axum for high performance async HTTP.

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::rejection::JsonRejection;
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, info, warn};

use wifispot_core::{
    AcquisitionMode, BatchPrediction, Error, InferenceError, PartialObservation, SchemaInfo,
    SinglePrediction, ValidationError,
};
use wifispot_pipeline::{EXPORT_FILE_NAME, SpotPipeline};

/// Shared application state for the gateway.
pub struct GatewayState {
    pub pipeline: Arc<SpotPipeline>,
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(pipeline: Arc<SpotPipeline>, max_upload_bytes: usize) -> Router {
    let state = Arc::new(GatewayState { pipeline });

    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/schema", get(schema_handler))
        .route("/v1/predict/manual", post(manual_handler))
        .route("/v1/predict/upload", post(upload_handler))
        .route("/v1/predict/snapshot", post(snapshot_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Artifacts are loaded once before the listener binds; a deployment whose
/// dataset or model cannot be loaded never starts serving.
pub async fn start(config: wifispot_config::AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;
    let addr = format!("{host}:{port}");

    let pipeline = Arc::new(SpotPipeline::from_config(&config)?);
    info!(
        features = pipeline.schema().len(),
        fingerprint = %pipeline.schema().fingerprint(),
        model = pipeline.classifier_name(),
        "Pipeline ready"
    );

    let app = build_router(pipeline, config.gateway.max_upload_bytes);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Errors ---

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// A pipeline error on its way to becoming an HTTP response.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

/// A request body that did not deserialize is the caller's mistake.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(Error::Validation(ValidationError::Malformed {
            row: 0,
            column: "body".into(),
            reason: rejection.body_text(),
        }))
    }
}

fn unexpected_outcome(mode: &str) -> ApiError {
    ApiError(Error::Inference(InferenceError::Model(format!(
        "{mode} mode produced the wrong kind of outcome"
    ))))
}

fn run_single(pipeline: &SpotPipeline, mode: AcquisitionMode) -> Result<SinglePrediction, ApiError> {
    let name = mode.name();
    pipeline
        .run(mode)?
        .into_single()
        .ok_or_else(|| unexpected_outcome(name))
}

fn run_batch(pipeline: &SpotPipeline, mode: AcquisitionMode) -> Result<BatchPrediction, ApiError> {
    let name = mode.name();
    pipeline
        .run(mode)?
        .into_batch()
        .ok_or_else(|| unexpected_outcome(name))
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(ValidationError::SchemaMismatch { .. })
        | Error::Validation(ValidationError::RangeViolation { .. }) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::Artifact(_) | Error::Config { .. } => StatusCode::SERVICE_UNAVAILABLE,
        Error::Inference(_) | Error::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_internal() {
            error!(kind = self.0.kind(), error = %self.0, "Internal prediction failure");
        } else {
            warn!(kind = self.0.kind(), error = %self.0, "Request rejected");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
                kind: self.0.kind().to_string(),
            }),
        )
            .into_response()
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    model: String,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        model: state.pipeline.classifier_name().to_string(),
    })
}

async fn schema_handler(State(state): State<SharedState>) -> Json<SchemaInfo> {
    Json(state.pipeline.schema().info())
}

#[derive(Debug, Deserialize)]
struct ManualRequest {
    readings: PartialObservation,
}

/// Feature readings as a JSON object whose keys follow schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Readings(pub Vec<(String, f64)>);

impl Serialize for Readings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, value)| (name, value)))
    }
}

impl<'de> Deserialize<'de> for Readings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReadingsVisitor;

        impl<'de> Visitor<'de> for ReadingsVisitor {
            type Value = Readings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of feature names to RSSI values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Readings, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, f64>()? {
                    pairs.push((name, value));
                }
                Ok(Readings(pairs))
            }
        }

        deserializer.deserialize_map(ReadingsVisitor)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SpotResponse {
    pub spot: String,
    pub simulated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readings: Option<Readings>,
}

impl SpotResponse {
    fn from_single(single: SinglePrediction, pipeline: &SpotPipeline) -> Self {
        let readings = single.simulated.then(|| {
            Readings(
                single
                    .observation
                    .labeled(pipeline.schema())
                    .into_iter()
                    .map(|(name, value)| (name.to_string(), value))
                    .collect(),
            )
        });
        Self {
            spot: single.spot.0,
            simulated: single.simulated,
            readings,
        }
    }
}

async fn manual_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ManualRequest>, JsonRejection>,
) -> Result<Json<SpotResponse>, ApiError> {
    let Json(payload) = payload?;
    info!(readings = payload.readings.len(), "v1/predict/manual request");
    let single = run_single(&state.pipeline, AcquisitionMode::Manual(payload.readings))?;
    Ok(Json(SpotResponse::from_single(single, &state.pipeline)))
}

async fn upload_handler(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    info!(bytes = body.len(), "v1/predict/upload request");
    let table = state.pipeline.read_upload(body.as_ref())?;
    let batch = run_batch(&state.pipeline, AcquisitionMode::Upload(table))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        batch.csv,
    )
        .into_response())
}

async fn snapshot_handler(State(state): State<SharedState>) -> Result<Json<SpotResponse>, ApiError> {
    info!("v1/predict/snapshot request");
    let single = run_single(&state.pipeline, AcquisitionMode::Snapshot)?;
    Ok(Json(SpotResponse::from_single(single, &state.pipeline)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use wifispot_core::{
        Classifier, FeatureSchema, FullObservation, InferenceError, Prediction,
    };

    /// "near" when AP1 is stronger than -60 dBm, otherwise "far".
    struct Threshold;

    impl Classifier for Threshold {
        fn name(&self) -> &str {
            "threshold"
        }
        fn n_features(&self) -> usize {
            3
        }
        fn predict(&self, rows: &[FullObservation]) -> Result<Vec<Prediction>, InferenceError> {
            wifispot_core::classifier::check_shape(rows, 3)?;
            Ok(rows
                .iter()
                .map(|r| Prediction::new(if r.values()[0] > -60.0 { "near" } else { "far" }))
                .collect())
        }
    }

    fn test_router() -> Router {
        let schema =
            FeatureSchema::from_columns(["AP1", "AP2", "AP3", "spot"], "spot", 2).unwrap();
        let pipeline = SpotPipeline::new(schema, Arc::new(Threshold)).unwrap();
        build_router(Arc::new(pipeline), 1024 * 1024)
    }

    async fn body_bytes(response: Response) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_endpoint() {
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn schema_endpoint_lists_features() {
        let req = Request::builder()
            .uri("/v1/schema")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let info: SchemaInfo = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(info.features, vec!["AP1", "AP2", "AP3"]);
        assert_eq!(info.manual_features, vec!["AP1", "AP2"]);
        assert_eq!(info.fingerprint.len(), 16);
    }

    #[tokio::test]
    async fn manual_prediction() {
        let req = post_json(
            "/v1/predict/manual",
            serde_json::json!({ "readings": { "AP1": -50, "AP2": -70 } }),
        );

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resp: SpotResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(resp.spot, "near");
        assert!(!resp.simulated);
        assert!(resp.readings.is_none());
    }

    #[tokio::test]
    async fn manual_out_of_range_is_unprocessable() {
        let req = post_json(
            "/v1/predict/manual",
            serde_json::json!({ "readings": { "AP1": -150, "AP2": -70 } }),
        );

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.kind, "range_violation");
    }

    #[tokio::test]
    async fn manual_unknown_feature_is_bad_request() {
        let req = post_json(
            "/v1/predict/manual",
            serde_json::json!({ "readings": { "AP1": -50, "AP2": -70, "AP3": -80 } }),
        );

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn upload_returns_csv_attachment() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/upload")
            .header("content-type", "text/csv")
            .body(Body::from("AP3,AP1,AP2\n-100,-50,-70\n-100,-80,-70\n"))
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"predicted_output.csv\""
        );

        let csv = String::from_utf8(body_bytes(response).await.to_vec()).unwrap();
        assert_eq!(
            csv,
            "AP3,AP1,AP2,Predicted Spot\n-100,-50,-70,near\n-100,-80,-70,far\n"
        );
    }

    #[tokio::test]
    async fn upload_schema_mismatch_is_unprocessable() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/upload")
            .body(Body::from("AP1,AP2\n-50,-70\n"))
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.kind, "schema_mismatch");
        assert!(err.error.contains("AP3"));
    }

    #[tokio::test]
    async fn upload_with_text_cell_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/upload")
            .body(Body::from("AP1,AP2,AP3\n-50,weak,-70\n"))
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn snapshot_is_flagged_simulated() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/snapshot")
            .body(Body::empty())
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resp: SpotResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(resp.simulated);
        let readings = resp.readings.unwrap().0;
        assert_eq!(readings.len(), 3);
        assert!(readings.iter().all(|(_, v)| (-90.0..-40.0).contains(v)));
    }

    #[tokio::test]
    async fn snapshot_readings_follow_schema_order() {
        let schema =
            FeatureSchema::from_columns(["AP9", "AP10", "AP2", "spot"], "spot", 2).unwrap();
        let pipeline = SpotPipeline::new(schema, Arc::new(Threshold)).unwrap();
        let router = build_router(Arc::new(pipeline), 1024);

        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/snapshot")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(req).await.unwrap();

        let resp: SpotResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let names: Vec<String> = resp.readings.unwrap().0.into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["AP9", "AP10", "AP2"]);
    }

    #[tokio::test]
    async fn manual_non_numeric_reading_is_bad_request() {
        let req = post_json(
            "/v1/predict/manual",
            serde_json::json!({ "readings": { "AP1": "strong", "AP2": -70 } }),
        );

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.kind, "invalid_input");
    }

    #[tokio::test]
    async fn manual_unparseable_body_is_bad_request() {
        let req = Request::builder()
            .method("POST")
            .uri("/v1/predict/manual")
            .header("content-type", "application/json")
            .body(Body::from("{\"readings\": "))
            .unwrap();

        let response = test_router().oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let err: ErrorResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(err.kind, "invalid_input");
    }

    #[test]
    fn internal_errors_map_to_500() {
        let err = Error::Inference(InferenceError::Model("boom".into()));
        assert_eq!(status_for(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
