//! HTTP API for the race outcome prediction service
//!
//! Session/feature queries degrade to explicitly marked synthetic data when
//! the upstream timing service cannot supply a session; prediction fails
//! fast when no model is loaded.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use gridcast_lib::{
    features::{extract_session, stint_breakdown},
    health::{components, HealthRegistry},
    predictor::{rank_predictions, Regressor},
    provider::{SessionProvider, SyntheticGenerator, SYNTHETIC_FROM_SEASON},
    Error, PredictedDelta, PredictionInput, ServiceMetrics, SessionFeatures,
};
use prometheus::{Encoder, TextEncoder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Shared application state, constructed once at startup and immutable
/// afterwards
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn SessionProvider>,
    /// Absent until a trained model is supplied; /predict answers 503
    /// meanwhile
    pub regressor: Option<Arc<dyn Regressor>>,
    pub health: HealthRegistry,
    pub metrics: ServiceMetrics,
}

/// Prediction request body
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub drivers: Vec<PredictionInput>,
    #[serde(default)]
    pub weather: Weather,
}

#[derive(Debug, Default, Deserialize)]
pub struct Weather {
    #[serde(default)]
    pub is_wet: bool,
}

fn error_response(error: &Error) -> Response {
    let status = match error {
        Error::ModelMissing => StatusCode::SERVICE_UNAVAILABLE,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
        Error::ModelFailure(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = json!({ "error": error.to_string(), "kind": error.kind() });
    (status, Json(body)).into_response()
}

fn session_response(
    year: u16,
    round: u8,
    source: &'static str,
    features: SessionFeatures,
) -> Response {
    let body = json!({
        "year": year,
        "round": round,
        "event": features.event_name,
        "source": source,
        "is_wet": features.is_wet,
        "drivers": features.drivers,
        "skipped": features.skipped,
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// Season schedule; substitutes the projected calendar for future seasons
/// the upstream does not know yet
async fn get_races(State(state): State<Arc<AppState>>, Path(year): Path<u16>) -> Response {
    state.metrics.inc_requests("races");

    let events = match state.provider.event_schedule(year).await {
        Ok(events) => {
            state.health.set_healthy(components::PROVIDER).await;
            events
        }
        Err(Error::UpstreamUnavailable(reason)) => {
            state.metrics.inc_upstream_failures();
            state
                .health
                .set_degraded(components::PROVIDER, reason.clone())
                .await;
            warn!(year, %reason, "schedule unavailable upstream");
            Vec::new()
        }
        Err(error) => return error_response(&error),
    };

    if events.is_empty() && year >= SYNTHETIC_FROM_SEASON {
        state.metrics.inc_synthetic_responses();
        let events = SyntheticGenerator::event_schedule();
        let body = json!({ "year": year, "source": "synthetic", "events": events });
        return (StatusCode::OK, Json(body)).into_response();
    }

    let body = json!({ "year": year, "source": "timing", "events": events });
    (StatusCode::OK, Json(body)).into_response()
}

/// Per-driver feature records for one race session
async fn get_race(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u8)>,
) -> Response {
    state.metrics.inc_requests("race");

    match state.provider.race_session(year, round).await {
        Ok(session) => {
            state.health.set_healthy(components::PROVIDER).await;
            let features = extract_session(&session);
            session_response(year, round, "timing", features)
        }
        Err(Error::UpstreamUnavailable(reason)) => {
            state.metrics.inc_upstream_failures();
            state.metrics.inc_synthetic_responses();
            state
                .health
                .set_degraded(components::PROVIDER, reason.clone())
                .await;
            info!(year, round, %reason, "substituting synthetic session");
            let features = SyntheticGenerator::for_event(year, round).session_features(round);
            session_response(year, round, "synthetic", features)
        }
        Err(error) => error_response(&error),
    }
}

/// Per-driver stint breakdown for one race session
async fn get_strategy(
    State(state): State<Arc<AppState>>,
    Path((year, round)): Path<(u16, u8)>,
) -> Response {
    state.metrics.inc_requests("strategy");

    match state.provider.race_session(year, round).await {
        Ok(session) => {
            state.health.set_healthy(components::PROVIDER).await;
            (StatusCode::OK, Json(stint_breakdown(&session))).into_response()
        }
        Err(Error::UpstreamUnavailable(reason)) => {
            state.metrics.inc_upstream_failures();
            state
                .health
                .set_degraded(components::PROVIDER, reason.clone())
                .await;
            info!(year, round, %reason, "no strategy data for session");
            // No stint data exists for a session that has not run
            (StatusCode::OK, Json(json!([]))).into_response()
        }
        Err(error) => error_response(&error),
    }
}

/// Largest grid position accepted in a prediction request; keeps downstream
/// rank arithmetic comfortably inside i32
const MAX_GRID_POSITION: u32 = 100;

fn validate_predict_request(request: &PredictRequest) -> Result<(), Error> {
    if request.drivers.is_empty() {
        return Err(Error::InvalidInput("drivers list is empty".to_string()));
    }
    for driver in &request.drivers {
        if driver.code.trim().is_empty() {
            return Err(Error::InvalidInput(
                "driver code must not be empty".to_string(),
            ));
        }
        if driver.grid == 0 || driver.grid > MAX_GRID_POSITION {
            return Err(Error::InvalidInput(format!(
                "driver {}: grid position must be between 1 and {MAX_GRID_POSITION}",
                driver.code
            )));
        }
        if !driver.pace_delta.is_finite() || !driver.consistency.is_finite() {
            return Err(Error::InvalidInput(format!(
                "driver {}: pace figures must be finite",
                driver.code
            )));
        }
    }
    Ok(())
}

/// Predict the finishing order for a caller-supplied field of drivers
async fn predict(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    state.metrics.inc_requests("predict");

    // A body that fails deserialization is the same class of caller error
    // as a semantically invalid one
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            return error_response(&Error::InvalidInput(rejection.body_text()));
        }
    };

    let Some(regressor) = &state.regressor else {
        return error_response(&Error::ModelMissing);
    };
    if let Err(error) = validate_predict_request(&request) {
        return error_response(&error);
    }

    let is_wet = request.weather.is_wet;
    let start = Instant::now();

    let mut predictions = Vec::with_capacity(request.drivers.len());
    for driver in &request.drivers {
        let features = driver.feature_vector(is_wet);
        match regressor.predict_delta(&features) {
            Ok(delta) => predictions.push(PredictedDelta {
                code: driver.code.clone(),
                grid: driver.grid,
                delta,
            }),
            Err(error) => return error_response(&Error::ModelFailure(error)),
        }
    }

    state
        .metrics
        .observe_inference_latency(start.elapsed().as_secs_f64());

    let ranked = rank_predictions(predictions);
    (StatusCode::OK, Json(ranked)).into_response()
}

/// Health check - 200 while at least degraded, 503 when unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> Response {
    use gridcast_lib::ComponentStatus;

    let health = state.health.health().await;
    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health)).into_response()
}

/// Readiness check - 200 once startup completed
async fn readyz(State(state): State<Arc<AppState>>) -> Response {
    let readiness = state.health.readiness().await;
    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status_code, Json(readiness)).into_response()
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(error) = encoder.encode(&metric_families, &mut buffer) {
        return error_response(&Error::Internal(error.into()));
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/races/:year", get(get_races))
        .route("/race/:year/:round", get(get_race))
        .route("/race/:year/:round/strategy", get(get_strategy))
        .route("/predict", post(predict))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
