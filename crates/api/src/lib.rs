//! Fleet Scoring API Server
//!
//! REST API exposing driver trust scoring, the sobriety interlock and trip
//! efficiency checks to the fleet back office.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod error;
mod routes;

pub use config::{load_config, LoggingConfig, ServiceConfig, DEFAULT_CONFIG_PATH};
pub use error::ApiError;

use sobriety::InterlockPolicy;
use trust_score::{EfficiencyPolicy, ScoringConfig, TrustEvaluator};

/// Application state shared across handlers
pub struct AppState {
    pub evaluator: TrustEvaluator,
    pub interlock: InterlockPolicy,
    pub efficiency: EfficiencyPolicy,
    /// Prometheus handle, when the exporter is installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: &ServiceConfig) -> Self {
        Self {
            evaluator: TrustEvaluator::with_keywords(config.scoring.clone(), &config.classifier),
            interlock: InterlockPolicy::new(config.interlock.clone()),
            efficiency: EfficiencyPolicy::new(config.efficiency.clone()),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub scoring: ScoringConfig,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/trust/evaluate", post(routes::trust::evaluate))
        .route("/api/v1/simulate/driver", get(routes::trust::simulate_driver))
        .route("/api/v1/sobriety/breath", post(routes::interlock::process_breath))
        .route("/api/v1/sobriety/check", post(routes::interlock::check_alcohol))
        .route("/api/v1/efficiency", post(routes::efficiency::analyze))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        scoring: state.evaluator.config().clone(),
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state
        .metrics
        .as_ref()
        .map(PrometheusHandle::render)
        .ok_or(ApiError::MetricsDisabled)
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = config.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Run the server
pub async fn run_server(config: ServiceConfig) -> anyhow::Result<()> {
    let mut state = AppState::new(&config);
    if config.metrics_enabled {
        state = state.with_metrics(PrometheusBuilder::new().install_recorder()?);
    }
    let app = create_router(Arc::new(state));

    info!("Starting API server on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::new(&ServiceConfig::default())))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(get_request("/api/v1/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["scoring"]["initial_score"], 100);
    }

    #[tokio::test]
    async fn test_evaluate() {
        let request = post_json(
            "/api/v1/trust/evaluate",
            json!({
                "driver_id": "driver-7",
                "telemetry": [
                    {"timestamp": "2024-05-20T08:00:02Z", "speed": 75.0, "engine_on": true, "steering_angle": 25.0},
                    {"timestamp": "2024-05-20T08:00:00Z", "speed": 80.0, "engine_on": true, "acceleration_g": -0.8}
                ],
                "dsm_events": [
                    {"timestamp": "2024-05-20T07:30:00Z", "type": "FATIGUE", "confidence": 0.95},
                    {"timestamp": "2024-05-20T07:40:00Z", "type": "PHONE_USAGE", "confidence": 0.6}
                ]
            }),
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["driver_id"], "driver-7");
        assert_eq!(body["final_score"], 88);
        assert_eq!(body["penalties"]["safety"], 5);
        assert_eq!(body["mercy_restored"], 3);
        assert_eq!(body["reasons"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_evaluate_rejects_bad_timestamp() {
        let request = post_json(
            "/api/v1/trust/evaluate",
            json!({
                "driver_id": "driver-7",
                "telemetry": [{"timestamp": "not-a-time", "speed": 0.0, "engine_on": true}]
            }),
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("not-a-time"));
    }

    #[tokio::test]
    async fn test_simulate_driver() {
        let (status, body) = send(get_request("/api/v1/simulate/driver")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["final_score"], 86);
        assert_eq!(body["result"]["penalties"]["idle"], 2);
    }

    #[tokio::test]
    async fn test_breath_failure() {
        let request = post_json(
            "/api/v1/sobriety/breath",
            json!({
                "raw": "2026-02-12,08:00,F,0.05",
                "subject": {"driver_name": "Viper", "license_plate": "VIP-001"}
            }),
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reading"]["status"], "FAIL");
        assert_eq!(body["decision"]["immobilize"], true);
        assert_eq!(body["decision"]["score_deduction"], 100);
    }

    #[tokio::test]
    async fn test_breath_without_status() {
        let request = post_json("/api/v1/sobriety/breath", json!({"raw": "2026-02-12,08:00"}));
        let (status, _) = send(request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_alcohol_check() {
        let request = post_json("/api/v1/sobriety/check", json!({"alcohol_level": 0.0}));
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PASS");
        assert_eq!(body["suspend_driver"], false);
    }

    #[tokio::test]
    async fn test_efficiency() {
        let request = post_json(
            "/api/v1/efficiency",
            json!({
                "summary": {"idle_time_minutes": 42.0, "avg_fuel_consumption": 10.5},
                "current_score": 95
            }),
        );
        let (status, body) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["new_score"], 75);
        assert_eq!(body["report"]["deduction"], 20);
    }

    #[tokio::test]
    async fn test_metrics_disabled_without_exporter() {
        let (status, _) = send(get_request("/metrics")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
