//! Trust Score Routes

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use trust_score::simulation::{reference_scenario, REFERENCE_TEST_CASE};
use trust_score::{DsmEvent, DsmEventRecord, ScoreBreakdown, TelemetryPoint, TelemetryRecord};

use crate::{ApiError, AppState};

/// Request body for an evaluation
#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub driver_id: String,
    #[serde(default)]
    pub telemetry: Vec<TelemetryRecord>,
    #[serde(default)]
    pub dsm_events: Vec<DsmEventRecord>,
}

/// Response for the simulation endpoint
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub test_case: &'static str,
    pub result: ScoreBreakdown,
}

/// Evaluate a driver's trust score
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<ScoreBreakdown>, ApiError> {
    let telemetry = request
        .telemetry
        .into_iter()
        .map(TelemetryPoint::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let dsm_events = request
        .dsm_events
        .into_iter()
        .map(DsmEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let breakdown = state
        .evaluator
        .evaluate(&request.driver_id, &telemetry, &dsm_events)?;
    record_score(&breakdown);

    Ok(Json(breakdown))
}

/// Run the reference trip anchored at the current time
pub async fn simulate_driver(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let scenario = reference_scenario(Utc::now());
    info!("[Simulation] Calculating Trust Score for {}...", scenario.driver_id);

    let result = state
        .evaluator
        .evaluate(&scenario.driver_id, &scenario.telemetry, &scenario.dsm_events)?;
    record_score(&result);

    Ok(Json(SimulationResponse {
        test_case: REFERENCE_TEST_CASE,
        result,
    }))
}

fn record_score(breakdown: &ScoreBreakdown) {
    metrics::counter!("trust_evaluations_total").increment(1);
    metrics::histogram!("trust_final_score").record(f64::from(breakdown.final_score));
}
