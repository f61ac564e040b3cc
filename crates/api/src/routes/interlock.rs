//! Sobriety Interlock Routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use sobriety::{parse_breath_frame, BreathReading, InterlockDecision, InterlockSubject};

use crate::{ApiError, AppState};

/// Raw analyzer frame plus the subject it belongs to
#[derive(Debug, Deserialize)]
pub struct BreathRequest {
    pub raw: String,
    #[serde(default)]
    pub subject: InterlockSubject,
}

/// Direct alcohol level check before a trip starts
#[derive(Debug, Deserialize)]
pub struct AlcoholCheckRequest {
    pub alcohol_level: f64,
    #[serde(default)]
    pub subject: InterlockSubject,
}

#[derive(Debug, Serialize)]
pub struct BreathResponse {
    pub reading: BreathReading,
    pub decision: InterlockDecision,
}

/// Parse a breath analyzer frame and decide the interlock outcome
pub async fn process_breath(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BreathRequest>,
) -> Result<Json<BreathResponse>, ApiError> {
    info!("Processing breath data: {:?}", request.raw);
    let reading = parse_breath_frame(&request.raw)?;
    let decision = state.interlock.decide(&reading, &request.subject);
    record_decision(&decision);

    Ok(Json(BreathResponse { reading, decision }))
}

pub async fn check_alcohol(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AlcoholCheckRequest>,
) -> Json<InterlockDecision> {
    let decision = state
        .interlock
        .check_alcohol_level(request.alcohol_level, &request.subject);
    record_decision(&decision);

    Json(decision)
}

fn record_decision(decision: &InterlockDecision) {
    if decision.is_violation() {
        metrics::counter!("sobriety_violations_total").increment(1);
    }
}
