//! Trip Efficiency Routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use trust_score::{EfficiencyReport, TripSummary};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct EfficiencyRequest {
    pub summary: TripSummary,
    /// Driver's stored trust score before this trip
    pub current_score: u32,
}

#[derive(Debug, Serialize)]
pub struct EfficiencyResponse {
    pub message: String,
    pub new_score: u32,
    pub report: EfficiencyReport,
}

/// Apply trip efficiency deductions to a stored score
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EfficiencyRequest>,
) -> Json<EfficiencyResponse> {
    let report = state.efficiency.analyze(&request.summary);

    Json(EfficiencyResponse {
        message: report.summary(),
        new_score: report.apply_to(request.current_score),
        report,
    })
}
