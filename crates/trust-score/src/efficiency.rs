//! Trip efficiency check
//!
//! Flat deductions from a trip's summarized idle time and the vehicle's
//! fuel consumption, applied on top of the stored trust score.

use serde::{Deserialize, Serialize};
use tracing::info;

/// Efficiency thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EfficiencyConfig {
    /// Idle minutes per trip before the idle deduction applies
    pub idle_limit_minutes: f64,
    pub idle_penalty: u32,
    /// Fuel consumption limit (L/100km)
    pub fuel_limit_l_per_100km: f64,
    pub fuel_penalty: u32,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            idle_limit_minutes: 30.0,
            idle_penalty: 20,
            fuel_limit_l_per_100km: 12.0,
            fuel_penalty: 10,
        }
    }
}

/// Summarized trip telemetry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub idle_time_minutes: f64,
    pub avg_fuel_consumption: f64,
}

/// Result of an efficiency check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyReport {
    pub deduction: u32,
    pub reasons: Vec<String>,
}

impl EfficiencyReport {
    pub fn is_perfect(&self) -> bool {
        self.deduction == 0
    }

    /// New trust score after the deduction, floored at 0
    pub fn apply_to(&self, score: u32) -> u32 {
        score.saturating_sub(self.deduction)
    }

    pub fn summary(&self) -> String {
        if self.is_perfect() {
            "Efficiency perfect. No deductions.".to_string()
        } else {
            format!(
                "Efficiency analyzed. Deducted {} points: {}",
                self.deduction,
                self.reasons.join(", ")
            )
        }
    }
}

/// Efficiency rule evaluator
#[derive(Debug, Clone, Default)]
pub struct EfficiencyPolicy {
    config: EfficiencyConfig,
}

impl EfficiencyPolicy {
    pub fn new(config: EfficiencyConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, trip: &TripSummary) -> EfficiencyReport {
        let mut report = EfficiencyReport::default();

        if trip.idle_time_minutes > self.config.idle_limit_minutes {
            report.deduction += self.config.idle_penalty;
            report
                .reasons
                .push(format!("Excessive Idle Time (-{})", self.config.idle_penalty));
        }

        if trip.avg_fuel_consumption > self.config.fuel_limit_l_per_100km {
            report.deduction += self.config.fuel_penalty;
            report
                .reasons
                .push(format!("High Fuel Consumption (-{})", self.config.fuel_penalty));
        }

        info!("Trip efficiency: {}", report.summary());
        report
    }
}
