//! Driver Trust Scoring
//!
//! Scores a driver over one evaluation window (usually a trip) from:
//! - Telemetry (speed, engine state, location context, g-force, steering)
//! - DSM events (fatigue, distraction, phone usage)
//!
//! Produces a bounded score with an auditable breakdown. The traffic
//! classifier that decides idle waivers is injected, so a model-backed
//! classifier can replace the keyword matcher.

pub mod braking;
pub mod breakdown;
pub mod classifier;
pub mod config;
pub mod efficiency;
mod error;
pub mod evaluator;
pub mod idle;
pub mod simulation;
pub mod telemetry;

pub use breakdown::{Finding, Penalties, ScoreBreakdown};
pub use classifier::{AsyncTrafficClassifier, KeywordClassifier, TrafficClassifier};
pub use config::{ClassifierConfig, ScoringConfig};
pub use efficiency::{EfficiencyConfig, EfficiencyPolicy, EfficiencyReport, TripSummary};
pub use error::ScoringError;
pub use evaluator::TrustEvaluator;
pub use telemetry::{
    DsmEvent, DsmEventRecord, DsmEventType, GeoPoint, TelemetryPoint, TelemetryRecord,
};
