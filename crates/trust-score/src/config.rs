//! Scoring configuration

use serde::{Deserialize, Serialize};

use crate::error::{check_range, ScoringError};

/// Keywords that mark a location as a traffic situation
pub const DEFAULT_TRAFFIC_KEYWORDS: [&str; 6] = [
    "highway",
    "traffic",
    "jam",
    "congestion",
    "intersection",
    "signal",
];

/// Trust score weights and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score every evaluation starts from (and the ceiling)
    pub initial_score: u32,

    /// Shortest idle segment that is charged (minutes)
    pub idle_threshold_minutes: f64,

    /// Idle minutes that cost one point (must be positive)
    pub idle_minutes_per_point: f64,

    /// Acceleration below this is hard braking (g, negative)
    pub hard_brake_g: f64,

    /// Points deducted per hard-braking event
    pub hard_brake_penalty: u32,

    /// Window after a hard brake in which a steering correction counts (ms, exclusive)
    pub mercy_window_ms: u64,

    /// Steering angle beyond which a correction counts (degrees, absolute)
    pub steering_correction_deg: f64,

    /// Points restored for an accident-avoidance maneuver
    pub mercy_points: u32,

    /// Points deducted per DSM fatigue alert
    pub fatigue_penalty: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            initial_score: 100,
            idle_threshold_minutes: 10.0,
            idle_minutes_per_point: 10.0,
            hard_brake_g: -0.5,
            hard_brake_penalty: 5,
            mercy_window_ms: 5000,
            steering_correction_deg: 15.0,
            mercy_points: 3,
            fatigue_penalty: 10,
        }
    }
}

impl ScoringConfig {
    /// Create strict config (lower tolerances, harsher penalties)
    pub fn strict() -> Self {
        Self {
            idle_threshold_minutes: 5.0,
            idle_minutes_per_point: 5.0,
            hard_brake_g: -0.4,
            mercy_window_ms: 3000,
            fatigue_penalty: 15,
            ..Default::default()
        }
    }

    /// Create lenient config (higher tolerances)
    pub fn lenient() -> Self {
        Self {
            idle_threshold_minutes: 15.0,
            idle_minutes_per_point: 15.0,
            hard_brake_g: -0.6,
            mercy_window_ms: 8000,
            ..Default::default()
        }
    }

    /// Reject weights that would make idle scoring meaningless
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_range("idle_threshold_minutes", self.idle_threshold_minutes, 0.0, f64::MAX)?;
        check_range(
            "idle_minutes_per_point",
            self.idle_minutes_per_point,
            f64::MIN_POSITIVE,
            f64::MAX,
        )
    }

    pub fn mercy_window(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(i64::try_from(self.mercy_window_ms).unwrap_or(i64::MAX))
    }
}

/// Traffic classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Case-insensitive substrings that mark a traffic location
    pub keywords: Vec<String>,

    /// Per-call budget for asynchronous classifiers (ms)
    pub timeout_ms: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_TRAFFIC_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            timeout_ms: 2000,
        }
    }
}

impl ClassifierConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}
