//! Hard braking detection with accident-avoidance correlation

use chrono::{DateTime, Utc};

use crate::config::ScoringConfig;
use crate::telemetry::TelemetryPoint;

/// Steering input that followed a hard brake
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringCorrection {
    pub timestamp: DateTime<Utc>,
    pub steering_angle: f64,
}

/// A single sample decelerating beyond the hard-brake threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardBrakeEvent {
    pub timestamp: DateTime<Utc>,
    pub acceleration_g: f64,
    /// First qualifying correction inside the mercy window, if any
    pub correction: Option<SteeringCorrection>,
}

impl HardBrakeEvent {
    pub fn was_avoidance(&self) -> bool {
        self.correction.is_some()
    }
}

/// Find hard-braking events in a time-sorted stream.
///
/// Every qualifying sample is its own event; events close together are not
/// merged. The correction window starts after the triggering sample and is
/// exclusive at `mercy_window_ms`.
pub fn hard_brake_events(sorted: &[TelemetryPoint], config: &ScoringConfig) -> Vec<HardBrakeEvent> {
    let window = config.mercy_window();

    sorted
        .iter()
        .enumerate()
        .filter_map(|(i, point)| {
            let g = point.acceleration_g.filter(|g| *g < config.hard_brake_g)?;

            let correction = sorted[i + 1..]
                .iter()
                .take_while(|next| next.timestamp - point.timestamp < window)
                .find_map(|next| {
                    next.steering_angle
                        .filter(|angle| angle.abs() > config.steering_correction_deg)
                        .map(|steering_angle| SteeringCorrection {
                            timestamp: next.timestamp,
                            steering_angle,
                        })
                });

            Some(HardBrakeEvent {
                timestamp: point.timestamp,
                acceleration_g: g,
                correction,
            })
        })
        .collect()
}
