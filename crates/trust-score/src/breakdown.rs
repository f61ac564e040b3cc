//! Score breakdown and audit trail

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Deductions per category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Penalties {
    pub idle: u32,
    pub safety: u32,
    pub fatigue: u32,
}

impl Penalties {
    pub fn total(&self) -> u32 {
        self.idle
            .saturating_add(self.safety)
            .saturating_add(self.fatigue)
    }
}

/// One scoring decision, in the order it was detected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// Parking idle charged against the idle bucket
    IdlePenalty {
        points: u32,
        minutes: f64,
        location: String,
    },

    /// Idle in traffic, recorded without a deduction
    IdleWaived { minutes: f64, location: String },

    HardBraking {
        at: DateTime<Utc>,
        acceleration_g: f64,
        points: u32,
    },

    /// Hard brake followed by an avoidance steering correction
    Mercy {
        at: DateTime<Utc>,
        steering_angle: f64,
        points: u32,
    },

    Fatigue {
        at: DateTime<Utc>,
        confidence: f64,
        points: u32,
    },
}

fn iso(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::IdlePenalty {
                points,
                minutes,
                location,
            } => write!(
                f,
                "Lost {} points for idling {:.1} mins at {}.",
                points, minutes, location
            ),
            Finding::IdleWaived { minutes, location } => write!(
                f,
                "Idle penalty waived: {:.1} mins detected as Traffic at {}.",
                minutes, location
            ),
            Finding::HardBraking {
                at, acceleration_g, ..
            } => write!(f, "Hard Braking detected at {} ({}g).", iso(at), acceleration_g),
            Finding::Mercy { points, .. } => write!(
                f,
                "Mercy: Hard Braking was Accident Avoidance. Restored {} points.",
                points
            ),
            Finding::Fatigue { at, .. } => write!(f, "DSM Fatigue Alert at {}.", iso(at)),
        }
    }
}

/// Result of one trust evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub driver_id: String,
    pub final_score: u32,
    pub initial_score: u32,
    pub penalties: Penalties,
    pub mercy_restored: u32,
    /// Human-readable audit trail; `reasons[i]` renders `findings[i]`
    pub reasons: Vec<String>,
    pub findings: Vec<Finding>,
    /// Classifications that fell back to "not traffic"
    #[serde(default)]
    pub degraded_classifications: u32,
}

impl ScoreBreakdown {
    /// Nothing was deducted or restored
    pub fn is_clean(&self) -> bool {
        self.penalties.total() == 0 && self.mercy_restored == 0
    }
}

/// Accumulates findings into penalty buckets
#[derive(Debug, Default)]
pub(crate) struct ScoreTally {
    penalties: Penalties,
    mercy_restored: u32,
    findings: Vec<Finding>,
    degraded: u32,
}

impl ScoreTally {
    pub(crate) fn record(&mut self, finding: Finding) {
        match &finding {
            Finding::IdlePenalty { points, .. } => {
                self.penalties.idle = self.penalties.idle.saturating_add(*points)
            }
            Finding::IdleWaived { .. } => {}
            Finding::HardBraking { points, .. } => {
                self.penalties.safety = self.penalties.safety.saturating_add(*points)
            }
            Finding::Mercy { points, .. } => {
                self.mercy_restored = self.mercy_restored.saturating_add(*points)
            }
            Finding::Fatigue { points, .. } => {
                self.penalties.fatigue = self.penalties.fatigue.saturating_add(*points)
            }
        }
        self.findings.push(finding);
    }

    pub(crate) fn degraded(&mut self) {
        self.degraded += 1;
    }

    /// Clamp the running score into `[0, initial_score]`
    pub(crate) fn finish(self, driver_id: &str, initial_score: u32) -> ScoreBreakdown {
        let raw = i64::from(initial_score) - i64::from(self.penalties.total())
            + i64::from(self.mercy_restored);
        let final_score = raw.clamp(0, i64::from(initial_score)) as u32;

        ScoreBreakdown {
            driver_id: driver_id.to_string(),
            final_score,
            initial_score,
            penalties: self.penalties,
            mercy_restored: self.mercy_restored,
            reasons: self.findings.iter().map(ToString::to_string).collect(),
            findings: self.findings,
            degraded_classifications: self.degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_reason_rendering() {
        let idle = Finding::IdlePenalty {
            points: 2,
            minutes: 20.0,
            location: "Casino Lobby Parking".into(),
        };
        assert_eq!(
            idle.to_string(),
            "Lost 2 points for idling 20.0 mins at Casino Lobby Parking."
        );

        let brake = Finding::HardBraking {
            at: at(),
            acceleration_g: -0.8,
            points: 5,
        };
        assert_eq!(
            brake.to_string(),
            "Hard Braking detected at 2024-05-20T08:00:00.000Z (-0.8g)."
        );

        let fatigue = Finding::Fatigue {
            at: at(),
            confidence: 0.95,
            points: 10,
        };
        assert_eq!(fatigue.to_string(), "DSM Fatigue Alert at 2024-05-20T08:00:00.000Z.");
    }

    #[test]
    fn test_tally_buckets() {
        let mut tally = ScoreTally::default();
        tally.record(Finding::HardBraking {
            at: at(),
            acceleration_g: -0.8,
            points: 5,
        });
        tally.record(Finding::Mercy {
            at: at(),
            steering_angle: 25.0,
            points: 3,
        });
        tally.record(Finding::IdleWaived {
            minutes: 20.0,
            location: "Highway 401".into(),
        });

        let breakdown = tally.finish("driver-1", 100);
        assert_eq!(breakdown.penalties.safety, 5);
        assert_eq!(breakdown.mercy_restored, 3);
        assert_eq!(breakdown.final_score, 98);
        assert_eq!(breakdown.reasons.len(), 3);
    }

    #[test]
    fn test_score_floor_and_ceiling() {
        let mut tally = ScoreTally::default();
        for _ in 0..12 {
            tally.record(Finding::Fatigue {
                at: at(),
                confidence: 0.9,
                points: 10,
            });
        }
        assert_eq!(tally.finish("d", 100).final_score, 0);

        let mut tally = ScoreTally::default();
        tally.record(Finding::Mercy {
            at: at(),
            steering_angle: 20.0,
            points: 3,
        });
        assert_eq!(tally.finish("d", 100).final_score, 100);
    }

    #[test]
    fn test_finding_serializes_with_kind_tag() {
        let json = serde_json::to_value(Finding::IdleWaived {
            minutes: 12.5,
            location: "Highway 401".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "idle_waived");
        assert_eq!(json["minutes"], 12.5);
    }
}
