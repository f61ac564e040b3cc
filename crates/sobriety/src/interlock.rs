//! Ignition interlock decisions

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::frame::{BreathReading, BreathStatus};

/// Interlock configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterlockConfig {
    /// Trust points removed on a failed or tampered test
    pub violation_deduction: u32,
    /// Alcohol level above which a direct check fails (%)
    pub bac_limit: f64,
}

impl Default for InterlockConfig {
    fn default() -> Self {
        Self {
            violation_deduction: 100,
            bac_limit: 0.0,
        }
    }
}

/// Who and what a test applies to, for alert text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterlockSubject {
    pub driver_name: String,
    pub license_plate: String,
}

/// Actions the caller must carry out after a breath test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterlockDecision {
    pub status: BreathStatus,
    /// Keep the engine immobilized
    pub immobilize: bool,
    /// Suspend the driver and mark the pending trip as a failed start
    pub suspend_driver: bool,
    pub score_deduction: u32,
    /// Manager alert, present only for violations
    pub alert: Option<String>,
}

impl InterlockDecision {
    pub fn is_violation(&self) -> bool {
        self.status.is_violation()
    }

    /// New trust score after the deduction, floored at 0
    pub fn apply_to(&self, score: u32) -> u32 {
        score.saturating_sub(self.score_deduction)
    }
}

/// Interlock policy
#[derive(Debug, Clone, Default)]
pub struct InterlockPolicy {
    config: InterlockConfig,
}

impl InterlockPolicy {
    pub fn new(config: InterlockConfig) -> Self {
        Self { config }
    }

    /// Decide the interlock outcome for a parsed breath test
    pub fn decide(&self, reading: &BreathReading, subject: &InterlockSubject) -> InterlockDecision {
        match reading.status {
            BreathStatus::Pass => {
                info!("Breath test passed for {}, releasing immobilizer", subject.license_plate);
                InterlockDecision {
                    status: BreathStatus::Pass,
                    immobilize: false,
                    suspend_driver: false,
                    score_deduction: 0,
                    alert: None,
                }
            }
            BreathStatus::Fail => self.violation(
                BreathStatus::Fail,
                format!(
                    "CRITICAL: ALCOHOL DETECTED ({}%) - Driver {} - Vehicle {}",
                    reading.bac_level, subject.driver_name, subject.license_plate
                ),
            ),
            BreathStatus::Tamper => self.violation(
                BreathStatus::Tamper,
                format!(
                    "CRITICAL: TAMPER ATTEMPT - Driver {} - Vehicle {}",
                    subject.driver_name, subject.license_plate
                ),
            ),
        }
    }

    /// Decide from a bare alcohol level, as reported by a pre-trip check
    pub fn check_alcohol_level(&self, level: f64, subject: &InterlockSubject) -> InterlockDecision {
        let status = if level > self.config.bac_limit || level.is_nan() {
            BreathStatus::Fail
        } else {
            BreathStatus::Pass
        };
        self.decide(
            &BreathReading {
                status,
                bac_level: level,
                timestamp: None,
            },
            subject,
        )
    }

    fn violation(&self, status: BreathStatus, alert: String) -> InterlockDecision {
        warn!("{}", alert);
        InterlockDecision {
            status,
            immobilize: true,
            suspend_driver: true,
            score_deduction: self.config.violation_deduction,
            alert: Some(alert),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::parse_breath_frame;

    fn subject() -> InterlockSubject {
        InterlockSubject {
            driver_name: "Viper".to_string(),
            license_plate: "VIP-001".to_string(),
        }
    }

    #[test]
    fn test_failed_test_locks_and_suspends() {
        let reading = parse_breath_frame("2026-02-12,08:00,F,0.05").unwrap();
        let decision = InterlockPolicy::default().decide(&reading, &subject());

        assert!(decision.immobilize);
        assert!(decision.suspend_driver);
        assert_eq!(decision.score_deduction, 100);
        assert_eq!(
            decision.alert.as_deref(),
            Some("CRITICAL: ALCOHOL DETECTED (0.05%) - Driver Viper - Vehicle VIP-001")
        );
        assert_eq!(decision.apply_to(92), 0);
    }

    #[test]
    fn test_tamper_is_violation() {
        let reading = parse_breath_frame("2026-02-12,08:00,T,0").unwrap();
        let decision = InterlockPolicy::default().decide(&reading, &subject());

        assert!(decision.is_violation());
        assert!(decision.alert.unwrap().starts_with("CRITICAL: TAMPER ATTEMPT"));
    }

    #[test]
    fn test_pass_releases_immobilizer() {
        let reading = parse_breath_frame("2026-02-12,08:00,P,0.00").unwrap();
        let decision = InterlockPolicy::default().decide(&reading, &subject());

        assert!(!decision.immobilize);
        assert!(decision.alert.is_none());
        assert_eq!(decision.apply_to(92), 92);
    }

    #[test]
    fn test_direct_alcohol_check() {
        let policy = InterlockPolicy::default();
        assert!(!policy.check_alcohol_level(0.0, &subject()).is_violation());
        assert!(policy.check_alcohol_level(0.01, &subject()).is_violation());

        let tolerant = InterlockPolicy::new(InterlockConfig {
            bac_limit: 0.02,
            ..Default::default()
        });
        assert!(!tolerant.check_alcohol_level(0.01, &subject()).is_violation());
    }
}
