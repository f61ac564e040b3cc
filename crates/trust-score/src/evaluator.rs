//! Trust Score Evaluator
//!
//! Scores one driver over one evaluation window:
//! 1. Idle segments at non-traffic locations cost a point per full 10 minutes
//! 2. Hard braking costs 5 points, 3 of which are restored when a steering
//!    correction follows within 5 seconds
//! 3. Every DSM fatigue alert costs 10 points
//!
//! The evaluator keeps no state between calls.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::braking::hard_brake_events;
use crate::breakdown::{Finding, ScoreBreakdown, ScoreTally};
use crate::classifier::{AsyncTrafficClassifier, KeywordClassifier, TrafficClassifier};
use crate::config::{ClassifierConfig, ScoringConfig};
use crate::error::ScoringError;
use crate::idle::{idle_segments, IdleSegment};
use crate::telemetry::{DsmEvent, DsmEventType, TelemetryPoint};

/// Validated, time-sorted evaluation input
struct Window {
    telemetry: Vec<TelemetryPoint>,
    dsm_events: Vec<DsmEvent>,
}

impl Window {
    fn prepare(
        config: &ScoringConfig,
        telemetry: &[TelemetryPoint],
        dsm_events: &[DsmEvent],
    ) -> Result<Self, ScoringError> {
        config.validate()?;
        for point in telemetry {
            point.validate()?;
        }
        for event in dsm_events {
            event.validate()?;
        }

        // Stable sorts: equal timestamps keep arrival order
        let mut telemetry = telemetry.to_vec();
        telemetry.sort_by_key(|p| p.timestamp);
        let mut dsm_events = dsm_events.to_vec();
        dsm_events.sort_by_key(|e| e.timestamp);

        Ok(Self {
            telemetry,
            dsm_events,
        })
    }
}

/// Driver trust score evaluator
pub struct TrustEvaluator {
    config: ScoringConfig,
    classifier: Arc<dyn TrafficClassifier>,
}

impl TrustEvaluator {
    /// Create an evaluator with an injected traffic classifier
    pub fn new(config: ScoringConfig, classifier: Arc<dyn TrafficClassifier>) -> Self {
        Self { config, classifier }
    }

    /// Create an evaluator backed by the keyword classifier
    pub fn with_keywords(config: ScoringConfig, classifier: &ClassifierConfig) -> Self {
        Self::new(config, Arc::new(KeywordClassifier::from_config(classifier)))
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Evaluate one driver's window.
    ///
    /// Fails without a partial result when the config, any sample or any
    /// event is invalid.
    pub fn evaluate(
        &self,
        driver_id: &str,
        telemetry: &[TelemetryPoint],
        dsm_events: &[DsmEvent],
    ) -> Result<ScoreBreakdown, ScoringError> {
        let window = Window::prepare(&self.config, telemetry, dsm_events)?;
        let mut tally = ScoreTally::default();

        for segment in self.chargeable_segments(&window) {
            let in_traffic = self.classifier.is_traffic(&segment.location_context);
            self.record_idle(&mut tally, &segment, in_traffic);
        }
        self.record_events(&mut tally, &window);

        Ok(self.finish(tally, driver_id))
    }

    /// Evaluate with an asynchronous classifier, e.g. a remote model.
    ///
    /// Each classification gets `timeout`; a timeout or classifier error
    /// falls back to "not traffic" so the idle penalty still applies.
    pub async fn evaluate_with_model(
        &self,
        driver_id: &str,
        telemetry: &[TelemetryPoint],
        dsm_events: &[DsmEvent],
        model: &dyn AsyncTrafficClassifier,
        timeout: Duration,
    ) -> Result<ScoreBreakdown, ScoringError> {
        let window = Window::prepare(&self.config, telemetry, dsm_events)?;
        let mut tally = ScoreTally::default();

        for segment in self.chargeable_segments(&window) {
            let in_traffic =
                match tokio::time::timeout(timeout, model.classify(&segment.location_context)).await {
                    Ok(Ok(verdict)) => verdict,
                    Ok(Err(e)) => {
                        warn!(
                            "Classifier failed for {:?}, treating as not traffic: {}",
                            segment.location_context, e
                        );
                        tally.degraded();
                        false
                    }
                    Err(_) => {
                        warn!(
                            "Classifier timed out after {}ms for {:?}, treating as not traffic",
                            timeout.as_millis(),
                            segment.location_context
                        );
                        tally.degraded();
                        false
                    }
                };
            self.record_idle(&mut tally, &segment, in_traffic);
        }
        self.record_events(&mut tally, &window);

        Ok(self.finish(tally, driver_id))
    }

    /// Idle segments long enough to matter. Shorter ones are never
    /// classified.
    fn chargeable_segments(&self, window: &Window) -> Vec<IdleSegment> {
        idle_segments(&window.telemetry)
            .into_iter()
            .filter(|s| s.duration_minutes() >= self.config.idle_threshold_minutes)
            .collect()
    }

    fn record_idle(&self, tally: &mut ScoreTally, segment: &IdleSegment, in_traffic: bool) {
        let minutes = segment.duration_minutes();
        let location = segment.location_label().to_string();

        if in_traffic {
            debug!("Idle waived: {:.1} min in traffic at {}", minutes, location);
            tally.record(Finding::IdleWaived { minutes, location });
            return;
        }

        let points = (minutes / self.config.idle_minutes_per_point).floor() as u32;
        if points == 0 {
            return;
        }
        debug!("Idle penalty: {} points for {:.1} min at {}", points, minutes, location);
        tally.record(Finding::IdlePenalty {
            points,
            minutes,
            location,
        });
    }

    fn record_events(&self, tally: &mut ScoreTally, window: &Window) {
        for event in hard_brake_events(&window.telemetry, &self.config) {
            debug!("Hard brake at {} ({}g)", event.timestamp, event.acceleration_g);
            tally.record(Finding::HardBraking {
                at: event.timestamp,
                acceleration_g: event.acceleration_g,
                points: self.config.hard_brake_penalty,
            });

            if let Some(correction) = event.correction {
                debug!(
                    "Avoidance correction {}deg at {}",
                    correction.steering_angle, correction.timestamp
                );
                tally.record(Finding::Mercy {
                    at: event.timestamp,
                    steering_angle: correction.steering_angle,
                    points: self.config.mercy_points,
                });
            }
        }

        for event in window
            .dsm_events
            .iter()
            .filter(|e| e.kind == DsmEventType::Fatigue)
        {
            tally.record(Finding::Fatigue {
                at: event.timestamp,
                confidence: event.confidence,
                points: self.config.fatigue_penalty,
            });
        }
    }

    fn finish(&self, tally: ScoreTally, driver_id: &str) -> ScoreBreakdown {
        let breakdown = tally.finish(driver_id, self.config.initial_score);
        info!(
            driver_id = %breakdown.driver_id,
            final_score = breakdown.final_score,
            idle = breakdown.penalties.idle,
            safety = breakdown.penalties.safety,
            fatigue = breakdown.penalties.fatigue,
            mercy = breakdown.mercy_restored,
            "Trust score evaluated"
        );
        breakdown
    }
}

impl Default for TrustEvaluator {
    fn default() -> Self {
        Self::new(ScoringConfig::default(), Arc::new(KeywordClassifier::default()))
    }
}
