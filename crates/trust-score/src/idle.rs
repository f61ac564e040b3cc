//! Idle segmentation
//!
//! Splits a time-sorted telemetry stream into maximal runs of
//! engine-on/zero-speed samples.

use chrono::{DateTime, Utc};

use crate::telemetry::TelemetryPoint;

/// A contiguous idle period
#[derive(Debug, Clone, PartialEq)]
pub struct IdleSegment {
    pub start: DateTime<Utc>,
    /// First non-idle sample after the run, or the last sample when the
    /// stream ends while idle
    pub end: DateTime<Utc>,
    /// Location label of the first idle sample
    pub location_context: String,
    /// Segment was still open when the stream ended
    pub open_ended: bool,
}

impl IdleSegment {
    /// Idle duration in minutes, never negative
    pub fn duration_minutes(&self) -> f64 {
        let millis = (self.end - self.start).num_milliseconds().max(0);
        millis as f64 / 60_000.0
    }

    /// Location label for audit messages
    pub fn location_label(&self) -> &str {
        if self.location_context.trim().is_empty() {
            "Unknown"
        } else {
            &self.location_context
        }
    }
}

/// Scan `sorted` for idle segments. Input must already be ordered by timestamp.
pub fn idle_segments(sorted: &[TelemetryPoint]) -> Vec<IdleSegment> {
    let mut segments = Vec::new();
    let mut open: Option<&TelemetryPoint> = None;

    for point in sorted {
        match (point.is_idle(), open) {
            (true, None) => open = Some(point),
            (false, Some(start)) => {
                segments.push(IdleSegment {
                    start: start.timestamp,
                    end: point.timestamp,
                    location_context: start.location_context.clone(),
                    open_ended: false,
                });
                open = None;
            }
            _ => {}
        }
    }

    // Charge only through the last observed sample
    if let (Some(start), Some(last)) = (open, sorted.last()) {
        segments.push(IdleSegment {
            start: start.timestamp,
            end: last.timestamp,
            location_context: start.location_context.clone(),
            open_ended: true,
        });
    }

    segments
}
