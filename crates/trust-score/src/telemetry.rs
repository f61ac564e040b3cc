//! Telemetry samples and driver-monitoring events
//!
//! Domain types carry parsed UTC timestamps. The `*Record` types are the
//! wire shape handed over by the ingestion pipeline, with timestamps as
//! RFC 3339 strings; converting a record validates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{check_range, ScoringError};

/// Geographic position of a sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// One sample of vehicle state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPoint {
    pub timestamp: DateTime<Utc>,

    /// Ground speed (km/h)
    pub speed_kmh: f64,

    pub engine_on: bool,

    pub position: GeoPoint,

    /// Place label, e.g. "Casino Lobby Parking". Empty means unknown.
    #[serde(default)]
    pub location_context: String,

    /// Longitudinal acceleration in g, negative when decelerating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceleration_g: Option<f64>,

    /// Steering wheel angle (degrees)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steering_angle: Option<f64>,
}

impl TelemetryPoint {
    /// Create a sample with no position, context or IMU readings
    pub fn new(timestamp: DateTime<Utc>, speed_kmh: f64, engine_on: bool) -> Self {
        Self {
            timestamp,
            speed_kmh,
            engine_on,
            position: GeoPoint::default(),
            location_context: String::new(),
            acceleration_g: None,
            steering_angle: None,
        }
    }

    pub fn with_location(mut self, context: impl Into<String>) -> Self {
        self.location_context = context.into();
        self
    }

    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.position = GeoPoint {
            latitude,
            longitude,
        };
        self
    }

    pub fn with_acceleration(mut self, g: f64) -> Self {
        self.acceleration_g = Some(g);
        self
    }

    pub fn with_steering(mut self, degrees: f64) -> Self {
        self.steering_angle = Some(degrees);
        self
    }

    /// Engine running while stationary
    pub fn is_idle(&self) -> bool {
        self.engine_on && self.speed_kmh == 0.0
    }

    /// Reject physically meaningless samples
    pub fn validate(&self) -> Result<(), ScoringError> {
        check_range("speed", self.speed_kmh, 0.0, f64::MAX)?;
        check_range("latitude", self.position.latitude, -90.0, 90.0)?;
        check_range("longitude", self.position.longitude, -180.0, 180.0)?;
        if let Some(g) = self.acceleration_g {
            check_range("acceleration_g", g, f64::MIN, f64::MAX)?;
        }
        if let Some(angle) = self.steering_angle {
            check_range("steering_angle", angle, f64::MIN, f64::MAX)?;
        }
        Ok(())
    }
}

/// Driver-monitoring alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DsmEventType {
    Fatigue,
    Distraction,
    PhoneUsage,
    Unknown,
}

impl DsmEventType {
    /// Map a camera-side label onto a known category. Unrecognized labels
    /// become `Unknown` rather than failing the evaluation.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "FATIGUE" => DsmEventType::Fatigue,
            "DISTRACTION" => DsmEventType::Distraction,
            "PHONE_USAGE" => DsmEventType::PhoneUsage,
            _ => DsmEventType::Unknown,
        }
    }
}

/// Discrete alert raised by the driver-monitoring camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DsmEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: DsmEventType,
    /// Detector confidence (0-1)
    pub confidence: f64,
}

impl DsmEvent {
    pub fn new(timestamp: DateTime<Utc>, kind: DsmEventType, confidence: f64) -> Self {
        Self {
            timestamp,
            kind,
            confidence,
        }
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        check_range("confidence", self.confidence, 0.0, 1.0)
    }
}

/// Telemetry sample as received from the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryRecord {
    pub timestamp: String,
    pub speed: f64,
    pub engine_on: bool,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub location_context: Option<String>,
    #[serde(default)]
    pub acceleration_g: Option<f64>,
    #[serde(default)]
    pub steering_angle: Option<f64>,
}

impl TryFrom<TelemetryRecord> for TelemetryPoint {
    type Error = ScoringError;

    fn try_from(record: TelemetryRecord) -> Result<Self, Self::Error> {
        let point = TelemetryPoint {
            timestamp: parse_timestamp(&record.timestamp)?,
            speed_kmh: record.speed,
            engine_on: record.engine_on,
            position: GeoPoint {
                latitude: record.latitude,
                longitude: record.longitude,
            },
            location_context: record.location_context.unwrap_or_default(),
            acceleration_g: record.acceleration_g,
            steering_angle: record.steering_angle,
        };
        point.validate()?;
        Ok(point)
    }
}

/// DSM event as received from the ingestion pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DsmEventRecord {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub confidence: f64,
}

impl TryFrom<DsmEventRecord> for DsmEvent {
    type Error = ScoringError;

    fn try_from(record: DsmEventRecord) -> Result<Self, Self::Error> {
        let event = DsmEvent {
            timestamp: parse_timestamp(&record.timestamp)?,
            kind: DsmEventType::from_label(&record.kind),
            confidence: record.confidence,
        };
        event.validate()?;
        Ok(event)
    }
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ScoringError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| ScoringError::InvalidTimestamp {
            value: value.to_string(),
        })
}
