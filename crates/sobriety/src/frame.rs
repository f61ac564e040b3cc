//! Breath analyzer frame parsing

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::BreathError;

const STX: char = '\u{2}';
const ETX: char = '\u{3}';

/// Test outcome reported by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BreathStatus {
    Pass,
    Fail,
    Tamper,
}

impl BreathStatus {
    /// Map the analyzer's single-letter status flag
    pub fn from_flag(flag: &str) -> Option<Self> {
        match flag {
            "P" => Some(BreathStatus::Pass),
            "F" => Some(BreathStatus::Fail),
            "T" => Some(BreathStatus::Tamper),
            _ => None,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, BreathStatus::Fail | BreathStatus::Tamper)
    }
}

/// Parsed breath test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathReading {
    pub status: BreathStatus,
    /// Blood alcohol concentration (%)
    pub bac_level: f64,
    /// Test time from the frame, if it carried a usable date and time
    pub timestamp: Option<DateTime<Utc>>,
}

impl BreathReading {
    /// Test time, or `received_at` when the frame had none
    pub fn timestamp_or(&self, received_at: DateTime<Utc>) -> DateTime<Utc> {
        self.timestamp.unwrap_or(received_at)
    }
}

/// Parse a raw analyzer frame such as `2026-02-12,08:00,F,0.05`.
///
/// The status flag is located by value, so leading framing fields are
/// tolerated. Date and time are the two fields before the flag and BAC is
/// the field after it.
pub fn parse_breath_frame(raw: &str) -> Result<BreathReading, BreathError> {
    let cleaned: String = raw.chars().filter(|c| *c != STX && *c != ETX).collect();
    if cleaned.trim().is_empty() {
        return Err(BreathError::Empty);
    }

    let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();

    let (index, status) = parts
        .iter()
        .enumerate()
        .find_map(|(i, field)| BreathStatus::from_flag(field).map(|s| (i, s)))
        .ok_or_else(|| BreathError::MissingStatus(raw.to_string()))?;

    let bac_level = parts
        .get(index + 1)
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .unwrap_or(0.0);

    let timestamp = match (index.checked_sub(2), index.checked_sub(1)) {
        (Some(d), Some(t)) => parse_frame_time(parts[d], parts[t]),
        _ => None,
    };

    debug!("Parsed breath frame: {:?} bac={} at {:?}", status, bac_level, timestamp);

    Ok(BreathReading {
        status,
        bac_level,
        timestamp,
    })
}

fn parse_frame_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}
