//! Sobriety Interlock
//!
//! Breath analyzer handling for the ignition interlock:
//! - Frame parsing (`DATE,TIME,STATUS,BAC`, optional STX/ETX framing)
//! - Interlock decisions (immobilize, suspend, trust deduction)
//!
//! Decisions are plain values; locking the vehicle, suspending the driver
//! and alerting managers is left to the caller.

pub mod frame;
pub mod interlock;

pub use frame::{parse_breath_frame, BreathReading, BreathStatus};
pub use interlock::{InterlockConfig, InterlockDecision, InterlockPolicy, InterlockSubject};

use thiserror::Error;

/// Breath frame error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BreathError {
    #[error("Empty breath frame")]
    Empty,

    #[error("Invalid data format: status not found in {0:?}")]
    MissingStatus(String),
}
