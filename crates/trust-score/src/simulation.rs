//! Reference trip used by the driver simulation endpoint

use chrono::{DateTime, Duration, Utc};

use crate::telemetry::{DsmEvent, DsmEventType, TelemetryPoint};

pub const REFERENCE_TEST_CASE: &str =
    "Casino Idle (Penalize), Highway Idle (Safe), Hard Brake + Correction (Mercy), Fatigue (Penalize)";

/// Inputs for one simulated evaluation
#[derive(Debug, Clone)]
pub struct Scenario {
    pub driver_id: String,
    pub telemetry: Vec<TelemetryPoint>,
    pub dsm_events: Vec<DsmEvent>,
}

fn idle_minutes(
    start: DateTime<Utc>,
    minutes: i64,
    place: &str,
    (latitude, longitude): (f64, f64),
) -> impl Iterator<Item = TelemetryPoint> + '_ {
    (0..minutes).map(move |m| {
        TelemetryPoint::new(start + Duration::minutes(m), 0.0, true)
            .with_position(latitude, longitude)
            .with_location(place)
    })
}

/// Build the reference trip ending at `now`. Scores 86:
/// - 20 min idle at "Casino Lobby Parking": -2
/// - 20 min idle at "Highway 401 Traffic Jam": waived
/// - -0.8g brake with a 25 deg correction 2 s later: -5 +3
/// - one DSM fatigue alert: -10
pub fn reference_scenario(now: DateTime<Utc>) -> Scenario {
    let casino_start = now - Duration::minutes(60);
    let highway_start = now - Duration::minutes(30);
    let crash_time = now - Duration::minutes(5);

    let mut telemetry: Vec<TelemetryPoint> =
        idle_minutes(casino_start, 20, "Casino Lobby Parking", (43.651070, -79.347015)).collect();
    telemetry.push(
        TelemetryPoint::new(casino_start + Duration::minutes(20), 35.0, true)
            .with_position(43.652000, -79.348000)
            .with_location("Casino Exit Ramp"),
    );

    telemetry.extend(idle_minutes(
        highway_start,
        20,
        "Highway 401 Traffic Jam",
        (43.700110, -79.416300),
    ));
    telemetry.push(
        TelemetryPoint::new(highway_start + Duration::minutes(20), 60.0, true)
            .with_position(43.701000, -79.417000)
            .with_location("Highway 401"),
    );

    telemetry.push(
        TelemetryPoint::new(crash_time, 80.0, true)
            .with_position(43.800000, -79.500000)
            .with_location("Main St")
            .with_acceleration(-0.8),
    );
    telemetry.push(
        TelemetryPoint::new(crash_time + Duration::seconds(2), 75.0, true)
            .with_position(43.800100, -79.500100)
            .with_location("Main St")
            .with_steering(25.0),
    );

    Scenario {
        driver_id: "driver-123".to_string(),
        telemetry,
        dsm_events: vec![DsmEvent::new(
            now - Duration::minutes(45),
            DsmEventType::Fatigue,
            0.95,
        )],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_scenario_shape() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap();
        let scenario = reference_scenario(now);

        assert_eq!(scenario.telemetry.len(), 44);
        assert!(scenario.telemetry.iter().all(|p| p.timestamp <= now));
        assert!(scenario.telemetry.iter().all(|p| p.validate().is_ok()));
        assert_eq!(scenario.dsm_events.len(), 1);
    }
}
