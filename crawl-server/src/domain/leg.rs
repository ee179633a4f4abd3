//! Route legs between consecutive stops.

use chrono::Duration;
use serde::Serialize;

use super::{LngLat, TravelMode};

/// A routed path returned by the directions provider, before a mode is
/// attached to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Directions {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<LngLat>,
    pub steps: Vec<String>,
}

/// The computed path between two consecutive stops in one travel mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub mode: TravelMode,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Vec<LngLat>,
    pub steps: Vec<String>,
}

impl RouteLeg {
    pub fn new(mode: TravelMode, directions: Directions) -> Self {
        Self {
            mode,
            distance_meters: directions.distance_meters,
            duration_seconds: directions.duration_seconds,
            geometry: directions.geometry,
            steps: directions.steps,
        }
    }

    /// First point of the path, where a mode-change glyph is drawn.
    pub fn start(&self) -> Option<LngLat> {
        self.geometry.first().copied()
    }

    pub fn duration(&self) -> Duration {
        seconds_to_duration(self.duration_seconds)
    }
}

/// Format metres as kilometres with two decimals, e.g. `"1.20"`.
pub fn format_km(meters: f64) -> String {
    format!("{:.2}", meters / 1000.0)
}

/// Upstream durations come as fractional seconds; negative values clamp to
/// zero.
pub fn seconds_to_duration(seconds: f64) -> Duration {
    Duration::milliseconds(((seconds * 1000.0).round() as i64).max(0))
}

/// Format a duration as whole minutes, rounded to nearest.
pub fn format_mins(duration: Duration) -> String {
    let millis = duration.num_milliseconds();
    format!("{}", (millis + 30_000).div_euclid(60_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting() {
        assert_eq!(format_km(1200.0), "1.20");
        assert_eq!(format_km(0.0), "0.00");
        assert_eq!(format_km(12_346.0), "12.35");
        assert_eq!(format_mins(Duration::seconds(900)), "15");
        assert_eq!(format_mins(Duration::seconds(89)), "1");
        assert_eq!(format_mins(Duration::seconds(90)), "2");
        assert_eq!(format_mins(Duration::zero()), "0");
        assert_eq!(format_mins(seconds_to_duration(89.6)), "1");
    }

    #[test]
    fn durations_keep_milliseconds() {
        assert_eq!(seconds_to_duration(61.5), Duration::milliseconds(61_500));
        assert_eq!(seconds_to_duration(-3.0), Duration::zero());
    }

    #[test]
    fn start_is_first_geometry_point() {
        let leg = RouteLeg::new(
            TravelMode::Walking,
            Directions {
                distance_meters: 10.0,
                duration_seconds: 61.5,
                geometry: vec![LngLat::new(1.0, 2.0), LngLat::new(3.0, 4.0)],
                steps: vec![],
            },
        );
        assert_eq!(leg.start(), Some(LngLat::new(1.0, 2.0)));
        assert_eq!(leg.duration(), Duration::milliseconds(61_500));
    }
}
