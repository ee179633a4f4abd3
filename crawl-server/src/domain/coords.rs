//! Geographic coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 position in Mapbox order: longitude first, then latitude.
///
/// Serialises as a two-element array `[lng, lat]`, matching the GeoJSON
/// coordinates the Mapbox APIs return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(p: LngLat) -> Self {
        [p.lng, p.lat]
    }
}

impl fmt::Display for LngLat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lng, self.lat)
    }
}

/// Axis-aligned bounding box over a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Bounds {
    /// A zero-area box at a single point.
    pub fn at(p: LngLat) -> Self {
        Self {
            west: p.lng,
            south: p.lat,
            east: p.lng,
            north: p.lat,
        }
    }

    /// Grow the box to contain `p`.
    pub fn extend(&mut self, p: LngLat) {
        self.west = self.west.min(p.lng);
        self.east = self.east.max(p.lng);
        self.south = self.south.min(p.lat);
        self.north = self.north.max(p.lat);
    }

    /// Minimal box containing every position, or `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LngLat>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::at(iter.next()?);
        for p in iter {
            bounds.extend(p);
        }
        Some(bounds)
    }

    pub fn center(&self) -> LngLat {
        LngLat::new((self.west + self.east) / 2.0, (self.south + self.north) / 2.0)
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialises_as_lng_lat_array() {
        let p = LngLat::new(153.0281, -27.4679);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[153.0281,-27.4679]");

        let back: LngLat = serde_json::from_str("[153.0281,-27.4679]").unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn display_is_mapbox_waypoint_format() {
        assert_eq!(LngLat::new(153.03, -27.47).to_string(), "153.03,-27.47");
    }

    #[test]
    fn bounds_cover_all_points() {
        let bounds = Bounds::from_points([
            LngLat::new(153.03, -27.47),
            LngLat::new(153.02, -27.48),
            LngLat::new(153.05, -27.46),
        ])
        .unwrap();

        assert_eq!(bounds.west, 153.02);
        assert_eq!(bounds.east, 153.05);
        assert_eq!(bounds.south, -27.48);
        assert_eq!(bounds.north, -27.46);
        assert!((bounds.center().lng - 153.035).abs() < 1e-9);
        assert!((bounds.center().lat - (-27.47)).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(Bounds::from_points(Vec::new()).is_none());
    }
}
