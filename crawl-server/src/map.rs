//! Map view state.
//!
//! The browser map is a pure renderer: everything it shows (numbered
//! markers, camera moves) is derived here from the stop list and sent to the
//! page. Nothing the map reports back is authoritative.

use serde::Serialize;

use crate::domain::{AUSTRALIA_CENTRE, Bounds, City, LngLat};

/// A numbered map marker bound to one stop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// 1-based position in the stop list
    pub number: usize,
    pub position: LngLat,
    /// Popup text
    pub label: String,
}

impl Marker {
    pub fn new(index: usize, position: LngLat, label: impl Into<String>) -> Self {
        Self {
            number: index + 1,
            position,
            label: label.into(),
        }
    }
}

/// An animated pan/zoom the map should perform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraMove {
    pub center: LngLat,
    pub zoom: f64,
    pub duration_ms: u32,
}

/// Map dimensions and camera policy.
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    /// Rendered map width in pixels
    pub width_px: f64,

    /// Rendered map height in pixels
    pub height_px: f64,

    /// Padding kept around fitted stops, in pixels
    pub padding_px: f64,

    /// Zoom cap when fitting several stops
    pub max_zoom: f64,

    /// Zoom when framing a single stop
    pub street_zoom: f64,

    /// Zoom when no stops are selected, and when a city is chosen
    pub city_zoom: f64,

    /// Zoom for the whole-country overview
    pub overview_zoom: f64,

    /// Fallback centre when there are no stops and no city
    pub default_centre: LngLat,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width_px: 800.0,
            height_px: 600.0,
            padding_px: 100.0,
            max_zoom: 16.0,
            street_zoom: 14.0,
            city_zoom: 12.0,
            overview_zoom: 4.0,
            default_centre: City::Brisbane.centre(),
        }
    }
}

/// Zoom level that fits `bounds` into a viewport with `padding_px` on each
/// side.
///
/// Uses `log2(360 / (span * (1 + 2 * padding_fraction)))` independently for
/// both axes and takes the smaller. Zero-width spans give infinity, so the
/// caller's cap decides.
pub fn zoom_for_bounds(bounds: &Bounds, padding_px: f64, width_px: f64, height_px: f64) -> f64 {
    let min_dim = width_px.min(height_px).max(1.0);
    let padding_fraction = padding_px / min_dim;
    let scale = 1.0 + padding_fraction * 2.0;

    let lat_zoom = (360.0 / (bounds.lat_span() * scale)).log2();
    let lng_zoom = (360.0 / (bounds.lng_span() * scale)).log2();

    lat_zoom.min(lng_zoom)
}

impl ViewportConfig {
    /// Camera framing a set of stops.
    ///
    /// No stops: the city centre (or the default centre) at city zoom.
    /// One stop: that stop at street zoom. More: the bounding box centre at
    /// the fitted zoom, capped at `max_zoom`.
    pub fn fit(&self, points: &[LngLat], city: Option<City>) -> CameraMove {
        match points {
            [] => CameraMove {
                center: city.map(|c| c.centre()).unwrap_or(self.default_centre),
                zoom: self.city_zoom,
                duration_ms: 2000,
            },
            [only] => CameraMove {
                center: *only,
                zoom: self.street_zoom,
                duration_ms: 2000,
            },
            _ => {
                let Some(bounds) = Bounds::from_points(points.iter().copied()) else {
                    return self.fit(&[], city);
                };
                let zoom = zoom_for_bounds(&bounds, self.padding_px, self.width_px, self.height_px)
                    .min(self.max_zoom)
                    .max(0.0);
                CameraMove {
                    center: bounds.center(),
                    zoom,
                    duration_ms: 1500,
                }
            }
        }
    }

    /// Long flight to a newly chosen city.
    pub fn city(&self, city: City) -> CameraMove {
        CameraMove {
            center: city.centre(),
            zoom: self.city_zoom,
            duration_ms: 5000,
        }
    }

    /// Whole-country view shown before a city is chosen.
    pub fn overview(&self) -> CameraMove {
        CameraMove {
            center: AUSTRALIA_CENTRE,
            zoom: self.overview_zoom,
            duration_ms: 2000,
        }
    }

    /// Update the rendered map size. Non-positive sizes are ignored.
    pub fn resize(&mut self, width_px: f64, height_px: f64) {
        if width_px > 0.0 && height_px > 0.0 {
            self.width_px = width_px;
            self.height_px = height_px;
        }
    }
}
