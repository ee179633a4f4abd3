//! Mapbox API response types.
//!
//! Only the fields the planner reads are modelled; everything else in the
//! responses is ignored by serde.

use serde::Deserialize;

/// Geocoding v5 response (a GeoJSON FeatureCollection).
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One geocoding result.
#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    /// Short name, e.g. "The Regatta Hotel"
    #[serde(default)]
    pub text: String,

    /// Fully qualified name including locality and country
    #[serde(default)]
    pub place_name: String,

    #[serde(default)]
    pub properties: FeatureProperties,

    /// Parent features (locality, postcode, region, ...)
    #[serde(default)]
    pub context: Vec<ContextEntry>,

    pub geometry: PointGeometry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    pub address: Option<String>,
}

/// A parent feature, identified by a typed id such as `locality.123`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextEntry {
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PointGeometry {
    pub coordinates: [f64; 2],
}

/// Directions v5 response.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// "Ok", "NoRoute", "NoSegment", ...
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub routes: Vec<Route>,
}

/// One route alternative.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    /// Metres
    pub distance: f64,

    /// Seconds
    pub duration: f64,

    /// Requested with `geometries=geojson`
    pub geometry: LineGeometry,

    #[serde(default)]
    pub legs: Vec<RouteLegDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteLegDto {
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    pub maneuver: Maneuver,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Maneuver {
    #[serde(default)]
    pub instruction: String,
}
