//! Static venue catalog for the legacy route page.
//!
//! The legacy page posts a list of venue ids and gets back markers and one
//! straight line joining the chosen venues. No routing is involved.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::LngLat;
use crate::map::{CameraMove, Marker};

/// Message shown when the form is submitted with nothing ticked.
pub const NO_VENUES_SELECTED: &str = "Please select at least one venue.";

/// Fixed camera of the legacy page (Brisbane CBD).
pub const LEGACY_CAMERA: CameraMove = CameraMove {
    center: LngLat::new(153.021072, -27.470125),
    zoom: 14.0,
    duration_ms: 0,
};

/// Line colour of the legacy path.
pub const LEGACY_LINE_COLOR: &str = "#000";

/// One bar in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub lat: f64,
    pub lng: f64,
}

impl Venue {
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }
}

/// File format entry: a venue with its id.
#[derive(Debug, Deserialize)]
struct VenueRecord {
    id: String,
    #[serde(flatten)]
    venue: Venue,
}

/// Errors loading a catalog file.
#[derive(Debug, thiserror::Error)]
pub enum VenueError {
    #[error("failed to read venue catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse venue catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate venue id: {0}")]
    DuplicateId(String),
}

/// Ordered catalog of venues keyed by id.
#[derive(Debug, Clone, Default)]
pub struct VenueCatalog {
    venues: Vec<(String, Venue)>,
}

/// What the legacy page draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyRoute {
    pub markers: Vec<Marker>,
    /// Straight line through the venues; empty with fewer than two
    pub path: Vec<LngLat>,
}

impl VenueCatalog {
    /// Build a catalog from `(id, venue)` pairs, keeping their order.
    pub fn new(venues: Vec<(String, Venue)>) -> Result<Self, VenueError> {
        for (i, (id, _)) in venues.iter().enumerate() {
            if venues[..i].iter().any(|(other, _)| other == id) {
                return Err(VenueError::DuplicateId(id.clone()));
            }
        }
        Ok(Self { venues })
    }

    /// A few Brisbane bars, used when no catalog file is configured.
    pub fn builtin() -> Self {
        let venue = |id: &str, name: &str, lat: f64, lng: f64| {
            (
                id.to_string(),
                Venue {
                    name: name.to_string(),
                    lat,
                    lng,
                },
            )
        };
        Self {
            venues: vec![
                venue("regatta", "Regatta Hotel", -27.4822, 152.9946),
                venue("story-bridge", "Story Bridge Hotel", -27.4638, 153.0359),
                venue("pineapple", "Pineapple Hotel", -27.4862, 153.0346),
                venue("breakfast-creek", "Breakfast Creek Hotel", -27.4420, 153.0470),
                venue("normanby", "Normanby Hotel", -27.4607, 153.0078),
                venue("caxton", "Caxton Hotel", -27.4647, 153.0110),
            ],
        }
    }

    /// Load a JSON array of `{"id", "name", "lat", "lng"}` objects.
    pub fn load(path: &Path) -> Result<Self, VenueError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<VenueRecord> = serde_json::from_str(&content)?;
        let catalog = Self::new(records.into_iter().map(|r| (r.id, r.venue)).collect())?;
        info!(path = %path.display(), venues = catalog.len(), "loaded venue catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Venue> {
        self.venues.iter().find(|(k, _)| k == id).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Venue)> {
        self.venues.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The chosen venues in catalog order. Unknown ids are ignored.
    pub fn legacy_route<S: AsRef<str>>(&self, selected: &[S]) -> LegacyRoute {
        let chosen: Vec<&Venue> = self
            .venues
            .iter()
            .filter(|(id, _)| selected.iter().any(|s| s.as_ref() == id))
            .map(|(_, v)| v)
            .collect();

        if chosen.len() < selected.len() {
            debug!(
                requested = selected.len(),
                found = chosen.len(),
                "ignoring unknown or repeated venue ids"
            );
        }

        let markers = chosen
            .iter()
            .enumerate()
            .map(|(i, v)| Marker::new(i, v.position(), v.name.as_str()))
            .collect();
        let path = if chosen.len() > 1 {
            chosen.iter().map(|v| v.position()).collect()
        } else {
            Vec::new()
        };

        LegacyRoute { markers, path }
    }
}
