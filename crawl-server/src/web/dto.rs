//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::domain::{
    City, DomainError, EnabledModes, LngLat, PlaceCandidate, SavedStop, StopId, TravelMode,
};
use crate::map::{CameraMove, Marker};
use crate::route::{ModeChangeGlyph, RenderedLeg, RouteOverlay, RoutePlan, RouteViewer};
use crate::selector::{Insertion, Selector};

// ============================================================================
// Selector
// ============================================================================

/// Query parameters for place search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search box contents
    #[serde(default)]
    pub q: Option<String>,
}

/// HTML form choosing a city; an empty value clears it.
#[derive(Debug, Deserialize)]
pub struct CityForm {
    #[serde(default)]
    pub city: String,
}

impl CityForm {
    pub fn city(&self) -> Result<Option<City>, DomainError> {
        let name = self.city.trim();
        if name.is_empty() {
            return Ok(None);
        }
        City::parse(name).map(Some)
    }
}

/// HTML form adding a search result.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub candidate: usize,
}

/// HTML form removing a stop.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    pub stop: StopId,
}

/// Direction of a one-step move from the HTML list.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// HTML form moving a stop one place up or down.
#[derive(Debug, Deserialize)]
pub struct MoveForm {
    pub row: usize,
    pub direction: MoveDirection,
}

/// One row of the selected-stops list.
#[derive(Debug, Clone, Serialize)]
pub struct StopView {
    pub id: StopId,
    /// 1-based marker number
    pub number: usize,
    pub name: String,
    pub address: String,
    /// "Suburb, postcode", when known
    pub locality: Option<String>,
    pub coordinates: LngLat,
}

/// Full selector state as rendered by the page.
#[derive(Debug, Clone, Serialize)]
pub struct SelectorSnapshot {
    pub city: Option<City>,
    pub search_enabled: bool,
    pub placeholder: &'static str,
    pub query: String,
    pub results: Vec<PlaceCandidate>,
    pub results_visible: bool,
    pub notice: Option<String>,
    pub stops: Vec<StopView>,
    pub markers: Vec<Marker>,
    pub camera: CameraMove,
    pub can_proceed: bool,
    pub dragged_row: Option<usize>,
    pub separator: Option<Insertion>,
}

impl SelectorSnapshot {
    pub fn from_selector(selector: &Selector) -> Self {
        let stops = selector
            .stops()
            .entries()
            .iter()
            .map(|e| StopView {
                id: e.stop.id(),
                number: e.marker.number,
                name: e.stop.display_name().to_string(),
                address: e.stop.address().to_string(),
                locality: e.stop.locality_line(),
                coordinates: e.stop.coordinates(),
            })
            .collect();

        Self {
            city: selector.city(),
            search_enabled: selector.search_enabled(),
            placeholder: selector.search_placeholder(),
            query: selector.query().to_string(),
            results: selector.results().to_vec(),
            results_visible: selector.results_visible(),
            notice: selector.notice().map(str::to_string),
            stops,
            markers: selector.stops().markers().cloned().collect(),
            camera: selector.camera(),
            can_proceed: selector.can_proceed(),
            dragged_row: selector.dragged_row(),
            separator: selector.separator(),
        }
    }
}

/// Response to a selector command.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub selector: SelectorSnapshot,
    /// Set when the page should navigate away
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

// ============================================================================
// Route
// ============================================================================

/// Query parameters for the route page.
///
/// The JSON API passes `modes=walking,driving`; the HTML form sends one
/// checkbox per mode plus `submitted`, since unchecked boxes send nothing.
#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub modes: Option<String>,
    #[serde(default)]
    pub walking: Option<String>,
    #[serde(default)]
    pub transit: Option<String>,
    #[serde(default)]
    pub driving: Option<String>,
    #[serde(default)]
    pub submitted: Option<String>,
    /// Force a fresh calculation even if modes are unchanged
    #[serde(default)]
    pub recalculate: Option<String>,
}

impl RouteQuery {
    /// The requested modes, or `None` to keep the current ones.
    pub fn enabled_modes(&self) -> Result<Option<EnabledModes>, DomainError> {
        if let Some(list) = &self.modes {
            return EnabledModes::parse_list(list).map(Some);
        }
        if self.submitted.is_none() {
            return Ok(None);
        }
        let modes = EnabledModes::none()
            .with(TravelMode::Walking, self.walking.is_some())
            .with(TravelMode::Transit, self.transit.is_some())
            .with(TravelMode::Driving, self.driving.is_some());
        Ok(Some(modes))
    }

    pub fn force_recalculate(&self) -> bool {
        self.recalculate.is_some()
    }
}

/// One leg in the JSON route response.
#[derive(Debug, Clone, Serialize)]
pub struct LegResult {
    pub number: usize,
    pub from: String,
    pub to: String,
    pub mode: TravelMode,
    pub icon: &'static str,
    pub label: &'static str,
    pub distance: String,
    pub duration: String,
    pub instructions: Vec<String>,
}

impl LegResult {
    pub fn from_leg(leg: &RenderedLeg) -> Self {
        Self {
            number: leg.number(),
            from: leg.from_name.clone(),
            to: leg.to_name.clone(),
            mode: leg.mode(),
            icon: leg.mode().icon(),
            label: leg.mode().label(),
            distance: leg.distance_label(),
            duration: leg.duration_label(),
            instructions: leg.leg.steps.clone(),
        }
    }
}

/// Everything the route map draws.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RouteMapData {
    pub markers: Vec<Marker>,
    pub overlays: Vec<RouteOverlay>,
    pub glyphs: Vec<ModeChangeGlyph>,
    pub camera: Option<CameraMove>,
}

impl RouteMapData {
    pub fn new(viewer: &RouteViewer, plan: &RoutePlan) -> Self {
        Self {
            markers: viewer.markers(),
            overlays: plan.overlays(),
            glyphs: plan.glyphs(),
            camera: Some(viewer.initial_camera()),
        }
    }
}

/// JSON route response.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub stops: Vec<SavedStop>,
    pub modes: EnabledModes,
    pub legs: Vec<LegResult>,
    pub total_distance: String,
    pub total_duration: String,
    pub map: RouteMapData,
}

impl RouteResponse {
    pub fn new(viewer: &RouteViewer, plan: &RoutePlan) -> Self {
        let totals = plan.totals();
        Self {
            stops: viewer.stops().to_vec(),
            modes: viewer.modes(),
            legs: plan.legs.iter().map(LegResult::from_leg).collect(),
            total_distance: totals.distance_label(),
            total_duration: totals.duration_label(),
            map: RouteMapData::new(viewer, plan),
        }
    }
}

// ============================================================================
// Common
// ============================================================================

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

/// Pull repeated `venues` (or `venues[]`) fields out of a form body.
pub fn selected_venues(fields: &[(String, String)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(k, _)| k == "venues" || k == "venues[]")
        .map(|(_, v)| v.clone())
        .collect()
}
