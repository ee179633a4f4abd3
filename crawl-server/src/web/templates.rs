//! Askama templates for the web frontend.

use askama::Template;
use serde::Serialize;

use crate::domain::{City, EnabledModes, TravelMode};
use crate::map::CameraMove;
use crate::route::{RoutePlan, RouteViewer};
use crate::venues::{LEGACY_CAMERA, LEGACY_LINE_COLOR, LegacyRoute, NO_VENUES_SELECTED, VenueCatalog};

use super::dto::{LegResult, RouteMapData, SelectorSnapshot};

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Stop selector page.
#[derive(Template)]
#[template(path = "selector.html")]
pub struct SelectorTemplate {
    pub map_token: String,
    pub cities: Vec<CityOption>,
    pub snapshot: SelectorSnapshot,
    /// Snapshot as JSON for the map script
    pub state_json: String,
}

/// Route viewer page.
#[derive(Template)]
#[template(path = "route.html")]
pub struct RouteTemplate {
    pub map_token: String,
    pub modes: Vec<ModeToggle>,
    pub legs: Vec<LegResult>,
    pub total_distance: String,
    pub total_duration: String,
    /// Legs no enabled mode could route
    pub missing_legs: usize,
    /// Map data as JSON for the map script
    pub map_json: String,
}

/// Legacy venue picker.
#[derive(Template)]
#[template(path = "legacy_venues.html")]
pub struct LegacyVenuesTemplate {
    pub venues: Vec<VenueOption>,
}

/// Legacy straight-line route page.
#[derive(Template)]
#[template(path = "legacy_route.html")]
pub struct LegacyRouteTemplate {
    pub map_token: String,
    pub message: Option<String>,
    pub map_json: String,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One entry of the city dropdown.
#[derive(Debug, Clone)]
pub struct CityOption {
    pub name: &'static str,
    pub selected: bool,
}

impl CityOption {
    pub fn all(selected: Option<City>) -> Vec<Self> {
        City::ALL
            .iter()
            .map(|&c| Self {
                name: c.name(),
                selected: selected == Some(c),
            })
            .collect()
    }
}

/// One travel mode checkbox.
#[derive(Debug, Clone)]
pub struct ModeToggle {
    pub value: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
    pub checked: bool,
}

impl ModeToggle {
    pub fn all(enabled: EnabledModes) -> Vec<Self> {
        TravelMode::ALL
            .iter()
            .map(|&m| Self {
                value: m.as_str(),
                label: m.label(),
                icon: m.icon(),
                color: m.color(),
                checked: enabled.contains(m),
            })
            .collect()
    }
}

/// One checkbox of the legacy venue picker.
#[derive(Debug, Clone)]
pub struct VenueOption {
    pub id: String,
    pub name: String,
}

impl VenueOption {
    pub fn all(catalog: &VenueCatalog) -> Vec<Self> {
        catalog
            .iter()
            .map(|(id, v)| Self {
                id: id.to_string(),
                name: v.name.clone(),
            })
            .collect()
    }
}

/// Serialise data for a `<script>` block.
///
/// `<` is escaped so a stop name cannot close the script element.
pub fn embed_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    Ok(serde_json::to_string(value)?.replace('<', "\\u003c"))
}

impl RouteTemplate {
    pub fn new(
        map_token: String,
        viewer: &RouteViewer,
        plan: &RoutePlan,
    ) -> Result<Self, serde_json::Error> {
        let totals = plan.totals();
        Ok(Self {
            map_token,
            modes: ModeToggle::all(viewer.modes()),
            legs: plan.legs.iter().map(LegResult::from_leg).collect(),
            total_distance: totals.distance_label(),
            total_duration: totals.duration_label(),
            missing_legs: plan.missing_legs(viewer.stops().len()),
            map_json: embed_json(&RouteMapData::new(viewer, plan))?,
        })
    }
}

/// What the legacy map script draws.
#[derive(Serialize)]
struct LegacyMapData<'a> {
    camera: CameraMove,
    line_color: &'static str,
    #[serde(flatten)]
    route: &'a LegacyRoute,
}

impl LegacyRouteTemplate {
    /// `selected` is how many venues were ticked; none shows a message
    /// instead of a route.
    pub fn new(
        map_token: String,
        selected: usize,
        route: &LegacyRoute,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            map_token,
            message: (selected == 0).then(|| NO_VENUES_SELECTED.to_string()),
            map_json: embed_json(&LegacyMapData {
                camera: LEGACY_CAMERA,
                line_color: LEGACY_LINE_COLOR,
                route,
            })?,
        })
    }
}
