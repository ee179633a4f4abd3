//! Route screen: fastest mode per leg, overlays and directions.

mod select;
mod viewer;

pub use select::{fastest_leg, leg_candidates, select_fastest};
pub use viewer::{
    ModeChangeGlyph, RenderedLeg, RouteError, RouteOverlay, RoutePlan, RouteTotals, RouteViewer,
    plan_route,
};
