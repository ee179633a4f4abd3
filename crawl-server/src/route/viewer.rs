//! The route screen.

use serde::Serialize;
use tracing::info;

use crate::domain::{
    City, DomainError, EnabledModes, LngLat, RouteLeg, SavedStop, TravelMode, format_km,
    format_mins, seconds_to_duration,
};
use crate::handoff::{HandoffState, HandoffStore};
use crate::map::{CameraMove, Marker, ViewportConfig};
use crate::mapbox::DirectionsProvider;

use super::select::fastest_leg;

/// Route screen failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RouteError {
    /// Nothing was handed over; the user must pick stops first
    #[error("no stops have been selected")]
    MissingHandoff,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One routed leg as shown in the directions list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedLeg {
    /// Index of the stop pair this leg joins (`index -> index + 1`)
    pub index: usize,
    pub from_name: String,
    pub to_name: String,
    pub leg: RouteLeg,
}

impl RenderedLeg {
    /// 1-based leg number for display.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    pub fn overlay_id(&self) -> String {
        format!("route{}", self.index)
    }

    pub fn distance_label(&self) -> String {
        format!("{}km", format_km(self.leg.distance_meters))
    }

    pub fn duration_label(&self) -> String {
        format!("{} mins", format_mins(self.leg.duration()))
    }

    pub fn mode(&self) -> TravelMode {
        self.leg.mode
    }
}

/// A coloured path drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub id: String,
    pub color: &'static str,
    pub coordinates: Vec<LngLat>,
}

/// Marker drawn where the traveller switches to a leg's mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeChangeGlyph {
    pub position: LngLat,
    pub mode: TravelMode,
    pub icon: &'static str,
    pub label: String,
}

/// Sum over the legs that routed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteTotals {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

impl RouteTotals {
    pub fn distance_label(&self) -> String {
        format!("{} km", format_km(self.distance_meters))
    }

    pub fn duration(&self) -> chrono::Duration {
        seconds_to_duration(self.duration_seconds)
    }

    pub fn duration_label(&self) -> String {
        format!("{} mins", format_mins(self.duration()))
    }
}

/// A computed route through all stops. Legs with no available mode are
/// absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RoutePlan {
    pub legs: Vec<RenderedLeg>,
}

impl RoutePlan {
    pub fn totals(&self) -> RouteTotals {
        self.legs.iter().fold(RouteTotals::default(), |acc, l| RouteTotals {
            distance_meters: acc.distance_meters + l.leg.distance_meters,
            duration_seconds: acc.duration_seconds + l.leg.duration_seconds,
        })
    }

    pub fn overlays(&self) -> Vec<RouteOverlay> {
        self.legs
            .iter()
            .map(|l| RouteOverlay {
                id: l.overlay_id(),
                color: l.mode().color(),
                coordinates: l.leg.geometry.clone(),
            })
            .collect()
    }

    /// One glyph per leg after the first stop pair, at the leg's start.
    pub fn glyphs(&self) -> Vec<ModeChangeGlyph> {
        self.legs
            .iter()
            .filter(|l| l.index > 0)
            .filter_map(|l| {
                Some(ModeChangeGlyph {
                    position: l.leg.start()?,
                    mode: l.mode(),
                    icon: l.mode().icon(),
                    label: format!("Change to {}", l.mode().as_str()),
                })
            })
            .collect()
    }

    /// Number of legs skipped because nothing could route them.
    pub fn missing_legs(&self, stop_count: usize) -> usize {
        stop_count.saturating_sub(1).saturating_sub(self.legs.len())
    }
}

/// Route every consecutive stop pair, one leg after another.
pub async fn plan_route<P: DirectionsProvider>(
    provider: &P,
    stops: &[SavedStop],
    modes: EnabledModes,
) -> RoutePlan {
    let mut legs = Vec::with_capacity(stops.len().saturating_sub(1));
    for (index, pair) in stops.windows(2).enumerate() {
        let (from, to) = (&pair[0], &pair[1]);
        if let Some(leg) = fastest_leg(provider, from.coordinates, to.coordinates, modes).await {
            legs.push(RenderedLeg {
                index,
                from_name: from.name.clone(),
                to_name: to.name.clone(),
                leg,
            });
        }
    }
    RoutePlan { legs }
}

/// State of one user's route screen.
#[derive(Debug, Clone)]
pub struct RouteViewer {
    stops: Vec<SavedStop>,
    city: Option<City>,
    modes: EnabledModes,
    plan: Option<RoutePlan>,
    viewport: ViewportConfig,
}

impl RouteViewer {
    /// Open the screen from the handoff. Fails without at least two stops.
    pub fn open(store: &impl HandoffStore, viewport: ViewportConfig) -> Result<Self, RouteError> {
        let state = store.load().ok_or(RouteError::MissingHandoff)?;
        if state.stops.len() < 2 {
            return Err(DomainError::TooFewStops {
                required: 2,
                found: state.stops.len(),
            }
            .into());
        }
        Ok(Self {
            stops: state.stops,
            city: state.selected_city,
            modes: EnabledModes::all(),
            plan: None,
            viewport,
        })
    }

    pub fn stops(&self) -> &[SavedStop] {
        &self.stops
    }

    pub fn modes(&self) -> EnabledModes {
        self.modes
    }

    pub fn set_modes(&mut self, modes: EnabledModes) {
        self.modes = modes;
    }

    /// The last computed plan, if any.
    pub fn plan(&self) -> Option<&RoutePlan> {
        self.plan.as_ref()
    }

    /// Numbered markers for every stop, routed or not.
    pub fn markers(&self) -> Vec<Marker> {
        self.stops
            .iter()
            .enumerate()
            .map(|(i, s)| Marker::new(i, s.coordinates, s.name.as_str()))
            .collect()
    }

    /// Camera framing every stop.
    pub fn initial_camera(&self) -> CameraMove {
        let points: Vec<_> = self.stops.iter().map(|s| s.coordinates).collect();
        self.viewport.fit(&points, self.city)
    }

    /// Recompute the route with the current modes, replacing any previous
    /// plan.
    pub async fn recalculate<P: DirectionsProvider>(&mut self, provider: &P) -> &RoutePlan {
        let plan = plan_route(provider, &self.stops, self.modes).await;
        self.replace_plan(plan)
    }

    /// Install a plan computed elsewhere.
    pub fn replace_plan(&mut self, plan: RoutePlan) -> &RoutePlan {
        info!(
            stops = self.stops.len(),
            legs = plan.legs.len(),
            missing = plan.missing_legs(self.stops.len()),
            "route planned"
        );
        self.plan.insert(plan)
    }

    /// Send the user back to edit: save the stops with the editing flag set.
    pub fn back(&self, store: &mut impl HandoffStore) {
        store.save(HandoffState::for_editing(self.stops.clone()));
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::mapbox::MockMapbox;
    use proptest::prelude::*;

    /// Per stop pair, per mode (walking, transit, driving): the scripted
    /// duration in seconds, or `None` when that request fails.
    type Script = Vec<[Option<u32>; 3]>;

    fn stop_at(i: usize) -> SavedStop {
        SavedStop {
            name: format!("Bar {i}"),
            address: String::new(),
            coordinates: LngLat::new(153.0 + i as f64 * 0.01, -27.47),
            city: City::Brisbane,
        }
    }

    fn modes_strategy() -> impl Strategy<Value = EnabledModes> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(walking, transit, driving)| {
            EnabledModes {
                walking,
                transit,
                driving,
            }
        })
    }

    /// A stop count and a script covering each of its pairs.
    fn script_strategy() -> impl Strategy<Value = (usize, Script)> {
        (2usize..7).prop_flat_map(|n| {
            let outcome = prop::option::weighted(0.7, 60u32..3600);
            (
                Just(n),
                prop::collection::vec([outcome.clone(), outcome.clone(), outcome], n - 1),
            )
        })
    }

    fn mock_for(stops: &[SavedStop], script: &Script) -> MockMapbox {
        let mut mock = MockMapbox::new();
        for (pair, outcomes) in stops.windows(2).zip(script) {
            for (mode, outcome) in TravelMode::ALL.iter().zip(outcomes) {
                if let Some(seconds) = outcome {
                    mock = mock.with_route(
                        pair[0].coordinates,
                        pair[1].coordinates,
                        *mode,
                        f64::from(*seconds) * 2.0,
                        f64::from(*seconds),
                    );
                }
            }
        }
        mock
    }

    /// Fastest enabled mode that routed, earlier mode on ties.
    fn expected_mode(outcomes: &[Option<u32>; 3], modes: EnabledModes) -> Option<TravelMode> {
        TravelMode::ALL
            .iter()
            .zip(outcomes)
            .filter(|(mode, _)| modes.contains(**mode))
            .filter_map(|(mode, outcome)| outcome.map(|secs| (*mode, secs)))
            .min_by_key(|(_, secs)| *secs)
            .map(|(mode, _)| mode)
    }

    proptest! {
        #[test]
        fn plan_picks_fastest_enabled_mode((n, script) in script_strategy(), modes in modes_strategy()) {
            let stops: Vec<SavedStop> = (0..n).map(stop_at).collect();
            let mock = mock_for(&stops, &script);

            let plan = futures::executor::block_on(plan_route(&mock, &stops, modes));

            prop_assert!(plan.legs.len() <= n - 1);

            let expected: Vec<(usize, TravelMode)> = script
                .iter()
                .enumerate()
                .filter_map(|(i, outcomes)| expected_mode(outcomes, modes).map(|m| (i, m)))
                .collect();
            let actual: Vec<(usize, TravelMode)> =
                plan.legs.iter().map(|l| (l.index, l.mode())).collect();
            prop_assert_eq!(&actual, &expected);

            for leg in &plan.legs {
                prop_assert!(modes.contains(leg.mode()));
                prop_assert_eq!(leg.from_name.clone(), format!("Bar {}", leg.index));
                prop_assert_eq!(leg.to_name.clone(), format!("Bar {}", leg.index + 1));
            }

            let totals = plan.totals();
            let seconds: f64 = plan.legs.iter().map(|l| l.leg.duration_seconds).sum();
            let meters: f64 = plan.legs.iter().map(|l| l.leg.distance_meters).sum();
            prop_assert_eq!(totals.duration_seconds, seconds);
            prop_assert_eq!(totals.distance_meters, meters);
            prop_assert_eq!(totals.distance_meters, totals.duration_seconds * 2.0);
        }
    }
}
