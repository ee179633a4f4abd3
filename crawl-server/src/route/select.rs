//! Per-leg travel mode selection.
//!
//! Every enabled mode is requested concurrently, all responses are awaited,
//! and only then is the fastest one picked. A mode that fails is simply not
//! a candidate.

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{EnabledModes, LngLat, RouteLeg};
use crate::mapbox::DirectionsProvider;

/// Request `from -> to` in every enabled mode and return the ones that
/// routed, in mode priority order.
pub async fn leg_candidates<P: DirectionsProvider>(
    provider: &P,
    from: LngLat,
    to: LngLat,
    modes: EnabledModes,
) -> Vec<RouteLeg> {
    let modes: Vec<_> = modes.iter().collect();
    let requests = modes.iter().map(|&mode| provider.directions(from, to, mode));
    let responses = join_all(requests).await;

    modes
        .into_iter()
        .zip(responses)
        .filter_map(|(mode, response)| match response {
            Ok(directions) if directions.duration_seconds.is_finite() => {
                Some(RouteLeg::new(mode, directions))
            }
            Ok(directions) => {
                warn!(%mode, %from, %to, duration = directions.duration_seconds, "ignoring route with invalid duration");
                None
            }
            Err(e) => {
                warn!(%mode, %from, %to, error = %e, "mode unavailable for leg");
                None
            }
        })
        .collect()
}

/// The fastest candidate. Equal durations go to the earlier mode in
/// walking, transit, driving order.
pub fn select_fastest(candidates: Vec<RouteLeg>) -> Option<RouteLeg> {
    candidates.into_iter().min_by(|a, b| {
        a.duration_seconds
            .total_cmp(&b.duration_seconds)
            .then(a.mode.cmp(&b.mode))
    })
}

/// Join-then-select for one leg. `None` when no mode could route it.
pub async fn fastest_leg<P: DirectionsProvider>(
    provider: &P,
    from: LngLat,
    to: LngLat,
    modes: EnabledModes,
) -> Option<RouteLeg> {
    let chosen = select_fastest(leg_candidates(provider, from, to, modes).await);
    match &chosen {
        Some(leg) => debug!(%from, %to, mode = %leg.mode, duration = leg.duration_seconds, "selected mode for leg"),
        None => warn!(%from, %to, "no travel mode available for leg"),
    }
    chosen
}
