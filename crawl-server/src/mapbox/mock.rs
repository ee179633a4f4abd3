//! Mock Mapbox provider for testing without API access.
//!
//! Serves scripted search results and directions. Anything not scripted
//! fails the way an unreachable upstream would.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{City, Directions, LngLat, PlaceCandidate, TravelMode};

use super::error::MapboxError;
use super::provider::{DirectionsProvider, PlacesProvider};

/// Directions are keyed by mode and the waypoint pair.
type RouteKey = (TravelMode, String);

fn route_key(from: LngLat, to: LngLat, mode: TravelMode) -> RouteKey {
    (mode, format!("{from};{to}"))
}

/// Mock provider that serves pre-registered responses.
#[derive(Default)]
pub struct MockMapbox {
    places: HashMap<(String, City), Vec<PlaceCandidate>>,
    routes: HashMap<RouteKey, Directions>,
    calls: Mutex<Vec<(TravelMode, LngLat, LngLat)>>,
}

impl MockMapbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register search results for a query (case-insensitive) in a city.
    pub fn with_places(mut self, query: &str, city: City, results: Vec<PlaceCandidate>) -> Self {
        self.places.insert((query.to_lowercase(), city), results);
        self
    }

    /// Register a route. Unregistered (mode, from, to) triples fail.
    pub fn with_route(
        mut self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
        distance_meters: f64,
        duration_seconds: f64,
    ) -> Self {
        let directions = Directions {
            distance_meters,
            duration_seconds,
            geometry: vec![from, to],
            steps: vec![
                format!("Head towards {to} by {mode}"),
                "You have arrived at your destination".to_string(),
            ],
        };
        self.routes.insert(route_key(from, to, mode), directions);
        self
    }

    /// Every directions request made so far, in order.
    pub fn direction_calls(&self) -> Vec<(TravelMode, LngLat, LngLat)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl PlacesProvider for MockMapbox {
    async fn search_places(
        &self,
        query: &str,
        city: City,
    ) -> Result<Vec<PlaceCandidate>, MapboxError> {
        self.places
            .get(&(query.trim().to_lowercase(), city))
            .cloned()
            .ok_or_else(|| MapboxError::Api {
                status: 503,
                message: format!("no mock results for {query:?} in {city}"),
            })
    }
}

impl DirectionsProvider for MockMapbox {
    async fn directions(
        &self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
    ) -> Result<Directions, MapboxError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((mode, from, to));
        }
        self.routes
            .get(&route_key(from, to, mode))
            .cloned()
            .ok_or_else(|| MapboxError::Api {
                status: 503,
                message: format!("no mock {mode} route {from} -> {to}"),
            })
    }
}
