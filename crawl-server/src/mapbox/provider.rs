//! Provider traits for place search and routing.
//!
//! The selector and route screens are generic over these, so tests can run
//! them against `MockMapbox` and production against `CachedMapbox`.

use std::future::Future;

use crate::domain::{City, Directions, LngLat, PlaceCandidate, TravelMode};

use super::error::MapboxError;

/// Source of point-of-interest search results.
pub trait PlacesProvider {
    /// Search for points of interest matching `query` within `city`.
    ///
    /// Results are in provider relevance order.
    fn search_places(
        &self,
        query: &str,
        city: City,
    ) -> impl Future<Output = Result<Vec<PlaceCandidate>, MapboxError>> + Send;
}

/// Source of routed paths between two points.
pub trait DirectionsProvider {
    /// Route from `from` to `to` using the profile for `mode`.
    fn directions(
        &self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
    ) -> impl Future<Output = Result<Directions, MapboxError>> + Send;
}
