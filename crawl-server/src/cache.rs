//! Caching layer for Mapbox responses.
//!
//! Place searches are cached per (query, city) and directions per
//! (mode, origin, destination). Recalculating a route with unchanged stops,
//! or flipping a mode back on, then costs no upstream requests. Only
//! successful responses are cached, so a transient failure is retried on the
//! next request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::{City, Directions, LngLat, PlaceCandidate, TravelMode};
use crate::mapbox::{DirectionsProvider, MapboxClient, MapboxError, PlacesProvider};

/// Cache key for place searches: (normalised query, city).
type SearchKey = (String, City);

/// Cache key for directions: (mode, "lng,lat;lng,lat").
type RouteKey = (TravelMode, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per cache.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 1000,
        }
    }
}

/// Normalise a search query so trivially different spellings share an entry.
fn search_key(query: &str, city: City) -> SearchKey {
    let normalised = query.split_whitespace().collect::<Vec<_>>().join(" ");
    (normalised.to_lowercase(), city)
}

fn route_key(from: LngLat, to: LngLat, mode: TravelMode) -> RouteKey {
    (mode, format!("{from};{to}"))
}

/// Mapbox client with caching.
///
/// Wraps any provider implementing both traits; production wraps
/// `MapboxClient`.
pub struct CachedMapbox<P = MapboxClient> {
    client: P,
    searches: MokaCache<SearchKey, Arc<Vec<PlaceCandidate>>>,
    routes: MokaCache<RouteKey, Arc<Directions>>,
}

impl<P> CachedMapbox<P> {
    /// Create a new cached client.
    pub fn new(client: P, config: &CacheConfig) -> Self {
        let searches = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            client,
            searches,
            routes,
        }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &P {
        &self.client
    }
}

impl<P> PlacesProvider for CachedMapbox<P>
where
    P: PlacesProvider + Sync,
{
    async fn search_places(
        &self,
        query: &str,
        city: City,
    ) -> Result<Vec<PlaceCandidate>, MapboxError> {
        let key = search_key(query, city);

        if let Some(cached) = self.searches.get(&key).await {
            debug!(query = %key.0, %city, "search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let results = self.client.search_places(query, city).await?;
        self.searches.insert(key, Arc::new(results.clone())).await;

        Ok(results)
    }
}

impl<P> DirectionsProvider for CachedMapbox<P>
where
    P: DirectionsProvider + Sync,
{
    async fn directions(
        &self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
    ) -> Result<Directions, MapboxError> {
        let key = route_key(from, to, mode);

        if let Some(cached) = self.routes.get(&key).await {
            debug!(%mode, waypoints = %key.1, "directions cache hit");
            return Ok(cached.as_ref().clone());
        }

        let directions = self.client.directions(from, to, mode).await?;
        self.routes.insert(key, Arc::new(directions.clone())).await;

        Ok(directions)
    }
}
