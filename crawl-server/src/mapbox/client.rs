//! Mapbox HTTP client.
//!
//! Wraps the Geocoding v5 and Directions v5 endpoints. Handles the access
//! token, concurrency limiting, status mapping and conversion to domain types.

use std::sync::Arc;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{COUNTRY_NAME, City, Directions, LngLat, PlaceCandidate, TravelMode};

use super::convert::{convert_directions, convert_geocode};
use super::error::MapboxError;
use super::provider::{DirectionsProvider, PlacesProvider};
use super::types::{DirectionsResponse, GeocodeResponse};

/// Default base URL for the Mapbox APIs.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 6;

/// Maximum number of place search results.
pub const SEARCH_LIMIT: usize = 5;

/// Configuration for the Mapbox client.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Public or secret access token
    pub access_token: String,
    /// Base URL for the API (defaults to production Mapbox)
    pub base_url: String,
    /// ISO country code place searches are restricted to
    pub country: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            country: "au".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Mapbox API client.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    base_url: Url,
    access_token: String,
    country: String,
    semaphore: Arc<Semaphore>,
}

impl MapboxClient {
    /// Create a new Mapbox client with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MapboxError::Config(format!("invalid base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MapboxError::Config(format!(
                "base URL cannot have a path: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token,
            country: config.country,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Build an endpoint URL from path segments; each segment is
    /// percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL for a place search. The free text is qualified with the city and
    /// country so ambiguous names resolve locally.
    fn geocode_url(&self, query: &str, city: City) -> Url {
        let search = format!("{}, {}, {}.json", query.trim(), city.name(), COUNTRY_NAME);
        let mut url = self.endpoint(&["geocoding", "v5", "mapbox.places", &search]);
        url.query_pairs_mut()
            .append_pair("limit", &SEARCH_LIMIT.to_string())
            .append_pair("types", "poi")
            .append_pair("country", &self.country);
        url
    }

    /// URL for a directions request between two waypoints.
    fn directions_url(&self, from: LngLat, to: LngLat, mode: TravelMode) -> Url {
        let waypoints = format!("{from};{to}");
        let mut url = self.endpoint(&["directions", "v5", "mapbox", mode.profile(), &waypoints]);
        url.query_pairs_mut()
            .append_pair("geometries", "geojson")
            .append_pair("steps", "true");
        url
    }

    /// Issue a GET and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, mut url: Url) -> Result<T, MapboxError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MapboxError::Config("request semaphore closed".to_string()))?;

        // Logged before the token is attached.
        debug!(path = url.path(), "mapbox request");
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token);

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MapboxError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MapboxError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MapboxError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }

    /// Search for points of interest in a city.
    pub async fn search(&self, query: &str, city: City) -> Result<Vec<PlaceCandidate>, MapboxError> {
        let response: GeocodeResponse = self.get_json(self.geocode_url(query, city)).await?;
        Ok(convert_geocode(&response, SEARCH_LIMIT))
    }

    /// Fetch a route between two points.
    pub async fn route(
        &self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
    ) -> Result<Directions, MapboxError> {
        let response: DirectionsResponse =
            self.get_json(self.directions_url(from, to, mode)).await?;
        convert_directions(response)
    }
}

impl PlacesProvider for MapboxClient {
    async fn search_places(
        &self,
        query: &str,
        city: City,
    ) -> Result<Vec<PlaceCandidate>, MapboxError> {
        self.search(query, city).await
    }
}

impl DirectionsProvider for MapboxClient {
    async fn directions(
        &self,
        from: LngLat,
        to: LngLat,
        mode: TravelMode,
    ) -> Result<Directions, MapboxError> {
        self.route(from, to, mode).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MapboxClient {
        MapboxClient::new(MapboxConfig::new("pk.test")).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = MapboxConfig::new("pk.test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.country, "au");
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn config_builders() {
        let config = MapboxConfig::new("pk.test")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(2)
            .with_timeout(5);
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 2);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn rejects_unusable_base_url() {
        let err = MapboxClient::new(MapboxConfig::new("pk").with_base_url("not a url")).unwrap_err();
        assert!(matches!(err, MapboxError::Config(_)));

        let err = MapboxClient::new(MapboxConfig::new("pk").with_base_url("mailto:x@y")).unwrap_err();
        assert!(matches!(err, MapboxError::Config(_)));
    }

    #[test]
    fn geocode_url_qualifies_query() {
        let url = client().geocode_url("regatta", City::Brisbane);
        assert_eq!(
            url.path(),
            "/geocoding/v5/mapbox.places/regatta,%20Brisbane,%20Australia.json"
        );
        let query = url.query().unwrap();
        assert!(query.contains("limit=5"));
        assert!(query.contains("types=poi"));
        assert!(query.contains("country=au"));
        assert!(!query.contains("access_token"));
    }

    #[test]
    fn geocode_url_escapes_slashes() {
        let url = client().geocode_url("ac/dc bar", City::Sydney);
        assert!(url.path().contains("ac%2Fdc%20bar"));
    }

    #[test]
    fn directions_url_uses_mode_profile() {
        let url = client().directions_url(
            LngLat::new(153.03, -27.47),
            LngLat::new(153.02, -27.48),
            TravelMode::Transit,
        );
        assert_eq!(
            url.path(),
            "/directions/v5/mapbox/cycling/153.03,-27.47;153.02,-27.48"
        );
        assert_eq!(url.query(), Some("geometries=geojson&steps=true"));
    }

    #[test]
    fn base_url_with_path_prefix() {
        let client =
            MapboxClient::new(MapboxConfig::new("pk").with_base_url("http://proxy.local/mapbox/"))
                .unwrap();
        let url = client.directions_url(
            LngLat::new(1.0, 2.0),
            LngLat::new(3.0, 4.0),
            TravelMode::Walking,
        );
        assert_eq!(url.path(), "/mapbox/directions/v5/mapbox/walking/1,2;3,4");
    }
}
