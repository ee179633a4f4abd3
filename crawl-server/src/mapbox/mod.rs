//! Mapbox Geocoding and Directions client.
//!
//! Key characteristics of the upstream APIs:
//! - Coordinates are always `[longitude, latitude]`
//! - Place search is free text; the city and country are appended to the
//!   query to keep results local
//! - There is no public-transit routing profile, so transit legs are
//!   requested with the cycling profile

mod client;
mod convert;
mod error;
pub mod mock;
mod provider;
mod types;

pub use client::{MapboxClient, MapboxConfig, SEARCH_LIMIT};
pub use convert::{convert_directions, convert_feature, convert_geocode};
pub use error::MapboxError;
pub use mock::MockMapbox;
pub use provider::{DirectionsProvider, PlacesProvider};
pub use types::{DirectionsResponse, GeocodeResponse};
