//! Domain types for the crawl planner.
//!
//! Stops, cities, travel modes and route legs. Types validate their input at
//! construction, so code receiving them can trust their invariants.

mod city;
mod coords;
mod error;
mod leg;
mod mode;
mod stop;

pub use city::{AUSTRALIA_CENTRE, COUNTRY_NAME, City};
pub use coords::{Bounds, LngLat};
pub use error::DomainError;
pub use leg::{Directions, RouteLeg, format_km, format_mins, seconds_to_duration};
pub use mode::{EnabledModes, TravelMode};
pub use stop::{
    NO_ADDRESS, NO_NAME, NO_POSTCODE, NO_SUBURB, PlaceCandidate, SavedStop, Stop, StopId,
};
