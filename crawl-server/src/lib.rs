//! Bar crawl planner server.
//!
//! Pick a city, search for venues, order them into a crawl, and see the
//! fastest way between each pair of stops.

pub mod cache;
pub mod config;
pub mod domain;
pub mod handoff;
pub mod map;
pub mod mapbox;
pub mod route;
pub mod selector;
pub mod session;
pub mod venues;
pub mod web;
