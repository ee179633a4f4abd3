//! Web layer for the crawl planner.
//!
//! Server-rendered pages for the selector and route screens, a JSON API
//! mirroring them, and the legacy venue route page.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
