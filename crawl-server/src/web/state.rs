//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::CachedMapbox;
use crate::map::ViewportConfig;
use crate::session::SessionStore;
use crate::venues::VenueCatalog;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Cached Mapbox client
    pub mapbox: Arc<CachedMapbox>,

    /// Per-browser selector and route state
    pub sessions: SessionStore,

    /// Venues for the legacy route page
    pub venues: Arc<VenueCatalog>,

    /// Camera policy for new screens
    pub viewport: Arc<ViewportConfig>,

    /// Public token handed to the browser map
    pub map_token: Arc<str>,
}

impl AppState {
    pub fn new(
        mapbox: CachedMapbox,
        sessions: SessionStore,
        venues: VenueCatalog,
        viewport: ViewportConfig,
        map_token: &str,
    ) -> Self {
        Self {
            mapbox: Arc::new(mapbox),
            sessions,
            venues: Arc::new(venues),
            viewport: Arc::new(viewport),
            map_token: Arc::from(map_token),
        }
    }
}
