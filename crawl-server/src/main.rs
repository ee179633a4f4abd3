use crawl_server::cache::{CacheConfig, CachedMapbox};
use crawl_server::config::AppConfig;
use crawl_server::map::ViewportConfig;
use crawl_server::mapbox::{MapboxClient, MapboxConfig};
use crawl_server::session::{SessionConfig, SessionStore};
use crawl_server::venues::VenueCatalog;
use crawl_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crawl_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Mapbox client behind the response cache
    let mapbox_client = MapboxClient::new(MapboxConfig::new(&config.mapbox_token))
        .expect("Failed to create Mapbox client");
    let mapbox = CachedMapbox::new(mapbox_client, &CacheConfig::default());

    let venues = match &config.venues_file {
        Some(path) => VenueCatalog::load(path).expect("Failed to load venue catalog"),
        None => VenueCatalog::builtin(),
    };
    info!(venues = venues.len(), "venue catalog ready");

    let sessions = SessionStore::new(&SessionConfig::default());
    let state = AppState::new(
        mapbox,
        sessions,
        venues,
        ViewportConfig::default(),
        &config.mapbox_token,
    );

    let app = create_router(state, &config.static_dir);

    let addr = config.bind_addr;
    info!("Bar crawl planner listening on http://{addr}");
    info!("  GET  /                     - Stop selector");
    info!("  POST /api/selector/command - Selector commands (JSON)");
    info!("  GET  /route                - Route viewer");
    info!("  GET  /legacy               - Legacy venue route");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
