//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::warn;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid CRAWL_BIND_ADDR {value:?}: {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
}

/// Process-level settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Mapbox public access token; empty means upstream calls will fail
    pub mapbox_token: String,

    pub bind_addr: SocketAddr,

    /// Directory served under `/static`
    pub static_dir: PathBuf,

    /// Optional JSON venue catalog; the built-in one is used otherwise
    pub venues_file: Option<PathBuf>,
}

impl AppConfig {
    /// Read `MAPBOX_ACCESS_TOKEN`, `CRAWL_BIND_ADDR`, `CRAWL_STATIC_DIR` and
    /// `CRAWL_VENUES_FILE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mapbox_token = lookup("MAPBOX_ACCESS_TOKEN").unwrap_or_else(|| {
            warn!("MAPBOX_ACCESS_TOKEN not set; place search and routing will fail");
            String::new()
        });

        let bind = lookup("CRAWL_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|source| ConfigError::BindAddr {
                value: bind.clone(),
                source,
            })?;

        let static_dir = lookup("CRAWL_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let venues_file = lookup("CRAWL_VENUES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            mapbox_token,
            bind_addr,
            static_dir,
            venues_file,
        })
    }
}
