//! Per-browser session state.
//!
//! Each browser gets an opaque `crawl_session` cookie holding a uuid. The
//! selector, handoff record and route screen for that browser live behind
//! one async mutex, so a stop-list change and its marker change are always
//! observed together. Idle sessions expire from the cache.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::handoff::MemoryHandoff;
use crate::route::RouteViewer;
use crate::selector::Selector;

/// Cookie carrying the session id.
pub const SESSION_COOKIE: &str = "crawl_session";

/// Everything one browser is working on.
#[derive(Debug, Default)]
pub struct Session {
    /// Selector screen; built on first visit to the selector
    pub selector: Option<Selector>,

    /// Record passed between the two screens
    pub handoff: MemoryHandoff,

    /// Route screen; built when the route page opens
    pub route: Option<RouteViewer>,
}

/// Session store configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Sessions untouched for this long are dropped.
    pub idle_timeout: Duration,

    /// Maximum number of live sessions.
    pub max_sessions: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_secs(2 * 60 * 60),
            max_sessions: 10_000,
        }
    }
}

impl SessionConfig {
    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }
}

pub type SharedSession = Arc<Mutex<Session>>;

/// A resolved session for one request.
#[derive(Clone)]
pub struct SessionHandle {
    pub id: Uuid,
    pub session: SharedSession,
    /// Whether the cookie must be (re)issued
    pub is_new: bool,
}

impl SessionHandle {
    pub fn set_cookie(&self) -> String {
        session_cookie(self.id)
    }
}

/// All live sessions.
#[derive(Clone)]
pub struct SessionStore {
    sessions: MokaCache<Uuid, SharedSession>,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        let sessions = MokaCache::builder()
            .time_to_idle(config.idle_timeout)
            .max_capacity(config.max_sessions)
            .build();
        Self { sessions }
    }

    /// Find the session for `id`, or start a new one when the id is absent
    /// or expired.
    pub async fn resolve(&self, id: Option<Uuid>) -> SessionHandle {
        if let Some(id) = id {
            if let Some(session) = self.sessions.get(&id).await {
                return SessionHandle {
                    id,
                    session,
                    is_new: false,
                };
            }
            debug!(%id, "session expired or unknown; starting a new one");
        }

        let id = Uuid::new_v4();
        let session: SharedSession = Arc::default();
        self.sessions.insert(id, session.clone()).await;
        SessionHandle {
            id,
            session,
            is_new: true,
        }
    }

    pub fn len(&self) -> u64 {
        self.sessions.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the session id from a `Cookie` header value.
pub fn parse_session_cookie(header: &str) -> Option<Uuid> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// `Set-Cookie` value for a session id.
pub fn session_cookie(id: Uuid) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cookie_among_others() {
        let id = Uuid::new_v4();
        let header = format!("theme=dark; {SESSION_COOKIE}={id}; other=1");
        assert_eq!(parse_session_cookie(&header), Some(id));
    }

    #[test]
    fn rejects_missing_or_malformed_cookie() {
        assert_eq!(parse_session_cookie("theme=dark"), None);
        assert_eq!(parse_session_cookie("crawl_session=not-a-uuid"), None);
        assert_eq!(parse_session_cookie(""), None);
    }

    #[test]
    fn cookie_round_trips() {
        let id = Uuid::new_v4();
        let set = session_cookie(id);
        assert!(set.ends_with("; Path=/; HttpOnly; SameSite=Lax"));
        let value = set.split(';').next().unwrap();
        assert_eq!(parse_session_cookie(value), Some(id));
    }

    #[tokio::test]
    async fn resolve_reuses_known_sessions() {
        let store = SessionStore::new(&SessionConfig::default());
        let first = store.resolve(None).await;
        assert!(first.is_new);

        first.session.lock().await.route = None;
        let again = store.resolve(Some(first.id)).await;
        assert!(!again.is_new);
        assert_eq!(again.id, first.id);
        assert!(Arc::ptr_eq(&again.session, &first.session));
    }

    #[tokio::test]
    async fn unknown_id_gets_fresh_session() {
        let store = SessionStore::new(&SessionConfig::default());
        let stale = Uuid::new_v4();
        let handle = store.resolve(Some(stale)).await;
        assert!(handle.is_new);
        assert_ne!(handle.id, stale);
    }
}
