//! HTTP route handlers.

use std::path::Path;

use askama::Template;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use crate::domain::DomainError;
use crate::handoff::HandoffStore;
use crate::mapbox::PlacesProvider;
use crate::route::{RoutePlan, RouteViewer, plan_route};
use crate::selector::{
    Dispatched, Insertion, SearchTicket, Selector, SelectorCommand, SelectorError,
    permutation_for,
};
use crate::session::{Session, SessionHandle, SharedSession, parse_session_cookie};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(selector_page))
        .route("/health", get(health))
        .route("/api/selector", get(selector_state))
        .route("/api/selector/search", get(search_places))
        .route("/api/selector/command", post(selector_command))
        .route("/selector/city", post(choose_city_form))
        .route("/selector/select", post(select_form))
        .route("/selector/remove", post(remove_form))
        .route("/selector/move", post(move_form))
        .route("/selector/proceed", post(proceed_form))
        .route("/route", get(route_page))
        .route("/route/back", post(route_back))
        .route("/legacy", get(legacy_page))
        .route("/legacy/route", post(legacy_route))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

// ============================================================================
// Sessions
// ============================================================================

async fn resolve_session(state: &AppState, headers: &HeaderMap) -> SessionHandle {
    let id = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(parse_session_cookie);
    state.sessions.resolve(id).await
}

/// Attach the session cookie to a response when the session is new.
fn with_cookie(handle: &SessionHandle, response: impl IntoResponse) -> Response {
    let mut response = response.into_response();
    if handle.is_new {
        if let Ok(value) = HeaderValue::from_str(&handle.set_cookie()) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

/// The session's selector, rebuilt from the handoff when the route screen
/// sent the user back to edit.
fn selector_for<'a>(session: &'a mut Session, state: &AppState) -> &'a mut Selector {
    let editing = session.handoff.load().is_some_and(|h| h.editing);
    if editing || session.selector.is_none() {
        session.selector = Some(Selector::restore(
            &mut session.handoff,
            state.viewport.as_ref().clone(),
        ));
    }
    session
        .selector
        .get_or_insert_with(|| Selector::new(state.viewport.as_ref().clone()))
}

/// Run a search without holding the session lock, then apply the result.
async fn run_search(state: &AppState, session: &SharedSession, ticket: SearchTicket) {
    let response = state.mapbox.search_places(&ticket.query, ticket.city).await;
    let mut guard = session.lock().await;
    if let Some(selector) = guard.selector.as_mut() {
        selector.finish_search(&ticket, response);
    }
}

/// Apply a selector command. Returns where the page should go next, if
/// anywhere.
async fn apply_command(
    state: &AppState,
    handle: &SessionHandle,
    command: SelectorCommand,
) -> Result<Option<&'static str>, AppError> {
    let outcome = {
        let mut guard = handle.session.lock().await;
        selector_for(&mut guard, state).dispatch(command)?
    };

    match outcome {
        Dispatched::Done => Ok(None),
        Dispatched::Search(ticket) => {
            run_search(state, &handle.session, ticket).await;
            Ok(None)
        }
        Dispatched::Proceed(handoff) => {
            let mut guard = handle.session.lock().await;
            info!(stops = handoff.stops.len(), "proceeding to route");
            guard.handoff.save(handoff);
            guard.route = None;
            Ok(Some("/route"))
        }
    }
}

async fn snapshot(state: &AppState, handle: &SessionHandle) -> SelectorSnapshot {
    let mut guard = handle.session.lock().await;
    SelectorSnapshot::from_selector(selector_for(&mut guard, state))
}

// ============================================================================
// Selector
// ============================================================================

/// Selector page. `?q=` runs a place search before rendering.
async fn selector_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let handle = resolve_session(&state, &headers).await;
    if let Some(q) = query.q {
        apply_command(&state, &handle, SelectorCommand::Search { query: q }).await?;
    }

    let snapshot = snapshot(&state, &handle).await;
    let template = SelectorTemplate {
        map_token: state.map_token.to_string(),
        cities: CityOption::all(snapshot.city),
        state_json: embed_json(&snapshot).map_err(AppError::internal)?,
        snapshot,
    };
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;

    Ok(with_cookie(&handle, Html(html)))
}

/// Current selector state as JSON.
async fn selector_state(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = resolve_session(&state, &headers).await;
    let snapshot = snapshot(&state, &handle).await;
    with_cookie(&handle, Json(snapshot))
}

/// Place search; returns the updated selector state.
async fn search_places(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let handle = resolve_session(&state, &headers).await;
    let command = SelectorCommand::Search {
        query: query.q.unwrap_or_default(),
    };
    apply_command(&state, &handle, command).await?;
    let snapshot = snapshot(&state, &handle).await;
    Ok(with_cookie(&handle, Json(snapshot)))
}

/// Typed command endpoint used by the page script.
async fn selector_command(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(command): Json<SelectorCommand>,
) -> Result<Response, AppError> {
    let handle = resolve_session(&state, &headers).await;
    let redirect = apply_command(&state, &handle, command).await?;
    let selector = snapshot(&state, &handle).await;
    let body = CommandResponse {
        selector,
        redirect: redirect.map(str::to_string),
    };
    Ok(with_cookie(&handle, Json(body)))
}

/// Apply a command from an HTML form and go back to the selector page.
async fn form_command(
    state: &AppState,
    headers: &HeaderMap,
    command: SelectorCommand,
) -> Result<Response, AppError> {
    let handle = resolve_session(state, headers).await;
    match apply_command(state, &handle, command).await {
        Ok(next) => Ok(with_cookie(&handle, Redirect::to(next.unwrap_or("/")))),
        Err(e) if accepts_html(headers) => Ok(with_cookie(&handle, e.into_html())),
        Err(e) => Err(e),
    }
}

async fn choose_city_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CityForm>,
) -> Result<Response, AppError> {
    let city = form.city()?;
    form_command(&state, &headers, SelectorCommand::ChooseCity { city }).await
}

async fn select_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectForm>,
) -> Result<Response, AppError> {
    let command = SelectorCommand::Select {
        candidate: form.candidate,
    };
    form_command(&state, &headers, command).await
}

async fn remove_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RemoveForm>,
) -> Result<Response, AppError> {
    form_command(&state, &headers, SelectorCommand::Remove { stop: form.stop }).await
}

/// Order after moving `row` one place. `None` when it cannot move.
fn move_order(len: usize, row: usize, direction: MoveDirection) -> Option<Vec<usize>> {
    if row >= len {
        return None;
    }
    let insertion = match direction {
        MoveDirection::Up if row == 0 => return None,
        MoveDirection::Up => Insertion::Before(row - 1),
        MoveDirection::Down if row + 1 >= len => return None,
        MoveDirection::Down if row + 2 < len => Insertion::Before(row + 2),
        MoveDirection::Down => Insertion::End,
    };
    Some(permutation_for(len, row, insertion))
}

/// Keyboard and no-script alternative to dragging.
async fn move_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<MoveForm>,
) -> Result<Response, AppError> {
    let handle = resolve_session(&state, &headers).await;
    let order = {
        let mut guard = handle.session.lock().await;
        let len = selector_for(&mut guard, &state).stops().len();
        move_order(len, form.row, form.direction)
    };
    if let Some(order) = order {
        apply_command(&state, &handle, SelectorCommand::Reorder { order }).await?;
    }
    Ok(with_cookie(&handle, Redirect::to("/")))
}

async fn proceed_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    form_command(&state, &headers, SelectorCommand::Proceed).await
}

// ============================================================================
// Route
// ============================================================================

/// Route page. Recalculates when modes change, on `recalculate`, or when no
/// plan exists yet. Without a handoff the user is sent to the selector.
async fn route_page(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<RouteQuery>,
) -> Result<Response, AppError> {
    let handle = resolve_session(&state, &headers).await;
    let requested_modes = query.enabled_modes()?;

    let job = {
        let mut guard = handle.session.lock().await;
        let session = &mut *guard;
        if session.route.is_none() {
            match RouteViewer::open(&session.handoff, state.viewport.as_ref().clone()) {
                Ok(viewer) => session.route = Some(viewer),
                Err(e) => {
                    debug!(error = %e, "route page without stops; redirecting");
                    return Ok(with_cookie(&handle, Redirect::to("/")));
                }
            }
        }
        let Some(viewer) = session.route.as_mut() else {
            return Ok(with_cookie(&handle, Redirect::to("/")));
        };

        let modes_changed = match requested_modes {
            Some(modes) if modes != viewer.modes() => {
                viewer.set_modes(modes);
                true
            }
            _ => false,
        };
        (modes_changed || query.force_recalculate() || viewer.plan().is_none())
            .then(|| (viewer.stops().to_vec(), viewer.modes()))
    };

    if let Some((stops, modes)) = job {
        let plan = plan_route(state.mapbox.as_ref(), &stops, modes).await;
        let mut guard = handle.session.lock().await;
        if let Some(viewer) = guard.route.as_mut().filter(|v| v.modes() == modes) {
            viewer.replace_plan(plan);
        }
    }

    let guard = handle.session.lock().await;
    let Some(viewer) = guard.route.as_ref() else {
        return Ok(with_cookie(&handle, Redirect::to("/")));
    };
    let empty = RoutePlan::default();
    let plan = viewer.plan().unwrap_or(&empty);

    if accepts_html(&headers) {
        let template = RouteTemplate::new(state.map_token.to_string(), viewer, plan)
            .map_err(AppError::internal)?;
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;
        Ok(with_cookie(&handle, Html(html)))
    } else {
        Ok(with_cookie(&handle, Json(RouteResponse::new(viewer, plan))))
    }
}

/// Back to editing: hand the stops to the selector with the editing flag.
async fn route_back(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let handle = resolve_session(&state, &headers).await;
    {
        let mut guard = handle.session.lock().await;
        return_to_editing(&mut guard);
    }
    with_cookie(&handle, Redirect::to("/"))
}

/// Close the route screen. Without an open route there is nothing to hand
/// back, and the selector the user already has stays as it is.
fn return_to_editing(session: &mut Session) {
    if let Some(viewer) = session.route.take() {
        viewer.back(&mut session.handoff);
        session.selector = None;
    }
}

// ============================================================================
// Legacy
// ============================================================================

/// Venue picker for the legacy straight-line route.
async fn legacy_page(State(state): State<AppState>) -> LegacyVenuesTemplate {
    LegacyVenuesTemplate {
        venues: VenueOption::all(&state.venues),
    }
}

async fn legacy_route(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let selected = selected_venues(&fields);
    let route = state.venues.legacy_route(&selected);
    let template = LegacyRouteTemplate::new(state.map_token.to_string(), selected.len(), &route)
        .map_err(AppError::internal)?;
    let html = template.render().map_err(|e| AppError::Internal {
        message: format!("Template error: {}", e),
    })?;
    Ok(Html(html))
}

// ============================================================================
// Errors
// ============================================================================

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl AppError {
    fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }

    fn parts(&self) -> (StatusCode, String) {
        match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        }
    }

    /// Error page for form posts from the browser.
    fn into_html(self) -> Response {
        let (status, message) = self.parts();
        let template = ErrorTemplate {
            title: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            details: (status == StatusCode::BAD_REQUEST)
                .then(|| "Go back to the selector and try again.".to_string()),
        };
        match template.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(_) => self.into_response(),
        }
    }
}

impl From<SelectorError> for AppError {
    fn from(e: SelectorError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = self.parts();

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_html_checks_header() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_html(&headers));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(accepts_html(&headers));
    }

    #[test]
    fn move_order_steps_one_place() {
        assert_eq!(move_order(3, 1, MoveDirection::Up), Some(vec![1, 0, 2]));
        assert_eq!(move_order(3, 1, MoveDirection::Down), Some(vec![0, 2, 1]));
        assert_eq!(move_order(4, 0, MoveDirection::Down), Some(vec![1, 0, 2, 3]));
        assert_eq!(move_order(3, 0, MoveDirection::Up), None);
        assert_eq!(move_order(3, 2, MoveDirection::Down), None);
        assert_eq!(move_order(3, 5, MoveDirection::Up), None);
    }

    #[test]
    fn selector_errors_are_bad_requests() {
        let response = AppError::from(SelectorError::NoCity).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(DomainError::TooFewStops {
            required: 2,
            found: 1,
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::from(SelectorError::NoCity).into_html();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn editing_handoff_rebuilds_selector() {
        use crate::domain::{City, LngLat, SavedStop};
        use crate::handoff::HandoffState;

        let mut session = Session::default();
        let stop = |name: &str, lng: f64| SavedStop {
            name: name.into(),
            address: String::new(),
            coordinates: LngLat::new(lng, -27.47),
            city: City::Brisbane,
        };
        session
            .handoff
            .save(HandoffState::for_editing(vec![stop("A", 153.02), stop("B", 153.03)]));

        let state = test_state();
        let selector = selector_for(&mut session, &state);
        assert_eq!(selector.stops().len(), 2);
        assert_eq!(selector.city(), Some(City::Brisbane));

        // Subsequent loads keep the same selector.
        selector.remove_stop(0);
        assert_eq!(selector_for(&mut session, &state).stops().len(), 1);
    }

    #[test]
    fn repeated_back_keeps_stops() {
        use crate::domain::{City, LngLat, SavedStop};
        use crate::handoff::HandoffState;
        use crate::map::ViewportConfig;

        let stop = |name: &str, lng: f64| SavedStop {
            name: name.into(),
            address: String::new(),
            coordinates: LngLat::new(lng, -27.47),
            city: City::Brisbane,
        };
        let mut session = Session::default();
        session.handoff.save(HandoffState::for_route(
            vec![stop("A", 153.02), stop("B", 153.03)],
            Some(City::Brisbane),
        ));
        session.route =
            Some(RouteViewer::open(&session.handoff, ViewportConfig::default()).unwrap());

        let state = test_state();
        return_to_editing(&mut session);
        assert!(session.route.is_none());
        assert_eq!(selector_for(&mut session, &state).stops().len(), 2);

        // Back again from a cached route page.
        return_to_editing(&mut session);
        let selector = selector_for(&mut session, &state);
        assert_eq!(selector.stops().len(), 2);
        assert_eq!(selector.city(), Some(City::Brisbane));
    }

    fn test_state() -> AppState {
        use crate::cache::{CacheConfig, CachedMapbox};
        use crate::map::ViewportConfig;
        use crate::mapbox::{MapboxClient, MapboxConfig};
        use crate::session::{SessionConfig, SessionStore};
        use crate::venues::VenueCatalog;

        let client = MapboxClient::new(MapboxConfig::new("pk.test")).unwrap();
        AppState::new(
            CachedMapbox::new(client, &CacheConfig::default()),
            SessionStore::new(&SessionConfig::default()),
            VenueCatalog::builtin(),
            ViewportConfig::default(),
            "pk.test",
        )
    }
}
