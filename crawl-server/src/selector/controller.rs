//! The stop selector screen.

use tracing::{debug, warn};

use crate::domain::{City, DomainError, PlaceCandidate, Stop, StopId};
use crate::handoff::{HandoffState, HandoffStore};
use crate::map::{CameraMove, ViewportConfig};
use crate::mapbox::MapboxError;

use super::command::{Dispatched, SelectorCommand, SelectorError};
use super::drag::{DragReorder, Insertion, RowBox};
use super::search::{SearchGate, SearchStart, SearchTicket};
use super::stops::StopList;

/// Notice shown when place search fails upstream.
pub const SEARCH_UNAVAILABLE: &str = "Search is unavailable right now. Please try again.";

/// State of one user's selector screen.
///
/// Every mutation of the stop list goes through `&mut self`, so markers,
/// camera and proceed enablement are updated in the same call as the list.
#[derive(Debug, Clone)]
pub struct Selector {
    city: Option<City>,
    stops: StopList,
    next_id: u32,
    search: SearchGate,
    query: String,
    results: Vec<PlaceCandidate>,
    results_visible: bool,
    notice: Option<String>,
    drag: DragReorder,
    viewport: ViewportConfig,
    camera: CameraMove,
}

impl Selector {
    /// A fresh selector showing the whole country.
    pub fn new(viewport: ViewportConfig) -> Self {
        let camera = viewport.overview();
        Self {
            city: None,
            stops: StopList::new(),
            next_id: 0,
            search: SearchGate::new(),
            query: String::new(),
            results: Vec::new(),
            results_visible: false,
            notice: None,
            drag: DragReorder::new(),
            viewport,
            camera,
        }
    }

    /// Build the selector for a page load.
    ///
    /// When the route screen sent the user back to edit, the saved city and
    /// stops are restored and the camera framed on them; the editing flag is
    /// consumed. Otherwise this is `Selector::new`.
    pub fn restore(store: &mut impl HandoffStore, viewport: ViewportConfig) -> Self {
        let mut selector = Self::new(viewport);
        let Some(state) = store.take_editing() else {
            return selector;
        };

        debug!(stops = state.stops.len(), "restoring selector from handoff");
        selector.city = state.selected_city;
        for saved in &state.stops {
            let id = selector.allocate_id();
            selector.stops.push(Stop::from_saved(id, saved));
        }
        selector.refit();
        selector
    }

    fn allocate_id(&mut self) -> StopId {
        let id = StopId(self.next_id);
        self.next_id += 1;
        id
    }

    fn refit(&mut self) {
        self.camera = self.viewport.fit(&self.stops.coordinates(), self.city);
    }

    // ----- accessors -----

    pub fn city(&self) -> Option<City> {
        self.city
    }

    pub fn stops(&self) -> &StopList {
        &self.stops
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[PlaceCandidate] {
        &self.results
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn camera(&self) -> CameraMove {
        self.camera
    }

    pub fn can_proceed(&self) -> bool {
        self.stops.can_proceed()
    }

    pub fn search_enabled(&self) -> bool {
        self.city.is_some()
    }

    pub fn search_placeholder(&self) -> &'static str {
        if self.search_enabled() {
            "Search for a location..."
        } else {
            "First, select a city..."
        }
    }

    pub fn dragged_row(&self) -> Option<usize> {
        self.drag.dragged_row()
    }

    pub fn separator(&self) -> Option<Insertion> {
        self.drag.separator()
    }

    // ----- city -----

    /// Choose a city (enabling search), or clear it (disabling search).
    pub fn choose_city(&mut self, city: Option<City>) {
        self.city = city;
        self.search.reset();
        self.results.clear();
        self.results_visible = false;
        self.camera = match city {
            Some(city) => self.viewport.city(city),
            None => self.viewport.overview(),
        };
    }

    // ----- search -----

    /// Record a new search box value. Returns a ticket when the query should
    /// be sent upstream.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        self.query = query.to_string();
        match self.search.begin(query, self.city) {
            SearchStart::Issued(ticket) => Some(ticket),
            SearchStart::TooShort | SearchStart::NoCity => {
                self.results_visible = false;
                None
            }
        }
    }

    /// Apply a search response. Stale responses are dropped and `false` is
    /// returned. A failed search shows no results and a notice.
    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        response: Result<Vec<PlaceCandidate>, MapboxError>,
    ) -> bool {
        if !self.search.accept(ticket) {
            debug!(seq = ticket.seq, query = %ticket.query, "discarding stale search response");
            return false;
        }

        match response {
            Ok(results) => {
                self.results = results;
                self.notice = None;
            }
            Err(e) => {
                warn!(query = %ticket.query, error = %e, "place search failed");
                self.results = Vec::new();
                self.notice = Some(SEARCH_UNAVAILABLE.to_string());
            }
        }
        self.results_visible = true;
        true
    }

    pub fn dismiss_results(&mut self) {
        self.results_visible = false;
    }

    // ----- stop list -----

    /// Append a stop built from `candidate` in `city`.
    pub fn add_stop(&mut self, candidate: &PlaceCandidate, city: City) -> StopId {
        let id = self.allocate_id();
        self.stops.push(Stop::from_candidate(id, candidate, city));
        self.drag.cancel();
        self.refit();
        id
    }

    /// Add the search result at `index`, then clear the search box.
    pub fn select(&mut self, index: usize) -> Result<StopId, SelectorError> {
        let city = self.city.ok_or(SelectorError::NoCity)?;
        let candidate = self
            .results
            .get(index)
            .cloned()
            .ok_or(SelectorError::UnknownCandidate(index))?;

        let id = self.add_stop(&candidate, city);
        self.query.clear();
        self.results_visible = false;
        self.search.reset();
        Ok(id)
    }

    /// Remove the stop at `index`. Out of range changes nothing.
    pub fn remove_stop(&mut self, index: usize) -> Option<Stop> {
        let removed = self.stops.remove(index)?;
        self.drag.cancel();
        self.refit();
        Some(removed)
    }

    /// Remove the stop with `id`. Unknown ids change nothing.
    pub fn remove(&mut self, id: StopId) -> Option<Stop> {
        let index = self.stops.position(id)?;
        self.remove_stop(index)
    }

    /// Apply a new order to stops and markers together.
    pub fn reorder(&mut self, order: &[usize]) -> Result<(), SelectorError> {
        self.stops.reorder(order)?;
        self.refit();
        Ok(())
    }

    // ----- drag -----

    pub fn drag_start(&mut self, row: usize) -> Result<(), SelectorError> {
        self.drag.start(row, self.stops.len())?;
        Ok(())
    }

    pub fn drag_over(&mut self, pointer_y: f64, rows: &[RowBox]) -> Result<(), SelectorError> {
        self.drag.over(pointer_y, rows)?;
        Ok(())
    }

    /// Finish a drag over the list; reorders when a drag was in progress.
    pub fn drop_row(&mut self, pointer_y: f64, rows: &[RowBox]) -> Result<(), SelectorError> {
        if let Some(order) = self.drag.drop(pointer_y, rows)? {
            self.reorder(&order)?;
        }
        Ok(())
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    // ----- transitions -----

    /// The handoff for the route screen. Requires at least two stops.
    pub fn proceed(&self) -> Result<HandoffState, SelectorError> {
        if !self.can_proceed() {
            return Err(DomainError::TooFewStops {
                required: 2,
                found: self.stops.len(),
            }
            .into());
        }
        Ok(HandoffState::for_route(self.stops.to_saved(), self.city))
    }

    /// Apply one page command.
    pub fn dispatch(&mut self, command: SelectorCommand) -> Result<Dispatched, SelectorError> {
        match command {
            SelectorCommand::ChooseCity { city } => self.choose_city(city),
            SelectorCommand::Search { query } => {
                if let Some(ticket) = self.begin_search(&query) {
                    return Ok(Dispatched::Search(ticket));
                }
            }
            SelectorCommand::Select { candidate } => {
                self.select(candidate)?;
            }
            SelectorCommand::Remove { stop } => {
                self.remove(stop);
            }
            SelectorCommand::Reorder { order } => self.reorder(&order)?,
            SelectorCommand::DragStart { row } => self.drag_start(row)?,
            SelectorCommand::DragOver { pointer_y, rows } => self.drag_over(pointer_y, &rows)?,
            SelectorCommand::Drop { pointer_y, rows } => self.drop_row(pointer_y, &rows)?,
            SelectorCommand::DragCancel => self.drag_cancel(),
            SelectorCommand::DismissResults => self.dismiss_results(),
            SelectorCommand::Resize { width, height } => {
                self.viewport.resize(width, height);
                self.refit();
            }
            SelectorCommand::Proceed => return Ok(Dispatched::Proceed(self.proceed()?)),
        }
        Ok(Dispatched::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AUSTRALIA_CENTRE, LngLat, SavedStop};
    use crate::handoff::MemoryHandoff;

    fn candidate(name: &str, lng: f64, lat: f64) -> PlaceCandidate {
        PlaceCandidate {
            display_name: name.into(),
            address: format!("{name} address"),
            suburb: "Fortitude Valley".into(),
            postcode: "4006".into(),
            coordinates: LngLat::new(lng, lat),
        }
    }

    fn selector_with(names: &[&str]) -> Selector {
        let mut selector = Selector::new(ViewportConfig::default());
        selector.choose_city(Some(City::Brisbane));
        for (i, name) in names.iter().enumerate() {
            selector.add_stop(&candidate(name, 153.0 + i as f64 * 0.01, -27.45), City::Brisbane);
        }
        selector
    }

    fn names(selector: &Selector) -> Vec<String> {
        selector
            .stops()
            .stops()
            .map(|s| s.display_name().to_string())
            .collect()
    }

    fn rows(n: usize) -> Vec<RowBox> {
        (0..n)
            .map(|i| RowBox {
                top: 40.0 * i as f64,
                height: 40.0,
            })
            .collect()
    }

    #[test]
    fn starts_on_country_overview_with_search_disabled() {
        let selector = Selector::new(ViewportConfig::default());
        assert_eq!(selector.camera().center, AUSTRALIA_CENTRE);
        assert_eq!(selector.camera().zoom, 4.0);
        assert!(!selector.search_enabled());
        assert_eq!(selector.search_placeholder(), "First, select a city...");
    }

    #[test]
    fn choosing_city_enables_search_and_flies_there() {
        let mut selector = Selector::new(ViewportConfig::default());
        selector.choose_city(Some(City::Adelaide));
        assert!(selector.search_enabled());
        assert_eq!(selector.camera().center, City::Adelaide.centre());
        assert_eq!(selector.camera().duration_ms, 5000);

        selector.choose_city(None);
        assert!(!selector.search_enabled());
        assert_eq!(selector.camera().center, AUSTRALIA_CENTRE);
    }

    #[test]
    fn proceed_enablement_tracks_stop_count() {
        let mut selector = selector_with(&["A"]);
        assert!(!selector.can_proceed());
        assert!(selector.proceed().is_err());

        selector.add_stop(&candidate("B", 153.1, -27.4), City::Brisbane);
        assert!(selector.can_proceed());

        selector.remove_stop(0);
        assert!(!selector.can_proceed());
    }

    #[test]
    fn add_refits_camera() {
        let mut selector = selector_with(&[]);
        selector.add_stop(&candidate("A", 153.03, -27.47), City::Brisbane);
        assert_eq!(selector.camera().center, LngLat::new(153.03, -27.47));
        assert_eq!(selector.camera().zoom, 14.0);
    }

    #[test]
    fn removing_twice_past_the_end_is_noop() {
        let mut selector = selector_with(&["A"]);
        assert!(selector.remove_stop(0).is_some());
        let camera = selector.camera();
        assert!(selector.remove_stop(0).is_none());
        assert!(selector.stops().is_empty());
        assert_eq!(selector.camera(), camera);
    }

    #[test]
    fn remove_by_unknown_id_is_noop() {
        let mut selector = selector_with(&["A", "B"]);
        selector
            .dispatch(SelectorCommand::Remove { stop: StopId(99) })
            .unwrap();
        assert_eq!(selector.stops().len(), 2);
        assert_eq!(names(&selector), vec!["A", "B"]);
    }

    #[test]
    fn select_adds_result_and_clears_search() {
        let mut selector = selector_with(&[]);
        let ticket = selector.begin_search("story bridge").unwrap();
        assert!(selector.finish_search(
            &ticket,
            Ok(vec![
                candidate("Story Bridge Hotel", 153.0359, -27.4638),
                candidate("Story Bridge", 153.035, -27.464),
            ])
        ));
        assert!(selector.results_visible());

        selector.dispatch(SelectorCommand::Select { candidate: 1 }).unwrap();
        assert_eq!(names(&selector), vec!["Story Bridge"]);
        assert_eq!(selector.query(), "");
        assert!(!selector.results_visible());

        assert_eq!(
            selector.dispatch(SelectorCommand::Select { candidate: 7 }),
            Err(SelectorError::UnknownCandidate(7))
        );
    }

    #[test]
    fn search_command_yields_ticket_only_for_real_queries() {
        let mut selector = selector_with(&[]);
        let out = selector
            .dispatch(SelectorCommand::Search {
                query: "regatta".into(),
            })
            .unwrap();
        let Dispatched::Search(ticket) = out else {
            panic!("expected a search ticket, got {out:?}");
        };
        assert_eq!(ticket.query, "regatta");
        assert_eq!(ticket.city, City::Brisbane);

        let out = selector
            .dispatch(SelectorCommand::Search { query: "re".into() })
            .unwrap();
        assert_eq!(out, Dispatched::Done);
    }

    #[test]
    fn proceed_command_rejected_below_two_stops() {
        let mut selector = selector_with(&["A"]);
        let before = selector.stops().clone();
        assert_eq!(
            selector.dispatch(SelectorCommand::Proceed),
            Err(SelectorError::Domain(DomainError::TooFewStops {
                required: 2,
                found: 1
            }))
        );
        assert_eq!(selector.stops(), &before);

        selector.add_stop(&candidate("B", 153.1, -27.4), City::Brisbane);
        assert!(matches!(
            selector.dispatch(SelectorCommand::Proceed),
            Ok(Dispatched::Proceed(_))
        ));
    }

    #[test]
    fn short_query_hides_results() {
        let mut selector = selector_with(&[]);
        let ticket = selector.begin_search("regatta").unwrap();
        selector.finish_search(&ticket, Ok(vec![candidate("Regatta", 153.0, -27.48)]));
        assert!(selector.results_visible());

        assert!(selector.begin_search("re").is_none());
        assert!(!selector.results_visible());
    }

    #[test]
    fn stale_search_does_not_overwrite_newer() {
        let mut selector = selector_with(&[]);
        let slow = selector.begin_search("sto").unwrap();
        let fast = selector.begin_search("story bridge").unwrap();

        assert!(selector.finish_search(&fast, Ok(vec![candidate("Story Bridge Hotel", 153.0, -27.4)])));
        assert!(!selector.finish_search(&slow, Ok(vec![candidate("Stones Corner", 153.0, -27.5)])));

        assert_eq!(selector.results()[0].display_name, "Story Bridge Hotel");
    }

    #[test]
    fn failed_search_shows_notice_and_no_results() {
        let mut selector = selector_with(&[]);
        let ticket = selector.begin_search("regatta").unwrap();
        selector.finish_search(
            &ticket,
            Err(MapboxError::Api {
                status: 500,
                message: "boom".into(),
            }),
        );
        assert!(selector.results().is_empty());
        assert_eq!(selector.notice(), Some(SEARCH_UNAVAILABLE));
    }

    #[test]
    fn search_without_city_is_suppressed() {
        let mut selector = Selector::new(ViewportConfig::default());
        assert!(selector.begin_search("regatta").is_none());
        assert_eq!(
            selector.select(0),
            Err(SelectorError::NoCity)
        );
    }

    #[test]
    fn drag_and_drop_reorders_stops_and_markers() {
        let mut selector = selector_with(&["A", "B", "C"]);

        selector.dispatch(SelectorCommand::DragStart { row: 0 }).unwrap();
        assert_eq!(selector.dragged_row(), Some(0));

        // Below B's midpoint (60), above C's (100).
        selector
            .dispatch(SelectorCommand::DragOver {
                pointer_y: 70.0,
                rows: rows(3),
            })
            .unwrap();
        assert_eq!(selector.separator(), Some(Insertion::Before(2)));

        selector
            .dispatch(SelectorCommand::Drop {
                pointer_y: 70.0,
                rows: rows(3),
            })
            .unwrap();

        assert_eq!(names(&selector), vec!["B", "A", "C"]);
        let labels: Vec<_> = selector
            .stops()
            .markers()
            .map(|m| (m.number, m.label.clone()))
            .collect();
        assert_eq!(
            labels,
            vec![(1, "B".to_string()), (2, "A".to_string()), (3, "C".to_string())]
        );
        assert_eq!(selector.dragged_row(), None);
        assert_eq!(selector.separator(), None);
    }

    #[test]
    fn cancelled_drag_keeps_order() {
        let mut selector = selector_with(&["A", "B", "C"]);
        selector.drag_start(2).unwrap();
        selector.drag_over(0.0, &rows(3)).unwrap();
        selector.dispatch(SelectorCommand::DragCancel).unwrap();
        assert_eq!(names(&selector), vec!["A", "B", "C"]);
        assert_eq!(selector.dragged_row(), None);
        assert_eq!(selector.separator(), None);
    }

    #[test]
    fn late_drag_over_after_gesture_ends_is_ignored() {
        let mut selector = selector_with(&["A", "B", "C"]);
        selector.drag_start(0).unwrap();
        selector.drop_row(40.0, &rows(3)).unwrap();
        selector.drag_over(0.0, &rows(3)).unwrap();
        assert_eq!(selector.separator(), None);

        selector.drag_start(1).unwrap();
        selector.drag_cancel();
        selector.drag_over(0.0, &rows(3)).unwrap();
        assert_eq!(selector.dragged_row(), None);
        assert_eq!(selector.separator(), None);
    }

    #[test]
    fn proceed_serialises_stops_in_order() {
        let mut selector = selector_with(&["A", "B", "C"]);
        selector.reorder(&[2, 1, 0]).unwrap();
        let state = selector.proceed().unwrap();

        assert!(!state.editing);
        assert_eq!(state.selected_city, Some(City::Brisbane));
        let names: Vec<_> = state.stops.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
    }

    #[test]
    fn restore_rebuilds_from_editing_handoff() {
        let mut store = MemoryHandoff::new();
        let stops = vec![
            SavedStop {
                name: "A".into(),
                address: "1 A St".into(),
                coordinates: LngLat::new(144.96, -37.81),
                city: City::Melbourne,
            },
            SavedStop {
                name: "B".into(),
                address: "2 B St".into(),
                coordinates: LngLat::new(144.97, -37.82),
                city: City::Melbourne,
            },
        ];
        store.save(HandoffState::for_editing(stops));

        let selector = Selector::restore(&mut store, ViewportConfig::default());
        assert_eq!(selector.city(), Some(City::Melbourne));
        assert_eq!(names(&selector), vec!["A", "B"]);
        assert!(selector.can_proceed());
        assert!((selector.camera().center.lng - 144.965).abs() < 1e-9);
        assert!(selector.stops().get(0).unwrap().stop.locality_line().is_none());

        // Flag consumed: a second load starts fresh.
        let again = Selector::restore(&mut store, ViewportConfig::default());
        assert!(again.stops().is_empty());
    }

    #[test]
    fn resize_refits_with_new_dimensions() {
        let mut selector = selector_with(&["A", "B"]);
        let before = selector.camera().zoom;
        selector
            .dispatch(SelectorCommand::Resize {
                width: 300.0,
                height: 300.0,
            })
            .unwrap();
        assert!(selector.camera().zoom < before);
    }
}
