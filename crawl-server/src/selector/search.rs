//! Place search sequencing.
//!
//! Every keystroke may start a search, and responses can arrive out of
//! order. Each search gets a sequence number; a response is applied only if
//! nothing newer has been applied already.

use crate::domain::City;

/// Queries shorter than this do not search.
pub const MIN_QUERY_CHARS: usize = 3;

/// An issued search awaiting its response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub seq: u64,
    pub query: String,
    pub city: City,
}

/// Outcome of starting a search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStart {
    /// Query too short; results should be hidden.
    TooShort,
    /// No city chosen yet; search is disabled.
    NoCity,
    /// Request should be sent upstream.
    Issued(SearchTicket),
}

/// Hands out sequence numbers and rejects stale responses.
#[derive(Debug, Clone, Default)]
pub struct SearchGate {
    issued: u64,
    applied: u64,
}

impl SearchGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a search for `query`.
    ///
    /// Short queries and missing cities also advance the sequence, so any
    /// response still in flight is treated as stale.
    pub fn begin(&mut self, query: &str, city: Option<City>) -> SearchStart {
        self.issued += 1;
        let query = query.trim();

        if query.chars().count() < MIN_QUERY_CHARS {
            self.applied = self.issued;
            return SearchStart::TooShort;
        }

        let Some(city) = city else {
            self.applied = self.issued;
            return SearchStart::NoCity;
        };

        SearchStart::Issued(SearchTicket {
            seq: self.issued,
            query: query.to_string(),
            city,
        })
    }

    /// Whether the response for `ticket` should be shown. Accepting a ticket
    /// makes every older ticket stale.
    pub fn accept(&mut self, ticket: &SearchTicket) -> bool {
        if ticket.seq <= self.applied {
            return false;
        }
        self.applied = ticket.seq;
        true
    }

    /// Invalidate every outstanding search.
    pub fn reset(&mut self) {
        self.issued += 1;
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(start: SearchStart) -> SearchTicket {
        match start {
            SearchStart::Issued(ticket) => ticket,
            other => panic!("expected Issued, got {other:?}"),
        }
    }

    #[test]
    fn short_queries_do_not_search() {
        let mut gate = SearchGate::new();
        assert_eq!(gate.begin("ab", Some(City::Brisbane)), SearchStart::TooShort);
        assert_eq!(gate.begin("  ab  ", Some(City::Brisbane)), SearchStart::TooShort);
        assert!(matches!(gate.begin("abc", Some(City::Brisbane)), SearchStart::Issued(_)));
    }

    #[test]
    fn search_needs_city() {
        let mut gate = SearchGate::new();
        assert_eq!(gate.begin("regatta", None), SearchStart::NoCity);
    }

    #[test]
    fn in_order_responses_are_accepted() {
        let mut gate = SearchGate::new();
        let first = issued(gate.begin("reg", Some(City::Brisbane)));
        assert!(gate.accept(&first));
        let second = issued(gate.begin("rega", Some(City::Brisbane)));
        assert!(gate.accept(&second));
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut gate = SearchGate::new();
        let slow = issued(gate.begin("reg", Some(City::Brisbane)));
        let fast = issued(gate.begin("regatta", Some(City::Brisbane)));

        assert!(gate.accept(&fast));
        assert!(!gate.accept(&slow));
    }

    #[test]
    fn clearing_the_box_discards_in_flight_results() {
        let mut gate = SearchGate::new();
        let pending = issued(gate.begin("regatta", Some(City::Brisbane)));
        assert_eq!(gate.begin("", Some(City::Brisbane)), SearchStart::TooShort);
        assert!(!gate.accept(&pending));
    }

    #[test]
    fn reset_discards_everything() {
        let mut gate = SearchGate::new();
        let pending = issued(gate.begin("regatta", Some(City::Brisbane)));
        gate.reset();
        assert!(!gate.accept(&pending));
    }
}
