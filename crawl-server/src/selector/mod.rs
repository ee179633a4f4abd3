//! Stop selection: city choice, place search, and the ordered stop list.
//!
//! The [`Selector`] owns one user's screen state. Page events arrive as
//! [`SelectorCommand`]s; place search is split into `begin_search` and
//! `finish_search` so the network call happens without holding the state.

mod command;
mod controller;
mod drag;
mod search;
mod stops;

pub use command::{Dispatched, SelectorCommand, SelectorError};
pub use controller::{SEARCH_UNAVAILABLE, Selector};
pub use drag::{DragError, DragReorder, Insertion, RowBox, insertion_point, permutation_for};
pub use search::{MIN_QUERY_CHARS, SearchGate, SearchStart, SearchTicket};
pub use stops::{StopEntry, StopList, validate_permutation};
