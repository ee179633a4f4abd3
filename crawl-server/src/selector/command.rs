//! Typed commands the selector page sends.

use serde::Deserialize;

use crate::domain::{City, DomainError, StopId};
use crate::handoff::HandoffState;

use super::drag::{DragError, RowBox};
use super::search::SearchTicket;

/// One user interaction on the selector page.
///
/// `Search` and `Proceed` need work outside the selector (a network call, a
/// handoff save); dispatching them returns a [`Dispatched`] telling the
/// caller what to do next.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SelectorCommand {
    /// Pick a city, or clear the choice with `null`
    ChooseCity { city: Option<City> },

    /// Search box changed
    Search { query: String },

    /// Add the search result at this index
    Select { candidate: usize },

    /// Remove a stop; unknown ids are ignored
    Remove { stop: StopId },

    /// Apply an explicit order (`order[k]` = current index of new k-th stop)
    Reorder { order: Vec<usize> },

    DragStart { row: usize },

    DragOver { pointer_y: f64, rows: Vec<RowBox> },

    Drop { pointer_y: f64, rows: Vec<RowBox> },

    /// Drag ended outside the list
    DragCancel,

    /// Clicked outside the results dropdown
    DismissResults,

    /// Map container resized
    Resize { width: f64, height: f64 },

    /// Continue to the route screen
    Proceed,
}

/// What the caller must do after a command was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatched {
    /// Nothing further
    Done,

    /// Send this search upstream, then call `Selector::finish_search`
    Search(SearchTicket),

    /// Save this handoff and navigate to the route screen
    Proceed(HandoffState),
}

/// Rejected selector commands.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectorError {
    #[error("no search result at index {0}")]
    UnknownCandidate(usize),

    #[error("choose a city first")]
    NoCity,

    #[error(transparent)]
    Drag(#[from] DragError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}
