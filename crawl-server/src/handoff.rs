//! State handed between the selector and route screens.
//!
//! The selector saves the ordered stops when the user proceeds; the route
//! screen loads them, and on "back" saves them again with the editing flag
//! set so the selector restores them. The editing flag is consumed once.

use serde::{Deserialize, Serialize};

use crate::domain::{City, SavedStop};

/// Everything carried across a screen transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffState {
    /// Ordered stops, without suburb and postcode
    pub stops: Vec<SavedStop>,

    /// City to reselect when returning to the selector
    pub selected_city: Option<City>,

    /// Set when the route screen sends the user back to edit
    pub editing: bool,
}

impl HandoffState {
    /// State saved by the selector's proceed action.
    pub fn for_route(stops: Vec<SavedStop>, city: Option<City>) -> Self {
        Self {
            stops,
            selected_city: city,
            editing: false,
        }
    }

    /// State saved by the route screen's back action. The city comes from
    /// the first stop.
    pub fn for_editing(stops: Vec<SavedStop>) -> Self {
        let selected_city = stops.first().map(|s| s.city);
        Self {
            stops,
            selected_city,
            editing: true,
        }
    }
}

/// Narrow typed storage for the handoff.
pub trait HandoffStore {
    fn save(&mut self, state: HandoffState);

    fn load(&self) -> Option<HandoffState>;

    fn clear(&mut self);

    /// Return the saved state if the editing flag is set, clearing the flag
    /// but keeping the stops.
    fn take_editing(&mut self) -> Option<HandoffState> {
        let state = self.load().filter(|s| s.editing)?;
        self.save(HandoffState {
            editing: false,
            ..state.clone()
        });
        Some(state)
    }
}

/// In-memory handoff store, one per browser session.
#[derive(Debug, Clone, Default)]
pub struct MemoryHandoff {
    state: Option<HandoffState>,
}

impl MemoryHandoff {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HandoffStore for MemoryHandoff {
    fn save(&mut self, state: HandoffState) {
        self.state = Some(state);
    }

    fn load(&self) -> Option<HandoffState> {
        self.state.clone()
    }

    fn clear(&mut self) {
        self.state = None;
    }
}
