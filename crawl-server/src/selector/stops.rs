//! The ordered stop list and its markers.
//!
//! Stops and markers live in one container of pairs, so every add, remove
//! and reorder moves both together. Markers are renumbered from list order
//! after every mutation.

use crate::domain::{DomainError, LngLat, SavedStop, Stop, StopId};
use crate::map::Marker;

/// A stop together with the marker drawn for it.
#[derive(Debug, Clone, PartialEq)]
pub struct StopEntry {
    pub stop: Stop,
    pub marker: Marker,
}

/// Ordered list of selected stops.
///
/// Invariant: `entries[k].marker.number == k + 1` and the marker sits on
/// `entries[k].stop`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopList {
    entries: Vec<StopEntry>,
}

impl StopList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[StopEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&StopEntry> {
        self.entries.get(index)
    }

    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.entries.iter().map(|e| &e.stop)
    }

    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.entries.iter().map(|e| &e.marker)
    }

    pub fn coordinates(&self) -> Vec<LngLat> {
        self.stops().map(Stop::coordinates).collect()
    }

    /// Current index of the stop with `id`.
    pub fn position(&self, id: StopId) -> Option<usize> {
        self.entries.iter().position(|e| e.stop.id() == id)
    }

    /// Whether the list is long enough to route (two or more stops).
    pub fn can_proceed(&self) -> bool {
        self.entries.len() >= 2
    }

    /// Append a stop and its marker.
    pub fn push(&mut self, stop: Stop) -> &StopEntry {
        let marker = Marker::new(self.entries.len(), stop.coordinates(), stop.display_name());
        self.entries.push(StopEntry { stop, marker });
        &self.entries[self.entries.len() - 1]
    }

    /// Remove the stop at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Stop> {
        if index >= self.entries.len() {
            return None;
        }
        let entry = self.entries.remove(index);
        self.renumber();
        Some(entry.stop)
    }

    /// Remove the stop with `id`, if present.
    pub fn remove_by_id(&mut self, id: StopId) -> Option<Stop> {
        let index = self.position(id)?;
        self.remove(index)
    }

    /// Replace the order with `order`, where `order[k]` is the current index
    /// of the stop that should end up at position `k`.
    ///
    /// `order` must be a permutation of `0..len`; otherwise nothing changes.
    pub fn reorder(&mut self, order: &[usize]) -> Result<(), DomainError> {
        validate_permutation(order, self.entries.len())?;

        let mut slots: Vec<Option<StopEntry>> = self.entries.drain(..).map(Some).collect();
        self.entries = order
            .iter()
            .filter_map(|&i| slots[i].take())
            .collect();
        self.renumber();
        Ok(())
    }

    /// The flat records handed to the route screen.
    pub fn to_saved(&self) -> Vec<SavedStop> {
        self.stops().map(Stop::to_saved).collect()
    }

    fn renumber(&mut self) {
        for (index, entry) in self.entries.iter_mut().enumerate() {
            entry.marker.number = index + 1;
        }
    }
}

/// Check that `order` is a permutation of `0..len`.
pub fn validate_permutation(order: &[usize], len: usize) -> Result<(), DomainError> {
    if order.len() != len {
        return Err(DomainError::InvalidPermutation("length differs from stop count"));
    }
    let mut seen = vec![false; len];
    for &i in order {
        let Some(slot) = seen.get_mut(i) else {
            return Err(DomainError::InvalidPermutation("index out of range"));
        };
        if *slot {
            return Err(DomainError::InvalidPermutation("duplicate index"));
        }
        *slot = true;
    }
    Ok(())
}
