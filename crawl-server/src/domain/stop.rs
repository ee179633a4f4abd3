//! Stops: the points of interest a user picks for their crawl.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{City, LngLat};

/// Shown when a search result has no street address.
pub const NO_ADDRESS: &str = "No street address available";
/// Shown when a search result has no locality.
pub const NO_SUBURB: &str = "No suburb available";
/// Shown when a search result has no postcode.
pub const NO_POSTCODE: &str = "No postcode available";
/// Shown when a search result has no name at all.
pub const NO_NAME: &str = "Unnamed location";

/// Identifier of a stop within one selector.
///
/// Ids are handed out in increasing order and never reused, so a command
/// naming a removed stop cannot hit a different one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StopId(pub u32);

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One place-search result, before the user selects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub display_name: String,
    pub address: String,
    pub suburb: String,
    pub postcode: String,
    pub coordinates: LngLat,
}

/// A selected point of interest.
///
/// Coordinates are fixed at construction; only the stop's position in its
/// list changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    id: StopId,
    display_name: String,
    address: String,
    suburb: Option<String>,
    postcode: Option<String>,
    coordinates: LngLat,
    city: City,
}

/// Replace a blank field with its placeholder.
fn or_placeholder(value: &str, placeholder: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        placeholder.to_string()
    } else {
        trimmed.to_string()
    }
}

impl Stop {
    /// Build a stop from a search result. Blank fields become placeholders;
    /// nothing is rejected.
    pub fn from_candidate(id: StopId, candidate: &PlaceCandidate, city: City) -> Self {
        Self {
            id,
            display_name: or_placeholder(&candidate.display_name, NO_NAME),
            address: or_placeholder(&candidate.address, NO_ADDRESS),
            suburb: Some(or_placeholder(&candidate.suburb, NO_SUBURB)),
            postcode: Some(or_placeholder(&candidate.postcode, NO_POSTCODE)),
            coordinates: candidate.coordinates,
            city,
        }
    }

    /// Rebuild a stop from its handoff form. Suburb and postcode are not
    /// carried across the handoff, so they stay empty.
    pub fn from_saved(id: StopId, saved: &SavedStop) -> Self {
        Self {
            id,
            display_name: or_placeholder(&saved.name, NO_NAME),
            address: or_placeholder(&saved.address, NO_ADDRESS),
            suburb: None,
            postcode: None,
            coordinates: saved.coordinates,
            city: saved.city,
        }
    }

    pub fn id(&self) -> StopId {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn suburb(&self) -> Option<&str> {
        self.suburb.as_deref()
    }

    pub fn postcode(&self) -> Option<&str> {
        self.postcode.as_deref()
    }

    pub fn coordinates(&self) -> LngLat {
        self.coordinates
    }

    pub fn city(&self) -> City {
        self.city
    }

    /// "Suburb, postcode" line, or `None` when neither is known.
    pub fn locality_line(&self) -> Option<String> {
        match (self.suburb(), self.postcode()) {
            (None, None) => None,
            (Some(s), None) => Some(s.to_string()),
            (None, Some(p)) => Some(p.to_string()),
            (Some(s), Some(p)) => Some(format!("{s}, {p}")),
        }
    }

    /// The flat record handed to the route screen.
    pub fn to_saved(&self) -> SavedStop {
        SavedStop {
            name: self.display_name.clone(),
            address: self.address.clone(),
            coordinates: self.coordinates,
            city: self.city,
        }
    }
}

/// A stop as carried from the selector to the route screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStop {
    pub name: String,
    pub address: String,
    pub coordinates: LngLat,
    pub city: City,
}
