//! The fixed catalog of supported cities.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::LngLat;
use super::error::DomainError;

/// Centre of Australia, used when no city is selected.
pub const AUSTRALIA_CENTRE: LngLat = LngLat::new(133.7751, -25.2744);

/// Country every place search is scoped to.
pub const COUNTRY_NAME: &str = "Australia";

/// A city the planner can search within.
///
/// Serialises as its display name (e.g. `"Sunshine Coast"`), which is also
/// the form value the selector page submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum City {
    Brisbane,
    #[serde(rename = "Sunshine Coast")]
    SunshineCoast,
    Sydney,
    Melbourne,
    Adelaide,
    Canberra,
    Perth,
}

impl City {
    /// Every city, in the order the selector lists them.
    pub const ALL: [City; 7] = [
        City::Brisbane,
        City::SunshineCoast,
        City::Sydney,
        City::Melbourne,
        City::Adelaide,
        City::Canberra,
        City::Perth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            City::Brisbane => "Brisbane",
            City::SunshineCoast => "Sunshine Coast",
            City::Sydney => "Sydney",
            City::Melbourne => "Melbourne",
            City::Adelaide => "Adelaide",
            City::Canberra => "Canberra",
            City::Perth => "Perth",
        }
    }

    /// Map centre used when the city is chosen.
    pub fn centre(&self) -> LngLat {
        match self {
            City::Brisbane => LngLat::new(153.0281, -27.4679),
            City::SunshineCoast => LngLat::new(153.0666, -26.6500),
            City::Sydney => LngLat::new(151.2093, -33.8688),
            City::Melbourne => LngLat::new(144.9631, -37.8136),
            City::Adelaide => LngLat::new(138.6007, -34.9285),
            City::Canberra => LngLat::new(149.1300, -35.2809),
            City::Perth => LngLat::new(115.8575, -31.9505),
        }
    }

    /// Look up a city by display name (case-insensitive, surrounding
    /// whitespace ignored).
    pub fn parse(name: &str) -> Result<Self, DomainError> {
        let trimmed = name.trim();
        City::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownCity(trimmed.to_string()))
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
