//! Travel modes and the set of modes a user has enabled.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DomainError;

/// A way of travelling between two stops.
///
/// Variant order is the tie-break priority when two modes are equally fast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Transit,
    Driving,
}

impl TravelMode {
    /// All modes in priority order.
    pub const ALL: [TravelMode; 3] = [TravelMode::Walking, TravelMode::Transit, TravelMode::Driving];

    /// Routing profile requested from Mapbox.
    ///
    /// Mapbox has no public-transit profile; transit is approximated with
    /// cycling while keeping its own label and colour.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Transit => "cycling",
            TravelMode::Driving => "driving",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Transit => "transit",
            TravelMode::Driving => "driving",
        }
    }

    /// Capitalised label for the directions list.
    pub fn label(&self) -> &'static str {
        match self {
            TravelMode::Walking => "Walking",
            TravelMode::Transit => "Transit",
            TravelMode::Driving => "Driving",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            TravelMode::Walking => "🚶",
            TravelMode::Transit => "🚌",
            TravelMode::Driving => "🚗",
        }
    }

    /// Line colour of the route overlay.
    pub fn color(&self) -> &'static str {
        match self {
            TravelMode::Walking => "#4f46e5",
            TravelMode::Transit => "#059669",
            TravelMode::Driving => "#f97316",
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" => Ok(TravelMode::Walking),
            "transit" => Ok(TravelMode::Transit),
            "driving" => Ok(TravelMode::Driving),
            other => Err(DomainError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which travel modes the route screen may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledModes {
    pub walking: bool,
    pub transit: bool,
    pub driving: bool,
}

impl EnabledModes {
    pub const fn all() -> Self {
        Self {
            walking: true,
            transit: true,
            driving: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            walking: false,
            transit: false,
            driving: false,
        }
    }

    pub fn only(mode: TravelMode) -> Self {
        Self::none().with(mode, true)
    }

    pub fn with(mut self, mode: TravelMode, enabled: bool) -> Self {
        match mode {
            TravelMode::Walking => self.walking = enabled,
            TravelMode::Transit => self.transit = enabled,
            TravelMode::Driving => self.driving = enabled,
        }
        self
    }

    pub fn contains(&self, mode: TravelMode) -> bool {
        match mode {
            TravelMode::Walking => self.walking,
            TravelMode::Transit => self.transit,
            TravelMode::Driving => self.driving,
        }
    }

    /// Enabled modes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = TravelMode> + '_ {
        TravelMode::ALL
            .into_iter()
            .filter(move |m| self.contains(*m))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Parse a comma-separated list such as `"walking,driving"`.
    pub fn parse_list(s: &str) -> Result<Self, DomainError> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::none(), |acc, part| {
                Ok(acc.with(TravelMode::parse(part)?, true))
            })
    }
}

impl Default for EnabledModes {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transit_uses_cycling_profile() {
        assert_eq!(TravelMode::Transit.profile(), "cycling");
        assert_eq!(TravelMode::Transit.label(), "Transit");
        assert_eq!(TravelMode::Walking.profile(), "walking");
        assert_eq!(TravelMode::Driving.profile(), "driving");
    }

    #[test]
    fn iter_follows_priority_order() {
        let modes = EnabledModes::none()
            .with(TravelMode::Driving, true)
            .with(TravelMode::Walking, true);
        let order: Vec<_> = modes.iter().collect();
        assert_eq!(order, vec![TravelMode::Walking, TravelMode::Driving]);
    }

    #[test]
    fn parse_list() {
        let modes = EnabledModes::parse_list("driving, walking").unwrap();
        assert!(modes.walking);
        assert!(!modes.transit);
        assert!(modes.driving);

        assert!(EnabledModes::parse_list("").unwrap().is_empty());
        assert!(EnabledModes::parse_list("walking,teleport").is_err());
    }

    #[test]
    fn only_enables_a_single_mode() {
        let modes = EnabledModes::only(TravelMode::Transit);
        assert_eq!(modes.iter().collect::<Vec<_>>(), vec![TravelMode::Transit]);
    }
}
