//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from upstream API errors, which live in `mapbox`.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// City name not in the supported catalog
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// Travel mode name not recognised
    #[error("unknown travel mode: {0}")]
    UnknownMode(String),

    /// A reorder was not a permutation of the current list
    #[error("invalid reorder: {0}")]
    InvalidPermutation(&'static str),

    /// Stop list too short to build a route
    #[error("at least {required} stops are required, found {found}")]
    TooFewStops { required: usize, found: usize },
}
