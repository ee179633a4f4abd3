//! Mapbox client error types.

/// Errors from the Mapbox HTTP APIs.
#[derive(Debug, thiserror::Error)]
pub enum MapboxError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Access token rejected
    #[error("unauthorized: check MAPBOX_ACCESS_TOKEN")]
    Unauthorized,

    /// Rate limited by the API
    #[error("rate limited by Mapbox")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Directions request succeeded but no route connects the points
    #[error("no route found ({code})")]
    NoRoute { code: String },

    /// Client configuration is unusable
    #[error("invalid configuration: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MapboxError::Api {
            status: 422,
            message: "Invalid coordinates".into(),
        };
        assert_eq!(err.to_string(), "API error 422: Invalid coordinates");

        let err = MapboxError::NoRoute {
            code: "NoRoute".into(),
        };
        assert_eq!(err.to_string(), "no route found (NoRoute)");

        let err = MapboxError::Json {
            message: "missing field `routes`".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("missing field"));
    }
}
