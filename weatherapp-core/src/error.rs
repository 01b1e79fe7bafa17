use thiserror::Error;

/// Classified failure of a single fetch or location lookup.
///
/// Every variant is recoverable: callers render the `Display` text and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Location permission is required")]
    PermissionDenied,

    #[error("Unable to get current location")]
    LocationUnavailable,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Weather data not found")]
    DataNotFound,

    #[error("Unexpected response from weather service: {0}")]
    MalformedResponse(String),

    #[error("Error getting location: {0}")]
    Platform(String),
}

/// Result of one fetch or lookup: a success payload or a classified failure.
pub type FetchOutcome<T> = Result<T, FetchError>;

impl From<reqwest::Error> for FetchError {
    // The request URL carries the API key, so it is stripped.
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_short_and_user_facing() {
        assert_eq!(FetchError::DataNotFound.to_string(), "Weather data not found");
        assert_eq!(
            FetchError::Platform("gps off".into()).to_string(),
            "Error getting location: gps off"
        );
        assert_eq!(
            FetchError::PermissionDenied.to_string(),
            "Location permission is required"
        );
    }
}
