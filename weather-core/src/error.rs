use thiserror::Error;

/// Failures while resolving a location, either from a position source or
/// from the city table.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out after {0} ms")]
    Timeout(u64),
    #[error("Position unavailable")]
    PositionUnavailable,
    #[error("Position provider error: {0}")]
    Provider(String),
    #[error("Invalid search '{0}'. Expected \"City, CC\", e.g. \"Mexico City, MX\"")]
    InvalidQuery(String),
    #[error("City not found: {city}, {country}")]
    CityNotFound { city: String, country: String },
}

/// Failures while fetching a weather snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "No API key configured.\nHint: run `weather-card configure` and enter your API key."
    )]
    MissingApiKey,
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Weather request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Failed to parse weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything the weather card can fail at during one user action.
#[derive(Debug, Error)]
pub enum CardError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
