use std::fmt;

/// Message shown to the user for any failed occupancy fetch
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

/// Ways a request against the occupancy backend can fail
#[derive(Debug)]
pub enum FetchError {
    /// Backend unreachable, DNS or connection failure
    Network(reqwest::Error),
    /// Backend answered with a non-success HTTP status
    Status(u16),
    /// Response body did not match the expected shape
    Decode(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::Status(code) => write!(f, "HTTP Error {}", code),
            FetchError::Decode(e) => write!(f, "Decode error: {}", e),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(e) => Some(e),
            FetchError::Status(_) => None,
            FetchError::Decode(e) => Some(e),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Network(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e)
    }
}
