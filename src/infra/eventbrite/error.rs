//! Error types for the Eventbrite API client

use thiserror::Error;

/// Errors that can occur when talking to the Eventbrite API
#[derive(Debug, Error)]
pub enum EventbriteError {
    /// Token cannot be sent as an HTTP header
    #[error("Invalid API token: {0}")]
    InvalidToken(String),

    /// Base URL or endpoint could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Rate limited - too many requests
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Unauthorized - invalid or expired token
    #[error("Unauthorized - check EVENTBRITE_TOKEN")]
    Unauthorized,

    /// API returned an error
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// The token has no organization attached
    #[error("No organizations found for your account")]
    NoOrganization,

    /// The organization has nothing live or started
    #[error("No upcoming events found for organization {0}")]
    NoUpcomingEvent(String),
}
