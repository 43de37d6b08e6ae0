use chrono::NaiveDate;
use thiserror::Error;

/// Problems with what the user asked for, as opposed to upstream failures.
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Cannot analyze weather for a past date ({date}). Choose today or a later date.")]
    PastDate { date: NaiveDate },

    #[error(
        "Weather forecast is only available up to {horizon_days} days in advance \
         (latest allowed date: {latest})."
    )]
    BeyondHorizon { horizon_days: u32, latest: NaiveDate },

    #[error(
        "Invalid coordinates ({latitude}, {longitude}). Latitude must be between -90 and 90, \
         longitude between -180 and 180."
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("Location not found: '{query}'. Please try another search term.")]
    LocationNotFound { query: String },

    #[error("Please enter a location.")]
    EmptyLocation,
}
