//! Boundary type consumed from the weather-fetch collaborator.
//!
//! How observations are fetched (HTTP, caching, retries) is outside this
//! crate; observations arrive fully formed, by value.

use serde::{Deserialize, Serialize};

/// A single observed weather reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    /// Free-text or coded condition description, e.g. "Leichter Regen".
    pub description: String,
    /// Temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Country name of the observation location.
    pub country: String,
}

impl WeatherObservation {
    pub fn new(description: impl Into<String>, temperature_c: f64, country: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            temperature_c,
            country: country.into(),
        }
    }
}
