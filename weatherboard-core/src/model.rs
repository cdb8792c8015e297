use crate::error::FetchError;

/// One row of current weather data for a single city.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    /// City name as it was requested (trimmed), not the name echoed by the API.
    pub city: String,
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: u8,
    /// Condition category, e.g. "Clear" or "Rain".
    pub weather: String,
    /// Wind speed in m/s.
    pub wind: f64,
}

/// A city that produced no record, with the reason why.
#[derive(Debug)]
pub struct FetchFailure {
    pub city: String,
    pub error: FetchError,
}

/// Outcome of one pass over the city list, in request order.
#[derive(Debug, Default)]
pub struct FetchReport {
    pub records: Vec<WeatherRecord>,
    pub failures: Vec<FetchFailure>,
}
