use serde::{Deserialize, Serialize};
use std::fmt;

/// A latitude/longitude pair. Values are passed to the provider as given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What to look up: a free-text place name or a coordinate pair.
///
/// Place names are expected to be trimmed and non-empty; the caller checks that.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Place(String),
    Coordinates(Coordinates),
}

impl WeatherQuery {
    pub fn place(name: impl Into<String>) -> Self {
        WeatherQuery::Place(name.into())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        WeatherQuery::Coordinates(Coordinates::new(latitude, longitude))
    }
}

impl fmt::Display for WeatherQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherQuery::Place(name) => f.write_str(name),
            WeatherQuery::Coordinates(c) => write!(f, "({c})"),
        }
    }
}

/// Current conditions returned by a successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub name: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
}

/// Uppercase the first character, leaving the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalize_first_handles_common_inputs() {
        assert_eq!(capitalize_first("light rain"), "Light rain");
        assert_eq!(capitalize_first("Clear sky"), "Clear sky");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(capitalize_first("étoile"), "Étoile");
    }

    #[test]
    fn query_display() {
        assert_eq!(WeatherQuery::place("Paris").to_string(), "Paris");
        assert_eq!(
            WeatherQuery::coordinates(51.5, -0.12).to_string(),
            "(51.5000, -0.1200)"
        );
    }
}
