use std::fmt::Debug;

use crate::{error::FetchError, model::WeatherObservation};

/// Receives the results of user actions. Implementations render them.
///
/// Calls may arrive from several tasks at once; the last one wins.
pub trait PresentationSink: Send + Sync + Debug {
    fn loading_started(&self);

    fn show_observation(&self, observation: &WeatherObservation);

    fn show_failure(&self, error: &FetchError, message: &str);

    /// Input problems and other notices that are not fetch failures.
    fn show_notice(&self, message: &str);
}

/// The five display lines of the weather panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherView {
    pub city: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind: String,
}

impl WeatherView {
    pub fn loading() -> Self {
        Self {
            city: "Loading...".into(),
            temperature: "--°C".into(),
            description: "Fetching weather data...".into(),
            humidity: "Humidity: --%".into(),
            wind: "Wind: -- m/s".into(),
        }
    }

    pub fn lines(&self) -> [&str; 5] {
        [
            &self.city,
            &self.temperature,
            &self.description,
            &self.humidity,
            &self.wind,
        ]
    }
}

impl From<&WeatherObservation> for WeatherView {
    fn from(obs: &WeatherObservation) -> Self {
        Self {
            city: obs.name.clone(),
            // Whole degrees, truncated toward zero.
            temperature: format!("{}°C", obs.temperature_c.trunc() as i64),
            description: obs.description.clone(),
            humidity: format!("Humidity: {}%", obs.humidity_pct),
            wind: format!("Wind: {} m/s", obs.wind_speed_mps),
        }
    }
}
