//! Core library for the `weatherapp` lookup tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather data source abstraction and its OpenWeather client
//! - Current-location resolution behind a permission gate
//! - The presentation sink and the session that drives it
//!
//! It is used by `weatherapp-cli`, but any front end can supply its own
//! [`PresentationSink`] and [`LocationService`].

pub mod config;
pub mod error;
pub mod location;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod session;

pub use config::{Config, LocationConfig};
pub use error::{FetchError, FetchOutcome};
pub use location::{IpLocationService, LocationResolver, LocationService};
pub use model::{Coordinates, WeatherObservation, WeatherQuery};
pub use presentation::{PresentationSink, WeatherView};
pub use provider::{WeatherSource, openweather::OpenWeatherClient, source_from_config};
pub use session::{ActionHandle, WeatherSession};
