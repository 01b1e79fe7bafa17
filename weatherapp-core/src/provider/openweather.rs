use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::{FetchError, FetchOutcome},
    model::{WeatherObservation, WeatherQuery, capitalize_first},
};

use super::WeatherSource;

/// HTTP client for the OpenWeather "current weather" endpoint.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClientBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Bounds the whole request; expiry is reported as a transport error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> anyhow::Result<OpenWeatherClient> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(OpenWeatherClient {
            api_key: self.api_key,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }
}

impl OpenWeatherClient {
    pub fn builder(api_key: impl Into<String>) -> OpenWeatherClientBuilder {
        OpenWeatherClientBuilder {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    fn query_params(&self, query: &WeatherQuery) -> Vec<(&'static str, String)> {
        let mut params = match query {
            WeatherQuery::Place(name) => vec![("q", name.clone())],
            WeatherQuery::Coordinates(c) => vec![
                ("lat", c.latitude.to_string()),
                ("lon", c.longitude.to_string()),
            ],
        };
        params.push(("appid", self.api_key.clone()));
        params.push(("units", "metric".to_string()));
        params
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_weather(&self, query: &WeatherQuery) -> FetchOutcome<WeatherObservation> {
        let url = format!("{}/weather", self.base_url);
        debug!(%query, "requesting current weather");

        let sent = self.http.get(&url).query(&self.query_params(query)).send().await;
        let res = sent.map_err(|err| transport_failure(query, err))?;

        let status = res.status();
        let body = res.text().await.map_err(|err| transport_failure(query, err))?;

        let outcome = interpret_current(status, &body);
        match &outcome {
            Ok(obs) => debug!(%query, name = %obs.name, "weather fetched"),
            Err(err) => warn!(%query, %status, error = %err, "weather fetch failed"),
        }
        outcome
    }
}

fn transport_failure(query: &WeatherQuery, err: reqwest::Error) -> FetchError {
    let err = FetchError::from(err);
    warn!(%query, error = %err, "weather request failed");
    err
}

/// Map a current-weather HTTP response onto an observation or a classified failure.
///
/// An empty body and a bare JSON `null` both count as absent data.
pub fn interpret_current(status: StatusCode, body: &str) -> FetchOutcome<WeatherObservation> {
    let body = body.trim();
    if !status.is_success() || body.is_empty() || body == "null" {
        return Err(FetchError::DataNotFound);
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|err| FetchError::MalformedResponse(err.to_string()))?;

    let description = parsed
        .weather
        .first()
        .map(|w| capitalize_first(&w.description))
        .ok_or_else(|| FetchError::MalformedResponse("no weather conditions in payload".into()))?;

    Ok(WeatherObservation {
        name: parsed.name,
        temperature_c: parsed.main.temp,
        description,
        humidity_pct: parsed.main.humidity,
        wind_speed_mps: parsed.wind.speed,
    })
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONDON: &str = r#"{
        "name": "London",
        "main": { "temp": 15.0, "humidity": 80 },
        "weather": [{ "description": "light rain" }],
        "wind": { "speed": 3.5 }
    }"#;

    #[test]
    fn maps_payload_and_capitalizes_description() {
        let obs = interpret_current(StatusCode::OK, LONDON).expect("should parse");

        assert_eq!(
            obs,
            WeatherObservation {
                name: "London".into(),
                temperature_c: 15.0,
                description: "Light rain".into(),
                humidity_pct: 80,
                wind_speed_mps: 3.5,
            }
        );
    }

    #[test]
    fn ignores_extra_fields() {
        let body = r#"{
            "coord": { "lon": -0.13, "lat": 51.51 },
            "name": "London",
            "dt": 1700000000,
            "main": { "temp": 9.2, "feels_like": 7.0, "humidity": 91 },
            "weather": [{ "id": 500, "description": "light rain" }, { "description": "mist" }],
            "wind": { "speed": 4.1, "deg": 240 }
        }"#;

        let obs = interpret_current(StatusCode::OK, body).expect("should parse");
        assert_eq!(obs.description, "Light rain");
        assert_eq!(obs.humidity_pct, 91);
    }

    #[test]
    fn non_success_status_is_not_found() {
        let err = interpret_current(StatusCode::NOT_FOUND, LONDON).unwrap_err();
        assert_eq!(err, FetchError::DataNotFound);

        let err = interpret_current(StatusCode::UNAUTHORIZED, "{}").unwrap_err();
        assert_eq!(err, FetchError::DataNotFound);
    }

    #[test]
    fn empty_body_is_not_found() {
        for body in ["", "  \n", "null", " null\n"] {
            let err = interpret_current(StatusCode::OK, body).unwrap_err();
            assert_eq!(err, FetchError::DataNotFound, "body {body:?}");
        }
    }

    #[test]
    fn malformed_payloads() {
        let err = interpret_current(StatusCode::OK, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));

        let missing_wind =
            r#"{"name":"X","main":{"temp":1.0,"humidity":2},"weather":[{"description":"a"}]}"#;
        let err = interpret_current(StatusCode::OK, missing_wind).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));

        let no_conditions =
            r#"{"name":"X","main":{"temp":1.0,"humidity":2},"weather":[],"wind":{"speed":1.0}}"#;
        let err = interpret_current(StatusCode::OK, no_conditions).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse(_)));
    }

    #[test]
    fn params_follow_query_tag() {
        let client = OpenWeatherClient::builder("KEY").build().expect("client builds");

        let by_name = client.query_params(&WeatherQuery::place("Berlin"));
        assert!(by_name.contains(&("q", "Berlin".to_string())));
        assert!(by_name.iter().all(|(k, _)| *k != "lat" && *k != "lon"));

        let by_coords = client.query_params(&WeatherQuery::coordinates(120.0, -200.0));
        assert!(by_coords.contains(&("lat", "120".to_string())));
        assert!(by_coords.contains(&("lon", "-200".to_string())));
        assert!(by_coords.iter().all(|(k, _)| *k != "q"));
        assert!(by_coords.contains(&("appid", "KEY".to_string())));
        assert!(by_coords.contains(&("units", "metric".to_string())));
    }
}
