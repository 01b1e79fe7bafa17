use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::LocationService;
use crate::model::Coordinates;

/// Approximate location from the public IP address (ip-api.com JSON shape).
#[derive(Debug, Clone)]
pub struct IpLocationService {
    endpoint: String,
    permission_granted: bool,
    http: Client,
}

impl IpLocationService {
    pub fn new(
        endpoint: impl Into<String>,
        permission_granted: bool,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for location lookup")?;

        Ok(Self {
            endpoint: endpoint.into(),
            permission_granted,
            http,
        })
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl LocationService for IpLocationService {
    fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    async fn last_known_location(&self) -> Result<Option<Coordinates>> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[("fields", "status,message,lat,lon")])
            .send()
            .await
            .context("Failed to reach location service")?;

        let status = res.status();
        if !status.is_success() {
            return Err(anyhow!("location service returned status {status}"));
        }

        let parsed: IpApiResponse =
            res.json().await.context("Failed to parse location service response")?;

        match (parsed.status.as_str(), parsed.lat, parsed.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Some(Coordinates::new(lat, lon))),
            _ => {
                debug!(
                    status = %parsed.status,
                    message = parsed.message.as_deref().unwrap_or(""),
                    "no location fix from IP lookup"
                );
                Ok(None)
            }
        }
    }
}
