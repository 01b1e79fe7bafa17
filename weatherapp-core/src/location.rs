//! Current-location lookup behind a permission gate.
//!
//! [`LocationService`] is the platform seam: it answers whether the user has
//! allowed location access and supplies the last known fix. [`LocationResolver`]
//! turns that into a [`FetchOutcome`] and never asks for permission itself.

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};
use tracing::{debug, warn};

use crate::{
    config::{Config, DEFAULT_TIMEOUT_SECS},
    error::{FetchError, FetchOutcome},
    model::Coordinates,
};

pub mod ip;

pub use ip::IpLocationService;

#[async_trait]
pub trait LocationService: Send + Sync + Debug {
    /// Whether the user has granted location access.
    fn permission_granted(&self) -> bool;

    /// Last known position; `Ok(None)` when the platform has no fix yet.
    async fn last_known_location(&self) -> anyhow::Result<Option<Coordinates>>;
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    service: Arc<dyn LocationService>,
    timeout: Duration,
}

impl LocationResolver {
    pub fn new(service: Arc<dyn LocationService>) -> Self {
        Self {
            service,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a resolver over IP geolocation, gated by the configured permission.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let service = IpLocationService::new(
            config.location_endpoint(),
            config.location.permission_granted,
            config.timeout(),
        )?;
        Ok(Self::new(Arc::new(service)).with_timeout(config.timeout()))
    }

    pub fn permission_granted(&self) -> bool {
        self.service.permission_granted()
    }

    pub async fn resolve_current_location(&self) -> FetchOutcome<Coordinates> {
        if !self.service.permission_granted() {
            debug!("location permission not granted");
            return Err(FetchError::PermissionDenied);
        }

        match tokio::time::timeout(self.timeout, self.service.last_known_location()).await {
            Ok(Ok(Some(coords))) => {
                debug!(%coords, "resolved current location");
                Ok(coords)
            }
            Ok(Ok(None)) => Err(FetchError::LocationUnavailable),
            Ok(Err(err)) => {
                warn!(error = %err, "location service failed");
                Err(FetchError::Platform(err.to_string()))
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "location request timed out");
                Err(FetchError::Platform("location request timed out".into()))
            }
        }
    }
}
