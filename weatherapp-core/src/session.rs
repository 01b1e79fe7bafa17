//! Per-screen glue between user actions, the fetch pipeline and the sink.
//!
//! Each action launches one task inside the session's cancellation scope.
//! Tasks are not sequenced against each other: whichever finishes last is what
//! the sink shows. Closing or dropping the session abandons tasks still in flight
//! and their outcomes never reach the sink.

use std::{future::Future, sync::Arc};
use tokio::task::JoinHandle;
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::debug;

use crate::{
    error::{FetchError, FetchOutcome},
    location::LocationResolver,
    model::{WeatherObservation, WeatherQuery},
    presentation::PresentationSink,
    provider::WeatherSource,
};

pub const EMPTY_CITY_NOTICE: &str = "Please enter a city name";

/// Handle to one launched action. Resolves to the rendered outcome, or `None`
/// when the session was closed before the fetch finished.
pub type ActionHandle = JoinHandle<Option<FetchOutcome<WeatherObservation>>>;

#[derive(Debug)]
pub struct WeatherSession {
    source: Arc<dyn WeatherSource>,
    resolver: LocationResolver,
    sink: Arc<dyn PresentationSink>,
    scope: CancellationToken,
    tasks: TaskTracker,
}

impl WeatherSession {
    pub fn new(
        source: Arc<dyn WeatherSource>,
        resolver: LocationResolver,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            source,
            resolver,
            sink,
            scope: CancellationToken::new(),
            tasks: TaskTracker::new(),
        }
    }

    /// Look up a typed city name. Blank input is reported to the sink and nothing is fetched.
    pub fn search(&self, input: &str) -> Option<ActionHandle> {
        let city = input.trim();
        if city.is_empty() {
            self.sink.show_notice(EMPTY_CITY_NOTICE);
            return None;
        }
        self.fetch(WeatherQuery::place(city))
    }

    /// Launch one fetch. Nothing is launched once the session is closed.
    pub fn fetch(&self, query: WeatherQuery) -> Option<ActionHandle> {
        if self.is_closed() {
            debug!(%query, "session closed, ignoring fetch");
            return None;
        }

        self.sink.loading_started();
        let source = Arc::clone(&self.source);
        Some(self.launch(async move { source.fetch_weather(&query).await }))
    }

    pub fn permission_granted(&self) -> bool {
        self.resolver.permission_granted()
    }

    /// Weather for the current location. Without permission the sink is told so
    /// and no task is launched; the same holds once the session is closed.
    pub fn use_current_location(&self) -> Option<ActionHandle> {
        if self.is_closed() {
            debug!("session closed, ignoring location lookup");
            return None;
        }

        if !self.resolver.permission_granted() {
            let err = FetchError::PermissionDenied;
            self.sink.show_failure(&err, &err.to_string());
            return None;
        }

        self.sink.loading_started();
        let source = Arc::clone(&self.source);
        let resolver = self.resolver.clone();
        Some(self.launch(async move {
            match resolver.resolve_current_location().await {
                Ok(coords) => source.fetch_weather(&WeatherQuery::Coordinates(coords)).await,
                Err(err) => Err(err),
            }
        }))
    }

    /// Abandon everything in flight. Later actions launch nothing.
    pub fn close(&self) {
        self.scope.cancel();
        self.tasks.close();
    }

    pub fn is_closed(&self) -> bool {
        self.scope.is_cancelled()
    }

    /// Wait for every launched task to either render or be abandoned.
    pub async fn finish(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }

    fn launch<F>(&self, work: F) -> ActionHandle
    where
        F: Future<Output = FetchOutcome<WeatherObservation>> + Send + 'static,
    {
        let scope = self.scope.clone();
        let sink = Arc::clone(&self.sink);

        self.tasks.spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = scope.cancelled() => {
                    debug!("session closed, abandoning fetch");
                    return None;
                }
                outcome = work => outcome,
            };

            match &outcome {
                Ok(obs) => sink.show_observation(obs),
                Err(err) => sink.show_failure(err, &err.to_string()),
            }
            Some(outcome)
        })
    }
}

impl Drop for WeatherSession {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}
