use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::sdk::routing::error::{ErrorProbe, RoutingError};
use crate::sdk::routing::mode::ModeMap;
use crate::sdk::routing::route::{RouteRequest, RouteSummary};
use crate::sdk::routing::service::{RouteBackend, DEFAULT_TIMEOUT};

static MODES: ModeMap = ModeMap::new("foot", "bike", "car", "none");

#[derive(Deserialize)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}
#[derive(Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
}

/// OSRM adapter. Distances and durations already come back in meters and
/// seconds, so the first route's fields are used directly.
pub struct OsrmBackend {
    client: Client,
    entrypoint: String,
}

impl OsrmBackend {
    pub fn new(entrypoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap(),
            entrypoint: entrypoint.into(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder().timeout(timeout).build().unwrap();
        self
    }
}

impl RouteBackend for OsrmBackend {
    fn mode_map(&self) -> &ModeMap {
        &MODES
    }

    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        let mode = MODES.translate(request.mode);
        let (from_lon, from_lat) = request.from;
        let (to_lon, to_lat) = request.to;

        let url = format!(
            "http://{}/route/v1/{}/{},{};{},{}",
            self.entrypoint, mode, from_lon, from_lat, to_lon, to_lat
        );

        log::debug!("Sending request: {}", url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;
        log::trace!("Response: {}", text);

        if !status.is_success() {
            log::error!("OSRM returned non-success status: {}. Body: {}", status, text);
            return Err(RoutingError::Status { status, body: text });
        }

        if let Some(error) = serde_json::from_str::<ErrorProbe>(&text)?.error {
            log::warn!("OSRM reported an error: {}", error);
            return Ok(None);
        }

        let body: RouteResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse route response. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(body.routes.first().map(|route| RouteSummary {
            distance_m: route.distance,
            duration_s: route.duration,
        }))
    }
}
