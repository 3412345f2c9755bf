use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use crate::sdk::routing::error::{ErrorProbe, RoutingError};
use crate::sdk::routing::mode::ModeMap;
use crate::sdk::routing::route::{RouteRequest, RouteSummary};
use crate::sdk::routing::service::{RouteBackend, DEFAULT_TIMEOUT};

static MODES: ModeMap = ModeMap::new("pedestrian", "bicycle", "auto", "multimodal");

#[derive(Deserialize)]
struct TripResponse {
    trip: Trip,
}
#[derive(Deserialize)]
struct Trip {
    legs: Vec<TripLeg>,
}
#[derive(Deserialize)]
struct TripLeg {
    summary: LegSummary,
}
#[derive(Deserialize)]
struct LegSummary {
    // Kilometers; the canonical result wants meters
    length: f64,
    time: f64,
}

/// Valhalla adapter. The request asks for kilometer units, so lengths are
/// scaled by 1000 on the way out; times are already seconds.
pub struct ValhallaBackend {
    client: Client,
    entrypoint: String,
}

impl ValhallaBackend {
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

impl RouteBackend for ValhallaBackend {
    fn mode_map(&self) -> &ModeMap {
        &MODES
    }

    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        let mode = MODES.translate(request.mode);
        let (from_lon, from_lat) = request.from;
        let (to_lon, to_lat) = request.to;

        let mut body = json!({
            "locations": [
                {"lon": from_lon, "lat": from_lat},
                {"lon": to_lon, "lat": to_lat},
            ],
            "costing": mode,
            "directions_options": {
                "units": "kilometers"
            }
        });

        if !request.avoid.is_empty() {
            body["avoid_locations"] = serde_json::Value::Array(
                request
                    .avoid
                    .iter()
                    .map(|(lon, lat)| json!({"lon": lon, "lat": lat}))
                    .collect(),
            );
        }

        let url = format!("http://{}/route", self.entrypoint);
        log::debug!("Sending request JSON to {}: {}", url, body);
        let response = self.client.post(&url).json(&body).send()?;
        let status = response.status();
        let text = response.text()?;
        log::trace!("Response: {}", text);

        if !status.is_success() {
            log::error!(
                "Valhalla returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(RoutingError::Status { status, body: text });
        }

        if let Some(error) = serde_json::from_str::<ErrorProbe>(&text)?.error {
            log::warn!("Valhalla reported an error: {}", error);
            return Ok(None);
        }

        let trip: TripResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse trip response. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        Ok(trip.trip.legs.first().map(|leg| RouteSummary {
            distance_m: leg.summary.length * 1000.0,
            duration_s: leg.summary.time,
        }))
    }
}
