use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::sdk::routing::error::RoutingError;
use crate::sdk::routing::mode::{Mode, ModeMap};
use crate::sdk::routing::route::{Coord, RouteRequest, RouteSummary};
use crate::sdk::routing::service::{RouteBackend, DEFAULT_TIMEOUT};
use crate::sdk::util::rate_limit::QuotaLimiter;

static MODES: ModeMap = ModeMap::new("walking", "bicycling", "driving", "transit");

const MATRIX_PATH: &str = "/maps/api/distancematrix/json";

// --- Data structures for parsing distance-matrix responses ---
#[derive(Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}
#[derive(Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}
#[derive(Deserialize)]
struct MatrixElement {
    distance: MatrixValue,
    duration: MatrixValue,
}
#[derive(Deserialize)]
struct MatrixValue {
    value: f64,
}

/// API-key accounts can query the matrix; traffic-aware departure times
/// additionally need a Maps for Work client ID and secret.
pub enum GoogleAuth {
    ApiKey(String),
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
}

/// Distance-matrix adapter. The only backend that throttles itself: every
/// request goes through the shared [`QuotaLimiter`] first.
pub struct GoogleMatrixBackend {
    client: Client,
    auth: GoogleAuth,
    limiter: QuotaLimiter,
    base_url: String,
}

impl GoogleMatrixBackend {
    pub fn new(auth: GoogleAuth, limiter: QuotaLimiter) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap(),
            auth,
            limiter,
            base_url: "https://maps.googleapis.com".to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder().timeout(timeout).build().unwrap();
        self
    }

    /// Points the backend at a different host, for proxies and tests.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn auth_params(&self) -> Vec<(&'static str, String)> {
        match &self.auth {
            GoogleAuth::ApiKey(key) => vec![("key", key.clone())],
            GoogleAuth::ClientCredentials {
                client_id,
                client_secret,
            } => vec![
                ("client", client_id.clone()),
                ("signature", client_secret.clone()),
            ],
        }
    }

    fn fetch_matrix(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<Option<MatrixResponse>, RoutingError> {
        let url = format!("{}{}", self.base_url, MATRIX_PATH);
        let response = self.client.get(&url).query(params).send()?;
        let status = response.status();
        let text = response.text()?;
        log::trace!("Response: {}", text);

        if !status.is_success() {
            log::error!(
                "Google returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(RoutingError::Status { status, body: text });
        }

        let matrix: MatrixResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse matrix response. Error: {}. Body: {}",
                e,
                text
            );
            e
        })?;

        if matrix.status != "OK" {
            log::warn!("Google matrix status: {}", matrix.status);
            return Ok(None);
        }
        Ok(Some(matrix))
    }

    /// One origin against many destinations in a single matrix call. The
    /// results come back aligned with the destination order.
    pub fn route_multi(
        &self,
        from: Coord,
        destinations: &[Coord],
        mode: Mode,
    ) -> Result<Option<Vec<RouteSummary>>, RoutingError> {
        let backend_mode = MODES.translate(mode);
        self.limiter.acquire();

        let (from_lon, from_lat) = from;
        let joined = destinations
            .iter()
            .map(|(lon, lat)| format!("{},{}", lat, lon))
            .collect::<Vec<_>>()
            .join("|");

        let mut params = vec![
            ("origins", format!("{},{}", from_lat, from_lon)),
            ("destinations", joined),
            ("units", "metric".to_string()),
            ("mode", backend_mode.to_string()),
        ];
        params.extend(self.auth_params());

        log::debug!("Sending request to Google");
        let Some(matrix) = self.fetch_matrix(&params)? else {
            return Ok(None);
        };

        let Some(row) = matrix.rows.first() else {
            return Ok(None);
        };
        Ok(Some(
            row.elements
                .iter()
                .map(|element| RouteSummary {
                    distance_m: element.distance.value,
                    duration_s: element.duration.value,
                })
                .collect(),
        ))
    }
}

impl RouteBackend for GoogleMatrixBackend {
    fn mode_map(&self) -> &ModeMap {
        &MODES
    }

    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        let backend_mode = MODES.translate(request.mode);
        self.limiter.acquire();

        let (from_lon, from_lat) = request.from;
        let (to_lon, to_lat) = request.to;

        let mut params = vec![
            ("origins", format!("{},{}", from_lat, from_lon)),
            ("destinations", format!("{},{}", to_lat, to_lon)),
            ("units", "metric".to_string()),
            ("mode", backend_mode.to_string()),
        ];

        match (&self.auth, request.departure_time) {
            (GoogleAuth::ClientCredentials { .. }, Some(when)) => {
                log::debug!("Sending live traffic-adjusted request to Google");
                params.push(("departure_time", when.timestamp().to_string()));
            }
            (GoogleAuth::ApiKey(_), Some(_)) => {
                // Traffic-aware queries need a Maps for Work account
                log::debug!("No work credentials, sending a non-traffic request to Google");
            }
            _ => log::debug!("Sending request to Google"),
        }
        params.extend(self.auth_params());

        let Some(matrix) = self.fetch_matrix(&params)? else {
            return Ok(None);
        };

        Ok(matrix
            .rows
            .first()
            .and_then(|row| row.elements.first())
            .map(|element| RouteSummary {
                distance_m: element.distance.value,
                duration_s: element.duration.value,
            }))
    }
}
