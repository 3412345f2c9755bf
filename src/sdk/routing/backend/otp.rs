use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::sdk::routing::error::{ErrorProbe, RoutingError};
use crate::sdk::routing::mode::{Mode, ModeMap};
use crate::sdk::routing::route::{Coord, Isochrone, IsochronePolygon, RouteRequest, RouteSummary};
use crate::sdk::routing::service::{RouteBackend, DEFAULT_TIMEOUT};
use crate::sdk::staticmap::StaticMap;

static MODES: ModeMap = ModeMap::new("WALK", "WALK,BICYCLE", "WALK,CAR", "WALK,TRANSIT");

const OUTER_COLOR: &str = "0x00ff0066";
const HOLE_COLOR: &str = "0xff000066";

// --- Data structures for parsing plan responses ---
#[derive(Deserialize)]
struct PlanResponse {
    plan: Plan,
}
#[derive(Deserialize)]
struct Plan {
    itineraries: Vec<Itinerary>,
}
#[derive(Deserialize)]
struct Itinerary {
    duration: f64,
    legs: Vec<Leg>,
}
#[derive(Deserialize)]
struct Leg {
    distance: f64,
    duration: f64,
}

// --- Data structures for parsing isochrone responses ---
#[derive(Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}
#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
}
#[derive(Deserialize)]
struct Geometry {
    coordinates: Vec<Vec<Vec<[f64; 2]>>>,
}

/// Which part of a returned itinerary supplies distance and duration. The
/// planner moved these fields across schema versions: older deployments
/// report them on the first leg, newer ones on the itinerary with per-leg
/// distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItinerarySource {
    #[default]
    Totals,
    FirstLeg,
}

/// OpenTripPlanner adapter. The only backend that can also compute
/// isochrones.
pub struct OtpBackend {
    client: Client,
    entrypoint: String,
    itinerary_source: ItinerarySource,
    preview: Option<Mutex<StaticMap>>,
}

impl OtpBackend {
    pub fn new(entrypoint: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap(),
            entrypoint: entrypoint.into(),
            itinerary_source: ItinerarySource::default(),
            preview: None,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = Client::builder().timeout(timeout).build().unwrap();
        self
    }

    pub fn itinerary_source(mut self, source: ItinerarySource) -> Self {
        self.itinerary_source = source;
        self
    }

    /// Attaches a static-map sink; each successful isochrone is rendered
    /// into it and the resulting URL logged at debug level.
    pub fn preview(mut self, map: StaticMap) -> Self {
        self.preview = Some(Mutex::new(map));
        self
    }

    /// Generates an isochrone centered at a given point, bounded by a time
    /// budget in seconds and/or a distance budget in meters. At least one
    /// budget must be given; that is checked before any network traffic.
    pub fn isochrone(
        &self,
        from: Coord,
        mode: Mode,
        max_time: Option<u32>,
        max_distance: Option<u32>,
    ) -> Result<Option<Isochrone>, RoutingError> {
        let mut args = Vec::new();
        if let Some(distance) = max_distance {
            args.push(format!("maxWalkDistance={}", distance));
        }
        if let Some(time) = max_time {
            args.push(format!("cutoffSec={}", time));
        }
        if args.is_empty() {
            log::error!("Isochrone requested without max_time or max_distance");
            return Err(RoutingError::MissingCutoff);
        }

        let (from_lon, from_lat) = from;
        let url = format!(
            "http://{}/otp/routers/default/isochrone?fromPlace={},{}&{}&mode={}",
            self.entrypoint,
            from_lat,
            from_lon,
            args.join("&"),
            MODES.translate(mode)
        );

        log::debug!("Sending request: {}", url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;
        log::trace!("Response: {}", text);

        if !status.is_success() {
            log::error!(
                "OpenTripPlanner returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(RoutingError::Status { status, body: text });
        }

        let collection: FeatureCollection = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse isochrone response. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        let Some(feature) = collection.features.into_iter().next() else {
            return Ok(None);
        };
        if feature.geometry.coordinates.is_empty() {
            return Ok(None);
        }

        let polygons = feature
            .geometry
            .coordinates
            .into_iter()
            .filter_map(|rings| {
                let mut rings = rings.into_iter().map(|ring| {
                    ring.into_iter()
                        .map(|[lon, lat]| (lon, lat))
                        .collect::<Vec<Coord>>()
                });
                let outer = rings.next()?;
                Some(IsochronePolygon {
                    outer,
                    holes: rings.collect(),
                })
            })
            .collect();

        let isochrone = Isochrone { polygons };
        self.render_preview(&isochrone);
        Ok(Some(isochrone))
    }

    fn render_preview(&self, isochrone: &Isochrone) {
        let Some(preview) = &self.preview else {
            return;
        };
        let mut map = preview.lock().unwrap();
        for polygon in &isochrone.polygons {
            map.add_polygon(&polygon.outer, OUTER_COLOR);
            for hole in &polygon.holes {
                map.add_polygon(hole, HOLE_COLOR);
            }
        }
        log::debug!("Preview with Google Static Maps API: {}", map.url());
        map.reset();
    }
}

impl RouteBackend for OtpBackend {
    fn mode_map(&self) -> &ModeMap {
        &MODES
    }

    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        let mode = MODES.translate(request.mode);
        let (from_lon, from_lat) = request.from;
        let (to_lon, to_lat) = request.to;

        let mut url = format!(
            "http://{}/otp/routers/default/plan?fromPlace={},{}&toPlace={},{}&mode={}",
            self.entrypoint, from_lat, from_lon, to_lat, to_lon, mode
        );
        if let Some(when) = request.departure_time {
            url = format!(
                "{}&date={}&time={}",
                url,
                when.format("%Y-%m-%d"),
                when.format("%H:%M")
            );
        }

        log::debug!("Sending request: {}", url);
        let response = self.client.get(&url).send()?;
        let status = response.status();
        let text = response.text()?;
        log::trace!("Response: {}", text);

        if !status.is_success() {
            log::error!(
                "OpenTripPlanner returned non-success status: {}. Body: {}",
                status,
                text
            );
            return Err(RoutingError::Status { status, body: text });
        }

        if let Some(error) = serde_json::from_str::<ErrorProbe>(&text)?.error {
            log::warn!("OpenTripPlanner reported an error: {}", error);
            return Ok(None);
        }

        let plan: PlanResponse = serde_json::from_str(&text).map_err(|e| {
            log::error!(
                "Failed to parse plan response. URL: {}\nError: {}. Body: {}",
                url,
                e,
                text
            );
            e
        })?;

        let Some(itinerary) = plan.plan.itineraries.first() else {
            return Ok(None);
        };

        match self.itinerary_source {
            ItinerarySource::Totals => Ok(Some(RouteSummary {
                distance_m: itinerary.legs.iter().map(|leg| leg.distance).sum(),
                duration_s: itinerary.duration,
            })),
            ItinerarySource::FirstLeg => Ok(itinerary.legs.first().map(|leg| RouteSummary {
                distance_m: leg.distance,
                duration_s: leg.duration,
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn mock_endpoint(
        rt: &tokio::runtime::Runtime,
        endpoint: &str,
        body: serde_json::Value,
    ) -> MockServer {
        let endpoint = endpoint.to_string();
        rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path(endpoint))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
            server
        })
    }

    fn plan_body() -> serde_json::Value {
        json!({
            "plan": {"itineraries": [{
                "duration": 1200.0,
                "legs": [
                    {"distance": 800.0, "duration": 700.0},
                    {"distance": 450.0, "duration": 500.0}
                ]
            }]}
        })
    }

    fn request() -> RouteRequest {
        RouteRequest::new((-71.06, 42.35), (-71.05, 42.36), Mode::Transit)
    }

    #[test]
    fn itinerary_totals_sum_leg_distances() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(&rt, "/otp/routers/default/plan", plan_body());

        let backend = OtpBackend::new(server.address().to_string());
        let summary = backend.route(&request()).unwrap().unwrap();
        assert_eq!(summary.distance_m, 1250.0);
        assert_eq!(summary.duration_s, 1200.0);
    }

    #[test]
    fn first_leg_source_reads_only_the_first_leg() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(&rt, "/otp/routers/default/plan", plan_body());

        let backend = OtpBackend::new(server.address().to_string())
            .itinerary_source(ItinerarySource::FirstLeg);
        let summary = backend.route(&request()).unwrap().unwrap();
        assert_eq!(summary.distance_m, 800.0);
        assert_eq!(summary.duration_s, 700.0);
    }

    #[test]
    fn error_member_means_no_route() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            "/otp/routers/default/plan",
            json!({"error": {"id": 404, "msg": "No trip found"}}),
        );

        let backend = OtpBackend::new(server.address().to_string());
        assert_eq!(backend.route(&request()).unwrap(), None);
    }

    #[test]
    fn transit_mode_is_translated() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(&rt, "/otp/routers/default/plan", plan_body());

        let backend = OtpBackend::new(server.address().to_string());
        backend.route(&request()).unwrap();

        let requests = rt.block_on(server.received_requests()).unwrap();
        let query = requests[0].url.query().unwrap_or("");
        assert!(query.contains("mode=WALK,TRANSIT"));
    }

    #[test]
    fn isochrone_requires_a_budget() {
        // The entrypoint is never reached; a network attempt would come
        // back as a Transport error instead.
        let backend = OtpBackend::new("localhost:9");
        let error = backend
            .isochrone((-71.06, 42.35), Mode::Walk, None, None)
            .unwrap_err();
        assert!(matches!(error, RoutingError::MissingCutoff));
    }

    #[test]
    fn isochrone_preserves_ring_order() {
        let outer = json!([[-71.1, 42.3], [-71.0, 42.3], [-71.0, 42.4], [-71.1, 42.3]]);
        let hole = json!([[-71.06, 42.33], [-71.05, 42.33], [-71.05, 42.34], [-71.06, 42.33]]);
        let second = json!([[-70.9, 42.5], [-70.8, 42.5], [-70.8, 42.6], [-70.9, 42.5]]);

        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            "/otp/routers/default/isochrone",
            json!({
                "features": [{
                    "geometry": {"coordinates": [[outer, hole], [second]]}
                }]
            }),
        );

        let backend = OtpBackend::new(server.address().to_string()).preview(StaticMap::new());
        let isochrone = backend
            .isochrone((-71.06, 42.35), Mode::Walk, Some(1800), None)
            .unwrap()
            .unwrap();

        assert_eq!(isochrone.polygons.len(), 2);
        assert_eq!(isochrone.polygons[0].outer[0], (-71.1, 42.3));
        assert_eq!(isochrone.polygons[0].holes.len(), 1);
        assert_eq!(isochrone.polygons[0].holes[0][1], (-71.05, 42.33));
        assert!(isochrone.polygons[1].holes.is_empty());
        assert_eq!(isochrone.polygons[1].outer.len(), 4);
    }

    #[test]
    fn empty_isochrone_geometry_means_no_result() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            "/otp/routers/default/isochrone",
            json!({"features": [{"geometry": {"coordinates": []}}]}),
        );

        let backend = OtpBackend::new(server.address().to_string());
        let result = backend
            .isochrone((-71.06, 42.35), Mode::Walk, None, Some(2000))
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn isochrone_sends_both_budgets() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            "/otp/routers/default/isochrone",
            json!({"features": []}),
        );

        let backend = OtpBackend::new(server.address().to_string());
        backend
            .isochrone((-71.06, 42.35), Mode::Walk, Some(1800), Some(2000))
            .unwrap();

        let requests = rt.block_on(server.received_requests()).unwrap();
        let query = requests[0].url.query().unwrap_or("");
        assert!(query.contains("maxWalkDistance=2000"));
        assert!(query.contains("cutoffSec=1800"));
    }
}
