use chrono::{DateTime, Utc};
use serde::Serialize;

use super::mode::Mode;

/// A (longitude, latitude) pair in WGS84 degrees.
pub type Coord = (f64, f64);

/// One origin/destination query. Immutable per call.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub from: Coord,
    pub to: Coord,
    pub mode: Mode,
    pub departure_time: Option<DateTime<Utc>>,
    pub avoid: Vec<Coord>,
}

impl RouteRequest {
    pub fn new(from: Coord, to: Coord, mode: Mode) -> Self {
        Self {
            from,
            to,
            mode,
            departure_time: None,
            avoid: Vec::new(),
        }
    }

    /// Desired departure time. Google only honors it with Maps for Work
    /// credentials; OpenTripPlanner turns it into date/time parameters.
    pub fn departure_time(mut self, when: DateTime<Utc>) -> Self {
        self.departure_time = Some(when);
        self
    }

    /// Coordinates the route should stay away from (Valhalla only).
    pub fn avoid(mut self, coords: Vec<Coord>) -> Self {
        self.avoid = coords;
        self
    }
}

/// Distance in meters and duration in seconds, whatever the backend's
/// native units were.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
}

/// One polygon of a reachable area: the outer ring bounds it, holes
/// subtract from it. Ring order comes verbatim from the service payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsochronePolygon {
    pub outer: Vec<Coord>,
    pub holes: Vec<Vec<Coord>>,
}

/// Reachable-area geometry for one time or distance budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Isochrone {
    pub polygons: Vec<IsochronePolygon>,
}
