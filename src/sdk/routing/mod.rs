pub mod backend;
pub mod client;
pub mod error;
pub mod mode;
pub mod route;
pub mod service;

pub use backend::{GoogleAuth, GoogleMatrixBackend, ItinerarySource, OsrmBackend, OtpBackend, ValhallaBackend};
pub use client::{DistanceClient, MAX_ATTEMPTS};
pub use error::RoutingError;
pub use mode::{Mode, ModeMap};
pub use route::{Coord, Isochrone, IsochronePolygon, RouteRequest, RouteSummary};
pub use service::{RouteBackend, DEFAULT_ENTRYPOINT, DEFAULT_TIMEOUT};
