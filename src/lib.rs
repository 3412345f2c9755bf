pub mod sdk;

pub use sdk::config::BackendConfig;
pub use sdk::routing::backend::{GoogleAuth, GoogleMatrixBackend, ItinerarySource, OsrmBackend, OtpBackend, ValhallaBackend};
pub use sdk::routing::client::{DistanceClient, MAX_ATTEMPTS};
pub use sdk::routing::error::RoutingError;
pub use sdk::routing::mode::{Mode, ModeMap};
pub use sdk::routing::route::{Coord, Isochrone, IsochronePolygon, RouteRequest, RouteSummary};
pub use sdk::routing::service::RouteBackend;
pub use sdk::staticmap::StaticMap;
pub use sdk::util::rate_limit::QuotaLimiter;
