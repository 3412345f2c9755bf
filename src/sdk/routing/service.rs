use std::time::Duration;

use super::error::RoutingError;
use super::mode::ModeMap;
use super::route::{RouteRequest, RouteSummary};

/// Entrypoint used for the self-hosted engines when none is given.
pub const DEFAULT_ENTRYPOINT: &str = "localhost:8000";

/// Per-call HTTP timeout applied when none is given.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub trait RouteBackend: Send + Sync {
    /// The backend's vocabulary for canonical travel modes.
    fn mode_map(&self) -> &ModeMap;

    /// Issues one request for a single origin/destination pair.
    ///
    /// `Ok(None)` means the service answered but found no route; transport
    /// failures, non-2xx statuses, and unparseable payloads come back as
    /// errors for the retry wrapper to deal with.
    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError>;
}

impl<B: RouteBackend + ?Sized> RouteBackend for Box<B> {
    fn mode_map(&self) -> &ModeMap {
        (**self).mode_map()
    }

    fn route(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        (**self).route(request)
    }
}
