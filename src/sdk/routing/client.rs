use super::error::RoutingError;
use super::route::{RouteRequest, RouteSummary};
use super::service::RouteBackend;

/// Attempts made before a calculation is abandoned.
pub const MAX_ATTEMPTS: u32 = 5;

/// Retry wrapper sitting between the caller and a [`RouteBackend`].
///
/// `distance` drives the backend's `route` until it returns, retrying
/// transport failures up to `max_attempts` times. A backend that answers
/// "no route" terminates the loop on the spot; that is a result, not a
/// failure.
pub struct DistanceClient<B> {
    backend: B,
    max_attempts: u32,
    fail_fast: bool,
}

impl<B: RouteBackend> DistanceClient<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            max_attempts: MAX_ATTEMPTS,
            fail_fast: true,
        }
    }

    /// When disabled, exhausted retries degrade to `Ok(None)` instead of
    /// surfacing the last error, so "service down" reads like "no route".
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn distance(&self, request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                log::info!("Retrying (attempt {})", attempt);
            }

            match self.backend.route(request) {
                Ok(result) => return Ok(result),
                Err(error) if !error.is_retriable() => return Err(error),
                Err(error) => {
                    log::error!("Error: {}", error);
                    last_error = Some(error);
                }
            }
        }

        log::warn!("Max attempts reached ({})", self.max_attempts);

        match last_error {
            Some(error) if self.fail_fast => Err(error),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::sdk::routing::mode::{Mode, ModeMap};

    static MODES: ModeMap = ModeMap::new("walk", "bike", "drive", "transit");

    enum Reply {
        Summary,
        NoRoute,
        Failure,
        BadMode,
    }

    struct ScriptedBackend {
        reply: Reply,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicU32::new(0),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RouteBackend for ScriptedBackend {
        fn mode_map(&self) -> &ModeMap {
            &MODES
        }

        fn route(&self, _request: &RouteRequest) -> Result<Option<RouteSummary>, RoutingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Summary => Ok(Some(RouteSummary {
                    distance_m: 1000.0,
                    duration_s: 600.0,
                })),
                Reply::NoRoute => Ok(None),
                Reply::Failure => Err(RoutingError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    body: "bad gateway".to_string(),
                }),
                Reply::BadMode => Err(RoutingError::InvalidMode("hovercraft".to_string())),
            }
        }
    }

    fn request() -> RouteRequest {
        RouteRequest::new((-71.06, 42.35), (-71.05, 42.36), Mode::Walk)
    }

    #[test]
    fn returns_the_first_successful_result() {
        let client = DistanceClient::new(ScriptedBackend::new(Reply::Summary));
        let summary = client.distance(&request()).unwrap().unwrap();
        assert_eq!(summary.distance_m, 1000.0);
        assert_eq!(client.backend().calls(), 1);
    }

    #[test]
    fn no_route_is_a_result_not_a_failure() {
        let client = DistanceClient::new(ScriptedBackend::new(Reply::NoRoute));
        assert_eq!(client.distance(&request()).unwrap(), None);
        assert_eq!(client.backend().calls(), 1);
    }

    #[test]
    fn retries_failures_then_surfaces_the_last_error() {
        let client = DistanceClient::new(ScriptedBackend::new(Reply::Failure));
        let error = client.distance(&request()).unwrap_err();
        assert!(matches!(error, RoutingError::Status { .. }));
        assert_eq!(client.backend().calls(), MAX_ATTEMPTS);
    }

    #[test]
    fn degrades_to_no_result_when_not_failing_fast() {
        let client = DistanceClient::new(ScriptedBackend::new(Reply::Failure)).fail_fast(false);
        assert_eq!(client.distance(&request()).unwrap(), None);
        assert_eq!(client.backend().calls(), MAX_ATTEMPTS);
    }

    #[test]
    fn caller_errors_are_not_retried() {
        let client = DistanceClient::new(ScriptedBackend::new(Reply::BadMode));
        let error = client.distance(&request()).unwrap_err();
        assert!(matches!(error, RoutingError::InvalidMode(_)));
        assert_eq!(client.backend().calls(), 1);
    }
}
