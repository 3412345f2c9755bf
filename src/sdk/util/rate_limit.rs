use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

// Defaults from the vendor's published web-service usage limits.
pub const DEFAULT_REQUESTS_PER_PERIOD: u32 = 100_000;
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60 * 24);
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(500);

/// Bounds the request rate against a rolling quota window, sleeping as
/// needed. At most `requests_per_period` acquisitions complete inside one
/// window; the one after that blocks until the window boundary.
pub struct QuotaLimiter {
    requests_per_period: u32,
    period: Duration,
    request_delay: Duration,
    state: Mutex<PeriodState>,
}

struct PeriodState {
    period_start: Option<Instant>,
    requests_this_period: u32,
}

impl QuotaLimiter {
    pub fn new(requests_per_period: u32, period: Duration, request_delay: Duration) -> Self {
        Self {
            requests_per_period,
            period,
            request_delay,
            state: Mutex::new(PeriodState {
                period_start: None,
                requests_this_period: 0,
            }),
        }
    }

    /// Blocks until the caller may issue one more request. The lock is held
    /// across the sleeps so concurrent callers are admitted one at a time.
    ///
    /// The sequence is fixed: inter-request delay, count, quota check,
    /// period-reset check. The first request ever starts the period clock
    /// instead of sleeping.
    pub fn acquire(&self) {
        let mut state = self.state.lock().unwrap();

        match state.period_start {
            None => state.period_start = Some(Instant::now()),
            Some(_) => thread::sleep(self.request_delay),
        }

        state.requests_this_period += 1;

        if state.requests_this_period > self.requests_per_period {
            if let Some(start) = state.period_start {
                let next_period = start + self.period;
                let until_next = next_period.saturating_duration_since(Instant::now());
                log::warn!(
                    "Reached max requests per period ({} > {})",
                    state.requests_this_period,
                    self.requests_per_period
                );
                log::warn!("Sleeping {:?} until next period", until_next);
                thread::sleep(until_next);
            }
        }

        if let Some(start) = state.period_start {
            if start.elapsed() >= self.period {
                state.period_start = Some(Instant::now());
                state.requests_this_period = 0;
            }
        }
    }
}

impl Default for QuotaLimiter {
    fn default() -> Self {
        Self::new(
            DEFAULT_REQUESTS_PER_PERIOD,
            DEFAULT_PERIOD,
            DEFAULT_REQUEST_DELAY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_boundary_blocks_the_next_request() {
        let period = Duration::from_millis(300);
        let limiter = QuotaLimiter::new(3, period, Duration::ZERO);

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire();
        }
        assert!(
            start.elapsed() < period,
            "requests within the quota should not sleep"
        );

        limiter.acquire();
        assert!(
            start.elapsed() >= period,
            "the request beyond the quota should wait for the window boundary"
        );
    }

    #[test]
    fn first_request_skips_the_delay() {
        let limiter = QuotaLimiter::new(10, Duration::from_secs(60), Duration::from_millis(200));
        let start = Instant::now();
        limiter.acquire();
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn later_requests_pay_the_delay() {
        let limiter = QuotaLimiter::new(10, Duration::from_secs(60), Duration::from_millis(50));
        limiter.acquire();
        let start = Instant::now();
        limiter.acquire();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn count_resets_once_the_period_elapses() {
        let period = Duration::from_millis(100);
        let limiter = QuotaLimiter::new(2, period, Duration::ZERO);
        limiter.acquire();
        limiter.acquire();

        thread::sleep(period);

        let start = Instant::now();
        limiter.acquire();
        assert!(
            start.elapsed() < Duration::from_millis(50),
            "a fresh window should admit requests immediately"
        );
    }
}
