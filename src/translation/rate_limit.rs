/*!
 * Request pacing toward the translation service.
 *
 * A token bucket with a capacity of one: each call reserves the next free
 * slot, and slots are spaced `60s / requests_per_minute` apart. Concurrent
 * callers queue on the reservation, not on the sleep.
 */

use std::time::Duration;

use log::trace;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Token bucket limiting calls per minute
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter for `requests_per_minute`, or `None` when unlimited
    pub fn per_minute(requests_per_minute: u32) -> Option<Self> {
        if requests_per_minute == 0 {
            return None;
        }

        Some(Self::with_interval(Duration::from_millis(
            60_000 / u64::from(requests_per_minute),
        )))
    }

    /// Create a limiter with an explicit spacing between calls
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the caller may issue one request
    pub async fn acquire(&self) {
        let slot = {
            let mut next = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match *next {
                Some(at) if at > now => at,
                _ => now,
            };
            *next = Some(slot + self.interval);
            slot
        };

        let wait = slot.saturating_duration_since(Instant::now());
        if !wait.is_zero() {
            trace!("Rate limiter waiting {:?}", wait);
            tokio::time::sleep_until(slot).await;
        }
    }
}
