//! Outbound call pacing.
//!
//! The fixed-increment strategy is a stagger, not a limiter: every call
//! that enters adds `increment` to a shared delay and sleeps for the new
//! value, and gives the increment back once it settles. Back-to-back calls
//! therefore start at `increment`, `2 * increment`, ... after enqueue. It
//! does not look at the `requestsRemaining` the node reports.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::config::PacingStrategy;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub(crate) enum Pacer {
    Immediate,
    Stagger(Stagger),
    Quota(DirectRateLimiter),
}

pub(crate) struct Stagger {
    increment_ms: u64,
    delay_ms: AtomicU64,
    last_called_ms: AtomicU64,
}

/// Held for the lifetime of one call. Dropping it returns the call's
/// share of the stagger delay, whether the call succeeded, failed, or was
/// cancelled.
pub(crate) struct Slot<'a> {
    stagger: Option<&'a Stagger>,
}

impl Drop for Slot<'_> {
    fn drop(&mut self) {
        if let Some(stagger) = self.stagger {
            stagger.release();
        }
    }
}

impl Pacer {
    pub(crate) fn new(strategy: PacingStrategy) -> Self {
        match strategy {
            PacingStrategy::None => Pacer::Immediate,
            PacingStrategy::FixedIncrement(increment) => Pacer::Stagger(Stagger {
                increment_ms: increment.as_millis() as u64,
                delay_ms: AtomicU64::new(0),
                last_called_ms: AtomicU64::new(unix_millis()),
            }),
            PacingStrategy::PerSecond(limit) => {
                Pacer::Quota(RateLimiter::direct(Quota::per_second(limit)))
            }
        }
    }

    /// Wait until this call may be dispatched.
    pub(crate) async fn admit(&self) -> Slot<'_> {
        match self {
            Pacer::Immediate => Slot { stagger: None },
            Pacer::Quota(limiter) => {
                limiter.until_ready().await;
                Slot { stagger: None }
            }
            Pacer::Stagger(stagger) => {
                let wait = stagger.enqueue();
                // The slot exists before sleeping so a cancelled wait still
                // gives its increment back.
                let slot = Slot {
                    stagger: Some(stagger),
                };
                tokio::time::sleep(wait).await;
                slot
            }
        }
    }

    /// Outstanding stagger delay; zero for the other strategies.
    pub(crate) fn pending_delay(&self) -> Duration {
        match self {
            Pacer::Stagger(stagger) => {
                Duration::from_millis(stagger.delay_ms.load(Ordering::Acquire))
            }
            Pacer::Immediate | Pacer::Quota(_) => Duration::ZERO,
        }
    }

    /// Unix milliseconds of the most recent enqueue under the stagger.
    pub(crate) fn last_called_ms(&self) -> Option<u64> {
        match self {
            Pacer::Stagger(stagger) => Some(stagger.last_called_ms.load(Ordering::Acquire)),
            Pacer::Immediate | Pacer::Quota(_) => None,
        }
    }
}

impl Stagger {
    fn enqueue(&self) -> Duration {
        let delay = self
            .delay_ms
            .fetch_add(self.increment_ms, Ordering::AcqRel)
            .saturating_add(self.increment_ms);
        self.last_called_ms.store(unix_millis(), Ordering::Release);
        Duration::from_millis(delay)
    }

    fn release(&self) {
        let _ = self
            .delay_ms
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |delay| {
                Some(delay.saturating_sub(self.increment_ms))
            });
    }
}

fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
