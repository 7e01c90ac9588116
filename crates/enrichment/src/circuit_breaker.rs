//! Circuit breaker state machine (§4.13): `CLOSED -> (failures >=
//! threshold) -> OPEN -> (after reset_timeout) -> HALF_OPEN -> (success)
//! -> CLOSED`, or `(failure) -> OPEN`. State lives behind atomics so a
//! breaker can be shared across threads without a lock on the hot path.

use std::sync::atomic::{AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BreakerState {
    Closed = 0,
    Open = 1,
    HalfOpen = 2,
}

impl From<u8> for BreakerState {
    fn from(v: u8) -> Self {
        match v {
            1 => BreakerState::Open,
            2 => BreakerState::HalfOpen,
            _ => BreakerState::Closed,
        }
    }
}

pub struct CircuitBreaker {
    state: AtomicU8,
    failure_count: AtomicU32,
    opened_at_ms: AtomicU64,
    failure_threshold: u32,
    reset_timeout: Duration,
}

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

impl CircuitBreaker {
    pub fn new(failure_threshold: u32, reset_timeout: Duration) -> Self {
        Self {
            state: AtomicU8::new(BreakerState::Closed as u8),
            failure_count: AtomicU32::new(0),
            opened_at_ms: AtomicU64::new(0),
            failure_threshold,
            reset_timeout,
        }
    }

    /// Whether a call should be allowed through right now. If the breaker
    /// is `Open` and the reset timeout has elapsed, transitions to
    /// `HalfOpen` and allows exactly this one probe call.
    pub fn allow_request(&self) -> bool {
        match BreakerState::from(self.state.load(Ordering::Acquire)) {
            BreakerState::Closed | BreakerState::HalfOpen => true,
            BreakerState::Open => {
                let elapsed = now_ms().saturating_sub(self.opened_at_ms.load(Ordering::Acquire));
                if elapsed >= self.reset_timeout.as_millis() as u64 {
                    self.state.store(BreakerState::HalfOpen as u8, Ordering::Release);
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        self.failure_count.store(0, Ordering::Release);
        self.state.store(BreakerState::Closed as u8, Ordering::Release);
    }

    pub fn record_failure(&self) {
        match BreakerState::from(self.state.load(Ordering::Acquire)) {
            BreakerState::HalfOpen => self.trip(),
            _ => {
                let failures = self.failure_count.fetch_add(1, Ordering::AcqRel) + 1;
                if failures >= self.failure_threshold {
                    self.trip();
                }
            }
        }
    }

    fn trip(&self) {
        self.state.store(BreakerState::Open as u8, Ordering::Release);
        self.opened_at_ms.store(now_ms(), Ordering::Release);
        self.failure_count.store(0, Ordering::Release);
    }

    pub fn state(&self) -> BreakerState {
        BreakerState::from(self.state.load(Ordering::Acquire))
    }
}
