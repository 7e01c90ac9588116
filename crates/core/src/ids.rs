//! Id utilities: monotonic sequence numbers and trace ids.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a new monotonic identifier (starts at 1). Used for in-process
/// run/evaluation ordinals; never persisted as a stable identity.
pub fn next_monotonic_id() -> u64 {
    NEXT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Milliseconds since the UNIX epoch. Decision logic never reads this value;
/// it is only for observational timestamps attached outside the hashed payload.
pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_millis() as u64
}

/// Opaque trace identifier (UUID v4 string), used to correlate a decision
/// run across logs without becoming part of its deterministic hash.
pub fn new_trace_id() -> String {
    Uuid::new_v4().to_string()
}
