//! Boundary alignment: delay the first dispatch tick until the wall clock
//! reads minute 0 or 30.

use chrono::{DateTime, Timelike, Utc};
use tracing::info;

/// The dispatch period: 30 minutes.
pub const BOUNDARY_SECS: i64 = 30 * 60;

/// True when `t`'s minute component is 0 or 30.
pub fn is_aligned(t: DateTime<Utc>) -> bool {
    t.minute() % 30 == 0
}

/// The smallest instant strictly after `t` that falls on a half-hour
/// boundary.
///
/// Strictness matters: an input already on a boundary yields the *next*
/// boundary (`t + 30min`), never `t` itself, so a caller sleeping until the
/// result can never compute a zero delay and spin.
pub fn next_boundary(t: DateTime<Utc>) -> DateTime<Utc> {
    let ts = t.timestamp();
    let step = BOUNDARY_SECS - ts.rem_euclid(BOUNDARY_SECS);
    DateTime::from_timestamp(ts + step, 0).expect("timestamp within chrono range")
}

/// Whole seconds from `t` to its next boundary. Always >= 1.
pub fn seconds_until_boundary(t: DateTime<Utc>) -> i64 {
    next_boundary(t).timestamp() - t.timestamp()
}

/// Suspend until the wall clock is on a half-hour boundary.
///
/// Returns immediately when already aligned, so re-invoking is a no-op.
/// Otherwise sleeps the computed whole-second delay, re-reads the clock and
/// repeats; the strict ceiling in [`next_boundary`] makes this converge
/// after a single sleep in practice (truncation to whole seconds can cost
/// one extra short sleep).
pub async fn wait_until_boundary() {
    loop {
        let now = Utc::now();
        if is_aligned(now) {
            return;
        }
        let delay = seconds_until_boundary(now);
        info!(delay_secs = delay, "sleeping until next half-hour boundary");
        tokio::time::sleep(std::time::Duration::from_secs(delay as u64)).await;
    }
}
