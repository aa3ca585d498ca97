//! Central configuration constants for runtime limits and defaults.

use std::time::Duration;

/// Monitor server address used when neither the settings file nor the CLI names one.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8899";

/// How long a successful action stays on screen before the dialog closes itself.
pub const AUTO_DISMISS_AFTER: Duration = Duration::from_secs(2);

/// Transport timeout for every HTTP round-trip.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Capacity of the kernel's completion-event channel.
pub const EVENT_CHANNEL_CAPACITY: usize = 100;

/// Every job status the broker can report, in sidebar order.
pub const JOB_STATUSES: &[&str] = &[
    "queued",
    "finished",
    "failed",
    "started",
    "deferred",
    "scheduled",
];

/// Convenience: `AUTO_DISMISS_AFTER` in whole milliseconds, for serialized settings.
pub fn auto_dismiss_millis() -> u64 {
    AUTO_DISMISS_AFTER.as_millis() as u64
}
