//! Time formatting helpers.

use std::time::Duration;

/// Format an elapsed processing time to a human-readable string.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    let secs = elapsed.as_secs();
    if millis < 1_000 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{:.2}s", elapsed.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
