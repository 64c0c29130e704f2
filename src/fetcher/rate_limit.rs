use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

type Timeline = Arc<tokio::sync::Mutex<Option<Instant>>>;

/// Minimum-interval limiter with one independent timeline per site.
///
/// Waiting on one site never holds a lock another site needs: the outer map
/// lock is only taken to look up the site's timeline, and the per-site lock
/// is held across the sleep so callers for the same site queue up in order.
#[derive(Debug, Default)]
pub struct RateLimiter {
    timelines: Mutex<HashMap<String, Timeline>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until `interval` has passed since the last request to `site_id`,
    /// then record now as the last request.
    pub async fn acquire(&self, site_id: &str, interval: Duration) {
        let timeline = self.timeline(site_id);
        let mut last = timeline.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + interval;
            let wait = ready_at.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                tracing::trace!(site = %site_id, wait_ms = wait.as_millis() as u64, "Rate limited");
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last = Some(Instant::now());
    }

    fn timeline(&self, site_id: &str) -> Timeline {
        let mut timelines = self.timelines.lock().unwrap_or_else(|e| e.into_inner());
        timelines.entry(site_id.to_string()).or_default().clone()
    }
}
