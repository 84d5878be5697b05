//! Sliding-window call budgets per platform.

use crate::RateLimitSection;
use cadenza_core::Platform;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Rolling call budget per platform.
///
/// Tracks the timestamps of recent publisher calls in a fixed-length
/// window. `can_publish` prunes timestamps older than the window and
/// reports whether capacity remains; `record_call` appends the current
/// time. No side effects beyond its own state.
///
/// # Examples
///
/// ```
/// use cadenza_core::Platform;
/// use cadenza_rate_limit::PublishWindow;
///
/// let window = PublishWindow::new(3600, 2);
/// assert!(window.can_publish(Platform::Mastodon));
/// window.record_call(Platform::Mastodon);
/// window.record_call(Platform::Mastodon);
/// assert!(!window.can_publish(Platform::Mastodon));
/// ```
pub struct PublishWindow {
    window: Duration,
    max_calls: u32,
    overrides: HashMap<Platform, u32>,
    calls: Mutex<HashMap<Platform, VecDeque<DateTime<Utc>>>>,
}

impl PublishWindow {
    /// Create a window of `window_secs` seconds allowing `max_calls` per
    /// platform.
    pub fn new(window_secs: u64, max_calls: u32) -> Self {
        Self {
            window: Duration::seconds(window_secs as i64),
            max_calls,
            overrides: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Build a window from the `[rate_limit]` configuration section.
    ///
    /// Unknown platform keys in the override table are skipped with a
    /// warning rather than rejected.
    pub fn from_config(section: &RateLimitSection) -> Self {
        let mut window = Self::new(section.window_secs, section.max_calls);
        for (key, max_calls) in &section.platforms {
            match key.parse::<Platform>() {
                Ok(platform) => {
                    window.overrides.insert(platform, *max_calls);
                }
                Err(_) => {
                    warn!(platform = %key, "Unknown platform in rate limit overrides, skipping");
                }
            }
        }
        window
    }

    /// Override the budget for one platform.
    pub fn set_limit(&mut self, platform: Platform, max_calls: u32) {
        self.overrides.insert(platform, max_calls);
    }

    /// Whether a call to this platform fits the remaining budget.
    pub fn can_publish(&self, platform: Platform) -> bool {
        self.can_publish_at(platform, Utc::now())
    }

    /// Spend one call against this platform's budget.
    pub fn record_call(&self, platform: Platform) {
        self.record_call_at(platform, Utc::now());
    }

    /// Calls left in the current window for this platform.
    pub fn remaining(&self, platform: Platform) -> u32 {
        self.remaining_at(platform, Utc::now())
    }

    fn limit_for(&self, platform: Platform) -> u32 {
        self.overrides.get(&platform).copied().unwrap_or(self.max_calls)
    }

    fn can_publish_at(&self, platform: Platform, now: DateTime<Utc>) -> bool {
        self.remaining_at(platform, now) > 0
    }

    fn remaining_at(&self, platform: Platform, now: DateTime<Utc>) -> u32 {
        let mut calls = self.lock_calls();
        let recent = calls.entry(platform).or_default();
        Self::prune(recent, now - self.window);
        let used = recent.len() as u32;
        let limit = self.limit_for(platform);
        debug!(%platform, used, limit, "Rate limit window consulted");
        limit.saturating_sub(used)
    }

    fn record_call_at(&self, platform: Platform, now: DateTime<Utc>) {
        let mut calls = self.lock_calls();
        let recent = calls.entry(platform).or_default();
        Self::prune(recent, now - self.window);
        recent.push_back(now);
    }

    fn prune(recent: &mut VecDeque<DateTime<Utc>>, cutoff: DateTime<Utc>) {
        while recent.front().is_some_and(|ts| *ts <= cutoff) {
            recent.pop_front();
        }
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, HashMap<Platform, VecDeque<DateTime<Utc>>>> {
        match self.calls.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_within_budget() {
        let window = PublishWindow::new(3600, 3);
        assert!(window.can_publish(Platform::Bluesky));
        window.record_call(Platform::Bluesky);
        window.record_call(Platform::Bluesky);
        assert!(window.can_publish(Platform::Bluesky));
        assert_eq!(window.remaining(Platform::Bluesky), 1);
    }

    #[test]
    fn blocks_at_capacity() {
        let window = PublishWindow::new(3600, 2);
        window.record_call(Platform::Discord);
        window.record_call(Platform::Discord);
        assert!(!window.can_publish(Platform::Discord));
        assert_eq!(window.remaining(Platform::Discord), 0);
    }

    #[test]
    fn platforms_do_not_share_budgets() {
        let window = PublishWindow::new(3600, 1);
        window.record_call(Platform::Mastodon);
        assert!(!window.can_publish(Platform::Mastodon));
        assert!(window.can_publish(Platform::Tumblr));
    }

    #[test]
    fn old_calls_fall_out_of_the_window() {
        let window = PublishWindow::new(3600, 1);
        let t0 = Utc::now();
        window.record_call_at(Platform::Linkedin, t0);
        assert!(!window.can_publish_at(Platform::Linkedin, t0));

        // One second past the window boundary the call no longer counts.
        let later = t0 + Duration::seconds(3601);
        assert!(window.can_publish_at(Platform::Linkedin, later));
    }

    #[test]
    fn per_platform_override_applies() {
        let mut window = PublishWindow::new(3600, 1);
        window.set_limit(Platform::Discord, 3);
        window.record_call(Platform::Discord);
        window.record_call(Platform::Discord);
        assert!(window.can_publish(Platform::Discord));
        window.record_call(Platform::Discord);
        assert!(!window.can_publish(Platform::Discord));
    }
}
