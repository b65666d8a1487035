//! Timeout bounds, polling cadence, and route patterns.
//!
//! All bounds are explicit values passed in at construction. The latency
//! profile exists because one simulated user injects delay into every route
//! transition; that user's scenarios run with [`Timeouts::extended`] while
//! everything else uses [`Timeouts::standard`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default action readiness bound (10 seconds)
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 10_000;

/// Default navigation bound (10 seconds)
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 10_000;

/// Default assertion poll bound (5 seconds)
pub const DEFAULT_ASSERTION_TIMEOUT_MS: u64 = 5_000;

/// Navigation bound under the latency-injecting profile (15 seconds)
pub const EXTENDED_NAVIGATION_TIMEOUT_MS: u64 = 15_000;

/// Default polling interval (100ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Timeout bounds for one scenario run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Bound for an element to become actionable before an action
    pub action: Duration,
    /// Bound for a route transition to land
    pub navigation: Duration,
    /// Bound for a polled assertion to hold
    pub assertion: Duration,
    /// Interval between polls
    pub poll_interval: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self::standard()
    }
}

impl Timeouts {
    /// Standard bounds for well-behaved pages
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            action: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
            navigation: Duration::from_millis(DEFAULT_NAVIGATION_TIMEOUT_MS),
            assertion: Duration::from_millis(DEFAULT_ASSERTION_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Extended bounds for latency-injecting sessions
    #[must_use]
    pub const fn extended() -> Self {
        Self {
            action: Duration::from_millis(EXTENDED_NAVIGATION_TIMEOUT_MS),
            navigation: Duration::from_millis(EXTENDED_NAVIGATION_TIMEOUT_MS),
            assertion: Duration::from_millis(DEFAULT_ASSERTION_TIMEOUT_MS * 2),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Override the action readiness bound
    #[must_use]
    pub const fn with_action(mut self, bound: Duration) -> Self {
        self.action = bound;
        self
    }

    /// Override the navigation bound
    #[must_use]
    pub const fn with_navigation(mut self, bound: Duration) -> Self {
        self.navigation = bound;
        self
    }

    /// Override the assertion bound
    #[must_use]
    pub const fn with_assertion(mut self, bound: Duration) -> Self {
        self.assertion = bound;
        self
    }

    /// Override the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Polling configuration for assertions under these bounds
    #[must_use]
    pub const fn assertion_poll(&self) -> PollConfig {
        PollConfig {
            timeout: self.assertion,
            interval: self.poll_interval,
        }
    }

    /// Polling configuration for navigation waits under these bounds
    #[must_use]
    pub const fn navigation_poll(&self) -> PollConfig {
        PollConfig {
            timeout: self.navigation,
            interval: self.poll_interval,
        }
    }
}

/// A bounded polling cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Total bound
    pub timeout: Duration,
    /// Interval between checks
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_ASSERTION_TIMEOUT_MS),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollConfig {
    /// Create a config with the given bound and default interval
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    /// Override the interval
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// Route pattern for matching the current page URL.
///
/// Patterns mirror the `**/cart.html` convention: a `**/` prefix matches
/// any URL whose path ends with the remainder; without the prefix the URL
/// must match exactly. Query strings and fragments are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    pattern: String,
}

impl RoutePattern {
    /// Create a pattern from its string form
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// The original pattern string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Check whether a URL matches this pattern
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        let path = url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .trim_end_matches('/');
        if let Some(suffix) = self.pattern.strip_prefix("**/") {
            path.ends_with(&format!("/{suffix}")) || path == suffix
        } else {
            path == self.pattern.trim_end_matches('/')
        }
    }
}

impl std::fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}
