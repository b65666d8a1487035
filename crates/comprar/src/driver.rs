//! Abstract automation-engine contract.
//!
//! The core depends only on this narrow trait: navigation, element queries,
//! and the three mutating actions. Everything engine-specific (CDP wiring,
//! process management, capture artifacts) lives behind an implementation.
//!
//! Two implementations ship with the crate: the chromiumoxide-backed
//! `CdpDriver` (behind the `browser` feature) and the in-memory
//! [`crate::sim::SimulatedStorefront`] used by the test suite.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::locator::Selector;
use crate::result::ComprarResult;
use crate::wait::Timeouts;

/// Narrow contract onto the external browser-automation engine.
///
/// All methods are suspension points: the caller yields until the engine
/// answers. Ordering between consecutive calls on the same session is
/// strictly sequential; a session must never be shared across concurrent
/// scenarios.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate the session to a URL
    async fn navigate(&self, url: &str) -> ComprarResult<()>;

    /// Current URL of the session
    async fn current_url(&self) -> ComprarResult<String>;

    /// Click the element matching the selector
    async fn click(&self, selector: &Selector) -> ComprarResult<()>;

    /// Fill the element with text.
    ///
    /// This is a best-effort write: a page that silently rejects input is
    /// NOT an engine error. Callers that care must read the value back with
    /// [`Self::input_value`] and decide for themselves.
    async fn fill(&self, selector: &Selector, text: &str) -> ComprarResult<()>;

    /// Select an option (by value) in a `<select>` element
    async fn select_option(&self, selector: &Selector, value: &str) -> ComprarResult<()>;

    /// Text content of the first matching element, `None` if absent
    async fn text_content(&self, selector: &Selector) -> ComprarResult<Option<String>>;

    /// Text contents of all matching elements, in DOM order
    async fn all_text_contents(&self, selector: &Selector) -> ComprarResult<Vec<String>>;

    /// Current value of the first matching input, `None` if absent
    async fn input_value(&self, selector: &Selector) -> ComprarResult<Option<String>>;

    /// Whether the first matching element is visible
    async fn is_visible(&self, selector: &Selector) -> ComprarResult<bool>;

    /// Whether the first matching element is enabled
    async fn is_enabled(&self, selector: &Selector) -> ComprarResult<bool>;

    /// Number of elements matching the selector
    async fn count(&self, selector: &Selector) -> ComprarResult<usize>;
}

/// Configuration values consumed by the core.
///
/// Values only: how they are loaded (env, CLI, CI config) is the harness's
/// concern. Both timeout profiles are carried so the orchestrator can pick
/// per user variant without reaching into ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Root URL of the storefront under test
    pub base_url: String,
    /// Run the browser headless
    pub headless: bool,
    /// Bounds for well-behaved sessions
    pub timeouts: Timeouts,
    /// Bounds for latency-injecting sessions
    pub extended_timeouts: Timeouts,
}

impl SessionConfig {
    /// Create a config for a storefront root URL with default bounds
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headless: true,
            timeouts: Timeouts::standard(),
            extended_timeouts: Timeouts::extended(),
        }
    }

    /// Set headless mode
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Override the standard bounds
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Override the extended bounds
    #[must_use]
    pub fn with_extended_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.extended_timeouts = timeouts;
        self
    }

    /// URL for a path under the storefront root
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
