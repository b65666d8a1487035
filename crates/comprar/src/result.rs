//! Result and error types for Comprar.
//!
//! The taxonomy separates readiness failures (an element never became
//! actionable) from assertion failures (a polled condition never held).
//! Neither is retried silently; both carry enough context to diagnose a run
//! without re-running it.

use thiserror::Error;

/// Result type for Comprar operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur while driving a storefront session
#[derive(Debug, Error)]
pub enum ComprarError {
    /// An element never became actionable (present, visible, enabled)
    /// within the readiness bound. Recoverable only by re-running the
    /// scenario.
    #[error("element '{selector}' not actionable after {waited_ms}ms")]
    ReadinessTimeout {
        /// Selector that never became actionable
        selector: String,
        /// Total wait in milliseconds
        waited_ms: u64,
    },

    /// A polled condition never became true within its bound.
    #[error("{context}: expected {expected:?}, last observed {actual:?} after {waited_ms}ms")]
    AssertionTimeout {
        /// What was being checked
        context: String,
        /// Expected value
        expected: String,
        /// Last observed value
        actual: String,
        /// Total wait in milliseconds
        waited_ms: u64,
    },

    /// A single-shot check failed (no polling involved).
    #[error("{context}: expected {expected:?}, got {actual:?}")]
    AssertionFailed {
        /// What was being checked
        context: String,
        /// Expected value
        expected: String,
        /// Actual value
        actual: String,
    },

    /// A semantic locator key has no registered selector. This is a
    /// programming defect and is fatal immediately.
    #[error("no selector registered for locator key '{key}'")]
    UnresolvedLocator {
        /// The unknown semantic key
        key: String,
    },

    /// A selector intended for a single element matched several.
    #[error("selector '{selector}' matched {count} elements, expected exactly one")]
    AmbiguousLocator {
        /// The ambiguous selector
        selector: String,
        /// Number of matches observed
        count: usize,
    },

    /// Navigation landed on a route other than the expected one. Indicates
    /// either a product regression or a variant-model mismatch.
    #[error("unexpected route: expected {expected}, landed on {actual}")]
    UnexpectedRoute {
        /// Expected route pattern
        expected: String,
        /// Route actually observed
        actual: String,
    },

    /// Navigation error from the automation engine
    #[error("navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Engine error message
        message: String,
    },

    /// Browser launch error
    #[error("failed to launch browser: {message}")]
    BrowserLaunch {
        /// Engine error message
        message: String,
    },

    /// Page-level error from the automation engine
    #[error("page error: {message}")]
    Page {
        /// Engine error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
