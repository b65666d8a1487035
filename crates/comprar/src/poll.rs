//! Polling assertions over live page state.
//!
//! A condition (text equality, visibility, count, route) is re-evaluated at
//! a fixed interval until it holds or the bound elapses. The bound is what
//! separates flakiness tolerance from correctness failure: transient
//! rendering delay is absorbed by the polls, while a condition that never
//! becomes true surfaces as [`ComprarError::AssertionTimeout`] carrying the
//! expected value, the last observed value, and the elapsed wait. A
//! mismatch is never swallowed.

use std::future::Future;
use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::driver::PageDriver;
use crate::locator::Selector;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::{PollConfig, RoutePattern};

/// Observed value reported when an element is not in the page at all
const ABSENT: &str = "<absent>";

/// Polls page conditions through the automation engine
#[derive(Clone)]
pub struct AssertionPoller {
    driver: Arc<dyn PageDriver>,
    config: PollConfig,
}

impl std::fmt::Debug for AssertionPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssertionPoller")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AssertionPoller {
    /// Create a poller over a driver with the given cadence
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, config: PollConfig) -> Self {
        Self { driver, config }
    }

    /// The polling cadence
    #[must_use]
    pub const fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Poll until the element's text equals `expected`
    pub async fn expect_text(&self, selector: &Selector, expected: &str) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        let wanted = expected.to_string();
        self.poll_until(
            format!("text of {selector}"),
            expected.to_string(),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                let wanted = wanted.clone();
                async move {
                    let text = driver.text_content(&sel).await?;
                    Ok(match text {
                        Some(text) => (text == wanted, text),
                        None => (false, ABSENT.to_string()),
                    })
                }
            },
        )
        .await
    }

    /// Poll until the element's text contains `fragment`
    pub async fn expect_text_contains(
        &self,
        selector: &Selector,
        fragment: &str,
    ) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        let wanted = fragment.to_string();
        self.poll_until(
            format!("text of {selector}"),
            format!("contains {fragment:?}"),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                let wanted = wanted.clone();
                async move {
                    let text = driver.text_content(&sel).await?;
                    Ok(match text {
                        Some(text) => (text.contains(&wanted), text),
                        None => (false, ABSENT.to_string()),
                    })
                }
            },
        )
        .await
    }

    /// Poll until the element is visible
    pub async fn expect_visible(&self, selector: &Selector) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        self.poll_until(
            format!("visibility of {selector}"),
            "visible".to_string(),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                async move {
                    let visible = driver.is_visible(&sel).await?;
                    Ok((visible, if visible { "visible" } else { "hidden" }.to_string()))
                }
            },
        )
        .await
    }

    /// Poll until the element is hidden or absent
    pub async fn expect_hidden(&self, selector: &Selector) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        self.poll_until(
            format!("visibility of {selector}"),
            "hidden".to_string(),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                async move {
                    let visible = driver.is_visible(&sel).await?;
                    Ok((!visible, if visible { "visible" } else { "hidden" }.to_string()))
                }
            },
        )
        .await
    }

    /// Poll until exactly `expected` elements match
    pub async fn expect_count(&self, selector: &Selector, expected: usize) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        self.poll_until(
            format!("count of {selector}"),
            expected.to_string(),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                async move {
                    let count = driver.count(&sel).await?;
                    Ok((count == expected, count.to_string()))
                }
            },
        )
        .await
    }

    /// Poll until the input's value is no longer `rejected`.
    ///
    /// The verification half of the best-effort fill contract: used to
    /// observe a field that silently rejects or clears input.
    pub async fn expect_value_differs(
        &self,
        selector: &Selector,
        rejected: &str,
    ) -> ComprarResult<()> {
        let driver = Arc::clone(&self.driver);
        let sel = selector.clone();
        let unwanted = rejected.to_string();
        self.poll_until(
            format!("value of {selector}"),
            format!("anything but {rejected:?}"),
            move || {
                let driver = Arc::clone(&driver);
                let sel = sel.clone();
                let unwanted = unwanted.clone();
                async move {
                    let value = driver.input_value(&sel).await?;
                    Ok(match value {
                        Some(value) => (value != unwanted, value),
                        None => (false, ABSENT.to_string()),
                    })
                }
            },
        )
        .await
    }

    /// Poll until the session URL matches the route pattern.
    ///
    /// # Errors
    ///
    /// [`ComprarError::UnexpectedRoute`] with the last observed URL if the
    /// transition never lands within the bound.
    pub async fn expect_route(&self, pattern: &RoutePattern) -> ComprarResult<()> {
        let started = Instant::now();
        loop {
            let url = self.driver.current_url().await?;
            if pattern.matches(&url) {
                debug!(target: "comprar::poll", pattern = %pattern, url = %url, "route landed");
                return Ok(());
            }
            if started.elapsed() >= self.config.timeout {
                return Err(ComprarError::UnexpectedRoute {
                    expected: pattern.as_str().to_string(),
                    actual: url,
                });
            }
            sleep(self.config.interval).await;
        }
    }

    /// Shared polling loop. `check` answers (holds, observed).
    async fn poll_until<F, Fut>(
        &self,
        context: String,
        expected: String,
        check: F,
    ) -> ComprarResult<()>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = ComprarResult<(bool, String)>>,
    {
        let started = Instant::now();
        loop {
            let (holds, observed) = check().await?;
            if holds {
                debug!(target: "comprar::poll", context = %context, observed = %observed, "condition holds");
                return Ok(());
            }
            if started.elapsed() >= self.config.timeout {
                return Err(ComprarError::AssertionTimeout {
                    context,
                    expected,
                    actual: observed,
                    waited_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                });
            }
            sleep(self.config.interval).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::{messages, users};
    use crate::sim::SimulatedStorefront;
    use std::time::Duration;

    const BASE: &str = "https://store.test";

    fn fast_poll() -> PollConfig {
        PollConfig::new(Duration::from_millis(400)).with_interval(Duration::from_millis(10))
    }

    async fn signed_in(delay: Duration, username: &str) -> Arc<SimulatedStorefront> {
        let store = Arc::new(SimulatedStorefront::new(BASE).with_transition_delay(delay));
        store.navigate(BASE).await.unwrap();
        store
            .fill(&Selector::data_test("username"), username)
            .await
            .unwrap();
        store
            .fill(&Selector::data_test("password"), users::PASSWORD)
            .await
            .unwrap();
        store
            .click(&Selector::data_test("login-button"))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_expect_text_passes_on_exact_match() {
        let store = signed_in(Duration::ZERO, "locked_out_user").await;
        let poller = AssertionPoller::new(store, fast_poll());
        poller
            .expect_text(&Selector::data_test("error"), messages::LOCKED_OUT)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expect_text_timeout_reports_last_observed() {
        let store = signed_in(Duration::ZERO, "standard_user").await;
        store
            .click(&Selector::data_test("add-to-cart-sauce-labs-backpack"))
            .await
            .unwrap();
        let poller = AssertionPoller::new(store, fast_poll());
        let err = poller
            .expect_text(&Selector::data_test("shopping-cart-badge"), "2")
            .await
            .unwrap_err();
        match err {
            ComprarError::AssertionTimeout {
                expected, actual, ..
            } => {
                assert_eq!(expected, "2");
                assert_eq!(actual, "1");
            }
            other => panic!("expected assertion timeout, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_expect_route_rides_out_latency() {
        let store = signed_in(Duration::from_millis(100), "performance_glitch_user").await;
        let poller = AssertionPoller::new(store, fast_poll());
        poller
            .expect_route(&RoutePattern::new("**/inventory.html"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expect_route_timeout_is_unexpected_route() {
        let store = signed_in(Duration::ZERO, "standard_user").await;
        let poller = AssertionPoller::new(store, fast_poll());
        let err = poller
            .expect_route(&RoutePattern::new("**/checkout-complete.html"))
            .await
            .unwrap_err();
        match err {
            ComprarError::UnexpectedRoute { expected, actual } => {
                assert!(expected.contains("checkout-complete"));
                assert!(actual.contains("inventory"));
            }
            other => panic!("expected unexpected-route, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_expect_hidden_for_absent_badge() {
        let store = signed_in(Duration::ZERO, "standard_user").await;
        let poller = AssertionPoller::new(store, fast_poll());
        poller
            .expect_hidden(&Selector::data_test("shopping-cart-badge"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expect_value_differs_sees_cleared_field() {
        let store = signed_in(Duration::ZERO, "error_user").await;
        store
            .click(&Selector::data_test("add-to-cart-sauce-labs-backpack"))
            .await
            .unwrap();
        store
            .click(&Selector::data_test("shopping-cart-link"))
            .await
            .unwrap();
        store
            .click(&Selector::data_test("checkout"))
            .await
            .unwrap();
        store
            .fill(&Selector::data_test("lastName"), "Doe")
            .await
            .unwrap();
        let poller = AssertionPoller::new(store, fast_poll());
        poller
            .expect_value_differs(&Selector::data_test("lastName"), "Doe")
            .await
            .unwrap();
    }
}
