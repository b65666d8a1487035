//! Action execution with implicit readiness waits.
//!
//! Every mutating action (click, fill, select) first waits for its target to
//! become actionable: present, visible, enabled, and unambiguous. The wait
//! is a readiness gate, not a retry: once the element is actionable the
//! action runs exactly once, and a target that never becomes actionable
//! surfaces as [`ComprarError::ReadinessTimeout`].
//!
//! Fill is deliberately best-effort: a page that silently swallows the
//! keystrokes does not fail the fill. Callers that need certainty read the
//! value back afterwards and decide. That split is what distinguishes the
//! broken-input user variants from genuine defects.

use std::sync::Arc;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::driver::PageDriver;
use crate::locator::Selector;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::Timeouts;

/// Executes UI actions through the automation engine
#[derive(Clone)]
pub struct ActionExecutor {
    driver: Arc<dyn PageDriver>,
    timeouts: Timeouts,
}

impl std::fmt::Debug for ActionExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionExecutor")
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}

impl ActionExecutor {
    /// Create an executor over a driver with the given bounds
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, timeouts: Timeouts) -> Self {
        Self { driver, timeouts }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn PageDriver> {
        &self.driver
    }

    /// The bounds this executor runs under
    #[must_use]
    pub const fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Navigate the session to a URL
    pub async fn navigate(&self, url: &str) -> ComprarResult<()> {
        debug!(target: "comprar::action", url, "navigate");
        self.driver.navigate(url).await
    }

    /// Click the element once it becomes actionable
    pub async fn click(&self, selector: &Selector) -> ComprarResult<()> {
        self.wait_for_actionable(selector).await?;
        debug!(target: "comprar::action", selector = %selector, "click");
        self.driver.click(selector).await
    }

    /// Fill the element once it becomes actionable.
    ///
    /// Best-effort: silent rejection by the page is not an error here.
    /// Verify with [`Self::input_value`] where the outcome matters.
    pub async fn fill(&self, selector: &Selector, text: &str) -> ComprarResult<()> {
        self.wait_for_actionable(selector).await?;
        debug!(target: "comprar::action", selector = %selector, "fill");
        self.driver.fill(selector, text).await
    }

    /// Select an option by value once the element becomes actionable
    pub async fn select(&self, selector: &Selector, value: &str) -> ComprarResult<()> {
        self.wait_for_actionable(selector).await?;
        debug!(target: "comprar::action", selector = %selector, value, "select");
        self.driver.select_option(selector, value).await
    }

    /// Read an input's current value without waiting for readiness.
    ///
    /// Absent elements read as `None`; callers decide what absence means.
    pub async fn input_value(&self, selector: &Selector) -> ComprarResult<Option<String>> {
        self.driver.input_value(selector).await
    }

    /// Wait for the element to be present, visible, enabled, and unique.
    ///
    /// # Errors
    ///
    /// [`ComprarError::AmbiguousLocator`] as soon as several elements match;
    /// [`ComprarError::ReadinessTimeout`] if the bound elapses first.
    pub async fn wait_for_actionable(&self, selector: &Selector) -> ComprarResult<()> {
        let started = Instant::now();
        loop {
            let count = self.driver.count(selector).await?;
            if count > 1 {
                return Err(ComprarError::AmbiguousLocator {
                    selector: selector.to_css(),
                    count,
                });
            }
            if count == 1
                && self.driver.is_visible(selector).await?
                && self.driver.is_enabled(selector).await?
            {
                return Ok(());
            }
            if started.elapsed() >= self.timeouts.action {
                let waited_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                warn!(
                    target: "comprar::action",
                    selector = %selector,
                    waited_ms,
                    "element never became actionable"
                );
                return Err(ComprarError::ReadinessTimeout {
                    selector: selector.to_css(),
                    waited_ms,
                });
            }
            sleep(self.timeouts.poll_interval).await;
        }
    }
}
