//! Scenario orchestration: page objects composed into full flows,
//! parameterized by user variant.
//!
//! There is exactly one checkout flow. A variant never gets its own copy of
//! the flow logic; its behavior tag is consulted once to pick the timeout
//! profile and once at each divergence point to pick the expected
//! post-condition. The flow is otherwise linear:
//!
//! login → inventory → add product → cart → shipping form → overview →
//! finish → completion banner
//!
//! Divergences: the locked user never leaves login; the input-broken user
//! is stopped by form validation; the submission-broken user reaches the
//! overview but never completes; the latency-injecting user completes under
//! extended bounds; the visual-noise user completes identically to nominal
//! (all checks here are text and route checks, never pixels).

use std::sync::Arc;

use serde::Serialize;
use tokio::time::Instant;
use tracing::info;

use crate::action::ActionExecutor;
use crate::driver::{PageDriver, SessionConfig};
use crate::fixtures::{messages, parse_usd, products, Behavior, UserVariant, CHECKOUT_INFO};
use crate::pages::{CartPage, CheckoutPage, Header, InventoryPage, LoginPage, PageObject, SortOrder};
use crate::poll::AssertionPoller;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::Timeouts;

/// Where a checkout flow run ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowOutcome {
    /// Order placed; completion banner verified
    Completed,
    /// Authentication rejected; never left the login screen
    BlockedAtLogin,
    /// Shipping form refused to advance
    RejectedAtShippingForm,
    /// Reached the order overview but the order never completed
    StuckAtOverview,
}

/// One executed flow step with its verified post-condition
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioStep {
    /// Step name
    pub name: &'static str,
    /// Post-condition that was verified
    pub expectation: &'static str,
    /// Wall time the step took
    pub elapsed_ms: u64,
}

/// Report for one scenario run
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    /// User the flow ran as
    pub username: String,
    /// The user's behavior profile
    pub behavior: Behavior,
    /// Where the flow ended up
    pub outcome: FlowOutcome,
    /// Steps in execution order
    pub steps: Vec<ScenarioStep>,
}

impl FlowReport {
    fn new(variant: &UserVariant) -> Self {
        Self {
            username: variant.username.to_string(),
            behavior: variant.behavior,
            outcome: FlowOutcome::Completed,
            steps: Vec::new(),
        }
    }

    fn mark(&mut self, name: &'static str, expectation: &'static str, started: Instant) {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(target: "comprar::scenario", step = name, expectation, elapsed_ms, "step done");
        self.steps.push(ScenarioStep {
            name,
            expectation,
            elapsed_ms,
        });
    }
}

/// Page objects and pollers bound to one session with one timeout profile
struct Session {
    login: LoginPage,
    inventory: InventoryPage,
    cart: CartPage,
    checkout: CheckoutPage,
    header: Header,
    /// Polls assertions under the assertion bound
    checks: AssertionPoller,
    /// Polls route transitions under the navigation bound
    nav: AssertionPoller,
    exec: ActionExecutor,
}

/// Composes page objects into flows, parameterized by user variant
pub struct ScenarioOrchestrator {
    driver: Arc<dyn PageDriver>,
    config: SessionConfig,
}

impl std::fmt::Debug for ScenarioOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioOrchestrator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ScenarioOrchestrator {
    /// Create an orchestrator over a driver session
    #[must_use]
    pub fn new(driver: Arc<dyn PageDriver>, config: SessionConfig) -> Self {
        Self { driver, config }
    }

    /// Timeout bounds for a behavior profile
    #[must_use]
    pub fn timeouts_for(&self, behavior: Behavior) -> Timeouts {
        if behavior.is_latency_injecting() {
            self.config.extended_timeouts
        } else {
            self.config.timeouts
        }
    }

    fn session(&self, timeouts: Timeouts) -> Session {
        let exec = ActionExecutor::new(Arc::clone(&self.driver), timeouts);
        Session {
            login: LoginPage::new(exec.clone(), self.config.base_url.clone()),
            inventory: InventoryPage::new(exec.clone()),
            cart: CartPage::new(exec.clone()),
            checkout: CheckoutPage::new(exec.clone()),
            header: Header::new(exec.clone()),
            checks: AssertionPoller::new(Arc::clone(&self.driver), timeouts.assertion_poll()),
            nav: AssertionPoller::new(Arc::clone(&self.driver), timeouts.navigation_poll()),
            exec,
        }
    }

    /// Run the canonical checkout flow as the given user variant.
    ///
    /// Returns the flow report on every *expected* outcome, including the
    /// blocked and broken ones; an error means the storefront diverged from
    /// the variant's model.
    pub async fn run_checkout_flow(&self, variant: &UserVariant) -> ComprarResult<FlowReport> {
        let behavior = variant.behavior;
        let s = self.session(self.timeouts_for(behavior));
        let mut report = FlowReport::new(variant);
        info!(
            target: "comprar::scenario",
            user = variant.username,
            behavior = ?behavior,
            "checkout flow start"
        );

        let t = Instant::now();
        s.login.goto().await?;
        report.mark("open storefront", "login screen shown", t);

        let t = Instant::now();
        s.login.login(variant.username, variant.password).await?;
        report.mark("authenticate", "credentials submitted", t);

        if behavior == Behavior::Locked {
            let t = Instant::now();
            let banner = s.login.error_banner()?;
            s.checks.expect_visible(&banner).await?;
            s.checks.expect_text(&banner, messages::LOCKED_OUT).await?;
            let url = s.exec.driver().current_url().await?;
            if url.contains("inventory") {
                return Err(ComprarError::UnexpectedRoute {
                    expected: s.login.route_pattern().as_str().to_string(),
                    actual: url,
                });
            }
            report.mark("verify lockout", "locked-out error, still on login", t);
            report.outcome = FlowOutcome::BlockedAtLogin;
            return Ok(report);
        }

        let t = Instant::now();
        s.nav.expect_route(&s.inventory.route_pattern()).await?;
        s.checks.expect_visible(&s.inventory.ready_selector()).await?;
        report.mark("reach inventory", "inventory route and items visible", t);

        let t = Instant::now();
        s.inventory.add_to_cart(products::BACKPACK.slug).await?;
        s.checks.expect_text(&s.header.badge()?, "1").await?;
        report.mark("add product", "cart badge reads 1", t);

        let t = Instant::now();
        s.header.go_to_cart().await?;
        s.nav.expect_route(&s.cart.route_pattern()).await?;
        let names = s.cart.item_names().await?;
        if !names.iter().any(|n| n == products::BACKPACK.name) {
            return Err(ComprarError::AssertionFailed {
                context: "cart contents".to_string(),
                expected: products::BACKPACK.name.to_string(),
                actual: names.join(", "),
            });
        }
        report.mark("open cart", "added product listed", t);

        let t = Instant::now();
        s.cart.checkout().await?;
        s.nav.expect_route(&s.checkout.route_pattern()).await?;
        s.checkout
            .fill_shipping_info(
                CHECKOUT_INFO.first_name,
                CHECKOUT_INFO.last_name,
                CHECKOUT_INFO.postal_code,
            )
            .await?;
        report.mark("fill shipping info", "form filled best-effort", t);

        match behavior {
            Behavior::InputBroken => {
                // The fill was best-effort; only the read-back decides
                // whether the field actually took the value.
                let t = Instant::now();
                let held = s.checkout.last_name_value().await?;
                if held == CHECKOUT_INFO.last_name {
                    report.mark("verify shipping form", "field accepted input", t);
                    self.complete_purchase(&s, &mut report).await?;
                } else {
                    s.checkout.continue_to_overview().await?;
                    s.checks.expect_visible(&s.checkout.error_banner()?).await?;
                    report.mark(
                        "verify rejection",
                        "form error shown instead of advancing",
                        t,
                    );
                    report.outcome = FlowOutcome::RejectedAtShippingForm;
                }
            }
            Behavior::SubmissionBroken => {
                let t = Instant::now();
                s.checks
                    .expect_value_differs(&s.checkout.last_name_field()?, CHECKOUT_INFO.last_name)
                    .await?;
                s.checkout.continue_to_overview().await?;
                s.nav.expect_route(&s.checkout.overview_route()).await?;
                report.mark("advance to overview", "step two despite cleared field", t);

                let t = Instant::now();
                s.checkout.finish().await?;
                s.checks
                    .expect_hidden(&s.checkout.completion_banner()?)
                    .await?;
                let url = s.exec.driver().current_url().await?;
                if !s.checkout.overview_route().matches(&url) {
                    return Err(ComprarError::UnexpectedRoute {
                        expected: s.checkout.overview_route().as_str().to_string(),
                        actual: url,
                    });
                }
                report.mark("attempt finish", "order never completes", t);
                report.outcome = FlowOutcome::StuckAtOverview;
            }
            _ => self.complete_purchase(&s, &mut report).await?,
        }

        info!(
            target: "comprar::scenario",
            user = variant.username,
            outcome = ?report.outcome,
            "checkout flow done"
        );
        Ok(report)
    }

    /// Shared tail of the flow: overview, tax sanity check, finish, banner
    async fn complete_purchase(
        &self,
        s: &Session,
        report: &mut FlowReport,
    ) -> ComprarResult<()> {
        let t = Instant::now();
        s.checkout.continue_to_overview().await?;
        s.nav.expect_route(&s.checkout.overview_route()).await?;
        let total_text = s.checkout.total_text().await?;
        let subtotal_text = s.checkout.subtotal_text().await?;
        let total = parse_usd(&total_text).ok_or_else(|| ComprarError::AssertionFailed {
            context: "order total".to_string(),
            expected: "a currency amount".to_string(),
            actual: total_text.clone(),
        })?;
        let subtotal =
            parse_usd(&subtotal_text).ok_or_else(|| ComprarError::AssertionFailed {
                context: "order subtotal".to_string(),
                expected: "a currency amount".to_string(),
                actual: subtotal_text.clone(),
            })?;
        // Tax is always positive, so the total must strictly exceed the
        // item subtotal.
        if total <= subtotal {
            return Err(ComprarError::AssertionFailed {
                context: "order total".to_string(),
                expected: format!("more than {subtotal_text}"),
                actual: total_text,
            });
        }
        report.mark("verify order total", "total exceeds item subtotal", t);

        let t = Instant::now();
        s.checkout.finish().await?;
        s.nav.expect_route(&s.checkout.complete_route()).await?;
        s.checks
            .expect_text(&s.checkout.completion_banner()?, messages::ORDER_COMPLETE)
            .await?;
        report.mark("finish order", "completion banner shown", t);
        Ok(())
    }

    /// Two-item purchase: badge accumulation, cart contents, and an order
    /// total strictly above the sum of the listed prices.
    pub async fn run_two_item_purchase(&self, variant: &UserVariant) -> ComprarResult<FlowReport> {
        let s = self.session(self.timeouts_for(variant.behavior));
        let mut report = FlowReport::new(variant);

        let t = Instant::now();
        s.login.goto().await?;
        s.login.login(variant.username, variant.password).await?;
        s.nav.expect_route(&s.inventory.route_pattern()).await?;
        report.mark("sign in", "inventory route reached", t);

        let t = Instant::now();
        s.inventory.add_to_cart(products::BACKPACK.slug).await?;
        s.inventory.add_to_cart(products::ONESIE.slug).await?;
        s.checks.expect_text(&s.header.badge()?, "2").await?;
        report.mark("add two products", "cart badge reads 2", t);

        let t = Instant::now();
        s.header.go_to_cart().await?;
        s.nav.expect_route(&s.cart.route_pattern()).await?;
        let names = s.cart.item_names().await?;
        for product in [products::BACKPACK, products::ONESIE] {
            if !names.iter().any(|n| n == product.name) {
                return Err(ComprarError::AssertionFailed {
                    context: "cart contents".to_string(),
                    expected: product.name.to_string(),
                    actual: names.join(", "),
                });
            }
        }
        report.mark("verify cart", "both products listed", t);

        let t = Instant::now();
        s.cart.checkout().await?;
        s.nav.expect_route(&s.checkout.route_pattern()).await?;
        s.checkout
            .fill_shipping_info(
                CHECKOUT_INFO.first_name,
                CHECKOUT_INFO.last_name,
                CHECKOUT_INFO.postal_code,
            )
            .await?;
        s.checkout.continue_to_overview().await?;
        s.nav.expect_route(&s.checkout.overview_route()).await?;
        let expected_subtotal = products::BACKPACK.price_cents + products::ONESIE.price_cents;
        let total_text = s.checkout.total_text().await?;
        let total = parse_usd(&total_text).ok_or_else(|| ComprarError::AssertionFailed {
            context: "order total".to_string(),
            expected: "a currency amount".to_string(),
            actual: total_text.clone(),
        })?;
        if total <= expected_subtotal {
            return Err(ComprarError::AssertionFailed {
                context: "order total".to_string(),
                expected: format!("more than {expected_subtotal} cents"),
                actual: total_text,
            });
        }
        report.mark("verify order total", "total exceeds sum of item prices", t);

        let t = Instant::now();
        s.checkout.finish().await?;
        s.nav.expect_route(&s.checkout.complete_route()).await?;
        s.checks
            .expect_text(&s.checkout.completion_banner()?, messages::ORDER_COMPLETE)
            .await?;
        report.mark("finish order", "completion banner shown", t);
        Ok(report)
    }

    /// Cart round trip: add one item, verify, remove it, and require the
    /// badge to be absent afterwards (not zero-valued).
    pub async fn run_cart_round_trip(&self, variant: &UserVariant) -> ComprarResult<()> {
        let s = self.session(self.timeouts_for(variant.behavior));
        s.login.goto().await?;
        s.login.login(variant.username, variant.password).await?;
        s.nav.expect_route(&s.inventory.route_pattern()).await?;

        s.inventory.add_to_cart(products::BACKPACK.slug).await?;
        s.checks.expect_text(&s.header.badge()?, "1").await?;

        s.header.go_to_cart().await?;
        s.nav.expect_route(&s.cart.route_pattern()).await?;
        let names = s.cart.item_names().await?;
        if !names.iter().any(|n| n == products::BACKPACK.name) {
            return Err(ComprarError::AssertionFailed {
                context: "cart contents".to_string(),
                expected: products::BACKPACK.name.to_string(),
                actual: names.join(", "),
            });
        }

        s.cart.remove(products::BACKPACK.slug).await?;
        s.checks.expect_count(&s.cart.item_rows()?, 0).await?;
        s.checks.expect_hidden(&s.header.badge()?).await?;
        Ok(())
    }

    /// Sort check: after reordering, the listed sequence must be monotone.
    pub async fn run_sort_check(
        &self,
        variant: &UserVariant,
        order: SortOrder,
    ) -> ComprarResult<()> {
        let s = self.session(self.timeouts_for(variant.behavior));
        s.login.goto().await?;
        s.login.login(variant.username, variant.password).await?;
        s.nav.expect_route(&s.inventory.route_pattern()).await?;

        s.inventory.sort_by(order).await?;
        match order {
            SortOrder::PriceAscending | SortOrder::PriceDescending => {
                let prices = s.inventory.all_prices().await?;
                let sorted = match order {
                    SortOrder::PriceAscending => prices.windows(2).all(|w| w[0] <= w[1]),
                    _ => prices.windows(2).all(|w| w[0] >= w[1]),
                };
                if !sorted {
                    return Err(ComprarError::AssertionFailed {
                        context: format!("price order under {order}"),
                        expected: "a monotone price sequence".to_string(),
                        actual: format!("{prices:?}"),
                    });
                }
            }
            SortOrder::NameAscending | SortOrder::NameDescending => {
                let names = s.inventory.all_names().await?;
                let sorted = match order {
                    SortOrder::NameAscending => names.windows(2).all(|w| w[0] <= w[1]),
                    _ => names.windows(2).all(|w| w[0] >= w[1]),
                };
                if !sorted {
                    return Err(ComprarError::AssertionFailed {
                        context: format!("name order under {order}"),
                        expected: "a monotone name sequence".to_string(),
                        actual: names.join(", "),
                    });
                }
            }
        }
        Ok(())
    }

    /// Empty-credentials submission must surface the exact username-required
    /// message.
    pub async fn run_empty_credentials_check(&self) -> ComprarResult<()> {
        let s = self.session(self.config.timeouts);
        s.login.goto().await?;
        s.login.submit().await?;
        let banner = s.login.error_banner()?;
        s.checks.expect_visible(&banner).await?;
        s.checks
            .expect_text(&banner, messages::USERNAME_REQUIRED)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fixtures::users;
    use crate::sim::SimulatedStorefront;
    use std::time::Duration;

    const BASE: &str = "https://store.test";

    fn init_tracing() {
        use tracing_subscriber::EnvFilter;
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Short bounds so failure paths stay fast; the extended profile gets
    /// enough headroom to absorb the simulator's injected latency.
    fn test_config() -> SessionConfig {
        SessionConfig::new(BASE)
            .with_timeouts(
                Timeouts::standard()
                    .with_action(Duration::from_millis(300))
                    .with_navigation(Duration::from_millis(300))
                    .with_assertion(Duration::from_millis(300))
                    .with_poll_interval(Duration::from_millis(10)),
            )
            .with_extended_timeouts(
                Timeouts::extended()
                    .with_action(Duration::from_secs(2))
                    .with_navigation(Duration::from_secs(2))
                    .with_assertion(Duration::from_secs(2))
                    .with_poll_interval(Duration::from_millis(10)),
            )
    }

    fn orchestrator(delay: Duration) -> ScenarioOrchestrator {
        let store = SimulatedStorefront::new(BASE).with_transition_delay(delay);
        ScenarioOrchestrator::new(Arc::new(store), test_config())
    }

    mod checkout_flow_tests {
        use super::*;

        #[tokio::test]
        async fn test_nominal_flow_completes() {
            init_tracing();
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::STANDARD)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::Completed);
            assert!(report.steps.iter().any(|s| s.name == "finish order"));
        }

        #[tokio::test]
        async fn test_locked_flow_blocked_at_login() {
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::LOCKED_OUT)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::BlockedAtLogin);
            // The flow must stop at login: no step past the lockout check.
            assert!(!report.steps.iter().any(|s| s.name == "reach inventory"));
        }

        #[tokio::test]
        async fn test_input_broken_flow_rejected_at_form() {
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::PROBLEM)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::RejectedAtShippingForm);
        }

        #[tokio::test]
        async fn test_submission_broken_flow_stuck_at_overview() {
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::ERROR)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::StuckAtOverview);
        }

        #[tokio::test]
        async fn test_latency_flow_completes_under_extended_bounds() {
            // The injected delay exceeds the standard navigation bound, so
            // completion proves the extended profile was selected.
            let report = orchestrator(Duration::from_millis(500))
                .run_checkout_flow(&users::PERFORMANCE_GLITCH)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::Completed);
        }

        #[tokio::test]
        async fn test_visual_flow_is_functionally_nominal() {
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::VISUAL)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::Completed);
        }

        #[tokio::test]
        async fn test_every_variant_reaches_its_expected_outcome() {
            init_tracing();
            for variant in &users::ALL {
                let report = orchestrator(Duration::ZERO)
                    .run_checkout_flow(variant)
                    .await
                    .unwrap();
                let expected = match variant.behavior {
                    Behavior::Locked => FlowOutcome::BlockedAtLogin,
                    Behavior::InputBroken => FlowOutcome::RejectedAtShippingForm,
                    Behavior::SubmissionBroken => FlowOutcome::StuckAtOverview,
                    _ => FlowOutcome::Completed,
                };
                assert_eq!(report.outcome, expected, "user {}", variant.username);
            }
        }

        #[tokio::test]
        async fn test_report_serializes_for_the_harness() {
            let report = orchestrator(Duration::ZERO)
                .run_checkout_flow(&users::STANDARD)
                .await
                .unwrap();
            let json = serde_json::to_string(&report).unwrap();
            assert!(json.contains("standard_user"));
            assert!(json.contains("Completed"));
        }
    }

    mod supplementary_scenario_tests {
        use super::*;

        #[tokio::test]
        async fn test_two_item_purchase() {
            let report = orchestrator(Duration::ZERO)
                .run_two_item_purchase(&users::STANDARD)
                .await
                .unwrap();
            assert_eq!(report.outcome, FlowOutcome::Completed);
        }

        #[tokio::test]
        async fn test_cart_round_trip() {
            orchestrator(Duration::ZERO)
                .run_cart_round_trip(&users::STANDARD)
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_sort_checks_for_all_orders() {
            for order in [
                SortOrder::NameAscending,
                SortOrder::NameDescending,
                SortOrder::PriceAscending,
                SortOrder::PriceDescending,
            ] {
                orchestrator(Duration::ZERO)
                    .run_sort_check(&users::STANDARD, order)
                    .await
                    .unwrap();
            }
        }

        #[tokio::test]
        async fn test_empty_credentials_check() {
            orchestrator(Duration::ZERO)
                .run_empty_credentials_check()
                .await
                .unwrap();
        }
    }

    mod timeout_profile_tests {
        use super::*;

        #[test]
        fn test_only_latency_behavior_selects_extended_bounds() {
            let orch = orchestrator(Duration::ZERO);
            for variant in &users::ALL {
                let timeouts = orch.timeouts_for(variant.behavior);
                if variant.behavior.is_latency_injecting() {
                    assert_eq!(timeouts, test_config().extended_timeouts);
                } else {
                    assert_eq!(timeouts, test_config().timeouts);
                }
            }
        }
    }
}
