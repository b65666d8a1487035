//! Checkout screens: shipping form, order overview, completion.
//!
//! One page object spans the three checkout routes; the orchestrator waits
//! on [`CheckoutPage::overview_route`] and [`CheckoutPage::complete_route`]
//! as the flow advances.

use crate::action::ActionExecutor;
use crate::locator::{LocatorMap, Selector};
use crate::pages::PageObject;
use crate::result::ComprarResult;
use crate::wait::RoutePattern;

/// Checkout page: shipping fields, summary labels, completion banner
#[derive(Debug, Clone)]
pub struct CheckoutPage {
    exec: ActionExecutor,
    locators: LocatorMap,
}

impl CheckoutPage {
    /// Build the checkout page over an executor
    #[must_use]
    pub fn new(exec: ActionExecutor) -> Self {
        let locators = LocatorMap::new()
            .fixed("first name field", Selector::data_test("firstName"))
            .fixed("last name field", Selector::data_test("lastName"))
            .fixed("postal code field", Selector::data_test("postalCode"))
            .fixed("continue button", Selector::data_test("continue"))
            .fixed("cancel button", Selector::data_test("cancel"))
            .fixed("finish button", Selector::data_test("finish"))
            .fixed("error banner", Selector::data_test("error"))
            .fixed("total label", Selector::data_test("total-label"))
            .fixed("subtotal label", Selector::data_test("subtotal-label"))
            .fixed("tax label", Selector::data_test("tax-label"))
            .fixed("completion banner", Selector::data_test("complete-header"))
            .fixed("back home button", Selector::data_test("back-to-products"));
        Self { exec, locators }
    }

    /// Fill the three shipping fields.
    ///
    /// Best-effort: a field that silently rejects input does not fail here.
    /// Use [`Self::last_name_value`] (or the poller's value checks) to
    /// verify what actually stuck.
    pub async fn fill_shipping_info(
        &self,
        first: &str,
        last: &str,
        postal: &str,
    ) -> ComprarResult<()> {
        self.exec
            .fill(&self.locators.get("first name field")?, first)
            .await?;
        self.exec
            .fill(&self.locators.get("last name field")?, last)
            .await?;
        self.exec
            .fill(&self.locators.get("postal code field")?, postal)
            .await
    }

    /// Value currently held by the last-name field, empty if blank
    pub async fn last_name_value(&self) -> ComprarResult<String> {
        Ok(self
            .exec
            .input_value(&self.locators.get("last name field")?)
            .await?
            .unwrap_or_default())
    }

    /// Submit the shipping form
    pub async fn continue_to_overview(&self) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get("continue button")?)
            .await
    }

    /// Abandon the current checkout step
    pub async fn cancel(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("cancel button")?).await
    }

    /// Place the order from the overview step
    pub async fn finish(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("finish button")?).await
    }

    /// Return to the catalog after completion
    pub async fn back_home(&self) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get("back home button")?)
            .await
    }

    /// Current form error text, empty when no error is shown
    pub async fn error_text(&self) -> ComprarResult<String> {
        Ok(self
            .exec
            .driver()
            .text_content(&self.locators.get("error banner")?)
            .await?
            .unwrap_or_default())
    }

    /// Raw order total text (e.g. `Total: $32.39`); parsing is the caller's
    /// responsibility
    pub async fn total_text(&self) -> ComprarResult<String> {
        Ok(self
            .exec
            .driver()
            .text_content(&self.locators.get("total label")?)
            .await?
            .unwrap_or_default())
    }

    /// Raw item-subtotal text
    pub async fn subtotal_text(&self) -> ComprarResult<String> {
        Ok(self
            .exec
            .driver()
            .text_content(&self.locators.get("subtotal label")?)
            .await?
            .unwrap_or_default())
    }

    /// Raw tax text
    pub async fn tax_text(&self) -> ComprarResult<String> {
        Ok(self
            .exec
            .driver()
            .text_content(&self.locators.get("tax label")?)
            .await?
            .unwrap_or_default())
    }

    /// Observable source for the last-name field's value
    pub fn last_name_field(&self) -> ComprarResult<Selector> {
        self.locators.get("last name field")
    }

    /// Observable source for the form error banner
    pub fn error_banner(&self) -> ComprarResult<Selector> {
        self.locators.get("error banner")
    }

    /// Observable source for the completion banner
    pub fn completion_banner(&self) -> ComprarResult<Selector> {
        self.locators.get("completion banner")
    }

    /// Route of the order overview step
    #[must_use]
    pub fn overview_route(&self) -> RoutePattern {
        RoutePattern::new("**/checkout-step-two.html")
    }

    /// Route of the completed-order screen
    #[must_use]
    pub fn complete_route(&self) -> RoutePattern {
        RoutePattern::new("**/checkout-complete.html")
    }
}

impl PageObject for CheckoutPage {
    fn route_pattern(&self) -> RoutePattern {
        RoutePattern::new("**/checkout-step-one.html")
    }

    fn ready_selector(&self) -> Selector {
        Selector::data_test("firstName")
    }

    fn page_name(&self) -> &'static str {
        "checkout"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::PageDriver;
    use crate::fixtures::{messages, parse_usd, users, CHECKOUT_INFO};
    use crate::sim::SimulatedStorefront;
    use crate::wait::Timeouts;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "https://store.test";

    async fn at_shipping_step(username: &str) -> CheckoutPage {
        let exec = ActionExecutor::new(
            Arc::new(SimulatedStorefront::new(BASE).with_transition_delay(Duration::ZERO)),
            Timeouts::standard().with_poll_interval(Duration::from_millis(10)),
        );
        exec.navigate(BASE).await.unwrap();
        exec.fill(&Selector::data_test("username"), username)
            .await
            .unwrap();
        exec.fill(&Selector::data_test("password"), users::PASSWORD)
            .await
            .unwrap();
        exec.click(&Selector::data_test("login-button")).await.unwrap();
        exec.click(&Selector::data_test("add-to-cart-sauce-labs-backpack"))
            .await
            .unwrap();
        exec.click(&Selector::data_test("shopping-cart-link"))
            .await
            .unwrap();
        exec.click(&Selector::data_test("checkout")).await.unwrap();
        CheckoutPage::new(exec)
    }

    #[tokio::test]
    async fn test_nominal_shipping_form_advances() {
        let checkout = at_shipping_step(users::STANDARD.username).await;
        checkout
            .fill_shipping_info(
                CHECKOUT_INFO.first_name,
                CHECKOUT_INFO.last_name,
                CHECKOUT_INFO.postal_code,
            )
            .await
            .unwrap();
        assert_eq!(
            checkout.last_name_value().await.unwrap(),
            CHECKOUT_INFO.last_name
        );
        checkout.continue_to_overview().await.unwrap();
        let url = checkout.exec.driver().current_url().await.unwrap();
        assert!(checkout.overview_route().matches(&url));
    }

    #[tokio::test]
    async fn test_total_exceeds_subtotal() {
        let checkout = at_shipping_step(users::STANDARD.username).await;
        checkout
            .fill_shipping_info(
                CHECKOUT_INFO.first_name,
                CHECKOUT_INFO.last_name,
                CHECKOUT_INFO.postal_code,
            )
            .await
            .unwrap();
        checkout.continue_to_overview().await.unwrap();
        let total = parse_usd(&checkout.total_text().await.unwrap()).unwrap();
        let subtotal = parse_usd(&checkout.subtotal_text().await.unwrap()).unwrap();
        let tax = parse_usd(&checkout.tax_text().await.unwrap()).unwrap();
        assert!(total > subtotal);
        assert_eq!(total, subtotal + tax);
    }

    #[tokio::test]
    async fn test_broken_field_then_rejected_submission() {
        let checkout = at_shipping_step("problem_user").await;
        checkout
            .fill_shipping_info(
                CHECKOUT_INFO.first_name,
                CHECKOUT_INFO.last_name,
                CHECKOUT_INFO.postal_code,
            )
            .await
            .unwrap();
        assert_ne!(
            checkout.last_name_value().await.unwrap(),
            CHECKOUT_INFO.last_name
        );
        checkout.continue_to_overview().await.unwrap();
        assert_eq!(
            checkout.error_text().await.unwrap(),
            messages::LAST_NAME_REQUIRED
        );
    }
}
