//! Header component: cart link/badge and the burger menu.
//!
//! Present on every signed-in screen, so this is a component rather than a
//! page object: no route of its own.

use crate::action::ActionExecutor;
use crate::locator::{LocatorMap, Selector};
use crate::result::{ComprarError, ComprarResult};

/// Header component shared by the signed-in screens
#[derive(Debug, Clone)]
pub struct Header {
    exec: ActionExecutor,
    locators: LocatorMap,
}

impl Header {
    /// Build the header component over an executor
    #[must_use]
    pub fn new(exec: ActionExecutor) -> Self {
        let locators = LocatorMap::new()
            .fixed("cart link", Selector::data_test("shopping-cart-link"))
            .fixed("cart badge", Selector::data_test("shopping-cart-badge"))
            .fixed("menu button", Selector::css("#react-burger-menu-btn"))
            .fixed("logout link", Selector::data_test("logout-sidebar-link"))
            .fixed("reset link", Selector::data_test("reset-sidebar-link"));
        Self { exec, locators }
    }

    /// Number shown on the cart badge; 0 when the badge is absent
    pub async fn cart_count(&self) -> ComprarResult<u32> {
        let badge = self.locators.get("cart badge")?;
        if !self.exec.driver().is_visible(&badge).await? {
            return Ok(0);
        }
        let text = self
            .exec
            .driver()
            .text_content(&badge)
            .await?
            .unwrap_or_default();
        text.trim()
            .parse()
            .map_err(|_| ComprarError::AssertionFailed {
                context: "cart badge text".to_string(),
                expected: "an integer".to_string(),
                actual: text,
            })
    }

    /// Open the cart screen
    pub async fn go_to_cart(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("cart link")?).await
    }

    /// Log out. Two steps: the logout link is hidden inside the collapsed
    /// burger menu, so the menu is opened first.
    pub async fn logout(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("menu button")?).await?;
        self.exec.click(&self.locators.get("logout link")?).await
    }

    /// Reset the app state (empties the cart) via the burger menu
    pub async fn reset_app_state(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("menu button")?).await?;
        self.exec.click(&self.locators.get("reset link")?).await
    }

    /// Observable source for the cart badge
    pub fn badge(&self) -> ComprarResult<Selector> {
        self.locators.get("cart badge")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::driver::PageDriver;
    use crate::fixtures::users;
    use crate::sim::SimulatedStorefront;
    use crate::wait::Timeouts;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "https://store.test";

    async fn signed_in_header() -> Header {
        let exec = ActionExecutor::new(
            Arc::new(SimulatedStorefront::new(BASE).with_transition_delay(Duration::ZERO)),
            Timeouts::standard().with_poll_interval(Duration::from_millis(10)),
        );
        exec.navigate(BASE).await.unwrap();
        exec.fill(&Selector::data_test("username"), users::STANDARD.username)
            .await
            .unwrap();
        exec.fill(&Selector::data_test("password"), users::STANDARD.password)
            .await
            .unwrap();
        exec.click(&Selector::data_test("login-button")).await.unwrap();
        Header::new(exec)
    }

    #[tokio::test]
    async fn test_cart_count_zero_when_badge_absent() {
        let header = signed_in_header().await;
        assert_eq!(header.cart_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_cart_count_follows_additions() {
        let header = signed_in_header().await;
        header
            .exec
            .click(&Selector::data_test("add-to-cart-sauce-labs-backpack"))
            .await
            .unwrap();
        assert_eq!(header.cart_count().await.unwrap(), 1);
        header
            .exec
            .click(&Selector::data_test("add-to-cart-sauce-labs-onesie"))
            .await
            .unwrap();
        assert_eq!(header.cart_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_go_to_cart_lands_on_cart_route() {
        let header = signed_in_header().await;
        header.go_to_cart().await.unwrap();
        let url = header.exec.driver().current_url().await.unwrap();
        assert!(url.contains("cart.html"));
    }

    #[tokio::test]
    async fn test_logout_returns_to_login() {
        let header = signed_in_header().await;
        header.logout().await.unwrap();
        let url = header.exec.driver().current_url().await.unwrap();
        assert!(!url.contains("inventory"));
    }

    #[tokio::test]
    async fn test_reset_app_state_clears_badge() {
        let header = signed_in_header().await;
        header
            .exec
            .click(&Selector::data_test("add-to-cart-sauce-labs-backpack"))
            .await
            .unwrap();
        header.reset_app_state().await.unwrap();
        assert_eq!(header.cart_count().await.unwrap(), 0);
    }
}
