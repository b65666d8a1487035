//! Cart screen.

use crate::action::ActionExecutor;
use crate::locator::{LocatorMap, Selector};
use crate::pages::PageObject;
use crate::result::ComprarResult;
use crate::wait::RoutePattern;

/// Cart page: item list, per-item remove, checkout entry point
#[derive(Debug, Clone)]
pub struct CartPage {
    exec: ActionExecutor,
    locators: LocatorMap,
}

impl CartPage {
    /// Build the cart page over an executor
    #[must_use]
    pub fn new(exec: ActionExecutor) -> Self {
        let locators = LocatorMap::new()
            .fixed("item", Selector::data_test("inventory-item"))
            .fixed("item name", Selector::data_test("inventory-item-name"))
            .fixed("checkout button", Selector::data_test("checkout"))
            .fixed(
                "continue shopping button",
                Selector::data_test("continue-shopping"),
            )
            .per_slug("remove button", "remove");
        Self { exec, locators }
    }

    /// Names of the items currently in the cart, in DOM order
    pub async fn item_names(&self) -> ComprarResult<Vec<String>> {
        self.exec
            .driver()
            .all_text_contents(&self.locators.get("item name")?)
            .await
    }

    /// Number of cart rows
    pub async fn item_count(&self) -> ComprarResult<usize> {
        self.exec.driver().count(&self.locators.get("item")?).await
    }

    /// Remove a product from the cart by slug
    pub async fn remove(&self, slug: &str) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get_for("remove button", slug)?)
            .await
    }

    /// Proceed toward the shipping step
    pub async fn checkout(&self) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get("checkout button")?)
            .await
    }

    /// Return to the catalog
    pub async fn continue_shopping(&self) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get("continue shopping button")?)
            .await
    }

    /// Selector for the cart rows (for count assertions)
    pub fn item_rows(&self) -> ComprarResult<Selector> {
        self.locators.get("item")
    }
}

impl PageObject for CartPage {
    fn route_pattern(&self) -> RoutePattern {
        RoutePattern::new("**/cart.html")
    }

    fn ready_selector(&self) -> Selector {
        Selector::data_test("checkout")
    }

    fn page_name(&self) -> &'static str {
        "cart"
    }
}
