//! Catalog screen: sorting and per-product cart buttons.

use crate::action::ActionExecutor;
use crate::fixtures::parse_usd;
use crate::locator::{LocatorMap, Selector};
use crate::pages::PageObject;
use crate::result::{ComprarError, ComprarResult};
use crate::wait::RoutePattern;

/// Catalog sort orders and their wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Name A→Z (`az`)
    NameAscending,
    /// Name Z→A (`za`)
    NameDescending,
    /// Price low→high (`lohi`)
    PriceAscending,
    /// Price high→low (`hilo`)
    PriceDescending,
}

impl SortOrder {
    /// Option value the sort dropdown submits
    #[must_use]
    pub const fn wire_value(&self) -> &'static str {
        match self {
            Self::NameAscending => "az",
            Self::NameDescending => "za",
            Self::PriceAscending => "lohi",
            Self::PriceDescending => "hilo",
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_value())
    }
}

/// Inventory page: sort dropdown, product list, add/remove buttons
#[derive(Debug, Clone)]
pub struct InventoryPage {
    exec: ActionExecutor,
    locators: LocatorMap,
}

impl InventoryPage {
    /// Build the inventory page over an executor
    #[must_use]
    pub fn new(exec: ActionExecutor) -> Self {
        let locators = LocatorMap::new()
            .fixed("sort dropdown", Selector::data_test("product-sort-container"))
            .fixed("item", Selector::data_test("inventory-item"))
            .fixed("item name", Selector::data_test("inventory-item-name"))
            .fixed("item price", Selector::data_test("inventory-item-price"))
            .per_slug("add to cart button", "add-to-cart")
            .per_slug("remove button", "remove");
        Self { exec, locators }
    }

    /// Reorder the catalog
    pub async fn sort_by(&self, order: SortOrder) -> ComprarResult<()> {
        self.exec
            .select(&self.locators.get("sort dropdown")?, order.wire_value())
            .await
    }

    /// Add a product to the cart by slug
    pub async fn add_to_cart(&self, slug: &str) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get_for("add to cart button", slug)?)
            .await
    }

    /// Remove a product from the cart by slug
    pub async fn remove(&self, slug: &str) -> ComprarResult<()> {
        self.exec
            .click(&self.locators.get_for("remove button", slug)?)
            .await
    }

    /// Listed prices in DOM order, parsed to cents
    pub async fn all_prices(&self) -> ComprarResult<Vec<u32>> {
        let texts = self
            .exec
            .driver()
            .all_text_contents(&self.locators.get("item price")?)
            .await?;
        texts
            .iter()
            .map(|text| {
                parse_usd(text).ok_or_else(|| ComprarError::AssertionFailed {
                    context: "inventory price text".to_string(),
                    expected: "a currency amount".to_string(),
                    actual: text.clone(),
                })
            })
            .collect()
    }

    /// Listed product names in DOM order
    pub async fn all_names(&self) -> ComprarResult<Vec<String>> {
        self.exec
            .driver()
            .all_text_contents(&self.locators.get("item name")?)
            .await
    }

    /// Number of listed products
    pub async fn item_count(&self) -> ComprarResult<usize> {
        self.exec.driver().count(&self.locators.get("item")?).await
    }
}

impl PageObject for InventoryPage {
    fn route_pattern(&self) -> RoutePattern {
        RoutePattern::new("**/inventory.html")
    }

    fn ready_selector(&self) -> Selector {
        Selector::data_test("inventory-item")
    }

    fn page_name(&self) -> &'static str {
        "inventory"
    }
}
