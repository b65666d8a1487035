//! Page objects for the storefront's screens.
//!
//! Each page object owns the locator subset for one logical screen and
//! exposes operations at the level of user intent (`login`, `add_to_cart`,
//! `fill_shipping_info`), never raw selectors. Observable sources (error
//! banners, the completion header, the cart badge) are handed out as
//! resolved selectors for the assertion poller to watch.

pub mod cart;
pub mod checkout;
pub mod header;
pub mod inventory;
pub mod login;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use header::Header;
pub use inventory::{InventoryPage, SortOrder};
pub use login::LoginPage;

use crate::locator::Selector;
use crate::wait::RoutePattern;

/// A page object for one logical screen.
///
/// The route pattern identifies the screen's URL; the ready selector is an
/// element whose visibility signals the screen is usable.
pub trait PageObject {
    /// URL pattern that matches this screen
    fn route_pattern(&self) -> RoutePattern;

    /// Element whose visibility marks the screen as loaded
    fn ready_selector(&self) -> Selector;

    /// Screen name for logging
    fn page_name(&self) -> &'static str;
}
