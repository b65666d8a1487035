//! In-memory storefront simulation.
//!
//! A [`PageDriver`] double that models the storefront's state machine:
//! credential checks, the cart set and its badge projection, catalog sort
//! orders, the three checkout routes, and the per-user breakage the
//! behavioral variants exercise (lockout, silent input rejection, cleared
//! fields, injected latency).
//!
//! The latency-injecting user delays route transitions instead of blocking:
//! `current_url` keeps answering the old route until the transition's ready
//! time passes, so readiness waits and navigation polls observe the delay
//! the same way they would against a slow real page.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::debug;

use crate::driver::PageDriver;
use crate::fixtures::{format_usd, messages, products, users, Behavior, Product};
use crate::locator::Selector;
use crate::result::{ComprarError, ComprarResult};

/// Default injected delay for the latency-injecting profile
pub const DEFAULT_TRANSITION_DELAY_MS: u64 = 150;

/// Sales tax applied at checkout, in basis points of the subtotal
const TAX_RATE_BPS: u32 = 800;

/// Routes the simulated storefront can be on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Login,
    Inventory,
    Cart,
    CheckoutStepOne,
    CheckoutStepTwo,
    CheckoutComplete,
}

impl Route {
    fn path(self) -> &'static str {
        match self {
            Self::Login => "",
            Self::Inventory => "inventory.html",
            Self::Cart => "cart.html",
            Self::CheckoutStepOne => "checkout-step-one.html",
            Self::CheckoutStepTwo => "checkout-step-two.html",
            Self::CheckoutComplete => "checkout-complete.html",
        }
    }

    fn requires_session(self) -> bool {
        !matches!(self, Self::Login)
    }
}

/// A route transition that has been triggered but not yet landed
#[derive(Debug, Clone, Copy)]
struct PendingTransition {
    target: Route,
    ready_at: Instant,
}

#[derive(Debug)]
struct StoreState {
    route: Route,
    pending: Option<PendingTransition>,
    signed_in: Option<Behavior>,
    username_field: String,
    password_field: String,
    login_error: Option<String>,
    form_error: Option<String>,
    cart: Vec<String>,
    sort: String,
    first_name: String,
    last_name: String,
    postal_code: String,
    menu_open: bool,
}

impl StoreState {
    fn new() -> Self {
        Self {
            route: Route::Login,
            pending: None,
            signed_in: None,
            username_field: String::new(),
            password_field: String::new(),
            login_error: None,
            form_error: None,
            cart: Vec::new(),
            sort: "az".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            postal_code: String::new(),
            menu_open: false,
        }
    }

    /// Commit a pending transition whose ready time has passed
    fn settle(&mut self) {
        if let Some(pending) = self.pending {
            if Instant::now() >= pending.ready_at {
                self.route = pending.target;
                self.pending = None;
                self.menu_open = false;
            }
        }
    }

    fn in_cart(&self, slug: &str) -> bool {
        self.cart.iter().any(|s| s == slug)
    }

    fn sorted_catalog(&self) -> Vec<Product> {
        let mut items: Vec<Product> = products::ALL.to_vec();
        match self.sort.as_str() {
            "za" => items.sort_by(|a, b| b.name.cmp(a.name)),
            "lohi" => items.sort_by_key(|p| p.price_cents),
            "hilo" => items.sort_by(|a, b| b.price_cents.cmp(&a.price_cents)),
            _ => items.sort_by(|a, b| a.name.cmp(b.name)),
        }
        items
    }

    fn cart_products(&self) -> Vec<Product> {
        self.cart
            .iter()
            .filter_map(|slug| products::by_slug(slug))
            .collect()
    }

    fn subtotal_cents(&self) -> u32 {
        self.cart_products().iter().map(|p| p.price_cents).sum()
    }

    fn tax_cents(&self) -> u32 {
        (self.subtotal_cents() * TAX_RATE_BPS + 5000) / 10_000
    }
}

/// In-memory [`PageDriver`] implementation with storefront semantics
#[derive(Debug)]
pub struct SimulatedStorefront {
    base_url: String,
    transition_delay: Duration,
    state: Mutex<StoreState>,
    history: Mutex<Vec<String>>,
}

impl SimulatedStorefront {
    /// Create a simulated storefront served from `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transition_delay: Duration::from_millis(DEFAULT_TRANSITION_DELAY_MS),
            state: Mutex::new(StoreState::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Override the delay injected for the latency profile
    #[must_use]
    pub fn with_transition_delay(mut self, delay: Duration) -> Self {
        self.transition_delay = delay;
        self
    }

    /// Calls made against this driver, oldest first
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.lock_history().clone()
    }

    /// Whether a call whose record starts with `prefix` was made
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        self.lock_history().iter().any(|c| c.starts_with(prefix))
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, StoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_history(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        match self.history.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn record(&self, call: String) {
        self.lock_history().push(call);
    }

    /// Start a route transition, delayed when the session injects latency
    fn begin_transition(&self, state: &mut StoreState, target: Route) {
        if state.signed_in == Some(Behavior::LatencyInjecting) && target.requires_session() {
            state.pending = Some(PendingTransition {
                target,
                ready_at: Instant::now() + self.transition_delay,
            });
        } else {
            state.route = target;
            state.menu_open = false;
        }
    }

    fn submit_login(&self, state: &mut StoreState) {
        let username = state.username_field.clone();
        if username.is_empty() {
            state.login_error = Some(messages::USERNAME_REQUIRED.to_string());
            return;
        }
        if state.password_field.is_empty() {
            state.login_error = Some(messages::PASSWORD_REQUIRED.to_string());
            return;
        }
        match users::behavior_for(&username) {
            Some(_) if state.password_field != users::PASSWORD => {
                state.login_error = Some(messages::BAD_CREDENTIALS.to_string());
            }
            Some(Behavior::Locked) => {
                state.login_error = Some(messages::LOCKED_OUT.to_string());
            }
            Some(behavior) => {
                state.login_error = None;
                state.signed_in = Some(behavior);
                self.begin_transition(state, Route::Inventory);
            }
            None => {
                state.login_error = Some(messages::BAD_CREDENTIALS.to_string());
            }
        }
    }

    fn submit_shipping_form(&self, state: &mut StoreState) {
        if state.first_name.is_empty() {
            state.form_error = Some(messages::FIRST_NAME_REQUIRED.to_string());
            return;
        }
        // The submission-broken profile advances even with the cleared
        // last-name field; everyone else is stopped by form validation.
        if state.last_name.is_empty() && state.signed_in != Some(Behavior::SubmissionBroken) {
            state.form_error = Some(messages::LAST_NAME_REQUIRED.to_string());
            return;
        }
        if state.postal_code.is_empty() {
            state.form_error = Some(messages::POSTAL_CODE_REQUIRED.to_string());
            return;
        }
        state.form_error = None;
        self.begin_transition(state, Route::CheckoutStepTwo);
    }

    /// Number of elements the current page renders for a selector
    #[allow(clippy::match_same_arms)]
    fn element_count(state: &StoreState, selector: &Selector) -> usize {
        let signed_in = state.signed_in.is_some();
        if let Some(css) = match selector {
            Selector::Css(css) => Some(css.as_str()),
            Selector::DataTest(_) => None,
        } {
            return match css {
                "#react-burger-menu-btn" if signed_in => 1,
                _ => 0,
            };
        }
        let Some(name) = selector.data_test_name() else {
            return 0;
        };
        match name {
            "username" | "password" | "login-button" => {
                usize::from(state.route == Route::Login)
            }
            "error" => match state.route {
                Route::Login => usize::from(state.login_error.is_some()),
                Route::CheckoutStepOne => usize::from(state.form_error.is_some()),
                _ => 0,
            },
            "inventory-item" | "inventory-item-name" | "inventory-item-price" => {
                match state.route {
                    Route::Inventory => products::ALL.len(),
                    Route::Cart => state.cart.len(),
                    _ => 0,
                }
            }
            "product-sort-container" => usize::from(state.route == Route::Inventory),
            "shopping-cart-link" => usize::from(signed_in),
            "shopping-cart-badge" => usize::from(signed_in && !state.cart.is_empty()),
            "logout-sidebar-link" | "reset-sidebar-link" => {
                usize::from(signed_in && state.menu_open)
            }
            "checkout" | "continue-shopping" => usize::from(state.route == Route::Cart),
            "firstName" | "lastName" | "postalCode" | "continue" => {
                usize::from(state.route == Route::CheckoutStepOne)
            }
            "cancel" => usize::from(matches!(
                state.route,
                Route::CheckoutStepOne | Route::CheckoutStepTwo
            )),
            "finish" | "total-label" | "subtotal-label" | "tax-label" => {
                usize::from(state.route == Route::CheckoutStepTwo)
            }
            "complete-header" | "back-to-products" => {
                usize::from(state.route == Route::CheckoutComplete)
            }
            _ => {
                if let Some(slug) = name.strip_prefix("add-to-cart-") {
                    usize::from(state.route == Route::Inventory && !state.in_cart(slug))
                } else if let Some(slug) = name.strip_prefix("remove-") {
                    usize::from(
                        matches!(state.route, Route::Inventory | Route::Cart)
                            && state.in_cart(slug),
                    )
                } else {
                    0
                }
            }
        }
    }

    fn missing(selector: &Selector) -> ComprarError {
        ComprarError::Page {
            message: format!("no element matching {selector}"),
        }
    }
}

#[async_trait]
impl PageDriver for SimulatedStorefront {
    async fn navigate(&self, url: &str) -> ComprarResult<()> {
        self.record(format!("navigate:{url}"));
        let path = url
            .strip_prefix(self.base_url.as_str())
            .ok_or_else(|| ComprarError::Navigation {
                url: url.to_string(),
                message: "host not served by this storefront".to_string(),
            })?
            .trim_matches('/');
        let mut state = self.lock_state();
        state.settle();
        if path.is_empty() {
            state.route = Route::Login;
            state.pending = None;
            return Ok(());
        }
        // Deep links only resolve inside a signed-in session.
        let target = [
            Route::Inventory,
            Route::Cart,
            Route::CheckoutStepOne,
            Route::CheckoutStepTwo,
            Route::CheckoutComplete,
        ]
        .into_iter()
        .find(|r| r.path() == path)
        .ok_or_else(|| ComprarError::Navigation {
            url: url.to_string(),
            message: "unknown route".to_string(),
        })?;
        if state.signed_in.is_none() {
            state.route = Route::Login;
        } else {
            state.route = target;
        }
        state.pending = None;
        Ok(())
    }

    async fn current_url(&self) -> ComprarResult<String> {
        let mut state = self.lock_state();
        state.settle();
        Ok(format!("{}/{}", self.base_url, state.route.path()))
    }

    async fn click(&self, selector: &Selector) -> ComprarResult<()> {
        self.record(format!("click:{selector}"));
        let mut state = self.lock_state();
        state.settle();
        if Self::element_count(&state, selector) == 0 {
            return Err(Self::missing(selector));
        }
        if let Selector::Css(css) = selector {
            if css == "#react-burger-menu-btn" {
                state.menu_open = true;
            }
            return Ok(());
        }
        let Some(name) = selector.data_test_name().map(str::to_string) else {
            return Ok(());
        };
        match name.as_str() {
            "login-button" => self.submit_login(&mut state),
            "shopping-cart-link" => self.begin_transition(&mut state, Route::Cart),
            "checkout" => self.begin_transition(&mut state, Route::CheckoutStepOne),
            "continue" => self.submit_shipping_form(&mut state),
            "finish" => {
                // The submission-broken profile never completes the order.
                if state.signed_in != Some(Behavior::SubmissionBroken) {
                    state.cart.clear();
                    self.begin_transition(&mut state, Route::CheckoutComplete);
                }
            }
            "continue-shopping" | "back-to-products" => {
                self.begin_transition(&mut state, Route::Inventory);
            }
            "cancel" => {
                let target = if state.route == Route::CheckoutStepOne {
                    Route::Cart
                } else {
                    Route::Inventory
                };
                self.begin_transition(&mut state, target);
            }
            "logout-sidebar-link" => {
                state.signed_in = None;
                state.cart.clear();
                state.menu_open = false;
                state.username_field.clear();
                state.password_field.clear();
                state.route = Route::Login;
                state.pending = None;
            }
            "reset-sidebar-link" => state.cart.clear(),
            other => {
                if let Some(slug) = other.strip_prefix("add-to-cart-") {
                    if !state.in_cart(slug) {
                        state.cart.push(slug.to_string());
                    }
                } else if let Some(slug) = other.strip_prefix("remove-") {
                    state.cart.retain(|s| s != slug);
                }
            }
        }
        debug!(target: "comprar::sim", selector = %selector, "click handled");
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> ComprarResult<()> {
        self.record(format!("fill:{selector}={text}"));
        let mut state = self.lock_state();
        state.settle();
        if Self::element_count(&state, selector) == 0 {
            return Err(Self::missing(selector));
        }
        match selector.data_test_name() {
            Some("username") => state.username_field = text.to_string(),
            Some("password") => state.password_field = text.to_string(),
            Some("firstName") => state.first_name = text.to_string(),
            Some("lastName") => {
                // Broken input handling: the field silently rejects (or
                // immediately clears) whatever is typed into it.
                let broken = matches!(
                    state.signed_in,
                    Some(Behavior::InputBroken | Behavior::SubmissionBroken)
                );
                if broken {
                    state.last_name.clear();
                } else {
                    state.last_name = text.to_string();
                }
            }
            Some("postalCode") => state.postal_code = text.to_string(),
            _ => {}
        }
        Ok(())
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> ComprarResult<()> {
        self.record(format!("select:{selector}={value}"));
        let mut state = self.lock_state();
        state.settle();
        if Self::element_count(&state, selector) == 0 {
            return Err(Self::missing(selector));
        }
        if selector.data_test_name() == Some("product-sort-container") {
            if !matches!(value, "az" | "za" | "lohi" | "hilo") {
                return Err(ComprarError::Page {
                    message: format!("unknown sort option '{value}'"),
                });
            }
            state.sort = value.to_string();
        }
        Ok(())
    }

    async fn text_content(&self, selector: &Selector) -> ComprarResult<Option<String>> {
        let mut state = self.lock_state();
        state.settle();
        if Self::element_count(&state, selector) == 0 {
            return Ok(None);
        }
        let text = match selector.data_test_name() {
            Some("error") => match state.route {
                Route::Login => state.login_error.clone(),
                Route::CheckoutStepOne => state.form_error.clone(),
                _ => None,
            },
            Some("complete-header") => Some(messages::ORDER_COMPLETE.to_string()),
            Some("shopping-cart-badge") => Some(state.cart.len().to_string()),
            Some("inventory-item-name") => match state.route {
                Route::Inventory => state.sorted_catalog().first().map(|p| p.name.to_string()),
                Route::Cart => state.cart_products().first().map(|p| p.name.to_string()),
                _ => None,
            },
            Some("inventory-item-price") => match state.route {
                Route::Inventory => state
                    .sorted_catalog()
                    .first()
                    .map(|p| format_usd(p.price_cents)),
                Route::Cart => state
                    .cart_products()
                    .first()
                    .map(|p| format_usd(p.price_cents)),
                _ => None,
            },
            Some("subtotal-label") => Some(format!(
                "Item total: {}",
                format_usd(state.subtotal_cents())
            )),
            Some("tax-label") => Some(format!("Tax: {}", format_usd(state.tax_cents()))),
            Some("total-label") => Some(format!(
                "Total: {}",
                format_usd(state.subtotal_cents() + state.tax_cents())
            )),
            _ => Some(String::new()),
        };
        Ok(text)
    }

    async fn all_text_contents(&self, selector: &Selector) -> ComprarResult<Vec<String>> {
        {
            let mut state = self.lock_state();
            state.settle();
            match selector.data_test_name() {
                Some("inventory-item-name") => {
                    return Ok(match state.route {
                        Route::Inventory => state
                            .sorted_catalog()
                            .iter()
                            .map(|p| p.name.to_string())
                            .collect(),
                        Route::Cart => state
                            .cart_products()
                            .iter()
                            .map(|p| p.name.to_string())
                            .collect(),
                        _ => Vec::new(),
                    })
                }
                Some("inventory-item-price") => {
                    return Ok(match state.route {
                        Route::Inventory => state
                            .sorted_catalog()
                            .iter()
                            .map(|p| format_usd(p.price_cents))
                            .collect(),
                        Route::Cart => state
                            .cart_products()
                            .iter()
                            .map(|p| format_usd(p.price_cents))
                            .collect(),
                        _ => Vec::new(),
                    })
                }
                _ => {}
            }
        }
        Ok(self
            .text_content(selector)
            .await?
            .map_or_else(Vec::new, |t| vec![t]))
    }

    async fn input_value(&self, selector: &Selector) -> ComprarResult<Option<String>> {
        let mut state = self.lock_state();
        state.settle();
        if Self::element_count(&state, selector) == 0 {
            return Ok(None);
        }
        Ok(match selector.data_test_name() {
            Some("username") => Some(state.username_field.clone()),
            Some("password") => Some(state.password_field.clone()),
            Some("firstName") => Some(state.first_name.clone()),
            Some("lastName") => Some(state.last_name.clone()),
            Some("postalCode") => Some(state.postal_code.clone()),
            _ => None,
        })
    }

    async fn is_visible(&self, selector: &Selector) -> ComprarResult<bool> {
        let mut state = self.lock_state();
        state.settle();
        Ok(Self::element_count(&state, selector) > 0)
    }

    async fn is_enabled(&self, selector: &Selector) -> ComprarResult<bool> {
        let mut state = self.lock_state();
        state.settle();
        Ok(Self::element_count(&state, selector) > 0)
    }

    async fn count(&self, selector: &Selector) -> ComprarResult<usize> {
        let mut state = self.lock_state();
        state.settle();
        Ok(Self::element_count(&state, selector))
    }
}
