//! Login screen.

use crate::action::ActionExecutor;
use crate::locator::{LocatorMap, Selector};
use crate::pages::PageObject;
use crate::result::ComprarResult;
use crate::wait::RoutePattern;

/// Login page: credential fields, submit button, error banner
#[derive(Debug, Clone)]
pub struct LoginPage {
    exec: ActionExecutor,
    root_url: String,
    locators: LocatorMap,
}

impl LoginPage {
    /// Build the login page over an executor, rooted at the storefront URL
    #[must_use]
    pub fn new(exec: ActionExecutor, root_url: impl Into<String>) -> Self {
        let locators = LocatorMap::new()
            .fixed("username field", Selector::data_test("username"))
            .fixed("password field", Selector::data_test("password"))
            .fixed("login button", Selector::data_test("login-button"))
            .fixed("error banner", Selector::data_test("error"));
        Self {
            exec,
            root_url: root_url.into(),
            locators,
        }
    }

    /// Navigate to the storefront root (the login screen)
    pub async fn goto(&self) -> ComprarResult<()> {
        self.exec.navigate(&self.root_url).await
    }

    /// Fill both credential fields and submit
    pub async fn login(&self, username: &str, password: &str) -> ComprarResult<()> {
        self.exec
            .fill(&self.locators.get("username field")?, username)
            .await?;
        self.exec
            .fill(&self.locators.get("password field")?, password)
            .await?;
        self.submit().await
    }

    /// Submit the form as-is (used for the empty-credentials path)
    pub async fn submit(&self) -> ComprarResult<()> {
        self.exec.click(&self.locators.get("login button")?).await
    }

    /// Observable source for the login error text
    pub fn error_banner(&self) -> ComprarResult<Selector> {
        self.locators.get("error banner")
    }
}

impl PageObject for LoginPage {
    fn route_pattern(&self) -> RoutePattern {
        RoutePattern::new(self.root_url.clone())
    }

    fn ready_selector(&self) -> Selector {
        Selector::data_test("login-button")
    }

    fn page_name(&self) -> &'static str {
        "login"
    }
}
