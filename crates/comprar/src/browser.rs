//! Chromium-backed driver via the Chrome DevTools Protocol.
//!
//! Available with the `browser` feature. Element queries are JS-evaluated
//! against the live DOM; clicks go through CDP input so the page sees real
//! events. Everything engine-specific stays inside this module; the rest
//! of the crate only sees [`PageDriver`].

use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use tokio::sync::Mutex;

use crate::driver::{PageDriver, SessionConfig};
use crate::locator::Selector;
use crate::result::{ComprarError, ComprarResult};

/// [`PageDriver`] implementation over a CDP session
#[derive(Debug)]
pub struct CdpDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: Arc<Mutex<CdpPage>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl CdpDriver {
    /// Launch a browser and open one page for a session.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::BrowserLaunch`] if the browser cannot start.
    pub async fn launch(config: &SessionConfig) -> ComprarResult<Self> {
        let mut builder = CdpConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        let cdp_config = builder.build().map_err(|e| ComprarError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ComprarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page: Arc::new(Mutex::new(page)),
            handle,
        })
    }

    /// Close the browser
    pub async fn close(&self) -> ComprarResult<()> {
        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ComprarError::BrowserLaunch {
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn eval<T: serde::de::DeserializeOwned + Send>(&self, script: String) -> ComprarResult<T> {
        let page = self.page.lock().await;
        let result = page
            .evaluate(script)
            .await
            .map_err(|e| ComprarError::Page {
                message: e.to_string(),
            })?;
        result.into_value().map_err(|e| ComprarError::Page {
            message: e.to_string(),
        })
    }

    /// Quote a string into a JS literal
    fn js_str(text: &str) -> String {
        serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
    }
}

#[async_trait]
impl PageDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> ComprarResult<()> {
        let page = self.page.lock().await;
        page.goto(url).await.map_err(|e| ComprarError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    async fn current_url(&self) -> ComprarResult<String> {
        let page = self.page.lock().await;
        let url = page.url().await.map_err(|e| ComprarError::Page {
            message: e.to_string(),
        })?;
        url.ok_or_else(|| ComprarError::Page {
            message: "page has no URL".to_string(),
        })
    }

    async fn click(&self, selector: &Selector) -> ComprarResult<()> {
        let css = selector.to_css();
        let page = self.page.lock().await;
        let element = page
            .find_element(css.as_str())
            .await
            .map_err(|e| ComprarError::Page {
                message: format!("{css}: {e}"),
            })?;
        element.click().await.map_err(|e| ComprarError::Page {
            message: format!("{css}: {e}"),
        })?;
        Ok(())
    }

    async fn fill(&self, selector: &Selector, text: &str) -> ComprarResult<()> {
        // Set the value and raise the input events the page listens for.
        // Whether the value actually sticks is the page's business; the
        // read-back in input_value is what callers verify with.
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); if (!el) return false; \
             el.value = {text}; \
             el.dispatchEvent(new Event('input', {{bubbles: true}})); \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             return true; }})()",
            sel = Self::js_str(&selector.to_css()),
            text = Self::js_str(text),
        );
        let found: bool = self.eval(script).await?;
        if found {
            Ok(())
        } else {
            Err(ComprarError::Page {
                message: format!("no element matching {selector}"),
            })
        }
    }

    async fn select_option(&self, selector: &Selector, value: &str) -> ComprarResult<()> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); if (!el) return false; \
             el.value = {value}; \
             el.dispatchEvent(new Event('change', {{bubbles: true}})); \
             return el.value === {value}; }})()",
            sel = Self::js_str(&selector.to_css()),
            value = Self::js_str(value),
        );
        let selected: bool = self.eval(script).await?;
        if selected {
            Ok(())
        } else {
            Err(ComprarError::Page {
                message: format!("could not select '{value}' in {selector}"),
            })
        }
    }

    async fn text_content(&self, selector: &Selector) -> ComprarResult<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             return el ? el.textContent : null; }})()",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }

    async fn all_text_contents(&self, selector: &Selector) -> ComprarResult<Vec<String>> {
        let script = format!(
            "Array.from(document.querySelectorAll({sel})).map(el => el.textContent ?? '')",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }

    async fn input_value(&self, selector: &Selector) -> ComprarResult<Option<String>> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             return el ? el.value : null; }})()",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }

    async fn is_visible(&self, selector: &Selector) -> ComprarResult<bool> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); if (!el) return false; \
             const style = window.getComputedStyle(el); \
             return style.visibility !== 'hidden' && style.display !== 'none' \
                && el.getClientRects().length > 0; }})()",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }

    async fn is_enabled(&self, selector: &Selector) -> ComprarResult<bool> {
        let script = format!(
            "(() => {{ const el = document.querySelector({sel}); \
             return el ? !el.disabled : false; }})()",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }

    async fn count(&self, selector: &Selector) -> ComprarResult<usize> {
        let script = format!(
            "document.querySelectorAll({sel}).length",
            sel = Self::js_str(&selector.to_css()),
        );
        self.eval(script).await
    }
}
