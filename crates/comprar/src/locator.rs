//! Locator resolution: semantic element names to selector expressions.
//!
//! Page objects never hand raw selectors to callers; they register their
//! selectors in a [`LocatorMap`] under semantic keys ("cart badge",
//! "finish button") and resolve them on use. Parameterized locators (the
//! per-product add/remove buttons) are registered once with a prefix and
//! resolved per product slug.
//!
//! Resolution is pure and deterministic. Asking for an unregistered key is
//! a programming error and fails fast with
//! [`ComprarError::UnresolvedLocator`].

use std::collections::HashMap;

use crate::result::{ComprarError, ComprarResult};

/// Selector expression for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selector {
    /// CSS selector (e.g. `#react-burger-menu-btn`)
    Css(String),
    /// `data-test` attribute selector (the storefront's stable test hooks)
    DataTest(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a `data-test` attribute selector
    #[must_use]
    pub fn data_test(name: impl Into<String>) -> Self {
        Self::DataTest(name.into())
    }

    /// Render as a CSS selector expression
    #[must_use]
    pub fn to_css(&self) -> String {
        match self {
            Self::Css(s) => s.clone(),
            Self::DataTest(name) => format!("[data-test=\"{name}\"]"),
        }
    }

    /// The `data-test` attribute value, if this is a data-test selector
    #[must_use]
    pub fn data_test_name(&self) -> Option<&str> {
        match self {
            Self::DataTest(name) => Some(name.as_str()),
            Self::Css(_) => None,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_css())
    }
}

/// A registered locator: either a fixed selector or a per-slug template
#[derive(Debug, Clone)]
enum LocatorEntry {
    /// Resolves to the same selector every time
    Fixed(Selector),
    /// Resolves to `[data-test="{prefix}-{slug}"]` for a given product slug
    PerSlug {
        /// Attribute prefix, e.g. `add-to-cart`
        prefix: &'static str,
    },
}

/// Static mapping from semantic element names to selector expressions.
///
/// Each page object owns one subset. The map is built once at page
/// construction and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct LocatorMap {
    entries: HashMap<&'static str, LocatorEntry>,
}

impl LocatorMap {
    /// Create an empty map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed selector under a semantic key
    #[must_use]
    pub fn fixed(mut self, key: &'static str, selector: Selector) -> Self {
        let _ = self.entries.insert(key, LocatorEntry::Fixed(selector));
        self
    }

    /// Register a per-slug template under a semantic key.
    ///
    /// `get_for(key, slug)` resolves to `[data-test="{prefix}-{slug}"]`.
    #[must_use]
    pub fn per_slug(mut self, key: &'static str, prefix: &'static str) -> Self {
        let _ = self.entries.insert(key, LocatorEntry::PerSlug { prefix });
        self
    }

    /// Resolve a fixed locator.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::UnresolvedLocator`] if the key is unknown or
    /// registered as a per-slug template.
    pub fn get(&self, key: &str) -> ComprarResult<Selector> {
        match self.entries.get(key) {
            Some(LocatorEntry::Fixed(selector)) => Ok(selector.clone()),
            _ => Err(ComprarError::UnresolvedLocator {
                key: key.to_string(),
            }),
        }
    }

    /// Resolve a parameterized locator for a product slug.
    ///
    /// # Errors
    ///
    /// Returns [`ComprarError::UnresolvedLocator`] if the key is unknown or
    /// not registered as a per-slug template.
    pub fn get_for(&self, key: &str, slug: &str) -> ComprarResult<Selector> {
        match self.entries.get(key) {
            Some(LocatorEntry::PerSlug { prefix }) => {
                Ok(Selector::DataTest(format!("{prefix}-{slug}")))
            }
            _ => Err(ComprarError::UnresolvedLocator {
                key: key.to_string(),
            }),
        }
    }

    /// Registered semantic keys
    #[must_use]
    pub fn keys(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}
