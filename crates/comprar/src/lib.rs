//! Comprar: storefront E2E verification in Rust.
//!
//! Comprar (Spanish: "to buy") drives a headless browser through a retail
//! storefront's login, catalog, cart and checkout flows and verifies the
//! state transitions and visible text each simulated user behavior is
//! expected to produce.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     COMPRAR Architecture                          │
//! ├──────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌───────────────────┐    │
//! │  │ Scenario     │   │ Page Objects │   │ Automation engine │    │
//! │  │ Orchestrator │──►│ + LocatorMap │──►│ (PageDriver:      │    │
//! │  │ (per-variant │   │ Action/Poll  │   │  CDP or simulated │    │
//! │  │  divergence) │   │ layers       │   │  storefront)      │    │
//! │  └──────────────┘   └──────────────┘   └───────────────────┘    │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Scenarios invoke page-object operations; page objects resolve semantic
//! locators and act through the [`action::ActionExecutor`] (readiness
//! waits) and [`poll::AssertionPoller`] (bounded condition polling); both
//! sit on the narrow [`driver::PageDriver`] contract. User variants carry
//! an explicit behavior tag the orchestrator reads once to select timeout
//! bounds and expected post-conditions.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use comprar::{ScenarioOrchestrator, SessionConfig, sim::SimulatedStorefront};
//! use comprar::fixtures::users;
//!
//! let config = SessionConfig::new("https://www.saucedemo.com");
//! let driver = Arc::new(SimulatedStorefront::new(&config.base_url));
//! let orchestrator = ScenarioOrchestrator::new(driver, config);
//! let report = orchestrator.run_checkout_flow(&users::STANDARD).await?;
//! assert_eq!(report.outcome, comprar::FlowOutcome::Completed);
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::large_stack_arrays, clippy::large_stack_frames))]

/// Action execution with implicit readiness waits
pub mod action;

/// Chromium-backed driver (CDP); requires the `browser` feature
#[cfg(feature = "browser")]
pub mod browser;

/// Abstract automation-engine contract and session configuration
pub mod driver;

/// Static test data: users, products, shipping info, expected messages
pub mod fixtures;

/// Semantic locator resolution
pub mod locator;

/// Page objects for the storefront's screens
pub mod pages;

/// Polling assertions over live page state
pub mod poll;

/// Result and error types
pub mod result;

/// Scenario orchestration and the behavioral variant model
pub mod scenario;

/// In-memory storefront simulation (engine double)
pub mod sim;

/// Timeout bounds, polling cadence, and route patterns
pub mod wait;

pub use action::ActionExecutor;
#[cfg(feature = "browser")]
pub use browser::CdpDriver;
pub use driver::{PageDriver, SessionConfig};
pub use fixtures::{Behavior, CheckoutInfo, Product, UserVariant};
pub use locator::{LocatorMap, Selector};
pub use pages::{CartPage, CheckoutPage, Header, InventoryPage, LoginPage, PageObject, SortOrder};
pub use poll::AssertionPoller;
pub use result::{ComprarError, ComprarResult};
pub use scenario::{FlowOutcome, FlowReport, ScenarioOrchestrator, ScenarioStep};
pub use sim::SimulatedStorefront;
pub use wait::{PollConfig, RoutePattern, Timeouts};
