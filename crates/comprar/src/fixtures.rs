//! Static test data: users, products, shipping info, expected messages.
//!
//! Pure data, no behavior. Prices are fixed-point (integer cents); the
//! currency helpers convert between cents and the storefront's `$X.YY`
//! rendering so comparisons stay exact.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Behavior profile of a simulated user.
///
/// The tag is read once by the orchestrator to select timeout bounds and
/// expected post-conditions; flow logic itself is shared across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Completes the whole flow, no divergence
    Nominal,
    /// Rejected at authentication with the locked-out error
    Locked,
    /// Shipping last-name field may silently reject input
    InputBroken,
    /// Every route transition is slow; waits use extended bounds
    LatencyInjecting,
    /// Last-name field is cleared but the form still advances; the final
    /// submission never completes
    SubmissionBroken,
    /// Renders incorrectly but behaves identically to nominal; checks stay
    /// functional (text and routes), never pixels
    VisualNoise,
}

impl Behavior {
    /// Whether this profile needs the extended timeout bounds
    #[must_use]
    pub const fn is_latency_injecting(&self) -> bool {
        matches!(self, Self::LatencyInjecting)
    }
}

/// A simulated user: credentials plus an explicit behavior profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserVariant {
    /// Login username
    pub username: &'static str,
    /// Login password
    pub password: &'static str,
    /// How this user diverges from the happy path
    pub behavior: Behavior,
}

/// The storefront's simulated users
pub mod users {
    use super::{Behavior, UserVariant};

    /// Shared password for all seeded accounts
    pub const PASSWORD: &str = "secret_sauce";

    /// Well-behaved user
    pub const STANDARD: UserVariant = UserVariant {
        username: "standard_user",
        password: PASSWORD,
        behavior: Behavior::Nominal,
    };

    /// Account locked out at authentication
    pub const LOCKED_OUT: UserVariant = UserVariant {
        username: "locked_out_user",
        password: PASSWORD,
        behavior: Behavior::Locked,
    };

    /// Input handling broken on the shipping form
    pub const PROBLEM: UserVariant = UserVariant {
        username: "problem_user",
        password: PASSWORD,
        behavior: Behavior::InputBroken,
    };

    /// Injects latency into every route transition
    pub const PERFORMANCE_GLITCH: UserVariant = UserVariant {
        username: "performance_glitch_user",
        password: PASSWORD,
        behavior: Behavior::LatencyInjecting,
    };

    /// Shipping form advances but the order never completes
    pub const ERROR: UserVariant = UserVariant {
        username: "error_user",
        password: PASSWORD,
        behavior: Behavior::SubmissionBroken,
    };

    /// Visual glitches only; functionally nominal
    pub const VISUAL: UserVariant = UserVariant {
        username: "visual_user",
        password: PASSWORD,
        behavior: Behavior::VisualNoise,
    };

    /// Every seeded user
    pub const ALL: [UserVariant; 6] = [
        STANDARD,
        LOCKED_OUT,
        PROBLEM,
        PERFORMANCE_GLITCH,
        ERROR,
        VISUAL,
    ];

    /// Behavior profile for a username, `None` for unknown accounts
    #[must_use]
    pub fn behavior_for(username: &str) -> Option<Behavior> {
        ALL.iter()
            .find(|u| u.username == username)
            .map(|u| u.behavior)
    }
}

/// A catalog product
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    /// Display name
    pub name: &'static str,
    /// Price in cents
    pub price_cents: u32,
    /// Stable identifier used to build per-product selectors
    pub slug: &'static str,
}

/// The storefront catalog
pub mod products {
    use super::Product;

    /// Backpack
    pub const BACKPACK: Product = Product {
        name: "Sauce Labs Backpack",
        price_cents: 2999,
        slug: "sauce-labs-backpack",
    };

    /// Bike light
    pub const BIKE_LIGHT: Product = Product {
        name: "Sauce Labs Bike Light",
        price_cents: 999,
        slug: "sauce-labs-bike-light",
    };

    /// Onesie (cheapest item)
    pub const ONESIE: Product = Product {
        name: "Sauce Labs Onesie",
        price_cents: 799,
        slug: "sauce-labs-onesie",
    };

    /// Fleece jacket (most expensive item)
    pub const FLEECE_JACKET: Product = Product {
        name: "Sauce Labs Fleece Jacket",
        price_cents: 4999,
        slug: "sauce-labs-fleece-jacket",
    };

    /// Full catalog in default (name ascending) order
    pub const ALL: [Product; 4] = [BACKPACK, BIKE_LIGHT, FLEECE_JACKET, ONESIE];

    /// Look up a product by slug
    #[must_use]
    pub fn by_slug(slug: &str) -> Option<Product> {
        ALL.iter().find(|p| p.slug == slug).copied()
    }
}

/// Shipping information used at checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutInfo {
    /// First name
    pub first_name: &'static str,
    /// Last name
    pub last_name: &'static str,
    /// Postal code
    pub postal_code: &'static str,
}

/// Default shipping fixture
pub const CHECKOUT_INFO: CheckoutInfo = CheckoutInfo {
    first_name: "John",
    last_name: "Doe",
    postal_code: "12345",
};

/// Exact text the storefront renders for each outcome
pub mod messages {
    /// Locked-out login error
    pub const LOCKED_OUT: &str = "Epic sadface: Sorry, this user has been locked out.";
    /// Empty-username login error
    pub const USERNAME_REQUIRED: &str = "Epic sadface: Username is required";
    /// Empty-password login error
    pub const PASSWORD_REQUIRED: &str = "Epic sadface: Password is required";
    /// Unknown-credentials login error
    pub const BAD_CREDENTIALS: &str =
        "Epic sadface: Username and password do not match any user in this service";
    /// Missing first name on the shipping form
    pub const FIRST_NAME_REQUIRED: &str = "Error: First Name is required";
    /// Missing last name on the shipping form
    pub const LAST_NAME_REQUIRED: &str = "Error: Last Name is required";
    /// Missing postal code on the shipping form
    pub const POSTAL_CODE_REQUIRED: &str = "Error: Postal Code is required";
    /// Completion banner after a successful order
    pub const ORDER_COMPLETE: &str = "Thank you for your order!";
}

/// Render cents as the storefront does: `$29.99`
#[must_use]
pub fn format_usd(cents: u32) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Parse the first `$X.YY` amount out of a text fragment, as cents.
///
/// Returns `None` when the text carries no currency amount.
#[must_use]
pub fn parse_usd(text: &str) -> Option<u32> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(usd_pattern);
    let captures = pattern.captures(text)?;
    let dollars: u32 = captures.get(1)?.as_str().parse().ok()?;
    let cents: u32 = captures.get(2)?.as_str().parse().ok()?;
    Some(dollars * 100 + cents)
}

#[allow(clippy::expect_used)]
fn usd_pattern() -> Regex {
    Regex::new(r"\$(\d+)\.(\d{2})").expect("hard-coded pattern compiles")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod user_tests {
        use super::*;

        #[test]
        fn test_behavior_lookup() {
            assert_eq!(
                users::behavior_for("locked_out_user"),
                Some(Behavior::Locked)
            );
            assert_eq!(
                users::behavior_for("performance_glitch_user"),
                Some(Behavior::LatencyInjecting)
            );
            assert_eq!(users::behavior_for("intruder"), None);
        }

        #[test]
        fn test_only_latency_profile_extends_bounds() {
            let extended: Vec<_> = users::ALL
                .iter()
                .filter(|u| u.behavior.is_latency_injecting())
                .collect();
            assert_eq!(extended.len(), 1);
            assert_eq!(extended[0].username, "performance_glitch_user");
        }

        #[test]
        fn test_usernames_are_unique() {
            for (i, a) in users::ALL.iter().enumerate() {
                for b in &users::ALL[i + 1..] {
                    assert_ne!(a.username, b.username);
                }
            }
        }
    }

    mod product_tests {
        use super::*;

        #[test]
        fn test_by_slug() {
            let product = products::by_slug("sauce-labs-backpack").unwrap();
            assert_eq!(product.name, "Sauce Labs Backpack");
            assert_eq!(product.price_cents, 2999);
        }

        #[test]
        fn test_onesie_is_cheapest_and_jacket_dearest() {
            let min = products::ALL.iter().min_by_key(|p| p.price_cents).unwrap();
            let max = products::ALL.iter().max_by_key(|p| p.price_cents).unwrap();
            assert_eq!(min.slug, products::ONESIE.slug);
            assert_eq!(max.slug, products::FLEECE_JACKET.slug);
        }
    }

    mod currency_tests {
        use super::*;

        #[test]
        fn test_format_usd() {
            assert_eq!(format_usd(2999), "$29.99");
            assert_eq!(format_usd(799), "$7.99");
            assert_eq!(format_usd(5), "$0.05");
        }

        #[test]
        fn test_parse_usd() {
            assert_eq!(parse_usd("$29.99"), Some(2999));
            assert_eq!(parse_usd("Total: $43.18"), Some(4318));
            assert_eq!(parse_usd("free"), None);
        }

        #[test]
        fn test_round_trip_for_catalog_prices() {
            for product in products::ALL {
                assert_eq!(
                    parse_usd(&format_usd(product.price_cents)),
                    Some(product.price_cents)
                );
            }
        }
    }
}
