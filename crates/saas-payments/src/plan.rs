//! Subscription Plans
//!
//! The catalogue is closed: two plans, keyed by Stripe price id. Adding a
//! plan means adding a variant here.

/// Stripe price id of the Basic plan. Every other price id is treated as Pro.
pub const BASIC_PRICE_ID: &str = "price_1SaZfrLXgHZdEVXGEoy3Zuzb";

/// Subscription plan tiers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Plan {
    Basic,
    Pro,
}

impl Plan {
    /// Resolve the plan purchased with the given Stripe price id
    pub fn from_price_id(price_id: &str) -> Self {
        if price_id == BASIC_PRICE_ID {
            Self::Basic
        } else {
            Self::Pro
        }
    }

    /// Human-readable name stored alongside the subscription
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "Basic ($9/mo)",
            Self::Pro => "Pro ($19/mo)",
        }
    }
}
