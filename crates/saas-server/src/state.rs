//! Application State

use std::sync::Arc;

use saas_payments::{CheckoutProvider, SubscriptionStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider (Stripe)
    pub provider: Arc<dyn CheckoutProvider>,

    /// Subscription store (Supabase)
    pub store: Arc<dyn SubscriptionStore>,

    /// Whether a Stripe key was supplied at startup
    pub stripe_configured: bool,

    /// Whether Supabase URL and service key were supplied at startup
    pub store_configured: bool,
}
