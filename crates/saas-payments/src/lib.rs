//! # saas-payments
//!
//! Subscription checkout for the SaaS starter: create a hosted Stripe
//! checkout session, then verify it and activate the user's subscription.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  initiate  ┌─────────────────┐  redirect  ┌─────────────┐
//! │  Dashboard  │───────────▶│  Stripe Hosted  │───────────▶│  Dashboard  │
//! │  (plans)    │            │  Checkout Page  │            │  ?success   │
//! └─────────────┘            └─────────────────┘            └──────┬──────┘
//!                                                                  │ verify
//!                                   ┌─────────────┐  upsert ┌──────▼──────┐
//!                                   │subscriptions│◀────────│  Verifier   │
//!                                   └─────────────┘         └─────────────┘
//! ```
//!
//! The user id travels with the session twice: as `client_reference_id` and
//! in the session metadata. Verification reads the client reference.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use saas_payments::{CheckoutInitiator, CheckoutVerifier, InitiateCheckout, StripeClient, SupabaseStore};
//!
//! let stripe = Arc::new(StripeClient::new("sk_test_xxx"));
//! let store = Arc::new(SupabaseStore::new("https://xyz.supabase.co", "service-role-key"));
//!
//! let link = CheckoutInitiator::new(stripe.clone())
//!     .initiate(InitiateCheckout {
//!         price_id: "price_xxx".into(),
//!         email: "user@example.com".into(),
//!         user_id: "2f1c...".into(),
//!         origin: "https://app.example.com".into(),
//!     })
//!     .await?;
//! // Redirect user to: link.url
//!
//! let verified = CheckoutVerifier::new(stripe, store)
//!     .verify(Some("cs_test_xxx"))
//!     .await?;
//! ```

mod checkout;
mod error;
mod plan;
mod provider;
mod store;
mod supabase;
mod verify;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use checkout::{
    CheckoutInitiator, CheckoutLink, InitiateCheckout, StripeClient, cancel_url, success_url,
};
pub use error::{PaymentError, Result};
pub use plan::{BASIC_PRICE_ID, Plan};
pub use provider::{
    CheckoutProvider, CheckoutSessionDetails, CreatedCheckout, ExpandedObject, ObjectRef,
    PaymentStatus, SubscriptionCheckout,
};
pub use store::{
    MemorySubscriptionStore, RowId, STATUS_ACTIVE, SubscriptionRecord, SubscriptionStore,
    SubscriptionUpsert,
};
pub use supabase::SupabaseStore;
pub use verify::{CheckoutVerifier, VerifiedCheckout};
