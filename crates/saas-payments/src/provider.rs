//! Payment Provider Abstraction
//!
//! The initiator and verifier talk to the payment provider through
//! [`CheckoutProvider`], so the Stripe client can be swapped for a fake in
//! tests without touching the checkout logic.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Parameters for a hosted subscription checkout
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionCheckout {
    /// Price the single line item is billed at
    pub price_id: String,

    /// Pre-filled customer email
    pub customer_email: String,

    /// Provider-native correlation field, carries the user id
    pub client_reference_id: String,

    pub success_url: String,
    pub cancel_url: String,

    /// Metadata attached to the session (`user_id`, `price_id`, `plan_name`)
    pub metadata: HashMap<String, String>,
}

/// A checkout session as returned right after creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedCheckout {
    pub id: String,
    pub url: Option<String>,
}

/// Payment status of a checkout session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(untagged)]
    Other(String),
}

impl PaymentStatus {
    pub fn from_provider(status: &str) -> Self {
        match status {
            "paid" => Self::Paid,
            "unpaid" => Self::Unpaid,
            "no_payment_required" => Self::NoPaymentRequired,
            other => Self::Other(other.to_string()),
        }
    }

    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// Reference to a provider object that may or may not have been expanded
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObjectRef {
    Id(String),
    Expanded(ExpandedObject),
}

/// The part of an expanded provider object this crate cares about
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedObject {
    pub id: String,
}

impl ObjectRef {
    /// The object's identifier, whichever shape it arrived in
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Expanded(object) => &object.id,
        }
    }
}

impl From<&str> for ObjectRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

/// A checkout session as seen by the verifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionDetails {
    pub id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub customer: Option<ObjectRef>,
    #[serde(default)]
    pub subscription: Option<ObjectRef>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSessionDetails {
    pub fn customer_id(&self) -> Option<&str> {
        self.customer.as_ref().map(ObjectRef::id)
    }

    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription.as_ref().map(ObjectRef::id)
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }
}

/// Payment provider operations used by the checkout flow
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session in subscription mode
    async fn create_subscription_session(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<CreatedCheckout>;

    /// Fetch a checkout session with its customer and subscription expanded
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSessionDetails>;
}
