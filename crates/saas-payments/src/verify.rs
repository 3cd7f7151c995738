//! Checkout Verification
//!
//! Turns a completed checkout session into an active subscription row.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use crate::error::{PaymentError, Result};
use crate::provider::CheckoutProvider;
use crate::store::{STATUS_ACTIVE, SubscriptionRecord, SubscriptionStore, SubscriptionUpsert};

/// Outcome of a successful verification
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedCheckout {
    pub success: bool,
    pub subscription: SubscriptionRecord,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
}

/// Verifies checkout sessions and activates subscriptions
pub struct CheckoutVerifier {
    provider: Arc<dyn CheckoutProvider>,
    store: Arc<dyn SubscriptionStore>,
}

impl CheckoutVerifier {
    pub fn new(provider: Arc<dyn CheckoutProvider>, store: Arc<dyn SubscriptionStore>) -> Self {
        Self { provider, store }
    }

    /// Verify a checkout session and upsert the user's subscription
    ///
    /// Nothing is written unless the session is paid and names its user.
    /// Verifying the same session again rewrites the same row.
    pub async fn verify(&self, session_id: Option<&str>) -> Result<VerifiedCheckout> {
        let session_id = session_id
            .filter(|id| !id.is_empty())
            .ok_or(PaymentError::MissingSessionId)?;

        let session = self.provider.retrieve_session(session_id).await?;

        if !session.payment_status.is_paid() {
            tracing::info!(
                session_id,
                payment_status = ?session.payment_status,
                "Checkout session not paid"
            );
            return Err(PaymentError::PaymentNotCompleted);
        }

        // Metadata carries the same user id; the client reference wins
        let user_id = session
            .client_reference_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(PaymentError::MissingUserId)?;

        let customer_id = session.customer_id().map(str::to_string);
        let subscription_id = session.subscription_id().map(str::to_string);

        let upsert = SubscriptionUpsert {
            user_id: user_id.to_string(),
            email: session.customer_email.clone(),
            stripe_customer_id: customer_id.clone(),
            stripe_subscription_id: subscription_id.clone(),
            price_id: session.metadata_value("price_id").map(str::to_string),
            plan_name: session.metadata_value("plan_name").map(str::to_string),
            status: STATUS_ACTIVE.to_string(),
            updated_at: Utc::now(),
        };

        let subscription = self.store.upsert(&upsert).await?;

        tracing::info!(
            session_id,
            user_id,
            customer_id = ?customer_id,
            subscription_id = ?subscription_id,
            "Activated subscription"
        );

        Ok(VerifiedCheckout {
            success: true,
            subscription,
            stripe_customer_id: customer_id,
            stripe_subscription_id: subscription_id,
        })
    }
}
