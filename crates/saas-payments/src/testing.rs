//! In-process payment provider for tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{PaymentError, Result};
use crate::provider::{
    CheckoutProvider, CheckoutSessionDetails, CreatedCheckout, ObjectRef, PaymentStatus,
    SubscriptionCheckout,
};

/// A paid session for `user_id` with plain customer/subscription ids
pub fn paid_session(session_id: &str, user_id: &str) -> CheckoutSessionDetails {
    let mut metadata = HashMap::new();
    metadata.insert("user_id".to_string(), user_id.to_string());
    metadata.insert("price_id".to_string(), "price_pro".to_string());
    metadata.insert("plan_name".to_string(), "Pro ($19/mo)".to_string());

    CheckoutSessionDetails {
        id: session_id.to_string(),
        payment_status: PaymentStatus::Paid,
        customer: Some(ObjectRef::from("cus_test")),
        subscription: Some(ObjectRef::from("sub_test")),
        client_reference_id: Some(user_id.to_string()),
        customer_email: Some("user@example.com".to_string()),
        metadata,
    }
}

/// Records created sessions and serves canned ones
pub struct FakeProvider {
    sessions: HashMap<String, CheckoutSessionDetails>,
    created: Mutex<Vec<SubscriptionCheckout>>,
    retrieve_calls: AtomicUsize,
    return_url: bool,
    rejection: Option<String>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            sessions: HashMap::new(),
            created: Mutex::new(Vec::new()),
            retrieve_calls: AtomicUsize::new(0),
            return_url: true,
            rejection: None,
        }
    }
}

impl FakeProvider {
    #[must_use]
    pub fn with_session(mut self, session: CheckoutSessionDetails) -> Self {
        self.sessions.insert(session.id.clone(), session);
        self
    }

    #[must_use]
    pub const fn without_checkout_url(mut self) -> Self {
        self.return_url = false;
        self
    }

    /// Fail every session creation with `message`
    #[must_use]
    pub fn rejecting(mut self, message: &str) -> Self {
        self.rejection = Some(message.to_string());
        self
    }

    pub fn created(&self) -> Vec<SubscriptionCheckout> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn retrieve_calls(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckoutProvider for FakeProvider {
    async fn create_subscription_session(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<CreatedCheckout> {
        if let Some(message) = &self.rejection {
            return Err(PaymentError::Stripe(message.clone()));
        }

        let id = {
            let mut created = self
                .created
                .lock()
                .map_err(|e| PaymentError::Stripe(e.to_string()))?;
            created.push(checkout.clone());
            format!("cs_test_{}", created.len())
        };

        let url = self
            .return_url
            .then(|| format!("https://checkout.stripe.com/c/pay/{id}"));

        Ok(CreatedCheckout { id, url })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSessionDetails> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);

        self.sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| PaymentError::Stripe(format!("No such checkout.session: '{session_id}'")))
    }
}
