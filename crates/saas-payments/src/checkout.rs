//! Stripe Checkout Integration
//!
//! Implements the "Stripe Checkout (Hosted)" approach: the initiator creates
//! a subscription-mode session and hands the browser its hosted URL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use stripe::{
    CheckoutSession as StripeCheckoutSession, CheckoutSessionId, CheckoutSessionMode, Client,
    CreateCheckoutSession, CreateCheckoutSessionLineItems,
    CreateCheckoutSessionPaymentMethodTypes, Expandable,
};

use crate::error::{PaymentError, Result};
use crate::plan::Plan;
use crate::provider::{
    CheckoutProvider, CheckoutSessionDetails, CreatedCheckout, ExpandedObject, ObjectRef,
    PaymentStatus, SubscriptionCheckout,
};

/// Objects expanded when a session is retrieved for verification
const EXPAND_ON_RETRIEVE: &[&str] = &["subscription", "customer"];

/// Placeholder Stripe substitutes with the real session id on redirect
const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Stripe client wrapper
pub struct StripeClient {
    client: Client,
    configured: bool,
}

impl StripeClient {
    /// Create a new Stripe client
    ///
    /// An empty key is accepted; Stripe rejects the first request instead.
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
            configured: !secret_key.is_empty(),
        }
    }

    /// Whether a secret key was supplied
    pub const fn is_configured(&self) -> bool {
        self.configured
    }
}

fn object_ref<T>(expandable: &Expandable<T>) -> ObjectRef
where
    T: stripe::Object,
    T::Id: std::fmt::Display,
{
    match expandable {
        Expandable::Id(id) => ObjectRef::Id(id.to_string()),
        Expandable::Object(object) => ObjectRef::Expanded(ExpandedObject {
            id: object.id().to_string(),
        }),
    }
}

#[async_trait]
impl CheckoutProvider for StripeClient {
    async fn create_subscription_session(
        &self,
        checkout: &SubscriptionCheckout,
    ) -> Result<CreatedCheckout> {
        let mut params = CreateCheckoutSession::new();
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.payment_method_types = Some(vec![CreateCheckoutSessionPaymentMethodTypes::Card]);
        params.success_url = Some(&checkout.success_url);
        params.cancel_url = Some(&checkout.cancel_url);
        params.customer_email = Some(&checkout.customer_email);
        params.client_reference_id = Some(&checkout.client_reference_id);
        params.metadata = Some(checkout.metadata.clone());
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(checkout.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);

        let session = StripeCheckoutSession::create(&self.client, params).await?;

        Ok(CreatedCheckout {
            id: session.id.to_string(),
            url: session.url,
        })
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSessionDetails> {
        let id: CheckoutSessionId = session_id.parse().map_err(|_| {
            PaymentError::Stripe(format!("No such checkout.session: '{session_id}'"))
        })?;

        let session = StripeCheckoutSession::retrieve(&self.client, &id, EXPAND_ON_RETRIEVE).await?;

        Ok(CheckoutSessionDetails {
            id: session.id.to_string(),
            payment_status: PaymentStatus::from_provider(session.payment_status.as_str()),
            customer: session.customer.as_ref().map(object_ref),
            subscription: session.subscription.as_ref().map(object_ref),
            client_reference_id: session.client_reference_id,
            customer_email: session.customer_email,
            metadata: session.metadata.unwrap_or_default(),
        })
    }
}

/// Request to start a checkout for a signed-in user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitiateCheckout {
    /// Stripe price id of the plan being purchased
    pub price_id: String,

    /// Customer email, pre-filled on the hosted page
    pub email: String,

    /// Auth Service user id
    pub user_id: String,

    /// Origin of the page that started the checkout, redirect URLs hang off it
    pub origin: String,
}

/// Where to send the browser next
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLink {
    pub url: String,
    pub session_id: String,
}

/// URL the provider redirects to after a successful payment
pub fn success_url(origin: &str) -> String {
    format!("{origin}/dashboard.html?success=true&session_id={SESSION_ID_PLACEHOLDER}")
}

/// URL the provider redirects to when the customer backs out
pub fn cancel_url(origin: &str) -> String {
    format!("{origin}/dashboard.html?canceled=true")
}

/// Creates hosted checkout sessions
pub struct CheckoutInitiator {
    provider: Arc<dyn CheckoutProvider>,
}

impl CheckoutInitiator {
    pub fn new(provider: Arc<dyn CheckoutProvider>) -> Self {
        Self { provider }
    }

    /// Build the provider request for a checkout
    pub fn subscription_checkout(request: &InitiateCheckout) -> SubscriptionCheckout {
        let plan = Plan::from_price_id(&request.price_id);

        let mut metadata = HashMap::new();
        metadata.insert("user_id".to_string(), request.user_id.clone());
        metadata.insert("price_id".to_string(), request.price_id.clone());
        metadata.insert("plan_name".to_string(), plan.display_name().to_string());

        SubscriptionCheckout {
            price_id: request.price_id.clone(),
            customer_email: request.email.clone(),
            client_reference_id: request.user_id.clone(),
            success_url: success_url(&request.origin),
            cancel_url: cancel_url(&request.origin),
            metadata,
        }
    }

    /// Create a checkout session and return its hosted URL
    pub async fn initiate(&self, request: InitiateCheckout) -> Result<CheckoutLink> {
        let checkout = Self::subscription_checkout(&request);

        let created = self.provider.create_subscription_session(&checkout).await?;

        let url = created
            .url
            .ok_or_else(|| PaymentError::Stripe("No checkout URL returned".into()))?;

        tracing::info!(
            session_id = %created.id,
            user_id = %request.user_id,
            plan = %checkout.metadata.get("plan_name").map_or("", String::as_str),
            "Created checkout session"
        );

        Ok(CheckoutLink {
            url,
            session_id: created.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::BASIC_PRICE_ID;
    use crate::testing::FakeProvider;

    fn request(price_id: &str) -> InitiateCheckout {
        InitiateCheckout {
            price_id: price_id.into(),
            email: "user@example.com".into(),
            user_id: "5b0c7c1e-user".into(),
            origin: "https://app.example.com".into(),
        }
    }

    #[test]
    fn test_redirect_urls() {
        assert_eq!(
            success_url("https://app.example.com"),
            "https://app.example.com/dashboard.html?success=true&session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            cancel_url("https://app.example.com"),
            "https://app.example.com/dashboard.html?canceled=true"
        );
    }

    #[test]
    fn test_subscription_checkout_params() {
        let checkout = CheckoutInitiator::subscription_checkout(&request(BASIC_PRICE_ID));

        assert_eq!(checkout.price_id, BASIC_PRICE_ID);
        assert_eq!(checkout.customer_email, "user@example.com");
        assert_eq!(checkout.client_reference_id, "5b0c7c1e-user");
        assert_eq!(checkout.metadata["user_id"], "5b0c7c1e-user");
        assert_eq!(checkout.metadata["price_id"], BASIC_PRICE_ID);
        assert_eq!(checkout.metadata["plan_name"], "Basic ($9/mo)");
    }

    #[tokio::test]
    async fn test_initiate_returns_hosted_url() {
        let provider = Arc::new(FakeProvider::default());
        let initiator = CheckoutInitiator::new(provider.clone());

        let link = initiator.initiate(request("price_pro")).await.unwrap();

        assert!(link.url.starts_with("https://checkout.stripe.com/"));
        assert!(!link.session_id.is_empty());

        let created = provider.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].metadata["plan_name"], "Pro ($19/mo)");
    }

    #[tokio::test]
    async fn test_initiate_without_url_fails() {
        let provider = Arc::new(FakeProvider::default().without_checkout_url());
        let initiator = CheckoutInitiator::new(provider);

        let err = initiator.initiate(request("price_pro")).await.unwrap_err();
        assert_eq!(err.to_string(), "No checkout URL returned");
    }

    #[tokio::test]
    async fn test_initiate_propagates_provider_rejection() {
        let provider = Arc::new(FakeProvider::default().rejecting("No such price: 'price_pro'"));
        let initiator = CheckoutInitiator::new(provider);

        let err = initiator.initiate(request("price_pro")).await.unwrap_err();
        assert_eq!(err.to_string(), "No such price: 'price_pro'");
    }
}
