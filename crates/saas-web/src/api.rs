//! Checkout function client

use serde::{Deserialize, Serialize};

const CREATE_CHECKOUT_PATH: &str = "/functions/v1/create-checkout-session";
const VERIFY_CHECKOUT_PATH: &str = "/functions/v1/verify-checkout";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutBody<'a> {
    price_id: &'a str,
    email: &'a str,
    user_id: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLink {
    pub url: String,
    pub session_id: String,
}

/// Stored subscription row, as much of it as the dashboard shows
#[derive(Clone, Debug, Deserialize)]
pub struct Subscription {
    pub plan_name: Option<String>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedCheckout {
    pub success: bool,
    pub subscription: Subscription,
}

impl VerifiedCheckout {
    /// Line shown on the dashboard, or the error when the payment isn't confirmed
    pub fn summary(self) -> Result<String, String> {
        if !self.success {
            return Err("Payment could not be confirmed".into());
        }
        let plan = self.subscription.plan_name.unwrap_or_default();
        Ok(format!("Subscription {}: {plan}", self.subscription.status))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// What the checkout redirect back to the dashboard says happened
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckoutRedirect {
    Completed { session_id: String },
    Canceled,
    None,
}

impl CheckoutRedirect {
    /// Parse `location.search`
    pub fn from_query(search: &str) -> Self {
        let mut success = false;
        let mut canceled = false;
        let mut session_id = None;

        for pair in search.trim_start_matches('?').split('&') {
            match pair.split_once('=') {
                Some(("success", "true")) => success = true,
                Some(("canceled", "true")) => canceled = true,
                Some(("session_id", id)) if !id.is_empty() => session_id = Some(id.to_string()),
                _ => {}
            }
        }

        match (success, session_id, canceled) {
            (true, Some(session_id), _) => Self::Completed { session_id },
            (_, _, true) => Self::Canceled,
            _ => Self::None,
        }
    }
}

fn function_url(path: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into());
    format!("{origin}{path}")
}

async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(path: &str, body: &B) -> Result<T, String> {
    let response = reqwest::Client::new()
        .post(function_url(path))
        .json(body)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if response.status().is_success() {
        response.json().await.map_err(|e| e.to_string())
    } else {
        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(body.error.unwrap_or_else(|| "Request failed".into()))
    }
}

/// Start a hosted checkout for the signed-in user
pub async fn create_checkout(price_id: &str, email: &str, user_id: &str) -> Result<CheckoutLink, String> {
    post(
        CREATE_CHECKOUT_PATH,
        &CheckoutBody {
            price_id,
            email,
            user_id,
        },
    )
    .await
}

/// Confirm a completed checkout
pub async fn verify_checkout(session_id: &str) -> Result<VerifiedCheckout, String> {
    post(VERIFY_CHECKOUT_PATH, &serde_json::json!({ "sessionId": session_id })).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_redirect() {
        assert_eq!(
            CheckoutRedirect::from_query("?success=true&session_id=cs_test_a1"),
            CheckoutRedirect::Completed {
                session_id: "cs_test_a1".into()
            }
        );
    }

    #[test]
    fn test_canceled_redirect() {
        assert_eq!(CheckoutRedirect::from_query("?canceled=true"), CheckoutRedirect::Canceled);
    }

    #[test]
    fn test_plain_visit() {
        assert_eq!(CheckoutRedirect::from_query(""), CheckoutRedirect::None);
        assert_eq!(CheckoutRedirect::from_query("?success=true"), CheckoutRedirect::None);
    }

    #[test]
    fn test_verified_summary() {
        let verified: VerifiedCheckout = serde_json::from_value(serde_json::json!({
            "success": true,
            "subscription": {"plan_name": "Pro ($19/mo)", "status": "active"},
            "stripeCustomerId": "cus_1",
            "stripeSubscriptionId": "sub_1"
        }))
        .unwrap();

        assert_eq!(verified.summary().unwrap(), "Subscription active: Pro ($19/mo)");
    }

    #[test]
    fn test_unconfirmed_payment_is_an_error() {
        let verified = VerifiedCheckout {
            success: false,
            subscription: Subscription {
                plan_name: None,
                status: String::new(),
            },
        };

        assert_eq!(verified.summary().unwrap_err(), "Payment could not be confirmed");
    }

    #[test]
    fn test_checkout_body_is_camel_case() {
        let body = CheckoutBody {
            price_id: "price_1",
            email: "user@example.com",
            user_id: "user-1",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"priceId": "price_1", "email": "user@example.com", "userId": "user-1"})
        );
    }
}
