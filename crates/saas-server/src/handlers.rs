//! HTTP Handlers
//!
//! Bodies are parsed by hand rather than with the `Json` extractor so a
//! malformed body yields the same `{error}` envelope as every other failure.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, header::ORIGIN},
};
use serde::{Deserialize, Serialize};

use saas_payments::{
    CheckoutInitiator, CheckoutLink, CheckoutVerifier, InitiateCheckout, PaymentError,
    VerifiedCheckout,
};

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
    pub store_configured: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckoutRequest {
    pub price_id: String,
    pub email: String,
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyRequest {
    pub session_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.stripe_configured,
        store_configured: state.store_configured,
    })
}

/// CORS preflight
pub async fn preflight() -> &'static str {
    "ok"
}

/// Create a hosted Stripe checkout session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CheckoutLink>, PaymentError> {
    let payload: CheckoutRequest = serde_json::from_slice(&body)?;

    let origin = headers
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let request = InitiateCheckout {
        price_id: payload.price_id,
        email: payload.email,
        user_id: payload.user_id,
        origin,
    };

    let link = CheckoutInitiator::new(state.provider.clone())
        .initiate(request)
        .await?;

    Ok(Json(link))
}

/// Verify a completed checkout and activate the subscription
pub async fn verify_checkout(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<VerifiedCheckout>, PaymentError> {
    let payload: VerifyRequest = serde_json::from_slice(&body)?;

    let verified = CheckoutVerifier::new(state.provider.clone(), state.store.clone())
        .verify(payload.session_id.as_deref())
        .await?;

    Ok(Json(verified))
}
