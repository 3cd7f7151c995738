//! Payment Error Types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, PaymentError>;

/// Payment-related errors
///
/// Every variant surfaces to the caller as the same `{error: message}`
/// envelope, so the `Display` text is the message the browser sees.
#[derive(Error, Debug)]
pub enum PaymentError {
    /// Request body could not be read as the expected JSON shape
    #[error("{0}")]
    InvalidRequest(String),

    /// Verification was called without a checkout session id
    #[error("Session ID is required")]
    MissingSessionId,

    /// The checkout session exists but has not been paid
    #[error("Payment not completed")]
    PaymentNotCompleted,

    /// The checkout session carries no client reference
    #[error("User ID not found in session")]
    MissingUserId,

    /// Stripe API error (message as reported by Stripe)
    #[error("{0}")]
    Stripe(String),

    /// Data store rejected or failed the write
    #[error("{0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaymentError {
    /// Whether the error was caused by the caller's input rather than an upstream service
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_)
                | Self::MissingSessionId
                | Self::PaymentNotCompleted
                | Self::MissingUserId
        )
    }
}

impl From<stripe::StripeError> for PaymentError {
    fn from(err: stripe::StripeError) -> Self {
        match err {
            stripe::StripeError::Stripe(request) => {
                let message = request
                    .message
                    .clone()
                    .unwrap_or_else(|| request.to_string());
                Self::Stripe(message)
            }
            other => Self::Stripe(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PaymentError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

#[cfg(feature = "axum-handlers")]
mod response {
    use axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    };
    use serde::Serialize;

    use super::PaymentError;

    #[derive(Debug, Serialize)]
    struct ErrorBody {
        error: String,
    }

    impl IntoResponse for PaymentError {
        fn into_response(self) -> Response {
            if self.is_client_error() {
                tracing::warn!(error = %self, "Rejected checkout request");
            } else {
                tracing::error!(error = %self, "Upstream failure handling checkout request");
            }

            (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: self.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_messages() {
        assert_eq!(PaymentError::MissingSessionId.to_string(), "Session ID is required");
        assert_eq!(PaymentError::PaymentNotCompleted.to_string(), "Payment not completed");
        assert_eq!(PaymentError::MissingUserId.to_string(), "User ID not found in session");
    }

    #[test]
    fn test_upstream_messages_are_verbatim() {
        let err = PaymentError::Stripe("No such price: 'price_nope'".into());
        assert_eq!(err.to_string(), "No such price: 'price_nope'");
        assert!(!err.is_client_error());
        assert!(PaymentError::MissingUserId.is_client_error());
    }
}
