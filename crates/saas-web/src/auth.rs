//! Supabase Auth (GoTrue) client
//!
//! Password sign-in and sign-up over the Auth REST API. Session issuance
//! and confirmation emails stay with the hosted service.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::form::Credentials;

/// Auth errors, displayed verbatim under the form
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter email and password")]
    MissingCredentials,

    /// Message reported by the Auth Service
    #[error("{0}")]
    Service(String),

    #[error("{0}")]
    Network(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Authenticated user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session issued by the Auth Service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) the access token expires at
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    pub const fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

/// Sign-up returns a session when email confirmation is off, a bare user otherwise
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignUpOutcome {
    Session(Session),
    ConfirmationPending(User),
}

impl SignUpOutcome {
    /// The session to persist, when the account is signed in straight away
    pub fn into_session(self) -> Option<Session> {
        match self {
            Self::Session(session) => Some(session),
            Self::ConfirmationPending(_) => None,
        }
    }
}

/// Error body shapes the Auth Service uses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
    }
}

/// Auth REST client
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(project_url: &str, anon_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    /// Client for the configured project
    pub fn from_config() -> Self {
        Self::new(crate::config::SUPABASE_URL, crate::config::SUPABASE_ANON_KEY)
    }

    /// Exchange email and password for a session
    pub async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<Session, AuthError> {
        let url = format!("{}/token", self.base_url);
        let response = self
            .http
            .post(&url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(credentials)
            .send()
            .await?;

        Self::parse(response).await
    }

    /// Register a new account
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, AuthError> {
        let url = format!("{}/signup", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(credentials)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        Err(AuthError::Service(
            body.into_message()
                .unwrap_or_else(|| format!("Auth request failed with status {status}")),
        ))
    }
}
