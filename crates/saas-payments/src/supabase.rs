//! Supabase (PostgREST) subscription store
//!
//! Writes go through the REST endpoint with the service-role key, which
//! bypasses row level security on `subscriptions`.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::error::{PaymentError, Result};
use crate::store::{SubscriptionRecord, SubscriptionStore, SubscriptionUpsert};

const TABLE: &str = "subscriptions";
const CONFLICT_COLUMN: &str = "user_id";

/// Asks PostgREST for the single upserted row as a bare object
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const UPSERT_PREFERENCE: &str = "resolution=merge-duplicates,return=representation";

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Subscription store backed by a Supabase project
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_url: String,
    service_role_key: String,
}

impl SupabaseStore {
    /// Create a store for the project at `project_url`
    pub fn new(project_url: &str, service_role_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// Whether both the project URL and key were supplied
    pub fn is_configured(&self) -> bool {
        self.rest_url != "/rest/v1" && !self.service_role_key.is_empty()
    }

    fn auth_headers(&self) -> Result<HeaderMap> {
        let key = HeaderValue::from_str(&self.service_role_key)
            .map_err(|e| PaymentError::Config(format!("invalid service role key: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.service_role_key))
            .map_err(|e| PaymentError::Config(format!("invalid service role key: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }
}

#[async_trait]
impl SubscriptionStore for SupabaseStore {
    async fn upsert(&self, subscription: &SubscriptionUpsert) -> Result<SubscriptionRecord> {
        let url = format!("{}/{TABLE}", self.rest_url);

        let response = self
            .http
            .post(&url)
            .query(&[("on_conflict", CONFLICT_COLUMN)])
            .headers(self.auth_headers()?)
            .header("Prefer", UPSERT_PREFERENCE)
            .header(ACCEPT, SINGLE_OBJECT)
            .json(subscription)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<PostgrestError>(&body)
                .ok()
                .and_then(|err| {
                    tracing::debug!(code = ?err.code, details = ?err.details, "PostgREST error");
                    err.message
                })
                .unwrap_or_else(|| format!("Data store request failed with status {status}"));
            return Err(PaymentError::Storage(message));
        }

        let record: SubscriptionRecord = response.json().await?;

        tracing::debug!(user_id = %record.user_id, "Upserted subscription row");

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upsert() -> SubscriptionUpsert {
        SubscriptionUpsert {
            user_id: "user-1".into(),
            email: Some("user@example.com".into()),
            stripe_customer_id: Some("cus_1".into()),
            stripe_subscription_id: Some("sub_1".into()),
            price_id: Some("price_pro".into()),
            plan_name: Some("Pro ($19/mo)".into()),
            status: "active".into(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_upsert_posts_on_conflict_user_id() {
        let server = MockServer::start().await;
        let row = serde_json::json!({
            "id": "7f3a4d8e-2b1c-4e5f-9a0b-1c2d3e4f5a6b",
            "user_id": "user-1",
            "email": "user@example.com",
            "stripe_customer_id": "cus_1",
            "stripe_subscription_id": "sub_1",
            "price_id": "price_pro",
            "plan_name": "Pro ($19/mo)",
            "status": "active",
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-02T00:00:00Z"
        });

        Mock::given(method("POST"))
            .and(path("/rest/v1/subscriptions"))
            .and(query_param("on_conflict", "user_id"))
            .and(header("apikey", "service-key"))
            .and(header("authorization", "Bearer service-key"))
            .and(body_partial_json(serde_json::json!({"user_id": "user-1", "status": "active"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(row))
            .expect(1)
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), "service-key");
        let record = store.upsert(&upsert()).await.unwrap();

        assert_eq!(record.user_id, "user-1");
        assert!(record.id.is_some());
        assert!(record.is_active());
    }

    #[tokio::test]
    async fn test_upsert_passes_through_serial_id_and_extra_columns() {
        let server = MockServer::start().await;
        let row = serde_json::json!({
            "id": 17,
            "user_id": "user-1",
            "email": "user@example.com",
            "stripe_customer_id": "cus_1",
            "stripe_subscription_id": "sub_1",
            "price_id": "price_pro",
            "plan_name": "Pro ($19/mo)",
            "status": "active",
            "updated_at": "2026-01-02T00:00:00Z",
            "cancel_at_period_end": false
        });

        Mock::given(method("POST"))
            .and(path("/rest/v1/subscriptions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(row))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), "service-key");
        let record = store.upsert(&upsert()).await.unwrap();

        assert_eq!(record.id, Some(crate::store::RowId::Serial(17)));
        assert_eq!(record.extra["cancel_at_period_end"], false);
    }

    #[tokio::test]
    async fn test_upsert_surfaces_postgrest_message() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/v1/subscriptions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": "42501",
                "message": "permission denied for table subscriptions"
            })))
            .mount(&server)
            .await;

        let store = SupabaseStore::new(&server.uri(), "anon-key");
        let err = store.upsert(&upsert()).await.unwrap_err();

        assert!(matches!(err, PaymentError::Storage(_)));
        assert_eq!(err.to_string(), "permission denied for table subscriptions");
    }

    #[test]
    fn test_configuration_check() {
        assert!(!SupabaseStore::new("", "").is_configured());
        assert!(!SupabaseStore::new("https://x.supabase.co", "").is_configured());
        assert!(SupabaseStore::new("https://x.supabase.co/", "key").is_configured());
    }
}
