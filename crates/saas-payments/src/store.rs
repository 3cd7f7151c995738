//! Subscription Storage
//!
//! One row per user in the `subscriptions` table, written by upsert on
//! `user_id`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;

/// Status written for every verified checkout
pub const STATUS_ACTIVE: &str = "active";

/// Fields written by an upsert
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionUpsert {
    pub user_id: String,
    pub email: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub price_id: Option<String>,
    pub plan_name: Option<String>,
    pub status: String,
    pub updated_at: DateTime<Utc>,
}

/// Primary key of a stored row
///
/// `migrations/0001_create_subscriptions.sql` uses a uuid; tables created
/// elsewhere may use a serial or text key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Uuid(Uuid),
    Serial(i64),
    Text(String),
}

impl RowId {
    fn generate() -> Self {
        Self::Uuid(Uuid::new_v4())
    }
}

/// A stored subscription row
///
/// Shaped after `migrations/0001_create_subscriptions.sql`. Columns this
/// crate doesn't write land in `extra` and are passed back unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    /// Server-assigned row id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RowId>,

    pub user_id: String,
    pub email: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub stripe_subscription_id: Option<String>,
    pub price_id: Option<String>,
    pub plan_name: Option<String>,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    pub updated_at: DateTime<Utc>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubscriptionRecord {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

/// Subscription storage trait
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert the row, or replace every written field of the user's existing row
    async fn upsert(&self, subscription: &SubscriptionUpsert) -> Result<SubscriptionRecord>;
}

/// In-memory subscription store (for development)
#[derive(Default)]
pub struct MemorySubscriptionStore {
    by_user: RwLock<HashMap<String, SubscriptionRecord>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the row for a user
    pub async fn get(&self, user_id: &str) -> Option<SubscriptionRecord> {
        self.by_user.read().await.get(user_id).cloned()
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.by_user.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.by_user.read().await.is_empty()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn upsert(&self, subscription: &SubscriptionUpsert) -> Result<SubscriptionRecord> {
        let mut by_user = self.by_user.write().await;

        let (id, created_at) = by_user
            .get(&subscription.user_id)
            .map_or_else(|| (RowId::generate(), subscription.updated_at), |existing| {
                (
                    existing.id.clone().unwrap_or_else(RowId::generate),
                    existing.created_at.unwrap_or(existing.updated_at),
                )
            });

        let record = SubscriptionRecord {
            id: Some(id),
            user_id: subscription.user_id.clone(),
            email: subscription.email.clone(),
            stripe_customer_id: subscription.stripe_customer_id.clone(),
            stripe_subscription_id: subscription.stripe_subscription_id.clone(),
            price_id: subscription.price_id.clone(),
            plan_name: subscription.plan_name.clone(),
            status: subscription.status.clone(),
            created_at: Some(created_at),
            updated_at: subscription.updated_at,
            extra: serde_json::Map::new(),
        };

        by_user.insert(record.user_id.clone(), record.clone());

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn upsert(user_id: &str, customer: &str, at: DateTime<Utc>) -> SubscriptionUpsert {
        SubscriptionUpsert {
            user_id: user_id.into(),
            email: Some(format!("{user_id}@example.com")),
            stripe_customer_id: Some(customer.into()),
            stripe_subscription_id: Some("sub_1".into()),
            price_id: Some("price_pro".into()),
            plan_name: Some("Pro ($19/mo)".into()),
            status: STATUS_ACTIVE.into(),
            updated_at: at,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_row_for_same_user() {
        let store = MemorySubscriptionStore::new();
        let first_at = Utc::now();
        let second_at = first_at + Duration::seconds(5);

        let first = store.upsert(&upsert("u1", "cus_old", first_at)).await.unwrap();
        let second = store.upsert(&upsert("u1", "cus_new", second_at)).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(first.id, second.id);
        assert_eq!(second.created_at, Some(first_at));

        let stored = store.get("u1").await.unwrap();
        assert_eq!(stored.stripe_customer_id.as_deref(), Some("cus_new"));
        assert_eq!(stored.updated_at, second_at);
        assert!(stored.is_active());
    }

    #[tokio::test]
    async fn test_upsert_keeps_users_apart() {
        let store = MemorySubscriptionStore::new();
        let now = Utc::now();

        store.upsert(&upsert("u1", "cus_1", now)).await.unwrap();
        store.upsert(&upsert("u2", "cus_2", now)).await.unwrap();

        assert_eq!(store.len().await, 2);
        assert!(store.get("u3").await.is_none());
    }

    #[test]
    fn test_record_omits_unset_server_columns() {
        let record = SubscriptionRecord {
            id: None,
            user_id: "u1".into(),
            email: None,
            stripe_customer_id: None,
            stripe_subscription_id: None,
            price_id: None,
            plan_name: None,
            status: STATUS_ACTIVE.into(),
            created_at: None,
            updated_at: Utc::now(),
            extra: serde_json::Map::new(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_record_accepts_other_table_shapes() {
        let row = serde_json::json!({
            "id": 42,
            "user_id": "u1",
            "email": null,
            "stripe_customer_id": "cus_1",
            "stripe_subscription_id": "sub_1",
            "price_id": "price_pro",
            "plan_name": "Pro ($19/mo)",
            "status": "active",
            "updated_at": "2026-01-02T00:00:00Z",
            "trial_ends_at": null,
            "seats": 3
        });

        let record: SubscriptionRecord = serde_json::from_value(row).unwrap();

        assert_eq!(record.id, Some(RowId::Serial(42)));
        assert_eq!(record.extra["seats"], 3);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["seats"], 3);
        assert!(json["trial_ends_at"].is_null());
    }
}
