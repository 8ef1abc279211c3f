//! Email notification subscriptions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One address on the notification list.
///
/// `email` is stored trimmed and lowercased and is unique. Unsubscribing
/// keeps the record with `is_subscribed = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSubscription {
    pub email: String,
    pub is_subscribed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of an upsert against the subscription store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionOutcome {
    /// `true` when the address was already on the list.
    pub matched_existing: bool,
    pub record: EmailSubscription,
}
