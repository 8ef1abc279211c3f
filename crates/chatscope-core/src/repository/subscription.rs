//! SubscriptionStore trait definition.

use chatscope_types::error::RepositoryError;
use chatscope_types::subscription::{EmailSubscription, SubscriptionOutcome};
use chrono::{DateTime, Utc};

/// Keyed store of email notification subscriptions.
///
/// Keys are normalized (trimmed, lowercased) addresses; normalization is the
/// caller's job.
pub trait SubscriptionStore: Send + Sync {
    /// Every subscription, newest `created_at` first.
    fn list_subscriptions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<EmailSubscription>, RepositoryError>> + Send;

    fn get_subscription(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<EmailSubscription>, RepositoryError>> + Send;

    /// Insert or update the subscription for `email`.
    ///
    /// A new record gets `created_at == updated_at == at`; an existing one
    /// gets `is_subscribed` and `updated_at` replaced.
    fn upsert_subscription(
        &self,
        email: &str,
        is_subscribed: bool,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<SubscriptionOutcome, RepositoryError>> + Send;
}
