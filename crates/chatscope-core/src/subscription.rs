//! Email notification list.
//!
//! SubscriptionService validates and normalizes addresses before they reach
//! the store. Subscribing an address that is already listed updates it in
//! place; toggling flips `is_subscribed` on an existing address.

use std::sync::LazyLock;

use chatscope_types::error::SubscriptionError;
use chatscope_types::subscription::{EmailSubscription, SubscriptionOutcome};
use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::repository::subscription::SubscriptionStore;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern is valid"));

/// Trim and lowercase `input`, then check it looks like an address.
pub fn normalize_email(input: &str) -> Result<String, SubscriptionError> {
    let email = input.trim().to_lowercase();
    if email.is_empty() {
        return Err(SubscriptionError::MissingEmail);
    }
    if !EMAIL_PATTERN.is_match(&email) {
        return Err(SubscriptionError::InvalidEmail(input.trim().to_string()));
    }
    Ok(email)
}

pub struct SubscriptionService<S: SubscriptionStore> {
    store: S,
}

impl<S: SubscriptionStore> SubscriptionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Every subscription, newest first.
    pub async fn list(&self) -> Result<Vec<EmailSubscription>, SubscriptionError> {
        self.store
            .list_subscriptions()
            .await
            .map_err(SubscriptionError::SourceUnavailable)
    }

    /// Add `email` to the list, or update it if already present.
    ///
    /// `is_subscribed` defaults to `true`.
    pub async fn subscribe(
        &self,
        email: &str,
        is_subscribed: Option<bool>,
    ) -> Result<SubscriptionOutcome, SubscriptionError> {
        self.subscribe_at(email, is_subscribed, Utc::now()).await
    }

    #[instrument(skip(self, at))]
    pub async fn subscribe_at(
        &self,
        email: &str,
        is_subscribed: Option<bool>,
        at: DateTime<Utc>,
    ) -> Result<SubscriptionOutcome, SubscriptionError> {
        let email = normalize_email(email)?;
        self.write(&email, is_subscribed.unwrap_or(true), at).await
    }

    /// Flip `is_subscribed` for an address already on the list.
    pub async fn toggle(&self, email: &str) -> Result<SubscriptionOutcome, SubscriptionError> {
        self.toggle_at(email, Utc::now()).await
    }

    #[instrument(skip(self, at))]
    pub async fn toggle_at(
        &self,
        email: &str,
        at: DateTime<Utc>,
    ) -> Result<SubscriptionOutcome, SubscriptionError> {
        let email = normalize_email(email)?;
        let current = self
            .store
            .get_subscription(&email)
            .await
            .map_err(SubscriptionError::SourceUnavailable)?
            .ok_or_else(|| SubscriptionError::UnknownSubscriber(email.clone()))?;
        self.write(&email, !current.is_subscribed, at).await
    }

    async fn write(
        &self,
        email: &str,
        is_subscribed: bool,
        at: DateTime<Utc>,
    ) -> Result<SubscriptionOutcome, SubscriptionError> {
        let outcome = self
            .store
            .upsert_subscription(email, is_subscribed, at)
            .await
            .map_err(|source| {
                warn!(email, error = %source, "Subscription upsert failed");
                SubscriptionError::PersistenceWriteFailed {
                    email: email.to_string(),
                    source,
                }
            })?;

        info!(
            email,
            is_subscribed,
            matched_existing = outcome.matched_existing,
            "Subscription saved"
        );
        Ok(outcome)
    }
}
