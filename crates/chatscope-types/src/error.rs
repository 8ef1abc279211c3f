use thiserror::Error;

/// Errors from store operations (used by trait definitions in chatscope-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the dashboard service.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A store could not be read. The whole refresh pass fails; no partial
    /// aggregation is returned.
    #[error("{store} unavailable: {source}")]
    SourceUnavailable {
        store: &'static str,
        #[source]
        source: RepositoryError,
    },

    #[error("invalid flag status: '{0}'")]
    InvalidStatus(String),

    #[error("session id is required")]
    MissingSessionId,

    /// The status upsert failed. The caller must not apply the change locally.
    #[error("failed to persist status for session '{session_id}': {source}")]
    PersistenceWriteFailed {
        session_id: String,
        #[source]
        source: RepositoryError,
    },
}

/// Errors surfaced by the subscription service.
#[derive(Debug, Error)]
pub enum SubscriptionError {
    #[error("email is required")]
    MissingEmail,

    #[error("invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("no subscription for '{0}'")]
    UnknownSubscriber(String),

    #[error("subscription store unavailable: {0}")]
    SourceUnavailable(#[source] RepositoryError),

    /// The upsert failed; nothing was changed.
    #[error("failed to persist subscription for '{email}': {source}")]
    PersistenceWriteFailed {
        email: String,
        #[source]
        source: RepositoryError,
    },
}
