//! Application state wiring the dashboard and subscription services to SQLite.
//!
//! The services are generic over the store traits; AppState pins them to
//! the concrete infra implementations.

use std::path::PathBuf;

use anyhow::Context;
use chatscope_core::resolver::StatusResolver;
use chatscope_core::service::DashboardService;
use chatscope_core::subscription::SubscriptionService;
use chatscope_infra::filesystem::database_path;
use chatscope_infra::sqlite::message::SqliteMessageStore;
use chatscope_infra::sqlite::pool::DatabasePool;
use chatscope_infra::sqlite::status::SqliteStatusStore;
use chatscope_infra::sqlite::subscription::SqliteSubscriptionStore;
use chatscope_types::config::DashboardConfig;

pub type ConcreteDashboardService = DashboardService<SqliteMessageStore, SqliteStatusStore>;

pub type ConcreteSubscriptionService = SubscriptionService<SqliteSubscriptionStore>;

pub struct AppState {
    pub service: ConcreteDashboardService,
    pub subscriptions: ConcreteSubscriptionService,
    pub config: DashboardConfig,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppState {
    /// Open the database under `data_dir` and wire the services.
    pub async fn init(data_dir: PathBuf, config: DashboardConfig) -> anyhow::Result<Self> {
        let db_path = database_path(&data_dir, &config);
        let db_pool = DatabasePool::open(&db_path)
            .await
            .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

        let service = DashboardService::new(
            SqliteMessageStore::new(db_pool.clone()),
            SqliteStatusStore::new(db_pool.clone()),
            StatusResolver::new(config.stale_after_days),
        );
        let subscriptions = SubscriptionService::new(SqliteSubscriptionStore::new(db_pool));

        tracing::debug!(
            data_dir = %data_dir.display(),
            stale_after_days = config.stale_after_days,
            "Application state ready"
        );

        Ok(Self {
            service,
            subscriptions,
            config,
            data_dir,
            db_path,
        })
    }
}
