use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use crate::auth::{AdminAllowList, AuthError, PasswordHashing, TokenService};
use crate::config::{AppConfig, StoreKind};
use crate::database::{
    DatabaseManager, EventRepository, InMemoryEventRepository, InMemoryUserRepository,
    PgEventRepository, PgUserRepository, UserRepository,
};
use crate::services::{EventService, UserService};

/// Shared, read-only handles passed to every handler and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub users: UserService,
    pub events: EventService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        user_store: Arc<dyn UserRepository>,
        event_store: Arc<dyn EventRepository>,
    ) -> Result<Self, AuthError> {
        let tokens = Arc::new(TokenService::from_config(&config.security)?);
        let passwords = PasswordHashing::from_config(&config.security)?;
        let admins = AdminAllowList::new(&config.security.admin_users);

        Ok(Self {
            users: UserService::new(user_store.clone(), tokens.clone(), passwords, admins),
            events: EventService::new(event_store, user_store),
            tokens,
            config: Arc::new(config),
        })
    }

    pub fn in_memory(config: AppConfig) -> Result<Self, AuthError> {
        Self::new(
            config,
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryEventRepository::new()),
        )
    }

    /// Builds state for the configured store, connecting and migrating Postgres when selected.
    pub async fn connect(config: AppConfig) -> anyhow::Result<Self> {
        match config.database.store {
            StoreKind::Memory => {
                info!("Using in-memory store; data is lost on restart");
                Ok(Self::in_memory(config)?)
            }
            StoreKind::Postgres => {
                let pool = DatabaseManager::connect(&config.database)
                    .await
                    .context("failed to connect to database")?;
                if config.database.run_migrations {
                    DatabaseManager::migrate(&pool)
                        .await
                        .context("failed to run migrations")?;
                }
                Ok(Self::new(
                    config,
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgEventRepository::new(pool)),
                )?)
            }
        }
    }
}
