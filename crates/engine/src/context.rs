//! Explicit engine context built from configuration.

use std::sync::Arc;

use domain::services::RsvpEngine;
use persistence::{InvitationCodeRepository, PartyRepository, RsvpRepository};
use sqlx::PgPool;

use crate::config::Config;

/// Everything a command needs: the pool and an engine wired to it.
#[derive(Clone)]
pub struct EngineContext {
    pub pool: PgPool,
    pub engine: RsvpEngine,
}

impl EngineContext {
    /// Connect to the configured database and build the engine.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let pool = persistence::create_pool(&config.pool_config()).await?;
        Ok(Self::from_pool(pool, config))
    }

    /// Build the engine on an existing pool.
    pub fn from_pool(pool: PgPool, config: &Config) -> Self {
        let engine = RsvpEngine::new(
            Arc::new(RsvpRepository::new(pool.clone())),
            Arc::new(InvitationCodeRepository::new(pool.clone())),
            Arc::new(PartyRepository::new(pool.clone())),
            config.engine_options(),
        );
        Self { pool, engine }
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../persistence/src/migrations")
            .run(&self.pool)
            .await
    }
}
