//! Accounts Database Crate
//!
//! Connection management, schema migrations, and the user repository that
//! backs the accounts service.

use accounts_config::DatabaseConfig;
use anyhow::Context;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use entities::{NewUser, User};
pub use migrations::{run_migrations, MIGRATOR};
pub use repos::UserRepository;
pub use types::{StoreError, StoreResult, UniqueField};

pub use sqlx::SqlitePool;

/// Open the pool described by `config` and bring the schema up to date
pub async fn initialize_database(config: &DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .context("failed to prepare database")?;

    run_migrations(&pool).await?;

    Ok(pool)
}
