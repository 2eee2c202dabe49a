use accounts_auth::Authenticator;
use accounts_config::AppConfig;
use accounts_database::initialize_database;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::{info, warn};

pub mod telemetry {
    use anyhow::Result;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global fmt subscriber. `RUST_LOG` overrides the default `info` filter.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub authenticator: Authenticator,
}

impl BackendServices {
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let db_pool = initialize_database(&config.database)
            .await
            .context("failed to initialise database")?;

        if config.auth.uses_development_secret() {
            warn!("auth.jwt_secret is the development placeholder; set ACCOUNTS__AUTH__JWT_SECRET before deploying");
        }

        let authenticator = Authenticator::new(db_pool.clone(), &config.auth);
        info!(
            token_ttl_seconds = config.auth.token_ttl_seconds,
            "authenticator ready"
        );

        Ok(Self {
            db_pool,
            authenticator,
        })
    }

    /// Close the connection pool once the server has stopped accepting requests.
    pub async fn shutdown(self) {
        self.db_pool.close().await;
        info!("database pool closed");
    }
}

pub async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(?error, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
