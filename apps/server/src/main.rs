use accounts_api::{build_router, AppState};
use accounts_config::{load as load_config, AppConfig};
use accounts_database::{prepare_database, run_migrations};
use accounts_runtime::{telemetry, BackendServices};
use anyhow::Context;
use axum::Router;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "accounts-server")]
#[command(about = "Accounts backend (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply pending schema migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::Migrate => migrate(config).await,
    }
}

fn build_app(services: &BackendServices) -> Router {
    build_router(AppState::new(services.authenticator.clone()))
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!("starting accounts backend");

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;
    let app = build_app(&services);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(accounts_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    services.shutdown().await;
    info!("backend shut down");
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let pool = prepare_database(&config.database)
        .await
        .context("failed to open database")?;

    run_migrations(&pool).await?;
    pool.close().await;

    info!(url = %config.database.url, "schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header::CONTENT_TYPE, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_config(dir: &TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = format!("sqlite://{}", dir.path().join("server.db").display());
        config.database.max_connections = 2;
        config
    }

    #[test]
    fn cli_defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["accounts-server"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_migrate() {
        let cli = Cli::try_parse_from(["accounts-server", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Commands::Migrate));
    }

    #[tokio::test]
    async fn migrate_creates_users_table() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let config = test_config(&dir);

        migrate(config.clone()).await?;

        let pool = prepare_database(&config.database).await?;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'users'",
        )
        .fetch_one(&pool)
        .await?;
        assert_eq!(count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn built_app_registers_users() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let services = BackendServices::initialise(&test_config(&dir)).await?;
        let app = build_app(&services);

        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/register")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "username": "alice", "password": "pw1" }).to_string(),
                    ))?,
            )
            .await?;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = response.into_body().collect().await?.to_bytes();
        let payload: Value = serde_json::from_slice(&body)?;
        assert_eq!(payload["message"], "Registered");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&services.db_pool)
            .await?;
        assert_eq!(count, 1);

        services.shutdown().await;
        Ok(())
    }
}
