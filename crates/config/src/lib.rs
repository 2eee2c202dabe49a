use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "accounts.toml",
    "config/accounts.toml",
    "../accounts.toml",
    "../config/accounts.toml",
];

/// Placeholder signing secret used when nothing else is configured.
pub const DEVELOPMENT_JWT_SECRET: &str = "dev-only-secret-change-me-in-production";

const MIN_JWT_SECRET_LEN: usize = 16;

/// Upper bound on token lifetime (one year).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://accounts.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Bearer token settings.
///
/// ```
/// use accounts_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert_eq!(auth.token_ttl_seconds, 900);
/// assert!(auth.uses_development_secret());
/// ```
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "AuthConfig::default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "AuthConfig::default_token_ttl")]
    pub token_ttl_seconds: u64,
}

impl AuthConfig {
    fn default_jwt_secret() -> String {
        DEVELOPMENT_JWT_SECRET.to_string()
    }

    const fn default_token_ttl() -> u64 {
        900
    }

    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Self::default_jwt_secret(),
            token_ttl_seconds: Self::default_token_ttl(),
        }
    }
}

// The secret stays out of debug output so `?config` can be logged.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use accounts_config::load;
///
/// std::env::remove_var("ACCOUNTS_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let token_ttl = i64::try_from(defaults.auth.token_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.jwt_secret", defaults.auth.jwt_secret.clone())?
        .set_default("auth.token_ttl_seconds", token_ttl)?;

    let environment_overrides = config::Environment::with_prefix("ACCOUNTS").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("ACCOUNTS_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via ACCOUNTS_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    validate(&config)?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}

fn validate(config: &AppConfig) -> anyhow::Result<()> {
    if config.auth.jwt_secret.len() < MIN_JWT_SECRET_LEN {
        bail!("auth.jwt_secret must be at least {MIN_JWT_SECRET_LEN} bytes");
    }
    if config.auth.token_ttl_seconds == 0 {
        bail!("auth.token_ttl_seconds must be greater than zero");
    }
    if config.auth.token_ttl_seconds > MAX_TOKEN_TTL_SECONDS {
        bail!("auth.token_ttl_seconds must not exceed {MAX_TOKEN_TTL_SECONDS}");
    }
    if config.database.max_connections == 0 {
        bail!("database.max_connections must be greater than zero");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "short".into();

        let err = validate(&config).expect_err("short secret must fail");
        assert!(err.to_string().contains("jwt_secret"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", AuthConfig::default());
        assert!(!rendered.contains(DEVELOPMENT_JWT_SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
