/// Configuration management for the API server
///
/// Configuration is read once at startup from environment variables (a
/// `.env` file is loaded first when present).
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 5000)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: `*`)
/// - `PRODUCTION`: Enables HSTS (default: false)
/// - `JWT_SECRET`: HS256 signing secret, at least 32 characters (required)
/// - `JWT_TTL_SECONDS`: Token lifetime in seconds (required)
/// - `BOOTSTRAP_ADMIN_EMAIL` / `BOOTSTRAP_ADMIN_PASSWORD` / `BOOTSTRAP_ADMIN_NAME`:
///   First Admin account, created only while the users table is empty
/// - `RUST_LOG`, `LOG_FORMAT`: read by the tracing setup in `main`
///
/// # Example
///
/// ```no_run
/// use crm_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::{env, fmt};

/// Minimum accepted length of `JWT_SECRET`
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted `JWT_TTL_SECONDS` (30 days)
pub const MAX_TTL_SECONDS: i64 = 30 * 24 * 60 * 60;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,

    /// Seed account for an empty users table
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// Allowed CORS origins; `*` means permissive
    pub cors_origins: Vec<String>,

    /// Production mode (enables HSTS)
    pub production: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Token signing configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret. Generate with: `openssl rand -hex 32`
    #[serde(skip_serializing)]
    pub secret: String,

    pub ttl_seconds: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl JwtConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.ttl_seconds)
    }
}

/// First Admin account
#[derive(Clone, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub email: String,

    #[serde(skip_serializing)]
    pub password: String,

    pub name: String,
}

impl fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from the process environment
    ///
    /// # Errors
    ///
    /// Fails if a required variable is missing, a value doesn't parse, the
    /// JWT secret is shorter than [`MIN_SECRET_LEN`] or the TTL is outside
    /// `1..=MAX_TTL_SECONDS`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("API_PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse::<u16>()
            .map_err(|e| anyhow::anyhow!("API_PORT is invalid: {}", e))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let production = lookup("PRODUCTION")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let database_url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u32>()
            .map_err(|e| anyhow::anyhow!("DATABASE_MAX_CONNECTIONS is invalid: {}", e))?;

        let secret = lookup("JWT_SECRET")
            .ok_or_else(|| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let ttl_seconds = lookup("JWT_TTL_SECONDS")
            .ok_or_else(|| anyhow::anyhow!("JWT_TTL_SECONDS environment variable is required"))?
            .parse::<i64>()
            .map_err(|e| anyhow::anyhow!("JWT_TTL_SECONDS is invalid: {}", e))?;

        if !(1..=MAX_TTL_SECONDS).contains(&ttl_seconds) {
            anyhow::bail!(
                "JWT_TTL_SECONDS must be between 1 and {} seconds",
                MAX_TTL_SECONDS
            );
        }

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_EMAIL"),
            lookup("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAdmin {
                email,
                password,
                name: lookup("BOOTSTRAP_ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
            }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
                production,
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            jwt: JwtConfig {
                secret,
                ttl_seconds,
            },
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/crm"),
            ("JWT_SECRET", SECRET),
            ("JWT_TTL_SECONDS", "3600"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&required())).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:5000");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert!(!config.api.production);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.jwt.ttl(), chrono::Duration::hours(1));
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let vars: Vec<_> = required()
            .into_iter()
            .filter(|(k, _)| *k != "JWT_SECRET")
            .collect();

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let mut vars = required();
        vars.retain(|(k, _)| *k != "JWT_SECRET");
        vars.push(("JWT_SECRET", "too-short"));

        assert!(Config::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_missing_or_nonpositive_ttl_is_fatal() {
        let mut vars = required();
        vars.retain(|(k, _)| *k != "JWT_TTL_SECONDS");
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());

        vars.push(("JWT_TTL_SECONDS", "0"));
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());
    }

    #[test]
    fn test_oversized_ttl_is_fatal() {
        let mut vars = required();
        vars.retain(|(k, _)| *k != "JWT_TTL_SECONDS");

        let mut too_long = vars.clone();
        too_long.push(("JWT_TTL_SECONDS", "10000000000000"));
        assert!(Config::from_lookup(lookup_from(&too_long)).is_err());

        let max = MAX_TTL_SECONDS.to_string();
        let mut at_limit: Vec<(&str, &str)> = vars.clone();
        at_limit.push(("JWT_TTL_SECONDS", &max));
        let config = Config::from_lookup(lookup_from(&at_limit)).unwrap();
        assert_eq!(config.jwt.ttl().num_seconds(), MAX_TTL_SECONDS);
    }

    #[test]
    fn test_cors_and_production_parsing() {
        let mut vars = required();
        vars.push(("CORS_ORIGINS", "https://crm.example.com, https://admin.example.com"));
        vars.push(("PRODUCTION", "true"));

        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(
            config.api.cors_origins,
            vec![
                "https://crm.example.com".to_string(),
                "https://admin.example.com".to_string()
            ]
        );
        assert!(config.api.production);
    }

    #[test]
    fn test_bootstrap_admin_requires_both_values() {
        let mut vars = required();
        vars.push(("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"));
        assert!(Config::from_lookup(lookup_from(&vars)).is_err());

        vars.push(("BOOTSTRAP_ADMIN_PASSWORD", "change-me"));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();
        let admin = config.bootstrap_admin.unwrap();
        assert_eq!(admin.email, "admin@example.com");
        assert_eq!(admin.name, "Administrator");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut vars = required();
        vars.push(("BOOTSTRAP_ADMIN_EMAIL", "admin@example.com"));
        vars.push(("BOOTSTRAP_ADMIN_PASSWORD", "change-me"));
        let config = Config::from_lookup(lookup_from(&vars)).unwrap();

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SECRET));
        assert!(!rendered.contains("change-me"));
    }
}
