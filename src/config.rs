use thiserror::Error;

const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";
const DEFAULT_PORT: &str = "8000";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_ADMIN_NAME: &str = "Administrator";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} missing")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Credentials of the administrator created at startup when absent.
#[derive(Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub admin: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let frontend_url = get("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string());

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| {
            let port = get("PORT").unwrap_or_else(|| DEFAULT_PORT.to_string());
            format!("0.0.0.0:{}", port)
        });

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let admin = match (get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminSeed {
                name: get("ADMIN_NAME").unwrap_or_else(|| DEFAULT_ADMIN_NAME.to_string()),
                email,
                password,
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_EMAIL")),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            frontend_url,
            bind_addr,
            max_connections,
            admin,
        })
    }
}
