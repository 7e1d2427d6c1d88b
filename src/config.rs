use std::fmt;

use serde::Deserialize;

/// Credentials of the account created on first start, when configured.
#[derive(Clone, Deserialize)]
pub struct SeedUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SeedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origin: Option<String>,
    pub seed_user: Option<SeedUser>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://fintrack.db".into());
        let max_connections = std::env::var("DB_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(10);
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>()?,
            Err(_) => 8080,
        };
        let cors_allowed_origin = std::env::var("CORS_ALLOWED_ORIGIN").ok();

        let seed_user = match (
            std::env::var("SEED_USERNAME"),
            std::env::var("SEED_EMAIL"),
            std::env::var("SEED_PASSWORD"),
        ) {
            (Ok(username), Ok(email), Ok(password)) => Some(SeedUser {
                username,
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            max_connections,
            host,
            port,
            cors_allowed_origin,
            seed_user,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_password_is_not_debug_printed() {
        let seed = SeedUser {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "hunter2".into(),
        };
        let printed = format!("{seed:?}");
        assert!(printed.contains("admin"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn bind_addr_joins_host_and_port() {
        let config = AppConfig {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
            host: "127.0.0.1".into(),
            port: 9000,
            cors_allowed_origin: None,
            seed_user: None,
        };
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }
}
