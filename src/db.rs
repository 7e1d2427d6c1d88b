use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use tracing::{info, warn};

use crate::{auth::services, config::AppConfig};

pub async fn connect(config: &AppConfig) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .with_context(|| format!("parse DATABASE_URL {}", config.database_url))?
        .create_if_missing(true);

    let db = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .context("connect to database")?;
    Ok(db)
}

pub async fn migrate(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Registers the configured seed account if no user exists yet.
pub async fn seed_initial_user(db: &SqlitePool, config: &AppConfig) -> anyhow::Result<()> {
    let Some(seed) = &config.seed_user else {
        return Ok(());
    };

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(db)
        .await
        .context("count users")?;
    if count > 0 {
        return Ok(());
    }

    match services::register(db, &seed.username, &seed.email, &seed.password).await {
        Ok(user) => info!(user_id = user.id, username = %user.username, "seed user created"),
        Err(e) => warn!(error = %e, "seed user not created"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SeedUser, state::AppState};

    fn with_seed(state: &AppState) -> AppConfig {
        let mut config = (*state.config).clone();
        config.seed_user = Some(SeedUser {
            username: "admin".into(),
            email: "admin@example.com".into(),
            password: "adminpassword".into(),
        });
        config
    }

    #[tokio::test]
    async fn seeds_only_into_an_empty_users_table() {
        let state = AppState::in_memory().await;
        let config = with_seed(&state);

        seed_initial_user(&state.db, &config).await.unwrap();
        seed_initial_user(&state.db, &config).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let identity = services::authenticate(&state.db, "admin", "adminpassword")
            .await
            .expect("seeded user can log in");
        assert_eq!(identity.username, "admin");
    }

    #[tokio::test]
    async fn no_seed_without_configuration() {
        let state = AppState::in_memory().await;
        seed_initial_user(&state.db, &state.config).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
