//! Postgres pool construction and schema migration.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

/// Connection options from config; `url` wins over the individual fields.
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    match &config.url {
        Some(url) => url.parse(),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.db_name)),
    }
}

/// Open the pool and check one connection out, so an unreachable database
/// fails here rather than on the first request.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options(config)?)
        .await?;
    info!(max_connections = config.max_connections, "connected to postgres");
    Ok(pool)
}

/// Apply the embedded schema. Idempotent.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    info!("database schema is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_takes_precedence_over_fields() {
        let config = DatabaseConfig {
            host: "ignored".into(),
            url: Some("postgres://svc:pw@db.internal:6543/catalog".into()),
            ..Default::default()
        };
        let opts = connect_options(&config).unwrap();
        assert_eq!(opts.get_host(), "db.internal");
        assert_eq!(opts.get_port(), 6543);
        assert_eq!(opts.get_database(), Some("catalog"));
    }

    #[test]
    fn fields_are_used_without_a_url() {
        let config = DatabaseConfig {
            host: "pg".into(),
            port: 5433,
            db_name: "products".into(),
            ..Default::default()
        };
        let opts = connect_options(&config).unwrap();
        assert_eq!(opts.get_host(), "pg");
        assert_eq!(opts.get_port(), 5433);
        assert_eq!(opts.get_username(), "postgres");
    }

    #[test]
    fn malformed_url_is_rejected() {
        let config = DatabaseConfig {
            url: Some("not a url".into()),
            ..Default::default()
        };
        assert!(connect_options(&config).is_err());
    }
}
