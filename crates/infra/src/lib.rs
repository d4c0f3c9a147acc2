//! Infrastructure layer: configuration, Postgres pool/migrations, and the
//! Postgres-backed product and plan stores.

pub mod config;
pub mod db;
pub mod postgres;

pub use config::{AppConfig, ConfigError};
pub use postgres::{PostgresPlanStore, PostgresProductStore};
