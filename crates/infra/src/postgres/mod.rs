//! Postgres-backed stores.
//!
//! Queries are checked at runtime (no compile-time `query!` macros), so the
//! crate builds without a live database.

mod products;
mod subscriptions;

pub use products::PostgresProductStore;
pub use subscriptions::PostgresPlanStore;

use catalog_core::StoreError;

/// Map SQLx errors to store errors.
///
/// Postgres error codes:
/// - 23503: foreign_key_violation
/// - 23505: unique_violation
/// - 23514: check_violation
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23503") => StoreError::ForeignKey(msg),
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("undecodable row in {}: {}", operation, err))
        }
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_unavailable() {
        assert!(matches!(
            map_sqlx_error("get", sqlx::Error::PoolClosed),
            StoreError::Unavailable(_)
        ));
        assert!(matches!(
            map_sqlx_error("get", sqlx::Error::PoolTimedOut),
            StoreError::Unavailable(_)
        ));
    }

    #[test]
    fn decode_failures_are_corrupt_rows() {
        assert!(matches!(
            map_sqlx_error("list", sqlx::Error::ColumnNotFound("price".into())),
            StoreError::Corrupt(_)
        ));
    }

    #[test]
    fn other_errors_keep_the_operation_name() {
        let err = map_sqlx_error("count", sqlx::Error::RowNotFound);
        assert!(matches!(&err, StoreError::Database(msg) if msg.contains("count")));
    }
}
