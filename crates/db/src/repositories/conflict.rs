//! Classification of database errors raised by lock and index races.

use avstock_core::reconciliation::InventoryError;
use sea_orm::{DbErr, RuntimeErr, SqlErr};

/// SQLSTATE for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE for `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";

/// Returns true if a SQLSTATE code means the transaction lost a race and may be re-run.
pub(crate) fn is_retryable_sqlstate(code: &str) -> bool {
    matches!(code, SERIALIZATION_FAILURE | DEADLOCK_DETECTED)
}

fn sqlstate(err: &DbErr) -> Option<String> {
    match err {
        DbErr::Conn(RuntimeErr::SqlxError(e))
        | DbErr::Exec(RuntimeErr::SqlxError(e))
        | DbErr::Query(RuntimeErr::SqlxError(e)) => e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned()),
        _ => None,
    }
}

/// Returns true if the error is a unique-index violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Returns true if the error came from a concurrent writer: a serialization
/// failure, a deadlock, or a unique-index violation.
pub(crate) fn is_conflict(err: &DbErr) -> bool {
    is_unique_violation(err) || sqlstate(err).is_some_and(|code| is_retryable_sqlstate(&code))
}

/// Maps a database error into the stock operation taxonomy.
pub(crate) fn inventory_db_error(err: DbErr) -> InventoryError {
    if is_conflict(&err) {
        InventoryError::ConcurrencyConflict
    } else {
        InventoryError::Database(err.to_string())
    }
}
