//! Unit-of-work helper for multi-statement operations.
//!
//! # Responsibility
//! - Scope a sequence of storage calls to one transaction handle.
//! - Commit on success, roll back on any error.
//!
//! # Invariants
//! - The handle is released on every exit path; an early return or error
//!   rolls back through the transaction guard's drop.

use super::DbError;
use rusqlite::{Connection, Transaction};

/// Runs `op` inside one transaction, committing on `Ok` and rolling back on
/// `Err`.
///
/// `Transaction` dereferences to `Connection`, so repository and service
/// calls inside `op` take the transaction-scoped handle unchanged.
pub fn run_in_transaction<T, E, F>(conn: &mut Connection, op: F) -> Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&Transaction<'_>) -> Result<T, E>,
{
    let tx = conn.transaction().map_err(DbError::from)?;
    let value = op(&tx)?;
    tx.commit().map_err(DbError::from)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::run_in_transaction;
    use crate::db::{open_db_in_memory, DbError};

    #[test]
    fn commit_persists_writes() {
        let mut conn = open_db_in_memory().unwrap();

        run_in_transaction(&mut conn, |tx| -> Result<(), DbError> {
            tx.execute(
                "INSERT INTO accounts (account_number, name, balance) VALUES (1, 'a', 10);",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn error_rolls_back_all_writes() {
        let mut conn = open_db_in_memory().unwrap();

        let result = run_in_transaction(&mut conn, |tx| -> Result<(), DbError> {
            tx.execute(
                "INSERT INTO accounts (account_number, name, balance) VALUES (1, 'a', 10);",
                [],
            )?;
            Err(DbError::PoolClosed)
        });
        assert!(result.is_err());

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
