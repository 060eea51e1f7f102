//! Account repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide parameterized CRUD statements over the `accounts` table.
//! - Report mutation outcomes as rows-affected counts.
//!
//! # Invariants
//! - Every operation takes the transaction-scoped handle as first parameter
//!   so multi-statement callers keep one unit of work across calls.
//! - `deposit`/`withdraw` express the balance change server-side
//!   (`balance = balance ± ?`); they do not themselves guard against
//!   negative balances.

use crate::db::DbResult;
use crate::model::account::{Account, AccountNumber};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

const ACCOUNT_SELECT_SQL: &str = "SELECT account_number, name, balance FROM accounts";

/// Storage gateway for account rows.
///
/// Implementations return the fatal `DbError` for statement failures;
/// business rules live one layer up in the service.
pub trait AccountRepository {
    /// Returns the matching row, or `None` when absent.
    fn find_by_number(&self, conn: &Connection, number: AccountNumber)
        -> DbResult<Option<Account>>;
    /// Inserts a new row. The caller guarantees the number is unused; a
    /// duplicate key surfaces as a storage error, not a business outcome.
    fn save(&self, conn: &Connection, account: &Account) -> DbResult<usize>;
    /// Existence probe; 0 or 1 since the number is a unique key.
    fn count_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<i64>;
    /// Increments balance by `amount` in a single statement.
    fn deposit(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize>;
    /// Decrements balance by `amount` in a single statement.
    fn withdraw(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize>;
    /// Removes the row for `number`.
    fn delete_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<usize>;
}

/// SQLite-backed account repository.
pub struct SqliteAccountRepository;

impl AccountRepository for SqliteAccountRepository {
    fn find_by_number(
        &self,
        conn: &Connection,
        number: AccountNumber,
    ) -> DbResult<Option<Account>> {
        let mut stmt = conn.prepare(&format!("{ACCOUNT_SELECT_SQL} WHERE account_number = ?1;"))?;
        let account = stmt
            .query_row(params![number], parse_account_row)
            .optional()?;
        Ok(account)
    }

    fn save(&self, conn: &Connection, account: &Account) -> DbResult<usize> {
        let changed = conn.execute(
            "INSERT INTO accounts (account_number, name, balance) VALUES (?1, ?2, ?3);",
            params![account.number, account.name.as_str(), account.balance],
        )?;
        debug!(
            "event=account_save module=repo number={} rows={changed}",
            account.number
        );
        Ok(changed)
    }

    fn count_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM accounts WHERE account_number = ?1;",
            params![number],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn deposit(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize> {
        let changed = conn.execute(
            "UPDATE accounts SET balance = balance + ?1 WHERE account_number = ?2;",
            params![amount, number],
        )?;
        debug!("event=account_deposit module=repo number={number} rows={changed}");
        Ok(changed)
    }

    fn withdraw(&self, conn: &Connection, number: AccountNumber, amount: i64) -> DbResult<usize> {
        let changed = conn.execute(
            "UPDATE accounts SET balance = balance - ?1 WHERE account_number = ?2;",
            params![amount, number],
        )?;
        debug!("event=account_withdraw module=repo number={number} rows={changed}");
        Ok(changed)
    }

    fn delete_by_number(&self, conn: &Connection, number: AccountNumber) -> DbResult<usize> {
        let changed = conn.execute(
            "DELETE FROM accounts WHERE account_number = ?1;",
            params![number],
        )?;
        debug!("event=account_delete module=repo number={number} rows={changed}");
        Ok(changed)
    }
}

fn parse_account_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        number: row.get("account_number")?,
        name: row.get("name")?,
        balance: row.get("balance")?,
    })
}
