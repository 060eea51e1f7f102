//! Banking use-case service.
//!
//! # Responsibility
//! - Orchestrate existence checks, balance checks and balance mutations over
//!   the account repository.
//! - Map outcomes onto the business/fatal error taxonomy.
//!
//! # Invariants
//! - No persistent in-process state; balances are re-read from storage on
//!   every operation.
//! - Multi-statement operations (transfer) never commit or roll back
//!   themselves; the caller owns the transaction boundary.
//! - A committed operation never leaves any balance negative.

use crate::db::DbError;
use crate::model::account::{Account, AccountNumber};
use crate::repo::account_repo::AccountRepository;
use log::debug;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type BankResult<T> = Result<T, BankError>;

/// Transfer half that reported an unexpected zero-row update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferLeg {
    Withdraw,
    Deposit,
}

impl Display for TransferLeg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Withdraw => write!(f, "withdraw"),
            Self::Deposit => write!(f, "deposit"),
        }
    }
}

/// Errors raised by banking operations.
///
/// Business variants are expected outcomes a caller branches on. The
/// remaining variants are fatal: the caller must roll back the open unit of
/// work and must not retry.
#[derive(Debug)]
pub enum BankError {
    /// Operation targeted a nonexistent account.
    AccountNotFound(AccountNumber),
    /// Creation attempted with a number that already exists.
    AccountAlreadyExists(AccountNumber),
    /// Withdrawal amount is non-positive or exceeds the current balance.
    /// The two cases are deliberately merged into one kind.
    BalanceNotEnough(AccountNumber),
    /// A transfer leg affected zero rows after all prior checks passed;
    /// signals a race or unexpected storage state.
    TransferIntegrity {
        account: AccountNumber,
        leg: TransferLeg,
    },
    /// Delete affected zero rows after the existence check passed.
    DeleteIntegrity(AccountNumber),
    /// Underlying statement failure; never recovered locally.
    Storage(DbError),
}

impl BankError {
    /// Returns whether this is an expected business outcome rather than a
    /// fatal storage/integrity failure.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            Self::AccountNotFound(_) | Self::AccountAlreadyExists(_) | Self::BalanceNotEnough(_)
        )
    }
}

impl Display for BankError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AccountNotFound(number) => write!(f, "account not found: {number}"),
            Self::AccountAlreadyExists(number) => write!(f, "account already exists: {number}"),
            Self::BalanceNotEnough(number) => write!(f, "balance not enough: {number}"),
            Self::TransferIntegrity { account, leg } => {
                write!(f, "transfer {leg} leg affected no rows: account {account}")
            }
            Self::DeleteIntegrity(number) => {
                write!(f, "delete affected no rows: account {number}")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BankError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for BankError {
    fn from(value: DbError) -> Self {
        Self::Storage(value)
    }
}

/// Banking service facade over one account repository.
///
/// Every operation takes the transaction-scoped handle as first parameter;
/// the handle is exclusively owned by one logical operation at a time.
pub struct BankService<R: AccountRepository> {
    repo: R,
}

impl<R: AccountRepository> BankService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Fetches one account snapshot.
    ///
    /// # Errors
    /// - `AccountNotFound` when no row matches `number`.
    pub fn get_account(&self, conn: &Connection, number: AccountNumber) -> BankResult<Account> {
        self.repo
            .find_by_number(conn, number)?
            .ok_or(BankError::AccountNotFound(number))
    }

    /// Creates a new account.
    ///
    /// The existence probe is the documented business-error path; the storage
    /// primary key remains the backstop against concurrent creators.
    ///
    /// # Errors
    /// - `AccountAlreadyExists` when the number is taken.
    pub fn create_account(&self, conn: &Connection, account: &Account) -> BankResult<()> {
        if self.account_exists(conn, account.number)? {
            return Err(BankError::AccountAlreadyExists(account.number));
        }
        self.repo.save(conn, account)?;
        Ok(())
    }

    /// Deposits `amount` into an account.
    ///
    /// # Contract
    /// - `amount <= 0` is a defined no-op returning `Ok(false)`, not an error.
    /// - Returns `Ok(true)` iff the balance update affected a row.
    ///
    /// # Errors
    /// - `AccountNotFound` when no row matches `number`.
    pub fn deposit(
        &self,
        conn: &Connection,
        number: AccountNumber,
        amount: i64,
    ) -> BankResult<bool> {
        if !self.account_exists(conn, number)? {
            return Err(BankError::AccountNotFound(number));
        }
        if amount <= 0 {
            return Ok(false);
        }
        Ok(self.repo.deposit(conn, number, amount)? > 0)
    }

    /// Withdraws `amount` from an account.
    ///
    /// # Errors
    /// - `AccountNotFound` when no row matches `number`.
    /// - `BalanceNotEnough` when `amount <= 0` or the current balance is
    ///   below `amount`.
    pub fn withdraw(
        &self,
        conn: &Connection,
        number: AccountNumber,
        amount: i64,
    ) -> BankResult<bool> {
        if !self.account_exists(conn, number)? {
            return Err(BankError::AccountNotFound(number));
        }
        if amount <= 0 || self.get_account(conn, number)?.balance < amount {
            return Err(BankError::BalanceNotEnough(number));
        }
        Ok(self.repo.withdraw(conn, number, amount)? > 0)
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// Must run inside one caller-owned transaction: on any error the caller
    /// rolls back so money is never destroyed or duplicated. The
    /// withdraw-then-deposit ordering is fixed.
    ///
    /// # Errors
    /// - `AccountNotFound` for whichever side is missing.
    /// - `BalanceNotEnough(from)` when the source snapshot is ineligible.
    /// - `TransferIntegrity` when a leg affects zero rows despite the checks.
    pub fn transfer(
        &self,
        conn: &Connection,
        from: AccountNumber,
        to: AccountNumber,
        amount: i64,
    ) -> BankResult<()> {
        if !self.account_exists(conn, from)? {
            return Err(BankError::AccountNotFound(from));
        }
        if !self.account_exists(conn, to)? {
            return Err(BankError::AccountNotFound(to));
        }

        // Snapshot re-checks: a concurrent deleter can remove either row
        // between the count probe and the update statements.
        let source = self
            .repo
            .find_by_number(conn, from)?
            .ok_or(BankError::AccountNotFound(from))?;
        if self.repo.find_by_number(conn, to)?.is_none() {
            return Err(BankError::AccountNotFound(to));
        }

        if !source.can_withdraw(amount) {
            return Err(BankError::BalanceNotEnough(from));
        }

        if self.repo.withdraw(conn, from, amount)? < 1 {
            return Err(BankError::TransferIntegrity {
                account: from,
                leg: TransferLeg::Withdraw,
            });
        }
        if self.repo.deposit(conn, to, amount)? < 1 {
            return Err(BankError::TransferIntegrity {
                account: to,
                leg: TransferLeg::Deposit,
            });
        }

        debug!("event=transfer module=service status=ok from={from} to={to} amount={amount}");
        Ok(())
    }

    /// Returns whether an account row exists for `number`.
    pub fn account_exists(&self, conn: &Connection, number: AccountNumber) -> BankResult<bool> {
        Ok(self.repo.count_by_number(conn, number)? > 0)
    }

    /// Removes an account.
    ///
    /// # Errors
    /// - `AccountNotFound` when no row matches `number`.
    /// - `DeleteIntegrity` when the delete affects zero rows after the
    ///   existence check passed (concurrent deleter).
    pub fn drop_account(&self, conn: &Connection, number: AccountNumber) -> BankResult<()> {
        if !self.account_exists(conn, number)? {
            return Err(BankError::AccountNotFound(number));
        }
        if self.repo.delete_by_number(conn, number)? == 0 {
            return Err(BankError::DeleteIntegrity(number));
        }
        Ok(())
    }
}
