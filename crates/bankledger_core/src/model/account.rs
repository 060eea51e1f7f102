//! Account domain model.
//!
//! # Responsibility
//! - Define the canonical account record persisted by the ledger.
//! - Provide the withdrawal eligibility predicate used by business checks.
//!
//! # Invariants
//! - `number` is unique and immutable once the row is created.
//! - `balance` is expressed in the smallest currency unit; the service layer
//!   never commits a transaction that leaves it negative.

use serde::{Deserialize, Serialize};

/// Stable identifier for an account row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type AccountNumber = i64;

/// Canonical account record.
///
/// This is a transient snapshot of one storage row. It is re-read per
/// operation and never cached across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique account number, the storage primary key.
    #[serde(rename = "account_number")]
    pub number: AccountNumber,
    /// Display name.
    pub name: String,
    /// Current balance in the smallest currency unit.
    pub balance: i64,
}

impl Account {
    /// Creates an account snapshot from its three row fields.
    pub fn new(number: AccountNumber, name: impl Into<String>, balance: i64) -> Self {
        Self {
            number,
            name: name.into(),
            balance,
        }
    }

    /// Returns whether `amount` could be withdrawn from this snapshot.
    ///
    /// # Contract
    /// - `amount` must be strictly positive.
    /// - `amount` must not exceed the snapshot balance.
    pub fn can_withdraw(&self, amount: i64) -> bool {
        amount > 0 && amount <= self.balance
    }
}
