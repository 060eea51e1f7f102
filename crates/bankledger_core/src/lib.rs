//! Core domain logic for the bankledger banking ledger.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::pool::{ConnectionPool, PoolConfig, PooledConnection};
pub use db::tx::run_in_transaction;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::account::{Account, AccountNumber};
pub use repo::account_repo::{AccountRepository, SqliteAccountRepository};
pub use service::bank_service::{BankError, BankResult, BankService, TransferLeg};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
