//! Domain model for ledger accounts.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every account is identified by a stable `AccountNumber`.
//! - In-memory values are transient snapshots; storage is the source of truth.

pub mod account;
