//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for the accounts table.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Absence of a row is a valid non-error result, never a storage error.
//! - Balance mutations are single server-side statements; no
//!   read-modify-write cycles at this layer.

pub mod account_repo;
