//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into business operations.
//! - Own business-rule enforcement and the error taxonomy.

pub mod bank_service;
