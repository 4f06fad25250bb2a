//! Versioned document model for products and orders.
//!
//! # Responsibility
//! - Define the record shapes persisted by the document stores.
//! - Own field-level validation consumed by repository write paths.
//!
//! # Invariants
//! - `(id, version)` identifies exactly one accepted state of a document.
//! - `removed` is internal bookkeeping and never reaches the wire format.

pub mod entity;
pub mod order;
pub mod product;
