//! Shared contract for versioned documents.
//!
//! # Responsibility
//! - Describe what the store/repository layers need from any document kind.
//! - Define the validation error taxonomy shared by products and orders.
//!
//! # Invariants
//! - `id` is assigned by the store on insert and never changes afterwards.
//! - `version` starts at 0 and grows by exactly 1 per accepted update.
//! - `removed` is only ever written by the flag patch path.

use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque store-assigned document identifier.
pub type EntityId = String;

/// How a document kind is destroyed by `delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletePolicy {
    /// Flip the `removed` flag; the record stays readable by id.
    Soft,
    /// Physically remove the record.
    Hard,
}

/// Field constraint violations detected before any store mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty or whitespace only.
    BlankField(&'static str),
    /// Product price is below zero.
    NegativePrice(Decimal),
    /// Create was called with a caller-chosen id.
    IdOnCreate(EntityId),
    /// Update was called without an id.
    MissingId,
    /// Update was called without the version it was based on.
    MissingVersion,
    /// Order item at `position` does not carry a product id.
    MissingProductReference { position: usize },
    /// Order item points at a product id the store does not know.
    UnresolvedReference(EntityId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::NegativePrice(price) => write!(f, "price must be >= 0, got {price}"),
            Self::IdOnCreate(id) => write!(f, "id must not be set on create, got `{id}`"),
            Self::MissingId => write!(f, "id is required for update"),
            Self::MissingVersion => write!(f, "version is required for update"),
            Self::MissingProductReference { position } => {
                write!(f, "order item #{position} has no product id")
            }
            Self::UnresolvedReference(id) => write!(f, "referenced product not found: {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Common surface of every versioned document kind.
pub trait Document: Clone {
    /// Lowercase kind name used in log events and error messages.
    const KIND: &'static str;
    /// Delete semantics applied by the repository.
    const DELETE_POLICY: DeletePolicy;

    fn id(&self) -> Option<&str>;
    fn version(&self) -> Option<u64>;
    fn is_removed(&self) -> bool;

    /// Checks field constraints of this kind.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Returns the `(id, version)` pair an update is conditioned on.
    fn update_key(&self) -> Result<(&str, u64), ValidationError> {
        let id = self.id().ok_or(ValidationError::MissingId)?;
        let version = self.version().ok_or(ValidationError::MissingVersion)?;
        Ok((id, version))
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
