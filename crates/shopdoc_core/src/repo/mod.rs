//! Concurrency-controlled repositories.
//!
//! # Responsibility
//! - Enforce the optimistic-lock protocol on top of a `DocumentStore`.
//! - Apply per-kind listing and delete policy (soft for products, hard for
//!   orders).
//!
//! # Invariants
//! - Write paths call `Document::validate()` before any store mutation.
//! - `NotFound` and `VersionConflict` are told apart by an existence check
//!   that precedes the conditional update.

use crate::model::entity::{EntityId, ValidationError};
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod versioned_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Semantic repository errors plus store transport failures.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    NotFound(EntityId),
    /// The stored version no longer equals the one the caller sent.
    VersionConflict { id: EntityId, version: u64 },
    Store(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
            Self::VersionConflict { id, version } => write!(
                f,
                "document {id} has been modified since version {version}"
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) => None,
            Self::VersionConflict { .. } => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::UnresolvedReference(id) => {
                Self::Validation(ValidationError::UnresolvedReference(id))
            }
            other => Self::Store(other),
        }
    }
}
