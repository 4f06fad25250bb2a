//! Use-case services consumed by the request layer.
//!
//! # Responsibility
//! - Orchestrate repository calls into list/get/create/update/delete.
//! - Collapse every failure into the stable `ServiceError` taxonomy.
//!
//! # Invariants
//! - Paging input is validated before any store access.
//! - Nothing is retried here; only the caller can decide to re-read and
//!   re-apply after a `VersionConflict`.

use crate::model::entity::{EntityId, ValidationError};
use crate::repo::RepoError;
use crate::store::{PagingError, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod mutation_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the request layer.
#[derive(Debug)]
pub enum ServiceError {
    /// Document absent (or absent for this operation).
    NotFound(EntityId),
    /// Optimistic lock failure; the caller's `version` is stale.
    VersionConflict { id: EntityId, version: u64 },
    /// `pageNumber`/`pageSize` missing or negative.
    InvalidPaging(PagingError),
    /// Field constraint violated.
    ValidationFailure(ValidationError),
    /// Storage failure outside the taxonomy above.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "not found: {id}"),
            Self::VersionConflict { id, version } => write!(
                f,
                "{id} has been modified meanwhile (stale version {version})"
            ),
            Self::InvalidPaging(err) => write!(f, "invalid paging: {err}"),
            Self::ValidationFailure(err) => write!(f, "validation failed: {err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidPaging(err) => Some(err),
            Self::ValidationFailure(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::NotFound(_) | Self::VersionConflict { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::ValidationFailure(err),
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::VersionConflict { id, version } => Self::VersionConflict { id, version },
            RepoError::Store(err) => Self::Store(err),
        }
    }
}

impl From<PagingError> for ServiceError {
    fn from(value: PagingError) -> Self {
        Self::InvalidPaging(value)
    }
}

impl ServiceError {
    /// Short stable code for log lines and outer layers.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::VersionConflict { .. } => "version_conflict",
            Self::InvalidPaging(_) => "invalid_paging",
            Self::ValidationFailure(_) => "validation_failure",
            Self::Store(_) => "store_error",
        }
    }
}
