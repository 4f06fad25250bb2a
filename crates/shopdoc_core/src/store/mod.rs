//! Document store adapter contracts.
//!
//! # Responsibility
//! - Define the narrow store surface the repositories are written against.
//! - Keep SQL details inside the SQLite implementations.
//!
//! # Invariants
//! - `conditional_update` is one indivisible compare-and-increment inside
//!   the store. Callers never emulate it with a read followed by a write.
//! - `patch_flag` never touches `version`.
//! - `find_page` returns documents in stable insertion order.

use crate::db::DbError;
use crate::model::entity::{Document, EntityId};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod order_store;
mod page;
mod product_store;
mod sqlite;

pub use order_store::SqliteOrderStore;
pub use page::{PageRequest, PagingError};
pub use product_store::SqliteProductStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store adapters.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A keyed write was attempted without `id` or `version`.
    MissingKey(&'static str),
    /// A written link points at a product id that does not exist.
    UnresolvedReference(EntityId),
    /// Persisted data cannot be converted to a valid document.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "document store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "document store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "document store requires column `{column}` in table `{table}`"
            ),
            Self::MissingKey(field) => write!(f, "conditional write requires `{field}`"),
            Self::UnresolvedReference(id) => write!(f, "referenced product not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Boolean document flags that can be patched without a version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFlag {
    Removed,
}

impl DocumentFlag {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Removed => "removed",
        }
    }
}

/// Equality filter applied by `find_page`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentFilter {
    /// `Some(v)` keeps only documents whose `removed` flag equals `v`.
    pub removed: Option<bool>,
}

impl DocumentFilter {
    /// Matches every document.
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches documents that were not soft-deleted.
    pub fn active() -> Self {
        Self {
            removed: Some(false),
        }
    }
}

/// Store adapter for one document kind.
pub trait DocumentStore<D: Document> {
    /// Loads one document by id, regardless of its `removed` flag.
    fn get(&self, id: &str) -> StoreResult<Option<D>>;

    /// Persists a new document with `version = 0` and `removed = false`.
    ///
    /// Assigns a fresh id when `doc` carries none.
    fn insert(&self, doc: &D) -> StoreResult<D>;

    /// Atomically applies `doc` iff the stored `(id, version)` pair equals
    /// the one carried by `doc`, bumping the stored version by one.
    ///
    /// Returns `Ok(None)` when no stored document matches the pair; the
    /// store does not say whether the id or the version was the mismatch.
    fn conditional_update(&self, doc: &D) -> StoreResult<Option<D>>;

    /// Loads one page of documents matching `filter`, in insertion order.
    fn find_page(&self, filter: &DocumentFilter, page: &PageRequest) -> StoreResult<Vec<D>>;

    /// Sets one boolean flag unconditionally. Returns whether a row matched.
    fn patch_flag(&self, id: &str, flag: DocumentFlag, value: bool) -> StoreResult<bool>;

    /// Physically removes one document. Unknown ids are a no-op.
    fn delete(&self, id: &str) -> StoreResult<()>;
}
