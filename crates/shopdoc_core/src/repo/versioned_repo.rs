//! Optimistic-lock repository shared by every document kind.

use super::{RepoError, RepoResult};
use crate::model::entity::{DeletePolicy, Document, ValidationError};
use crate::model::order::Order;
use crate::model::product::Product;
use crate::store::{DocumentFilter, DocumentFlag, DocumentStore, PageRequest};
use log::debug;
use std::marker::PhantomData;

/// Repository over one document kind `D` backed by store `S`.
pub struct VersionedRepository<D: Document, S: DocumentStore<D>> {
    store: S,
    _kind: PhantomData<D>,
}

pub type ProductRepository<S> = VersionedRepository<Product, S>;
pub type OrderRepository<S> = VersionedRepository<Order, S>;

impl<D: Document, S: DocumentStore<D>> VersionedRepository<D, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// Lists one page. Soft-deletable kinds hide removed documents.
    pub fn list(&self, page: &PageRequest) -> RepoResult<Vec<D>> {
        let filter = match D::DELETE_POLICY {
            DeletePolicy::Soft => DocumentFilter::active(),
            DeletePolicy::Hard => DocumentFilter::all(),
        };
        Ok(self.store.find_page(&filter, page)?)
    }

    /// Loads one document by id.
    ///
    /// Removed documents are still returned: lookup by id is the reference
    /// path that order items resolve through.
    pub fn get(&self, id: &str) -> RepoResult<Option<D>> {
        Ok(self.store.get(id)?)
    }

    /// Inserts a new document; the store assigns id and version 0.
    pub fn create(&self, doc: &D) -> RepoResult<D> {
        if let Some(id) = doc.id() {
            return Err(ValidationError::IdOnCreate(id.to_string()).into());
        }
        doc.validate()?;
        Ok(self.store.insert(doc)?)
    }

    /// Applies `doc` iff its version still matches the stored one.
    ///
    /// # Errors
    /// - `NotFound` when no document has `doc.id`.
    /// - `VersionConflict` when the document exists but its stored version
    ///   differs, including when a concurrent update won the race between
    ///   the existence check and the conditional update.
    pub fn update(&self, doc: &D) -> RepoResult<D> {
        let (id, version) = doc.update_key()?;
        doc.validate()?;

        if self.store.get(id)?.is_none() {
            return Err(RepoError::NotFound(id.to_string()));
        }

        self.store
            .conditional_update(doc)?
            .ok_or_else(|| RepoError::VersionConflict {
                id: id.to_string(),
                version,
            })
    }

    /// Deletes per the kind's policy. Unknown ids succeed.
    pub fn delete(&self, id: &str) -> RepoResult<()> {
        match D::DELETE_POLICY {
            DeletePolicy::Soft => self.soft_delete(id),
            DeletePolicy::Hard => self.hard_delete(id),
        }
    }

    fn soft_delete(&self, id: &str) -> RepoResult<()> {
        let matched = self.store.patch_flag(id, DocumentFlag::Removed, true)?;
        if !matched {
            debug!(
                "event={}_soft_delete module=repo status=noop reason=unknown_id",
                D::KIND
            );
        }
        Ok(())
    }

    fn hard_delete(&self, id: &str) -> RepoResult<()> {
        Ok(self.store.delete(id)?)
    }
}
