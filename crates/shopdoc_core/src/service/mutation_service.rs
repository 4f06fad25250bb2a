//! Document mutation service.
//!
//! # Responsibility
//! - Provide the five request-level entry points per document kind.
//! - Emit one `event=<kind>_<op>` log line per mutation outcome.

use super::{ServiceError, ServiceResult};
use crate::model::entity::Document;
use crate::model::order::Order;
use crate::model::product::Product;
use crate::repo::versioned_repo::VersionedRepository;
use crate::store::{DocumentStore, PageRequest};
use log::{debug, error, info, warn};
use std::time::Instant;

/// Use-case service over one document kind.
pub struct MutationService<D: Document, S: DocumentStore<D>> {
    repo: VersionedRepository<D, S>,
}

pub type ProductService<S> = MutationService<Product, S>;
pub type OrderService<S> = MutationService<Order, S>;

impl<D: Document, S: DocumentStore<D>> MutationService<D, S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self {
            repo: VersionedRepository::new(store),
        }
    }

    /// Lists one page.
    ///
    /// Fails with `InvalidPaging` before touching the store when either
    /// parameter is missing or negative.
    pub fn list(&self, page_number: Option<i64>, page_size: Option<i64>) -> ServiceResult<Vec<D>> {
        let page = PageRequest::from_params(page_number, page_size).map_err(|err| {
            debug!(
                "event={}_list module=service status=rejected error_code=invalid_paging",
                D::KIND
            );
            ServiceError::from(err)
        })?;
        Ok(self.repo.list(&page)?)
    }

    /// Loads one document by id, including soft-deleted ones.
    pub fn get_by_id(&self, id: &str) -> ServiceResult<D> {
        self.repo
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Creates a document; the result carries its new id and version 0.
    pub fn create(&self, doc: &D) -> ServiceResult<D> {
        let created = self.repo.create(doc).map_err(|err| {
            let err = ServiceError::from(err);
            log_failure(D::KIND, "create", doc.id(), &err);
            err
        })?;
        info!(
            "event={}_create module=service status=ok id={} version=0",
            D::KIND,
            created.id().unwrap_or_default()
        );
        Ok(created)
    }

    /// Applies an update conditioned on `doc.version`.
    ///
    /// # Errors
    /// - `NotFound` when `doc.id` is unknown.
    /// - `VersionConflict` when `doc.version` is stale.
    /// - `ValidationFailure` when id/version are absent or fields invalid.
    pub fn update(&self, doc: &D) -> ServiceResult<D> {
        let started_at = Instant::now();
        let updated = self.repo.update(doc).map_err(|err| {
            let err = ServiceError::from(err);
            log_failure(D::KIND, "update", doc.id(), &err);
            err
        })?;
        info!(
            "event={}_update module=service status=ok id={} version={} duration_ms={}",
            D::KIND,
            updated.id().unwrap_or_default(),
            updated.version().unwrap_or_default(),
            started_at.elapsed().as_millis()
        );
        Ok(updated)
    }

    /// Deletes per kind policy. Unknown ids are not an error.
    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        self.repo.delete(id).map_err(|err| {
            let err = ServiceError::from(err);
            log_failure(D::KIND, "delete", Some(id), &err);
            err
        })?;
        info!("event={}_delete module=service status=ok id={id}", D::KIND);
        Ok(())
    }
}

fn log_failure(kind: &str, op: &str, id: Option<&str>, err: &ServiceError) {
    let id = id.unwrap_or("-");
    match err {
        ServiceError::VersionConflict { version, .. } => warn!(
            "event={kind}_{op} module=service status=conflict id={id} version={version}"
        ),
        ServiceError::Store(store_err) => error!(
            "event={kind}_{op} module=service status=error id={id} error_code={} error={store_err}",
            err.code()
        ),
        _ => debug!(
            "event={kind}_{op} module=service status=rejected id={id} error_code={}",
            err.code()
        ),
    }
}
