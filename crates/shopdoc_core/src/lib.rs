//! Versioned document collections for products and orders.
//!
//! Mutations are guarded by optimistic concurrency control: every document
//! carries a `version`, and an update only lands when the caller's version
//! still matches the stored one. Products are soft-deleted, orders are
//! hard-deleted.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{DeletePolicy, Document, EntityId, ValidationError};
pub use model::order::{Order, OrderItem};
pub use model::product::Product;
pub use repo::versioned_repo::{OrderRepository, ProductRepository, VersionedRepository};
pub use repo::{RepoError, RepoResult};
pub use service::mutation_service::{MutationService, OrderService, ProductService};
pub use service::{ServiceError, ServiceResult};
pub use store::{
    DocumentFilter, DocumentFlag, DocumentStore, PageRequest, PagingError, SqliteOrderStore,
    SqliteProductStore, StoreError, StoreResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
