//! Product document.

use super::entity::{require_text, DeletePolicy, Document, EntityId, ValidationError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog product. Soft-deleted via the `removed` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// `None` until the store assigns one on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Optimistic lock token. `None` until first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip)]
    pub removed: bool,
    pub brand: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
}

impl Product {
    /// Creates an unsaved product without description.
    pub fn new(brand: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: None,
            version: None,
            removed: false,
            brand: brand.into(),
            name: name.into(),
            description: None,
            price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Document for Product {
    const KIND: &'static str = "product";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Soft;

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn version(&self) -> Option<u64> {
        self.version
    }

    fn is_removed(&self) -> bool {
        self.removed
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text("brand", &self.brand)?;
        require_text("name", &self.name)?;
        if self.price < Decimal::ZERO {
            return Err(ValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}
