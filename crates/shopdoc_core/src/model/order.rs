//! Order document and its product-referencing line items.

use super::entity::{require_text, DeletePolicy, Document, EntityId, ValidationError};
use super::product::Product;
use serde::{Deserialize, Serialize};

/// Customer order. Hard-deleted; never soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(skip)]
    pub removed: bool,
    pub customer_id: String,
    /// Order and duplicates are significant.
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

/// One order line.
///
/// Only `product.id` is persisted; the rest of `product` is re-read from the
/// products collection every time the order is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub product: Product,
}

fn default_quantity() -> u32 {
    1
}

impl Order {
    /// Creates an unsaved order with no items.
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            id: None,
            version: None,
            removed: false,
            customer_id: customer_id.into(),
            items: Vec::new(),
        }
    }

    /// Appends one line referencing `product`.
    pub fn push_item(&mut self, product: Product, quantity: u32) {
        self.items.push(OrderItem { quantity, product });
    }
}

impl OrderItem {
    pub fn new(product: Product) -> Self {
        Self {
            quantity: default_quantity(),
            product,
        }
    }

    /// Referenced product id, if the embedded product was ever persisted.
    pub fn product_id(&self) -> Option<&str> {
        self.product.id.as_deref()
    }
}

impl Document for Order {
    const KIND: &'static str = "order";
    const DELETE_POLICY: DeletePolicy = DeletePolicy::Hard;

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
        require_text("customerId", &self.customer_id)?;
        for (position, item) in self.items.iter().enumerate() {
            match item.product_id() {
                Some(id) if !id.trim().is_empty() => {}
                _ => return Err(ValidationError::MissingProductReference { position }),
            }
        }
        Ok(())
    }
}
