use rust_decimal::Decimal;
use shopdoc_core::{Order, Product};

#[test]
fn product_serialization_hides_removed_flag() {
    let mut product = Product::new("VW", "Beetle", Decimal::new(10099999, 2));
    product.id = Some("p-1".to_string());
    product.version = Some(3);
    product.removed = true;

    let json = serde_json::to_value(&product).unwrap();
    assert_eq!(json["id"], "p-1");
    assert_eq!(json["version"], 3);
    assert_eq!(json["brand"], "VW");
    assert_eq!(json["price"], "100999.99");
    assert!(json.get("removed").is_none());
}

#[test]
fn unsaved_product_omits_identity_fields() {
    let product = Product::new("VW", "Beetle", Decimal::ONE);

    let json = serde_json::to_value(&product).unwrap();
    assert!(json.get("id").is_none());
    assert!(json.get("version").is_none());
}

#[test]
fn incoming_removed_flag_is_ignored() {
    let value = serde_json::json!({
        "id": "p-1",
        "version": 0,
        "removed": true,
        "brand": "VW",
        "name": "Beetle",
        "price": "999"
    });

    let product: Product = serde_json::from_value(value).unwrap();
    assert!(!product.removed);
    assert_eq!(product.description, None);
    assert_eq!(product.price, Decimal::new(999, 0));
}

#[test]
fn order_uses_camel_case_and_defaults_quantity() {
    let value = serde_json::json!({
        "customerId": "1",
        "items": [
            {
                "product": {
                    "id": "p-1",
                    "version": 0,
                    "brand": "VW",
                    "name": "Beetle",
                    "price": "100999.99"
                }
            }
        ]
    });

    let order: Order = serde_json::from_value(value).unwrap();
    assert_eq!(order.customer_id, "1");
    assert_eq!(order.items.len(), 1);
    assert_eq!(order.items[0].quantity, 1);
    assert_eq!(order.items[0].product_id(), Some("p-1"));

    let json = serde_json::to_value(&order).unwrap();
    assert_eq!(json["customerId"], "1");
    assert!(json.get("customer_id").is_none());
}

#[test]
fn order_without_items_deserializes_to_empty_list() {
    let order: Order = serde_json::from_value(serde_json::json!({ "customerId": "7" })).unwrap();
    assert!(order.items.is_empty());
    assert!(order.id.is_none());
}
