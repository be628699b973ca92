use super::product::{Product, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Units in stock. Unsigned, so a stored quantity can never be negative.
pub type Quantity = u32;

/// One inventory row as stored by the backend. Created lazily on first write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: Quantity,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload keyed by `product_id`, in the backend's column names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryUpsert {
    pub product_id: ProductId,
    #[serde(rename = "cantidad")]
    pub quantity: Quantity,
    pub updated_at: DateTime<Utc>,
}

impl InventoryUpsert {
    pub fn new(product_id: ProductId, quantity: Quantity, updated_at: DateTime<Utc>) -> Self {
        Self {
            product_id,
            quantity,
            updated_at,
        }
    }
}

impl From<InventoryUpsert> for InventoryRecord {
    fn from(row: InventoryUpsert) -> Self {
        Self {
            product_id: row.product_id,
            quantity: row.quantity,
            updated_at: row.updated_at,
        }
    }
}

/// A rendered row of the inventory page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    pub product_id: ProductId,
    pub title: Option<String>,
    pub color: Option<String>,
    /// The value currently shown in the input: the pending edit if any, else the baseline.
    pub quantity: Quantity,
    /// Whether the row has an unsaved edit.
    pub dirty: bool,
}

/// Joins products with inventory on the client side; products without a record get 0.
pub fn join_quantities(
    products: &[Product],
    records: &[InventoryRecord],
) -> Vec<(ProductId, Quantity)> {
    let stock: HashMap<ProductId, Quantity> = records
        .iter()
        .map(|r| (r.product_id, r.quantity))
        .collect();
    products
        .iter()
        .map(|p| (p.id, stock.get(&p.id).copied().unwrap_or(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_uses_backend_column_names() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let row = InventoryUpsert::new(ProductId(3), 5, at);

        let json = serde_json::to_value(&row).unwrap();

        assert_eq!(json["product_id"], 3);
        assert_eq!(json["cantidad"], 5);
        assert_eq!(json["updated_at"], "2024-05-01T10:00:00Z");
        assert!(json.get("quantity").is_none());
    }

    #[test]
    fn test_join_defaults_missing_to_zero() {
        let products = vec![Product::new(1, "Mug"), Product::new(2, "Cap")];
        let records = vec![InventoryRecord {
            product_id: ProductId(2),
            quantity: 7,
            updated_at: Utc::now(),
        }];

        let joined = join_quantities(&products, &records);

        assert_eq!(joined, vec![(ProductId(1), 0), (ProductId(2), 7)]);
    }
}
