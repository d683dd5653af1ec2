//! Catalog item payload for `/CreateUpdateProduct`.

use serde::{Deserialize, Serialize};

/// A catalog entry as the marketplace expects it.
///
/// The service accepts an array of these; the dispatcher always sends a
/// single-element array per request. `attributes`, `categories`, `images`
/// and `skus` are free-form JSON as the service schema varies per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Seller-side identifier, the upsert key on the remote side.
    pub external_id: String,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Tax classification code.
    pub tax_code: String,
    /// Category-specific attribute object.
    pub attributes: serde_json::Value,
    /// Brand name.
    pub brand: String,
    /// Category path entries.
    pub categories: serde_json::Value,
    /// Media references. An item with no images is not publishable.
    pub images: Vec<String>,
    /// SKU variants.
    pub skus: serde_json::Value,
}

impl CatalogItem {
    /// Returns true if the item carries at least one media reference.
    ///
    /// Items without images are rejected by the service, so the dispatcher
    /// holds them back until media arrives.
    pub fn has_media(&self) -> bool {
        !self.images.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(images: Vec<String>) -> CatalogItem {
        CatalogItem {
            external_id: "P-100".into(),
            name: "Kettle".into(),
            description: "Steel kettle".into(),
            tax_code: "VAT20".into(),
            attributes: json!({"color": "silver"}),
            brand: "Acme".into(),
            categories: json!(["kitchen"]),
            images,
            skus: json!([{"sku": "P-100-1"}]),
        }
    }

    #[test]
    fn media_check() {
        assert!(!item(vec![]).has_media());
        assert!(item(vec!["https://cdn.example/p100.jpg".into()]).has_media());
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(item(vec!["u".into()])).unwrap();
        assert!(value.get("externalId").is_some());
        assert!(value.get("taxCode").is_some());
        assert!(value.get("external_id").is_none());
    }
}
