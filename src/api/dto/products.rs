/*
 * Responsibility
 * - Products の request/response DTO
 * - validate() で形式チェック (必須 / price >= 500)。sku の重複チェックは repo を見る handler 側
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::api::dto::field_message;
use crate::repos::product_repo::{ProductFields, ProductRow};

pub const MIN_PRICE: i64 = 500;

/// Body of both create and update. Missing fields are reported by `validate`.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<i64>,
}

impl ProductRequest {
    /// Field name -> message, at most one message per field.
    pub fn validate(&self) -> BTreeMap<String, String> {
        let mut errors = BTreeMap::new();
        let mut reject = |field: &str, message: &str| {
            errors.insert(field.to_string(), field_message(field, message));
        };

        if self.sku.trim().is_empty() {
            reject("sku", "es requerido!");
        }
        if self.name.trim().is_empty() {
            reject("name", "es requerido!");
        }
        if self.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
            reject("description", "es requerido, por favor");
        }
        match self.price {
            None => reject("price", "no puede ser nulo, ok!"),
            Some(price) if price < MIN_PRICE => {
                reject("price", "debe ser un valor numerico mayor o igual que 500!")
            }
            Some(_) => {}
        }

        errors
    }

    /// Call after `validate` returned no errors.
    pub fn into_fields(self) -> ProductFields {
        ProductFields {
            sku: self.sku.trim().to_string(),
            name: self.name,
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or(MIN_PRICE),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

impl From<ProductRow> for ProductResponse {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            sku: row.sku,
            name: row.name,
            description: row.description,
            price: row.price,
        }
    }
}
