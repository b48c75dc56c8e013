/*
 * Responsibility
 * - products の保存 (プロセス内メモリ)
 * - list / get / create / update / delete / exists_by_sku
 * - id は 1 から採番。削除済みの id は再利用しない
 * - sku の一意性は write lock の中で最終確認する (handler 側の事前チェックとの競合対策)
 */
use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// Writable fields of a product.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub price: i64,
}

#[derive(Debug, Default)]
struct Store {
    next_id: i64,
    rows: BTreeMap<i64, ProductRow>,
}

impl Store {
    fn sku_taken(&self, sku: &str, except: Option<i64>) -> bool {
        self.rows
            .values()
            .any(|p| p.sku == sku && Some(p.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct ProductRepo {
    store: RwLock<Store>,
}

impl ProductRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// All products, ordered by id.
    pub async fn list(&self) -> Vec<ProductRow> {
        self.store.read().await.rows.values().cloned().collect()
    }

    pub async fn get(&self, id: i64) -> Option<ProductRow> {
        self.store.read().await.rows.get(&id).cloned()
    }

    /// Whether another product (not `except`) already uses `sku`.
    pub async fn exists_by_sku(&self, sku: &str, except: Option<i64>) -> bool {
        self.store.read().await.sku_taken(sku, except)
    }

    pub async fn create(&self, fields: ProductFields) -> Result<ProductRow, RepoError> {
        let mut store = self.store.write().await;
        if store.sku_taken(&fields.sku, None) {
            return Err(RepoError::Conflict);
        }

        store.next_id += 1;
        let row = ProductRow {
            id: store.next_id,
            sku: fields.sku,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        };
        store.rows.insert(row.id, row.clone());

        Ok(row)
    }

    /// Replace every field of product `id`. `Ok(None)` when it does not exist.
    pub async fn update(
        &self,
        id: i64,
        fields: ProductFields,
    ) -> Result<Option<ProductRow>, RepoError> {
        let mut store = self.store.write().await;
        if !store.rows.contains_key(&id) {
            return Ok(None);
        }
        if store.sku_taken(&fields.sku, Some(id)) {
            return Err(RepoError::Conflict);
        }

        let row = ProductRow {
            id,
            sku: fields.sku,
            name: fields.name,
            description: fields.description,
            price: fields.price,
        };
        store.rows.insert(id, row.clone());

        Ok(Some(row))
    }

    /// Remove product `id`, returning what was deleted.
    pub async fn delete(&self, id: i64) -> Option<ProductRow> {
        self.store.write().await.rows.remove(&id)
    }
}
