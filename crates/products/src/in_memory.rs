//! In-memory product store for tests/dev.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use catalog_core::{Page, PageRequest, ProductId, StoreError};

use crate::product::{Product, ProductChange, ProductType};
use crate::store::ProductStore;

/// Products kept in a `HashMap` behind an `RwLock`.
///
/// Listing orders by creation time, then id. `page` answers items and total
/// under one read lock, so the two always agree.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Synchronous existence check, usable as a plan store's product check.
    pub fn contains(&self, id: ProductId) -> bool {
        self.products
            .read()
            .map(|products| products.contains_key(&id))
            .unwrap_or(false)
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("product store lock poisoned".to_string())
    }

    fn matching(products: &HashMap<ProductId, Product>, filter: Option<ProductType>) -> Vec<&Product> {
        let mut items: Vec<&Product> = products
            .values()
            .filter(|p| filter.is_none_or(|t| p.product_type() == t))
            .collect();
        items.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id_typed().as_uuid().cmp(b.id_typed().as_uuid()))
        });
        items
    }

    fn slice(items: Vec<&Product>, request: PageRequest) -> Vec<Product> {
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).cloned().collect()
    }
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: &Product) -> Result<Product, StoreError> {
        let mut products = self.products.write().map_err(|_| Self::poisoned())?;
        if products.contains_key(&product.id_typed()) {
            return Err(StoreError::Database(format!(
                "duplicate product id {}",
                product.id_typed()
            )));
        }
        products.insert(product.id_typed(), product.clone());
        Ok(product.clone())
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let products = self.products.read().map_err(|_| Self::poisoned())?;
        Ok(products.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(|_| Self::poisoned())?;
        Ok(Self::slice(Self::matching(&products, filter), request))
    }

    async fn count(&self, filter: Option<ProductType>) -> Result<u64, StoreError> {
        let products = self.products.read().map_err(|_| Self::poisoned())?;
        Ok(Self::matching(&products, filter).len() as u64)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: &[ProductChange],
    ) -> Result<Option<Product>, StoreError> {
        let mut products = self.products.write().map_err(|_| Self::poisoned())?;
        let Some(product) = products.get_mut(&id) else {
            return Ok(None);
        };
        for change in changes {
            product.apply(change);
        }
        let updated = product.clone().with_updated_at(Utc::now());
        *product = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut products = self.products.write().map_err(|_| Self::poisoned())?;
        Ok(products.remove(&id).is_some())
    }

    async fn page(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        let products = self.products.read().map_err(|_| Self::poisoned())?;
        let matching = Self::matching(&products, filter);
        let total = matching.len() as u64;
        Ok(Page::new(Self::slice(matching, request), total, request))
    }
}
