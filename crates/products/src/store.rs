//! Persistence contract for products.

use catalog_core::{Page, PageRequest, ProductId, StoreError};

use crate::product::{Product, ProductChange, ProductType};

/// Storage collaborator for products.
///
/// A missing row is reported through `Option`/`bool`, never as an error.
#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    /// Persist a new product and return it as stored.
    async fn create(&self, product: &Product) -> Result<Product, StoreError>;

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// One page of products, optionally restricted to one type, in
    /// storage-defined order.
    async fn list(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Vec<Product>, StoreError>;

    /// Number of products matching `filter`, ignoring pagination.
    async fn count(&self, filter: Option<ProductType>) -> Result<u64, StoreError>;

    /// Apply `changes` and return the refreshed product (`None` if it is gone).
    async fn update(
        &self,
        id: ProductId,
        changes: &[ProductChange],
    ) -> Result<Option<Product>, StoreError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;

    /// Page of results plus total.
    ///
    /// The default issues `list` and `count` as two independent calls, so the
    /// total may disagree with the page under concurrent writes. Backends
    /// that can answer both from one snapshot should override this.
    async fn page(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        let items = self.list(filter, request).await?;
        let total = self.count(filter).await?;
        Ok(Page::new(items, total, request))
    }
}
