//! Product use cases on top of an injected [`ProductStore`].

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use catalog_core::{DomainError, DomainResult, Page, PageRequest, ProductId};

use crate::product::{CreateProduct, Product, ProductType, ProductVariant, UpdateProduct};
use crate::store::ProductStore;

const NOT_FOUND: &str = "product not found";

/// Product service.
///
/// Owns entity construction and the variant rules; trusts the caller for
/// field-level checks (lengths, sanitising) done at the boundary.
#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: CreateProduct) -> DomainResult<Product> {
        let variant =
            ProductVariant::from_parts(req.product_type, req.digital, req.physical, req.subscription)?;
        let product = Product::new(
            ProductId::new(),
            req.name,
            req.description,
            req.price,
            variant,
            Utc::now(),
        );

        let stored = self.store.create(&product).await?;
        info!(product_id = %stored.id_typed(), product_type = %stored.product_type(), "product created");
        Ok(stored)
    }

    pub async fn get(&self, id: ProductId) -> DomainResult<Product> {
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND))
    }

    pub async fn update(&self, id: ProductId, req: UpdateProduct) -> DomainResult<Product> {
        let existing = self.get(id).await?;

        let changes = req.changes_for(existing.product_type())?;
        if changes.is_empty() {
            return Err(DomainError::bad_request("no fields to update"));
        }

        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| DomainError::not_found(NOT_FOUND))?;
        info!(product_id = %id, fields = changes.len(), "product updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: ProductId) -> DomainResult<()> {
        self.get(id).await?;

        if !self.store.delete(id).await? {
            return Err(DomainError::not_found(NOT_FOUND));
        }
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    pub async fn list(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> DomainResult<Page<Product>> {
        Ok(self.store.page(filter, request).await?)
    }
}

impl core::fmt::Debug for ProductService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductService").finish_non_exhaustive()
    }
}
