//! In-memory plan store for tests/dev.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;

use catalog_core::{Page, PageRequest, PlanId, ProductId, StoreError};

use crate::plan::{PlanChange, SubscriptionPlan};
use crate::store::PlanStore;

type ProductCheck = Arc<dyn Fn(ProductId) -> bool + Send + Sync>;

/// Plans kept in a `HashMap` behind an `RwLock`.
///
/// With a product check installed, `create` emulates the storage foreign key
/// and fails with [`StoreError::ForeignKey`] for unknown products.
#[derive(Default)]
pub struct InMemoryPlanStore {
    plans: RwLock<HashMap<PlanId, SubscriptionPlan>>,
    product_exists: Option<ProductCheck>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_product_check(check: impl Fn(ProductId) -> bool + Send + Sync + 'static) -> Self {
        Self {
            plans: RwLock::new(HashMap::new()),
            product_exists: Some(Arc::new(check)),
        }
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("plan store lock poisoned".to_string())
    }

    fn for_product(
        plans: &HashMap<PlanId, SubscriptionPlan>,
        product_id: ProductId,
    ) -> Vec<&SubscriptionPlan> {
        let mut items: Vec<&SubscriptionPlan> = plans
            .values()
            .filter(|p| p.product_id() == product_id)
            .collect();
        items.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id_typed().as_uuid().cmp(b.id_typed().as_uuid()))
        });
        items
    }

    fn slice(items: Vec<&SubscriptionPlan>, request: PageRequest) -> Vec<SubscriptionPlan> {
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).cloned().collect()
    }
}

impl core::fmt::Debug for InMemoryPlanStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InMemoryPlanStore")
            .field("product_check", &self.product_exists.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn create(&self, plan: &SubscriptionPlan) -> Result<SubscriptionPlan, StoreError> {
        if let Some(exists) = &self.product_exists {
            if !exists(plan.product_id()) {
                return Err(StoreError::ForeignKey(format!(
                    "product {} does not exist",
                    plan.product_id()
                )));
            }
        }
        let mut plans = self.plans.write().map_err(|_| Self::poisoned())?;
        plans.insert(plan.id_typed(), plan.clone());
        Ok(plan.clone())
    }

    async fn get_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, StoreError> {
        let plans = self.plans.read().map_err(|_| Self::poisoned())?;
        Ok(plans.get(&id).cloned())
    }

    async fn list_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Vec<SubscriptionPlan>, StoreError> {
        let plans = self.plans.read().map_err(|_| Self::poisoned())?;
        Ok(Self::slice(Self::for_product(&plans, product_id), request))
    }

    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError> {
        let plans = self.plans.read().map_err(|_| Self::poisoned())?;
        Ok(Self::for_product(&plans, product_id).len() as u64)
    }

    async fn update(
        &self,
        id: PlanId,
        changes: &[PlanChange],
    ) -> Result<Option<SubscriptionPlan>, StoreError> {
        let mut plans = self.plans.write().map_err(|_| Self::poisoned())?;
        let Some(plan) = plans.get_mut(&id) else {
            return Ok(None);
        };
        for change in changes {
            plan.apply(change);
        }
        let updated = plan.clone().with_updated_at(Utc::now());
        *plan = updated.clone();
        Ok(Some(updated))
    }

    async fn delete(&self, id: PlanId) -> Result<bool, StoreError> {
        let mut plans = self.plans.write().map_err(|_| Self::poisoned())?;
        Ok(plans.remove(&id).is_some())
    }

    async fn page_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Page<SubscriptionPlan>, StoreError> {
        let plans = self.plans.read().map_err(|_| Self::poisoned())?;
        let matching = Self::for_product(&plans, product_id);
        let total = matching.len() as u64;
        Ok(Page::new(Self::slice(matching, request), total, request))
    }
}
