use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use catalog_core::{Page, PageRequest, PlanId, Price, ProductId, StoreError};
use catalog_subscriptions::{PlanChange, PlanDuration, PlanStore, SubscriptionPlan};

use super::{map_sqlx_error, to_i64};

const COLUMNS: &str = "id, product_id, plan_name, duration, price, created_at, updated_at";

/// Postgres-backed plan store.
///
/// `product_id` references `products(id)`; inserting a plan for an unknown
/// product fails with [`StoreError::ForeignKey`].
#[derive(Debug, Clone)]
pub struct PostgresPlanStore {
    pool: PgPool,
}

impl PostgresPlanStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

struct PlanRow {
    id: Uuid,
    product_id: Uuid,
    plan_name: String,
    duration: i32,
    price: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for PlanRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(PlanRow {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            plan_name: row.try_get("plan_name")?,
            duration: row.try_get("duration")?,
            price: row.try_get("price")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<PlanRow> for SubscriptionPlan {
    type Error = StoreError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let duration = PlanDuration::new(i64::from(row.duration))
            .map_err(|e| StoreError::Corrupt(format!("plan {}: {}", row.id, e)))?;

        Ok(SubscriptionPlan::new(
            PlanId::from_uuid(row.id),
            ProductId::from_uuid(row.product_id),
            row.plan_name,
            duration,
            Price::from_stored(row.price),
            row.created_at,
        )
        .with_updated_at(row.updated_at))
    }
}

fn decode(operation: &str, row: &PgRow) -> Result<SubscriptionPlan, StoreError> {
    let raw = PlanRow::from_row(row).map_err(|e| map_sqlx_error(operation, e))?;
    SubscriptionPlan::try_from(raw)
}

async fn select_page<'e>(
    executor: impl PgExecutor<'e>,
    product_id: ProductId,
    request: PageRequest,
) -> Result<Vec<SubscriptionPlan>, StoreError> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM subscription_plans \
         WHERE product_id = $1 AND deleted_at IS NULL \
         ORDER BY created_at ASC, id ASC \
         LIMIT $2 OFFSET $3"
    ))
    .bind(product_id.as_uuid())
    .bind(to_i64(request.limit()))
    .bind(to_i64(request.offset()))
    .fetch_all(executor)
    .await
    .map_err(|e| map_sqlx_error("list_plans", e))?;

    rows.iter().map(|row| decode("list_plans", row)).collect()
}

async fn select_count<'e>(
    executor: impl PgExecutor<'e>,
    product_id: ProductId,
) -> Result<u64, StoreError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM subscription_plans WHERE product_id = $1 AND deleted_at IS NULL",
    )
    .bind(product_id.as_uuid())
    .fetch_one(executor)
    .await
    .map_err(|e| map_sqlx_error("count_plans", e))?;

    Ok(u64::try_from(total).unwrap_or(0))
}

#[async_trait::async_trait]
impl PlanStore for PostgresPlanStore {
    #[instrument(
        skip_all,
        fields(plan_id = %plan.id_typed(), product_id = %plan.product_id()),
        err
    )]
    async fn create(&self, plan: &SubscriptionPlan) -> Result<SubscriptionPlan, StoreError> {
        let row = sqlx::query(&format!(
            "INSERT INTO subscription_plans \
                 (id, product_id, plan_name, duration, price, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(plan.id_typed().as_uuid())
        .bind(plan.product_id().as_uuid())
        .bind(plan.plan_name())
        .bind(plan.duration().days() as i32)
        .bind(plan.price().value())
        .bind(plan.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_plan", e))?;

        decode("create_plan", &row)
    }

    #[instrument(skip_all, fields(plan_id = %id), err)]
    async fn get_by_id(&self, id: PlanId) -> Result<Option<SubscriptionPlan>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM subscription_plans WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_plan", e))?;

        row.map(|row| decode("get_plan", &row)).transpose()
    }

    #[instrument(skip_all, fields(product_id = %product_id, page = request.page()), err)]
    async fn list_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Vec<SubscriptionPlan>, StoreError> {
        select_page(&self.pool, product_id, request).await
    }

    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError> {
        select_count(&self.pool, product_id).await
    }

    #[instrument(skip_all, fields(plan_id = %id, change_count = changes.len()), err)]
    async fn update(
        &self,
        id: PlanId,
        changes: &[PlanChange],
    ) -> Result<Option<SubscriptionPlan>, StoreError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE subscription_plans SET ");
        {
            let mut set = qb.separated(", ");
            for change in changes {
                set.push(change.column());
                set.push_unseparated(" = ");
                match change {
                    PlanChange::PlanName(v) => {
                        set.push_bind_unseparated(v.clone());
                    }
                    PlanChange::Duration(v) => {
                        set.push_bind_unseparated(v.days() as i32);
                    }
                    PlanChange::Price(v) => {
                        set.push_bind_unseparated(v.value());
                    }
                }
            }
        }
        qb.push(" WHERE id = ")
            .push_bind(*id.as_uuid())
            .push(" AND deleted_at IS NULL RETURNING ")
            .push(COLUMNS);

        let row = qb
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_plan", e))?;

        row.map(|row| decode("update_plan", &row)).transpose()
    }

    #[instrument(skip_all, fields(plan_id = %id), err)]
    async fn delete(&self, id: PlanId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM subscription_plans WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_plan", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Items and total from one `REPEATABLE READ` snapshot.
    #[instrument(skip_all, fields(product_id = %product_id, page = request.page()), err)]
    async fn page_by_product(
        &self,
        product_id: ProductId,
        request: PageRequest,
    ) -> Result<Page<SubscriptionPlan>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("page_plans", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("page_plans", e))?;

        let items = select_page(&mut *tx, product_id, request).await?;
        let total = select_count(&mut *tx, product_id).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("page_plans", e))?;
        Ok(Page::new(items, total, request))
    }
}
