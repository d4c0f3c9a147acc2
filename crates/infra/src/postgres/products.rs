use core::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, QueryBuilder, Row};
use tracing::instrument;
use uuid::Uuid;

use catalog_core::{Page, PageRequest, Price, ProductId, StoreError};
use catalog_products::{
    DigitalInfo, PhysicalInfo, Product, ProductChange, ProductStore, ProductType, ProductVariant,
    SubscriptionInfo, SubscriptionPeriod,
};

use super::{map_sqlx_error, to_i64};

const COLUMNS: &str = "id, name, description, price, type, \
     digital_file_size, digital_download_link, \
     physical_weight, physical_dimensions, \
     subscription_period, subscription_renewal_price, \
     created_at, updated_at";

/// Postgres-backed product store.
///
/// One row per product; the variant lives in prefixed nullable columns and
/// only the columns of the row's `type` are populated. Rows with a
/// `deleted_at` timestamp are invisible to reads.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw `products` row.
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: f64,
    product_type: String,
    digital_file_size: Option<i64>,
    digital_download_link: Option<String>,
    physical_weight: Option<f64>,
    physical_dimensions: Option<String>,
    subscription_period: Option<String>,
    subscription_renewal_price: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ProductRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ProductRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            product_type: row.try_get("type")?,
            digital_file_size: row.try_get("digital_file_size")?,
            digital_download_link: row.try_get("digital_download_link")?,
            physical_weight: row.try_get("physical_weight")?,
            physical_dimensions: row.try_get("physical_dimensions")?,
            subscription_period: row.try_get("subscription_period")?,
            subscription_renewal_price: row.try_get("subscription_renewal_price")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| StoreError::Corrupt(format!("product {}: {}", row.id, what));

        let product_type = ProductType::from_str(&row.product_type)
            .map_err(|_| corrupt(&format!("unknown type `{}`", row.product_type)))?;

        let variant = match product_type {
            ProductType::Digital => {
                let (Some(size), Some(link)) =
                    (row.digital_file_size, row.digital_download_link.clone())
                else {
                    return Err(corrupt("digital columns missing"));
                };
                ProductVariant::Digital(
                    DigitalInfo::new(size, link).map_err(|e| corrupt(&e.to_string()))?,
                )
            }
            ProductType::Physical => {
                let (Some(weight), Some(dims)) =
                    (row.physical_weight, row.physical_dimensions.clone())
                else {
                    return Err(corrupt("physical columns missing"));
                };
                ProductVariant::Physical(
                    PhysicalInfo::new(weight, dims).map_err(|e| corrupt(&e.to_string()))?,
                )
            }
            ProductType::Subscription => {
                let (Some(period), Some(renewal)) = (
                    row.subscription_period.as_deref(),
                    row.subscription_renewal_price,
                ) else {
                    return Err(corrupt("subscription columns missing"));
                };
                let period = SubscriptionPeriod::from_str(period)
                    .map_err(|_| corrupt(&format!("unknown period `{period}`")))?;
                ProductVariant::Subscription(
                    SubscriptionInfo::new(Some(period), renewal)
                        .map_err(|e| corrupt(&e.to_string()))?,
                )
            }
        };

        Ok(Product::new(
            ProductId::from_uuid(row.id),
            row.name,
            row.description,
            Price::from_stored(row.price),
            variant,
            row.created_at,
        )
        .with_updated_at(row.updated_at))
    }
}

fn decode(operation: &str, row: &PgRow) -> Result<Product, StoreError> {
    let raw = ProductRow::from_row(row)
        .map_err(|e| map_sqlx_error(operation, e))?;
    Product::try_from(raw)
}

async fn select_page<'e>(
    executor: impl PgExecutor<'e>,
    filter: Option<ProductType>,
    request: PageRequest,
) -> Result<Vec<Product>, StoreError> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM products \
         WHERE deleted_at IS NULL AND ($1::text IS NULL OR type = $1) \
         ORDER BY created_at ASC, id ASC \
         LIMIT $2 OFFSET $3"
    ))
    .bind(filter.map(|t| t.as_str()))
    .bind(to_i64(request.limit()))
    .bind(to_i64(request.offset()))
    .fetch_all(executor)
    .await
    .map_err(|e| map_sqlx_error("list_products", e))?;

    rows.iter().map(|row| decode("list_products", row)).collect()
}

async fn select_count<'e>(
    executor: impl PgExecutor<'e>,
    filter: Option<ProductType>,
) -> Result<u64, StoreError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM products \
         WHERE deleted_at IS NULL AND ($1::text IS NULL OR type = $1)",
    )
    .bind(filter.map(|t| t.as_str()))
    .fetch_one(executor)
    .await
    .map_err(|e| map_sqlx_error("count_products", e))?;

    Ok(u64::try_from(total).unwrap_or(0))
}

fn push_assignment(
    set: &mut sqlx::query_builder::Separated<'_, '_, Postgres, &'static str>,
    change: &ProductChange,
) {
    set.push(change.column());
    set.push_unseparated(" = ");
    match change {
        ProductChange::Name(v)
        | ProductChange::Description(v)
        | ProductChange::DigitalDownloadLink(v)
        | ProductChange::PhysicalDimensions(v) => {
            set.push_bind_unseparated(v.clone());
        }
        ProductChange::Price(v) | ProductChange::SubscriptionRenewalPrice(v) => {
            set.push_bind_unseparated(v.value());
        }
        ProductChange::DigitalFileSize(v) => {
            set.push_bind_unseparated(*v);
        }
        ProductChange::PhysicalWeight(v) => {
            set.push_bind_unseparated(*v);
        }
        ProductChange::SubscriptionPeriod(v) => {
            set.push_bind_unseparated(v.as_str());
        }
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip_all, fields(product_id = %product.id_typed()), err)]
    async fn create(&self, product: &Product) -> Result<Product, StoreError> {
        let variant = product.variant();
        let digital = variant.digital();
        let physical = variant.physical();
        let subscription = variant.subscription();

        let row = sqlx::query(&format!(
            "INSERT INTO products ( \
                 id, name, description, price, type, \
                 digital_file_size, digital_download_link, \
                 physical_weight, physical_dimensions, \
                 subscription_period, subscription_renewal_price, \
                 created_at, updated_at \
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12) \
             RETURNING {COLUMNS}"
        ))
        .bind(product.id_typed().as_uuid())
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().value())
        .bind(product.product_type().as_str())
        .bind(digital.map(DigitalInfo::file_size))
        .bind(digital.map(DigitalInfo::download_link))
        .bind(physical.map(PhysicalInfo::weight))
        .bind(physical.map(PhysicalInfo::dimensions))
        .bind(subscription.map(|s| s.period().as_str()))
        .bind(subscription.map(|s| s.renewal_price().value()))
        .bind(product.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_product", e))?;

        decode("create_product", &row)
    }

    #[instrument(skip_all, fields(product_id = %id), err)]
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.map(|row| decode("get_product", &row)).transpose()
    }

    #[instrument(
        skip_all,
        fields(filter = ?filter, page = request.page(), page_size = request.page_size()),
        err
    )]
    async fn list(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Vec<Product>, StoreError> {
        select_page(&self.pool, filter, request).await
    }

    #[instrument(skip_all, fields(filter = ?filter), err)]
    async fn count(&self, filter: Option<ProductType>) -> Result<u64, StoreError> {
        select_count(&self.pool, filter).await
    }

    #[instrument(skip_all, fields(product_id = %id, change_count = changes.len()), err)]
    async fn update(
        &self,
        id: ProductId,
        changes: &[ProductChange],
    ) -> Result<Option<Product>, StoreError> {
        if changes.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut qb = QueryBuilder::<Postgres>::new("UPDATE products SET ");
        {
            let mut set = qb.separated(", ");
            for change in changes {
                push_assignment(&mut set, change);
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
            .map_err(|e| map_sqlx_error("update_product", e))?;

        row.map(|row| decode("update_product", &row)).transpose()
    }

    #[instrument(skip_all, fields(product_id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Items and total from one `REPEATABLE READ` snapshot.
    #[instrument(
        skip_all,
        fields(filter = ?filter, page = request.page(), page_size = request.page_size()),
        err
    )]
    async fn page(
        &self,
        filter: Option<ProductType>,
        request: PageRequest,
    ) -> Result<Page<Product>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("page_products", e))?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("page_products", e))?;

        let items = select_page(&mut *tx, filter, request).await?;
        let total = select_count(&mut *tx, filter).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("page_products", e))?;
        Ok(Page::new(items, total, request))
    }
}
