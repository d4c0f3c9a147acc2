use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use catalog_core::{DomainError, DomainResult, Entity, Price, ProductId};

/// Closed set of product kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Digital,
    Physical,
    Subscription,
}

impl ProductType {
    pub const ALL: [ProductType; 3] = [Self::Digital, Self::Physical, Self::Subscription];

    /// Stored representation (`type` column).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::Physical => "physical",
            Self::Subscription => "subscription",
        }
    }
}

impl core::fmt::Display for ProductType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digital" => Ok(Self::Digital),
            "physical" => Ok(Self::Physical),
            "subscription" => Ok(Self::Subscription),
            _ => Err(DomainError::bad_request("invalid product type")),
        }
    }
}

/// Billing period of a subscription product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPeriod {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl SubscriptionPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl core::fmt::Display for SubscriptionPeriod {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPeriod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(DomainError::bad_request(
                "invalid subscription_period. Must be one of: daily, weekly, monthly, quarterly, yearly",
            )),
        }
    }
}

/// Digital payload: a downloadable file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalInfo {
    file_size: i64,
    download_link: String,
}

impl DigitalInfo {
    pub fn new(file_size: i64, download_link: impl Into<String>) -> DomainResult<Self> {
        let download_link = download_link.into();
        if file_size <= 0 {
            return Err(DomainError::bad_request(
                "file size must be greater than 0 for digital products",
            ));
        }
        if download_link.is_empty() {
            return Err(DomainError::bad_request(
                "download link is required for digital products",
            ));
        }
        Ok(Self {
            file_size,
            download_link,
        })
    }

    /// File size in bytes.
    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn download_link(&self) -> &str {
        &self.download_link
    }
}

/// Physical payload: something that ships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalInfo {
    weight: f64,
    dimensions: String,
}

impl PhysicalInfo {
    pub fn new(weight: f64, dimensions: impl Into<String>) -> DomainResult<Self> {
        let dimensions = dimensions.into();
        if !is_positive(weight) {
            return Err(DomainError::bad_request(
                "weight must be greater than 0 for physical products",
            ));
        }
        if dimensions.is_empty() {
            return Err(DomainError::bad_request(
                "dimensions are required for physical products",
            ));
        }
        Ok(Self { weight, dimensions })
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn dimensions(&self) -> &str {
        &self.dimensions
    }
}

/// Subscription payload: a recurring charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    period: SubscriptionPeriod,
    renewal_price: Price,
}

impl SubscriptionInfo {
    pub fn new(period: Option<SubscriptionPeriod>, renewal_price: f64) -> DomainResult<Self> {
        let period = period.ok_or_else(|| {
            DomainError::bad_request("subscription period is required for subscription products")
        })?;
        Ok(Self {
            period,
            renewal_price: renewal_price_of(renewal_price)?,
        })
    }

    pub fn period(&self) -> SubscriptionPeriod {
        self.period
    }

    pub fn renewal_price(&self) -> Price {
        self.renewal_price
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn renewal_price_of(value: f64) -> DomainResult<Price> {
    if !is_positive(value) {
        return Err(DomainError::bad_request(
            "renewal price must be greater than 0 for subscription products",
        ));
    }
    Price::try_new(value, "renewal_price")
}

/// Exactly one variant payload, matching the product's type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductVariant {
    Digital(DigitalInfo),
    Physical(PhysicalInfo),
    Subscription(SubscriptionInfo),
}

impl ProductVariant {
    /// Build the variant for `product_type` from caller-supplied drafts.
    ///
    /// Only the draft matching `product_type` is looked at; the others are
    /// discarded.
    pub fn from_parts(
        product_type: ProductType,
        digital: Option<DigitalDraft>,
        physical: Option<PhysicalDraft>,
        subscription: Option<SubscriptionDraft>,
    ) -> DomainResult<Self> {
        match product_type {
            ProductType::Digital => {
                let d = digital.ok_or_else(|| {
                    DomainError::bad_request(
                        "digital product information is required for digital products",
                    )
                })?;
                Ok(Self::Digital(DigitalInfo::new(d.file_size, d.download_link)?))
            }
            ProductType::Physical => {
                let p = physical.ok_or_else(|| {
                    DomainError::bad_request(
                        "physical product information is required for physical products",
                    )
                })?;
                Ok(Self::Physical(PhysicalInfo::new(p.weight, p.dimensions)?))
            }
            ProductType::Subscription => {
                let s = subscription.ok_or_else(|| {
                    DomainError::bad_request(
                        "subscription product information is required for subscription products",
                    )
                })?;
                Ok(Self::Subscription(SubscriptionInfo::new(s.period, s.renewal_price)?))
            }
        }
    }

    pub fn product_type(&self) -> ProductType {
        match self {
            Self::Digital(_) => ProductType::Digital,
            Self::Physical(_) => ProductType::Physical,
            Self::Subscription(_) => ProductType::Subscription,
        }
    }

    pub fn digital(&self) -> Option<&DigitalInfo> {
        match self {
            Self::Digital(d) => Some(d),
            _ => None,
        }
    }

    pub fn physical(&self) -> Option<&PhysicalInfo> {
        match self {
            Self::Physical(p) => Some(p),
            _ => None,
        }
    }

    pub fn subscription(&self) -> Option<&SubscriptionInfo> {
        match self {
            Self::Subscription(s) => Some(s),
            _ => None,
        }
    }
}

/// Entity: Product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    name: String,
    description: String,
    price: Price,
    variant: ProductVariant,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
        variant: ProductVariant,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            price,
            variant,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Price {
        self.price
    }

    /// Derived from the variant, so the two can never disagree.
    pub fn product_type(&self) -> ProductType {
        self.variant.product_type()
    }

    pub fn variant(&self) -> &ProductVariant {
        &self.variant
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply one change in place.
    ///
    /// A variant change addressed to another product type is a no-op.
    pub fn apply(&mut self, change: &ProductChange) {
        match (change, &mut self.variant) {
            (ProductChange::Name(v), _) => self.name = v.clone(),
            (ProductChange::Description(v), _) => self.description = v.clone(),
            (ProductChange::Price(v), _) => self.price = *v,
            (ProductChange::DigitalFileSize(v), ProductVariant::Digital(d)) => d.file_size = *v,
            (ProductChange::DigitalDownloadLink(v), ProductVariant::Digital(d)) => {
                d.download_link = v.clone()
            }
            (ProductChange::PhysicalWeight(v), ProductVariant::Physical(p)) => p.weight = *v,
            (ProductChange::PhysicalDimensions(v), ProductVariant::Physical(p)) => {
                p.dimensions = v.clone()
            }
            (ProductChange::SubscriptionPeriod(v), ProductVariant::Subscription(s)) => {
                s.period = *v
            }
            (ProductChange::SubscriptionRenewalPrice(v), ProductVariant::Subscription(s)) => {
                s.renewal_price = *v
            }
            _ => {}
        }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller-supplied digital fields, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DigitalDraft {
    pub file_size: i64,
    pub download_link: String,
}

/// Caller-supplied physical fields, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhysicalDraft {
    pub weight: f64,
    pub dimensions: String,
}

/// Caller-supplied subscription fields, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionDraft {
    pub period: Option<SubscriptionPeriod>,
    pub renewal_price: f64,
}

/// Request: create a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub product_type: ProductType,
    pub digital: Option<DigitalDraft>,
    pub physical: Option<PhysicalDraft>,
    pub subscription: Option<SubscriptionDraft>,
}

/// Request: partially update a product.
///
/// Absent fields are left untouched. Empty strings and non-positive numbers
/// inside the variant drafts also count as absent, so a caller can change
/// `download_link` alone by sending a draft with `file_size = 0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub digital: Option<DigitalDraft>,
    pub physical: Option<PhysicalDraft>,
    pub subscription: Option<SubscriptionDraft>,
}

impl UpdateProduct {
    /// Expand into the update set for a product of `existing` type.
    ///
    /// Variant drafts for any other type are ignored: the type of a product
    /// never changes after creation.
    pub fn changes_for(&self, existing: ProductType) -> DomainResult<Vec<ProductChange>> {
        let mut changes = Vec::new();

        if let Some(name) = self.name.as_ref().filter(|v| !v.is_empty()) {
            changes.push(ProductChange::Name(name.clone()));
        }
        if let Some(description) = self.description.as_ref().filter(|v| !v.is_empty()) {
            changes.push(ProductChange::Description(description.clone()));
        }
        if let Some(price) = self.price {
            changes.push(ProductChange::Price(price));
        }

        match existing {
            ProductType::Digital => {
                if let Some(d) = &self.digital {
                    if d.file_size > 0 {
                        changes.push(ProductChange::DigitalFileSize(d.file_size));
                    }
                    if !d.download_link.is_empty() {
                        changes.push(ProductChange::DigitalDownloadLink(d.download_link.clone()));
                    }
                }
            }
            ProductType::Physical => {
                if let Some(p) = &self.physical {
                    if is_positive(p.weight) {
                        changes.push(ProductChange::PhysicalWeight(p.weight));
                    }
                    if !p.dimensions.is_empty() {
                        changes.push(ProductChange::PhysicalDimensions(p.dimensions.clone()));
                    }
                }
            }
            ProductType::Subscription => {
                if let Some(s) = &self.subscription {
                    if let Some(period) = s.period {
                        changes.push(ProductChange::SubscriptionPeriod(period));
                    }
                    if s.renewal_price > 0.0 {
                        changes.push(ProductChange::SubscriptionRenewalPrice(renewal_price_of(
                            s.renewal_price,
                        )?));
                    }
                }
            }
        }

        Ok(changes)
    }
}

/// One field => value assignment of a product update set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductChange {
    Name(String),
    Description(String),
    Price(Price),
    DigitalFileSize(i64),
    DigitalDownloadLink(String),
    PhysicalWeight(f64),
    PhysicalDimensions(String),
    SubscriptionPeriod(SubscriptionPeriod),
    SubscriptionRenewalPrice(Price),
}

impl ProductChange {
    /// Storage column this change writes.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::Price(_) => "price",
            Self::DigitalFileSize(_) => "digital_file_size",
            Self::DigitalDownloadLink(_) => "digital_download_link",
            Self::PhysicalWeight(_) => "physical_weight",
            Self::PhysicalDimensions(_) => "physical_dimensions",
            Self::SubscriptionPeriod(_) => "subscription_period",
            Self::SubscriptionRenewalPrice(_) => "subscription_renewal_price",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn digital_draft(file_size: i64, link: &str) -> Option<DigitalDraft> {
        Some(DigitalDraft {
            file_size,
            download_link: link.to_string(),
        })
    }

    fn test_time() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn digital_requires_its_payload() {
        let err = ProductVariant::from_parts(ProductType::Digital, None, None, None).unwrap_err();
        assert_eq!(
            err,
            DomainError::bad_request("digital product information is required for digital products")
        );
    }

    #[test]
    fn digital_file_size_must_be_positive() {
        let err = ProductVariant::from_parts(
            ProductType::Digital,
            digital_draft(0, "https://cdn.example.com/f"),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            DomainError::bad_request("file size must be greater than 0 for digital products")
        );
    }

    #[test]
    fn digital_with_valid_payload_carries_only_the_digital_variant() {
        let variant = ProductVariant::from_parts(
            ProductType::Digital,
            digital_draft(1, "https://cdn.example.com/f"),
            Some(PhysicalDraft {
                weight: 2.0,
                dimensions: "1x1x1".into(),
            }),
            None,
        )
        .unwrap();
        assert_eq!(variant.product_type(), ProductType::Digital);
        assert_eq!(variant.digital().unwrap().file_size(), 1);
        assert!(variant.physical().is_none());
        assert!(variant.subscription().is_none());
    }

    #[test]
    fn physical_rules() {
        let draft = |weight, dims: &str| {
            Some(PhysicalDraft {
                weight,
                dimensions: dims.into(),
            })
        };
        assert_eq!(
            ProductVariant::from_parts(ProductType::Physical, None, draft(0.0, "1x1"), None)
                .unwrap_err(),
            DomainError::bad_request("weight must be greater than 0 for physical products")
        );
        assert_eq!(
            ProductVariant::from_parts(ProductType::Physical, None, draft(1.5, ""), None)
                .unwrap_err(),
            DomainError::bad_request("dimensions are required for physical products")
        );
        assert!(
            ProductVariant::from_parts(ProductType::Physical, None, draft(f64::NAN, "1x1"), None)
                .is_err()
        );
        assert!(ProductVariant::from_parts(ProductType::Physical, None, draft(1.5, "1x1"), None).is_ok());
    }

    #[test]
    fn subscription_rules() {
        let draft = |period, renewal_price| {
            Some(SubscriptionDraft {
                period,
                renewal_price,
            })
        };
        assert_eq!(
            ProductVariant::from_parts(ProductType::Subscription, None, None, draft(None, 9.99))
                .unwrap_err(),
            DomainError::bad_request("subscription period is required for subscription products")
        );
        assert_eq!(
            ProductVariant::from_parts(
                ProductType::Subscription,
                None,
                None,
                draft(Some(SubscriptionPeriod::Monthly), 0.0)
            )
            .unwrap_err(),
            DomainError::bad_request("renewal price must be greater than 0 for subscription products")
        );
        let ok = ProductVariant::from_parts(
            ProductType::Subscription,
            None,
            None,
            draft(Some(SubscriptionPeriod::Yearly), 99.0),
        )
        .unwrap();
        assert_eq!(ok.subscription().unwrap().period(), SubscriptionPeriod::Yearly);
    }

    #[test]
    fn enumerations_parse_their_stored_form() {
        for t in ProductType::ALL {
            assert_eq!(t.as_str().parse::<ProductType>().unwrap(), t);
        }
        assert_eq!(
            "book".parse::<ProductType>().unwrap_err(),
            DomainError::bad_request("invalid product type")
        );
        assert_eq!("quarterly".parse::<SubscriptionPeriod>().unwrap(), SubscriptionPeriod::Quarterly);
        assert!("Monthly".parse::<SubscriptionPeriod>().is_err());
    }

    #[test]
    fn update_ignores_drafts_for_other_types() {
        let req = UpdateProduct {
            physical: Some(PhysicalDraft {
                weight: 3.0,
                dimensions: "2x2".into(),
            }),
            ..Default::default()
        };
        assert!(req.changes_for(ProductType::Digital).unwrap().is_empty());
        assert_eq!(req.changes_for(ProductType::Physical).unwrap().len(), 2);
    }

    #[test]
    fn update_merges_individual_sub_fields() {
        let req = UpdateProduct {
            name: Some(String::new()),
            digital: digital_draft(0, "https://cdn.example.com/v2"),
            ..Default::default()
        };
        assert_eq!(
            req.changes_for(ProductType::Digital).unwrap(),
            vec![ProductChange::DigitalDownloadLink("https://cdn.example.com/v2".into())]
        );
    }

    #[test]
    fn apply_never_changes_the_type() {
        let variant = ProductVariant::from_parts(
            ProductType::Digital,
            digital_draft(10, "https://a.example.com"),
            None,
            None,
        )
        .unwrap();
        let mut product = Product::new(
            ProductId::new(),
            "E-book",
            "",
            Price::try_new(5.0, "price").unwrap(),
            variant,
            test_time(),
        );
        product.apply(&ProductChange::PhysicalWeight(4.0));
        product.apply(&ProductChange::DigitalFileSize(20));
        product.apply(&ProductChange::Name("E-book v2".into()));
        assert_eq!(product.product_type(), ProductType::Digital);
        assert_eq!(product.variant().digital().unwrap().file_size(), 20);
        assert_eq!(product.name(), "E-book v2");
    }

    #[test]
    fn change_columns_are_prefixed_by_variant() {
        assert_eq!(ProductChange::DigitalFileSize(1).column(), "digital_file_size");
        assert_eq!(
            ProductChange::SubscriptionRenewalPrice(Price::from_stored(1.0)).column(),
            "subscription_renewal_price"
        );
    }

    proptest! {
        #[test]
        fn update_never_yields_changes_for_a_foreign_variant(
            file_size in any::<i64>(),
            weight in any::<f64>(),
            renewal in 0.0f64..1_000_000.0,
        ) {
            let req = UpdateProduct {
                digital: Some(DigitalDraft { file_size, download_link: "x".into() }),
                physical: Some(PhysicalDraft { weight, dimensions: "y".into() }),
                subscription: Some(SubscriptionDraft {
                    period: Some(SubscriptionPeriod::Daily),
                    renewal_price: renewal,
                }),
                ..Default::default()
            };
            for change in req.changes_for(ProductType::Physical).unwrap() {
                prop_assert!(change.column().starts_with("physical_"));
            }
        }
    }
}
