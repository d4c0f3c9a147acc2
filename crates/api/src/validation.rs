//! Wire-level field rules.
//!
//! Every rule lives here exactly once. Functions take raw wire values, run
//! them through the sanitizer where they are free text, and hand back the
//! typed or cleaned value the domain request wants. Rules the domain already
//! expresses by construction (`Price`, `PlanDuration`, `SubscriptionPeriod`)
//! are delegated to it, not repeated.

use catalog_core::{DomainError, DomainResult, PageRequest, PlanId, Price, ProductId};
use catalog_products::{
    CreateProduct, DigitalDraft, PhysicalDraft, ProductType, SubscriptionDraft, SubscriptionPeriod,
    UpdateProduct,
};
use catalog_subscriptions::{CreatePlan, PlanDuration, UpdatePlan};

use crate::proto;
use crate::sanitize::{sanitize_text, sanitize_url};

pub const NAME_MIN: usize = 2;
pub const NAME_MAX: usize = 255;
pub const DESCRIPTION_MAX: usize = 1000;
pub const DIMENSIONS_MAX: usize = 50;

/// Sanitised required name, `NAME_MIN..=NAME_MAX` characters.
pub fn name(raw: &str, field: &str) -> DomainResult<String> {
    let clean = sanitize_text(raw);
    if clean.is_empty() {
        return Err(DomainError::bad_request(format!("{field} is required")));
    }
    let len = clean.chars().count();
    if len < NAME_MIN {
        return Err(DomainError::bad_request(format!(
            "{field} must be at least {NAME_MIN} characters"
        )));
    }
    if len > NAME_MAX {
        return Err(DomainError::bad_request(format!(
            "{field} must be at most {NAME_MAX} characters"
        )));
    }
    Ok(clean)
}

/// A name on an update: absent or blank means "leave unchanged".
fn optional_name(raw: Option<&str>, field: &str) -> DomainResult<Option<String>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => name(raw, field).map(Some),
        _ => Ok(None),
    }
}

pub fn description(raw: &str) -> DomainResult<String> {
    let clean = sanitize_text(raw);
    if clean.chars().count() > DESCRIPTION_MAX {
        return Err(DomainError::bad_request(format!(
            "product description must be at most {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(clean)
}

pub fn product_type(raw: i32) -> DomainResult<ProductType> {
    match proto::ProductType::try_from(raw) {
        Ok(proto::ProductType::Digital) => Ok(ProductType::Digital),
        Ok(proto::ProductType::Physical) => Ok(ProductType::Physical),
        Ok(proto::ProductType::Subscription) => Ok(ProductType::Subscription),
        _ => Err(DomainError::bad_request("invalid product type")),
    }
}

pub fn product_id(raw: &str) -> DomainResult<ProductId> {
    if raw.trim().is_empty() {
        return Err(DomainError::bad_request("id is required"));
    }
    ProductId::parse(raw)
}

pub fn plan_id(raw: &str) -> DomainResult<PlanId> {
    if raw.trim().is_empty() {
        return Err(DomainError::bad_request("id is required"));
    }
    PlanId::parse(raw)
}

pub fn page_request(page: i32, page_size: i32) -> PageRequest {
    PageRequest::new(i64::from(page), i64::from(page_size))
}

/// Zero means "not given"; the domain decides whether that is acceptable.
fn digital(raw: &proto::DigitalProduct) -> DomainResult<DigitalDraft> {
    if raw.file_size < 0 {
        return Err(DomainError::bad_request("file_size cannot be negative"));
    }
    let download_link = if raw.download_link.trim().is_empty() {
        String::new()
    } else {
        let clean = sanitize_url(&raw.download_link);
        if clean.is_empty() {
            return Err(DomainError::bad_request(
                "invalid download_link format - must be a valid URL",
            ));
        }
        clean
    };
    Ok(DigitalDraft {
        file_size: raw.file_size,
        download_link,
    })
}

fn physical(raw: &proto::PhysicalProduct) -> DomainResult<PhysicalDraft> {
    if !raw.weight.is_finite() {
        return Err(DomainError::bad_request("weight must be a finite number"));
    }
    if raw.weight < 0.0 {
        return Err(DomainError::bad_request("weight cannot be negative"));
    }
    let dimensions = sanitize_text(&raw.dimensions);
    if dimensions.chars().count() > DIMENSIONS_MAX {
        return Err(DomainError::bad_request("dimensions too long"));
    }
    Ok(PhysicalDraft {
        weight: raw.weight,
        dimensions,
    })
}

fn subscription(raw: &proto::SubscriptionProduct) -> DomainResult<SubscriptionDraft> {
    let period = match raw.subscription_period.trim() {
        "" => None,
        value => Some(value.parse::<SubscriptionPeriod>()?),
    };
    // Range only; "must be positive" is the domain's call since zero also
    // means "not given" on update.
    Price::try_new(raw.renewal_price, "renewal_price")?;
    Ok(SubscriptionDraft {
        period,
        renewal_price: raw.renewal_price,
    })
}

fn drafts(
    d: Option<&proto::DigitalProduct>,
    p: Option<&proto::PhysicalProduct>,
    s: Option<&proto::SubscriptionProduct>,
) -> DomainResult<(Option<DigitalDraft>, Option<PhysicalDraft>, Option<SubscriptionDraft>)> {
    Ok((
        d.map(digital).transpose()?,
        p.map(physical).transpose()?,
        s.map(subscription).transpose()?,
    ))
}

pub fn create_product(req: &proto::CreateProductRequest) -> DomainResult<CreateProduct> {
    let name = name(&req.name, "product name")?;
    let description = description(&req.description)?;
    let price = Price::try_new(req.price, "price")?;
    let product_type = product_type(req.r#type)?;
    let (digital, physical, subscription) = drafts(
        req.digital_product.as_ref(),
        req.physical_product.as_ref(),
        req.subscription_product.as_ref(),
    )?;

    Ok(CreateProduct {
        name,
        description,
        price,
        product_type,
        digital,
        physical,
        subscription,
    })
}

pub fn update_product(req: &proto::UpdateProductRequest) -> DomainResult<(ProductId, UpdateProduct)> {
    let id = product_id(&req.id)?;
    let name = optional_name(req.name.as_deref(), "product name")?;
    let description = req.description.as_deref().map(description).transpose()?;
    let price = req.price.map(|p| Price::try_new(p, "price")).transpose()?;
    let (digital, physical, subscription) = drafts(
        req.digital_product.as_ref(),
        req.physical_product.as_ref(),
        req.subscription_product.as_ref(),
    )?;

    Ok((
        id,
        UpdateProduct {
            name,
            description,
            price,
            digital,
            physical,
            subscription,
        },
    ))
}

pub fn list_filter(raw: Option<i32>) -> DomainResult<Option<ProductType>> {
    raw.map(product_type).transpose()
}

pub fn create_plan(req: &proto::CreateSubscriptionPlanRequest) -> DomainResult<CreatePlan> {
    let product_id = req.product_id.trim();
    if product_id.is_empty() {
        return Err(DomainError::bad_request("product_id is required"));
    }
    Ok(CreatePlan {
        product_id: product_id.to_string(),
        plan_name: name(&req.plan_name, "plan_name")?,
        duration: PlanDuration::new(i64::from(req.duration))?,
        price: Price::try_positive(req.price, "price")?,
    })
}

pub fn update_plan(req: &proto::UpdateSubscriptionPlanRequest) -> DomainResult<(PlanId, UpdatePlan)> {
    let id = plan_id(&req.id)?;
    Ok((
        id,
        UpdatePlan {
            plan_name: optional_name(req.plan_name.as_deref(), "plan_name")?,
            duration: req
                .duration
                .map(|d| PlanDuration::new(i64::from(d)))
                .transpose()?,
            price: req
                .price
                .map(|p| Price::try_positive(p, "price"))
                .transpose()?,
        },
    ))
}

/// Owning product of a plan listing.
pub fn plan_owner(raw: &str) -> DomainResult<ProductId> {
    if raw.trim().is_empty() {
        return Err(DomainError::bad_request("product_id is required"));
    }
    ProductId::parse(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bad(msg: &str) -> DomainError {
        DomainError::bad_request(msg)
    }

    fn digital_request() -> proto::CreateProductRequest {
        proto::CreateProductRequest {
            name: "E-book".into(),
            description: "A <great> read".into(),
            price: 9.99,
            r#type: proto::ProductType::Digital as i32,
            digital_product: Some(proto::DigitalProduct {
                file_size: 1024,
                download_link: "  https://cdn.example.com/book.pdf ".into(),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn create_product_sanitises_text_and_url() {
        let req = create_product(&digital_request()).unwrap();
        assert_eq!(req.description, "A &lt;great&gt; read");
        assert_eq!(req.product_type, ProductType::Digital);
        let digital = req.digital.unwrap();
        assert_eq!(digital.download_link, "https://cdn.example.com/book.pdf");
    }

    #[test]
    fn names_are_required_and_bounded() {
        let mut req = digital_request();
        req.name = "   ".into();
        assert_eq!(create_product(&req).unwrap_err(), bad("product name is required"));

        req.name = "x".into();
        assert_eq!(
            create_product(&req).unwrap_err(),
            bad("product name must be at least 2 characters")
        );

        req.name = "n".repeat(256);
        assert_eq!(
            create_product(&req).unwrap_err(),
            bad("product name must be at most 255 characters")
        );

        req.name = "n".repeat(255);
        assert!(create_product(&req).is_ok());
    }

    #[test]
    fn description_limit_counts_characters_after_escaping() {
        let mut req = digital_request();
        req.description = "é".repeat(DESCRIPTION_MAX);
        assert!(create_product(&req).is_ok());

        req.description = "&".repeat(DESCRIPTION_MAX / 4);
        assert!(create_product(&req).is_err());
    }

    #[test]
    fn price_range_is_enforced() {
        let mut req = digital_request();
        req.price = -1.0;
        assert_eq!(create_product(&req).unwrap_err(), bad("price cannot be negative"));
        req.price = 1_000_000.01;
        assert_eq!(create_product(&req).unwrap_err(), bad("price cannot exceed 1,000,000"));
        req.price = 0.0;
        assert!(create_product(&req).is_ok());
    }

    #[test]
    fn unspecified_and_unknown_types_are_rejected() {
        let mut req = digital_request();
        req.r#type = proto::ProductType::Unspecified as i32;
        assert_eq!(create_product(&req).unwrap_err(), bad("invalid product type"));
        req.r#type = 9;
        assert_eq!(create_product(&req).unwrap_err(), bad("invalid product type"));
    }

    #[test]
    fn download_link_must_be_http() {
        let mut req = digital_request();
        req.digital_product = Some(proto::DigitalProduct {
            file_size: 1,
            download_link: "ftp://files.example.com/x".into(),
        });
        assert_eq!(
            create_product(&req).unwrap_err(),
            bad("invalid download_link format - must be a valid URL")
        );
    }

    #[test]
    fn negative_variant_numbers_are_rejected_at_the_boundary() {
        let mut req = digital_request();
        req.digital_product = Some(proto::DigitalProduct {
            file_size: -1,
            download_link: String::new(),
        });
        assert_eq!(create_product(&req).unwrap_err(), bad("file_size cannot be negative"));

        req.r#type = proto::ProductType::Physical as i32;
        req.physical_product = Some(proto::PhysicalProduct {
            weight: -0.5,
            dimensions: String::new(),
        });
        req.digital_product = None;
        assert_eq!(create_product(&req).unwrap_err(), bad("weight cannot be negative"));

        req.physical_product = Some(proto::PhysicalProduct {
            weight: 1.0,
            dimensions: "x".repeat(DIMENSIONS_MAX + 1),
        });
        assert_eq!(create_product(&req).unwrap_err(), bad("dimensions too long"));
    }

    #[test]
    fn subscription_period_uses_the_domain_enumeration() {
        let mut req = digital_request();
        req.r#type = proto::ProductType::Subscription as i32;
        req.subscription_product = Some(proto::SubscriptionProduct {
            subscription_period: "fortnightly".into(),
            renewal_price: 5.0,
        });
        let err = create_product(&req).unwrap_err();
        assert!(err.to_string().starts_with("invalid subscription_period"));

        req.subscription_product = Some(proto::SubscriptionProduct {
            subscription_period: "monthly".into(),
            renewal_price: -5.0,
        });
        assert_eq!(create_product(&req).unwrap_err(), bad("renewal_price cannot be negative"));

        req.subscription_product = Some(proto::SubscriptionProduct {
            subscription_period: " yearly ".into(),
            renewal_price: 50.0,
        });
        let draft = create_product(&req).unwrap().subscription.unwrap();
        assert_eq!(draft.period, Some(SubscriptionPeriod::Yearly));
    }

    #[test]
    fn update_treats_blank_names_as_absent_and_checks_present_ones() {
        let id = ProductId::new().to_string();
        let (_, update) = update_product(&proto::UpdateProductRequest {
            id: id.clone(),
            name: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.name, None);

        let err = update_product(&proto::UpdateProductRequest {
            id,
            name: Some("A".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, bad("product name must be at least 2 characters"));
    }

    #[test]
    fn ids_are_required_and_parsed() {
        assert_eq!(product_id("").unwrap_err(), bad("id is required"));
        assert_eq!(product_id("nope").unwrap_err(), bad("invalid product ID format"));
        assert_eq!(plan_id("nope").unwrap_err(), bad("invalid subscription plan ID format"));
    }

    #[test]
    fn list_filter_is_optional_but_must_be_known_when_given() {
        assert_eq!(list_filter(None).unwrap(), None);
        assert_eq!(
            list_filter(Some(proto::ProductType::Physical as i32)).unwrap(),
            Some(ProductType::Physical)
        );
        assert_eq!(list_filter(Some(0)).unwrap_err(), bad("invalid product type"));
    }

    #[test]
    fn page_defaults_apply_to_wire_values() {
        assert_eq!(page_request(0, 0), page_request(1, 10));
        assert_eq!(page_request(-3, 25).page_size(), 25);
    }

    fn plan_request() -> proto::CreateSubscriptionPlanRequest {
        proto::CreateSubscriptionPlanRequest {
            product_id: ProductId::new().to_string(),
            plan_name: "Monthly".into(),
            duration: 30,
            price: 29.99,
        }
    }

    #[test]
    fn create_plan_rules() {
        assert!(create_plan(&plan_request()).is_ok());

        let mut req = plan_request();
        req.product_id = " ".into();
        assert_eq!(create_plan(&req).unwrap_err(), bad("product_id is required"));

        let mut req = plan_request();
        req.plan_name = String::new();
        assert_eq!(create_plan(&req).unwrap_err(), bad("plan_name is required"));

        let mut req = plan_request();
        req.duration = 0;
        assert_eq!(create_plan(&req).unwrap_err(), bad("duration must be greater than 0"));

        let mut req = plan_request();
        req.duration = 3651;
        assert_eq!(
            create_plan(&req).unwrap_err(),
            bad("duration cannot exceed 10 years (3650 days)")
        );

        let mut req = plan_request();
        req.price = 0.0;
        assert_eq!(create_plan(&req).unwrap_err(), bad("price must be greater than 0"));
    }

    #[test]
    fn update_plan_checks_only_present_fields() {
        let id = PlanId::new().to_string();
        let (_, update) = update_plan(&proto::UpdateSubscriptionPlanRequest {
            id: id.clone(),
            duration: Some(90),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(update.duration.map(|d| d.days()), Some(90));
        assert_eq!(update.plan_name, None);
        assert_eq!(update.price, None);

        let err = update_plan(&proto::UpdateSubscriptionPlanRequest {
            id,
            price: Some(2_000_000.0),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, bad("price cannot exceed 1,000,000"));
    }
}
