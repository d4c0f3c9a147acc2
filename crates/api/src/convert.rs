//! Domain entity => wire message.

use catalog_products::{Product, ProductType, ProductVariant};
use catalog_subscriptions::SubscriptionPlan;

use crate::proto;

fn wire_type(t: ProductType) -> proto::ProductType {
    match t {
        ProductType::Digital => proto::ProductType::Digital,
        ProductType::Physical => proto::ProductType::Physical,
        ProductType::Subscription => proto::ProductType::Subscription,
    }
}

impl From<&Product> for proto::Product {
    fn from(p: &Product) -> Self {
        let mut out = proto::Product {
            id: p.id_typed().to_string(),
            name: p.name().to_string(),
            description: p.description().to_string(),
            price: p.price().value(),
            r#type: wire_type(p.product_type()) as i32,
            created_at: Some(proto::timestamp(p.created_at())),
            updated_at: Some(proto::timestamp(p.updated_at())),
            ..Default::default()
        };
        match p.variant() {
            ProductVariant::Digital(d) => {
                out.digital_product = Some(proto::DigitalProduct {
                    file_size: d.file_size(),
                    download_link: d.download_link().to_string(),
                });
            }
            ProductVariant::Physical(ph) => {
                out.physical_product = Some(proto::PhysicalProduct {
                    weight: ph.weight(),
                    dimensions: ph.dimensions().to_string(),
                });
            }
            ProductVariant::Subscription(s) => {
                out.subscription_product = Some(proto::SubscriptionProduct {
                    subscription_period: s.period().to_string(),
                    renewal_price: s.renewal_price().value(),
                });
            }
        }
        out
    }
}

impl From<&SubscriptionPlan> for proto::SubscriptionPlan {
    fn from(p: &SubscriptionPlan) -> Self {
        proto::SubscriptionPlan {
            id: p.id_typed().to_string(),
            product_id: p.product_id().to_string(),
            plan_name: p.plan_name().to_string(),
            duration: i32::try_from(p.duration().days()).unwrap_or(i32::MAX),
            price: p.price().value(),
            created_at: Some(proto::timestamp(p.created_at())),
            updated_at: Some(proto::timestamp(p.updated_at())),
        }
    }
}
