//! `catalog.v1` wire messages and the generated service stubs.
//!
//! The structs below are the source of truth for the wire format;
//! [`crate::descriptor`] mirrors them for server reflection, so a field added
//! here has to be added there too.

use chrono::{DateTime, Utc};
use prost_types::Timestamp;

include!(concat!(env!("OUT_DIR"), "/catalog.v1.ProductService.rs"));
include!(concat!(env!("OUT_DIR"), "/catalog.v1.SubscriptionService.rs"));
include!(concat!(env!("OUT_DIR"), "/catalog.v1.HealthService.rs"));

pub const PACKAGE: &str = "catalog.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum ProductType {
    Unspecified = 0,
    Digital = 1,
    Physical = 2,
    Subscription = 3,
}

impl ProductType {
    /// Proto enum value name.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Unspecified => "PRODUCT_TYPE_UNSPECIFIED",
            Self::Digital => "PRODUCT_TYPE_DIGITAL",
            Self::Physical => "PRODUCT_TYPE_PHYSICAL",
            Self::Subscription => "PRODUCT_TYPE_SUBSCRIPTION",
        }
    }
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct DigitalProduct {
    #[prost(int64, tag = "1")]
    pub file_size: i64,
    #[prost(string, tag = "2")]
    pub download_link: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PhysicalProduct {
    #[prost(double, tag = "1")]
    pub weight: f64,
    #[prost(string, tag = "2")]
    pub dimensions: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SubscriptionProduct {
    #[prost(string, tag = "1")]
    pub subscription_period: String,
    #[prost(double, tag = "2")]
    pub renewal_price: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Product {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub description: String,
    #[prost(double, tag = "4")]
    pub price: f64,
    #[prost(enumeration = "ProductType", tag = "5")]
    pub r#type: i32,
    #[prost(message, optional, tag = "6")]
    pub digital_product: Option<DigitalProduct>,
    #[prost(message, optional, tag = "7")]
    pub physical_product: Option<PhysicalProduct>,
    #[prost(message, optional, tag = "8")]
    pub subscription_product: Option<SubscriptionProduct>,
    #[prost(message, optional, tag = "9")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "10")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductRequest {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub description: String,
    #[prost(double, tag = "3")]
    pub price: f64,
    #[prost(enumeration = "ProductType", tag = "4")]
    pub r#type: i32,
    #[prost(message, optional, tag = "5")]
    pub digital_product: Option<DigitalProduct>,
    #[prost(message, optional, tag = "6")]
    pub physical_product: Option<PhysicalProduct>,
    #[prost(message, optional, tag = "7")]
    pub subscription_product: Option<SubscriptionProduct>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

/// Top-level scalars are proto3 `optional`; inside the variant messages zero
/// values mean "leave unchanged".
#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub description: Option<String>,
    #[prost(double, optional, tag = "4")]
    pub price: Option<f64>,
    #[prost(message, optional, tag = "5")]
    pub digital_product: Option<DigitalProduct>,
    #[prost(message, optional, tag = "6")]
    pub physical_product: Option<PhysicalProduct>,
    #[prost(message, optional, tag = "7")]
    pub subscription_product: Option<SubscriptionProduct>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateProductResponse {
    #[prost(message, optional, tag = "1")]
    pub product: Option<Product>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteProductResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsRequest {
    #[prost(enumeration = "ProductType", optional, tag = "1")]
    pub r#type: Option<i32>,
    #[prost(int32, tag = "2")]
    pub page: i32,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListProductsResponse {
    #[prost(message, repeated, tag = "1")]
    pub products: Vec<Product>,
    #[prost(int64, tag = "2")]
    pub total: i64,
    #[prost(int32, tag = "3")]
    pub page: i32,
    #[prost(int32, tag = "4")]
    pub page_size: i32,
}

// ---------------------------------------------------------------------------
// Subscription plans
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct SubscriptionPlan {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub product_id: String,
    #[prost(string, tag = "3")]
    pub plan_name: String,
    #[prost(int32, tag = "4")]
    pub duration: i32,
    #[prost(double, tag = "5")]
    pub price: f64,
    #[prost(message, optional, tag = "6")]
    pub created_at: Option<Timestamp>,
    #[prost(message, optional, tag = "7")]
    pub updated_at: Option<Timestamp>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateSubscriptionPlanRequest {
    #[prost(string, tag = "1")]
    pub product_id: String,
    #[prost(string, tag = "2")]
    pub plan_name: String,
    #[prost(int32, tag = "3")]
    pub duration: i32,
    #[prost(double, tag = "4")]
    pub price: f64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateSubscriptionPlanResponse {
    #[prost(message, optional, tag = "1")]
    pub subscription_plan: Option<SubscriptionPlan>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetSubscriptionPlanRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetSubscriptionPlanResponse {
    #[prost(message, optional, tag = "1")]
    pub subscription_plan: Option<SubscriptionPlan>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateSubscriptionPlanRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, optional, tag = "2")]
    pub plan_name: Option<String>,
    #[prost(int32, optional, tag = "3")]
    pub duration: Option<i32>,
    #[prost(double, optional, tag = "4")]
    pub price: Option<f64>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateSubscriptionPlanResponse {
    #[prost(message, optional, tag = "1")]
    pub subscription_plan: Option<SubscriptionPlan>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteSubscriptionPlanRequest {
    #[prost(string, tag = "1")]
    pub id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteSubscriptionPlanResponse {
    #[prost(bool, tag = "1")]
    pub success: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListSubscriptionPlansRequest {
    #[prost(string, tag = "1")]
    pub product_id: String,
    #[prost(int32, tag = "2")]
    pub page: i32,
    #[prost(int32, tag = "3")]
    pub page_size: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ListSubscriptionPlansResponse {
    #[prost(message, repeated, tag = "1")]
    pub subscription_plans: Vec<SubscriptionPlan>,
    #[prost(int64, tag = "2")]
    pub total: i64,
    #[prost(int32, tag = "3")]
    pub page: i32,
    #[prost(int32, tag = "4")]
    pub page_size: i32,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct HealthRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HealthResponse {
    #[prost(string, tag = "1")]
    pub status: String,
}

pub fn timestamp(at: DateTime<Utc>) -> Timestamp {
    Timestamp {
        seconds: at.timestamp(),
        nanos: i32::try_from(at.timestamp_subsec_nanos()).unwrap_or(i32::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use prost::Message;

    #[test]
    fn timestamps_keep_sub_second_precision() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let ts = timestamp(at);
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanos, 123_456_789);
    }

    #[test]
    fn absent_optional_scalars_are_distinguishable_from_zero() {
        let sparse = UpdateProductRequest {
            id: "x".into(),
            price: Some(0.0),
            ..Default::default()
        };
        let decoded = UpdateProductRequest::decode(sparse.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.price, Some(0.0));
        assert_eq!(decoded.name, None);
    }

    #[test]
    fn unknown_product_type_values_survive_decoding_as_raw_integers() {
        let req = CreateProductRequest {
            r#type: 42,
            ..Default::default()
        };
        let decoded = CreateProductRequest::decode(req.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded.r#type, 42);
        assert!(ProductType::try_from(decoded.r#type).is_err());
    }
}
