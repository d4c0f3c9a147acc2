//! `FileDescriptorSet` for server reflection.
//!
//! Built by hand from `prost-types` so no `protoc` is needed. It has to match
//! the structs in [`crate::proto`] field for field; the tests below check the
//! service and method names against the generated routes.

use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MethodDescriptorProto, OneofDescriptorProto,
    ServiceDescriptorProto,
};

const CATALOG_FILE: &str = "catalog/v1/catalog.proto";
const TIMESTAMP_FILE: &str = "google/protobuf/timestamp.proto";
const TIMESTAMP: &str = ".google.protobuf.Timestamp";

fn json_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper = false;
    for c in name.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(json_name(name)),
        ..Default::default()
    }
}

fn typed(name: &str, number: i32, ty: Type, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.to_string()),
        ..field(name, number, ty)
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    typed(name, number, Type::Message, &format!(".catalog.v1.{type_name}"))
}

fn repeated(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        label: Some(Label::Repeated as i32),
        ..message_field(name, number, type_name)
    }
}

fn product_type_field(name: &str, number: i32) -> FieldDescriptorProto {
    typed(name, number, Type::Enum, ".catalog.v1.ProductType")
}

fn timestamp_field(name: &str, number: i32) -> FieldDescriptorProto {
    typed(name, number, Type::Message, TIMESTAMP)
}

/// Message with plain fields only.
fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

/// Message whose listed fields are proto3 `optional`. Each gets its own
/// synthetic oneof, named `_<field>` the way protoc names them.
fn message_with_optionals(
    name: &str,
    mut fields: Vec<FieldDescriptorProto>,
    optional: &[&str],
) -> DescriptorProto {
    let mut oneofs = Vec::new();
    for f in fields.iter_mut() {
        let Some(field_name) = f.name.clone() else {
            continue;
        };
        if optional.contains(&field_name.as_str()) {
            f.proto3_optional = Some(true);
            f.oneof_index = Some(oneofs.len() as i32);
            oneofs.push(OneofDescriptorProto {
                name: Some(format!("_{field_name}")),
                ..Default::default()
            });
        }
    }
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        oneof_decl: oneofs,
        ..Default::default()
    }
}

fn method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(format!(".catalog.v1.{input}")),
        output_type: Some(format!(".catalog.v1.{output}")),
        ..Default::default()
    }
}

fn crud_service(name: &str, entity: &str, plural: &str) -> ServiceDescriptorProto {
    let rpc = |verb: &str, noun: &str| {
        method(
            &format!("{verb}{noun}"),
            &format!("{verb}{noun}Request"),
            &format!("{verb}{noun}Response"),
        )
    };
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: vec![
            rpc("Create", entity),
            rpc("Get", entity),
            rpc("Update", entity),
            rpc("Delete", entity),
            rpc("List", plural),
        ],
        ..Default::default()
    }
}

fn product_messages() -> Vec<DescriptorProto> {
    let variants = |base: i32| {
        vec![
            message_field("digital_product", base, "DigitalProduct"),
            message_field("physical_product", base + 1, "PhysicalProduct"),
            message_field("subscription_product", base + 2, "SubscriptionProduct"),
        ]
    };
    let wrapper = |name: &str| message(name, vec![message_field("product", 1, "Product")]);

    let mut product = vec![
        field("id", 1, Type::String),
        field("name", 2, Type::String),
        field("description", 3, Type::String),
        field("price", 4, Type::Double),
        product_type_field("type", 5),
    ];
    product.extend(variants(6));
    product.push(timestamp_field("created_at", 9));
    product.push(timestamp_field("updated_at", 10));

    let mut create = vec![
        field("name", 1, Type::String),
        field("description", 2, Type::String),
        field("price", 3, Type::Double),
        product_type_field("type", 4),
    ];
    create.extend(variants(5));

    let mut update = vec![
        field("id", 1, Type::String),
        field("name", 2, Type::String),
        field("description", 3, Type::String),
        field("price", 4, Type::Double),
    ];
    update.extend(variants(5));

    vec![
        message(
            "DigitalProduct",
            vec![field("file_size", 1, Type::Int64), field("download_link", 2, Type::String)],
        ),
        message(
            "PhysicalProduct",
            vec![field("weight", 1, Type::Double), field("dimensions", 2, Type::String)],
        ),
        message(
            "SubscriptionProduct",
            vec![
                field("subscription_period", 1, Type::String),
                field("renewal_price", 2, Type::Double),
            ],
        ),
        message("Product", product),
        message("CreateProductRequest", create),
        wrapper("CreateProductResponse"),
        message("GetProductRequest", vec![field("id", 1, Type::String)]),
        wrapper("GetProductResponse"),
        message_with_optionals("UpdateProductRequest", update, &["name", "description", "price"]),
        wrapper("UpdateProductResponse"),
        message("DeleteProductRequest", vec![field("id", 1, Type::String)]),
        message("DeleteProductResponse", vec![field("success", 1, Type::Bool)]),
        message_with_optionals(
            "ListProductsRequest",
            vec![
                product_type_field("type", 1),
                field("page", 2, Type::Int32),
                field("page_size", 3, Type::Int32),
            ],
            &["type"],
        ),
        message(
            "ListProductsResponse",
            vec![
                repeated("products", 1, "Product"),
                field("total", 2, Type::Int64),
                field("page", 3, Type::Int32),
                field("page_size", 4, Type::Int32),
            ],
        ),
    ]
}

fn plan_messages() -> Vec<DescriptorProto> {
    let wrapper = |name: &str| {
        message(
            name,
            vec![message_field("subscription_plan", 1, "SubscriptionPlan")],
        )
    };

    vec![
        message(
            "SubscriptionPlan",
            vec![
                field("id", 1, Type::String),
                field("product_id", 2, Type::String),
                field("plan_name", 3, Type::String),
                field("duration", 4, Type::Int32),
                field("price", 5, Type::Double),
                timestamp_field("created_at", 6),
                timestamp_field("updated_at", 7),
            ],
        ),
        message(
            "CreateSubscriptionPlanRequest",
            vec![
                field("product_id", 1, Type::String),
                field("plan_name", 2, Type::String),
                field("duration", 3, Type::Int32),
                field("price", 4, Type::Double),
            ],
        ),
        wrapper("CreateSubscriptionPlanResponse"),
        message("GetSubscriptionPlanRequest", vec![field("id", 1, Type::String)]),
        wrapper("GetSubscriptionPlanResponse"),
        message_with_optionals(
            "UpdateSubscriptionPlanRequest",
            vec![
                field("id", 1, Type::String),
                field("plan_name", 2, Type::String),
                field("duration", 3, Type::Int32),
                field("price", 4, Type::Double),
            ],
            &["plan_name", "duration", "price"],
        ),
        wrapper("UpdateSubscriptionPlanResponse"),
        message("DeleteSubscriptionPlanRequest", vec![field("id", 1, Type::String)]),
        message("DeleteSubscriptionPlanResponse", vec![field("success", 1, Type::Bool)]),
        message(
            "ListSubscriptionPlansRequest",
            vec![
                field("product_id", 1, Type::String),
                field("page", 2, Type::Int32),
                field("page_size", 3, Type::Int32),
            ],
        ),
        message(
            "ListSubscriptionPlansResponse",
            vec![
                repeated("subscription_plans", 1, "SubscriptionPlan"),
                field("total", 2, Type::Int64),
                field("page", 3, Type::Int32),
                field("page_size", 4, Type::Int32),
            ],
        ),
    ]
}

fn product_type_enum() -> EnumDescriptorProto {
    let value = |name: &str, number: i32| EnumValueDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        ..Default::default()
    };
    EnumDescriptorProto {
        name: Some("ProductType".to_string()),
        value: vec![
            value("PRODUCT_TYPE_UNSPECIFIED", 0),
            value("PRODUCT_TYPE_DIGITAL", 1),
            value("PRODUCT_TYPE_PHYSICAL", 2),
            value("PRODUCT_TYPE_SUBSCRIPTION", 3),
        ],
        ..Default::default()
    }
}

fn timestamp_file() -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(TIMESTAMP_FILE.to_string()),
        package: Some("google.protobuf".to_string()),
        message_type: vec![message(
            "Timestamp",
            vec![field("seconds", 1, Type::Int64), field("nanos", 2, Type::Int32)],
        )],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

fn catalog_file() -> FileDescriptorProto {
    let mut messages = product_messages();
    messages.extend(plan_messages());
    messages.push(message("HealthRequest", Vec::new()));
    messages.push(message("HealthResponse", vec![field("status", 1, Type::String)]));

    FileDescriptorProto {
        name: Some(CATALOG_FILE.to_string()),
        package: Some(crate::proto::PACKAGE.to_string()),
        dependency: vec![TIMESTAMP_FILE.to_string()],
        message_type: messages,
        enum_type: vec![product_type_enum()],
        service: vec![
            crud_service("ProductService", "Product", "Products"),
            crud_service("SubscriptionService", "SubscriptionPlan", "SubscriptionPlans"),
            ServiceDescriptorProto {
                name: Some("HealthService".to_string()),
                method: vec![method("Health", "HealthRequest", "HealthResponse")],
                ..Default::default()
            },
        ],
        syntax: Some("proto3".to_string()),
        ..Default::default()
    }
}

/// Descriptor set covering `catalog.v1` and its timestamp import.
pub fn file_descriptor_set() -> FileDescriptorSet {
    FileDescriptorSet {
        file: vec![timestamp_file(), catalog_file()],
    }
}
