#![allow(dead_code)]

use shape_hydrate::{
    Coercion, DeclaredType, FieldSchema, RawData, Registry, ScalarKind, Schema, TypeTag, Value,
};

pub fn customer() -> Schema {
    Schema::builder("Customer")
        .scalar("name", ScalarKind::String)
        .field(
            FieldSchema::new("vip", DeclaredType::scalar(ScalarKind::Boolean))
                .coerce(ScalarKind::Boolean),
        )
        .build()
}

pub fn line() -> Schema {
    Schema::builder("Line")
        .scalar("sku", ScalarKind::String)
        .field(
            FieldSchema::new("qty", DeclaredType::scalar(ScalarKind::Integer))
                .coerce(ScalarKind::Integer),
        )
        .build()
}

pub fn order() -> Schema {
    Schema::builder("Order")
        .field(FieldSchema::new("id", DeclaredType::scalar(ScalarKind::Integer)).rename("order_id"))
        .object("customer", "Customer")
        .collection("lines", "Line")
        .field(FieldSchema::new(
            "contact",
            DeclaredType::union([
                TypeTag::object("Customer"),
                TypeTag::Scalar(ScalarKind::String),
            ]),
        ))
        .field(
            FieldSchema::new("count", DeclaredType::scalar(ScalarKind::Integer))
                .coerce(ScalarKind::Integer),
        )
        .field(
            FieldSchema::new("total", DeclaredType::scalar(ScalarKind::Integer)).coerce(
                Coercion::transform(|value, raw| {
                    let shipping = raw.get("shipping").and_then(Value::as_i64).unwrap_or(0);
                    Value::from(value.as_i64().unwrap_or(0) + shipping)
                }),
            ),
        )
        .field(FieldSchema::new("memo", DeclaredType::Untyped))
        .build()
}

pub fn registry() -> Registry {
    Registry::new().with(customer()).with(line()).with(order())
}

pub fn order_raw() -> RawData {
    RawData::new()
        .with("order_id", 7)
        .with("customer", RawData::new().with("name", "Ada").with("vip", "yes"))
        .with(
            "lines",
            vec![
                RawData::new().with("sku", "A-1").with("qty", "2"),
                RawData::new().with("sku", "B-2").with("qty", 5),
            ],
        )
        .with("contact", "ada@example.com")
        .with("total", 40)
        .with("shipping", 5)
        .with("memo", "ignored")
}
