mod common;

use std::sync::Arc;

use miette::Diagnostic;
use shape_hydrate::{
    HydrateConfig, HydrateErrorKind, Hydrator, PathSegment, RawData, Registry, Schema,
    TypedObject, Value,
};

#[facet_testhelpers::test]
fn unknown_top_level_variant() {
    let registry = common::registry();
    let err = Hydrator::new(&registry)
        .create("Ghost", RawData::new())
        .unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown variant `Ghost`");
}

#[facet_testhelpers::test]
fn unknown_nested_variant_is_fatal() {
    let registry = Registry::new().with(common::order());
    let raw = RawData::new().with("customer", RawData::new().with("name", "Ada"));
    let err = Hydrator::new(&registry).create("Order", raw).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"unknown variant `Customer` (at `customer`)");
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("shape_hydrate::unknown_variant")
    );
    assert!(err.help().is_some());
}

#[facet_testhelpers::test]
fn unknown_variant_is_not_reached_when_key_is_absent() {
    let registry = Registry::new().with(common::order());
    let order = Hydrator::new(&registry)
        .create("Order", RawData::new().with("order_id", 1))
        .unwrap();
    assert_eq!(order.value("id"), Some(&Value::from(1)));
}

#[facet_testhelpers::test]
fn collection_value_must_be_a_list() {
    let registry = common::registry();
    let raw = RawData::new().with("lines", "oops");
    let err = Hydrator::new(&registry).create("Order", raw).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"expected a list, found string "oops" (at `lines`)"#);
}

#[facet_testhelpers::test]
fn collection_elements_must_be_mappings() {
    let registry = common::registry();
    let raw = RawData::new().with(
        "lines",
        vec![Value::from(RawData::new().with("sku", "A")), Value::from(3)],
    );
    let err = Hydrator::new(&registry).create("Order", raw).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"expected a mapping, found i64 3 (at `lines[1]`)");
    assert_eq!(
        err.path.segments(),
        &[PathSegment::Field("lines".to_string()), PathSegment::Index(1)]
    );
}

#[facet_testhelpers::test]
fn nested_object_value_must_be_a_mapping() {
    let registry = common::registry();
    let raw = RawData::new().with("customer", 5);
    let err = Hydrator::new(&registry).create("Order", raw).unwrap_err();

    assert!(matches!(
        err.kind,
        HydrateErrorKind::MalformedShape {
            expected: "mapping",
            ..
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"expected a mapping, found i64 5 (at `customer`)");
}

#[facet_testhelpers::test]
fn prebuilt_object_of_another_variant_is_rejected() {
    let registry = common::registry();
    let hydrator = Hydrator::new(&registry);
    let line = hydrator
        .create("Line", RawData::new().with("sku", "A-1"))
        .unwrap();

    let err = hydrator
        .create("Order", RawData::new().with("customer", line))
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"expected a prebuilt `Customer`, found a prebuilt `Line` (at `customer`)");
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("shape_hydrate::variant_mismatch")
    );
}

#[facet_testhelpers::test]
fn prebuilt_collection_element_of_another_variant_is_rejected() {
    let registry = common::registry();
    let hydrator = Hydrator::new(&registry);
    let ada = hydrator
        .create("Customer", RawData::new().with("name", "Ada"))
        .unwrap();

    let raw = RawData::new().with(
        "lines",
        vec![Value::from(RawData::new().with("sku", "A")), Value::from(ada)],
    );
    let err = hydrator.create("Order", raw).unwrap_err();

    assert_eq!(
        err.kind,
        HydrateErrorKind::VariantMismatch {
            expected: "Line".to_string(),
            found: "Customer".to_string(),
        }
    );
    insta::assert_snapshot!(err.path.to_string(), @"lines[1]");
}

#[facet_testhelpers::test]
fn strict_policy_reports_failed_casts_with_full_path() {
    let registry = common::registry();
    let raw = RawData::new().with("lines", vec![RawData::new().with("qty", "x")]);
    let err = Hydrator::new(&registry)
        .with_config(HydrateConfig::new().strict())
        .create("Order", raw)
        .unwrap_err();

    insta::assert_snapshot!(err.to_string(), @r#"cannot cast string "x" to integer (at `lines[0].qty`)"#);
}

#[facet_testhelpers::test]
fn failed_hydration_leaves_target_untouched() {
    let registry = common::registry();
    let schema = Arc::clone(registry.get("Order").unwrap());
    let raw = RawData::new()
        .with("order_id", 3)
        .with("lines", "not a list");
    let mut order = TypedObject::new(schema, raw.clone());

    assert!(Hydrator::new(&registry).hydrate(&mut order).is_err());
    assert!(!order.is_hydrated());
    assert_eq!(order.fields().count(), 0);
    assert_eq!(order.raw(), &raw);
}

#[facet_testhelpers::test]
fn validate_accepts_a_complete_acyclic_registry() {
    common::registry().validate().unwrap();
}

#[facet_testhelpers::test]
fn validate_reports_dangling_references() {
    let err = Registry::new().with(common::order()).validate().unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown variant `Customer` (at `Order.customer`)");
}

#[facet_testhelpers::test]
fn validate_reports_cycles() {
    let registry = Registry::new()
        .with(Schema::builder("A").object("b", "B").build())
        .with(Schema::builder("B").collection("children", "A").build());
    let err = registry.validate().unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"variant graph has a cycle: A -> B -> A");
    assert_eq!(
        err.code().map(|c| c.to_string()).as_deref(),
        Some("shape_hydrate::cyclic_schema")
    );
}

#[facet_testhelpers::test]
fn self_reference_is_a_cycle() {
    let registry = Registry::new().with(Schema::builder("Node").collection("children", "Node").build());
    let err = registry.validate().unwrap_err();
    assert_eq!(
        err.kind,
        HydrateErrorKind::CyclicSchema {
            cycle: vec!["Node".to_string(), "Node".to_string()]
        }
    );
}
