#![cfg(feature = "json")]

mod common;

use shape_hydrate::{HydrateErrorKind, Hydrator, RawData, Scalar, Value};

#[facet_testhelpers::test]
fn hydrates_decoded_json() {
    let json = serde_json::json!({
        "order_id": 11,
        "customer": { "name": "Grace", "vip": 1 },
        "lines": [
            { "sku": "X", "qty": "3" },
            { "sku": "Y", "qty": 4.0 }
        ],
        "total": 10,
        "shipping": 2
    });
    let raw = RawData::try_from(json).unwrap();
    let registry = common::registry();
    let order = Hydrator::new(&registry).create("Order", raw).unwrap();

    insta::assert_snapshot!(order.to_string(), @r#"Order { id: 11, customer: Customer { name: "Grace", vip: true }, lines: [Line { sku: "X", qty: 3 }, Line { sku: "Y", qty: 4 }], total: 12 }"#);
}

#[facet_testhelpers::test]
fn json_key_order_is_preserved() {
    let raw: RawData = serde_json::from_str::<serde_json::Value>(r#"{"z": 1, "a": 2, "m": 3}"#)
        .unwrap()
        .try_into()
        .unwrap();
    assert_eq!(raw.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
}

#[facet_testhelpers::test]
fn json_numbers_keep_their_kind() {
    let value = Value::from(serde_json::json!([1, -1, 18446744073709551615u64, 1.5, null]));
    assert_eq!(
        value,
        Value::List(vec![
            Value::Scalar(Scalar::I64(1)),
            Value::Scalar(Scalar::I64(-1)),
            Value::Scalar(Scalar::U64(u64::MAX)),
            Value::Scalar(Scalar::F64(1.5)),
            Value::NULL,
        ])
    );
}

#[facet_testhelpers::test]
fn top_level_json_must_be_an_object() {
    let err = RawData::try_from(serde_json::json!([1, 2])).unwrap_err();
    assert!(matches!(
        err.kind,
        HydrateErrorKind::MalformedShape {
            expected: "mapping",
            ..
        }
    ));
}
