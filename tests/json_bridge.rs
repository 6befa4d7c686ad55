use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tagmap::json::{from_json, to_json};
use tagmap::{Value, fill_by_key, map, record};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Line {
    sku: String,
    quantity: Option<i64>,
}
record!(Line {
    sku { json: "sku" },
    quantity { json: "qty,omitempty" },
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Order {
    number: i64,
    placed: DateTime<Utc>,
    paid: bool,
    total: f64,
    lines: Vec<Option<Line>>,
    scores: Vec<i32>,
}
record!(Order {
    number { json: "number" },
    placed { json: "placed" },
    paid { json: "paid" },
    total { json: "total" },
    lines { json: "lines" },
    scores { json: "scores" },
});

fn order() -> Order {
    Order {
        number: 1001,
        placed: Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 1).unwrap(),
        paid: true,
        total: 19.5,
        lines: vec![
            Some(Line {
                sku: "A-1".into(),
                quantity: Some(2),
            }),
            None,
            Some(Line {
                sku: "B-2".into(),
                quantity: None,
            }),
        ],
        scores: vec![3, -1],
    }
}

#[test]
fn snapshot_survives_a_json_text_round_trip() {
    let source = order();
    let text = serde_json::to_string(&to_json(&map(&source, "json"))).unwrap();
    let parsed = from_json(serde_json::from_str(&text).unwrap()).unwrap();
    // times travel as RFC 3339 text and are parsed back during fill
    assert_eq!(parsed["placed"], Value::Text("2024-02-29T23:59:01+00:00".into()));

    let mut sink = Order::default();
    fill_by_key(&mut sink, &parsed, "json").unwrap();
    assert_eq!(sink, source);
}

#[test]
fn json_numbers_become_widest_values() {
    let value = Value::from(json!({"n": -1, "u": u64::MAX, "f": 0.5, "list": [null, "x"]}));
    let map = value.as_map().unwrap();
    assert_eq!(map["n"], Value::I64(-1));
    assert_eq!(map["u"], Value::U64(u64::MAX));
    assert_eq!(map["f"], Value::F64(0.5));
    assert_eq!(map["list"], Value::Seq(vec![Value::Null, Value::Text("x".into())]));
}

#[test]
fn only_objects_become_snapshots() {
    assert!(from_json(json!([1, 2])).is_none());
    assert!(from_json(json!({})).unwrap().is_empty());
}

#[test]
fn values_serialize_through_the_bridge() {
    let value = Value::Seq(vec![Value::Bytes(vec![7, 8]), Value::U8(1), Value::Null]);
    assert_eq!(serde_json::to_value(&value).unwrap(), json!([[7, 8], 1, null]));
}
