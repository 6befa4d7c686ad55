use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use tagmap::{
    Bytes, CapabilityError, Decoder, Encoder, Opaque, Value, custom_field, fill_by_key, map, map_fields,
    map_flatten, map_with_fallback, record,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scalars {
    flag: bool,
    small: i8,
    count: i32,
    big: u64,
    ratio: f32,
    score: f64,
    name: String,
    blob: Bytes,
}
record!(Scalars {
    flag { t: "flag" },
    small { t: "small,omitempty" },
    count { t: "count" },
    big { t: "big,string" },
    ratio { t: "ratio" },
    score { t: "score" },
    name { t: "name" },
    blob { t: "blob" },
});

fn scalars() -> Scalars {
    Scalars {
        flag: true,
        small: -3,
        count: 1_000,
        big: u64::MAX,
        ratio: 0.25,
        score: 99.5,
        name: "Alice".into(),
        blob: Bytes(vec![1, 2, 3]),
    }
}

#[test]
fn scalar_record_round_trips() {
    let source = scalars();
    let snapshot = map(&source, "t");
    assert_eq!(snapshot.len(), 8);
    let mut sink = Scalars::default();
    fill_by_key(&mut sink, &snapshot, "t").unwrap();
    assert_eq!(sink, source);
}

#[test]
fn keys_drop_modifier_suffixes() {
    let snapshot = map(&scalars(), "t");
    assert_eq!(snapshot["small"], Value::I8(-3));
    assert_eq!(snapshot["big"], Value::U64(u64::MAX));
    assert_eq!(snapshot["blob"], Value::Bytes(vec![1, 2, 3]));
    assert!(!snapshot.contains_key("small,omitempty"));
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Partly {
    shown: i64,
    hidden: i64,
    other: String,
}
record!(Partly {
    shown { json: "shown" },
    hidden,
    other { db: "other" },
});

#[test]
fn ineligible_fields_are_omitted() {
    let partly = Partly {
        shown: 1,
        hidden: 2,
        other: "x".into(),
    };
    let snapshot = map(&partly, "json");
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot["shown"], Value::I64(1));

    let by_name = map_fields(&partly);
    assert_eq!(by_name.len(), 3);
    assert_eq!(by_name["hidden"], Value::I64(2));
    assert_eq!(by_name["other"], Value::Text("x".into()));
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Inner {
    label: String,
}
record!(Inner {
    label { json: "label" },
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Holder {
    inner: Option<Inner>,
    count: Option<i64>,
    items: Option<Vec<i64>>,
    when: Option<DateTime<Utc>>,
    boxed: Option<Box<Inner>>,
}
record!(Holder {
    inner { json: "inner" },
    count { json: "count" },
    items { json: "items" },
    when { json: "when" },
    boxed { json: "boxed" },
});

#[test]
fn absent_values_map_to_null_and_fill_back_to_none() {
    let snapshot = map(&Holder::default(), "json");
    assert_eq!(snapshot.len(), 5);
    assert!(snapshot.values().all(Value::is_null));

    let mut sink = Holder::default();
    fill_by_key(&mut sink, &snapshot, "json").unwrap();
    assert_eq!(sink, Holder::default());
}

#[test]
fn present_pointers_are_dereferenced() {
    let holder = Holder {
        inner: Some(Inner { label: "in".into() }),
        count: Some(4),
        items: Some(vec![1, 2]),
        when: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()),
        boxed: Some(Box::new(Inner { label: "boxed".into() })),
    };
    let snapshot = map(&holder, "json");
    assert_eq!(snapshot["count"], Value::I64(4));
    assert_eq!(snapshot["items"], Value::Seq(vec![Value::I64(1), Value::I64(2)]));
    assert_eq!(snapshot["inner"].as_map().unwrap()["label"], Value::Text("in".into()));
    assert_eq!(snapshot["boxed"].as_map().unwrap()["label"], Value::Text("boxed".into()));
    assert!(matches!(snapshot["when"], Value::Time(_)));

    let mut sink = Holder::default();
    fill_by_key(&mut sink, &snapshot, "json").unwrap();
    assert_eq!(sink, holder);
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Nested {
    code: String,
}
record!(Nested {
    code { json: "code_json" },
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tagged {
    both: i64,
    json_only: i64,
    api_only: i64,
    neither: i64,
    nested: Nested,
}
record!(Tagged {
    both { api: "api_both", json: "json_both" },
    json_only { json: "json_only" },
    api_only { api: "api_only" },
    neither,
    nested { json: "nested" },
});

#[test]
fn fallback_uses_secondary_key_only_when_primary_is_missing() {
    let tagged = Tagged {
        both: 1,
        json_only: 2,
        api_only: 3,
        neither: 4,
        nested: Nested { code: "c".into() },
    };
    let snapshot = map_with_fallback(&tagged, "api", &["json"]);
    let mut keys: Vec<&str> = snapshot.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(keys, vec!["api_both", "api_only", "json_only", "nested"]);
    assert_eq!(snapshot["api_both"], Value::I64(1));
    assert_eq!(snapshot["json_only"], Value::I64(2));
    // nested fields resolve under the key that won for the parent field
    assert_eq!(
        snapshot["nested"].as_map().unwrap()["code_json"],
        Value::Text("c".into())
    );

    let plain = map(&tagged, "api");
    assert_eq!(plain.len(), 2);
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Base {
    id: i64,
    label: String,
}
record!(Base {
    id { json: "id" },
    label { json: "label" },
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Extra {
    label: String,
    note: String,
}
record!(Extra {
    label { json: "label" },
    note { json: "note" },
});

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Combined {
    base: Box<Base>,
    extra: Option<Extra>,
    missing: Option<Extra>,
    title: String,
    skipped: i64,
}
record!(Combined {
    base,
    extra,
    missing,
    title { json: "title" },
    skipped,
});

#[test]
fn flatten_inlines_untagged_records_and_last_write_wins() {
    let combined = Combined {
        base: Box::new(Base {
            id: 9,
            label: "from base".into(),
        }),
        extra: Some(Extra {
            label: "from extra".into(),
            note: "n".into(),
        }),
        missing: None,
        title: "t".into(),
        skipped: 1,
    };
    let snapshot = map_flatten(&combined, "json");
    assert_eq!(snapshot.len(), 4);
    assert_eq!(snapshot["id"], Value::I64(9));
    assert_eq!(snapshot["label"], Value::Text("from extra".into()));
    assert_eq!(snapshot["note"], Value::Text("n".into()));
    assert_eq!(snapshot["title"], Value::Text("t".into()));
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Celsius(f64);

impl Encoder for Celsius {
    fn encode(&self) -> Result<Value, CapabilityError> {
        if self.0 < -273.15 {
            return Err("below absolute zero".into());
        }
        Ok(Value::Text(format!("{}C", self.0)))
    }
}
impl Decoder for Celsius {
    fn decode(&mut self, value: &Value) -> Result<(), CapabilityError> {
        let text = value.as_str().ok_or("expected text")?;
        let degrees = text.strip_suffix('C').ok_or("missing unit")?;
        self.0 = degrees.parse().map_err(CapabilityError::new)?;
        Ok(())
    }
}
custom_field!(Celsius);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reading {
    inside: Celsius,
    outside: Celsius,
    taken: DateTime<FixedOffset>,
}
record!(Reading {
    inside { json: "inside" },
    outside { json: "outside" },
    taken { json: "taken" },
});

#[test]
fn encoders_are_used_and_failures_degrade_to_null() {
    let taken = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .unwrap();
    let reading = Reading {
        inside: Celsius(21.5),
        outside: Celsius(-300.0),
        taken,
    };
    let snapshot = map(&reading, "json");
    assert_eq!(snapshot["inside"], Value::Text("21.5C".into()));
    assert_eq!(snapshot["outside"], Value::Null);
    assert_eq!(snapshot["taken"], Value::Time(taken));
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Handle(u32);

impl Encoder for Handle {
    fn encode(&self) -> Result<Value, CapabilityError> {
        Ok(Value::Opaque(Opaque::new(self.clone())))
    }
}
impl Decoder for Handle {
    fn decode(&mut self, value: &Value) -> Result<(), CapabilityError> {
        match value {
            Value::Opaque(opaque) => {
                let handle = opaque.downcast_ref::<Handle>().ok_or("not a handle")?;
                *self = handle.clone();
                Ok(())
            }
            _ => Err("not a handle".into()),
        }
    }
}
custom_field!(Handle);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Owner {
    handle: Handle,
}
record!(Owner { handle });

#[test]
fn opaque_values_pass_through_untouched() {
    let owner = Owner { handle: Handle(42) };
    let snapshot = map_fields(&owner);
    let Value::Opaque(opaque) = &snapshot["handle"] else {
        panic!("expected an opaque value");
    };
    assert!(opaque.is::<Handle>());
    assert_eq!(opaque.downcast_ref::<Handle>(), Some(&Handle(42)));

    let mut sink = Owner::default();
    tagmap::fill(&mut sink, &snapshot).unwrap();
    assert_eq!(sink, owner);
}
