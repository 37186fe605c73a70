//! End-to-end round-trip coverage for the codec facade.

use proptest::prelude::*;
use redbind::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Account {
    name: String,
    score: i64,
    ratio: f64,
    active: bool,
    tags: Vec<String>,
    note: Option<String>,
}

fn account() -> Account {
    Account {
        name: "ada".into(),
        score: 1200,
        ratio: 0.75,
        active: true,
        tags: vec!["alpha".into(), "beta".into()],
        note: None,
    }
}

#[test]
fn fields_round_trip_default_config() {
    let codec = Codec::default();
    let fields = codec.encode_fields(&account()).unwrap();
    let restored: Account = codec.decode_fields(&fields).unwrap();
    assert_eq!(restored, account());
}

#[test]
fn fields_round_trip_with_all_strategies_changed() {
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Audit {
        user_id: i64,
        is_admin: bool,
        display_name: Option<String>,
    }

    let audit = Audit {
        user_id: 9,
        is_admin: true,
        display_name: None,
    };
    let codec = Codec::new(
        CodecConfig::default()
            .with_booleans(BoolCoding::Int)
            .with_field_names(FieldNaming::CamelCase)
            .with_null_fields(NullFields::Emit),
    );
    let fields = codec.encode_fields(&audit).unwrap();

    // Wire names carry the camelCase rendering; the boolean travels as an
    // integer and the absent optional as an explicit null.
    assert_eq!(
        fields,
        vec![
            ("userId".to_string(), RespValue::Int(9)),
            ("isAdmin".to_string(), RespValue::Int(1)),
            ("displayName".to_string(), RespValue::Null),
        ]
    );

    let restored: Audit = codec.decode_fields(&fields).unwrap();
    assert_eq!(restored, audit);
}

#[test]
fn single_value_round_trips() {
    let codec = Codec::default();

    let wire = codec.encode_value(&42_i64).unwrap();
    assert_eq!(codec.decode::<i64>(&wire).unwrap(), 42);

    let wire = codec.encode_value(&vec![1_i64, 2, 3]).unwrap();
    assert_eq!(codec.decode::<Vec<i64>>(&wire).unwrap(), vec![1, 2, 3]);

    let wire = codec.encode_value(&("pair", 7_i64)).unwrap();
    assert_eq!(
        codec.decode::<(String, i64)>(&wire).unwrap(),
        ("pair".to_string(), 7)
    );

    let wire = codec.encode_value(&Some(5_i64)).unwrap();
    assert_eq!(codec.decode::<Option<i64>>(&wire).unwrap(), Some(5));
    assert_eq!(
        codec.decode::<Option<i64>>(&RespValue::Null).unwrap(),
        None
    );
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Point {
    x: i64,
    y: i64,
}

#[test]
fn records_nested_in_arrays_round_trip_as_blobs() {
    let codec = Codec::default();
    let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];

    let wire = codec.encode_value(&points).unwrap();
    // Each element travels as opaque blob bytes.
    match &wire {
        RespValue::Array(items) => {
            assert!(items.iter().all(|item| matches!(item, RespValue::Bulk(_))));
        }
        other => panic!("expected array, got {:?}", other),
    }

    let restored: Vec<Point> = codec.decode(&wire).unwrap();
    assert_eq!(restored, points);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Event {
    label: String,
    at: Timestamp,
}

#[test]
fn timestamps_round_trip_under_each_strategy() {
    let at = Timestamp::from_unix_millis(1_700_000_000_123).unwrap();
    let event = Event {
        label: "deploy".into(),
        at,
    };

    for dates in [
        DateCoding::UnixSeconds,
        DateCoding::UnixMillis,
        DateCoding::Iso8601,
        DateCoding::Deferred,
    ] {
        let codec = Codec::new(CodecConfig::default().with_dates(dates));
        let fields = codec.encode_fields(&event).unwrap();
        let restored: Event = codec.decode_fields(&fields).unwrap();
        if matches!(dates, DateCoding::UnixSeconds) {
            // Whole-second strategy drops sub-second precision.
            assert_eq!(restored.at.unix_seconds(), at.unix_seconds());
        } else {
            assert_eq!(restored, event);
        }
    }
}

#[test]
fn prebuilt_wire_values_pass_through_unchanged() {
    let codec = Codec::default();
    let prebuilt = RespValue::Array(vec![
        RespValue::simple("OK"),
        RespValue::Int(9),
        RespValue::Null,
    ]);

    let wire = codec.encode_value(&prebuilt).unwrap();
    assert_eq!(wire, prebuilt);

    let back: RespValue = codec.decode(&wire).unwrap();
    assert_eq!(back, prebuilt);
}

proptest! {
    #[test]
    fn prop_fields_round_trip(
        name in "[a-zA-Z0-9_]{0,10}",
        score in any::<i64>(),
        ratio in -1.0e9_f64..1.0e9,
        active in any::<bool>(),
        tags in proptest::collection::vec("[a-z]{0,8}", 0..4),
        note in proptest::option::of("[a-z ]{0,8}"),
    ) {
        let account = Account { name, score, ratio, active, tags, note };
        let codec = Codec::default();
        let fields = codec.encode_fields(&account).unwrap();
        let restored: Account = codec.decode_fields(&fields).unwrap();
        prop_assert_eq!(restored, account);
    }
}
