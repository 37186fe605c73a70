//! Command-facing behavior: argument flattening, hash projections, and the
//! decode failure contract.

use redbind::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Counters {
    a: i64,
    b: i64,
}

#[test]
fn argument_list_interleaves_names_and_values() {
    let codec = Codec::default();
    let args = codec.encode_args(&Counters { a: 1, b: 2 }).unwrap();
    assert_eq!(
        args,
        vec![
            RespValue::bulk(*b"a"),
            RespValue::Int(1),
            RespValue::bulk(*b"b"),
            RespValue::Int(2),
        ]
    );
}

#[test]
fn singleton_array_field_collapses_to_bare_scalar() {
    #[derive(Serialize)]
    struct Row {
        xs: Vec<i64>,
    }

    let codec = Codec::default();

    let args = codec.encode_args(&Row { xs: vec![5] }).unwrap();
    assert_eq!(args, vec![RespValue::bulk(*b"xs"), RespValue::Int(5)]);

    // Multi-element arrays are preserved.
    let args = codec.encode_args(&Row { xs: vec![5, 6] }).unwrap();
    assert_eq!(
        args,
        vec![
            RespValue::bulk(*b"xs"),
            RespValue::Array(vec![RespValue::Int(5), RespValue::Int(6)]),
        ]
    );
}

#[test]
fn prebuilt_argument_array_passes_through_unwrapped() {
    let codec = Codec::default();
    let command = RespValue::Array(vec![
        RespValue::bulk(*b"SET"),
        RespValue::bulk(*b"key"),
        RespValue::bulk(*b"value"),
    ]);
    let args = codec.encode_args(&command).unwrap();
    assert_eq!(
        args,
        vec![
            RespValue::bulk(*b"SET"),
            RespValue::bulk(*b"key"),
            RespValue::bulk(*b"value"),
        ]
    );
}

#[test]
fn scalar_becomes_single_argument() {
    let codec = Codec::default();
    assert_eq!(
        codec.encode_args(&"ping").unwrap(),
        vec![RespValue::bulk(*b"ping")]
    );
}

// === Nested records in flat contexts ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Profile {
    user: String,
    meta: Meta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Meta {
    region: String,
    tier: i64,
}

#[test]
fn nested_record_in_fields_projection_routes_through_blob() {
    let codec = Codec::default();
    let profile = Profile {
        user: "ada".into(),
        meta: Meta {
            region: "eu".into(),
            tier: 2,
        },
    };

    // Must not raise a structural error: the nested record travels as an
    // opaque payload.
    let fields = codec.encode_fields(&profile).unwrap();
    assert_eq!(fields[0], ("user".to_string(), RespValue::bulk(*b"ada")));
    assert!(matches!(fields[1].1, RespValue::Bulk(_)));

    let restored: Profile = codec.decode_fields(&fields).unwrap();
    assert_eq!(restored, profile);
}

#[test]
fn top_level_record_has_no_single_value_form() {
    let codec = Codec::default();
    let err = codec
        .encode_value(&Counters { a: 1, b: 2 })
        .unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedShape { .. }));
}

// === Decode failure contract ===

#[derive(Debug, PartialEq, Deserialize)]
struct Login {
    user: String,
    attempts: i64,
    last_ip: Option<String>,
}

#[test]
fn missing_required_field_is_key_not_found() {
    let codec = Codec::default();
    let fields = vec![
        ("user".to_string(), RespValue::bulk(*b"ada")),
        ("last_ip".to_string(), RespValue::bulk(*b"10.0.0.1")),
    ];
    let err = codec.decode_fields::<Login>(&fields).unwrap_err();
    match err {
        CodecError::KeyNotFound { key, .. } => assert_eq!(key, "attempts"),
        other => panic!("expected KeyNotFound, got {:?}", other),
    }
}

#[test]
fn missing_optional_field_decodes_to_none() {
    let codec = Codec::default();
    let fields = vec![
        ("user".to_string(), RespValue::bulk(*b"ada")),
        ("attempts".to_string(), RespValue::Int(1)),
    ];
    let login: Login = codec.decode_fields(&fields).unwrap();
    assert_eq!(
        login,
        Login {
            user: "ada".into(),
            attempts: 1,
            last_ip: None,
        }
    );
}

#[test]
fn type_mismatch_names_path_and_expectation() {
    let codec = Codec::default();
    let err = codec.decode::<i64>(&RespValue::Array(vec![])).unwrap_err();
    match err {
        CodecError::TypeMismatch {
            expected, found, ..
        } => {
            assert_eq!(expected, "Int");
            assert_eq!(found, "Array");
        }
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

#[test]
fn array_cursor_past_end_is_exhausted() {
    let codec = Codec::default();
    let wire = RespValue::Array(vec![RespValue::Int(1), RespValue::Int(2)]);
    let err = codec.decode::<(i64, i64, i64)>(&wire).unwrap_err();
    assert!(matches!(err, CodecError::Exhausted { .. }));
}

// === Boolean strategies across the full pipeline ===

#[test]
fn boolean_strategies_are_exact_inverses() {
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Flag {
        on: bool,
    }

    let text = Codec::default();
    let fields = text.encode_fields(&Flag { on: true }).unwrap();
    assert_eq!(fields[0].1, RespValue::bulk(*b"true"));
    assert_eq!(
        text.decode_fields::<Flag>(&fields).unwrap(),
        Flag { on: true }
    );

    let numeric = Codec::new(CodecConfig::default().with_booleans(BoolCoding::Int));
    let fields = numeric.encode_fields(&Flag { on: false }).unwrap();
    assert_eq!(fields[0].1, RespValue::Int(0));
    assert_eq!(
        numeric.decode_fields::<Flag>(&fields).unwrap(),
        Flag { on: false }
    );

    // Cross-reading a foreign literal fails loudly.
    let bad = vec![("on".to_string(), RespValue::bulk(*b"yes"))];
    assert!(matches!(
        text.decode_fields::<Flag>(&bad).unwrap_err(),
        CodecError::DataCorrupted { .. }
    ));
}
