//! Payloads come back exactly as written

use crate::*;
use std::collections::HashMap;

fn sample_values() -> Vec<Value> {
    let mut object = HashMap::new();
    object.insert("id".to_string(), Value::Int(7));
    object.insert(
        "tags".to_string(),
        Value::Array(vec![Value::from("a"), Value::from("b")]),
    );
    object.insert("raw".to_string(), Value::Bytes(vec![0, 255, 10]));

    vec![
        Value::Null,
        Value::Bool(false),
        Value::Int(i64::MIN),
        Value::Int(i64::MAX),
        Value::Float(-0.0),
        Value::Float(f64::INFINITY),
        Value::Float(1e-310),
        Value::String(String::new()),
        Value::String("multi\nline with spaces and ünïcode".into()),
        Value::Bytes(Vec::new()),
        Value::Bytes((0..=255).collect()),
        Value::Array(vec![Value::Array(vec![Value::Null]), Value::Int(1)]),
        Value::Object(object),
    ]
}

#[test]
fn test_every_shape_round_trips() {
    for fx in all_backends() {
        let mut q = fx.queue("shapes");
        let values = sample_values();
        for v in &values {
            q.write(v.clone()).unwrap();
        }
        let mut read = drain(&mut q);
        read.reverse();
        assert_eq!(read, values, "{}", fx.backend());
    }
}

#[test]
fn test_special_floats_keep_their_bits() {
    for fx in all_backends() {
        let mut q = fx.queue("floats");
        let floats = [f64::NAN, -0.0, f64::NEG_INFINITY, f64::MIN_POSITIVE];
        for f in floats {
            q.write(f).unwrap();
        }
        for f in floats.iter().rev() {
            match q.read().unwrap() {
                Some(Value::Float(got)) => {
                    assert_eq!(got.to_bits(), f.to_bits(), "{}", fx.backend())
                }
                other => panic!("expected float, got {:?}", other),
            }
        }
    }
}

#[test]
fn test_null_payload_is_not_empty() {
    for fx in all_backends() {
        let mut q = fx.queue("nulls");
        q.write(Value::Null).unwrap();
        assert_eq!(q.read().unwrap(), Some(Value::Null));
        assert_eq!(q.read().unwrap(), None);
    }
}
