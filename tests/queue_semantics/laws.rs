//! Property tests over arbitrary message sequences

use crate::*;
use kvqueue::KeyValueStore;
use proptest::prelude::*;

/// A write (Some) or a read (None)
fn ops() -> impl Strategy<Value = Vec<Option<i64>>> {
    prop::collection::vec(prop::option::weighted(0.6, any::<i64>()), 0..60)
}

fn payloads() -> impl Strategy<Value = Vec<Value>> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        "[a-z ]{0,12}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..16).prop_map(Value::Bytes),
    ];
    prop::collection::vec(leaf, 0..30)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn lifo_law_memory(values in payloads()) {
        let fx = Fixture::memory();
        let mut q = fx.queue("law");
        for v in &values {
            q.write(v.clone()).unwrap();
        }
        let mut read = drain(&mut q);
        read.reverse();
        prop_assert_eq!(read, values);
    }

    #[test]
    fn lifo_law_file(values in payloads()) {
        let fx = Fixture::file();
        let mut q = fx.queue("law");
        for v in &values {
            q.write(v.clone()).unwrap();
        }
        let mut read = drain(&mut q);
        read.reverse();
        prop_assert_eq!(read, values);
    }

    #[test]
    fn matches_a_stack_model(script in ops()) {
        let fx = Fixture::memory();
        let mut q = fx.queue("model");
        let mut model: Vec<i64> = Vec::new();

        for op in script {
            match op {
                Some(v) => {
                    q.write(v).unwrap();
                    model.push(v);
                }
                None => {
                    prop_assert_eq!(q.read().unwrap(), model.pop().map(Value::Int));
                }
            }
            prop_assert_eq!(q.length().unwrap(), model.len() as u64);
            prop_assert_eq!(fx.node_count("model"), model.len());

            let store = match &fx.backing {
                Backing::Memory(store) => store,
                _ => unreachable!("memory fixture"),
            };
            match store.get("kvq.model.head").unwrap() {
                Value::Null => prop_assert!(model.is_empty()),
                Value::String(id) => {
                    prop_assert!(!model.is_empty());
                    let node = format!("kvq.model.node.{}", id);
                    prop_assert_eq!(fx.keys_with_prefix(&node), vec![node.clone()]);
                }
                other => prop_assert!(false, "head holds {:?}", other),
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn length_law_memcached(writes in 0usize..40, reads in 0usize..40) {
        let fx = Fixture::memcached();
        let mut q = fx.queue("law");
        for i in 0..writes {
            q.write(i as i64).unwrap();
        }
        let reads = reads.min(writes);
        for _ in 0..reads {
            prop_assert!(q.read().unwrap().is_some());
        }
        prop_assert_eq!(q.length().unwrap(), (writes - reads) as u64);
    }
}
