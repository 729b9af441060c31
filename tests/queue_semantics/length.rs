//! Length counter and entry bookkeeping

use crate::*;

#[test]
fn test_length_tracks_writes_minus_reads() {
    for fx in all_backends() {
        let mut q = fx.queue("counted");
        for i in 0..10 {
            q.write(i).unwrap();
            assert_eq!(q.length().unwrap(), i as u64 + 1);
        }
        for left in (0..10u64).rev() {
            q.read().unwrap();
            assert_eq!(q.length().unwrap(), left, "{}", fx.backend());
        }
        assert!(q.is_empty().unwrap());
    }
}

#[test]
fn test_metadata_written_on_construction() {
    for fx in all_backends() {
        let _q = fx.queue("meta");
        assert_eq!(
            fx.keys_with_prefix("kvq.meta."),
            vec!["kvq.meta.head".to_string(), "kvq.meta.len".to_string()],
            "{}",
            fx.backend()
        );
    }
}

#[test]
fn test_one_node_per_message() {
    for fx in all_backends() {
        let mut q = fx.queue("nodes");
        for i in 0..7 {
            q.write(i).unwrap();
        }
        assert_eq!(fx.node_count("nodes"), 7, "{}", fx.backend());
        q.read().unwrap();
        assert_eq!(fx.node_count("nodes"), 6);
    }
}

#[test]
fn test_drained_queue_leaves_no_nodes() {
    for fx in all_backends() {
        let mut q = fx.queue("drained");
        for i in 0..25 {
            q.write(i).unwrap();
        }
        assert_eq!(drain(&mut q).len(), 25);
        assert_eq!(fx.node_count("drained"), 0, "{}", fx.backend());
    }
}
