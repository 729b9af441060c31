//! Read order and empty-queue behavior

use crate::*;

// =============================================================================
// LIFO ORDER
// =============================================================================

#[test]
fn test_reads_most_recent_first() {
    for fx in all_backends() {
        let mut q = fx.queue("lifo");
        for v in ["first", "second", "third"] {
            assert!(q.write(v).unwrap());
        }
        assert_eq!(
            drain(&mut q),
            vec![
                Value::from("third"),
                Value::from("second"),
                Value::from("first")
            ],
            "{}",
            fx.backend()
        );
    }
}

#[test]
fn test_interleaved_writes_and_reads() {
    for fx in all_backends() {
        let mut q = fx.queue("mixed");
        q.write(1).unwrap();
        q.write(2).unwrap();
        assert_eq!(q.read().unwrap(), Some(Value::Int(2)));
        q.write(3).unwrap();
        assert_eq!(q.read().unwrap(), Some(Value::Int(3)));
        assert_eq!(q.read().unwrap(), Some(Value::Int(1)));
        assert_eq!(q.read().unwrap(), None, "{}", fx.backend());
    }
}

// =============================================================================
// EMPTY QUEUE
// =============================================================================

#[test]
fn test_empty_read_is_idempotent() {
    for fx in all_backends() {
        let mut q = fx.queue("idle");
        for _ in 0..5 {
            assert_eq!(q.read().unwrap(), None);
            assert_eq!(q.length().unwrap(), 0);
        }
    }
}

#[test]
fn test_reconstruction_resets() {
    for fx in all_backends() {
        let mut q = fx.queue("again");
        q.write("stale").unwrap();
        q.write("stale too").unwrap();

        let mut fresh = fx.queue("again");
        assert_eq!(fresh.length().unwrap(), 0, "{}", fx.backend());
        assert_eq!(fresh.read().unwrap(), None);
    }
}

#[test]
fn test_queues_do_not_share_entries() {
    for fx in all_backends() {
        let mut a = fx.queue("alpha");
        let mut b = fx.queue("alpha-2");
        a.write("a").unwrap();
        b.write("b1").unwrap();
        b.write("b2").unwrap();

        assert_eq!(drain(&mut a), vec![Value::from("a")]);
        assert_eq!(b.length().unwrap(), 2);
    }
}

#[test]
fn test_display() {
    let fx = Fixture::memory();
    assert_eq!(fx.queue("shown").to_string(), "<Queue shown>");
}
