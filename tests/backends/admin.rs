//! Optional operations per backend

use crate::*;

#[test]
fn test_create_queue_is_a_no_op() {
    let dir = TempDir::new().unwrap();
    let (_servers, mc) = memcached(1);
    for queues in [
        Queues::ephemeral().unwrap(),
        Queues::builder().filebased(dir.path()).open().unwrap(),
        mc,
    ] {
        assert!(queues.create_queue().unwrap());
    }
}

#[test]
fn test_list_queues_not_implemented_without_introspection() {
    let dir = TempDir::new().unwrap();
    for queues in [
        Queues::ephemeral().unwrap(),
        Queues::builder().filebased(dir.path()).open().unwrap(),
    ] {
        assert!(!queues.capabilities().list_queues);
        let err = queues.list_queues().unwrap_err();
        assert!(matches!(err, Error::NotImplemented("list_queues")));
    }
}

#[test]
fn test_delete_queue_not_implemented_anywhere() {
    let dir = TempDir::new().unwrap();
    let (_servers, mc) = memcached(1);
    for queues in [
        Queues::ephemeral().unwrap(),
        Queues::builder().filebased(dir.path()).open().unwrap(),
        mc,
    ] {
        assert!(!queues.capabilities().delete_queue);
        let err = queues.delete_queue("jobs").unwrap_err();
        assert!(err.is_not_implemented(), "{err}");
    }
}

#[test]
fn test_capabilities() {
    let (_servers, mc) = memcached(1);
    let caps = mc.capabilities();
    assert!(caps.list_queues);
    assert_eq!(caps.max_key_bytes, 250);
    assert_eq!(Queues::ephemeral().unwrap().capabilities().max_key_bytes, usize::MAX);
}
