//! Store faults surface as errors, never as empty results

use crate::*;
use kvqueue::{Error, StoreError};

fn server(fx: &Fixture) -> &MemcacheServer {
    match &fx.backing {
        Backing::Server(server) => server,
        _ => panic!("not a memcached fixture"),
    }
}

#[test]
fn test_server_errors_propagate() {
    let fx = Fixture::memcached();
    let mut q = fx.queue("faulty");
    q.write("kept").unwrap();

    server(&fx).set_failing(true);
    assert!(matches!(q.write("lost"), Err(Error::Store(StoreError::Protocol(_)))));
    assert!(matches!(q.read(), Err(Error::Store(_))));
    assert!(matches!(q.length(), Err(Error::Store(_))));

    server(&fx).set_failing(false);
    assert_eq!(q.read().unwrap(), Some(Value::from("kept")));
}

#[test]
fn test_faults_are_retryable() {
    let fx = Fixture::memcached();
    let q = fx.queue("retry");
    server(&fx).set_failing(true);
    assert!(q.length().unwrap_err().is_retryable());
}

#[test]
fn test_construction_against_failing_server() {
    let fx = Fixture::memcached();
    server(&fx).set_failing(true);
    let err = fx.queues.queue("down").unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable(_)), "{err}");
}

#[test]
fn test_unreachable_server() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let queues = Queues::builder()
        .memcached(addr)
        .connect_timeout_ms(200)
        .open()
        .expect("no I/O before first use");
    let err = queues.queue("nowhere").unwrap_err();
    assert!(matches!(err, Error::BackendUnavailable(_)), "{err}");
}

#[test]
fn test_missing_node_is_key_not_found() {
    let fx = Fixture::memory();
    let mut q = fx.queue("holes");
    q.write("a").unwrap();
    if let Backing::Memory(store) = &fx.backing {
        for key in store.keys_with_prefix("kvq.holes.node.") {
            kvqueue::KeyValueStore::delete(store, &key).unwrap();
        }
    }
    assert!(matches!(q.read(), Err(Error::KeyNotFound(_))));
}

#[test]
fn test_invalid_names_rejected() {
    let fx = Fixture::memory();
    let long = "x".repeat(201);
    for name in ["", "with space", "dot.ted", "slash/ed", long.as_str()] {
        assert!(
            matches!(fx.queues.queue(name), Err(Error::InvalidName { .. })),
            "{name:?}"
        );
    }
}
