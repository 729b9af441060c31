//! Configuration and backend selection

use crate::*;

#[test]
fn test_missing_configuration_is_invalid_backend() {
    let err = Queues::open(&StoreConfig::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidBackend(_)));
}

#[test]
fn test_missing_spool_is_invalid_backend() {
    let dir = TempDir::new().unwrap();
    let err = Queues::builder()
        .filebased(dir.path().join("missing"))
        .open()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidBackend(_)));
}

#[test]
fn test_empty_connection_string_is_invalid_backend() {
    let err = Queues::builder().memcached("").open().unwrap_err();
    assert!(matches!(err, Error::InvalidBackend(_)));
}

#[test]
fn test_builder_selects_backend() {
    let dir = TempDir::new().unwrap();
    let server = MemcacheServer::start().unwrap();

    assert_eq!(
        Queues::builder().memory().open().unwrap().backend(),
        BackendKind::Memory
    );
    assert_eq!(
        Queues::builder()
            .filebased(dir.path())
            .open()
            .unwrap()
            .backend(),
        BackendKind::FileBased
    );
    assert_eq!(
        Queues::builder()
            .memcached(server.addr())
            .open()
            .unwrap()
            .backend(),
        BackendKind::Memcached
    );
}

#[test]
fn test_backend_inferred_from_fields() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig {
        filebased_spool: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert_eq!(Queues::open(&config).unwrap().backend(), BackendKind::FileBased);
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let spool = dir.path().join("spool");
    std::fs::create_dir(&spool).unwrap();
    let path = dir.path().join("queues.toml");
    std::fs::write(
        &path,
        format!("backend = \"filebased\"\nfilebased_spool = {:?}\n", spool),
    )
    .unwrap();

    let config = StoreConfig::from_file(&path).unwrap();
    let queues = Queues::open(&config).unwrap();
    let mut q = queues.queue("from_toml").unwrap();
    q.write("x").unwrap();
    assert!(spool.join("kvq.from_toml.len").is_file());
}

#[test]
fn test_unreadable_toml_file() {
    let dir = TempDir::new().unwrap();
    let err = StoreConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::InvalidBackend(_)));
}

#[test]
fn test_environment_lookup() {
    let server = MemcacheServer::start().unwrap();
    let addr = server.addr().to_string();
    let config = StoreConfig::from_lookup(|name| match name {
        "QUEUE_MEMCACHE_CONNECTION" => Some(addr.clone()),
        "QUEUE_IO_TIMEOUT_MS" => Some("300".into()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.io_timeout_ms, 300);

    let queues = Queues::open(&config).unwrap();
    assert_eq!(queues.backend(), BackendKind::Memcached);
    let mut q = queues.queue("env").unwrap();
    q.write(1).unwrap();
    assert_eq!(server.keys_with_prefix("kvq.env.node.").len(), 1);
}

#[test]
fn test_each_queue_gets_its_own_handle() {
    let dir = TempDir::new().unwrap();
    let queues = Queues::builder().filebased(dir.path()).open().unwrap();
    let mut a = queues.queue("one").unwrap();
    let mut b = queues.queue("two").unwrap();
    a.write(1).unwrap();
    b.write(2).unwrap();
    assert_eq!(a.length().unwrap(), 1);
    assert_eq!(b.length().unwrap(), 1);
}
