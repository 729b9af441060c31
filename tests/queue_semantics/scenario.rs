//! The classic fill-then-drain run

use crate::*;

const COUNT: i64 = 10_000;

fn fill_and_drain(fx: &Fixture) {
    let mut q = fx.queue("scenario");
    for i in 0..COUNT {
        q.write(i).unwrap();
    }
    assert_eq!(q.length().unwrap(), COUNT as u64);

    for i in 0..COUNT {
        assert_eq!(q.read().unwrap(), Some(Value::Int(COUNT - 1 - i)));
    }
    assert_eq!(q.length().unwrap(), 0);
    assert_eq!(q.read().unwrap(), None);
    assert_eq!(fx.node_count("scenario"), 0);
}

#[test]
fn test_ten_thousand_memory() {
    fill_and_drain(&Fixture::memory());
}

#[test]
fn test_ten_thousand_file() {
    fill_and_drain(&Fixture::file());
}

#[test]
fn test_ten_thousand_memcached() {
    fill_and_drain(&Fixture::memcached());
}
