//! Multi-server routing and introspection

use crate::*;
use kvqueue_storage::memcache::server_index;

#[test]
fn test_queue_spreads_over_servers() {
    let (servers, queues) = memcached(3);
    let mut q = queues.queue("spread").unwrap();
    for i in 0..60 {
        q.write(i).unwrap();
    }

    let per_server: Vec<usize> = servers
        .iter()
        .map(|s| s.keys_with_prefix("kvq.spread.").len())
        .collect();
    assert_eq!(per_server.iter().sum::<usize>(), 62);
    assert!(
        per_server.iter().filter(|&&n| n > 0).count() >= 2,
        "{per_server:?}"
    );

    for i in (0..60).rev() {
        assert_eq!(q.read().unwrap(), Some(i.into()));
    }
    assert!(servers.iter().all(|s| s.keys_with_prefix("kvq.spread.node.").is_empty()));
}

#[test]
fn test_routing_is_stable() {
    let (servers, queues) = memcached(2);
    let _q = queues.queue("stable").unwrap();
    let index = server_index("kvq.stable.head", servers.len());
    assert_eq!(
        servers[index].keys_with_prefix("kvq.stable.head"),
        vec!["kvq.stable.head".to_string()]
    );
}

#[test]
fn test_list_queues_across_servers() {
    let (servers, queues) = memcached(2);
    servers[0].add_stat("queue_jobs_total_items", "10");
    servers[0].add_stat("queue_jobs_items", "2");
    servers[1].add_stat("queue_mail_total_items", "4");
    servers[1].add_stat("queue_jobs_total_items", "1");

    assert_eq!(queues.list_queues().unwrap(), vec!["jobs", "mail"]);
}

#[test]
fn test_list_queues_skips_failing_server() {
    let (servers, queues) = memcached(2);
    servers[0].add_stat("queue_alive_total_items", "1");
    servers[1].add_stat("queue_hidden_total_items", "1");
    servers[1].set_failing(true);

    assert_eq!(queues.list_queues().unwrap(), vec!["alive"]);
}

#[test]
fn test_list_queues_with_no_queue_stats() {
    let (_servers, queues) = memcached(1);
    assert!(queues.list_queues().unwrap().is_empty());
}
