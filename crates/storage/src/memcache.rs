//! memcached-protocol store
//!
//! A blocking client over one or more servers speaking the memcached text
//! protocol (memcached itself, or queue servers such as starling and
//! peafowl that reuse it).
//!
//! ## Server selection
//!
//! With several servers a key is routed by
//! `((crc32(key) >> 16) & 0x7fff) % servers`, the placement rule of the
//! classic memcached clients, so keys land where those clients expect.
//!
//! ## Connections
//!
//! One connection per server, opened on first use. Any failure that may
//! leave the stream misaligned drops the connection; the next call
//! reconnects. The client never retries a command itself.

use kvqueue_core::{BackendKind, Error, KeyValueStore, Result, StoreError, StoreResult, Value};
use kvqueue_wire::memcache::{read_stats, read_status, read_value, validate_key};
use kvqueue_wire::{decode_value, encode_value, Command, ProtocolError, Status};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Separator between server addresses in a connection string
pub const SERVER_SEPARATOR: char = ';';

/// Timeouts for memcached connections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemcacheOptions {
    /// Time allowed to establish a TCP connection
    pub connect_timeout: Duration,
    /// Read and write timeout on established connections
    pub io_timeout: Duration,
}

impl Default for MemcacheOptions {
    fn default() -> Self {
        MemcacheOptions {
            connect_timeout: Duration::from_millis(1000),
            io_timeout: Duration::from_millis(1000),
        }
    }
}

struct Connection {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

struct Server {
    addr: String,
    conn: Mutex<Option<Connection>>,
}

/// Key-value store over memcached servers
pub struct MemcacheStore {
    servers: Vec<Server>,
    options: MemcacheOptions,
}

impl std::fmt::Debug for MemcacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcacheStore")
            .field("servers", &self.addrs())
            .field("options", &self.options)
            .finish()
    }
}

/// Split a `host:port;host:port` connection string
pub fn parse_connection_string(connection: &str) -> Vec<String> {
    connection
        .split(SERVER_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Index of the server responsible for `key`
pub fn server_index(key: &str, servers: usize) -> usize {
    if servers <= 1 {
        return 0;
    }
    let hash = (crc32fast::hash(key.as_bytes()) >> 16) & 0x7fff;
    hash as usize % servers
}

impl MemcacheStore {
    /// Create a client for the servers in `connection`.
    ///
    /// No connection is made until the first command.
    pub fn new(connection: &str, options: MemcacheOptions) -> Result<Self> {
        let addrs = parse_connection_string(connection);
        if addrs.is_empty() {
            return Err(Error::InvalidBackend(format!(
                "memcache connection string {:?} lists no servers",
                connection
            )));
        }
        info!("Using memcached servers {}", addrs.join(", "));
        Ok(MemcacheStore {
            servers: addrs
                .into_iter()
                .map(|addr| Server {
                    addr,
                    conn: Mutex::new(None),
                })
                .collect(),
            options,
        })
    }

    /// Server addresses in configuration order
    pub fn addrs(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.addr.as_str()).collect()
    }

    fn connect(&self, addr: &str) -> StoreResult<Connection> {
        let socket_addrs = addr
            .to_socket_addrs()
            .map_err(|e| StoreError::Connection(format!("cannot resolve {}: {}", addr, e)))?;

        let mut last_err = None;
        for socket_addr in socket_addrs {
            match TcpStream::connect_timeout(&socket_addr, self.options.connect_timeout) {
                Ok(stream) => {
                    let setup = stream
                        .set_read_timeout(Some(self.options.io_timeout))
                        .and_then(|_| stream.set_write_timeout(Some(self.options.io_timeout)))
                        .and_then(|_| stream.set_nodelay(true))
                        .and_then(|_| stream.try_clone());
                    match setup {
                        Ok(read_half) => {
                            debug!("Connected to memcached at {}", addr);
                            return Ok(Connection {
                                reader: BufReader::new(read_half),
                                writer: BufWriter::new(stream),
                            });
                        }
                        Err(e) => last_err = Some(e),
                    }
                }
                Err(e) => last_err = Some(e),
            }
        }

        Err(StoreError::Connection(match last_err {
            Some(e) => format!("cannot connect to {}: {}", addr, e),
            None => format!("{} resolved to no addresses", addr),
        }))
    }

    /// Run one request/response exchange on a server's connection
    fn exchange<T>(
        &self,
        server: &Server,
        f: impl FnOnce(&mut Connection) -> std::result::Result<T, ProtocolError>,
    ) -> StoreResult<T> {
        let mut slot = server.conn.lock();
        if slot.is_none() {
            *slot = Some(self.connect(&server.addr)?);
        }
        let conn = match slot.as_mut() {
            Some(conn) => conn,
            None => return Err(StoreError::Connection(format!("no connection to {}", server.addr))),
        };

        match f(conn) {
            Ok(value) => Ok(value),
            Err(e) => {
                if !e.connection_reusable() {
                    warn!("Dropping connection to {}: {}", server.addr, e);
                    *slot = None;
                }
                Err(match e {
                    ProtocolError::Io(io) => {
                        StoreError::Connection(format!("{}: {}", server.addr, io))
                    }
                    other => StoreError::Protocol(format!("{}: {}", server.addr, other)),
                })
            }
        }
    }

    fn server_for(&self, key: &str) -> StoreResult<&Server> {
        validate_key(key).map_err(|reason| StoreError::InvalidKey {
            key: key.to_string(),
            reason,
        })?;
        let idx = server_index(key, self.servers.len());
        debug!(key, server = %self.servers[idx].addr, "routed key");
        Ok(&self.servers[idx])
    }
}

impl KeyValueStore for MemcacheStore {
    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let server = self.server_for(key)?;
        let data = encode_value(value)?;
        let status = self.exchange(server, |conn| {
            Command::Set {
                key,
                flags: 0,
                exptime: 0,
                data: &data,
            }
            .write_to(&mut conn.writer)?;
            read_status(&mut conn.reader)
        })?;

        match status {
            Status::Stored => Ok(()),
            other => Err(StoreError::Protocol(format!(
                "set {} answered {:?}",
                key, other
            ))),
        }
    }

    fn get(&self, key: &str) -> StoreResult<Value> {
        let server = self.server_for(key)?;
        let reply = self.exchange(server, |conn| {
            Command::Get { key }.write_to(&mut conn.writer)?;
            read_value(&mut conn.reader)
        })?;

        match reply {
            Some((_flags, data)) => decode_value(&data),
            None => Err(StoreError::KeyNotFound(key.to_string())),
        }
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let server = self.server_for(key)?;
        let status = self.exchange(server, |conn| {
            Command::Delete { key }.write_to(&mut conn.writer)?;
            read_status(&mut conn.reader)
        })?;

        match status {
            Status::Deleted => Ok(()),
            Status::NotFound => Err(StoreError::KeyNotFound(key.to_string())),
            other => Err(StoreError::Protocol(format!(
                "delete {} answered {:?}",
                key, other
            ))),
        }
    }

    fn backend(&self) -> BackendKind {
        BackendKind::Memcached
    }

    /// Queue names advertised through `queue_<name>_total_items` stats.
    ///
    /// Servers that fail the stats call are skipped.
    fn list_queues(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for server in &self.servers {
            let stats = self.exchange(server, |conn| {
                Command::Stats.write_to(&mut conn.writer)?;
                read_stats(&mut conn.reader)
            });
            match stats {
                Ok(stats) => {
                    names.extend(stats.iter().filter_map(|(name, _)| queue_from_stat(name)));
                }
                Err(e) => warn!("Skipping {} while listing queues: {}", server.addr, e),
            }
        }
        Ok(names.into_iter().collect())
    }
}

/// Extract `<name>` from a `queue_<name>_total_items` stat key
fn queue_from_stat(stat: &str) -> Option<String> {
    stat.strip_prefix("queue_")?
        .strip_suffix("_total_items")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
