//! In-process memcached server
//!
//! Speaks the same protocol subset as the client in [`crate::memcache`]:
//! `set`, `get`, `delete`, `stats`, `quit`. Each server owns its own map,
//! so several instances model a multi-server pool. Used by the storage and
//! integration tests; enable with the `testing` feature.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Default)]
struct Shared {
    entries: Mutex<HashMap<String, (u32, Vec<u8>)>>,
    stats: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
    stopped: AtomicBool,
}

/// A running test server; stops when dropped
pub struct MemcacheServer {
    addr: String,
    shared: Arc<Shared>,
}

impl MemcacheServer {
    /// Bind to an ephemeral localhost port and start serving
    pub fn start() -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?.to_string();
        let shared = Arc::new(Shared::default());

        let accept_shared = Arc::clone(&shared);
        thread::spawn(move || {
            for stream in listener.incoming() {
                if accept_shared.stopped.load(Ordering::Acquire) {
                    break;
                }
                let Ok(stream) = stream else { continue };
                let conn_shared = Arc::clone(&accept_shared);
                thread::spawn(move || {
                    let _ = serve(stream, &conn_shared);
                });
            }
        });

        Ok(MemcacheServer { addr, shared })
    }

    /// `host:port` the server listens on
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored keys starting with `prefix`
    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .shared
            .entries
            .lock()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    /// Add a line to the `stats` reply
    pub fn add_stat(&self, name: &str, value: &str) {
        self.shared
            .stats
            .lock()
            .push((name.to_string(), value.to_string()));
    }

    /// Answer every command with `SERVER_ERROR` while enabled
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::Release);
    }
}

impl Drop for MemcacheServer {
    fn drop(&mut self) {
        self.shared.stopped.store(true, Ordering::Release);
        // Wake the accept loop so it observes the flag
        let _ = TcpStream::connect(&self.addr);
    }
}

fn serve(stream: TcpStream, shared: &Shared) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 || shared.stopped.load(Ordering::Acquire) {
            return Ok(());
        }
        let parts: Vec<&str> = line.trim_end_matches("\r\n").split(' ').collect();

        // Consume the data block before deciding how to answer
        let data = match parts.as_slice() {
            ["set", _, _, _, len] => match len.parse::<usize>() {
                Ok(len) => {
                    let mut buf = vec![0u8; len + 2];
                    reader.read_exact(&mut buf)?;
                    buf.truncate(len);
                    Some(buf)
                }
                Err(_) => {
                    writer.write_all(b"CLIENT_ERROR bad data chunk\r\n")?;
                    writer.flush()?;
                    continue;
                }
            },
            _ => None,
        };

        if shared.failing.load(Ordering::Acquire) {
            writer.write_all(b"SERVER_ERROR injected failure\r\n")?;
            writer.flush()?;
            continue;
        }

        match parts.as_slice() {
            ["set", key, flags, _, _] => {
                let flags = flags.parse::<u32>().unwrap_or(0);
                let data = data.unwrap_or_default();
                shared
                    .entries
                    .lock()
                    .insert(key.to_string(), (flags, data));
                writer.write_all(b"STORED\r\n")?;
            }
            ["get", keys @ ..] => {
                let entries = shared.entries.lock();
                for key in keys {
                    if let Some((flags, data)) = entries.get(*key) {
                        write!(writer, "VALUE {} {} {}\r\n", key, flags, data.len())?;
                        writer.write_all(data)?;
                        writer.write_all(b"\r\n")?;
                    }
                }
                writer.write_all(b"END\r\n")?;
            }
            ["delete", key] => {
                if shared.entries.lock().remove(*key).is_some() {
                    writer.write_all(b"DELETED\r\n")?;
                } else {
                    writer.write_all(b"NOT_FOUND\r\n")?;
                }
            }
            ["stats"] => {
                write!(writer, "STAT curr_items {}\r\n", shared.entries.lock().len())?;
                for (name, value) in shared.stats.lock().iter() {
                    write!(writer, "STAT {} {}\r\n", name, value)?;
                }
                writer.write_all(b"END\r\n")?;
            }
            ["quit"] => return Ok(()),
            _ => writer.write_all(b"ERROR\r\n")?,
        }
        writer.flush()?;
    }
}
