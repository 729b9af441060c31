//! memcached text protocol
//!
//! Implements the subset of the protocol kvqueue needs. Requests:
//!
//! | Command | Request | Success reply |
//! |---------|---------|---------------|
//! | set | `set <key> <flags> <exptime> <bytes>\r\n<data>\r\n` | `STORED` |
//! | get | `get <key>\r\n` | `VALUE <key> <flags> <bytes>\r\n<data>\r\nEND` |
//! | delete | `delete <key>\r\n` | `DELETED` |
//! | stats | `stats\r\n` | `STAT <name> <value>` lines, then `END` |
//!
//! A `get` miss is a bare `END`; a `delete` miss is `NOT_FOUND`. `ERROR`,
//! `CLIENT_ERROR <msg>` and `SERVER_ERROR <msg>` are complete lines, so the
//! connection stays usable after them. Any other failure leaves the stream
//! in an unknown position and the connection must be discarded.

use std::io::{self, BufRead, Read, Write};
use thiserror::Error;

/// Longest key memcached accepts
pub const MAX_KEY_LEN: usize = 250;

/// Largest data block accepted in a `VALUE` reply (memcached's default item size)
pub const MAX_VALUE_LEN: usize = 1024 * 1024;

/// Errors while talking the protocol
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Socket failure
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The reply could not be parsed
    #[error("malformed reply: {0}")]
    Malformed(String),

    /// The server reported an error line
    #[error("server replied {0}")]
    Server(String),
}

impl ProtocolError {
    /// Whether the connection is still aligned on a reply boundary
    pub fn connection_reusable(&self) -> bool {
        matches!(self, ProtocolError::Server(_))
    }
}

/// Reply to a storage or delete command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// `STORED`
    Stored,
    /// `NOT_STORED`
    NotStored,
    /// `DELETED`
    Deleted,
    /// `NOT_FOUND`
    NotFound,
}

/// One client request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Store `data` under `key`
    Set {
        /// Target key
        key: &'a str,
        /// Opaque client flags
        flags: u32,
        /// Expiry in seconds, 0 for never
        exptime: u32,
        /// Payload
        data: &'a [u8],
    },
    /// Fetch one key
    Get {
        /// Key to fetch
        key: &'a str,
    },
    /// Remove one key
    Delete {
        /// Key to remove
        key: &'a str,
    },
    /// General-purpose statistics
    Stats,
}

impl Command<'_> {
    /// Serialize the request
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        match self {
            Command::Set {
                key,
                flags,
                exptime,
                data,
            } => {
                write!(w, "set {} {} {} {}\r\n", key, flags, exptime, data.len())?;
                w.write_all(data)?;
                w.write_all(b"\r\n")?;
            }
            Command::Get { key } => write!(w, "get {}\r\n", key)?,
            Command::Delete { key } => write!(w, "delete {}\r\n", key)?,
            Command::Stats => w.write_all(b"stats\r\n")?,
        }
        w.flush()
    }
}

/// Check a key against the protocol's rules
pub fn validate_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("key is empty".to_string());
    }
    if key.len() > MAX_KEY_LEN {
        return Err(format!("key is {} bytes, limit is {}", key.len(), MAX_KEY_LEN));
    }
    if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err("key contains whitespace or control characters".to_string());
    }
    Ok(())
}

/// Read one `\r\n`-terminated line, without the terminator
pub fn read_line<R: BufRead>(r: &mut R) -> Result<String, ProtocolError> {
    let mut line = String::new();
    let n = r.read_line(&mut line)?;
    if n == 0 {
        return Err(ProtocolError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed by server",
        )));
    }
    if !line.ends_with("\r\n") {
        return Err(ProtocolError::Malformed(format!("unterminated line {:?}", line)));
    }
    line.truncate(line.len() - 2);
    Ok(line)
}

fn check_error_line(line: &str) -> Result<(), ProtocolError> {
    if line == "ERROR" || line.starts_with("CLIENT_ERROR") || line.starts_with("SERVER_ERROR") {
        return Err(ProtocolError::Server(line.to_string()));
    }
    Ok(())
}

/// Read the reply to `set` or `delete`
pub fn read_status<R: BufRead>(r: &mut R) -> Result<Status, ProtocolError> {
    let line = read_line(r)?;
    check_error_line(&line)?;
    match line.as_str() {
        "STORED" => Ok(Status::Stored),
        "NOT_STORED" => Ok(Status::NotStored),
        "DELETED" => Ok(Status::Deleted),
        "NOT_FOUND" => Ok(Status::NotFound),
        other => Err(ProtocolError::Malformed(format!("unexpected status {:?}", other))),
    }
}

/// Read the reply to a single-key `get`.
///
/// Returns `None` on a miss, otherwise the flags and data block.
pub fn read_value<R: BufRead>(r: &mut R) -> Result<Option<(u32, Vec<u8>)>, ProtocolError> {
    let line = read_line(r)?;
    check_error_line(&line)?;
    if line == "END" {
        return Ok(None);
    }

    let mut parts = line.split(' ');
    let (flags, len) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("VALUE"), Some(_key), Some(flags), Some(len)) => {
            let flags = flags
                .parse::<u32>()
                .map_err(|_| ProtocolError::Malformed(format!("bad flags in {:?}", line)))?;
            let len = len
                .parse::<usize>()
                .map_err(|_| ProtocolError::Malformed(format!("bad length in {:?}", line)))?;
            (flags, len)
        }
        _ => return Err(ProtocolError::Malformed(format!("unexpected reply {:?}", line))),
    };

    let framed = len
        .checked_add(2)
        .filter(|_| len <= MAX_VALUE_LEN)
        .ok_or_else(|| {
            ProtocolError::Malformed(format!(
                "data block of {} bytes exceeds the {} byte limit",
                len, MAX_VALUE_LEN
            ))
        })?;
    let mut data = vec![0u8; framed];
    r.read_exact(&mut data)?;
    if !data.ends_with(b"\r\n") {
        return Err(ProtocolError::Malformed("data block not terminated".to_string()));
    }
    data.truncate(len);

    let end = read_line(r)?;
    if end != "END" {
        return Err(ProtocolError::Malformed(format!("expected END, got {:?}", end)));
    }
    Ok(Some((flags, data)))
}

/// Read the reply to `stats` as `(name, value)` pairs
pub fn read_stats<R: BufRead>(r: &mut R) -> Result<Vec<(String, String)>, ProtocolError> {
    let mut stats = Vec::new();
    loop {
        let line = read_line(r)?;
        check_error_line(&line)?;
        if line == "END" {
            return Ok(stats);
        }
        let rest = line
            .strip_prefix("STAT ")
            .ok_or_else(|| ProtocolError::Malformed(format!("unexpected stats line {:?}", line)))?;
        let (name, value) = rest.split_once(' ').unwrap_or((rest, ""));
        stats.push((name.to_string(), value.to_string()));
    }
}
