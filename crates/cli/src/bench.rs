//! `kvq bench`: write N integers, check the length, read them back.

use std::time::Instant;

use kvqueue::{Queues, Value};

/// Timings of one bench run.
#[derive(Debug)]
pub struct BenchReport {
    pub count: u64,
    pub write_secs: f64,
    pub read_secs: f64,
}

impl std::fmt::Display for BenchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rate = |secs: f64| {
            if secs > 0.0 {
                self.count as f64 / secs
            } else {
                f64::INFINITY
            }
        };
        writeln!(
            f,
            "write: {} items in {:.3}s ({:.0} ops/s)",
            self.count,
            self.write_secs,
            rate(self.write_secs)
        )?;
        write!(
            f,
            "read:  {} items in {:.3}s ({:.0} ops/s)",
            self.count,
            self.read_secs,
            rate(self.read_secs)
        )
    }
}

/// Fill `name` with `0..count`, then drain it, checking LIFO order.
pub fn run_bench(queues: &Queues, name: &str, count: u64) -> Result<BenchReport, String> {
    let mut queue = queues.queue(name).map_err(|e| e.to_string())?;

    let start = Instant::now();
    for i in 0..count {
        queue
            .write(Value::Int(i as i64))
            .map_err(|e| format!("write {}: {}", i, e))?;
    }
    let write_secs = start.elapsed().as_secs_f64();

    let len = queue.length().map_err(|e| e.to_string())?;
    if len != count {
        return Err(format!("expected length {}, found {}", count, len));
    }

    let start = Instant::now();
    for expected in (0..count).rev() {
        match queue.read().map_err(|e| e.to_string())? {
            Some(Value::Int(got)) if got == expected as i64 => {}
            other => {
                return Err(format!("expected {}, read {:?}", expected, other));
            }
        }
    }
    let read_secs = start.elapsed().as_secs_f64();

    if let Some(extra) = queue.read().map_err(|e| e.to_string())? {
        return Err(format!("queue not drained, read {:?}", extra));
    }
    let len = queue.length().map_err(|e| e.to_string())?;
    if len != 0 {
        return Err(format!("expected length 0 after drain, found {}", len));
    }

    Ok(BenchReport {
        count,
        write_secs,
        read_secs,
    })
}
