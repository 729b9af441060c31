//! Shell line → ShellCommand conversion.
//!
//! Lines are split with shlex, so values containing spaces can be quoted:
//! `write jobs "resize image 42"`.

use kvqueue::Value;

use crate::value::parse_value;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    /// Construct (and reset) a queue now instead of on first use
    Open { queue: String },
    Write { queue: String, value: Value },
    Read { queue: String },
    Len { queue: String },
    List,
    Help,
    Quit,
}

/// Usage lines shown by `help`.
pub const HELP: &str = "\
open <queue>           reset <queue> and keep it open for this session
write <queue> <value>  push a value (int, float, true/false, null or string)
read <queue>           pop the most recently written value
len <queue>            number of values in <queue>
list                   queues the backend reports
help                   this text
quit                   leave the shell";

/// Parse one shell line.
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let words = shlex::split(trimmed).ok_or_else(|| "Unbalanced quotes".to_string())?;
    let (cmd, args) = match words.split_first() {
        Some((cmd, args)) => (cmd.as_str(), args),
        None => return Ok(None),
    };

    let command = match (cmd, args) {
        ("open", [queue]) => ShellCommand::Open {
            queue: queue.clone(),
        },
        ("write", [queue, value]) => ShellCommand::Write {
            queue: queue.clone(),
            value: parse_value(value),
        },
        ("read", [queue]) => ShellCommand::Read {
            queue: queue.clone(),
        },
        ("len", [queue]) => ShellCommand::Len {
            queue: queue.clone(),
        },
        ("list", []) => ShellCommand::List,
        ("help", _) => ShellCommand::Help,
        ("quit" | "exit", []) => ShellCommand::Quit,
        ("open" | "write" | "read" | "len" | "list" | "quit" | "exit", _) => {
            return Err(format!("Wrong number of arguments for '{}'", cmd))
        }
        (other, _) => return Err(format!("Unknown command: {}", other)),
    };
    Ok(Some(command))
}
