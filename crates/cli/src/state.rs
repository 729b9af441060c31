//! Session state for the shell.
//!
//! Queues are constructed the first time a command names them and kept for
//! the rest of the session. Constructing a queue resets it, so a queue is
//! never constructed twice in one session unless `open` asks for it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use kvqueue::{Queue, Queues, Result};
use tracing::debug;

use crate::parse::{ShellCommand, HELP};
use crate::value::format_value;

/// What the shell should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Open queues for one shell session.
pub struct SessionState {
    queues: Queues,
    open: HashMap<String, Queue>,
}

impl SessionState {
    pub fn new(queues: Queues) -> Self {
        Self {
            queues,
            open: HashMap::new(),
        }
    }

    /// Run one command, returning its output text.
    pub fn execute(&mut self, command: ShellCommand) -> Result<(String, Flow)> {
        let out = match command {
            ShellCommand::Open { queue } => {
                let q = self.queues.queue(&queue)?;
                let shown = q.to_string();
                self.open.insert(queue, q);
                format!("opened {}", shown)
            }
            ShellCommand::Write { queue, value } => {
                self.queue(&queue)?.write(value)?;
                "OK".to_string()
            }
            ShellCommand::Read { queue } => match self.queue(&queue)?.read()? {
                Some(value) => format_value(&value),
                None => "(empty)".to_string(),
            },
            ShellCommand::Len { queue } => self.queue(&queue)?.length()?.to_string(),
            ShellCommand::List => {
                let names = self.queues.list_queues()?;
                if names.is_empty() {
                    "(none)".to_string()
                } else {
                    names.join("\n")
                }
            }
            ShellCommand::Help => HELP.to_string(),
            ShellCommand::Quit => return Ok((String::new(), Flow::Quit)),
        };
        Ok((out, Flow::Continue))
    }

    /// The session's handle for `name`, constructing it on first use.
    fn queue(&mut self, name: &str) -> Result<&mut Queue> {
        match self.open.entry(name.to_string()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                debug!(queue = name, "constructing queue on first use");
                Ok(e.insert(self.queues.queue(name)?))
            }
        }
    }
}
