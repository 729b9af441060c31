//! Interactive and piped shells.

use std::io::{self, BufRead};
use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::parse::parse_line;
use crate::state::{Flow, SessionState};

const PROMPT: &str = "kvq> ";

fn history_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".kvq_history"))
}

/// Parse and run one line, printing its output.
fn handle_line(state: &mut SessionState, line: &str) -> Result<Flow, String> {
    let command = match parse_line(line)? {
        Some(command) => command,
        None => return Ok(Flow::Continue),
    };
    let (out, flow) = state.execute(command).map_err(|e| e.to_string())?;
    if !out.is_empty() {
        println!("{}", out);
    }
    Ok(flow)
}

/// Interactive prompt with line editing.
pub fn run_repl(state: &mut SessionState, history: bool) {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("(error) cannot start line editor: {}", e);
            return;
        }
    };
    let history = if history { history_path() } else { None };
    if let Some(path) = &history {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(PROMPT) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                match handle_line(state, &line) {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("(error) {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("(error) {}", e);
                break;
            }
        }
    }

    if let Some(path) = &history {
        let _ = rl.save_history(path);
    }
}

/// Read commands line by line from stdin. Returns the exit code: 1 if any
/// line failed.
pub fn run_pipe(state: &mut SessionState) -> i32 {
    let mut code = 0;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("(error) {}", e);
                return 1;
            }
        };
        match handle_line(state, &line) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => {
                eprintln!("(error) {}", e);
                code = 1;
            }
        }
    }
    code
}
