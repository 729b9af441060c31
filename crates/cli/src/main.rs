//! kvq: command-line client for kvqueue.
//!
//! Three subcommands:
//! - **bench**: `kvq bench -n 10000` fills a queue, drains it and reports timing
//! - **list**: `kvq list` prints the queues the backend reports
//! - **shell**: `kvq shell` opens a prompt if stdin is a TTY, otherwise runs
//!   commands line by line from stdin (`echo "write q 1" | kvq shell`)
//!
//! Without a subcommand, `kvq` starts the shell.
//!
//! The backend comes from `--config`, then the `--backend`/`--memcache`/
//! `--spool` flags, then the `QUEUE_*` environment variables.

mod bench;
mod commands;
mod parse;
mod repl;
mod state;
mod value;

use std::io::IsTerminal;
use std::process;

use clap::ArgMatches;
use kvqueue::{BackendKind, Queues, StoreConfig};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use state::SessionState;

fn main() {
    init_tracing();

    let matches = build_cli().get_matches();

    let queues = match open_queues(&matches) {
        Ok(queues) => queues,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    let exit_code = match matches.subcommand() {
        Some(("bench", m)) => run_bench(&queues, m),
        Some(("list", _)) => run_list(&queues),
        Some(("shell", m)) => run_shell(queues, m.get_flag("history")),
        _ => run_shell(queues, true),
    };
    process::exit(exit_code);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Build the configuration from flags over the config file or environment.
fn load_config(matches: &ArgMatches) -> Result<StoreConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => StoreConfig::from_file(path),
        None => StoreConfig::from_env(),
    }
    .map_err(|e| e.to_string())?;

    if let Some(backend) = matches.get_one::<String>("backend") {
        config.backend = Some(
            backend
                .parse::<BackendKind>()
                .map_err(|e| e.to_string())?,
        );
    }
    if let Some(connection) = matches.get_one::<String>("memcache") {
        config.memcache_connection = Some(connection.clone());
    }
    if let Some(spool) = matches.get_one::<String>("spool") {
        config.filebased_spool = Some(spool.into());
    }
    Ok(config)
}

fn open_queues(matches: &ArgMatches) -> Result<Queues, String> {
    let config = load_config(matches)?;
    Queues::open(&config).map_err(|e| format!("Failed to open backend: {}", e))
}

fn run_bench(queues: &Queues, matches: &ArgMatches) -> i32 {
    let count = matches.get_one::<u64>("count").copied().unwrap_or(10_000);
    let name = matches
        .get_one::<String>("name")
        .map(String::as_str)
        .unwrap_or("bench");

    println!("{} backend, queue {:?}", queues.backend(), name);
    match bench::run_bench(queues, name, count) {
        Ok(report) => {
            println!("{}", report);
            0
        }
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}

fn run_list(queues: &Queues) -> i32 {
    match queues.list_queues() {
        Ok(names) => {
            for name in names {
                println!("{}", name);
            }
            0
        }
        Err(e) => {
            eprintln!("(error) {}", e);
            1
        }
    }
}

fn run_shell(queues: Queues, history: bool) -> i32 {
    let mut state = SessionState::new(queues);
    if std::io::stdin().is_terminal() {
        repl::run_repl(&mut state, history);
        0
    } else {
        repl::run_pipe(&mut state)
    }
}
