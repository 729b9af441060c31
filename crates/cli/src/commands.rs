//! clap command tree for `kvq`.

use clap::{Arg, ArgAction, Command};

/// Build the top-level command.
pub fn build_cli() -> Command {
    Command::new("kvq")
        .about("Named LIFO queues over memcached, a spool directory or memory")
        .arg(
            Arg::new("backend")
                .long("backend")
                .short('b')
                .global(true)
                .value_parser(["memcached", "filebased", "memory"])
                .help("Backend to use (default: inferred from the other flags or QUEUE_BACKEND)"),
        )
        .arg(
            Arg::new("memcache")
                .long("memcache")
                .short('m')
                .global(true)
                .value_name("HOST:PORT[;HOST:PORT...]")
                .help("memcached servers (default: QUEUE_MEMCACHE_CONNECTION)"),
        )
        .arg(
            Arg::new("spool")
                .long("spool")
                .short('s')
                .global(true)
                .value_name("DIR")
                .help("Spool directory for the file backend (default: QUEUE_FILEBASED_SPOOL)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("TOML configuration file"),
        )
        .subcommand(
            Command::new("bench")
                .about("Write N integers, read them back in LIFO order and report timing")
                .arg(
                    Arg::new("count")
                        .short('n')
                        .long("count")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("10000"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .default_value("bench")
                        .help("Queue to use; it is reset first"),
                ),
        )
        .subcommand(Command::new("list").about("List the queues the backend reports"))
        .subcommand(
            Command::new("shell")
                .about("Interactive shell (reads commands from stdin when it is not a terminal)")
                .arg(
                    Arg::new("history")
                        .long("no-history")
                        .action(ArgAction::SetFalse)
                        .help("Do not load or save ~/.kvq_history"),
                ),
        )
}
