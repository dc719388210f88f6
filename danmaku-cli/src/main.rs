//! Danmaku CLI: list, check and run the built-in pattern catalog.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Usage or input error
//! - 2: Check findings
//! - 3: Unknown pattern

mod catalog;
mod commands;
mod stage;

use std::process;

use tracing_subscriber::EnvFilter;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    init_logging();

    let result = match args[1].as_str() {
        "list" => commands::list(&args[2..]),
        "check" => commands::check(&args[2..]),
        "run" => commands::run(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            process::exit(0);
        }
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    if let Err(code) = result {
        process::exit(code);
    }
}

fn print_usage() {
    eprintln!("Usage: danmaku <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  list                                 List built-in patterns");
    eprintln!("  check                                Statically check the catalog");
    eprintln!("  run <enemy> [options]                Run one enemy on the headless stage");
    eprintln!();
    eprintln!("Run options:");
    eprintln!("  --ticks N        Stop after N ticks (default 600)");
    eprintln!("  --seed S         Random seed (default 0)");
    eprintln!("  --trace FILE     Write one line per tick to FILE");
    eprintln!("  --no-player      Run without a player to aim at");
}
