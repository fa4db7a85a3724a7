//! Producer/Consumer Simulation CLI
//!
//! Spawns N functional producers (prime values), M faulty producers (even
//! values), and K consumers around one bounded circular buffer, coordinated
//! by two counting semaphores and a mutex, then prints a final summary.
//!
//! # Output Format
//!
//! The summary is written to stdout; with `--json` it is serialized instead.
//! With `--debug`, one trace line per insert/remove is printed showing the
//! acting worker, the value, and the live buffer contents.
//!
//! # Exit Codes
//!
//! - `0`: Simulation ran to completion
//! - `2`: Invalid arguments or configuration error

use prodcon_rs::{run, seed_from_clock, SimConfig};
use std::env;
use std::process;

fn print_usage(exe: &std::ffi::OsStr) {
    eprintln!(
        "usage: {} --items=<N> --length=<N> --producers=<N> --faulty=<N> --consumers=<N> [OPTIONS]

REQUIRED:
    --items=<N>             Items to produce per producer thread (>= 1)
    --length=<N>            Buffer capacity in slots (>= 1)
    --producers=<N>         Functional producer threads (insert primes)
    --faulty=<N>            Faulty producer threads (insert even numbers)
    --consumers=<N>         Consumer threads (>= 1)

OPTIONS:
    --seed=<N>              Master RNG seed (default: derived from the clock)
    --debug                 Print a trace line per insert/remove
    --json                  Emit the final report as JSON
    --help, -h              Show this help message",
        exe.to_string_lossy()
    );
}

fn parse_count(flag: &str, value: &str) -> u64 {
    value.parse().unwrap_or_else(|_| {
        eprintln!("invalid {} value: {}", flag, value);
        process::exit(2);
    })
}

fn main() {
    let mut args = env::args_os();
    let exe = args.next().unwrap_or_else(|| "prodcon".into());

    let mut items: Option<u64> = None;
    let mut length: Option<usize> = None;
    let mut producers: Option<usize> = None;
    let mut faulty: Option<usize> = None;
    let mut consumers: Option<usize> = None;
    let mut seed: Option<u64> = None;
    let mut debug = false;
    let mut json = false;

    for arg in args {
        let Some(flag) = arg.to_str() else {
            eprintln!("invalid argument: {}", arg.to_string_lossy());
            process::exit(2);
        };

        if let Some(value) = flag.strip_prefix("--items=") {
            items = Some(parse_count("--items", value));
            continue;
        }
        if let Some(value) = flag.strip_prefix("--length=") {
            length = Some(parse_count("--length", value) as usize);
            continue;
        }
        if let Some(value) = flag.strip_prefix("--producers=") {
            producers = Some(parse_count("--producers", value) as usize);
            continue;
        }
        if let Some(value) = flag.strip_prefix("--faulty=") {
            faulty = Some(parse_count("--faulty", value) as usize);
            continue;
        }
        if let Some(value) = flag.strip_prefix("--consumers=") {
            consumers = Some(parse_count("--consumers", value) as usize);
            continue;
        }
        if let Some(value) = flag.strip_prefix("--seed=") {
            seed = Some(parse_count("--seed", value));
            continue;
        }
        match flag {
            "--debug" => debug = true,
            "--json" => json = true,
            "--help" | "-h" => {
                print_usage(&exe);
                process::exit(0);
            }
            _ => {
                eprintln!("unknown flag: {}", flag);
                print_usage(&exe);
                process::exit(2);
            }
        }
    }

    let (Some(items), Some(length), Some(producers), Some(faulty), Some(consumers)) =
        (items, length, producers, faulty, consumers)
    else {
        eprintln!("missing required flag");
        print_usage(&exe);
        process::exit(2);
    };

    let config = SimConfig {
        items,
        capacity: length,
        producers,
        faulty,
        consumers,
        debug,
        seed: seed.unwrap_or_else(seed_from_clock),
    };

    let report = match run(config) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("invalid configuration: {}", err);
            print_usage(&exe);
            process::exit(2);
        }
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("failed to serialize report: {}", err);
                process::exit(1);
            }
        }
    } else {
        println!("{report}");
    }
}
