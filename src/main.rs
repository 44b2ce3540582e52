//! PIX Ledger CLI
//!
//! Replays a CSV script of ledger commands and prints the final account
//! states (or, with `--history`, every account's transaction history).
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > accounts.csv
//! cargo run -- commands.csv --history > history.csv
//! cargo run -- commands.csv --seed
//! ```
//!
//! `--seed` registers the demo accounts `user1` and `user2` before the
//! script runs.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use pix_ledger::{Ledger, LedgerError, Result};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut input_path = None;
    let mut show_history = false;
    let mut seed = false;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--history" => show_history = true,
            "--seed" => seed = true,
            _ if input_path.is_none() => input_path = Some(arg),
            _ => log::warn!("Ignoring extra argument '{}'", arg),
        }
    }

    let input_path = input_path.ok_or(LedgerError::MissingArgument)?;
    let file = File::open(&input_path)?;
    let reader = BufReader::new(file);

    let mut ledger = Ledger::new();
    if seed {
        ledger.seed_sample_accounts()?;
    }
    ledger.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    if show_history {
        ledger.write_history(handle)?;
    } else {
        ledger.write_output(handle)?;
    }

    Ok(())
}
