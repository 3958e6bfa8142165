//! sensorfeed entry point
//!
//! Parses CLI arguments, runs the selected command and exits non-zero on
//! failure. All logic lives in the `cli` module.

use sensorfeed::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
