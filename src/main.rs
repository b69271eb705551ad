use clap::Parser;
use downloads_tidy::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    match commands::execute(args) {
        Ok(true) => process::exit(0),
        // Single-file conversion failed; details were already reported
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
