use std::process::ExitCode;

use clap::Parser;

use tf_compare::compare::ratio::{self, Args};

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();
    match ratio::run(&args) {
        Ok(output) => {
            println!("Figure saved to {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
