use anyhow::Result;
use clap::Parser;

use tf_compare::compare::normalized::{self, Args};

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    for path in normalized::run(&args)? {
        log::info!("saved {}", path.display());
    }
    Ok(())
}
