use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueHint};

/// Write synthetic CosmicIC/CLASS and LCDM/WDM/FDM transfer-function tables.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Directory the tables are written to
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let files = tf_compare::sample::write_all(&args.output_dir)?;
    for path in &files {
        println!("{}", path.display());
    }
    println!(
        "Wrote {} tables ({} wavenumbers each) to {}",
        files.len(),
        tf_compare::sample::N_K,
        args.output_dir.display()
    );
    Ok(())
}
