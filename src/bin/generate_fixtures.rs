use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use ecg_prep::synth::generate_fixture_set;

/// Write synthetic 12-lead Challenge records (`.hea` + Level 4 `.mat`).
#[derive(Debug, Parser)]
struct Args {
    #[arg(long)]
    out: PathBuf,

    #[arg(long, default_value_t = 20)]
    count: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    let records = generate_fixture_set(&args.out, args.count, args.seed)?;

    for record in &records {
        println!("{} age {} sex {} dx {}", record.name, record.age, record.sex, record.dx);
    }
    Ok(())
}
