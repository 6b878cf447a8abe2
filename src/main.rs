//! CLI entry point for the jigsaw tile pattern generator

use clap::Parser;
use jigtile::io::cli::{Cli, PatternProcessor};

fn main() -> jigtile::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let cli = Cli::parse();
    let mut processor = PatternProcessor::new(cli);
    processor.process()?;
    Ok(())
}
