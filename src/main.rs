use clap::Parser;
use pollutant_processor::cli::{run, Cli};
use pollutant_processor::error::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}
