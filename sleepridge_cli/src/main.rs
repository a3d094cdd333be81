use clap::Parser;
use sleepridge_core::*;
use std::path::{Path, PathBuf};

/// Report is always written here, relative to the working directory
const OUTPUT_FILE: &str = "output.png";

#[derive(Parser)]
#[command(name = "sleepridge", version)]
#[command(about = "Ridge plot of day-over-day sleep timing", long_about = None)]
struct Cli {
    /// Activity log CSV with Activity, Date and Time, End Time columns
    path: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    sleepridge_core::logging::init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let intervals = load_sleep_intervals(&cli.path)?;
    let samples = build_dataset(&intervals, &config.sampler)?;
    tracing::info!(
        "Sampled {} asleep points from {} intervals",
        samples.len(),
        intervals.len()
    );

    let output = Path::new(OUTPUT_FILE);
    render_ridge_plot(&samples, output, &config.render)?;

    println!("✓ Wrote {}", output.display());
    Ok(())
}
