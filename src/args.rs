use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "domain-tally",
    about = "Count customers per email domain in a CSV file, sorted by domain",
    version,
    long_about = None
)]
pub struct Args {
    /// Path to the input CSV file
    #[arg(short, long, default_value = "./customers.csv")]
    pub path: PathBuf,

    /// Output CSV file (prints to the terminal when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Number of worker threads; scans on a single thread when omitted
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Scan in parallel using one worker per CPU (at most 8)
    #[arg(long, conflicts_with = "workers")]
    pub parallel: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
