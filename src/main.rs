use clap::Parser;
use how_many_sources::config::SweepConfig;
use how_many_sources::report::{OutputFormat, RowWriter};
use how_many_sources::sweep::{run_sweep, SweepError, SweepSummary};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "how-many-sources")]
#[command(about = "Monte Carlo estimate of how many colored sources a deck needs to cast spells on curve", long_about = None)]
struct Cli {
    /// JSON sweep configuration; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of games to simulate per deck configuration
    #[arg(short, long)]
    trials: Option<u64>,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Worker threads (default: available cores minus one)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Deck sizes to sweep, comma separated
    #[arg(long, value_delimiter = ',')]
    deck_sizes: Option<Vec<u32>>,

    /// Last turn to sweep
    #[arg(long)]
    max_turn: Option<u32>,

    /// Row format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write rows to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Do not draw a progress bar on stderr
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn sweep_config(&self) -> Result<SweepConfig, SweepError> {
        let mut config = match &self.config {
            Some(path) => SweepConfig::from_file(path)?,
            None => SweepConfig::default(),
        };
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        if let Some(deck_sizes) = &self.deck_sizes {
            config.deck_sizes = deck_sizes.clone();
        }
        if let Some(max_turn) = self.max_turn {
            config.max_turn = max_turn;
        }
        config.validate()?;
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<SweepSummary, SweepError> {
    let config = cli.sweep_config()?;
    let show_progress = !cli.no_progress;

    match &cli.output {
        Some(path) => {
            info!("Writing rows to {}", path.display());
            let file = BufWriter::new(File::create(path)?);
            run_sweep(&config, RowWriter::new(file, cli.format), show_progress)
        }
        None => {
            let stdout = BufWriter::new(io::stdout());
            run_sweep(&config, RowWriter::new(stdout, cli.format), show_progress)
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(summary) => {
            info!("✓ Done (seed {} reproduces this run)", summary.seed);
        }
        Err(e) => {
            eprintln!("✗ Sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}
