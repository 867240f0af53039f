use crate::config::{ConfigError, SweepConfig};
use crate::report::{ResultRow, RowWriter};
use crate::rng::{random_seed, SimRng};
use crate::simulation::deck::DeckError;
use crate::simulation::engine::{simulate_requirement, ColorRequirement, Requirement, RequirementError, SimSettings};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Invalid requirement: {0}")]
    Requirement(#[from] RequirementError),
    #[error("Invalid deck: {0}")]
    Deck(#[from] DeckError),
    #[error("Output error: {0}")]
    Output(#[from] io::Error),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Output writer stopped before the sweep finished")]
    SinkClosed,
    #[error("Output writer thread panicked")]
    WriterPanicked,
}

/// What a finished sweep did
#[derive(Debug)]
pub struct SweepSummary {
    pub requirements: usize,
    pub rows: usize,
    pub undefined: usize,
    pub seed: u64,
    pub elapsed: Duration,
}

/// Every requirement the sweep covers: per deck size and turn, the
/// single-color needs followed by the two-color need pairs
pub fn build_requirements(config: &SweepConfig) -> Result<Vec<Requirement>, RequirementError> {
    let mut requirements = Vec::new();
    for &cards in &config.deck_sizes {
        let lands = config.lands_for(cards);
        for turn in 1..=config.max_turn {
            for need in 1..=config.max_single_need.min(turn) {
                requirements.push(Requirement::new(cards, lands, turn, &[need])?);
            }
            for need_a in 1..=config.max_pair_need.min(turn) {
                for need_b in 1..=config.max_pair_need.min(turn - need_a) {
                    requirements.push(Requirement::new(cards, lands, turn, &[need_a, need_b])?);
                }
            }
        }
    }
    Ok(requirements)
}

fn progress_bar(len: usize, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} requirements (eta {eta})") {
        bar.set_style(style);
    }
    bar
}

/// Simulate every requirement of the sweep on a dedicated worker pool.
///
/// Each requirement is one task with its own generator stream, so a fixed
/// seed reproduces every row. Workers send each requirement's rows as one
/// batch to a single writer thread; the channel closes once all workers
/// are done and the writer drains what is left. Batches arrive in
/// completion order.
pub fn run_sweep<W: Write + Send>(
    config: &SweepConfig,
    writer: RowWriter<W>,
    show_progress: bool,
) -> Result<SweepSummary, SweepError> {
    config.validate()?;
    let requirements = build_requirements(config)?;
    let seed = config.seed.unwrap_or_else(random_seed);
    let workers = config.worker_count();
    let settings = SimSettings {
        trials: config.trials,
        max_good_lands: config.max_good_lands,
    };

    info!(
        "Sweeping {} requirements, {} trials each, {} workers, seed {}",
        requirements.len(),
        config.trials,
        workers,
        seed
    );

    let pool = rayon::ThreadPoolBuilder::new().num_threads(workers).build()?;
    let bar = progress_bar(requirements.len(), show_progress);
    let start = Instant::now();

    let (tx, rx) = mpsc::channel::<Vec<ResultRow>>();

    let (written, simulated) = thread::scope(|scope| {
        let writer_thread = scope.spawn(move || -> io::Result<(usize, usize)> {
            let mut writer = writer;
            let mut undefined = 0;
            writer.write_header()?;
            for batch in rx {
                for row in &batch {
                    if row.probability.is_none() {
                        debug!("No trial drew enough lands: {:?}", row);
                        undefined += 1;
                    }
                    writer.write_row(row)?;
                }
            }
            let rows = writer.rows_written();
            writer.finish()?;
            Ok((rows, undefined))
        });

        let simulated = pool.install(|| {
            requirements
                .par_iter()
                .enumerate()
                .try_for_each_with(tx, |tx, (index, requirement)| {
                    let mut rng = SimRng::for_stream(seed, index as u64);
                    let rows = simulate_requirement(requirement, &settings, &mut rng)?;
                    debug!(
                        "{} done: {} rows (seed {}, stream {})",
                        describe(requirement),
                        rows.len(),
                        rng.seed(),
                        index
                    );
                    bar.inc(1);
                    tx.send(rows).map_err(|_| SweepError::SinkClosed)
                })
        });

        (writer_thread.join(), simulated)
    });

    bar.finish_and_clear();

    // A writer failure is the root cause of any SinkClosed from the workers
    let (rows, undefined) = written.map_err(|_| SweepError::WriterPanicked)??;
    simulated?;

    let summary = SweepSummary {
        requirements: requirements.len(),
        rows,
        undefined,
        seed,
        elapsed: start.elapsed(),
    };
    if summary.undefined > 0 {
        warn!("{} rows have an undefined probability", summary.undefined);
    }
    info!(
        "Wrote {} rows for {} requirements in {:.2?}",
        summary.rows, summary.requirements, summary.elapsed
    );
    Ok(summary)
}

fn describe(requirement: &Requirement) -> String {
    let colors = match requirement.colors() {
        ColorRequirement::One(need) => format!("{}", need),
        ColorRequirement::Two(need_a, need_b) => format!("{}+{}", need_a, need_b),
    };
    format!(
        "{} cards, turn {}, needs {}",
        requirement.total_cards(),
        requirement.turn(),
        colors
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{OutputFormat, CSV_HEADER};

    fn small_config() -> SweepConfig {
        SweepConfig {
            deck_sizes: vec![40],
            max_turn: 2,
            trials: 50,
            seed: Some(2024),
            workers: Some(2),
            ..SweepConfig::default()
        }
    }

    #[test]
    fn test_default_requirement_count() {
        let requirements = build_requirements(&SweepConfig::default()).unwrap();

        // Per turn: min(6, t) single needs, sum over i of min(3, t - i) pairs
        let per_size: u32 = (1..=15u32)
            .map(|t| {
                let singles = t.min(6);
                let pairs: u32 = (1..=t.min(3)).map(|i| 3.min(t - i)).sum();
                singles + pairs
            })
            .sum();
        assert_eq!(requirements.len(), 3 * per_size as usize);
    }

    #[test]
    fn test_requirements_respect_turn() {
        let requirements = build_requirements(&SweepConfig::default()).unwrap();
        for requirement in &requirements {
            match requirement.colors() {
                ColorRequirement::One(need) => assert!(need <= requirement.turn().min(6)),
                ColorRequirement::Two(a, b) => {
                    assert!(a <= 3 && b <= 3);
                    assert!(a + b <= requirement.turn());
                }
            }
        }
        let turn_one: Vec<_> = requirements
            .iter()
            .filter(|r| r.turn() == 1 && r.total_cards() == 40)
            .collect();
        assert_eq!(turn_one.len(), 1);
        assert_eq!(turn_one[0].colors(), ColorRequirement::One(1));
        assert!(requirements.iter().any(|r| r.total_cards() == 99 && r.total_lands() == 42));
    }

    #[test]
    fn test_run_sweep_writes_every_row() {
        let config = small_config();
        let mut out = Vec::new();
        let summary = run_sweep(&config, RowWriter::new(&mut out, OutputFormat::Csv), false).unwrap();

        // turn 1: need 1 -> 17 rows; turn 2: needs 1, 2 -> 17 + 16 rows;
        // pair (1, 1) -> every split of 17 lands
        let expected = 17 + 17 + 16 + 1140;
        assert_eq!(summary.requirements, 4);
        assert_eq!(summary.rows, expected);
        assert_eq!(summary.seed, 2024);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADER));
        let rows: Vec<_> = lines.collect();
        assert_eq!(rows.len(), expected);
        assert!(rows.iter().all(|line| line.split(',').count() == 9));
    }

    #[test]
    fn test_run_sweep_is_reproducible_per_row() {
        let config = small_config();
        let mut first = Vec::new();
        let mut second = Vec::new();
        run_sweep(&config, RowWriter::new(&mut first, OutputFormat::Csv), false).unwrap();
        run_sweep(&config, RowWriter::new(&mut second, OutputFormat::Csv), false).unwrap();

        // Batches may arrive in any order, rows themselves must match
        let mut first: Vec<_> = String::from_utf8(first).unwrap().lines().map(String::from).collect();
        let mut second: Vec<_> = String::from_utf8(second).unwrap().lines().map(String::from).collect();
        first.sort();
        second.sort();
        assert_eq!(first, second);
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_sink_failure_is_fatal() {
        let config = small_config();
        let result = run_sweep(&config, RowWriter::new(FailingSink, OutputFormat::Csv), false);
        assert!(matches!(result, Err(SweepError::Output(_))));
    }
}
