//! League CLI
//!
//! Simulates a season week by week and prints the table, championship odds
//! and results. Optionally persists to a store file.

use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use league_cli::{format_history, format_probabilities, format_standings, format_week};
use league_core::{FileStore, LeagueConfig, LeagueSession, LeagueStore, MemoryStore};

#[derive(Parser)]
#[command(name = "league")]
#[command(about = "Simulate a round-robin football league", long_about = None)]
struct Cli {
    /// YAML config file (falls back to LEAGUE_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a new season
    Run {
        /// Season RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Monte Carlo trials per projection
        #[arg(long)]
        trials: Option<usize>,

        /// Stop after this many weeks
        #[arg(long)]
        weeks: Option<usize>,

        /// Store file to persist the league to
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print a stored league's table and probability history
    Show {
        /// Store file
        #[arg(long)]
        store: PathBuf,

        /// League id (latest when omitted)
        #[arg(long)]
        league: Option<i64>,
    },
}

fn main() -> Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LeagueConfig::from_path(path)?,
        None => LeagueConfig::from_env()?,
    };

    match cli.command {
        Commands::Run { seed, trials, weeks, store } => {
            let mut config = config;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            if let Some(trials) = trials {
                config = config.with_trials(trials);
            }

            match store {
                Some(path) => {
                    let store = FileStore::open(&path)
                        .with_context(|| format!("failed to open store {}", path.display()))?;
                    run(LeagueSession::start(config, store)?, weeks)
                }
                None => run(LeagueSession::start(config, MemoryStore::new())?, weeks),
            }
        }

        Commands::Show { store, league } => {
            let store = FileStore::open(&store)
                .with_context(|| format!("failed to open store {}", store.display()))?;
            let session = LeagueSession::resume(config, store, league)?;

            let record = session.league();
            println!("{} {} (league {}, {:?})", record.name, record.season, record.id, record.status);
            println!();
            print!("{}", format_standings(&session.standings()));
            println!();
            print!("{}", format_history(&session.history()));
            Ok(())
        }
    }
}

fn run<S: LeagueStore>(mut session: LeagueSession<S>, weeks: Option<usize>) -> Result<()> {
    let limit = weeks.unwrap_or(usize::MAX);
    info!(league_id = session.league().id, "season started");

    println!("{} {}", session.config().league_name, session.config().season_label);
    print!("{}", format_standings(&session.standings()));
    println!();

    if limit > 0 {
        let played = session.advance_to_end_with(|update| {
            if let Some(report) = &update.report {
                print!("{}", format_week(report.week, &report.results));
            }
            if let Some(err) = &update.persist_error {
                warn!(error = %err, "week not saved");
                if !err.is_recoverable() {
                    return ControlFlow::Break(());
                }
            }
            if update.report.as_ref().is_some_and(|r| r.week >= limit) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        info!(played, "weeks simulated");
        println!();
    }

    print!("{}", format_standings(&session.standings()));
    println!();
    println!("Championship odds");
    print!("{}", format_probabilities(&session.probabilities()));

    let champions = session.champions();
    if !champions.is_empty() {
        println!();
        println!("Champion: {}", champions.join(", "));
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    tracing_log::LogTracer::init().context("failed to bridge log records")?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install subscriber")?;
    Ok(())
}
