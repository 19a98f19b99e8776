//! Metagame simulator CLI
//!
//! Simulate Swiss tournaments from matchup data and report how each deck
//! converts to Day 2 and the top cut.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use swiss_core::{BatchRunner, CancelToken, MatchupIndex};
use tournament::{load_matchups, BatchProgressBar, BatchReport, RunSettings};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "tournament.toml";

#[derive(Parser, Debug)]
#[command(name = "tournament")]
#[command(about = "Estimate deck Day 2 and top cut conversion with simulated Swiss tournaments")]
struct Cli {
    /// Matchup data (CSV or JSON)
    #[arg(long)]
    matchups: Option<PathBuf>,

    /// Settings file, read if present
    #[arg(long, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    /// Players per tournament
    #[arg(long, short = 'n')]
    entrants: Option<u32>,

    /// Tournaments to simulate
    #[arg(long, short = 't')]
    trials: Option<u32>,

    /// Play rate for one deck, e.g. --rate Burn=12.5 (repeatable, replaces saved rates)
    #[arg(long = "rate", value_name = "DECK=PERCENT", value_parser = parse_rate)]
    rates: Vec<(String, f64)>,

    /// Give every deck in the data the same share
    #[arg(long, conflicts_with = "rates")]
    equal_rates: bool,

    /// Spread trials across all cores
    #[arg(long)]
    parallel: bool,

    /// Stop after this many seconds and report the trials completed so far
    #[arg(long, value_name = "SECS")]
    time_limit: Option<u64>,

    /// Write the report as JSON
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    save_config: bool,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    quiet: bool,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_rate(arg: &str) -> std::result::Result<(String, f64), String> {
    let (deck, rate) = arg
        .rsplit_once('=')
        .ok_or_else(|| format!("expected DECK=PERCENT, got `{arg}`"))?;
    let deck = deck.trim();
    if deck.is_empty() {
        return Err(format!("missing deck name in `{arg}`"));
    }
    let rate: f64 = rate
        .trim()
        .parse()
        .map_err(|_| format!("invalid percentage `{rate}`"))?;
    Ok((deck.to_string(), rate))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Merge the settings file with command-line overrides
fn resolve_settings(cli: &Cli) -> Result<RunSettings> {
    let mut settings = if cli.config.exists() {
        RunSettings::load(&cli.config)
            .with_context(|| format!("loading settings from {}", cli.config.display()))?
    } else {
        RunSettings::default()
    };

    if let Some(path) = &cli.matchups {
        settings.matchups = Some(path.clone());
    }
    if let Some(entrants) = cli.entrants {
        settings.entrants = entrants;
    }
    if let Some(trials) = cli.trials {
        settings.trials = trials;
    }
    if !cli.rates.is_empty() {
        settings.play_rates = cli.rates.iter().cloned().collect();
    }
    if cli.parallel {
        settings.parallel = true;
    }
    if cli.time_limit.is_some() {
        settings.time_limit_secs = cli.time_limit;
    }
    if let Some(output) = &cli.output {
        settings.output = Some(output.clone());
    }
    Ok(settings)
}

fn run_batch(settings: &RunSettings, index: &MatchupIndex, quiet: bool) -> BatchReport {
    let rates = settings.play_rates();
    let token = CancelToken::with_time_limit(settings.time_limit_secs.map(Duration::from_secs));
    token.start();

    let bar = if quiet {
        BatchProgressBar::hidden()
    } else {
        BatchProgressBar::new(settings.trials)
    };

    let mut batch = BatchRunner::new(index, &rates, settings.entrants)
        .on_progress(|progress| bar.update(progress))
        .cancel_token(token);
    let results = if settings.parallel {
        batch.run_parallel(settings.trials)
    } else {
        batch.run(settings.trials)
    };
    bar.finish(&results);

    BatchReport::new(settings.entrants, settings.trials, results)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = resolve_settings(&cli)?;
    let matchups = settings
        .matchups
        .clone()
        .context("no matchup data: pass --matchups or set `matchups` in the settings file")?;
    let rows = load_matchups(&matchups)
        .with_context(|| format!("loading matchups from {}", matchups.display()))?;
    let index = MatchupIndex::from_rows(rows);

    if cli.equal_rates || settings.play_rates.is_empty() {
        tracing::info!(decks = index.decks().len(), "using equal play rates");
        settings.set_equal_rates(&index);
    }
    settings.validate(&index)?;

    for (a, b) in index.missing_pairs() {
        tracing::debug!(%a, %b, "no matchup record, games will be coin flips");
    }

    if cli.save_config {
        settings
            .save(&cli.config)
            .with_context(|| format!("saving settings to {}", cli.config.display()))?;
        tracing::info!(path = %cli.config.display(), "settings saved");
    }

    let report = run_batch(&settings, &index, cli.quiet);
    report.print_report();

    if let Some(output) = &settings.output {
        report
            .save(output)
            .with_context(|| format!("saving report to {}", output.display()))?;
        tracing::info!(path = %output.display(), "report saved");
    }

    Ok(())
}
