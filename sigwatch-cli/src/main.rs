//! Sigwatch CLI: run the signal pipeline once and manage trade stats.
//!
//! Commands:
//! - `run`: evaluate every configured instrument and send execution notices
//! - `stats show`: print the persisted stats record
//! - `stats record`: apply a closed trade's profit or loss
//! - `stats export-equity`: write the equity curve as CSV
//! - `config check`: load and validate the configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigwatch_core::data::YahooSource;
use sigwatch_runner::{
    write_equity_csv, BotConfig, ConfigOrigin, Notifier, Pipeline, SessionDedupStore,
    StdoutNotifier, StatsStore, TelegramCredentials, TelegramNotifier, DEFAULT_CONFIG_FILE,
};

#[derive(Parser)]
#[command(
    name = "sigwatch",
    about = "Sigwatch: session-gated EWMA crossover signal notifier"
)]
struct Cli {
    /// Path to the TOML config file. The built-in table is used if it does not exist.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate all instruments once and send notices.
    Run {
        /// Print notices to stdout instead of Telegram. Credentials are not needed.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Do not write the session dedup file after the run.
        #[arg(long, default_value_t = false)]
        no_commit: bool,
    },
    /// Trade statistics commands.
    Stats {
        #[command(subcommand)]
        action: StatsAction,
    },
    /// Configuration commands.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum StatsAction {
    /// Print balance, win/loss counts and the current losing streak.
    Show,
    /// Apply a closed trade result to the stats record.
    Record {
        /// Profit (positive) or loss (negative) in account currency.
        #[arg(long, allow_hyphen_values = true)]
        pnl: f64,
    },
    /// Write the equity curve as `trade,balance` CSV.
    ExportEquity {
        /// Output CSV path.
        #[arg(long, default_value = "equity.csv")]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Load and validate the configuration, then print the instrument table.
    Check,
}

fn main() -> Result<()> {
    // .env is optional; loaded first so RUST_LOG can live there
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { dry_run, no_commit } => run_pipeline(&cli.config, dry_run, no_commit),
        Commands::Stats { action } => {
            let config = load_config(&cli.config)?;
            let store = StatsStore::new(&config.state.stats_file);
            match action {
                StatsAction::Show => run_stats_show(&store),
                StatsAction::Record { pnl } => run_stats_record(&store, pnl),
                StatsAction::ExportEquity { output } => run_export_equity(&store, &output),
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Check => run_config_check(&cli.config),
        },
    }
}

fn load_config(path: &Path) -> Result<BotConfig> {
    let (config, origin) = BotConfig::load_or_default(path)
        .with_context(|| format!("invalid configuration ({})", path.display()))?;
    match origin {
        ConfigOrigin::File(path) => tracing::info!(path = %path.display(), "config loaded"),
        ConfigOrigin::BuiltIn => {
            tracing::info!(path = %path.display(), "config file not found, using built-in table")
        }
    }
    Ok(config)
}

fn run_pipeline(config_path: &Path, dry_run: bool, no_commit: bool) -> Result<()> {
    let config = load_config(config_path)?;

    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(StdoutNotifier)
    } else {
        let credentials =
            TelegramCredentials::from_env().context("Telegram credentials are required")?;
        Box::new(TelegramNotifier::new(credentials)?)
    };
    let source = YahooSource::new()?;

    let mut dedup = SessionDedupStore::open(&config.state.session_file);
    let stats = StatsStore::new(&config.state.stats_file).load();

    let pipeline = Pipeline::new(&config, &source, notifier.as_ref());
    let report = pipeline.run_once(chrono::Utc::now(), &mut dedup, &stats);

    if no_commit {
        tracing::info!("--no-commit given, session dedup file left unchanged");
    } else if let Err(e) = dedup.save() {
        tracing::error!(path = %dedup.path().display(), error = %e, "failed to save session dedup state");
    }

    println!("{}", report.summary());
    Ok(())
}

fn run_stats_show(store: &StatsStore) -> Result<()> {
    let record = store.load();
    println!("Stats: {}", store.path().display());
    println!("Balance:      {:.2}", record.balance);
    println!("Trades:       {}", record.trades());
    println!("Wins:         {}", record.wins);
    println!("Losses:       {}", record.losses);
    match record.win_rate() {
        Some(rate) => println!("Win rate:     {rate:.1}%"),
        None => println!("Win rate:     n/a"),
    }
    println!("Loss streak:  {}", record.streak_loss);
    println!("Equity points: {}", record.equity.len());
    Ok(())
}

fn run_stats_record(store: &StatsStore, pnl: f64) -> Result<()> {
    anyhow::ensure!(pnl.is_finite(), "--pnl must be a finite number");
    let record = store
        .record_trade(pnl)
        .with_context(|| format!("stats not updated; fix or remove {}", store.path().display()))?;
    println!(
        "Recorded {pnl:+.2}: balance {:.2}, loss streak {}",
        record.balance, record.streak_loss
    );
    Ok(())
}

fn run_export_equity(store: &StatsStore, output: &Path) -> Result<()> {
    let record = store.load();
    write_equity_csv(output, &record.equity)?;
    println!(
        "Equity curve ({} points) written to: {}",
        record.equity.len(),
        output.display()
    );
    Ok(())
}

fn run_config_check(path: &Path) -> Result<()> {
    let config = load_config(path)?;
    println!("Configuration OK");
    println!(
        "Dedup scope: {:?}, range {} @ {}, R {}, stop {}%",
        config.dedup_scope,
        config.data.range,
        config.data.interval,
        config.risk.reward_multiple,
        config.risk.stop_distance_pct
    );
    println!();
    println!(
        "{:<8} {:<10} {:<8} {:>6}  {}",
        "Key", "Ticker", "Class", "Risk", "Correlated"
    );
    println!("{}", "-".repeat(50));
    for inst in &config.instruments {
        println!(
            "{:<8} {:<10} {:<8} {:>5.2}%  {}",
            inst.key,
            inst.ticker,
            inst.class.to_string(),
            inst.risk_pct,
            inst.correlated_with.join(", ")
        );
    }
    Ok(())
}
