// apps/scanner/src/main.rs
mod config;
mod display;
mod explainer;
mod scan;

use adapters::{CoinGeckoClient, MarketDataSource};
use clap::{Args, Parser, Subcommand};
use scan::{ScanOptions, Scanner};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;
use universe::{Ranker, ScoreHistory};

#[derive(Debug, Parser)]
#[command(name = "scanner", about = "Small-cap crypto momentum scanner")]
struct Cli {
    /// Path to a TOML config file (default: config/scanner.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch, score and print the ranking once
    Scan(ScanArgs),
    /// Rescan on an interval and track score velocity
    Watch {
        #[command(flatten)]
        scan: ScanArgs,
        /// Seconds between scans
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Print live prices for the given coin ids
    Prices {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Biggest 24h gainers and losers
    Movers {
        #[arg(short = 'n', long, default_value_t = 15)]
        count: usize,
    },
    /// Explain the metrics behind the score
    Explain,
}

#[derive(Debug, Clone, Default, Args)]
struct ScanArgs {
    /// Rows to print
    #[arg(short = 'n', long = "top")]
    top: Option<usize>,
    /// Coins to fetch from the markets endpoint
    #[arg(long = "fetch")]
    fetch: Option<usize>,
    #[arg(long)]
    include_blue_chips: bool,
    /// Extra trending coin ids, comma separated
    #[arg(long, value_delimiter = ',')]
    trend_ids: Vec<String>,
}

impl ScanArgs {
    fn options(&self, config: &config::ScannerConfig) -> ScanOptions {
        ScanOptions {
            fetch_top_n: self.fetch.unwrap_or(config.api.fetch_top_n),
            show_top: self.top.unwrap_or(config.scan.show_top),
            exclude_blue_chips: config.scan.exclude_blue_chips && !self.include_blue_chips,
            extra_trend_ids: self.trend_ids.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<common::Error>() {
                Some(common::Error::RateLimit(msg)) => eprintln!("Rate limit: {}", msg),
                _ => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let command = cli.command.unwrap_or(Command::Scan(ScanArgs::default()));
    if let Command::Explain = command {
        println!("{}", explainer::format_for_cli());
        return Ok(());
    }

    let config = config::load_config(cli.config.as_deref())?;
    let client = Arc::new(CoinGeckoClient::new(config.api.clone())?);
    tracing::debug!("Using {}", client.config().base_url);

    match command {
        Command::Scan(args) => {
            let opts = args.options(&config);
            let scanner = Scanner::new(client, Ranker::new(config.scoring.scorer()));
            let report = scanner.scan(&opts).await?;
            scan::print_report(&report, &opts, None);
        }
        Command::Watch { scan: args, interval } => {
            let opts = args.options(&config);
            let every = Duration::from_secs(interval.unwrap_or(config.scan.watch_interval_secs).max(1));
            let scanner = Scanner::new(client, Ranker::new(config.scoring.scorer()));
            let mut history = ScoreHistory::new(config.scan.history_capacity);

            let (shutdown_tx, shutdown_rx) = watch::channel(false);
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        tracing::info!("Shutdown signal received");
                        let _ = shutdown_tx.send(true);
                    }
                    Err(e) => {
                        tracing::warn!("Ctrl-C handler unavailable: {}", e);
                        // Hold the sender until the watch loop exits
                        shutdown_tx.closed().await;
                    }
                }
            });

            scan::run_watch(&scanner, &opts, every, &mut history, shutdown_rx).await?;
        }
        Command::Prices { ids } => {
            let ids = scan::normalize_ids(&ids);
            let prices = client.fetch_simple_prices(&ids).await?;
            println!();
            for id in &ids {
                match prices.get(id) {
                    Some(update) => println!("{}", display::format_price_update(id, update)),
                    None => println!("  {:<24} no data", id),
                }
            }
        }
        Command::Movers { count } => {
            let coins = client.fetch_markets(100).await?;
            let (gainers, losers) = universe::top_movers(&coins, count);
            println!();
            println!("Top gainers (24h)");
            for coin in &gainers {
                println!("{}", display::format_coin(coin, None));
            }
            println!();
            println!("Top losers (24h)");
            for coin in &losers {
                println!("{}", display::format_coin(coin, None));
            }
        }
        Command::Explain => {}
    }

    Ok(())
}
