use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::AnalyzeParams;

#[derive(Parser)]
#[command(
    name = "ipolens",
    version,
    about = "Score IPO prospectuses for profitability using keywords, news sentiment and competitor data",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "IPOLENS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a prospectus and write a report
    Analyze {
        /// Prospectus document (text or HTML)
        #[arg(short, long)]
        document: PathBuf,

        /// IPO (company) name
        #[arg(short, long)]
        name: String,

        /// Ticker symbol; skips the ticker search
        #[arg(short, long)]
        ticker: Option<String>,

        /// Output directory for the report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format (markdown, json)
        #[arg(short, long)]
        format: Option<String>,

        /// Skip news sentiment
        #[arg(long, default_value = "false")]
        no_news: bool,

        /// Skip ticker resolution and market data
        #[arg(long, default_value = "false")]
        no_market: bool,

        /// Print Prometheus metrics to stderr when the run finishes
        #[arg(long, default_value = "false")]
        metrics: bool,
    },

    /// Print the configured keyword vocabulary
    Vocabulary,

    /// Print the effective configuration as TOML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = commands::load_config(cli.config.as_deref())?;
    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());

    // Initialize tracing/logging
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    if let Err(e) = ipolens::metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics initialization failed");
    }

    match cli.command {
        Commands::Analyze {
            document,
            name,
            ticker,
            output,
            format,
            no_news,
            no_market,
            metrics,
        } => {
            tracing::info!(
                document = %document.display(),
                name = %name,
                ticker = ?ticker,
                no_news = %no_news,
                no_market = %no_market,
                "Starting analyze command"
            );

            let params = AnalyzeParams {
                document,
                name,
                ticker,
                output,
                format,
                no_news,
                no_market,
                metrics,
            };

            if !commands::analyze(config, params).await? {
                std::process::exit(1);
            }
        }

        Commands::Vocabulary => commands::vocabulary(&config),

        Commands::Config => commands::show_config(&config)?,
    }

    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ipolens=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("ipolens={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
