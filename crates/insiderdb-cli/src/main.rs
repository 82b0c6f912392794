mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "insiderdb-cli")]
#[command(about = "Insider transaction pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    Sec,
    Reddit,
    All,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a sync against one or both sources.
    Sync {
        #[arg(long, value_enum, default_value_t = Source::All)]
        source: Source,
    },
    /// Cross-check a claimed transaction against EDGAR.
    Verify {
        ticker: String,
        /// Claimed trade date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Claimed dollar amount, e.g. "$1.9M".
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        insider: Option<String>,
    },
    /// List persisted alerts, newest filing first.
    Alerts {
        #[arg(long)]
        ticker: Option<String>,
        /// buy or sell.
        #[arg(long = "type")]
        transaction_type: Option<String>,
        /// verified, partial, or unverified.
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        limit: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = insiderdb_core::load_app_config()?;

    match cli.command {
        Commands::Sync { source } => {
            commands::run_sync(
                &config,
                matches!(source, Source::Sec | Source::All),
                matches!(source, Source::Reddit | Source::All),
            )
            .await
        }
        Commands::Verify {
            ticker,
            date,
            amount,
            insider,
        } => commands::run_verify(&config, ticker, date, amount, insider).await,
        Commands::Alerts {
            ticker,
            transaction_type,
            status,
            limit,
        } => commands::run_alerts(&config, ticker, transaction_type, status, limit).await,
    }
}
