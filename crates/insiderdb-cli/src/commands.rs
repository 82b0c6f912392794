//! Command handlers for the CLI.
//!
//! Called from `main` after config is loaded. Per-source failures during a
//! combined sync are printed and do not abort the other source.

use std::time::Duration;

use chrono::NaiveDate;
use sqlx::PgPool;

use insiderdb_core::{AppConfig, RunSummary, TransactionType, VerificationStatus};
use insiderdb_db::AlertFilter;
use insiderdb_edgar::{CikMap, EdgarClient};
use insiderdb_reddit::RedditClient;
use insiderdb_sync::VerifyRequest;

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = insiderdb_db::PoolConfig::from_app_config(config);
    let pool = insiderdb_db::connect_pool(&config.database_url, pool_config).await?;
    insiderdb_db::run_migrations(&pool).await?;
    Ok(pool)
}

fn edgar_client(config: &AppConfig) -> anyhow::Result<EdgarClient> {
    EdgarClient::new(
        &config.sec_user_agent,
        config.request_timeout_secs,
        config.max_retries,
        config.retry_backoff_base_secs,
    )
    .map_err(|e| anyhow::anyhow!("failed to build EDGAR client: {e}"))
}

fn print_summary(label: &str, summary: &RunSummary) {
    println!(
        "{label}: fetched {} / parsed {} / qualified {} / stored {} / skipped {}",
        summary.fetched, summary.parsed, summary.qualified, summary.stored, summary.skipped
    );
    for error in &summary.errors {
        println!("  error: {error}");
    }
}

/// Run the requested sync sources sequentially.
///
/// # Errors
///
/// Returns an error if the database or a client cannot be set up, or if
/// every requested source failed outright.
pub(crate) async fn run_sync(config: &AppConfig, sec: bool, reddit: bool) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let mut failures = Vec::new();

    if sec {
        let edgar = edgar_client(config)?;
        match insiderdb_sync::run_sec_sync(&pool, &edgar, config).await {
            Ok(summary) => print_summary("sec", &summary),
            Err(e) => {
                tracing::error!(error = %e, "SEC sync failed");
                failures.push(format!("sec: {e}"));
            }
        }
    }

    if reddit {
        let client = RedditClient::new(&config.sec_user_agent, config.request_timeout_secs)
            .map_err(|e| anyhow::anyhow!("failed to build Reddit client: {e}"))?;
        match insiderdb_sync::run_reddit_sync(&pool, &client, config).await {
            Ok(summary) => print_summary("reddit", &summary),
            Err(e) => {
                tracing::error!(error = %e, "Reddit sync failed");
                failures.push(format!("reddit: {e}"));
            }
        }
    }

    let requested = usize::from(sec) + usize::from(reddit);
    if !failures.is_empty() && failures.len() == requested {
        anyhow::bail!("all requested syncs failed: [{}]", failures.join("; "));
    }
    Ok(())
}

/// Verify one claimed transaction against EDGAR and print the outcome.
pub(crate) async fn run_verify(
    config: &AppConfig,
    ticker: String,
    date: Option<NaiveDate>,
    amount: Option<String>,
    insider: Option<String>,
) -> anyhow::Result<()> {
    let edgar = edgar_client(config)?;
    let cik_map = CikMap::new(Duration::from_secs(config.cik_map_ttl_secs));
    let request = VerifyRequest {
        ticker,
        trade_date: date,
        amount,
        insider_name: insider,
        filing_id: None,
    };

    let outcome = insiderdb_sync::verify(&edgar, &cik_map, &request).await?;

    println!("status:  {}", outcome.status.as_str());
    println!("message: {}", outcome.message);
    if let Some(name) = &outcome.company_name {
        println!("company: {name}");
    }
    if let Some(cik) = &outcome.cik {
        println!("cik:     {cik}");
    }
    if let Some(filing) = &outcome.matched_filing {
        println!("matched: {} ({})", filing.accession_number, filing.url);
    }
    for filing in &outcome.recent_filings {
        println!(
            "recent:  {} filed {} ({})",
            filing.accession_number, filing.filing_date, filing.url
        );
    }
    Ok(())
}

/// List persisted alerts with the given filters.
pub(crate) async fn run_alerts(
    config: &AppConfig,
    ticker: Option<String>,
    transaction_type: Option<String>,
    status: Option<String>,
    limit: Option<i64>,
) -> anyhow::Result<()> {
    if let Some(t) = transaction_type.as_deref() {
        if TransactionType::parse(t).is_none() {
            anyhow::bail!("unknown transaction type '{t}' (expected buy or sell)");
        }
    }
    if let Some(s) = status.as_deref() {
        if VerificationStatus::parse(s).is_none() {
            anyhow::bail!("unknown verification status '{s}'");
        }
    }

    let pool = connect(config).await?;
    let filter = AlertFilter {
        transaction_type,
        verification_status: status,
        ticker,
        limit: limit.unwrap_or(50).clamp(1, 200),
        offset: 0,
    };

    let rows = insiderdb_db::list_alerts(&pool, &filter).await?;
    if rows.is_empty() {
        println!("no alerts match the given filters");
        return Ok(());
    }

    for row in rows {
        println!(
            "{} {} {} {} {} shares @ {} (total {}) [{}] {}",
            row.filing_date,
            row.ticker,
            row.transaction_type,
            row.insider_name,
            row.shares,
            row.price_per_share,
            row.total_value,
            row.verification_status,
            row.source_url,
        );
    }
    Ok(())
}
