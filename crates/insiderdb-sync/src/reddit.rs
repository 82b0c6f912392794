//! Reddit sync run: subreddit listing → parsed alerts → store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use insiderdb_core::{
    qualify, AppConfig, InsiderTransaction, ParsedAlert, RunSummary, SignalSource,
    VerificationStatus,
};
use insiderdb_reddit::{parse_insider_alert, RedditClient};

use crate::error::SyncError;

/// Reddit caps a single listing page at 100 items.
const MAX_LISTING_LIMIT: usize = 100;

/// Run one Reddit sync: fetch the newest posts from the configured
/// subreddit, extract insider alerts, then dedup and persist.
///
/// Community posts are unverified claims, so every parseable alert is
/// stored regardless of value; the minimum-value threshold applies to the
/// SEC feed only.
///
/// # Errors
///
/// Returns [`SyncError::Reddit`] only when the listing itself cannot be
/// fetched; posts that fail to parse are counted as skips.
pub async fn run_reddit_sync(
    pool: &PgPool,
    reddit: &RedditClient,
    config: &AppConfig,
) -> Result<RunSummary, SyncError> {
    let limit = config.max_filings_per_run.min(MAX_LISTING_LIMIT);
    let (posts, _after) = reddit
        .fetch_new_posts(&config.subreddit, limit, None)
        .await?;

    let mut summary = RunSummary {
        fetched: posts.len(),
        ..RunSummary::default()
    };

    let mut candidates = Vec::new();
    for post in &posts {
        match parse_insider_alert(post) {
            Some(alert) => {
                summary.parsed += 1;
                summary.qualified += 1;
                candidates.push(transaction_from_alert(&alert, post.created_utc));
            }
            None => {
                tracing::debug!(post_id = %post.id, title = %post.title, "post is not an insider alert");
                summary.skipped += 1;
            }
        }
    }

    let filing_ids: Vec<String> = candidates.iter().map(|t| t.filing_id.clone()).collect();
    let existing = insiderdb_db::existing_filing_ids(pool, &filing_ids).await?;
    let fresh = insiderdb_db::filter_new(candidates, &existing);
    summary.skipped += filing_ids.len() - fresh.len();

    let outcome = insiderdb_db::insert_batch(pool, &fresh).await;
    summary.stored = outcome.stored;
    summary.skipped += outcome.skipped;
    summary.errors.extend(outcome.errors);

    tracing::info!(
        fetched = summary.fetched,
        parsed = summary.parsed,
        stored = summary.stored,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "Reddit sync run complete"
    );

    Ok(summary)
}

/// Normalize a parsed alert into the common transaction shape.
///
/// Fields the post never stated stay at neutral defaults (zero shares and
/// price, "Unknown" insider) rather than being guessed; the record enters
/// the store as [`VerificationStatus::Unverified`] until the verifier
/// cross-checks it against EDGAR.
#[must_use]
pub fn transaction_from_alert(alert: &ParsedAlert, created_utc: f64) -> InsiderTransaction {
    let posted_on = date_from_epoch(created_utc);
    let shares = alert.shares.map(Decimal::from).unwrap_or_default();
    let price_per_share = alert.price_per_share.unwrap_or_default();

    InsiderTransaction {
        filing_id: alert.post_id.clone(),
        ticker: alert.ticker.clone(),
        // The post names only the ticker, so it stands in for the company
        // name. Verification updates status and message, nothing else.
        company_name: alert.ticker.clone(),
        cik: None,
        insider_name: alert
            .insider_name
            .clone()
            .unwrap_or_else(|| "Unknown".to_string()),
        insider_title: "Insider".to_string(),
        transaction_type: alert.transaction_type,
        shares,
        price_per_share,
        total_value: qualify::total_value(shares, price_per_share),
        report_date: alert.trade_date.unwrap_or(posted_on),
        filing_date: alert.filing_date.unwrap_or(posted_on),
        source_url: alert.permalink.clone(),
        verification_status: VerificationStatus::Unverified,
        source: SignalSource::Reddit,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn date_from_epoch(created_utc: f64) -> NaiveDate {
    DateTime::<Utc>::from_timestamp(created_utc as i64, 0)
        .map_or_else(|| Utc::now().date_naive(), |dt| dt.date_naive())
}
