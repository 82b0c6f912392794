//! SEC sync run: current-filings feed → qualified transactions → store.

use std::time::Duration;

use sqlx::PgPool;
use tokio::time::Instant;

use insiderdb_core::{
    qualify, AppConfig, InsiderTransaction, RunSummary, SignalSource, VerificationStatus,
};
use insiderdb_edgar::{
    extract_accession_number, pad_cik, parse_entry_title, parse_form4_xml, EdgarClient, FeedEntry,
};

use crate::error::SyncError;

/// What became of one feed entry.
enum EntryOutcome {
    /// Did not match the expected shape somewhere along the way. Counted as
    /// a skip, never an error.
    Rejected(&'static str),
    /// Parsed fine but under the minimum-value threshold.
    BelowThreshold,
    Qualified(Box<InsiderTransaction>),
}

/// Run one SEC sync: fetch the current Form 4 feed, process up to the
/// configured cap of filings under the run deadline, then dedup and persist.
///
/// # Errors
///
/// Returns [`SyncError::Edgar`] only when the feed itself cannot be fetched
/// (total failure of the source); per-filing trouble lands in the summary.
pub async fn run_sec_sync(
    pool: &PgPool,
    edgar: &EdgarClient,
    config: &AppConfig,
) -> Result<RunSummary, SyncError> {
    let entries = edgar
        .fetch_current_form4_entries(config.max_filings_per_run)
        .await?;

    let collected = collect_sec_candidates(edgar, &entries, config).await;
    let candidates = collected.candidates;
    let mut summary = collected.counts;

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
        qualified = summary.qualified,
        stored = summary.stored,
        skipped = summary.skipped,
        errors = summary.errors.len(),
        "SEC sync run complete"
    );

    Ok(summary)
}

/// Candidates plus the stage counts accumulated while collecting them.
pub struct CollectedCandidates {
    pub candidates: Vec<InsiderTransaction>,
    pub counts: RunSummary,
}

/// Walk the feed entries, fetching and parsing each filing with the
/// configured pacing delay, stopping at the run deadline.
///
/// Pacing is sequential by design: per-filing fetches stay well under the
/// documented ~10 req/s EDGAR limit. Past the deadline no new requests are
/// issued and the partial result is returned — partial success is the
/// expected outcome of a full scan, not an error.
pub async fn collect_sec_candidates(
    edgar: &EdgarClient,
    entries: &[FeedEntry],
    config: &AppConfig,
) -> CollectedCandidates {
    let deadline = Instant::now() + Duration::from_secs(config.run_timeout_secs);
    let mut counts = RunSummary {
        fetched: entries.len(),
        ..RunSummary::default()
    };
    let mut candidates = Vec::new();
    let mut is_first = true;

    for entry in entries.iter().take(config.max_filings_per_run) {
        if Instant::now() >= deadline {
            tracing::warn!(
                processed = candidates.len() + counts.skipped,
                "run deadline reached; returning partial results"
            );
            break;
        }

        if !is_first && config.inter_request_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        is_first = false;

        match process_entry(edgar, entry, config).await {
            Ok(EntryOutcome::Qualified(tx)) => {
                counts.parsed += 1;
                counts.qualified += 1;
                candidates.push(*tx);
            }
            Ok(EntryOutcome::BelowThreshold) => {
                counts.parsed += 1;
                counts.skipped += 1;
            }
            Ok(EntryOutcome::Rejected(reason)) => {
                tracing::debug!(title = %entry.title, reason, "skipping feed entry");
                counts.skipped += 1;
            }
            Err(e) => {
                counts
                    .errors
                    .push(format!("filing '{}': {e}", entry.title));
            }
        }
    }

    CollectedCandidates { candidates, counts }
}

async fn process_entry(
    edgar: &EdgarClient,
    entry: &FeedEntry,
    config: &AppConfig,
) -> Result<EntryOutcome, SyncError> {
    let Some(accession) = extract_accession_number(&entry.link) else {
        return Ok(EntryOutcome::Rejected("no accession number in link"));
    };
    let Some((company_name, raw_cik)) = parse_entry_title(&entry.title) else {
        return Ok(EntryOutcome::Rejected("title does not match Form 4 shape"));
    };
    let cik = pad_cik(&raw_cik);

    let index = edgar.fetch_filing_index(&cik, &accession).await?;
    let Some(filename) = index.form4_document() else {
        return Ok(EntryOutcome::Rejected("no machine-readable Form 4 body"));
    };
    let filename = filename.to_string();

    let xml = edgar.fetch_form4_xml(&cik, &accession, &filename).await?;
    let doc = parse_form4_xml(&xml)?;

    let Some(ticker) = doc.ticker.clone() else {
        return Ok(EntryOutcome::Rejected("no issuer ticker"));
    };
    let Some(transaction_type) = doc.transaction_type else {
        return Ok(EntryOutcome::Rejected("no classifiable A/D code"));
    };
    if doc.shares.is_zero() {
        return Ok(EntryOutcome::Rejected("zero total shares"));
    }

    let price_per_share = doc.mean_price();
    let total_value = qualify::total_value(doc.shares, price_per_share);
    if !qualify::qualifies(total_value, config.min_transaction_value) {
        return Ok(EntryOutcome::BelowThreshold);
    }

    let filing_date = entry
        .updated
        .get(..10)
        .and_then(|d| d.parse().ok())
        .or(doc.transaction_date);
    let Some(filing_date) = filing_date else {
        return Ok(EntryOutcome::Rejected("no usable filing date"));
    };
    // Economic transaction date, falling back to the filing date.
    let report_date = doc.transaction_date.unwrap_or(filing_date);

    Ok(EntryOutcome::Qualified(Box::new(InsiderTransaction {
        filing_id: accession.clone(),
        source_url: EdgarClient::filing_url(&cik, &accession),
        ticker,
        company_name,
        cik: Some(cik),
        insider_name: doc.owner_name.clone().unwrap_or_else(|| "Unknown".to_string()),
        insider_title: doc.insider_title(),
        transaction_type,
        shares: doc.shares,
        price_per_share,
        total_value,
        report_date,
        filing_date,
        // SEC-direct is definitionally authoritative.
        verification_status: VerificationStatus::Verified,
        source: SignalSource::Sec,
    })))
}
