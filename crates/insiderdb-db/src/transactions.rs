//! Database operations for the `insider_transactions` table.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, QueryBuilder};

use insiderdb_core::InsiderTransaction;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `insider_transactions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsiderTransactionRow {
    pub id: i64,
    pub filing_id: String,
    pub ticker: String,
    pub company_name: String,
    pub cik: Option<String>,
    pub insider_name: String,
    pub insider_title: String,
    pub transaction_type: String,
    pub shares: Decimal,
    pub price_per_share: Decimal,
    pub total_value: Decimal,
    pub report_date: NaiveDate,
    pub filing_date: NaiveDate,
    pub source_url: String,
    pub verification_status: String,
    pub verification_message: Option<String>,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a batch insert: per-record failures are collected, not raised.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub stored: usize,
    /// Rows skipped because the filing_id already existed (conflict).
    pub skipped: usize,
    pub errors: Vec<String>,
}

const SELECT_COLUMNS: &str = "id, filing_id, ticker, company_name, cik, insider_name, \
     insider_title, transaction_type, shares, price_per_share, total_value, \
     report_date, filing_date, source_url, verification_status, \
     verification_message, source, created_at";

// ---------------------------------------------------------------------------
// Dedup
// ---------------------------------------------------------------------------

/// Returns the subset of `filing_ids` already present in the store.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn existing_filing_ids(
    pool: &PgPool,
    filing_ids: &[String],
) -> Result<HashSet<String>, DbError> {
    if filing_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT filing_id FROM insider_transactions WHERE filing_id = ANY($1)",
    )
    .bind(filing_ids)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().collect())
}

/// Pure set difference: candidates whose `filing_id` is not in `existing`.
///
/// This pre-check only avoids pointless insert attempts; correctness under
/// concurrent runs comes from the table's unique constraint plus
/// `ON CONFLICT DO NOTHING` in [`insert_transaction`].
#[must_use]
pub fn filter_new(
    candidates: Vec<InsiderTransaction>,
    existing: &HashSet<String>,
) -> Vec<InsiderTransaction> {
    candidates
        .into_iter()
        .filter(|candidate| !existing.contains(&candidate.filing_id))
        .collect()
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Insert one transaction. Returns `true` if a row was written, `false` when
/// the filing_id already existed — a conflict is "already seen", not an
/// error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails for any other reason.
pub async fn insert_transaction(
    pool: &PgPool,
    tx: &InsiderTransaction,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "INSERT INTO insider_transactions \
             (filing_id, ticker, company_name, cik, insider_name, insider_title, \
              transaction_type, shares, price_per_share, total_value, \
              report_date, filing_date, source_url, verification_status, source) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         ON CONFLICT (filing_id) DO NOTHING",
    )
    .bind(&tx.filing_id)
    .bind(&tx.ticker)
    .bind(&tx.company_name)
    .bind(&tx.cik)
    .bind(&tx.insider_name)
    .bind(&tx.insider_title)
    .bind(tx.transaction_type.as_str())
    .bind(tx.shares)
    .bind(tx.price_per_share)
    .bind(tx.total_value)
    .bind(tx.report_date)
    .bind(tx.filing_date)
    .bind(&tx.source_url)
    .bind(tx.verification_status.as_str())
    .bind(tx.source.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert a batch of transactions. A per-record failure is recorded and the
/// remaining inserts continue (at-least-once semantics; the stable dedup key
/// makes reprocessing safe).
pub async fn insert_batch(pool: &PgPool, records: &[InsiderTransaction]) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for record in records {
        match insert_transaction(pool, record).await {
            Ok(true) => outcome.stored += 1,
            Ok(false) => outcome.skipped += 1,
            Err(e) => {
                outcome
                    .errors
                    .push(format!("insert {} failed: {e}", record.filing_id));
            }
        }
    }

    outcome
}

/// Update the verification status of a stored record — the only mutation
/// after insert.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row carries that filing_id, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn update_verification(
    pool: &PgPool,
    filing_id: &str,
    status: &str,
    message: Option<&str>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE insider_transactions \
         SET verification_status = $1, verification_message = $2 \
         WHERE filing_id = $3",
    )
    .bind(status)
    .bind(message)
    .bind(filing_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Filters for [`list_alerts`]. All optional; unset means "any".
#[derive(Debug, Default, Clone)]
pub struct AlertFilter {
    pub transaction_type: Option<String>,
    pub verification_status: Option<String>,
    pub ticker: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// List persisted alerts, newest filing first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts(
    pool: &PgPool,
    filter: &AlertFilter,
) -> Result<Vec<InsiderTransactionRow>, DbError> {
    let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(format!(
        "SELECT {SELECT_COLUMNS} FROM insider_transactions WHERE TRUE"
    ));

    if let Some(transaction_type) = &filter.transaction_type {
        builder.push(" AND transaction_type = ");
        builder.push_bind(transaction_type);
    }
    if let Some(status) = &filter.verification_status {
        builder.push(" AND verification_status = ");
        builder.push_bind(status);
    }
    if let Some(ticker) = &filter.ticker {
        builder.push(" AND ticker = ");
        builder.push_bind(ticker.to_uppercase());
    }

    builder.push(" ORDER BY filing_date DESC, id DESC LIMIT ");
    builder.push_bind(filter.limit.clamp(1, 200));
    builder.push(" OFFSET ");
    builder.push_bind(filter.offset.max(0));

    let rows = builder
        .build_query_as::<InsiderTransactionRow>()
        .fetch_all(pool)
        .await?;

    Ok(rows)
}
