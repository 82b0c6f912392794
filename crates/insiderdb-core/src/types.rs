//! Domain types shared across the insiderdb crates.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an insider transaction.
///
/// Only two states exist: a filing whose acquired/disposed code cannot be
/// classified is discarded, and a Reddit post matching neither keyword set
/// is rejected. There is deliberately no `Unknown` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Buy,
    Sell,
}

impl TransactionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
        }
    }

    /// Parse a stored string back into a variant. Unknown values map to `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(TransactionType::Buy),
            "sell" => Some(TransactionType::Sell),
            _ => None,
        }
    }
}

/// Confidence tier of a record or verification result.
///
/// SEC-direct records are `Verified` at creation; Reddit-sourced records
/// start `Unverified` and may be upgraded later. Callers must branch on all
/// three states — this is a ladder, not a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Partial,
    Unverified,
}

impl VerificationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Verified => "verified",
            VerificationStatus::Partial => "partial",
            VerificationStatus::Unverified => "unverified",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "verified" => Some(VerificationStatus::Verified),
            "partial" => Some(VerificationStatus::Partial),
            "unverified" => Some(VerificationStatus::Unverified),
            _ => None,
        }
    }
}

/// Which feed produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Sec,
    Reddit,
}

impl SignalSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SignalSource::Sec => "sec",
            SignalSource::Reddit => "reddit",
        }
    }
}

/// One normalized insider transaction, the unit of persistence.
///
/// `filing_id` is the SEC accession number for SEC-sourced records and the
/// Reddit post id for Reddit-sourced alerts; it is the dedup key and carries
/// a unique constraint in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsiderTransaction {
    pub filing_id: String,
    /// Uppercase 1-5 letter symbol.
    pub ticker: String,
    pub company_name: String,
    /// SEC CIK, zero-padded to 10 digits, when known.
    pub cik: Option<String>,
    pub insider_name: String,
    pub insider_title: String,
    pub transaction_type: TransactionType,
    /// Sum of all constituent line-item shares within one filing.
    pub shares: Decimal,
    /// Arithmetic mean across line items that report a price; zero when none do.
    pub price_per_share: Decimal,
    /// `shares * price_per_share`, rounded to the nearest currency unit.
    pub total_value: Decimal,
    /// Economic transaction date; falls back to the filing date when absent.
    pub report_date: NaiveDate,
    pub filing_date: NaiveDate,
    pub source_url: String,
    pub verification_status: VerificationStatus,
    pub source: SignalSource,
}

/// Raw matched substrings extracted from a Reddit insider-alert post.
///
/// Only the ticker and transaction type are mandatory; every other field is
/// best-effort and independently optional. Never `Verified` on its own — the
/// verifier upgrades status after cross-checking EDGAR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedAlert {
    pub post_id: String,
    pub ticker: String,
    pub transaction_type: TransactionType,
    /// Raw matched dollar string, e.g. `$1.9M` — kept verbatim because the
    /// suffix form is what gets displayed and verified against.
    pub amount: Option<String>,
    pub shares: Option<i64>,
    pub price_per_share: Option<Decimal>,
    pub trade_date: Option<NaiveDate>,
    pub filing_date: Option<NaiveDate>,
    pub insider_name: Option<String>,
    pub permalink: String,
}

/// A reference to one Form 4 filing in an issuer's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilingRef {
    pub accession_number: String,
    pub filing_date: String,
    pub report_date: Option<String>,
    pub url: String,
}

/// Result of cross-checking a claimed transaction against EDGAR.
#[derive(Debug, Clone, Serialize)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub message: String,
    pub company_name: Option<String>,
    pub cik: Option<String>,
    pub matched_filing: Option<FilingRef>,
    pub recent_filings: Vec<FilingRef>,
}

/// Per-run stage counters. A sync run always completes with a summary;
/// partial failure is reported here rather than raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub fetched: usize,
    pub parsed: usize,
    pub qualified: usize,
    pub stored: usize,
    pub skipped: usize,
    pub errors: Vec<String>,
}
