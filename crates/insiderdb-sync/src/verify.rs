//! Cross-check a claimed insider transaction against EDGAR submissions.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;

use insiderdb_core::{FilingRef, VerificationOutcome, VerificationStatus};
use insiderdb_edgar::{CikMap, EdgarClient, Submissions};

use crate::error::SyncError;

/// How many recent Form 4 filings to consider per company.
const RECENT_FORM4_LIMIT: usize = 10;

/// How many of those to echo back on a partial match.
const PARTIAL_ECHO_LIMIT: usize = 5;

/// A claimed transaction to check. Only the ticker is required; the more
/// fields supplied, the stronger a match can get.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyRequest {
    pub ticker: String,
    #[serde(default)]
    pub trade_date: Option<NaiveDate>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub insider_name: Option<String>,
    /// When set, the outcome is written back to this stored record.
    #[serde(default)]
    pub filing_id: Option<String>,
}

/// Resolve the ticker to a CIK, pull the company's recent submissions, and
/// grade the claim on a three-rung ladder:
///
/// - a Form 4 whose report date (or, failing that, filing date) equals the
///   claimed trade date → `Verified` with the matching filing;
/// - any recent Form 4 activity but no date match → `Partial` with the most
///   recent filings echoed back;
/// - no recent Form 4 filings, or an unknown ticker → `Unverified`.
///
/// # Errors
///
/// Returns [`SyncError::Edgar`] when EDGAR itself cannot be reached; "we
/// looked and found nothing" is an outcome, not an error.
pub async fn verify(
    edgar: &EdgarClient,
    cik_map: &CikMap,
    request: &VerifyRequest,
) -> Result<VerificationOutcome, SyncError> {
    let Some(entry) = cik_map.lookup(edgar, &request.ticker).await? else {
        return Ok(VerificationOutcome {
            status: VerificationStatus::Unverified,
            message: format!("ticker {} not found in SEC company list", request.ticker),
            company_name: None,
            cik: None,
            matched_filing: None,
            recent_filings: Vec::new(),
        });
    };

    let submissions = edgar.fetch_submissions(&entry.cik).await?;
    let filings = collect_form4_refs(&submissions, &entry.cik);

    let outcome = grade(&filings, request.trade_date, &entry.title, &entry.cik);
    tracing::info!(
        ticker = %request.ticker,
        cik = %entry.cik,
        status = outcome.status.as_str(),
        recent = filings.len(),
        "verification complete"
    );
    Ok(outcome)
}

/// Like [`verify`], additionally writing the outcome back to the stored
/// record named by `filing_id`. This is the path that upgrades a stored
/// Reddit alert once EDGAR confirms it.
///
/// # Errors
///
/// Returns [`SyncError::Db`] with [`insiderdb_db::DbError::NotFound`] when
/// `filing_id` is set but no stored record carries it.
pub async fn verify_and_record(
    pool: &PgPool,
    edgar: &EdgarClient,
    cik_map: &CikMap,
    request: &VerifyRequest,
) -> Result<VerificationOutcome, SyncError> {
    let outcome = verify(edgar, cik_map, request).await?;

    if let Some(filing_id) = &request.filing_id {
        insiderdb_db::update_verification(
            pool,
            filing_id,
            outcome.status.as_str(),
            Some(&outcome.message),
        )
        .await?;
        tracing::info!(filing_id = %filing_id, status = outcome.status.as_str(), "stored record updated");
    }

    Ok(outcome)
}

/// Extract the company's most recent Form 4 filings from the columnar
/// submissions payload. Amendments (`4/A`) are a different form string and
/// fall out naturally.
#[must_use]
pub fn collect_form4_refs(submissions: &Submissions, cik: &str) -> Vec<FilingRef> {
    let recent = &submissions.filings.recent;
    recent
        .form
        .iter()
        .enumerate()
        .filter(|(_, form)| form.as_str() == "4")
        .take(RECENT_FORM4_LIMIT)
        .filter_map(|(i, _)| {
            let accession = recent.accession_number.get(i)?;
            let filing_date = recent.filing_date.get(i)?;
            let report_date = recent
                .report_date
                .get(i)
                .filter(|d| !d.is_empty())
                .cloned();
            Some(FilingRef {
                accession_number: accession.clone(),
                filing_date: filing_date.clone(),
                report_date,
                url: EdgarClient::filing_url(cik, accession),
            })
        })
        .collect()
}

fn grade(
    filings: &[FilingRef],
    trade_date: Option<NaiveDate>,
    company_name: &str,
    cik: &str,
) -> VerificationOutcome {
    if let Some(date) = trade_date {
        let wanted = date.format("%Y-%m-%d").to_string();
        let matched = filings.iter().find(|f| {
            f.report_date.as_deref().map_or_else(
                || f.filing_date == wanted,
                |report| report == wanted,
            )
        });
        if let Some(filing) = matched {
            return VerificationOutcome {
                status: VerificationStatus::Verified,
                message: format!(
                    "Form 4 {} matches the claimed trade date",
                    filing.accession_number
                ),
                company_name: Some(company_name.to_string()),
                cik: Some(cik.to_string()),
                matched_filing: Some(filing.clone()),
                recent_filings: Vec::new(),
            };
        }
    }

    if filings.is_empty() {
        VerificationOutcome {
            status: VerificationStatus::Unverified,
            message: "no recent Form 4 filings for this company".to_string(),
            company_name: Some(company_name.to_string()),
            cik: Some(cik.to_string()),
            matched_filing: None,
            recent_filings: Vec::new(),
        }
    } else {
        VerificationOutcome {
            status: VerificationStatus::Partial,
            message: format!(
                "{} recent Form 4 filing(s) found, none on the claimed date",
                filings.len()
            ),
            company_name: Some(company_name.to_string()),
            cik: Some(cik.to_string()),
            matched_filing: None,
            recent_filings: filings.iter().take(PARTIAL_ECHO_LIMIT).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs(forms: &[(&str, &str, &str, &str)]) -> Submissions {
        serde_json::from_value(serde_json::json!({
            "name": "Test Co",
            "filings": {
                "recent": {
                    "accessionNumber": forms.iter().map(|f| f.0).collect::<Vec<_>>(),
                    "form": forms.iter().map(|f| f.1).collect::<Vec<_>>(),
                    "filingDate": forms.iter().map(|f| f.2).collect::<Vec<_>>(),
                    "reportDate": forms.iter().map(|f| f.3).collect::<Vec<_>>(),
                    "primaryDocument": forms.iter().map(|_| "doc.xml").collect::<Vec<_>>(),
                }
            }
        }))
        .expect("valid submissions fixture")
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[test]
    fn collect_keeps_only_form_4_rows() {
        let s = subs(&[
            ("0001-24-000001", "4", "2024-03-02", "2024-03-01"),
            ("0001-24-000002", "10-K", "2024-02-15", "2023-12-31"),
            ("0001-24-000003", "4/A", "2024-02-10", "2024-02-08"),
            ("0001-24-000004", "4", "2024-02-01", ""),
        ]);
        let refs = collect_form4_refs(&s, "0000001750");

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].accession_number, "0001-24-000001");
        assert_eq!(refs[0].report_date.as_deref(), Some("2024-03-01"));
        // Empty report dates are absent, not empty strings.
        assert_eq!(refs[1].report_date, None);
        assert!(refs[0].url.contains("/1750/"));
    }

    #[test]
    fn report_date_match_verifies() {
        let s = subs(&[("0001-24-000001", "4", "2024-03-02", "2024-03-01")]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, Some(date("2024-03-01")), "Test Co", "0000001750");

        assert_eq!(out.status, VerificationStatus::Verified);
        assert_eq!(
            out.matched_filing.map(|f| f.accession_number),
            Some("0001-24-000001".to_string())
        );
        assert!(out.recent_filings.is_empty());
    }

    #[test]
    fn filing_date_matches_only_when_report_date_is_absent() {
        // Row with a report date: the filing date must not match instead.
        let s = subs(&[("0001-24-000001", "4", "2024-03-02", "2024-03-01")]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, Some(date("2024-03-02")), "Test Co", "0000001750");
        assert_eq!(out.status, VerificationStatus::Partial);

        // Row without: filing date becomes the comparison key.
        let s = subs(&[("0001-24-000001", "4", "2024-03-02", "")]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, Some(date("2024-03-02")), "Test Co", "0000001750");
        assert_eq!(out.status, VerificationStatus::Verified);
    }

    #[test]
    fn activity_without_date_match_is_partial() {
        let s = subs(&[
            ("0001-24-000001", "4", "2024-03-02", "2024-03-01"),
            ("0001-24-000002", "4", "2024-02-01", "2024-01-30"),
        ]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, Some(date("2024-06-01")), "Test Co", "0000001750");

        assert_eq!(out.status, VerificationStatus::Partial);
        assert_eq!(out.recent_filings.len(), 2);
        assert_eq!(out.matched_filing, None);
    }

    #[test]
    fn collect_keeps_at_most_ten_form_4_rows() {
        let rows: Vec<(String, &str, String, String)> = (0..12)
            .map(|i| {
                (
                    format!("0001-24-{i:06}"),
                    "4",
                    format!("2024-01-{:02}", i + 1),
                    format!("2024-01-{:02}", i + 1),
                )
            })
            .collect();
        let borrowed: Vec<(&str, &str, &str, &str)> = rows
            .iter()
            .map(|(a, f, d, r)| (a.as_str(), *f, d.as_str(), r.as_str()))
            .collect();
        let refs = collect_form4_refs(&subs(&borrowed), "0000001750");

        assert_eq!(refs.len(), 10);
        // Document order is newest-first; truncation keeps the head.
        assert_eq!(refs[0].accession_number, "0001-24-000000");
    }

    #[test]
    fn partial_echoes_at_most_five_recent_filings() {
        let rows: Vec<(String, &str, String, String)> = (0..6)
            .map(|i| {
                (
                    format!("0001-24-{i:06}"),
                    "4",
                    format!("2024-02-{:02}", i + 1),
                    format!("2024-02-{:02}", i + 1),
                )
            })
            .collect();
        let borrowed: Vec<(&str, &str, &str, &str)> = rows
            .iter()
            .map(|(a, f, d, r)| (a.as_str(), *f, d.as_str(), r.as_str()))
            .collect();
        let refs = collect_form4_refs(&subs(&borrowed), "0000001750");
        assert_eq!(refs.len(), 6);

        let out = grade(&refs, Some(date("2024-06-01")), "Test Co", "0000001750");

        assert_eq!(out.status, VerificationStatus::Partial);
        assert_eq!(out.recent_filings.len(), 5);
        assert_eq!(out.recent_filings[0].accession_number, "0001-24-000000");
    }

    #[test]
    fn no_trade_date_with_activity_is_partial() {
        let s = subs(&[("0001-24-000001", "4", "2024-03-02", "2024-03-01")]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, None, "Test Co", "0000001750");
        assert_eq!(out.status, VerificationStatus::Partial);
    }

    #[test]
    fn no_form4_activity_is_unverified() {
        let s = subs(&[("0001-24-000002", "10-K", "2024-02-15", "2023-12-31")]);
        let refs = collect_form4_refs(&s, "0000001750");
        let out = grade(&refs, Some(date("2024-03-01")), "Test Co", "0000001750");

        assert_eq!(out.status, VerificationStatus::Unverified);
        assert!(out.recent_filings.is_empty());
    }
}
