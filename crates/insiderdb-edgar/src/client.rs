//! HTTP client for the SEC EDGAR endpoints.
//!
//! Wraps `reqwest` with EDGAR-specific error handling and typed response
//! deserialization. Every request carries the configured User-Agent — SEC
//! policy requires requests to identify the requester by contact email, so
//! client construction refuses an empty value.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, Url};

use crate::atom::{parse_atom_feed, FeedEntry};
use crate::error::EdgarError;
use crate::rate_limit::retry_with_backoff;
use crate::types::{CompanyTickerEntry, FilingIndex, Submissions};

const DEFAULT_WWW_BASE: &str = "https://www.sec.gov/";
const DEFAULT_DATA_BASE: &str = "https://data.sec.gov/";

/// Client for EDGAR's feed, archive, and submissions endpoints.
///
/// Use [`EdgarClient::new`] for production or [`EdgarClient::with_base_urls`]
/// to point at a mock server in tests. The archive host (`www.sec.gov`) and
/// the submissions host (`data.sec.gov`) are configured separately because
/// EDGAR splits them.
pub struct EdgarClient {
    client: Client,
    www_base: Url,
    data_base: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl EdgarClient {
    /// Creates a client pointed at the production EDGAR hosts.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError::Config`] if `user_agent` is empty (requests
    /// without a contact User-Agent would be refused by SEC), or
    /// [`EdgarError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(
        user_agent: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, EdgarError> {
        Self::with_base_urls(
            user_agent,
            timeout_secs,
            max_retries,
            backoff_base_secs,
            DEFAULT_WWW_BASE,
            DEFAULT_DATA_BASE,
        )
    }

    /// Creates a client with custom base URLs (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// See [`EdgarClient::new`]; additionally fails when a base URL does not
    /// parse.
    pub fn with_base_urls(
        user_agent: &str,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_secs: u64,
        www_base: &str,
        data_base: &str,
    ) -> Result<Self, EdgarError> {
        if user_agent.trim().is_empty() {
            return Err(EdgarError::Config(
                "a non-empty SEC User-Agent (contact email) is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            www_base: parse_base(www_base)?,
            data_base: parse_base(data_base)?,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Fetches the "current filings" Atom feed filtered to Form 4,
    /// owner-only, and parses it into entries.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError`] on HTTP failure or a malformed feed.
    pub async fn fetch_current_form4_entries(
        &self,
        count: usize,
    ) -> Result<Vec<FeedEntry>, EdgarError> {
        let mut url = join(&self.www_base, "cgi-bin/browse-edgar")?;
        url.query_pairs_mut()
            .append_pair("action", "getcurrent")
            .append_pair("type", "4")
            .append_pair("company", "")
            .append_pair("dateb", "")
            .append_pair("owner", "only")
            .append_pair("count", &count.to_string())
            .append_pair("output", "atom");

        let body = self.get_text(url).await?;
        parse_atom_feed(&body)
    }

    /// Fetches the directory index (JSON file listing) of one accession.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError::NotFound`] for unknown accessions, or another
    /// [`EdgarError`] on HTTP/parse failure.
    pub async fn fetch_filing_index(
        &self,
        cik: &str,
        accession: &str,
    ) -> Result<FilingIndex, EdgarError> {
        let path = format!(
            "Archives/edgar/data/{}/{}/index.json",
            cik_trimmed(cik),
            accession_no_dashes(accession)
        );
        let url = join(&self.www_base, &path)?;
        self.get_json(url, &format!("filing index for {accession}"))
            .await
    }

    /// Fetches one file from an accession's directory as text (the
    /// machine-readable Form 4 XML body).
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError`] on HTTP failure.
    pub async fn fetch_form4_xml(
        &self,
        cik: &str,
        accession: &str,
        filename: &str,
    ) -> Result<String, EdgarError> {
        let path = format!(
            "Archives/edgar/data/{}/{}/{filename}",
            cik_trimmed(cik),
            accession_no_dashes(accession)
        );
        let url = join(&self.www_base, &path)?;
        self.get_text(url).await
    }

    /// Fetches the full ticker→CIK mapping document and re-keys it by
    /// uppercase ticker symbol.
    ///
    /// The document is an object keyed by array index, so the shape is
    /// decoded as a map and discarded. Large (~10k entries); callers should
    /// hold the result in a [`crate::CikMap`] rather than refetching.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError`] on HTTP/parse failure.
    pub async fn fetch_company_tickers(
        &self,
    ) -> Result<HashMap<String, CompanyTickerEntry>, EdgarError> {
        let url = join(&self.www_base, "files/company_tickers.json")?;
        let indexed: HashMap<String, CompanyTickerEntry> =
            self.get_json(url, "company_tickers.json").await?;

        Ok(indexed
            .into_values()
            .map(|entry| (entry.ticker.to_uppercase(), entry))
            .collect())
    }

    /// Fetches an issuer's filing history. `cik` must already be zero-padded
    /// to 10 digits.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError::NotFound`] for unknown CIKs, or another
    /// [`EdgarError`] on HTTP/parse failure.
    pub async fn fetch_submissions(&self, cik: &str) -> Result<Submissions, EdgarError> {
        let url = join(&self.data_base, &format!("submissions/CIK{cik}.json"))?;
        self.get_json(url, &format!("submissions for CIK {cik}"))
            .await
    }

    /// Canonical browser-facing URL of a filing, for stored records.
    #[must_use]
    pub fn filing_url(cik: &str, accession: &str) -> String {
        format!(
            "https://www.sec.gov/Archives/edgar/data/{}/{}/{accession}-index.htm",
            cik_trimmed(cik),
            accession_no_dashes(accession)
        )
    }

    async fn get_text(&self, url: Url) -> Result<String, EdgarError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(10);
                    return Err(EdgarError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(EdgarError::NotFound {
                        url: url.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(EdgarError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, EdgarError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|e| EdgarError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }
}

fn parse_base(base: &str) -> Result<Url, EdgarError> {
    // Ensure exactly one trailing slash so joins append rather than replace
    // the last path segment.
    let normalised = format!("{}/", base.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| EdgarError::Config(format!("invalid base URL '{base}': {e}")))
}

fn join(base: &Url, path: &str) -> Result<Url, EdgarError> {
    base.join(path)
        .map_err(|e| EdgarError::Config(format!("invalid URL path '{path}': {e}")))
}

/// Archive paths use the CIK without leading zeros.
fn cik_trimmed(cik: &str) -> &str {
    let trimmed = cik.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Archive directory names use the accession without dashes.
fn accession_no_dashes(accession: &str) -> String {
    accession.replace('-', "")
}
