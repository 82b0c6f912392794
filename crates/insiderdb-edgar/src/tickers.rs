//! Ticker→CIK resolution with a TTL cache.
//!
//! The mapping document is one large table (~10k entries) that changes
//! rarely; loading it on every verification request would be wasteful and
//! unfriendly to EDGAR. The map is process-wide read-only state, refreshed
//! when its TTL expires.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::client::EdgarClient;
use crate::error::EdgarError;
use crate::types::CompanyTickerEntry;

/// A resolved ticker: zero-padded CIK plus the registered company title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CikEntry {
    /// 10-digit, zero-padded.
    pub cik: String,
    pub title: String,
}

struct CachedMap {
    loaded_at: Instant,
    by_ticker: HashMap<String, CikEntry>,
}

/// TTL cache over the global ticker→CIK mapping.
pub struct CikMap {
    ttl: Duration,
    inner: RwLock<Option<CachedMap>>,
}

impl CikMap {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Resolves a ticker (case-insensitive) to its CIK entry, loading or
    /// refreshing the mapping document as needed. `Ok(None)` means the
    /// ticker is genuinely unknown to EDGAR.
    ///
    /// # Errors
    ///
    /// Returns [`EdgarError`] if a refresh fetch fails. A stale cache is not
    /// served past its TTL.
    pub async fn lookup(
        &self,
        client: &EdgarClient,
        ticker: &str,
    ) -> Result<Option<CikEntry>, EdgarError> {
        let key = ticker.trim().to_uppercase();

        {
            let guard = self.inner.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.loaded_at.elapsed() < self.ttl {
                    return Ok(cached.by_ticker.get(&key).cloned());
                }
            }
        }

        let mut guard = self.inner.write().await;
        // Another task may have refreshed while we waited for the write lock.
        if let Some(cached) = guard.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(cached.by_ticker.get(&key).cloned());
            }
        }

        let raw = client.fetch_company_tickers().await?;
        let by_ticker = raw
            .into_iter()
            .map(|(ticker, entry)| (ticker, to_entry(&entry)))
            .collect::<HashMap<_, _>>();
        tracing::debug!(tickers = by_ticker.len(), "refreshed ticker→CIK map");

        let result = by_ticker.get(&key).cloned();
        *guard = Some(CachedMap {
            loaded_at: Instant::now(),
            by_ticker,
        });

        Ok(result)
    }
}

fn to_entry(raw: &CompanyTickerEntry) -> CikEntry {
    CikEntry {
        cik: pad_cik(&raw.cik_str.to_string()),
        title: raw.title.clone(),
    }
}

/// Zero-pad CIK digits to the canonical 10-character form.
#[must_use]
pub fn pad_cik(digits: &str) -> String {
    format!("{digits:0>10}")
}
