//! SEC EDGAR client and Form 4 extraction.
//!
//! Fetches the "current filings" Atom feed, per-filing directory indexes and
//! machine-readable Form 4 XML bodies, the global ticker→CIK mapping, and
//! per-company submission histories. Extraction is pattern-based (quick-xml
//! tag scanning plus a handful of regexes) and sits behind narrow `parse_*`
//! functions so the matching strategy can be swapped without touching the
//! aggregation logic downstream.

mod atom;
mod client;
mod error;
mod form4;
mod rate_limit;
mod tickers;
mod types;

pub use atom::{extract_accession_number, parse_atom_feed, parse_entry_title, FeedEntry};
pub use client::EdgarClient;
pub use error::EdgarError;
pub use form4::{parse_form4_xml, Form4Document};
pub use tickers::{pad_cik, CikEntry, CikMap};
pub use types::{CompanyTickerEntry, FilingIndex, IndexItem, RecentFilings, Submissions};
