//! Serde types for EDGAR's JSON endpoints.
//!
//! ## Observed shapes
//!
//! ### Filing directory index (`.../Archives/edgar/data/CIK/ACCESSION/index.json`)
//! An object with a `directory` wrapper whose `item` array lists the files in
//! the accession. Form 4 accessions contain the rendered primary document
//! (`*primary*.xml` or similar naming) plus the machine-readable ownership
//! XML; we want the latter.
//!
//! ### `company_tickers.json`
//! An object keyed by array index (`"0"`, `"1"`, ...) rather than a JSON
//! array. `cik_str` is a bare number despite the field name.
//!
//! ### Per-company submissions (`data.sec.gov/submissions/CIK##########.json`)
//! Column-oriented: `filings.recent` holds parallel arrays where index `i`
//! across all arrays describes one filing. `reportDate` entries may be empty
//! strings when the filing has no period of report.

use serde::Deserialize;

/// Directory listing of one accession's files.
#[derive(Debug, Deserialize)]
pub struct FilingIndex {
    pub directory: IndexDirectory,
}

#[derive(Debug, Deserialize)]
pub struct IndexDirectory {
    #[serde(default)]
    pub item: Vec<IndexItem>,
}

/// One file within an accession.
#[derive(Debug, Deserialize)]
pub struct IndexItem {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl FilingIndex {
    /// Locates the machine-readable Form 4 body: the first `.xml` member
    /// that is not the rendered primary document. `None` means the accession
    /// is unparsable for our purposes, not that the run failed.
    #[must_use]
    pub fn form4_document(&self) -> Option<&str> {
        self.directory
            .item
            .iter()
            .map(|item| item.name.as_str())
            .find(|name| name.ends_with(".xml") && !name.contains("primary"))
    }
}

/// One entry of the global ticker→CIK mapping document.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyTickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

/// Per-company filing history from `data.sec.gov`.
#[derive(Debug, Deserialize)]
pub struct Submissions {
    #[serde(default)]
    pub name: Option<String>,
    pub filings: SubmissionFilings,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionFilings {
    pub recent: RecentFilings,
}

/// Column-oriented recent-filings arrays; index `i` across all fields
/// describes one filing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    #[serde(default)]
    pub accession_number: Vec<String>,
    #[serde(default)]
    pub form: Vec<String>,
    #[serde(default)]
    pub filing_date: Vec<String>,
    #[serde(default)]
    pub report_date: Vec<String>,
    #[serde(default)]
    pub primary_document: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filing_index_parses_item_array() {
        let json = r#"{
            "directory": {
                "name": "/Archives/edgar/data/1520262/000152026226000018",
                "item": [
                    { "name": "primary_doc.html", "type": "text.gif" },
                    { "name": "wk-form4_1738612345.xml", "type": "text.gif" }
                ]
            }
        }"#;
        let index: FilingIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.directory.item.len(), 2);
        assert_eq!(index.directory.item[1].name, "wk-form4_1738612345.xml");
    }

    #[test]
    fn form4_document_skips_primary_and_non_xml_members() {
        let json = r#"{
            "directory": {
                "item": [
                    { "name": "0001520262-26-000018-index.htm" },
                    { "name": "primary_doc.xml" },
                    { "name": "wk-form4_1738612345.xml" }
                ]
            }
        }"#;
        let index: FilingIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.form4_document(), Some("wk-form4_1738612345.xml"));
    }

    #[test]
    fn form4_document_none_when_only_primary_xml_exists() {
        let json = r#"{ "directory": { "item": [ { "name": "primary_doc.xml" } ] } }"#;
        let index: FilingIndex = serde_json::from_str(json).unwrap();
        assert_eq!(index.form4_document(), None);
    }

    #[test]
    fn submissions_parses_columnar_recent_arrays() {
        let json = r#"{
            "name": "ALKERMES PLC",
            "filings": {
                "recent": {
                    "accessionNumber": ["0001520262-26-000018", "0001520262-26-000011"],
                    "form": ["4", "10-K"],
                    "filingDate": ["2026-02-05", "2026-01-30"],
                    "reportDate": ["2026-02-02", ""],
                    "primaryDocument": ["wk-form4_1.xml", "alks-20251231.htm"]
                }
            }
        }"#;
        let subs: Submissions = serde_json::from_str(json).unwrap();
        assert_eq!(subs.name.as_deref(), Some("ALKERMES PLC"));
        let recent = &subs.filings.recent;
        assert_eq!(recent.accession_number.len(), 2);
        assert_eq!(recent.form[0], "4");
        assert_eq!(recent.report_date[1], "");
    }

    #[test]
    fn company_ticker_entry_parses_numeric_cik() {
        let json = r#"{ "cik_str": 1520262, "ticker": "ALKS", "title": "Alkermes plc" }"#;
        let entry: CompanyTickerEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.cik_str, 1_520_262);
        assert_eq!(entry.ticker, "ALKS");
    }
}
