//! Tag-boundary parsing of the EDGAR "current filings" Atom feed.

use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::error::EdgarError;

/// Accession numbers appear in entry links as 10-2-6 digit groups,
/// e.g. `0001520262-26-000018`.
static ACCESSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{10}-\d{2}-\d{6}").expect("valid accession regex"));

/// Entry titles carry the company name and CIK:
/// `4 - Alkermes plc (0001520262) (Reporting)`.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^4 - (.+) \((\d+)\) \(Reporting\)$").expect("valid title regex")
});

/// One `<entry>` from the current-filings feed. Ephemeral; exists only
/// during one fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub updated: String,
    pub summary: String,
}

/// Parse the Atom feed body into entries.
///
/// Extracts `<title>`, the `href` attribute of `<link>`, `<updated>`, and
/// `<summary>` per entry. Entries lacking a title or link are silently
/// skipped — the feed routinely interleaves non-filing entries.
///
/// # Errors
///
/// Returns [`EdgarError::Xml`] if the feed is malformed.
pub fn parse_atom_feed(xml: &str) -> Result<Vec<FeedEntry>, EdgarError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_entry = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut updated = String::new();
    let mut summary = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                if name == "entry" {
                    in_entry = true;
                    title.clear();
                    link.clear();
                    updated.clear();
                    summary.clear();
                }
                current_tag = name;
            }
            // <link href="..."/> is an empty element carrying its value as
            // an attribute rather than text.
            Ok(Event::Empty(e)) => {
                if in_entry && e.name().as_ref() == b"link" {
                    if let Some(href) = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"href")
                    {
                        link = String::from_utf8_lossy(&href.value).into_owned();
                    }
                }
            }
            Ok(Event::End(e)) => {
                let raw = e.name();
                let name = std::str::from_utf8(raw.as_ref()).unwrap_or("");
                if name == "entry" && in_entry {
                    in_entry = false;
                    if !title.is_empty() && !link.is_empty() {
                        entries.push(FeedEntry {
                            title: title.clone(),
                            link: link.clone(),
                            updated: updated.clone(),
                            summary: summary.clone(),
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry {
                    let text = e.unescape().unwrap_or_default().into_owned();
                    match current_tag.as_str() {
                        "title" => title = text,
                        "updated" => updated = text,
                        "summary" => summary = text,
                        _ => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(EdgarError::Xml(e)),
            _ => {}
        }
    }

    Ok(entries)
}

/// Extract the accession number from an entry link, or `None` when the link
/// does not contain the 10-2-6 digit pattern.
#[must_use]
pub fn extract_accession_number(link: &str) -> Option<String> {
    ACCESSION_RE.find(link).map(|m| m.as_str().to_string())
}

/// Extract `(company name, raw CIK digits)` from an entry title.
///
/// Titles that do not match the `4 - Name (CIK) (Reporting)` shape are
/// rejected with `None`; amended filings (`4/A`) and issuer-side entries
/// fall through here by design.
#[must_use]
pub fn parse_entry_title(title: &str) -> Option<(String, String)> {
    let caps = TITLE_RE.captures(title.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_FEED: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Latest Filings - Form 4</title>
  <entry>
    <title>4 - Alkermes plc (0001520262) (Reporting)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1520262/000152026226000018/0001520262-26-000018-index.htm"/>
    <summary type="html">&lt;b&gt;Filed:&lt;/b&gt; 2026-02-05</summary>
    <updated>2026-02-05T17:01:22-05:00</updated>
  </entry>
  <entry>
    <title>4 - Smith John Q (0009999999) (Reporting)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/9999999/000999999926000001/0009999999-26-000001-index.htm"/>
    <summary type="html">&lt;b&gt;Filed:&lt;/b&gt; 2026-02-05</summary>
    <updated>2026-02-05T16:58:09-05:00</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_entries_from_feed() {
        let entries = parse_atom_feed(SAMPLE_FEED).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "4 - Alkermes plc (0001520262) (Reporting)");
        assert!(entries[0].link.contains("0001520262-26-000018-index.htm"));
        assert_eq!(entries[0].updated, "2026-02-05T17:01:22-05:00");
    }

    #[test]
    fn skips_entries_without_title_or_link() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>4 - Incomplete Co (0000000001) (Reporting)</title>
  </entry>
  <entry>
    <link rel="alternate" href="https://www.sec.gov/somewhere"/>
  </entry>
</feed>"#;
        let entries = parse_atom_feed(xml).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn extracts_accession_number_from_link() {
        let link =
            "https://www.sec.gov/Archives/edgar/data/1520262/000152026226000018/0001520262-26-000018-index.htm";
        assert_eq!(
            extract_accession_number(link).as_deref(),
            Some("0001520262-26-000018")
        );
        assert_eq!(extract_accession_number("https://www.sec.gov/no-digits"), None);
    }

    #[test]
    fn parses_company_and_cik_from_title() {
        let (name, cik) =
            parse_entry_title("4 - Alkermes plc (0001520262) (Reporting)").unwrap();
        assert_eq!(name, "Alkermes plc");
        assert_eq!(cik, "0001520262");
    }

    #[test]
    fn rejects_issuer_side_and_malformed_titles() {
        assert_eq!(parse_entry_title("4 - Alkermes plc (0001520262) (Issuer)"), None);
        assert_eq!(parse_entry_title("4/A - Alkermes plc (0001520262) (Reporting)"), None);
        assert_eq!(parse_entry_title("8-K - Alkermes plc (0001520262)"), None);
    }
}
