//! Integration tests for `EdgarClient` using wiremock HTTP mocks.

use insiderdb_edgar::{EdgarClient, EdgarError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_UA: &str = "insiderdb-tests/0.1 (ops@example.com)";

fn test_client(www_base: &str, data_base: &str) -> EdgarClient {
    EdgarClient::with_base_urls(TEST_UA, 30, 0, 0, www_base, data_base)
        .expect("client construction should not fail")
}

const ATOM_BODY: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" ?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title>4 - Alkermes plc (0001520262) (Reporting)</title>
    <link rel="alternate" type="text/html" href="https://www.sec.gov/Archives/edgar/data/1520262/000152026226000018/0001520262-26-000018-index.htm"/>
    <summary type="html">Filed 2026-02-05</summary>
    <updated>2026-02-05T17:01:22-05:00</updated>
  </entry>
</feed>"#;

#[tokio::test]
async fn current_filings_feed_sends_user_agent_and_parses_entries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cgi-bin/browse-edgar"))
        .and(query_param("action", "getcurrent"))
        .and(query_param("type", "4"))
        .and(query_param("owner", "only"))
        .and(query_param("output", "atom"))
        .and(header("user-agent", TEST_UA))
        .respond_with(ResponseTemplate::new(200).set_body_string(ATOM_BODY))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let entries = client
        .fetch_current_form4_entries(40)
        .await
        .expect("should parse feed");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "4 - Alkermes plc (0001520262) (Reporting)");
}

#[tokio::test]
async fn filing_index_path_trims_cik_and_dashes() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "directory": {
            "item": [
                { "name": "primary_doc.xml", "type": "text.gif" },
                { "name": "wk-form4_1.xml", "type": "text.gif" }
            ]
        }
    });

    Mock::given(method("GET"))
        .and(path(
            "/Archives/edgar/data/1520262/000152026226000018/index.json",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let index = client
        .fetch_filing_index("0001520262", "0001520262-26-000018")
        .await
        .expect("should fetch index");

    assert_eq!(index.form4_document(), Some("wk-form4_1.xml"));
}

#[tokio::test]
async fn missing_accession_maps_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let result = client
        .fetch_filing_index("0000000001", "0000000001-26-000001")
        .await;

    assert!(matches!(result, Err(EdgarError::NotFound { .. })));
}

#[tokio::test]
async fn server_error_maps_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let result = client.fetch_submissions("0001520262").await;

    assert!(
        matches!(result, Err(EdgarError::UnexpectedStatus { status: 503, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn company_tickers_are_rekeyed_by_uppercase_symbol() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "0": { "cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc." },
        "1": { "cik_str": 1520262, "ticker": "ALKS", "title": "Alkermes plc" }
    });

    Mock::given(method("GET"))
        .and(path("/files/company_tickers.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let map = client
        .fetch_company_tickers()
        .await
        .expect("should fetch tickers");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get("ALKS").unwrap().cik_str, 1_520_262);
}

#[tokio::test]
async fn submissions_fetch_uses_padded_cik_path() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "name": "ALKERMES PLC",
        "filings": {
            "recent": {
                "accessionNumber": ["0001520262-26-000018"],
                "form": ["4"],
                "filingDate": ["2026-02-05"],
                "reportDate": ["2026-02-02"],
                "primaryDocument": ["wk-form4_1.xml"]
            }
        }
    });

    Mock::given(method("GET"))
        .and(path("/submissions/CIK0001520262.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), &server.uri());
    let subs = client
        .fetch_submissions("0001520262")
        .await
        .expect("should fetch submissions");

    assert_eq!(subs.filings.recent.form, vec!["4"]);
}
