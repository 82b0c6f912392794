//! Extraction of insider transaction fields from a Form 4 XML body.

use chrono::NaiveDate;
use insiderdb_core::{qualify, TransactionType};
use quick_xml::events::Event;
use quick_xml::Reader;
use rust_decimal::Decimal;

use crate::error::EdgarError;

/// Aggregated fields extracted from one Form 4 filing.
///
/// A filing can report several `<nonDerivativeTransaction>` line items (an
/// option exercise plus the resulting sale is common); they are collapsed to
/// one record: shares are summed, prices averaged over the line items that
/// report one, and the first transaction date and first acquired/disposed
/// code win. First-code-wins can mislabel the economically dominant leg of
/// an exercise-then-sale bundle; the classification follows the
/// first-listed movement and is a known limitation.
#[derive(Debug, Clone, Default)]
pub struct Form4Document {
    pub ticker: Option<String>,
    pub owner_name: Option<String>,
    pub officer_title: Option<String>,
    pub is_director: bool,
    pub is_ten_percent_owner: bool,
    /// Sum over all non-derivative line items.
    pub shares: Decimal,
    price_sum: Decimal,
    price_count: u32,
    /// First transaction date seen, in document order.
    pub transaction_date: Option<NaiveDate>,
    /// First acquired/disposed code seen: `A` → Buy, `D` → Sell.
    pub transaction_type: Option<TransactionType>,
}

impl Form4Document {
    /// Mean price over line items that reported one; zero when none did.
    #[must_use]
    pub fn mean_price(&self) -> Decimal {
        qualify::mean_price(self.price_sum, self.price_count)
    }

    /// Insider title with the documented fallback chain: explicit officer
    /// title, then `Director`, then `10% Owner`, then `Insider`.
    #[must_use]
    pub fn insider_title(&self) -> String {
        if let Some(title) = self
            .officer_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
        {
            return title.to_string();
        }
        if self.is_director {
            return "Director".to_string();
        }
        if self.is_ten_percent_owner {
            return "10% Owner".to_string();
        }
        "Insider".to_string()
    }
}

/// Parse a Form 4 XML body into an aggregated [`Form4Document`].
///
/// Scans by element path: issuer ticker and reporting-owner fields anywhere
/// in the document, transaction amounts only inside
/// `<nonDerivativeTransaction>` blocks (derivative tables are ignored).
///
/// # Errors
///
/// Returns [`EdgarError::Xml`] if the body is malformed. Missing fields are
/// not errors here — the caller decides whether the document is usable.
pub fn parse_form4_xml(xml: &str) -> Result<Form4Document, EdgarError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut doc = Form4Document::default();
    let mut path: Vec<String> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                path.push(name);
            }
            Ok(Event::End(_)) => {
                path.pop();
            }
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default().into_owned();
                apply_text(&mut doc, &path, text.trim());
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(EdgarError::Xml(e)),
            _ => {}
        }
    }

    Ok(doc)
}

fn apply_text(doc: &mut Form4Document, path: &[String], text: &str) {
    if text.is_empty() {
        return;
    }

    let in_non_derivative = path.iter().any(|p| p == "nonDerivativeTransaction");

    match path.last().map(String::as_str) {
        Some("issuerTradingSymbol") => {
            doc.ticker = Some(text.to_uppercase());
        }
        Some("rptOwnerName") => {
            doc.owner_name = Some(text.to_string());
        }
        Some("officerTitle") => {
            doc.officer_title = Some(text.to_string());
        }
        Some("isDirector") => {
            doc.is_director = flag_is_set(text);
        }
        Some("isTenPercentOwner") => {
            doc.is_ten_percent_owner = flag_is_set(text);
        }
        Some("value") if in_non_derivative => match parent(path) {
            Some("transactionShares") => {
                if let Ok(shares) = text.parse::<Decimal>() {
                    doc.shares += shares;
                }
            }
            Some("transactionPricePerShare") => {
                if let Ok(price) = text.parse::<Decimal>() {
                    doc.price_sum += price;
                    doc.price_count += 1;
                }
            }
            Some("transactionDate") => {
                if doc.transaction_date.is_none() {
                    // Dates occasionally carry a time suffix; the first ten
                    // characters are the YYYY-MM-DD portion.
                    let date_part = text.get(..10).unwrap_or(text);
                    doc.transaction_date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();
                }
            }
            Some("transactionAcquiredDisposedCode") => {
                if doc.transaction_type.is_none() {
                    doc.transaction_type = match text {
                        "A" => Some(TransactionType::Buy),
                        "D" => Some(TransactionType::Sell),
                        _ => None,
                    };
                }
            }
            _ => {}
        },
        _ => {}
    }
}

/// The element enclosing the current leaf, i.e. one step up the path.
fn parent(path: &[String]) -> Option<&str> {
    if path.len() < 2 {
        return None;
    }
    Some(path[path.len() - 2].as_str())
}

fn flag_is_set(text: &str) -> bool {
    matches!(text, "1" | "true")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn transaction_block(date: &str, shares: &str, price: Option<&str>, code: &str) -> String {
        let price_xml = price.map_or_else(String::new, |p| {
            format!("<transactionPricePerShare><value>{p}</value></transactionPricePerShare>")
        });
        format!(
            "<nonDerivativeTransaction>\
               <transactionDate><value>{date}</value></transactionDate>\
               <transactionAmounts>\
                 <transactionShares><value>{shares}</value></transactionShares>\
                 {price_xml}\
                 <transactionAcquiredDisposedCode><value>{code}</value></transactionAcquiredDisposedCode>\
               </transactionAmounts>\
             </nonDerivativeTransaction>"
        )
    }

    fn wrap(body: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><ownershipDocument>\
               <issuer>\
                 <issuerCik>0001520262</issuerCik>\
                 <issuerName>Alkermes plc</issuerName>\
                 <issuerTradingSymbol>alks</issuerTradingSymbol>\
               </issuer>\
               <reportingOwner>\
                 <reportingOwnerId><rptOwnerName>Pops Richard</rptOwnerName></reportingOwnerId>\
                 <reportingOwnerRelationship>\
                   <isDirector>0</isDirector>\
                   <isOfficer>1</isOfficer>\
                   <isTenPercentOwner>0</isTenPercentOwner>\
                   <officerTitle>Chief Executive Officer</officerTitle>\
                 </reportingOwnerRelationship>\
               </reportingOwner>\
               <nonDerivativeTable>{body}</nonDerivativeTable>\
             </ownershipDocument>"
        )
    }

    #[test]
    fn extracts_issuer_and_owner_fields() {
        let xml = wrap(&transaction_block("2026-02-02", "61200", Some("31.64"), "A"));
        let doc = parse_form4_xml(&xml).unwrap();
        assert_eq!(doc.ticker.as_deref(), Some("ALKS"));
        assert_eq!(doc.owner_name.as_deref(), Some("Pops Richard"));
        assert_eq!(doc.insider_title(), "Chief Executive Officer");
        assert_eq!(doc.shares, dec("61200"));
        assert_eq!(doc.mean_price(), dec("31.64"));
        assert_eq!(doc.transaction_type, Some(TransactionType::Buy));
        assert_eq!(
            doc.transaction_date,
            NaiveDate::from_ymd_opt(2026, 2, 2)
        );
    }

    #[test]
    fn sums_shares_and_averages_prices_across_blocks() {
        let body = [
            transaction_block("2026-02-02", "1000", Some("10.00"), "A"),
            transaction_block("2026-02-03", "500", Some("20.00"), "A"),
            transaction_block("2026-02-03", "250", None, "A"),
        ]
        .concat();
        let doc = parse_form4_xml(&wrap(&body)).unwrap();
        assert_eq!(doc.shares, dec("1750"));
        // Mean over the two blocks that reported a price.
        assert_eq!(doc.mean_price(), dec("15.00"));
    }

    #[test]
    fn zero_priced_blocks_give_zero_mean_price() {
        let body = [
            transaction_block("2026-02-02", "1000", None, "A"),
            transaction_block("2026-02-02", "2000", None, "A"),
        ]
        .concat();
        let doc = parse_form4_xml(&wrap(&body)).unwrap();
        assert_eq!(doc.shares, dec("3000"));
        assert_eq!(doc.mean_price(), Decimal::ZERO);
    }

    #[test]
    fn first_code_and_first_date_win() {
        let body = [
            transaction_block("2026-02-02", "1000", Some("10.00"), "A"),
            transaction_block("2026-02-01", "1000", Some("10.00"), "D"),
        ]
        .concat();
        let doc = parse_form4_xml(&wrap(&body)).unwrap();
        assert_eq!(doc.transaction_type, Some(TransactionType::Buy));
        assert_eq!(
            doc.transaction_date,
            NaiveDate::from_ymd_opt(2026, 2, 2)
        );
    }

    #[test]
    fn title_fallback_chain_director_then_ten_percent_then_insider() {
        let base = transaction_block("2026-02-02", "100", Some("1.00"), "D");

        let director = wrap(&base).replace("<isDirector>0<", "<isDirector>1<").replace(
            "<officerTitle>Chief Executive Officer</officerTitle>",
            "",
        );
        let doc = parse_form4_xml(&director).unwrap();
        assert_eq!(doc.insider_title(), "Director");

        let ten_pct = wrap(&base)
            .replace("<isTenPercentOwner>0<", "<isTenPercentOwner>1<")
            .replace("<officerTitle>Chief Executive Officer</officerTitle>", "");
        let doc = parse_form4_xml(&ten_pct).unwrap();
        assert_eq!(doc.insider_title(), "10% Owner");

        let bare = wrap(&base).replace("<officerTitle>Chief Executive Officer</officerTitle>", "");
        let doc = parse_form4_xml(&bare).unwrap();
        assert_eq!(doc.insider_title(), "Insider");
    }

    #[test]
    fn derivative_table_blocks_are_ignored() {
        let xml = wrap(&transaction_block("2026-02-02", "1000", Some("10.00"), "A")).replace(
            "</ownershipDocument>",
            "<derivativeTable><derivativeTransaction>\
               <transactionAmounts><transactionShares><value>99999</value></transactionShares></transactionAmounts>\
             </derivativeTransaction></derivativeTable></ownershipDocument>",
        );
        let doc = parse_form4_xml(&xml).unwrap();
        assert_eq!(doc.shares, dec("1000"));
    }
}
