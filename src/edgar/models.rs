// src/edgar/models.rs
//! Lenient serde views of the EDGAR JSON payloads.
//! Only the fields the normalizer reads are modelled; everything is optional
//! so that shape checks happen in one place (the normalizer), not in serde.
use serde::{Deserialize, Deserializer};

/// Identity part of https://data.sec.gov/submissions/CIK##########.json
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSubmission {
    pub cik: Option<serde_json::Value>,
    pub name: Option<String>,
    #[serde(default)]
    pub tickers: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub exchanges: Option<Vec<Option<String>>>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sic: Option<String>,
    pub sic_description: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub fiscal_year_end: Option<String>,
    pub state_of_incorporation: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub employee_count: Option<String>,
    pub addresses: Option<RawAddresses>,
}

#[derive(Debug, Deserialize)]
pub struct RawAddresses {
    pub business: Option<RawAddress>,
    pub mailing: Option<RawAddress>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAddress {
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state_or_country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip_code: Option<String>,
}

/// Filings part of the submissions document.
#[derive(Debug, Deserialize)]
pub struct RawSubmissionFilings {
    pub filings: Option<RawFilings>,
}

#[derive(Debug, Deserialize)]
pub struct RawFilings {
    pub recent: Option<RawRecentFilings>,
}

/// Parallel arrays, one slot per filing, newest first.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecentFilings {
    pub form: Option<Vec<String>>,
    pub filing_date: Option<Vec<String>>,
    pub accession_number: Option<Vec<String>>,
    #[serde(default)]
    pub primary_document: Vec<String>,
    #[serde(default)]
    pub primary_doc_description: Vec<String>,
}

/// One reported value under `facts.us-gaap.<Concept>.units.<Unit>[]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawFactValue {
    pub val: Option<f64>,
    pub end: Option<String>,
    pub form: Option<String>,
}

/// One row of https://www.sec.gov/files/company_tickers.json
#[derive(Debug, Clone, Deserialize)]
pub struct RawTickerEntry {
    pub cik_str: u64,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub title: String,
}

/// EDGAR is inconsistent about quoting codes like SIC and zip; take either.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_submission_tolerates_missing_and_numeric_fields() {
        let raw = json!({
            "cik": "0000320193",
            "name": "Apple Inc.",
            "sic": 3571,
            "tickers": null,
            "exchanges": ["Nasdaq", null],
            "addresses": { "business": { "city": "CUPERTINO", "zipCode": 95014 } }
        });
        let sub = RawSubmission::deserialize(&raw).unwrap();
        assert_eq!(sub.sic.as_deref(), Some("3571"));
        assert!(sub.tickers.is_none());
        assert_eq!(sub.exchanges.unwrap().len(), 2);
        let business = sub.addresses.unwrap().business.unwrap();
        assert_eq!(business.zip_code.as_deref(), Some("95014"));
        assert!(business.street1.is_none());
    }

    #[test]
    fn test_recent_filings_optional_columns() {
        let raw = json!({
            "form": ["10-K"],
            "filingDate": ["2024-11-01"],
            "accessionNumber": ["0000320193-24-000123"]
        });
        let recent = RawRecentFilings::deserialize(&raw).unwrap();
        assert!(recent.primary_document.is_empty());
        assert_eq!(recent.form.unwrap()[0], "10-K");
    }

    #[test]
    fn test_ticker_entry() {
        let raw = json!({"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."});
        let entry = RawTickerEntry::deserialize(&raw).unwrap();
        assert_eq!(entry.cik_str, 320193);
        assert_eq!(entry.ticker, "AAPL");
    }
}
