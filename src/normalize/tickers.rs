// src/normalize/tickers.rs
use crate::edgar::cik::Cik;
use crate::edgar::models::RawTickerEntry;
use crate::utils::error::EdgarError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyMatch {
    pub cik: Cik,
    pub name: String,
    pub ticker: Option<String>,
}

/// Looks `query` up in the company_tickers.json document
/// (`{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`).
/// A numeric query matches `cik_str`; otherwise exact ticker beats exact title
/// beats substring of either. Among equals the document's own order (its
/// numeric keys) decides.
pub fn find_company(raw: &serde_json::Value, query: &str) -> Result<Option<CompanyMatch>, EdgarError> {
    let object = raw
        .as_object()
        .ok_or_else(|| EdgarError::malformed("company tickers document is not a JSON object"))?;

    let mut entries = Vec::with_capacity(object.len());
    for (key, value) in object {
        let entry = RawTickerEntry::deserialize(value)
            .map_err(|e| EdgarError::malformed(format!("company tickers entry '{}': {}", key, e)))?;
        entries.push((key.parse::<usize>().unwrap_or(usize::MAX), entry));
    }
    entries.sort_by_key(|(rank, _)| *rank);

    let needle = query.trim().to_uppercase();
    if needle.is_empty() {
        return Ok(None);
    }

    let by_cik = Cik::parse(query).ok().map(|cik| cik.value());

    let found = entries
        .iter()
        .find(|(_, e)| Some(e.cik_str) == by_cik)
        .or_else(|| entries.iter().find(|(_, e)| e.ticker.to_uppercase() == needle))
        .or_else(|| entries.iter().find(|(_, e)| e.title.to_uppercase() == needle))
        .or_else(|| {
            entries.iter().find(|(_, e)| {
                e.ticker.to_uppercase().contains(&needle) || e.title.to_uppercase().contains(&needle)
            })
        });

    match found {
        Some((_, entry)) => Ok(Some(CompanyMatch {
            cik: Cik::new(entry.cik_str).map_err(|e| EdgarError::malformed(e.to_string()))?,
            name: entry.title.clone(),
            ticker: Some(entry.ticker.clone()).filter(|t| !t.is_empty()),
        })),
        None => Ok(None),
    }
}
