// src/normalize/company.rs
use crate::edgar::cik::Cik;
use crate::edgar::models::{RawAddress, RawSubmission};
use crate::utils::error::EdgarError;
use serde::{Deserialize, Serialize};

/// Stand-in for optional fields EDGAR leaves out.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyIdentity {
    pub cik: Cik,
    pub name: String,
    pub tickers: Vec<String>,
    pub exchanges: Vec<String>,
    pub sic: String,
    pub sic_description: String,
    pub fiscal_year_end: String,
    pub category: String,
    pub state_of_incorporation: String,
    pub phone: String,
    pub website: String,
    pub description: String,
    pub employee_count: String,
    pub address: PostalAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostalAddress {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state_or_country: String,
    pub zip_code: String,
}

impl PostalAddress {
    fn from_raw(raw: &RawAddress) -> Self {
        Self {
            street1: raw.street1.clone().unwrap_or_default(),
            street2: raw.street2.clone().filter(|s| !s.trim().is_empty()),
            city: raw.city.clone().unwrap_or_default(),
            state_or_country: raw.state_or_country.clone().unwrap_or_default(),
            zip_code: raw.zip_code.clone().unwrap_or_default(),
        }
    }

    /// "ONE APPLE PARK WAY, CUPERTINO, CA 95014"
    pub fn one_line(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for part in [Some(self.street1.as_str()), self.street2.as_deref(), Some(self.city.as_str())]
            .into_iter()
            .flatten()
        {
            if !part.trim().is_empty() {
                parts.push(part.trim());
            }
        }
        let region = format!("{} {}", self.state_or_country.trim(), self.zip_code.trim());
        let region = region.trim();
        let mut line = parts.join(", ");
        if !region.is_empty() {
            if !line.is_empty() {
                line.push_str(", ");
            }
            line.push_str(region);
        }
        if line.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            line
        }
    }
}

impl CompanyIdentity {
    pub fn primary_ticker(&self) -> &str {
        self.tickers.first().map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }
}

/// Builds a [`CompanyIdentity`] from a submissions document.
/// Only `cik` and `name` are required; anything else missing becomes `N/A`.
pub fn normalize_company_identity(raw: &serde_json::Value) -> Result<CompanyIdentity, EdgarError> {
    if !raw.is_object() {
        return Err(EdgarError::malformed("submissions document is not a JSON object"));
    }
    let sub = RawSubmission::deserialize(raw)
        .map_err(|e| EdgarError::malformed(format!("unexpected submissions shape: {}", e)))?;

    let cik = sub
        .cik
        .as_ref()
        .ok_or_else(|| EdgarError::malformed("submissions document is missing 'cik'"))
        .and_then(Cik::from_json)?;
    let name = sub
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| EdgarError::malformed("submissions document is missing 'name'"))?;

    let address = sub
        .addresses
        .as_ref()
        .and_then(|a| a.business.as_ref().or(a.mailing.as_ref()))
        .map(PostalAddress::from_raw)
        .unwrap_or_default();

    tracing::debug!("Normalized company identity for CIK {} ({})", cik, name);

    Ok(CompanyIdentity {
        cik,
        name,
        tickers: non_empty_list(sub.tickers),
        exchanges: non_empty_list(sub.exchanges),
        sic: or_not_available(sub.sic),
        sic_description: or_not_available(sub.sic_description),
        fiscal_year_end: or_not_available(sub.fiscal_year_end),
        category: or_not_available(sub.category),
        state_of_incorporation: or_not_available(sub.state_of_incorporation),
        phone: or_not_available(sub.phone),
        website: or_not_available(sub.website),
        description: or_not_available(sub.description),
        employee_count: or_not_available(sub.employee_count),
        address,
    })
}

fn or_not_available(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn non_empty_list(values: Option<Vec<Option<String>>>) -> Vec<String> {
    let list: Vec<String> = values
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .filter(|v| !v.trim().is_empty())
        .collect();
    if list.is_empty() {
        vec![NOT_AVAILABLE.to_string()]
    } else {
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apple() -> serde_json::Value {
        json!({
            "cik": "0000320193",
            "name": "Apple Inc.",
            "tickers": ["AAPL"],
            "exchanges": ["Nasdaq"],
            "sic": "3571",
            "sicDescription": "Electronic Computers",
            "category": "Large accelerated filer",
            "fiscalYearEnd": "0928",
            "stateOfIncorporation": "CA",
            "phone": "(408) 996-1010",
            "employeeCount": 164000,
            "addresses": {
                "mailing": { "street1": "ONE APPLE PARK WAY", "city": "CUPERTINO", "stateOrCountry": "CA", "zipCode": "95014" },
                "business": { "street1": "ONE APPLE PARK WAY", "street2": null, "city": "CUPERTINO", "stateOrCountry": "CA", "zipCode": "95014" }
            },
            "filings": { "recent": { "form": [] } }
        })
    }

    #[test]
    fn test_full_submission() {
        let company = normalize_company_identity(&apple()).unwrap();
        assert_eq!(company.cik.to_string(), "0000320193");
        assert_eq!(company.name, "Apple Inc.");
        assert_eq!(company.tickers, vec!["AAPL"]);
        assert_eq!(company.primary_ticker(), "AAPL");
        assert_eq!(company.sic, "3571");
        assert_eq!(company.sic_description, "Electronic Computers");
        assert_eq!(company.fiscal_year_end, "0928");
        assert_eq!(company.website, NOT_AVAILABLE);
        assert_eq!(company.employee_count, "164000");
        assert_eq!(company.address.one_line(), "ONE APPLE PARK WAY, CUPERTINO, CA 95014");
    }

    #[test]
    fn test_only_required_fields() {
        let company = normalize_company_identity(&json!({"cik": 1318605, "name": "Tesla, Inc."})).unwrap();
        assert_eq!(company.cik.to_string(), "0001318605");
        assert_eq!(company.tickers, vec![NOT_AVAILABLE]);
        assert_eq!(company.exchanges, vec![NOT_AVAILABLE]);
        assert_eq!(company.primary_ticker(), NOT_AVAILABLE);
        assert_eq!(company.sic, NOT_AVAILABLE);
        assert_eq!(company.employee_count, NOT_AVAILABLE);
        assert_eq!(company.address, PostalAddress::default());
        assert_eq!(company.address.one_line(), NOT_AVAILABLE);
    }

    #[test]
    fn test_empty_ticker_lists_become_sentinel() {
        let raw = json!({"cik": "789019", "name": "MICROSOFT CORP", "tickers": [], "exchanges": [null, ""]});
        let company = normalize_company_identity(&raw).unwrap();
        assert_eq!(company.tickers, vec![NOT_AVAILABLE]);
        assert_eq!(company.exchanges, vec![NOT_AVAILABLE]);
    }

    #[test]
    fn test_missing_required_fields_are_malformed() {
        let no_cik = json!({"name": "Nameless"});
        let no_name = json!({"cik": "320193"});
        assert!(matches!(normalize_company_identity(&no_cik), Err(EdgarError::MalformedResponse(_))));
        assert!(matches!(normalize_company_identity(&no_name), Err(EdgarError::MalformedResponse(_))));
        assert!(matches!(normalize_company_identity(&json!([1, 2])), Err(EdgarError::MalformedResponse(_))));
        assert!(matches!(normalize_company_identity(&json!({"cik": "x", "name": "X"})), Err(EdgarError::MalformedResponse(_))));
    }

    #[test]
    fn test_falls_back_to_mailing_address() {
        let raw = json!({
            "cik": "1", "name": "Mail Only",
            "addresses": { "mailing": { "street1": "PO BOX 1", "city": "DOVER", "stateOrCountry": "DE", "zipCode": "19901" } }
        });
        let company = normalize_company_identity(&raw).unwrap();
        assert_eq!(company.address.city, "DOVER");
    }
}
