// src/normalize/mod.rs
//! Pure reshaping of EDGAR JSON into display-ready records.
//! Nothing in here performs I/O; callers fetch and hand over parsed JSON.
pub mod company;
pub mod facts;
pub mod filings;
pub mod format;
pub mod tickers;

use crate::utils::error::EdgarError;

pub use company::{normalize_company_identity, CompanyIdentity, PostalAddress, NOT_AVAILABLE};
pub use facts::{
    build_financial_statements, compare_metric_sets, extract_key_metric, extract_latest_metric,
    extract_latest_metric_in, parse_period, FinancialMetric, FinancialStatements, MetricComparison, MetricRequest,
};
pub use filings::{search_filings, summarize_activity, ActivitySummary, FilingEntry, FilingQuery};
pub use format::{format_value, parse_currency};
pub use tickers::{find_company, CompanyMatch};

/// Parses a raw response body; anything that is not JSON is a malformed response.
pub fn parse_document(body: &str) -> Result<serde_json::Value, EdgarError> {
    serde_json::from_str(body).map_err(|e| EdgarError::malformed(format!("response is not JSON: {}", e)))
}
