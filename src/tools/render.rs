// src/tools/render.rs
//! Text shapes handed back to agent frameworks.
use crate::edgar::cik::Cik;
use crate::extractors::FilingText;
use crate::normalize::{
    ActivitySummary, CompanyMatch, FilingEntry, FinancialMetric, FinancialStatements, MetricComparison,
    MetricRequest, NOT_AVAILABLE,
};
use serde::Serialize;

const RULE_WIDTH: usize = 40;

pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error rendering output: {}", e))
}

pub fn company_match(found: &CompanyMatch) -> String {
    match &found.ticker {
        Some(ticker) => format!("CIK: {}, Name: {}, Ticker: {}", found.cik, found.name, ticker),
        None => format!("CIK: {}, Name: {}", found.cik, found.name),
    }
}

pub fn company_not_found(query: &str) -> String {
    format!("Company '{}' not found in SEC EDGAR database", query.trim())
}

pub fn filings(cik: Cik, form_type: Option<&str>, entries: &[FilingEntry]) -> String {
    if entries.is_empty() {
        return match form_type.map(str::trim).filter(|f| !f.is_empty()) {
            Some(form) => format!("No {} filings found for CIK {}", form, cik),
            None => format!("No filings found for CIK {}", cik),
        };
    }
    pretty_json(entries)
}

pub fn key_metrics(metrics: &[FinancialMetric]) -> String {
    if metrics.is_empty() {
        return "No financial facts available".to_string();
    }
    pretty_json(metrics)
}

pub fn filing_text(text: &FilingText) -> String {
    format!(
        "Filing content (first {} of {} chars):\n{}",
        text.content.chars().count(),
        text.total_chars,
        text.content
    )
}

fn metric_line(metric: Option<&FinancialMetric>) -> String {
    match metric {
        Some(m) => format!("{} (period ending {}, {})", m.value, m.period, m.source_form),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn financial_statements(cik: Cik, statements: &FinancialStatements) -> String {
    if statements.is_empty() {
        return format!("No financial statement data available for CIK {}", cik);
    }
    let scope = match statements.fiscal_year {
        Some(year) => format!("periods ending in {}", year),
        None => "latest reported".to_string(),
    };
    let mut out = format!("Financial Statements for CIK {} ({}):\n", cik, scope);
    for section in &statements.sections {
        out.push_str(&format!("\n{}\n", section.title));
        for (label, metric) in &section.lines {
            out.push_str(&format!("  {}: {}\n", label, metric_line(metric.as_ref())));
        }
    }
    out
}

pub fn insider_activity(summary: &ActivitySummary) -> String {
    if summary.total == 0 {
        return format!("No insider trading data found for the last {} days", summary.days_back);
    }
    let mut out = format!("{} (Last {} days):\n", summary.title, summary.days_back);
    out.push_str(&format!("Total Form 4 Filings: {}\n\n", summary.total));
    for entry in &summary.entries {
        out.push_str(&format!("Date: {}\n", entry.filing_date));
        out.push_str(&format!("Form: {}\n", entry.form));
        out.push_str(&format!("Document: {}\n", or_na(&entry.description)));
        out.push_str(&format!("URL: {}\n", entry.derived_url));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
    }
    out
}

pub fn material_events(summary: &ActivitySummary) -> String {
    if summary.total == 0 {
        return "No recent 8-K events found".to_string();
    }
    let mut out = format!("{}:\n", summary.title);
    out.push_str(&format!("Total 8-K Filings (Last {} days): {}\n\n", summary.days_back, summary.total));
    for entry in &summary.entries {
        out.push_str(&format!("Date: {}\n", entry.filing_date));
        out.push_str(&format!("Description: {}\n", or_na(&entry.description)));
        out.push_str(&format!("URL: {}\n", entry.derived_url));
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
    }
    out
}

/// One block per metric, one line per company, in request order.
pub fn comparison(ciks: &[Cik], requests: &[MetricRequest], table: &MetricComparison) -> String {
    let mut out = String::from("Financial Comparison:\n");
    for request in requests {
        out.push_str(&format!("\n{} [{}]\n", request.concept, request.unit));
        for cik in ciks {
            let metric = table
                .get(&cik.to_string())
                .and_then(|row| row.get(&request.concept))
                .and_then(|m| m.as_ref());
            out.push_str(&format!("  CIK {}: {}\n", cik, metric_line(metric)));
        }
    }
    out
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        NOT_AVAILABLE
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(form: &str, date: &str) -> FilingEntry {
        FilingEntry {
            form: form.to_string(),
            filing_date: date.to_string(),
            accession_number: "0000320193-24-000001".to_string(),
            primary_document: "doc.xml".to_string(),
            description: String::new(),
            derived_url: "https://www.sec.gov/Archives/edgar/data/320193/000032019324000001/doc.xml".to_string(),
        }
    }

    #[test]
    fn test_company_match_text() {
        let found = CompanyMatch { cik: Cik::parse("320193").unwrap(), name: "Apple Inc.".to_string(), ticker: Some("AAPL".to_string()) };
        assert_eq!(company_match(&found), "CIK: 0000320193, Name: Apple Inc., Ticker: AAPL");
        let no_ticker = CompanyMatch { ticker: None, ..found };
        assert_eq!(company_match(&no_ticker), "CIK: 0000320193, Name: Apple Inc.");
    }

    #[test]
    fn test_empty_filings_text() {
        let cik = Cik::parse("320193").unwrap();
        assert_eq!(filings(cik, Some("10-K"), &[]), "No 10-K filings found for CIK 0000320193");
        assert_eq!(filings(cik, None, &[]), "No filings found for CIK 0000320193");
        let json = filings(cik, None, &[entry("10-K", "2024-11-01")]);
        assert!(json.contains("\"url\""));
        assert!(json.contains("\"filing_date\": \"2024-11-01\""));
    }

    #[test]
    fn test_insider_activity_text() {
        let summary = ActivitySummary {
            title: "Insider Trading Activity".to_string(),
            days_back: 90,
            total: 2,
            entries: vec![entry("4", "2024-10-02")],
        };
        let text = insider_activity(&summary);
        assert!(text.starts_with("Insider Trading Activity (Last 90 days):"));
        assert!(text.contains("Total Form 4 Filings: 2"));
        assert!(text.contains("Document: N/A"));
        assert_eq!(text.matches("Date: ").count(), 1);

        let none = ActivitySummary { total: 0, entries: vec![], ..summary };
        assert_eq!(insider_activity(&none), "No insider trading data found for the last 90 days");
    }
}
