// src/normalize/facts.rs
use crate::edgar::models::RawFactValue;
use crate::normalize::format::format_value;
use crate::utils::error::EdgarError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const US_GAAP: &str = "us-gaap";
pub const DEFAULT_UNIT: &str = "USD";
pub const PER_SHARE_UNIT: &str = "USD/shares";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialMetric {
    pub label: String,
    pub value: String,
    /// End date of the reported period.
    pub period: String,
    #[serde(rename = "form")]
    pub source_form: String,
    pub concept: String,
    pub unit: String,
    pub raw_value: f64,
}

/// Which concept to read, in which unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricRequest {
    pub concept: String,
    pub unit: String,
}

impl MetricRequest {
    pub fn new(concept: impl Into<String>, unit: impl Into<String>) -> Self {
        Self { concept: concept.into(), unit: unit.into() }
    }

    /// Maps a friendly name ("revenue", "eps") to its US-GAAP concept.
    /// Unknown names are taken as raw concepts reported in USD.
    pub fn resolve(name: &str) -> Self {
        let key = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match METRIC_ALIASES.iter().find(|(alias, _, _)| *alias == key) {
            Some((_, concept, unit)) => Self::new(*concept, *unit),
            None => Self::new(name.trim(), DEFAULT_UNIT),
        }
    }
}

const METRIC_ALIASES: &[(&str, &str, &str)] = &[
    ("revenue", "Revenues", DEFAULT_UNIT),
    ("revenues", "Revenues", DEFAULT_UNIT),
    ("net_income", "NetIncomeLoss", DEFAULT_UNIT),
    ("assets", "Assets", DEFAULT_UNIT),
    ("total_assets", "Assets", DEFAULT_UNIT),
    ("liabilities", "Liabilities", DEFAULT_UNIT),
    ("equity", "StockholdersEquity", DEFAULT_UNIT),
    ("cash", "CashAndCashEquivalentsAtCarryingValue", DEFAULT_UNIT),
    ("operating_cash_flow", "NetCashProvidedByUsedInOperatingActivities", DEFAULT_UNIT),
    ("eps", "EarningsPerShareBasic", PER_SHARE_UNIT),
    ("eps_basic", "EarningsPerShareBasic", PER_SHARE_UNIT),
    ("eps_diluted", "EarningsPerShareDiluted", PER_SHARE_UNIT),
];

/// A display line backed by one or more candidate concepts; the first one the
/// filer actually reports wins (revenue moved to ASC 606 tags around 2018).
#[derive(Debug, Clone, Copy)]
pub struct KeyMetric {
    pub label: &'static str,
    pub concepts: &'static [&'static str],
    pub unit: &'static str,
}

const REVENUE_CONCEPTS: &[&str] = &[
    "Revenues",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "SalesRevenueNet",
];

/// Headline figures shown by the company facts tool.
pub const KEY_METRICS: &[KeyMetric] = &[
    KeyMetric { label: "Latest Revenue", concepts: REVENUE_CONCEPTS, unit: DEFAULT_UNIT },
    KeyMetric { label: "Latest Net Income", concepts: &["NetIncomeLoss"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Total Assets", concepts: &["Assets"], unit: DEFAULT_UNIT },
    KeyMetric { label: "EPS (Basic)", concepts: &["EarningsPerShareBasic"], unit: PER_SHARE_UNIT },
];

pub const INCOME_STATEMENT: &[KeyMetric] = &[
    KeyMetric { label: "Revenue", concepts: REVENUE_CONCEPTS, unit: DEFAULT_UNIT },
    KeyMetric { label: "Cost of Revenue", concepts: &["CostOfRevenue", "CostOfGoodsAndServicesSold"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Gross Profit", concepts: &["GrossProfit"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Operating Income", concepts: &["OperatingIncomeLoss"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Net Income", concepts: &["NetIncomeLoss"], unit: DEFAULT_UNIT },
    KeyMetric { label: "EPS (Basic)", concepts: &["EarningsPerShareBasic"], unit: PER_SHARE_UNIT },
    KeyMetric { label: "EPS (Diluted)", concepts: &["EarningsPerShareDiluted"], unit: PER_SHARE_UNIT },
];

pub const BALANCE_SHEET: &[KeyMetric] = &[
    KeyMetric { label: "Total Assets", concepts: &["Assets"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Total Liabilities", concepts: &["Liabilities"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Stockholders' Equity", concepts: &["StockholdersEquity"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Cash and Equivalents", concepts: &["CashAndCashEquivalentsAtCarryingValue"], unit: DEFAULT_UNIT },
];

pub const CASH_FLOW: &[KeyMetric] = &[
    KeyMetric { label: "Operating Cash Flow", concepts: &["NetCashProvidedByUsedInOperatingActivities"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Investing Cash Flow", concepts: &["NetCashProvidedByUsedInInvestingActivities"], unit: DEFAULT_UNIT },
    KeyMetric { label: "Financing Cash Flow", concepts: &["NetCashProvidedByUsedInFinancingActivities"], unit: DEFAULT_UNIT },
];

/// Restricts candidate values to one fiscal year, by period end date.
/// Accepts "2023", "2023-Q4", "FY2023"; "latest" or empty means no restriction.
pub fn parse_period(input: &str) -> Result<Option<i32>, EdgarError> {
    let s = input.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("latest") {
        return Ok(None);
    }
    let s = s.strip_prefix("FY").or_else(|| s.strip_prefix("fy")).unwrap_or(s);
    let year = s.get(..4).filter(|y| y.chars().all(|c| c.is_ascii_digit()));
    let rest = s.get(4..).unwrap_or_default();
    let rest_ok = rest.is_empty()
        || (rest.get(..2).is_some_and(|q| q.eq_ignore_ascii_case("-Q"))
            && matches!(rest.get(2..), Some("1" | "2" | "3" | "4")));
    match year {
        Some(year) if rest_ok => year
            .parse::<i32>()
            .map(Some)
            .map_err(|_| EdgarError::InvalidInput(format!("'{}' is not a period", input))),
        _ => Err(EdgarError::InvalidInput(format!(
            "'{}' is not a period (expected YYYY or YYYY-Qn)",
            input.trim()
        ))),
    }
}

/// Latest reported value of `concept` in `unit`, by period end date.
/// Returns `Ok(None)` when the company never reported the concept or unit.
pub fn extract_latest_metric(
    raw: &serde_json::Value,
    concept: &str,
    unit: &str,
) -> Result<Option<FinancialMetric>, EdgarError> {
    extract_latest_metric_in(raw, concept, unit, None)
}

/// Same as [`extract_latest_metric`], optionally limited to periods ending in `year`.
/// Values sharing the maximal end date resolve to the last one in source order.
pub fn extract_latest_metric_in(
    raw: &serde_json::Value,
    concept: &str,
    unit: &str,
    year: Option<i32>,
) -> Result<Option<FinancialMetric>, EdgarError> {
    let root = raw
        .as_object()
        .ok_or_else(|| EdgarError::malformed("company facts document is not a JSON object"))?;
    let facts = root
        .get("facts")
        .ok_or_else(|| EdgarError::malformed("company facts document is missing 'facts'"))?;

    let Some(concept_node) = facts.get(US_GAAP).and_then(|gaap| gaap.get(concept)) else {
        tracing::debug!("Concept {} not reported under {}", concept, US_GAAP);
        return Ok(None);
    };
    let Some(unit_values) = concept_node.get("units").and_then(|units| units.get(unit)) else {
        tracing::debug!("Concept {} has no values in unit {}", concept, unit);
        return Ok(None);
    };

    let values = Vec::<RawFactValue>::deserialize(unit_values)
        .map_err(|e| EdgarError::malformed(format!("unexpected shape for {} [{}]: {}", concept, unit, e)))?;

    let year_prefix = year.map(|y| format!("{:04}-", y));
    let mut latest: Option<(&str, f64, &RawFactValue)> = None;
    for value in &values {
        let end = value
            .end
            .as_deref()
            .ok_or_else(|| EdgarError::malformed(format!("{} [{}] value is missing 'end'", concept, unit)))?;
        let val = value
            .val
            .ok_or_else(|| EdgarError::malformed(format!("{} [{}] value is missing 'val'", concept, unit)))?;
        if let Some(prefix) = &year_prefix {
            if !end.starts_with(prefix.as_str()) {
                continue;
            }
        }
        match latest {
            Some((best_end, _, _)) if end < best_end => {}
            _ => latest = Some((end, val, value)),
        }
    }

    let Some((end, val, value)) = latest else {
        return Ok(None);
    };

    let label = concept_node
        .get("label")
        .and_then(|l| l.as_str())
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(concept)
        .to_string();

    Ok(Some(FinancialMetric {
        label,
        value: format_value(val, unit),
        period: end.to_string(),
        source_form: value.form.clone().unwrap_or_default(),
        concept: concept.to_string(),
        unit: unit.to_string(),
        raw_value: val,
    }))
}

/// First concept of `metric` that has a value; the metric's own label replaces the taxonomy one.
pub fn extract_key_metric(
    raw: &serde_json::Value,
    metric: &KeyMetric,
    year: Option<i32>,
) -> Result<Option<FinancialMetric>, EdgarError> {
    for concept in metric.concepts {
        if let Some(mut found) = extract_latest_metric_in(raw, concept, metric.unit, year)? {
            found.label = metric.label.to_string();
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Entity -> concept -> latest value (absent when unreported).
pub type MetricComparison = BTreeMap<String, BTreeMap<String, Option<FinancialMetric>>>;

/// Side-by-side view: one [`extract_latest_metric`] per (entity, request).
/// No arithmetic across entities.
pub fn compare_metric_sets<'a, I>(entities: I, requests: &[MetricRequest]) -> Result<MetricComparison, EdgarError>
where
    I: IntoIterator<Item = (String, &'a serde_json::Value)>,
{
    let mut comparison = MetricComparison::new();
    for (entity, raw) in entities {
        let mut row = BTreeMap::new();
        for request in requests {
            row.insert(
                request.concept.clone(),
                extract_latest_metric(raw, &request.concept, &request.unit)?,
            );
        }
        comparison.insert(entity, row);
    }
    Ok(comparison)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementSection {
    pub title: &'static str,
    pub lines: Vec<(String, Option<FinancialMetric>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialStatements {
    pub fiscal_year: Option<i32>,
    pub sections: Vec<StatementSection>,
}

impl FinancialStatements {
    pub fn is_empty(&self) -> bool {
        self.sections
            .iter()
            .all(|s| s.lines.iter().all(|(_, metric)| metric.is_none()))
    }
}

/// Income statement, balance sheet and cash flow headline lines.
pub fn build_financial_statements(raw: &serde_json::Value, year: Option<i32>) -> Result<FinancialStatements, EdgarError> {
    let mut sections = Vec::new();
    for (title, metrics) in [
        ("Income Statement", INCOME_STATEMENT),
        ("Balance Sheet", BALANCE_SHEET),
        ("Cash Flow Statement", CASH_FLOW),
    ] {
        let mut lines = Vec::with_capacity(metrics.len());
        for metric in metrics {
            lines.push((metric.label.to_string(), extract_key_metric(raw, metric, year)?));
        }
        sections.push(StatementSection { title, lines });
    }
    Ok(FinancialStatements { fiscal_year: year, sections })
}
