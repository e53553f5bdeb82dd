// src/tools/params.rs
//! Tool inputs arrive as text: either a JSON object or a bare CIK.
use crate::edgar::cik::Cik;
use crate::normalize::filings::{FilingQuery, DEFAULT_MAX_RESULTS};
use crate::normalize::MetricRequest;
use crate::utils::error::EdgarError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

pub const DEFAULT_DAYS_BACK: i64 = 90;
pub const DEFAULT_COMPARE_METRICS: &[&str] = &["revenue", "net_income", "assets"];

/// CIK given as a JSON string ("0000320193", "CIK: 320193, Name: ...") or number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CikParam(pub Cik);

impl<'de> Deserialize<'de> for CikParam {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let cik = match &value {
            serde_json::Value::String(s) => Cik::parse(s),
            serde_json::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| EdgarError::InvalidInput(format!("{} is not a valid CIK", n)))
                .and_then(Cik::new),
            other => Err(EdgarError::InvalidInput(format!("{} is not a valid CIK", other))),
        };
        cik.map(CikParam).map_err(|err| match err {
            EdgarError::InvalidInput(msg) => serde::de::Error::custom(msg),
            other => serde::de::Error::custom(other),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct FilingSearchParams {
    pub cik: CikParam,
    #[serde(default)]
    pub form_type: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl FilingSearchParams {
    pub fn to_query(&self) -> Result<FilingQuery, EdgarError> {
        let mut query = FilingQuery::new()
            .form_type(self.form_type.clone().unwrap_or_default())
            .max_results(self.limit.unwrap_or(DEFAULT_MAX_RESULTS));
        if let Some(from) = non_blank(&self.date_from) {
            query = query.date_from(FilingQuery::parse_date(from)?);
        }
        if let Some(to) = non_blank(&self.date_to) {
            query = query.date_to(FilingQuery::parse_date(to)?);
        }
        Ok(query)
    }
}

#[derive(Debug, Deserialize)]
pub struct StatementsParams {
    pub cik: CikParam,
    #[serde(default)]
    pub period: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub cik: CikParam,
    #[serde(default)]
    pub days_back: Option<i64>,
}

impl ActivityParams {
    pub fn days_back(&self) -> Result<i64, EdgarError> {
        match self.days_back {
            Some(days) if days < 0 => Err(EdgarError::InvalidInput(format!("days_back must not be negative, got {}", days))),
            Some(days) => Ok(days),
            None => Ok(DEFAULT_DAYS_BACK),
        }
    }
}

/// Either the two-company form `{cik1, cik2}` or `{ciks: [...]}`.
#[derive(Debug, Deserialize)]
pub struct CompareParams {
    #[serde(default)]
    pub cik1: Option<CikParam>,
    #[serde(default)]
    pub cik2: Option<CikParam>,
    #[serde(default)]
    pub ciks: Vec<CikParam>,
    #[serde(default)]
    pub metrics: Option<Vec<String>>,
}

impl CompareParams {
    pub fn ciks(&self) -> Result<Vec<Cik>, EdgarError> {
        let mut ciks: Vec<Cik> = Vec::new();
        for CikParam(cik) in self.cik1.iter().chain(self.cik2.iter()).chain(self.ciks.iter()) {
            if !ciks.contains(cik) {
                ciks.push(*cik);
            }
        }
        if ciks.is_empty() {
            return Err(EdgarError::InvalidInput("no companies to compare: give 'cik1'/'cik2' or 'ciks'".to_string()));
        }
        Ok(ciks)
    }

    pub fn requests(&self) -> Vec<MetricRequest> {
        match &self.metrics {
            Some(metrics) if !metrics.is_empty() => metrics.iter().map(|m| MetricRequest::resolve(m)).collect(),
            _ => DEFAULT_COMPARE_METRICS.iter().map(|m| MetricRequest::resolve(m)).collect(),
        }
    }
}

/// Parses `input` as a JSON object, or, when it is not one, as a bare CIK
/// wrapped into `{"cik": input}`.
pub fn parse_params<T: DeserializeOwned>(input: &str) -> Result<T, EdgarError> {
    let trimmed = input.trim();
    let value = if trimmed.starts_with('{') {
        serde_json::from_str::<serde_json::Value>(trimmed)
            .map_err(|e| EdgarError::InvalidInput(format!("input is not valid JSON: {}", e)))?
    } else {
        serde_json::json!({ "cik": trimmed })
    };
    serde_json::from_value(value).map_err(|e| EdgarError::InvalidInput(e.to_string()))
}

/// Plain CIK input, e.g. for company info.
pub fn parse_cik(input: &str) -> Result<Cik, EdgarError> {
    parse_params::<StatementsParams>(input).map(|p| p.cik.0)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_cik_and_json() {
        let bare: FilingSearchParams = parse_params("320193").unwrap();
        assert_eq!(bare.cik.0.to_string(), "0000320193");
        assert!(bare.form_type.is_none());

        let json: FilingSearchParams =
            parse_params(r#"{"cik": 320193, "form_type": "10-K", "date_from": "2023-01-01", "limit": 5}"#).unwrap();
        let query = json.to_query().unwrap();
        assert_eq!(query.form_type.as_deref(), Some("10-K"));
        assert_eq!(query.max_results, 5);
        assert_eq!(query.date_from, Some(FilingQuery::parse_date("2023-01-01").unwrap()));
        assert!(query.date_to.is_none());
    }

    #[test]
    fn test_lookup_output_is_accepted_as_cik() {
        assert_eq!(parse_cik("CIK: 0000320193, Name: Apple Inc.").unwrap().value(), 320193);
    }

    #[test]
    fn test_blank_filters_are_ignored() {
        let params: FilingSearchParams =
            parse_params(r#"{"cik": "320193", "form_type": "", "date_from": " ", "date_to": ""}"#).unwrap();
        assert_eq!(params.to_query().unwrap(), FilingQuery::new());
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(parse_params::<FilingSearchParams>("{not json"), Err(EdgarError::InvalidInput(_))));
        assert!(matches!(parse_params::<FilingSearchParams>("Apple"), Err(EdgarError::InvalidInput(_))));
        assert!(matches!(parse_params::<FilingSearchParams>(r#"{"form_type": "10-K"}"#), Err(EdgarError::InvalidInput(_))));

        let bad_date: FilingSearchParams = parse_params(r#"{"cik": "1", "date_to": "01/02/2024"}"#).unwrap();
        assert!(matches!(bad_date.to_query(), Err(EdgarError::InvalidInput(_))));
    }

    #[test]
    fn test_activity_days_back() {
        let default: ActivityParams = parse_params("320193").unwrap();
        assert_eq!(default.days_back().unwrap(), DEFAULT_DAYS_BACK);
        let custom: ActivityParams = parse_params(r#"{"cik": "320193", "days_back": 30}"#).unwrap();
        assert_eq!(custom.days_back().unwrap(), 30);
        let negative: ActivityParams = parse_params(r#"{"cik": "320193", "days_back": -1}"#).unwrap();
        assert!(negative.days_back().is_err());
    }

    #[test]
    fn test_compare_params() {
        let params: CompareParams = parse_params(r#"{"cik1": "320193", "cik2": 789019, "metrics": ["revenue", "eps"]}"#).unwrap();
        let ciks = params.ciks().unwrap();
        assert_eq!(ciks.len(), 2);
        assert_eq!(ciks[1].value(), 789019);
        assert_eq!(params.requests()[1], MetricRequest::new("EarningsPerShareBasic", "USD/shares"));

        let list: CompareParams = parse_params(r#"{"ciks": ["1", "2", "1"]}"#).unwrap();
        assert_eq!(list.ciks().unwrap().len(), 2);
        assert_eq!(list.requests().len(), DEFAULT_COMPARE_METRICS.len());

        let empty: CompareParams = parse_params("{}").unwrap();
        assert!(empty.ciks().is_err());
    }
}
