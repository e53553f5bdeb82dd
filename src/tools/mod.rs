// src/tools/mod.rs
//! Named tools over EDGAR for agent frameworks.
//!
//! Every tool takes text and returns text. Typed methods on
//! [`SecEdgarToolkit`] return `Result`s; [`SecEdgarToolkit::invoke`] is the one
//! place where errors are turned into descriptive strings.
pub mod params;
pub mod render;

use crate::edgar::cik::Cik;
use crate::edgar::client::{EdgarClient, JsonFetcher};
use crate::extractors::{self, FilingText};
use crate::normalize::filings::{look_back_start, SCAN_WINDOW};
use crate::normalize::{
    self, build_financial_statements, compare_metric_sets, extract_key_metric, find_company, parse_period,
    search_filings, summarize_activity, ActivitySummary, CompanyIdentity, CompanyMatch, FilingEntry, FilingQuery,
    FinancialMetric, FinancialStatements, MetricComparison, MetricRequest,
};
use crate::utils::error::{EdgarError, TransportError};
use chrono::NaiveDate;
use params::{ActivityParams, CompareParams, FilingSearchParams, StatementsParams};
use serde::Serialize;

const INSIDER_FORMS: &[&str] = &["4", "4/A"];
const INSIDER_SHOWN: usize = 10;
const EVENTS_SHOWN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    CikLookup,
    CompanyInfo,
    CompanyFacts,
    FilingSearch,
    FilingContent,
    FinancialStatements,
    InsiderTrading,
    MaterialEvents,
    CompareFinancials,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::CikLookup,
        ToolKind::CompanyInfo,
        ToolKind::CompanyFacts,
        ToolKind::FilingSearch,
        ToolKind::FilingContent,
        ToolKind::FinancialStatements,
        ToolKind::InsiderTrading,
        ToolKind::MaterialEvents,
        ToolKind::CompareFinancials,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::CikLookup => "sec_edgar_cik_lookup",
            ToolKind::CompanyInfo => "sec_edgar_company_info",
            ToolKind::CompanyFacts => "sec_edgar_company_facts",
            ToolKind::FilingSearch => "sec_edgar_filing_search",
            ToolKind::FilingContent => "sec_edgar_filing_content",
            ToolKind::FinancialStatements => "sec_edgar_financial_statements",
            ToolKind::InsiderTrading => "sec_edgar_insider_trading",
            ToolKind::MaterialEvents => "sec_edgar_8k_events",
            ToolKind::CompareFinancials => "sec_edgar_compare_financials",
        }
    }

    /// Written for the model deciding which tool to call.
    pub fn description(self) -> &'static str {
        match self {
            ToolKind::CikLookup => {
                "Look up a company's CIK (Central Index Key) number by name or ticker symbol. \
                 Input: company name or ticker. Output: CIK number and company info."
            }
            ToolKind::CompanyInfo => {
                "Get detailed company information from SEC EDGAR. \
                 Input: CIK number. Output: Company details including name, SIC, location, fiscal year end."
            }
            ToolKind::CompanyFacts => {
                "Get XBRL company facts (financial data points). \
                 Input: CIK number. Output: Latest revenue, net income, total assets and basic EPS."
            }
            ToolKind::FilingSearch => {
                "Search for SEC filings by company and form type. \
                 Input: JSON with 'cik' and optional 'form_type' (10-K, 10-Q, 8-K, etc.), 'date_from', 'date_to' \
                 (YYYY-MM-DD) and 'limit'. Output: List of filings with dates and URLs."
            }
            ToolKind::FilingContent => {
                "Extract text content from a specific SEC filing. \
                 Input: Filing URL from sec_edgar_filing_search. Output: Plain text of the filing (truncated)."
            }
            ToolKind::FinancialStatements => {
                "Extract financial statements from XBRL data. \
                 Input: JSON with 'cik' and optional 'period' (e.g., '2023-Q4' or '2023'). \
                 Output: Income statement, balance sheet, and cash flow data."
            }
            ToolKind::InsiderTrading => {
                "Get insider trading data (Form 4 filings). \
                 Input: JSON with 'cik' and optional 'days_back' (default 90). \
                 Output: Recent insider transaction filings with dates and documents."
            }
            ToolKind::MaterialEvents => {
                "Get recent 8-K material events for a company. \
                 Input: CIK number or JSON with 'cik' and optional 'days_back' (default 90). \
                 Output: List of recent 8-K events with descriptions."
            }
            ToolKind::CompareFinancials => {
                "Compare financial metrics between companies. \
                 Input: JSON with 'cik1', 'cik2' (or 'ciks' list) and optional 'metrics' list \
                 (revenue, net_income, assets, liabilities, equity, eps, cash, ...). \
                 Output: Side-by-side comparison of requested metrics."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Prefix of the error text `invoke` returns for this tool.
    fn action(self) -> &'static str {
        match self {
            ToolKind::CikLookup => "looking up CIK",
            ToolKind::CompanyInfo => "fetching company info",
            ToolKind::CompanyFacts => "fetching company facts",
            ToolKind::FilingSearch => "searching filings",
            ToolKind::FilingContent => "fetching filing content",
            ToolKind::FinancialStatements => "fetching financial statements",
            ToolKind::InsiderTrading => "fetching insider trading data",
            ToolKind::MaterialEvents => "fetching 8-K events",
            ToolKind::CompareFinancials => "comparing financials",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
}

/// Name and description of every tool, in registration order.
pub fn tool_specs() -> Vec<ToolSpec> {
    ToolKind::ALL
        .into_iter()
        .map(|kind| ToolSpec { name: kind.name(), description: kind.description() })
        .collect()
}

/// The EDGAR tool set, explicitly constructed around a fetcher.
pub struct SecEdgarToolkit<F: JsonFetcher = EdgarClient> {
    fetcher: F,
    today: Option<NaiveDate>,
    content_max_chars: usize,
}

impl<F: JsonFetcher> SecEdgarToolkit<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            today: None,
            content_max_chars: extractors::DEFAULT_MAX_CHARS,
        }
    }

    /// Pins "today" for look-back windows instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn with_content_max_chars(mut self, max_chars: usize) -> Self {
        self.content_max_chars = max_chars;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn tools(&self) -> Vec<ToolSpec> {
        tool_specs()
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Runs tool `name` on `input`. Always returns text: failures come back as
    /// `Error <action>: <reason>` rather than as an `Err`.
    pub async fn invoke(&self, name: &str, input: &str) -> String {
        let Some(kind) = ToolKind::from_name(name) else {
            tracing::warn!("Unknown tool requested: {}", name);
            let known: Vec<&str> = ToolKind::ALL.iter().map(|k| k.name()).collect();
            return format!("Unknown tool '{}'. Available tools: {}", name.trim(), known.join(", "));
        };

        tracing::info!("Invoking {} with input: {}", kind.name(), input.trim());
        match self.dispatch(kind, input).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("{} failed: {}", kind.name(), err);
                error_text(kind, &err)
            }
        }
    }

    async fn dispatch(&self, kind: ToolKind, input: &str) -> Result<String, EdgarError> {
        match kind {
            ToolKind::CikLookup => Ok(match self.lookup_cik(input).await? {
                Some(found) => render::company_match(&found),
                None => render::company_not_found(input),
            }),
            ToolKind::CompanyInfo => {
                let company = self.company_info(params::parse_cik(input)?).await?;
                Ok(render::pretty_json(&company))
            }
            ToolKind::CompanyFacts => {
                let metrics = self.company_facts(params::parse_cik(input)?).await?;
                Ok(render::key_metrics(&metrics))
            }
            ToolKind::FilingSearch => {
                let params: FilingSearchParams = params::parse_params(input)?;
                let query = params.to_query()?;
                let entries = self.search_filings(params.cik.0, &query).await?;
                Ok(render::filings(params.cik.0, query.form_type.as_deref(), &entries))
            }
            ToolKind::FilingContent => {
                if !extractors::is_document_url(input) {
                    return Ok("Please provide a full filing URL from sec_edgar_filing_search".to_string());
                }
                let text = self.filing_content(input.trim()).await?;
                Ok(render::filing_text(&text))
            }
            ToolKind::FinancialStatements => {
                let params: StatementsParams = params::parse_params(input)?;
                let statements = self
                    .financial_statements(params.cik.0, params.period.as_deref().unwrap_or_default())
                    .await?;
                Ok(render::financial_statements(params.cik.0, &statements))
            }
            ToolKind::InsiderTrading => {
                let params: ActivityParams = params::parse_params(input)?;
                let summary = self.insider_trading(params.cik.0, params.days_back()?).await?;
                Ok(render::insider_activity(&summary))
            }
            ToolKind::MaterialEvents => {
                let params: ActivityParams = params::parse_params(input)?;
                let summary = self.material_events(params.cik.0, params.days_back()?).await?;
                Ok(render::material_events(&summary))
            }
            ToolKind::CompareFinancials => {
                let params: CompareParams = params::parse_params(input)?;
                let ciks = params.ciks()?;
                let requests = params.requests();
                let table = self.compare_financials(&ciks, &requests).await?;
                Ok(render::comparison(&ciks, &requests, &table))
            }
        }
    }

    /// Resolves a CIK, ticker or company name. A numeric query is tried as a
    /// CIK first and falls back to the ticker list when EDGAR has no such CIK.
    pub async fn lookup_cik(&self, query: &str) -> Result<Option<CompanyMatch>, EdgarError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EdgarError::InvalidInput("empty company query".to_string()));
        }

        if let Ok(cik) = Cik::parse(query) {
            match self.company_info(cik).await {
                Ok(company) => {
                    let ticker = Some(company.primary_ticker().to_string()).filter(|t| t != normalize::NOT_AVAILABLE);
                    return Ok(Some(CompanyMatch { cik: company.cik, name: company.name, ticker }));
                }
                Err(EdgarError::Transport(TransportError::NotFound(_))) => {
                    tracing::debug!("No submissions for CIK {}, trying the ticker list", cik);
                }
                Err(err) => return Err(err),
            }
        }

        let tickers = self.fetcher.fetch_json(&self.fetcher.company_tickers_url()).await?;
        find_company(&tickers, query)
    }

    pub async fn company_info(&self, cik: Cik) -> Result<CompanyIdentity, EdgarError> {
        let raw = self.fetcher.fetch_json(&self.fetcher.submissions_url(cik)).await?;
        normalize::normalize_company_identity(&raw)
    }

    /// Headline metrics that the company actually reports, in display order.
    pub async fn company_facts(&self, cik: Cik) -> Result<Vec<FinancialMetric>, EdgarError> {
        let raw = self.fetcher.fetch_json(&self.fetcher.company_facts_url(cik)).await?;
        let mut metrics = Vec::new();
        for metric in normalize::facts::KEY_METRICS {
            if let Some(found) = extract_key_metric(&raw, metric, None)? {
                metrics.push(found);
            }
        }
        Ok(metrics)
    }

    pub async fn search_filings(&self, cik: Cik, query: &FilingQuery) -> Result<Vec<FilingEntry>, EdgarError> {
        let raw = self.fetcher.fetch_json(&self.fetcher.submissions_url(cik)).await?;
        search_filings(&raw, query)
    }

    pub async fn filing_content(&self, url: &str) -> Result<FilingText, EdgarError> {
        if !extractors::is_document_url(url) {
            return Err(EdgarError::InvalidInput(format!("'{}' is not a filing URL", url)));
        }
        let body = self.fetcher.fetch_text(url).await?;
        Ok(extractors::extract_text(&body, self.content_max_chars))
    }

    pub async fn financial_statements(&self, cik: Cik, period: &str) -> Result<FinancialStatements, EdgarError> {
        let year = parse_period(period)?;
        let raw = self.fetcher.fetch_json(&self.fetcher.company_facts_url(cik)).await?;
        build_financial_statements(&raw, year)
    }

    /// Form 4 filings within the last `days_back` days. The form filter is a
    /// substring match, so "424B2" and "S-4" are dropped afterwards.
    pub async fn insider_trading(&self, cik: Cik, days_back: i64) -> Result<ActivitySummary, EdgarError> {
        let query = FilingQuery::new()
            .form_type("4")
            .date_from(look_back_start(self.today(), days_back)?)
            .max_results(SCAN_WINDOW);
        let entries: Vec<FilingEntry> = self
            .search_filings(cik, &query)
            .await?
            .into_iter()
            .filter(|e| INSIDER_FORMS.contains(&e.form.as_str()))
            .collect();
        Ok(summarize_activity("Insider Trading Activity", days_back, entries, INSIDER_SHOWN))
    }

    pub async fn material_events(&self, cik: Cik, days_back: i64) -> Result<ActivitySummary, EdgarError> {
        let query = FilingQuery::new()
            .form_type("8-K")
            .date_from(look_back_start(self.today(), days_back)?);
        let entries = self.search_filings(cik, &query).await?;
        Ok(summarize_activity("Recent 8-K Material Events", days_back, entries, EVENTS_SHOWN))
    }

    /// Fetches each company's facts in turn, then lines them up.
    pub async fn compare_financials(
        &self,
        ciks: &[Cik],
        requests: &[MetricRequest],
    ) -> Result<MetricComparison, EdgarError> {
        let mut documents = Vec::with_capacity(ciks.len());
        for cik in ciks {
            let raw = self.fetcher.fetch_json(&self.fetcher.company_facts_url(*cik)).await?;
            documents.push((cik.to_string(), raw));
        }
        compare_metric_sets(documents.iter().map(|(cik, raw)| (cik.clone(), raw)), requests)
    }
}

fn error_text(kind: ToolKind, err: &EdgarError) -> String {
    match err {
        EdgarError::Transport(TransportError::NotFound(_)) => {
            format!("Error {}: no EDGAR record found ({})", kind.action(), err)
        }
        EdgarError::Transport(_) => format!("Error {}: {}. Please retry.", kind.action(), err),
        _ => format!("Error {}: {}", kind.action(), err),
    }
}
