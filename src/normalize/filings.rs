// src/normalize/filings.rs
use crate::edgar::cik::Cik;
use crate::edgar::models::RawSubmissionFilings;
use crate::utils::error::EdgarError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar/data";

/// Only the most recent filings are considered, before any filtering.
pub const SCAN_WINDOW: usize = 50;
pub const DEFAULT_MAX_RESULTS: usize = 20;

const DATE_FORMAT: &str = "%Y-%m-%d";

static ACCESSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{10}-[0-9]{2}-[0-9]{6}$").expect("Failed to compile ACCESSION_RE")
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilingEntry {
    pub form: String,
    pub filing_date: String,
    pub accession_number: String,
    pub primary_document: String,
    pub description: String,
    #[serde(rename = "url")]
    pub derived_url: String,
}

impl FilingEntry {
    fn new(
        cik: Cik,
        form: &str,
        filing_date: &str,
        accession_number: &str,
        primary_document: String,
        description: String,
    ) -> Self {
        let derived_url = archive_url(cik, accession_number, &primary_document);
        Self {
            form: form.to_string(),
            filing_date: filing_date.to_string(),
            accession_number: accession_number.to_string(),
            primary_document,
            description,
            derived_url,
        }
    }
}

/// `https://www.sec.gov/Archives/edgar/data/<unpadded cik>/<accession without dashes>/<document>`
pub fn archive_url(cik: Cik, accession_number: &str, primary_document: &str) -> String {
    format!(
        "{}/{}/{}/{}",
        ARCHIVES_BASE_URL,
        cik.unpadded(),
        accession_number.replace('-', ""),
        primary_document
    )
}

/// Filters for [`search_filings`]. Date bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingQuery {
    /// Case-insensitive substring of the form type, e.g. "10-K" also matches "10-K/A".
    pub form_type: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub max_results: usize,
}

impl Default for FilingQuery {
    fn default() -> Self {
        Self {
            form_type: None,
            date_from: None,
            date_to: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl FilingQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form_type(mut self, form_type: impl Into<String>) -> Self {
        let form_type = form_type.into();
        self.form_type = if form_type.trim().is_empty() { None } else { Some(form_type) };
        self
    }

    pub fn date_from(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn date_to(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Parses a `YYYY-MM-DD` bound supplied by a caller.
    pub fn parse_date(input: &str) -> Result<NaiveDate, EdgarError> {
        NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
            .map_err(|_| EdgarError::InvalidInput(format!("'{}' is not a YYYY-MM-DD date", input.trim())))
    }

    fn matches_form(&self, form: &str) -> bool {
        match self.form_type.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => form.to_uppercase().contains(&needle.to_uppercase()),
            _ => true,
        }
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        !self.date_from.is_some_and(|from| date < from) && !self.date_to.is_some_and(|to| date > to)
    }
}

/// Scans the [`SCAN_WINDOW`] most recent filings in source order and returns
/// those matching `query`, at most `query.max_results` of them.
/// No match (including an inverted date range) is an empty result, not an error.
pub fn search_filings(raw: &serde_json::Value, query: &FilingQuery) -> Result<Vec<FilingEntry>, EdgarError> {
    if !raw.is_object() {
        return Err(EdgarError::malformed("submissions document is not a JSON object"));
    }
    let cik = raw
        .get("cik")
        .ok_or_else(|| EdgarError::malformed("submissions document is missing 'cik'"))
        .and_then(Cik::from_json)?;

    let filings = RawSubmissionFilings::deserialize(raw)
        .map_err(|e| EdgarError::malformed(format!("unexpected filings shape: {}", e)))?;
    let recent = filings
        .filings
        .and_then(|f| f.recent)
        .ok_or_else(|| EdgarError::malformed("submissions document is missing 'filings.recent'"))?;
    let forms = recent
        .form
        .ok_or_else(|| EdgarError::malformed("missing 'filings.recent.form'"))?;
    let dates = recent
        .filing_date
        .ok_or_else(|| EdgarError::malformed("missing 'filings.recent.filingDate'"))?;
    let accessions = recent
        .accession_number
        .ok_or_else(|| EdgarError::malformed("missing 'filings.recent.accessionNumber'"))?;

    let mut results = Vec::new();
    for (i, form) in forms.iter().enumerate().take(SCAN_WINDOW) {
        if results.len() >= query.max_results {
            break;
        }
        if !query.matches_form(form) {
            continue;
        }

        let filing_date = dates
            .get(i)
            .ok_or_else(|| EdgarError::malformed(format!("'filings.recent.filingDate' has no entry {}", i)))?;
        let date = NaiveDate::parse_from_str(filing_date, DATE_FORMAT)
            .map_err(|_| EdgarError::malformed(format!("filing date '{}' is not YYYY-MM-DD", filing_date)))?;
        if !query.matches_date(date) {
            continue;
        }

        let accession = accessions
            .get(i)
            .ok_or_else(|| EdgarError::malformed(format!("'filings.recent.accessionNumber' has no entry {}", i)))?;
        if !ACCESSION_RE.is_match(accession) {
            return Err(EdgarError::malformed(format!("accession number '{}' is not NNNNNNNNNN-YY-NNNNNN", accession)));
        }

        results.push(FilingEntry::new(
            cik,
            form,
            filing_date,
            accession,
            recent.primary_document.get(i).cloned().unwrap_or_default(),
            recent.primary_doc_description.get(i).cloned().unwrap_or_default(),
        ));
    }

    tracing::debug!(
        "Filing search for CIK {} (form {:?}) matched {} of {} recent filings",
        cik,
        query.form_type,
        results.len(),
        forms.len().min(SCAN_WINDOW)
    );
    Ok(results)
}

/// Recent activity of one kind of filing (Form 4, 8-K, ...), trimmed for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub title: String,
    pub days_back: i64,
    pub total: usize,
    pub entries: Vec<FilingEntry>,
}

/// Keeps the first `shown` of `entries` while remembering how many there were.
pub fn summarize_activity(title: impl Into<String>, days_back: i64, entries: Vec<FilingEntry>, shown: usize) -> ActivitySummary {
    let total = entries.len();
    ActivitySummary {
        title: title.into(),
        days_back,
        total,
        entries: entries.into_iter().take(shown).collect(),
    }
}

/// Start of an N-day look-back window ending at `today`. Negative windows are
/// empty; windows reaching past the calendar's range are rejected.
pub fn look_back_start(today: NaiveDate, days_back: i64) -> Result<NaiveDate, EdgarError> {
    chrono::Duration::try_days(days_back.max(0))
        .and_then(|window| today.checked_sub_signed(window))
        .ok_or_else(|| EdgarError::InvalidInput(format!("days_back {} is out of range", days_back)))
}
