// src/edgar/client.rs
use crate::config::EdgarConfig;
use crate::edgar::cik::Cik;
use crate::normalize::parse_document;
use crate::utils::error::{EdgarError, TransportError};
use async_trait::async_trait;
use reqwest::header;

/// The HTTP side of the toolkit. Everything above this trait is pure
/// reshaping, so tests swap in an in-memory implementation.
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// GETs `url` and parses the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, EdgarError>;

    /// GETs `url` and returns the raw body (filing documents are HTML/text).
    async fn fetch_text(&self, url: &str) -> Result<String, EdgarError>;

    fn data_base_url(&self) -> &str;

    fn www_base_url(&self) -> &str;

    fn submissions_url(&self, cik: Cik) -> String {
        format!("{}/submissions/CIK{}.json", self.data_base_url(), cik)
    }

    fn company_facts_url(&self, cik: Cik) -> String {
        format!("{}/api/xbrl/companyfacts/CIK{}.json", self.data_base_url(), cik)
    }

    fn company_tickers_url(&self) -> String {
        format!("{}/files/company_tickers.json", self.www_base_url())
    }
}

/// reqwest-backed fetcher with the mandatory User-Agent and a fixed
/// per-request delay. No retries; callers decide what to do with a
/// `TransportError`.
pub struct EdgarClient {
    http: reqwest::Client,
    config: EdgarConfig,
}

impl EdgarClient {
    pub fn new(config: EdgarConfig) -> Result<Self, EdgarError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str()) // Set the required User-Agent
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &EdgarConfig {
        &self.config
    }

    async fn get(&self, url: &str, accept: Option<&'static str>) -> Result<reqwest::Response, EdgarError> {
        tracing::info!("Requesting {}", url);
        tracing::debug!("Using User-Agent: {}", self.config.user_agent);

        // Basic rate limiting: one fixed delay per request keeps a sequential
        // caller under SEC's 10 requests/second.
        tokio::time::sleep(self.config.rate_limit_delay).await;

        let mut request = self.http.get(url);
        if let Some(accept) = accept {
            request = request.header(header::ACCEPT, accept);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            if status == reqwest::StatusCode::FORBIDDEN {
                tracing::warn!("Received 403 Forbidden - check User-Agent and rate limits.");
                return Err(TransportError::RateLimited.into());
            }
            if status == reqwest::StatusCode::NOT_FOUND {
                tracing::warn!("Received 404 Not Found for URL: {}", url);
                return Err(TransportError::NotFound(url.to_string()).into());
            }
            return Err(TransportError::Http(status).into());
        }

        Ok(response)
    }
}

#[async_trait]
impl JsonFetcher for EdgarClient {
    async fn fetch_json(&self, url: &str) -> Result<serde_json::Value, EdgarError> {
        let response = self.get(url, None).await?;
        let body = response.text().await?;
        tracing::debug!("Received {} bytes from {}", body.len(), url);
        parse_document(&body)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, EdgarError> {
        // Filing documents are served as HTML/text, not JSON.
        let response = self
            .get(url, Some("application/xml,text/html,text/plain,*/*"))
            .await?;
        let body = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", body.len(), url);
        Ok(body)
    }

    fn data_base_url(&self) -> &str {
        &self.config.data_base_url
    }

    fn www_base_url(&self) -> &str {
        &self.config.www_base_url
    }
}
