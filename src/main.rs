// src/main.rs
use clap::{Parser, Subcommand};
use sec_edgar_toolkit::config::{self, EdgarConfig};
use sec_edgar_toolkit::tools::{self, render};
use sec_edgar_toolkit::utils::logging;
use sec_edgar_toolkit::{AppError, EdgarClient, SecEdgarToolkit, ToolKind};
use std::path::PathBuf;
use std::time::Duration;

/// Command Line Interface for the SEC EDGAR agent tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// User-Agent sent to SEC, e.g. "MyApp/1.0 (me@example.com)"
    #[arg(long, env = config::USER_AGENT_ENV, global = true)]
    user_agent: Option<String>,

    /// Delay before each EDGAR request in milliseconds (SEC allows 10 req/s)
    #[arg(long, env = config::RATE_LIMIT_ENV, default_value_t = config::DEFAULT_RATE_LIMIT_DELAY_MS, global = true)]
    rate_limit_ms: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Also write the tool output to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the registered tools and their descriptions
    ListTools,

    /// Look up a CIK by ticker, company name or CIK
    Lookup { query: String },

    /// Company details for a CIK
    Company { cik: String },

    /// Latest headline XBRL facts for a CIK
    Facts { cik: String },

    /// Search recent filings
    Filings {
        cik: String,
        /// Form type substring, e.g. 10-K
        #[arg(short, long)]
        form_type: Option<String>,
        /// Earliest filing date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        date_from: Option<String>,
        /// Latest filing date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        date_to: Option<String>,
        /// Maximum number of filings returned
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Text of a filing document
    Content { url: String },

    /// Income statement, balance sheet and cash flow lines
    Statements {
        cik: String,
        /// YYYY or YYYY-Qn; latest when omitted
        #[arg(short, long)]
        period: Option<String>,
    },

    /// Recent Form 4 insider filings
    Insider {
        cik: String,
        #[arg(short, long, default_value_t = 90)]
        days_back: i64,
    },

    /// Recent 8-K material events
    Events {
        cik: String,
        #[arg(short, long, default_value_t = 90)]
        days_back: i64,
    },

    /// Compare metrics across companies
    Compare {
        #[arg(required = true, num_args = 2..)]
        ciks: Vec<String>,
        /// Comma-separated metric names or US-GAAP concepts
        #[arg(short, long, value_delimiter = ',')]
        metrics: Vec<String>,
    },

    /// Call a tool by name with raw text input, as an agent would
    Invoke { tool: String, input: String },
}

impl Command {
    /// The tool name and the text input an agent would send for this command.
    /// `None` for commands that do not call a tool.
    fn to_tool_call(&self) -> Option<(String, String)> {
        let (kind, input) = match self {
            Command::ListTools => return None,
            Command::Invoke { tool, input } => return Some((tool.clone(), input.clone())),
            Command::Lookup { query } => (ToolKind::CikLookup, query.clone()),
            Command::Company { cik } => (ToolKind::CompanyInfo, cik.clone()),
            Command::Facts { cik } => (ToolKind::CompanyFacts, cik.clone()),
            Command::Filings { cik, form_type, date_from, date_to, limit } => (
                ToolKind::FilingSearch,
                serde_json::json!({
                    "cik": cik,
                    "form_type": form_type,
                    "date_from": date_from,
                    "date_to": date_to,
                    "limit": limit,
                })
                .to_string(),
            ),
            Command::Content { url } => (ToolKind::FilingContent, url.clone()),
            Command::Statements { cik, period } => (
                ToolKind::FinancialStatements,
                serde_json::json!({ "cik": cik, "period": period }).to_string(),
            ),
            Command::Insider { cik, days_back } => (
                ToolKind::InsiderTrading,
                serde_json::json!({ "cik": cik, "days_back": days_back }).to_string(),
            ),
            Command::Events { cik, days_back } => (
                ToolKind::MaterialEvents,
                serde_json::json!({ "cik": cik, "days_back": days_back }).to_string(),
            ),
            Command::Compare { ciks, metrics } => (
                ToolKind::CompareFinancials,
                serde_json::json!({ "ciks": ciks, "metrics": metrics }).to_string(),
            ),
        };
        Some((kind.name().to_string(), input))
    }
}

fn build_config(args: &Args) -> Result<EdgarConfig, AppError> {
    let user_agent = args.user_agent.clone().ok_or_else(|| {
        AppError::Config(format!(
            "a User-Agent is required by SEC: pass --user-agent or set {}",
            config::USER_AGENT_ENV
        ))
    })?;
    let config = EdgarConfig::new(user_agent)
        .with_rate_limit_delay(Duration::from_millis(args.rate_limit_ms))
        .with_timeout(Duration::from_secs(args.timeout_secs));
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI Arguments
    let args = Args::parse();

    // 2. Setup Logging (reads RUST_LOG env var)
    logging::setup_logging(args.verbose);
    tracing::debug!("Starting with args: {:?}", args);

    let output = match args.command.to_tool_call() {
        None => render::pretty_json(&tools::tool_specs()),
        Some((tool, input)) => {
            // 3. Initialize the EDGAR client and toolkit
            let config = build_config(&args)?;
            let client = EdgarClient::new(config)?;
            let toolkit = SecEdgarToolkit::new(client);

            // 4. Run the requested tool
            toolkit.invoke(&tool, &input).await
        }
    };

    println!("{}", output);

    if let Some(path) = &args.output {
        std::fs::write(path, &output)?;
        tracing::info!("Saved output to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn test_filings_command_builds_search_input() {
        let args = Args::parse_from([
            "sec-edgar", "--user-agent", "App/1.0 (a@b.co)", "filings", "320193", "--form-type", "10-K", "--limit", "5",
        ]);
        let (tool, input) = args.command.to_tool_call().unwrap();
        assert_eq!(tool, ToolKind::FilingSearch.name());
        let input: serde_json::Value = serde_json::from_str(&input).unwrap();
        assert_eq!(input["cik"], "320193");
        assert_eq!(input["form_type"], "10-K");
        assert_eq!(input["limit"], 5);
        assert!(input["date_from"].is_null());
    }

    #[test]
    fn test_compare_splits_metrics() {
        let args = Args::parse_from([
            "sec-edgar", "compare", "320193", "789019", "--metrics", "revenue,eps",
        ]);
        let (tool, input) = args.command.to_tool_call().unwrap();
        assert_eq!(tool, ToolKind::CompareFinancials.name());
        let input: serde_json::Value = serde_json::from_str(&input).unwrap();
        assert_eq!(input["ciks"], serde_json::json!(["320193", "789019"]));
        assert_eq!(input["metrics"], serde_json::json!(["revenue", "eps"]));
    }

    #[test]
    fn test_list_tools_and_invoke() {
        let args = Args::parse_from(["sec-edgar", "list-tools"]);
        assert!(args.command.to_tool_call().is_none());
        let args = Args::parse_from(["sec-edgar", "invoke", "sec_edgar_8k_events", "320193"]);
        assert_eq!(
            args.command.to_tool_call(),
            Some(("sec_edgar_8k_events".to_string(), "320193".to_string()))
        );
    }

    #[test]
    fn test_config_requires_user_agent() {
        let args = Args::parse_from(["sec-edgar", "company", "320193"]);
        if args.user_agent.is_none() {
            assert!(matches!(build_config(&args), Err(AppError::Config(_))));
        }
        let args = Args::parse_from(["sec-edgar", "--user-agent", "App/1.0 (a@b.co)", "company", "320193"]);
        assert!(build_config(&args).is_ok());
    }
}
