//! Fundamentals CLI binary.
//!
//! Summarizes an annual report and prints the company's normalized statements.

mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fundamentals::insights::{DEFAULT_QUERY, InsightPipeline, OpenAiClient};
use fundamentals::{
    AppConfig, CompanyQuery, FundamentalsClient, Lookup, StatementKind, StatementPair, Symbol,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "fundamentals")]
#[command(about = "Annual report insights and company fundamentals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a report and show the company's statements
    Analyze {
        /// Extracted report text; the company name is taken from the file name
        report: PathBuf,

        /// Company name, instead of the one derived from the file name
        #[arg(long)]
        company: Option<String>,

        /// Question asked of the report
        #[arg(long, default_value = DEFAULT_QUERY)]
        query: String,

        /// Skip the language-model summary
        #[arg(long)]
        skip_insights: bool,
    },

    /// Resolve a company name to its ticker in the target market
    Ticker {
        /// Company name
        company: String,
    },

    /// Show the normalized statements of a ticker
    Statements {
        /// Ticker symbol, without exchange suffix
        symbol: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fundamentals=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    info!(
        target_market = %config.target_market,
        period_window = config.period_window,
        period_type = %config.period_type,
        "Loaded configuration"
    );
    let client = FundamentalsClient::alpha_vantage(&config);

    match cli.command {
        Commands::Analyze {
            report,
            company,
            query,
            skip_insights,
        } => {
            let company = match company {
                Some(name) => CompanyQuery::new(name)?,
                None => CompanyQuery::from_file_name(&report)?,
            };
            if !skip_insights {
                print_insights(&config, &report, &query).await;
            }
            analyze_company(&client, &company).await;
        }
        Commands::Ticker { company } => {
            let company = CompanyQuery::new(company)?;
            match client.resolve_ticker(&company).await {
                Lookup::Found(ticker) => println!("{} ({})", ticker.symbol, ticker.region),
                Lookup::NotFound => println!(
                    "No listing of {company} found in {}.",
                    client.target_market()
                ),
                Lookup::Failed(e) => {
                    return Err(e).context(format!("symbol search for {company} failed"));
                }
            }
        }
        Commands::Statements { symbol } => {
            let symbol = Symbol::new(symbol);
            let pair = client.fetch_statements(&symbol).await;
            print_statements(symbol.as_str(), &pair);
        }
    }

    Ok(())
}

async fn print_insights(config: &AppConfig, report: &Path, query: &str) {
    let text = tokio::fs::read_to_string(report).await;

    let mut llm = OpenAiClient::new(config.llm_api_key.clone());
    if let Some(base_url) = &config.llm_base_url {
        llm = llm.with_base_url(base_url.clone());
    }
    let llm = Arc::new(llm);
    let pipeline = InsightPipeline::new(llm.clone(), llm);

    println!("Insights from Annual Report\n");
    println!("{}\n", report_insights(report, text, &pipeline, query).await);
}

/// Summary of the report, or why there is none. Never fails the run.
async fn report_insights(
    report: &Path,
    text: std::io::Result<String>,
    pipeline: &InsightPipeline,
    query: &str,
) -> String {
    let text = match text {
        Ok(text) => text,
        Err(e) => {
            warn!(report = %report.display(), error = %e, "Failed to read report");
            return format!("Insights unavailable: cannot read {}: {e}", report.display());
        }
    };

    match pipeline.summarize(&text, query).await {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "Report insights unavailable");
            format!("Insights unavailable: {e}")
        }
    }
}

async fn analyze_company(client: &FundamentalsClient, company: &CompanyQuery) {
    println!("Analyzing the report for: {company}");

    let report = client.analyze(company).await;
    match (&report.ticker, &report.statements) {
        (Lookup::Found(ticker), Some(pair)) => {
            println!("Ticker Symbol: {}\n", ticker.symbol);
            print_statements(company.as_str(), pair);
        }
        (Lookup::Failed(e), _) => {
            println!("Unable to retrieve ticker symbol for {company}: {e}");
        }
        _ => println!(
            "Unable to retrieve ticker symbol for {company} in {}.",
            client.target_market()
        ),
    }
}

fn print_statements(company: &str, pair: &StatementPair) {
    for kind in [StatementKind::Income, StatementKind::BalanceSheet] {
        println!("{}", render::statement_section(company, kind, pair.get(kind)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fundamentals::insights::{CompletionModel, Embedder};
    use fundamentals::{FundamentalsError, Result};
    use std::io::{Error, ErrorKind};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct StubModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Embedder for StubModel {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0]).collect())
        }
    }

    #[async_trait]
    impl CompletionModel for StubModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok("- Revenue grew".to_string())
        }
    }

    /// Fails every completion.
    #[derive(Debug)]
    struct FailingModel;

    #[async_trait]
    impl CompletionModel for FailingModel {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(FundamentalsError::Network("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_unreadable_report_does_not_fail() {
        let model = Arc::new(StubModel::default());
        let pipeline = InsightPipeline::new(model.clone(), model.clone());
        let text = Err(Error::new(
            ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        ));

        let insights =
            report_insights(Path::new("Infosys.pdf"), text, &pipeline, DEFAULT_QUERY).await;

        assert!(insights.starts_with("Insights unavailable: cannot read Infosys.pdf"));
        assert!(insights.contains("valid UTF-8"));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_report_insights_answer() {
        let model = Arc::new(StubModel::default());
        let pipeline = InsightPipeline::new(model.clone(), model);
        let text = Ok("Revenue grew 4.7% this year.".to_string());

        let insights =
            report_insights(Path::new("Infosys.txt"), text, &pipeline, DEFAULT_QUERY).await;

        assert_eq!(insights, "- Revenue grew");
    }

    #[tokio::test]
    async fn test_summary_failure_is_reported() {
        let pipeline = InsightPipeline::new(Arc::new(StubModel::default()), Arc::new(FailingModel));
        let text = Ok("Revenue grew 4.7% this year.".to_string());

        let insights =
            report_insights(Path::new("Infosys.txt"), text, &pipeline, DEFAULT_QUERY).await;

        assert_eq!(insights, "Insights unavailable: Network error: connection refused");
    }
}
