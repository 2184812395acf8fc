mod age;
mod calculation;
mod format;
mod gemini;
mod input;
mod insight;
mod logging;
mod report;
mod retirement;
mod session;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use gemini::{GeminiClient, GeminiConfig};
use insight::{InsightData, InsightProvider, UnconfiguredProvider, insight_or_fallback};
use retirement::DEFAULT_RETIREMENT_AGE;
use serde::Serialize;
use session::Session;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Current age, retirement date and a short look ahead.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Date of birth (YYYY-MM-DD). Omit to enter dates interactively.
    dob: Option<String>,

    /// Service length in years.
    #[arg(long, env = "RETIREMENT_AGE", default_value_t = DEFAULT_RETIREMENT_AGE,
          value_parser = clap::value_parser!(u32).range(1..=150))]
    retirement_age: u32,

    /// Calculate as of this date instead of today (YYYY-MM-DD).
    #[arg(long, value_parser = input::parse_date)]
    today: Option<NaiveDate>,

    /// Skip the AI insight.
    #[arg(long)]
    no_insight: bool,

    /// Print the result as JSON (single date only). The document is written
    /// once the insight resolves or times out (see --timeout-secs).
    #[arg(long, requires = "dob")]
    json: bool,

    /// Gemini API key; GEMINI_API_KEY is also honoured.
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", default_value = gemini::DEFAULT_MODEL)]
    model: String,

    #[arg(long, env = "GEMINI_BASE_URL", default_value = gemini::DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Upper bound on the whole insight call, retries included.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Log debug diagnostics to stderr (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    result: &'a calculation::CalculationResult,
    insight: Option<InsightData>,
}

impl Cli {
    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    fn provider(&self) -> Option<Arc<dyn InsightProvider>> {
        if self.no_insight {
            return None;
        }

        let api_key = self
            .api_key
            .clone()
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_default();

        let mut config = GeminiConfig::new(api_key);
        config.model = self.model.clone();
        config.base_url = self.gemini_base_url.clone();
        config.timeout = Duration::from_secs(self.timeout_secs);

        match GeminiClient::new(config) {
            Ok(client) => {
                info!(model = client.model(), "insight provider ready");
                Some(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "insights will use the fallback text");
                Some(Arc::new(UnconfiguredProvider))
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.verbose { "debug" } else { "warn" });

    let provider = cli.provider();
    match cli.dob.as_deref() {
        Some(dob) => run_once(&cli, dob, provider).await,
        None => run_interactive(&cli, provider).await,
    }
}

async fn run_once(cli: &Cli, dob: &str, provider: Option<Arc<dyn InsightProvider>>) -> Result<()> {
    let today = cli.today();
    let birthdate = input::parse_birth_date(dob, today)?;
    let result = calculation::calculate(birthdate, today, cli.retirement_age);
    let retirement_year = result.retirement.retirement_year();
    let is_retired = result.retirement.is_retired;

    if cli.json {
        let insight = match &provider {
            Some(p) => Some(insight_or_fallback(p.as_ref(), retirement_year, is_retired).await),
            None => None,
        };
        let report = JsonReport {
            result: &result,
            insight,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize result")?;
        println!("{json}");
        return Ok(());
    }

    // The calculation is shown before the insight request goes out.
    println!("{}", report::render_result(&result, cli.retirement_age));

    if let Some(p) = provider {
        let insight = insight_or_fallback(p.as_ref(), retirement_year, is_retired).await;
        println!("\n{}", report::render_insight(&insight, retirement_year));
    }

    Ok(())
}

async fn run_interactive(cli: &Cli, provider: Option<Arc<dyn InsightProvider>>) -> Result<()> {
    let has_provider = provider.is_some();
    let (mut session, mut rx) = Session::new(provider, cli.retirement_age);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending = false;

    println!("Enter a date of birth (YYYY-MM-DD), or 'quit' to exit.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if matches!(line, "quit" | "exit") {
                    break;
                }

                match session.submit(line, cli.today()) {
                    Ok(result) => {
                        println!("{}\n", report::render_result(&result, session.retirement_age()));
                        pending = has_provider;
                    }
                    Err(e) => println!("{e}"),
                }
            }
            Some(tagged) = rx.recv() => {
                if let Some(t) = session.accept(tagged) {
                    println!("{}\n", report::render_insight(&t.insight, t.retirement_year));
                    pending = false;
                }
            }
        }
    }

    // Input is done; still show the insight for the last calculation.
    while pending {
        let Some(tagged) = rx.recv().await else {
            break;
        };
        if let Some(t) = session.accept(tagged) {
            println!("{}", report::render_insight(&t.insight, t.retirement_year));
            pending = false;
        }
    }

    Ok(())
}
