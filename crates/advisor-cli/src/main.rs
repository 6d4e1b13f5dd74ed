//! Command-line financial advisor
//!
//! Answers a question about a set of stocks using recent news and a month of
//! daily prices as context for an OpenAI-compatible model.
//!
//! # Usage
//!
//! ```bash
//! export OPENAI_API_BASE="http://localhost:1234/v1"
//! export OPENAI_MODEL="samantha-mistral-instruct-7b"
//!
//! advisor --question "Which one should I buy?" --stocks AAPL,MSFT
//! advisor --question "Summarize NVDA" --stocks NVDA --dry-run
//! advisor --interactive --stocks AAPL
//! ```

mod session;

use advisor_llm::LLMProvider;
use advisor_llm::providers::{OpenAIConfig, OpenAIProvider};
use advisor_stock::{FinancialAdvisor, StockConfig, StocksManager};
use advisor_utils::LogFormat;
use anyhow::{Context, bail};
use clap::Parser;
use session::{Command, HELP, Session};
use std::env;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "advisor")]
#[command(about = "Financial advice from recent stock news and prices", long_about = None)]
struct Args {
    /// The client's question
    #[arg(short, long)]
    question: Option<String>,

    /// Stocks to analyze, comma separated
    #[arg(short, long, value_delimiter = ',')]
    stocks: Vec<String>,

    /// Use the objective, prediction-oriented system prompt
    #[arg(short, long)]
    complex: bool,

    /// Print the conversation payload as JSON instead of calling the model
    #[arg(long)]
    dry_run: bool,

    /// Read questions from stdin until /exit
    #[arg(short, long)]
    interactive: bool,

    /// Print the selectable stocks and exit
    #[arg(long)]
    list_stocks: bool,

    /// Allow symbols outside the configured stock options
    #[arg(long)]
    any_symbol: bool,

    /// Log output format (pretty or json)
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,
}

/// Generation backend; `None` means dry run
type Backend = Option<Arc<dyn LLMProvider>>;

fn provider_from_env(config: &StockConfig) -> anyhow::Result<Arc<dyn LLMProvider>> {
    let api_base = env::var("OPENAI_API_BASE").unwrap_or_else(|_| {
        warn!("OPENAI_API_BASE not set, using http://localhost:1234/v1");
        "http://localhost:1234/v1".to_string()
    });
    let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| "not-needed".to_string());

    let openai = OpenAIConfig::new(api_key)
        .with_api_base(api_base)
        .with_timeout(config.request_timeout.as_secs());
    Ok(Arc::new(OpenAIProvider::with_config(openai)?))
}

fn normalize_symbols(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn check_symbols(config: &StockConfig, symbols: &[String], any_symbol: bool) -> anyhow::Result<()> {
    if symbols.is_empty() {
        bail!("select at least one stock (--stocks)");
    }
    if !any_symbol {
        if let Some(unknown) = symbols.iter().find(|s| !config.is_stock_option(s)) {
            bail!(
                "{unknown} is not one of the available stocks ({}); pass --any-symbol to allow it",
                config.stock_options.join(", ")
            );
        }
    }
    Ok(())
}

async fn answer(
    advisor: &FinancialAdvisor,
    backend: &Backend,
    question: &str,
    symbols: &[String],
    complex: bool,
) -> anyhow::Result<String> {
    match backend {
        Some(provider) => Ok(advisor
            .advise(provider.as_ref(), question, symbols, complex)
            .await?),
        None => {
            let conversation = advisor.generate_prompt(question, symbols, complex).await?;
            Ok(serde_json::to_string_pretty(&conversation)?)
        }
    }
}

async fn run_interactive(
    advisor: &FinancialAdvisor,
    backend: &Backend,
    config: &StockConfig,
    args: &Args,
    symbols: Vec<String>,
) -> anyhow::Result<()> {
    println!("{HELP}\n");
    let mut session = Session::new(symbols, args.complex);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", session.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        let Some(command) = Command::parse(&input) else {
            continue;
        };
        match command {
            Command::Exit => break,
            Command::Help => println!("{HELP}"),
            Command::List => println!("{}", config.stock_options.join(", ")),
            Command::ToggleComplex => session.complex = !session.complex,
            Command::Stocks(symbols) => match check_symbols(config, &symbols, args.any_symbol) {
                Ok(()) => session.symbols = symbols,
                Err(e) => eprintln!("Error: {e}"),
            },
            Command::Ask(question) => {
                if let Err(e) = check_symbols(config, &session.symbols, args.any_symbol) {
                    eprintln!("Error: {e}");
                    continue;
                }
                match answer(advisor, backend, &question, &session.symbols, session.complex).await
                {
                    Ok(response) => println!("{response}\n"),
                    Err(e) => eprintln!("Error: {e:#}\n"),
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    advisor_utils::init_tracing("warn,advisor_stock=info,advisor=info", args.log_format);

    let config = StockConfig::builder()
        .with_env()
        .build()
        .context("invalid configuration")?;

    if args.list_stocks {
        for symbol in &config.stock_options {
            println!("{symbol}");
        }
        return Ok(());
    }

    let symbols = normalize_symbols(&args.stocks);

    // One manager for the whole process so the cache outlives requests
    let manager = Arc::new(StocksManager::from_config(&config)?);
    let advisor = FinancialAdvisor::new(Arc::clone(&manager), &config);
    let backend: Backend = if args.dry_run {
        None
    } else {
        Some(provider_from_env(&config)?)
    };
    info!(model = %config.generation.model, dry_run = args.dry_run, "Starting advisor");

    let result = if args.interactive {
        run_interactive(&advisor, &backend, &config, &args, symbols).await
    } else {
        match args.question.as_deref() {
            Some(question) => {
                check_symbols(&config, &symbols, args.any_symbol)?;
                let response = answer(&advisor, &backend, question, &symbols, args.complex).await?;
                println!("{response}");
                Ok(())
            }
            None => Err(anyhow::anyhow!(
                "a question is required (--question), or use --interactive"
            )),
        }
    };

    manager.shutdown().await;
    result
}
