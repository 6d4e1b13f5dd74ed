//! Print the conversation payload for a question about a few stocks
//!
//! Fetches live data from Yahoo Finance and the linked article pages, then
//! prints the two-message JSON payload without calling any model.
//!
//! ```bash
//! cargo run -p advisor-stock --example briefing -- AAPL MSFT
//! ```

use advisor_stock::{FinancialAdvisor, StockConfig, StocksManager};
use advisor_utils::LogFormat;
use std::env;
use std::sync::Arc;
use std::time::Instant;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    advisor_utils::init_tracing("info", LogFormat::Pretty);

    let mut symbols: Vec<String> = env::args().skip(1).collect();
    if symbols.is_empty() {
        symbols.push("AAPL".to_string());
    }

    let config = StockConfig::builder().with_env().build()?;
    let manager = Arc::new(StocksManager::from_config(&config)?);
    let advisor = FinancialAdvisor::new(Arc::clone(&manager), &config);

    let started = Instant::now();
    let conversation = advisor
        .generate_prompt("How have these stocks been doing lately?", &symbols, false)
        .await?;
    println!("{}", serde_json::to_string_pretty(&conversation)?);
    eprintln!("cold: {:?}", started.elapsed());

    // Second request is served from the cache
    let started = Instant::now();
    advisor
        .generate_prompt("And now?", &symbols, true)
        .await?;
    eprintln!("warm: {:?}", started.elapsed());

    manager.shutdown().await;
    Ok(())
}
