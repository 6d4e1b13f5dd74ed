//! Stock briefing pipeline
//!
//! Turns a client question and a list of stock symbols into a size-bounded
//! two-message conversation for a text-generation model:
//!
//! - `manager`: cached per-symbol bundles ([`StocksManager`])
//! - `ticker`: memoized symbol resolution and per-ticker fetching
//! - `cache`: capacity- and TTL-bounded bundle cache
//! - `budget`: per-stock news/row budgets and briefing text
//! - `prompts`: system instructions and structural template substitution
//! - `advisor`: the [`FinancialAdvisor`] facade tying it together
//! - `api`: Yahoo Finance and article-page collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use advisor_stock::{FinancialAdvisor, StockConfig, StocksManager};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::builder().with_env().build()?;
//!
//!     // One manager per process so the cache outlives requests
//!     let manager = Arc::new(StocksManager::from_config(&config)?);
//!     let advisor = FinancialAdvisor::new(Arc::clone(&manager), &config);
//!
//!     let conversation = advisor
//!         .generate_prompt("Which looks stronger?", &["AAPL", "MSFT"], true)
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&conversation)?);
//!
//!     manager.shutdown().await;
//!     Ok(())
//! }
//! ```

pub mod advisor;
pub mod api;
pub mod budget;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;
pub mod prompts;
pub mod ticker;

pub use advisor::FinancialAdvisor;
pub use budget::{Budget, DescriptionBudgeter};
pub use cache::StockCache;
pub use config::{GenerationConfig, StockConfig};
pub use error::{Result, StockError};
pub use manager::StocksManager;
pub use models::{FinancialRow, StockBundle};
pub use prompts::{Conversation, PromptAssembler};
pub use ticker::{TickerHandle, TickerResolver};
