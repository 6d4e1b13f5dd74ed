//! Question → conversation → advice

use crate::budget::DescriptionBudgeter;
use crate::config::{GenerationConfig, StockConfig};
use crate::error::{Result, StockError};
use crate::manager::StocksManager;
use crate::prompts::{Conversation, PromptAssembler};
use advisor_llm::{CompletionRequest, LLMProvider};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Turns a client question and a set of symbols into a bounded conversation
///
/// Holds a shared [`StocksManager`], so advisors built from the same manager
/// share its caches.
pub struct FinancialAdvisor {
    manager: Arc<StocksManager>,
    budgeter: DescriptionBudgeter,
    assembler: PromptAssembler,
    generation: GenerationConfig,
}

impl FinancialAdvisor {
    pub fn new(manager: Arc<StocksManager>, config: &StockConfig) -> Self {
        Self {
            manager,
            budgeter: DescriptionBudgeter::from_config(config),
            assembler: PromptAssembler::new(),
            generation: config.generation.clone(),
        }
    }

    /// Replace the default prompt assembler
    pub fn with_assembler(mut self, assembler: PromptAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    pub fn manager(&self) -> &Arc<StocksManager> {
        &self.manager
    }

    /// Build the conversation for `question` about `symbols`
    ///
    /// Symbols are fetched one after another in the given order and the
    /// first failure aborts the whole request.
    #[instrument(skip(self, question, symbols), fields(stocks = symbols.len()))]
    pub async fn generate_prompt<S: AsRef<str>>(
        &self,
        question: &str,
        symbols: &[S],
        complex: bool,
    ) -> Result<Conversation> {
        if question.trim().is_empty() {
            return Err(StockError::InvalidInput(
                "a financial question is required".to_string(),
            ));
        }
        let budget = self.budgeter.budget(symbols.len())?;
        debug!(
            news = budget.news_per_stock,
            rows = budget.financial_rows_per_stock,
            "Per-stock budget"
        );

        let mut stocks = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let symbol = symbol.as_ref();
            stocks.push((symbol, self.manager.get_info(symbol).await?));
        }
        let stocks_text = self.budgeter.describe(&stocks)?;

        Ok(self.assembler.assemble(question, &stocks_text, complex))
    }

    /// Generate advice with `provider` using the configured generation settings
    pub async fn advise<S: AsRef<str>>(
        &self,
        provider: &dyn LLMProvider,
        question: &str,
        symbols: &[S],
        complex: bool,
    ) -> Result<String> {
        let conversation = self.generate_prompt(question, symbols, complex).await?;

        let request =
            CompletionRequest::new(&self.generation.model, conversation.into_messages())
                .with_max_tokens(self.generation.max_tokens)
                .with_stop_sequences(self.generation.stop_sequences.iter().cloned());

        let response = provider.complete(request).await?;
        info!(
            provider = provider.name(),
            tokens = response.usage.total(),
            "Advice generated"
        );
        Ok(response.message.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MockMarketDataProvider, MockPageFetcher, TickerListing};
    use crate::models::{FinancialRow, NewsReference};
    use crate::prompts::{DESCRIPTION_TOKEN, QUERY_TOKEN, SIMPLE_SYSTEM_PROMPT};
    use advisor_llm::{CompletionResponse, LLMError, Message, Role, StopReason, TokenUsage};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    mockall::mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> advisor_llm::Result<CompletionResponse>;
            fn name(&self) -> &str;
        }
    }

    fn rows(count: u32) -> Vec<FinancialRow> {
        (1..=count)
            .map(|day| FinancialRow {
                date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
                open: 10.0,
                high: 11.0,
                low: 9.0,
                close: 10.5,
                volume: 1_000,
            })
            .collect()
    }

    fn market() -> MockMarketDataProvider {
        let mut provider = MockMarketDataProvider::new();
        provider
            .expect_lookup()
            .returning(|s| Ok(TickerListing::listed(s)));
        provider.expect_news().returning(|listing| {
            Ok((0..3)
                .map(|i| NewsReference {
                    title: format!("{} headline {i}", listing.symbol),
                    link: format!("https://news.example/{}/{i}", listing.symbol),
                })
                .collect())
        });
        provider.expect_history().returning(|_| Ok(rows(25)));
        provider
    }

    fn pages() -> MockPageFetcher {
        let mut pages = MockPageFetcher::new();
        pages
            .expect_fetch_text()
            .returning(|_| Ok("Body text.".to_string()));
        pages
    }

    fn advisor(market: MockMarketDataProvider, pages: MockPageFetcher) -> FinancialAdvisor {
        let config = StockConfig::default();
        let manager = StocksManager::new(&config, Arc::new(market), Arc::new(pages));
        FinancialAdvisor::new(Arc::new(manager), &config)
    }

    #[tokio::test]
    async fn test_generate_prompt_single_stock() {
        let advisor = advisor(market(), pages());

        let conversation = advisor
            .generate_prompt("What about AAPL?", &["AAPL"], false)
            .await
            .unwrap();

        assert_eq!(conversation.system.text(), SIMPLE_SYSTEM_PROMPT);
        let user = conversation.user.text();
        assert!(user.contains("What about AAPL?\n"));
        assert!(user.contains("AAPL\nFinancials:\n"));
        assert!(user.contains("[2] - AAPL headline 2\n\"Body text.\""));
        assert!(!user.contains(QUERY_TOKEN));
        assert!(!user.contains(DESCRIPTION_TOKEN));
        // 20 rows for a lone stock, out of 25 available
        assert!(user.contains("2024-03-20"));
        assert!(!user.contains("2024-03-21"));
    }

    #[tokio::test]
    async fn test_symbols_need_not_be_debug() {
        struct Ticker(&'static str);

        impl AsRef<str> for Ticker {
            fn as_ref(&self) -> &str {
                self.0
            }
        }

        let advisor = advisor(market(), pages());
        let conversation = advisor
            .generate_prompt("Anything new?", &[Ticker("MSFT")], false)
            .await
            .unwrap();
        assert!(conversation.user.text().contains("MSFT\nFinancials:\n"));
    }

    #[tokio::test]
    async fn test_blocks_follow_request_order_and_budget() {
        let advisor = advisor(market(), pages());

        let conversation = advisor
            .generate_prompt("Compare", &["TSLA", "AAPL", "MSFT", "NVDA"], true)
            .await
            .unwrap();
        let user = conversation.user.text();

        let positions: Vec<_> = ["TSLA", "AAPL", "MSFT", "NVDA"]
            .iter()
            .map(|symbol| user.find(&format!("{symbol}\nFinancials")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        // 10 / 4 = 2 news and 20 / 4 = 5 rows per stock
        assert_eq!(user.matches("[1] - ").count(), 4);
        assert_eq!(user.matches("[2] - ").count(), 0);
        assert_eq!(user.matches("2024-03-05").count(), 4);
        assert_eq!(user.matches("2024-03-06").count(), 0);
    }

    #[tokio::test]
    async fn test_zero_symbols_rejected_before_fetch() {
        // no expectations: any provider call would panic
        let advisor = advisor(MockMarketDataProvider::new(), MockPageFetcher::new());

        let result = advisor.generate_prompt("Anything?", &[] as &[&str], false).await;
        assert!(matches!(result, Err(StockError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let advisor = advisor(MockMarketDataProvider::new(), MockPageFetcher::new());

        let result = advisor.generate_prompt("   ", &["AAPL"], false).await;
        assert!(matches!(result, Err(StockError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_one_failing_symbol_aborts_request() {
        let mut market = MockMarketDataProvider::new();
        market.expect_lookup().returning(|s| {
            if s == "BAD" {
                Err(StockError::YahooFinanceError("HTTP 500".to_string()))
            } else {
                Ok(TickerListing::listed(s))
            }
        });
        market.expect_news().returning(|_| Ok(Vec::new()));
        market.expect_history().returning(|_| Ok(rows(3)));

        let advisor = advisor(market, MockPageFetcher::new());
        let result = advisor.generate_prompt("q", &["AAPL", "BAD", "MSFT"], false).await;

        match result {
            Err(StockError::FetchFailed { symbol, .. }) => assert_eq!(symbol, "BAD"),
            other => panic!("Expected FetchFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_advise_sends_conversation_with_generation_settings() {
        let advisor = advisor(market(), pages());

        let mut provider = MockProvider::new();
        provider.expect_name().return_const("mock".to_string());
        provider
            .expect_complete()
            .withf(|request| {
                request.max_tokens == 32
                    && request.stop_sequences.as_deref()
                        == Some(&["\n".to_string(), "?".to_string()][..])
                    && request.messages.len() == 2
                    && request.messages[0].role == Role::System
                    && request.messages[1].role == Role::User
            })
            .times(1)
            .returning(|_| {
                Ok(CompletionResponse {
                    message: Message::assistant("AAPL looks likely to rise."),
                    stop_reason: StopReason::StopSequence,
                    usage: TokenUsage::default(),
                })
            });

        let advice = advisor
            .advise(&provider, "Should I buy AAPL?", &["AAPL"], false)
            .await
            .unwrap();
        assert_eq!(advice, "AAPL looks likely to rise.");
    }

    #[tokio::test]
    async fn test_advise_surfaces_provider_errors() {
        let advisor = advisor(market(), pages());

        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .returning(|_| Err(LLMError::from_status(429, "slow down".to_string())));

        let result = advisor.advise(&provider, "q", &["AAPL"], false).await;
        assert!(matches!(result, Err(StockError::GenerationError(_))));
    }
}
