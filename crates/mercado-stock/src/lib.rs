//! Argentine stock market lookups
//!
//! This crate holds everything the MCP server knows about the market:
//!
//! - A [`MarketDataProvider`] abstraction with a Yahoo Finance implementation
//! - [`QuoteSummarizer`]: one ticker in, one normalized [`QuoteSummary`] out
//! - [`QuoteComparator`]: two summaries juxtaposed by price and daily change
//! - [`lexicon`]: fixed descriptions of instrument types and the investor
//!   greeting
//! - [`tools`] and [`resources`]: the MCP-facing wrappers around the above
//!
//! # Example
//!
//! ```rust,no_run
//! use mercado_stock::{MarketConfig, QuoteSummarizer, YahooFinanceClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> mercado_stock::Result<()> {
//! let client = YahooFinanceClient::new(&MarketConfig::default())?;
//! let summarizer = QuoteSummarizer::new(Arc::new(client));
//!
//! match summarizer.summarize("ypfd.ba").await {
//!     Ok(summary) => println!("{} cerró en {}", summary.ticker, summary.current_price),
//!     Err(record) => println!("error: {}", record.error),
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod compare;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod provider;
pub mod resources;
pub mod summary;
pub mod tools;

pub use api::YahooFinanceClient;
pub use compare::{Comparison, CompositeFault, PriceProjection, QuoteComparator, SummaryOutcome};
pub use config::MarketConfig;
pub use error::{FaultKind, MarketError, Result};
pub use provider::{DailyBar, InstrumentMetadata, MarketDataProvider, MarketSnapshot};
pub use resources::{InstrumentDescriptionResource, InvestorGreetingResource};
pub use summary::{ErrorRecord, QuoteSummarizer, QuoteSummary, Reported};
pub use tools::{StockComparisonTool, StockSummaryTool};
