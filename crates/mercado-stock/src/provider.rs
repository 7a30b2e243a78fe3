//! Market data provider abstraction

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptive metadata of an instrument; every field is optional upstream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentMetadata {
    pub long_name: Option<String>,
    pub volume: Option<u64>,
    pub currency: Option<String>,
    pub exchange: Option<String>,
}

/// One trading session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Session date in the exchange's local time
    pub date: NaiveDate,
    pub open: f64,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Metadata plus the most recent one-day history, oldest bar first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub metadata: InstrumentMetadata,
    pub history: Vec<DailyBar>,
}

impl MarketSnapshot {
    /// The latest session, if any
    pub fn latest(&self) -> Option<&DailyBar> {
        self.history.last()
    }
}

/// Source of point-in-time market data
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetch metadata and the latest one-day history for `symbol`
    ///
    /// An empty `history` is a valid answer; interpreting it is up to the
    /// caller.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot>;
}
