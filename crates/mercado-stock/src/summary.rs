//! Single-ticker quote summaries

use crate::error::{FaultKind, MarketError, Result};
use crate::provider::{MarketDataProvider, MarketSnapshot};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::{debug, warn};

/// Placeholder for a missing company name
pub const NAME_UNAVAILABLE: &str = "Nombre no disponible";

/// Placeholder for any other missing metadata field
pub const UNAVAILABLE: &str = "No disponible";

/// A metadata field the provider may or may not report
///
/// Serializes as the value itself, or as [`UNAVAILABLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reported<T> {
    Known(T),
    Unavailable,
}

impl<T> Reported<T> {
    /// The reported value, if any
    pub fn known(&self) -> Option<&T> {
        match self {
            Reported::Known(v) => Some(v),
            Reported::Unavailable => None,
        }
    }
}

impl<T> From<Option<T>> for Reported<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Reported::Unavailable, Reported::Known)
    }
}

impl<T: Serialize> Serialize for Reported<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Reported::Known(v) => v.serialize(serializer),
            Reported::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

/// Normalized summary of one ticker's latest session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSummary {
    #[serde(rename = "empresa")]
    pub company_name: String,
    /// Uppercased ticker
    pub ticker: String,
    /// Latest close, two decimals
    #[serde(rename = "precio_actual")]
    pub current_price: f64,
    /// Intraday change from open to close in percent, two decimals
    #[serde(rename = "variacion_pct")]
    pub percent_change: f64,
    #[serde(rename = "volumen")]
    pub volume: Reported<u64>,
    #[serde(rename = "moneda")]
    pub currency: Reported<String>,
    #[serde(rename = "mercado")]
    pub exchange: Reported<String>,
    #[serde(rename = "ultimo_cierre")]
    pub last_close_date: NaiveDate,
}

/// A lookup that failed, as reported to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub error: String,
    #[serde(skip)]
    pub kind: FaultKind,
}

impl From<MarketError> for ErrorRecord {
    fn from(err: MarketError) -> Self {
        Self {
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Percent change from `open` to `close`
pub fn percent_change(open: f64, close: f64) -> f64 {
    (close - open) / open * 100.0
}

/// Produces [`QuoteSummary`] records from a [`MarketDataProvider`]
#[derive(Clone)]
pub struct QuoteSummarizer {
    provider: Arc<dyn MarketDataProvider>,
}

impl QuoteSummarizer {
    /// Create a summarizer over `provider`
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self { provider }
    }

    /// Summarize `ticker`
    ///
    /// Never fails past this point: every provider fault becomes an
    /// [`ErrorRecord`] carrying the fault's message.
    pub async fn summarize(&self, ticker: &str) -> std::result::Result<QuoteSummary, ErrorRecord> {
        self.try_summarize(ticker).await.map_err(|e| {
            warn!(ticker, kind = ?e.kind(), "Quote summary failed: {}", e);
            ErrorRecord::from(e)
        })
    }

    async fn try_summarize(&self, ticker: &str) -> Result<QuoteSummary> {
        let symbol = ticker.to_uppercase();
        debug!(symbol = %symbol, "Fetching market snapshot");

        let snapshot = self.provider.fetch_snapshot(&symbol).await?;
        build_summary(symbol, snapshot)
    }
}

/// Reshape a snapshot into a summary
pub fn build_summary(symbol: String, snapshot: MarketSnapshot) -> Result<QuoteSummary> {
    let latest = snapshot.latest().ok_or_else(|| MarketError::NoHistory {
        symbol: symbol.clone(),
    })?;

    if !latest.close.is_finite() {
        return Err(MarketError::InvalidQuote {
            symbol,
            reason: format!("close price {} is not a number", latest.close),
        });
    }
    if !latest.open.is_finite() || latest.open == 0.0 {
        return Err(MarketError::InvalidQuote {
            symbol,
            reason: format!("cannot compute change from opening price {}", latest.open),
        });
    }

    let current_price = round2(latest.close);
    let change = round2(percent_change(latest.open, latest.close));
    let last_close_date = latest.date;
    let metadata = snapshot.metadata;

    Ok(QuoteSummary {
        company_name: metadata
            .long_name
            .unwrap_or_else(|| NAME_UNAVAILABLE.to_string()),
        ticker: symbol,
        current_price,
        percent_change: change,
        volume: metadata.volume.into(),
        currency: metadata.currency.into(),
        exchange: metadata.exchange.into(),
        last_close_date,
    })
}
