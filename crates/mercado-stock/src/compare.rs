//! Side-by-side comparison of two tickers

use crate::summary::{ErrorRecord, QuoteSummarizer, QuoteSummary};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Message of a comparison where at least one lookup failed
pub const COMPOSITE_FAULT_MESSAGE: &str = "No se pudieron obtener datos para una o ambas acciones.";

/// Price and daily change of one ticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceProjection {
    #[serde(rename = "precio")]
    pub price: f64,
    #[serde(rename = "variación")]
    pub percent_change: f64,
}

impl From<&QuoteSummary> for PriceProjection {
    fn from(summary: &QuoteSummary) -> Self {
        Self {
            price: summary.current_price,
            percent_change: summary.percent_change,
        }
    }
}

/// Successful comparison, keyed by uppercased ticker
///
/// Two spellings of the same ticker collapse into a single entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    #[serde(rename = "comparación")]
    pub quotes: BTreeMap<String, PriceProjection>,
}

impl Comparison {
    /// Projection for `ticker`, matched case-insensitively
    pub fn get(&self, ticker: &str) -> Option<&PriceProjection> {
        self.quotes.get(&ticker.to_uppercase())
    }
}

/// Outcome of one lookup inside a failed comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryOutcome {
    Summary(QuoteSummary),
    Error(ErrorRecord),
}

impl SummaryOutcome {
    /// Whether this lookup failed
    pub fn is_error(&self) -> bool {
        matches!(self, SummaryOutcome::Error(_))
    }
}

impl From<Result<QuoteSummary, ErrorRecord>> for SummaryOutcome {
    fn from(result: Result<QuoteSummary, ErrorRecord>) -> Self {
        match result {
            Ok(summary) => SummaryOutcome::Summary(summary),
            Err(record) => SummaryOutcome::Error(record),
        }
    }
}

/// Both lookups of a failed comparison, verbatim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeDetail {
    pub ticker1: SummaryOutcome,
    pub ticker2: SummaryOutcome,
}

/// A comparison where one or both lookups failed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositeFault {
    pub error: String,
    #[serde(rename = "detalle")]
    pub detail: CompositeDetail,
}

/// Juxtaposes two quote summaries
#[derive(Clone)]
pub struct QuoteComparator {
    summarizer: QuoteSummarizer,
}

impl QuoteComparator {
    /// Create a comparator on top of `summarizer`
    pub fn new(summarizer: QuoteSummarizer) -> Self {
        Self { summarizer }
    }

    /// Compare `ticker1` and `ticker2` by price and daily change
    ///
    /// Lookups run one after the other, `ticker1` first.
    pub async fn compare(&self, ticker1: &str, ticker2: &str) -> Result<Comparison, CompositeFault> {
        info!(ticker1, ticker2, "Comparing tickers");

        let first = self.summarizer.summarize(ticker1).await;
        let second = self.summarizer.summarize(ticker2).await;

        match (first, second) {
            (Ok(a), Ok(b)) => {
                let mut quotes = BTreeMap::new();
                quotes.insert(a.ticker.clone(), PriceProjection::from(&a));
                quotes.insert(b.ticker.clone(), PriceProjection::from(&b));
                Ok(Comparison { quotes })
            },
            (first, second) => Err(CompositeFault {
                error: COMPOSITE_FAULT_MESSAGE.to_string(),
                detail: CompositeDetail {
                    ticker1: first.into(),
                    ticker2: second.into(),
                },
            }),
        }
    }
}
