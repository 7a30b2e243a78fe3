//! Yahoo Finance chart API client

use crate::config::MarketConfig;
use crate::error::{MarketError, Result};
use crate::provider::{DailyBar, InstrumentMetadata, MarketDataProvider, MarketSnapshot};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

const CHART_PATH: [&str; 3] = ["v8", "finance", "chart"];

/// Yahoo Finance API client
///
/// One `GET /v8/finance/chart/{symbol}?range=1d&interval=1d` answers both
/// halves of a snapshot: `meta` carries the descriptive fields and the
/// indicator arrays carry the session's OHLC bar.
#[derive(Debug, Clone)]
pub struct YahooFinanceClient {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    exchange_name: Option<String>,
    long_name: Option<String>,
    regular_market_volume: Option<u64>,
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteSeries>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteSeries {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new(config: &MarketConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| MarketError::ConfigError(format!("invalid base_url: {e}")))?;

        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build the chart URL for a symbol, percent-encoding it as a path segment
    fn chart_url(&self, symbol: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| MarketError::ConfigError("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(CHART_PATH)
            .push(symbol);
        url.query_pairs_mut()
            .append_pair("range", "1d")
            .append_pair("interval", "1d");
        Ok(url)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceClient {
    async fn fetch_snapshot(&self, symbol: &str) -> Result<MarketSnapshot> {
        if symbol.trim().is_empty() {
            return Err(MarketError::InvalidSymbol(symbol.to_string()));
        }

        let url = self.chart_url(symbol)?;
        debug!(symbol, %url, "Requesting Yahoo chart");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let snapshot = parse_chart(symbol, status, &body);
        if let Err(e) = &snapshot {
            warn!(symbol, status = status.as_u16(), "Yahoo chart request failed: {}", e);
        }
        snapshot
    }
}

/// Chart error code Yahoo uses for unknown and delisted symbols
const NOT_FOUND_CODE: &str = "Not Found";

/// Turn a chart response into a snapshot
///
/// An error payload wins over the HTTP status because Yahoo sends a 404 with
/// a descriptive body for unknown symbols. Unknown or delisted symbols have
/// no history, so they report `NoHistory` rather than a provider fault.
pub(crate) fn parse_chart(symbol: &str, status: StatusCode, body: &str) -> Result<MarketSnapshot> {
    let no_history = || MarketError::NoHistory {
        symbol: symbol.to_string(),
    };

    let envelope: ChartEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if status == StatusCode::NOT_FOUND => return Err(no_history()),
        Err(_) if !status.is_success() => {
            return Err(MarketError::HttpStatus {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            });
        },
        Err(e) => return Err(e.into()),
    };

    if let Some(error) = envelope.chart.error {
        if error.code == NOT_FOUND_CODE {
            debug!(symbol, description = %error.description, "Symbol not found upstream");
            return Err(no_history());
        }
        return Err(MarketError::Upstream {
            code: error.code,
            description: error.description,
        });
    }

    if status == StatusCode::NOT_FOUND {
        return Err(no_history());
    }

    if !status.is_success() {
        return Err(MarketError::HttpStatus {
            symbol: symbol.to_string(),
            status: status.as_u16(),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(no_history)?;

    Ok(result.into_snapshot())
}

impl ChartResult {
    fn into_snapshot(self) -> MarketSnapshot {
        let ChartResult {
            meta,
            timestamp,
            indicators,
        } = self;

        let series = indicators.quote.into_iter().next().unwrap_or_default();

        // Rows with a missing open or close are gaps, not sessions
        let history = timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, &ts)| {
                Some(DailyBar {
                    date: session_date(ts, meta.gmtoffset)?,
                    open: at(&series.open, i)?,
                    high: at(&series.high, i),
                    low: at(&series.low, i),
                    close: at(&series.close, i)?,
                    volume: at(&series.volume, i),
                })
            })
            .collect();

        MarketSnapshot {
            metadata: InstrumentMetadata {
                long_name: meta.long_name,
                volume: meta.regular_market_volume,
                currency: meta.currency,
                exchange: meta.exchange_name,
            },
            history,
        }
    }
}

/// Value at `i` of a nullable indicator column
fn at<T: Copy>(values: &[Option<T>], i: usize) -> Option<T> {
    values.get(i).copied().flatten()
}

/// Calendar date of a unix timestamp at the exchange's UTC offset
fn session_date(timestamp: i64, gmtoffset: i32) -> Option<NaiveDate> {
    let offset = FixedOffset::east_opt(gmtoffset).or_else(|| FixedOffset::east_opt(0))?;
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.with_timezone(&offset).date_naive())
}
