//! Error types for market data operations

use thiserror::Error;

/// Message reported when the provider has no trading history for a ticker
pub const NO_HISTORY_MESSAGE: &str =
    "No se encontró información histórica para el ticker proporcionado.";

/// Market data errors
#[derive(Debug, Error)]
pub enum MarketError {
    /// The provider returned an empty trading history
    #[error("{}", NO_HISTORY_MESSAGE)]
    NoHistory { symbol: String },

    /// Invalid ticker symbol provided
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Network or HTTP client error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Non-success HTTP status without an error payload
    #[error("HTTP {status} from market data provider for {symbol}")]
    HttpStatus { symbol: String, status: u16 },

    /// Error payload reported by the provider
    #[error("{code}: {description}")]
    Upstream { code: String, description: String },

    /// The latest bar cannot produce a summary
    #[error("Invalid quote for {symbol}: {reason}")]
    InvalidQuote { symbol: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification of a failed lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// No trading data for the ticker
    NoHistory,
    /// Anything else that went wrong talking to the provider
    Provider,
}

impl MarketError {
    /// Classify this error
    pub fn kind(&self) -> FaultKind {
        match self {
            MarketError::NoHistory { .. } => FaultKind::NoHistory,
            _ => FaultKind::Provider,
        }
    }
}

/// Result type alias for market operations
pub type Result<T> = std::result::Result<T, MarketError>;

impl From<MarketError> for mercado_tools::ToolError {
    fn from(err: MarketError) -> Self {
        mercado_tools::ToolError::ExecutionFailed(err.to_string())
    }
}
