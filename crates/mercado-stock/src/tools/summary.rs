//! Tool wrapping the quote summarizer

use async_trait::async_trait;
use mercado_tools::{Result as ToolResult, Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::summary::QuoteSummarizer;

/// `resumen_accion`: full summary of one listed stock
pub struct StockSummaryTool {
    summarizer: QuoteSummarizer,
}

#[derive(Debug, Deserialize)]
struct StockSummaryParams {
    ticker: String,
}

impl StockSummaryTool {
    /// Create a new stock summary tool
    pub fn new(summarizer: QuoteSummarizer) -> Self {
        Self { summarizer }
    }
}

#[async_trait]
impl Tool for StockSummaryTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: StockSummaryParams = serde_json::from_value(params)?;
        info!(ticker = %params.ticker, "resumen_accion");

        let value = match self.summarizer.summarize(&params.ticker).await {
            Ok(summary) => serde_json::to_value(summary),
            Err(record) => serde_json::to_value(record),
        };
        value.map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "resumen_accion"
    }

    fn description(&self) -> &'static str {
        "Devuelve un resumen completo de una acción cotizada en Yahoo Finance. \
         Ejemplos: YPFD.BA, GGAL.BA"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Ticker de Yahoo Finance (por ejemplo 'YPFD.BA', 'GGAL.BA')"
                }
            },
            "required": ["ticker"]
        })
    }
}
