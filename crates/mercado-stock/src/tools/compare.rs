//! Tool wrapping the quote comparator

use async_trait::async_trait;
use mercado_tools::{Result as ToolResult, Tool, ToolError};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::compare::QuoteComparator;

/// `comparar_acciones`: price and daily change of two stocks side by side
pub struct StockComparisonTool {
    comparator: QuoteComparator,
}

#[derive(Debug, Deserialize)]
struct StockComparisonParams {
    ticker1: String,
    ticker2: String,
}

impl StockComparisonTool {
    /// Create a new stock comparison tool
    pub fn new(comparator: QuoteComparator) -> Self {
        Self { comparator }
    }
}

#[async_trait]
impl Tool for StockComparisonTool {
    async fn execute(&self, params: Value) -> ToolResult<Value> {
        let params: StockComparisonParams = serde_json::from_value(params)?;
        info!(ticker1 = %params.ticker1, ticker2 = %params.ticker2, "comparar_acciones");

        let value = match self.comparator.compare(&params.ticker1, &params.ticker2).await {
            Ok(comparison) => serde_json::to_value(comparison),
            Err(fault) => serde_json::to_value(fault),
        };
        value.map_err(|e| ToolError::ExecutionFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "comparar_acciones"
    }

    fn description(&self) -> &'static str {
        "Compara dos acciones en base a su precio y variación porcentual diaria."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker1": {
                    "type": "string",
                    "description": "Primer ticker (por ejemplo 'YPFD.BA')"
                },
                "ticker2": {
                    "type": "string",
                    "description": "Segundo ticker (por ejemplo 'GGAL.BA')"
                }
            },
            "required": ["ticker1", "ticker2"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::COMPOSITE_FAULT_MESSAGE;
    use crate::error::MarketError;
    use crate::provider::{DailyBar, InstrumentMetadata, MarketSnapshot, MockMarketDataProvider};
    use crate::summary::QuoteSummarizer;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn tool() -> StockComparisonTool {
        let mut provider = MockMarketDataProvider::new();
        provider.expect_fetch_snapshot().returning(|symbol| match symbol {
            "YPFD.BA" => Ok(MarketSnapshot {
                metadata: InstrumentMetadata::default(),
                history: vec![DailyBar {
                    date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
                    open: 100.0,
                    high: None,
                    low: None,
                    close: 105.0,
                    volume: None,
                }],
            }),
            _ => Err(MarketError::Upstream {
                code: "Network".to_string(),
                description: "connection reset".to_string(),
            }),
        });
        StockComparisonTool::new(QuoteComparator::new(QuoteSummarizer::new(Arc::new(provider))))
    }

    #[test]
    fn test_tool_metadata() {
        let tool = tool();
        assert_eq!(tool.name(), "comparar_acciones");

        let schema = tool.input_schema();
        assert_eq!(schema["required"], json!(["ticker1", "ticker2"]));
    }

    #[tokio::test]
    async fn test_execute_with_network_fault() {
        let value = tool()
            .execute(json!({ "ticker1": "YPFD.BA", "ticker2": "GGAL.BA" }))
            .await
            .unwrap();

        assert_eq!(value["error"], COMPOSITE_FAULT_MESSAGE);
        assert_eq!(value["detalle"]["ticker1"]["precio_actual"], 105.0);
        assert_eq!(value["detalle"]["ticker1"]["variacion_pct"], 5.0);
        assert_eq!(
            value["detalle"]["ticker2"],
            json!({ "error": "Network: connection reset" })
        );
    }

    #[tokio::test]
    async fn test_execute_missing_second_ticker() {
        let result = tool().execute(json!({ "ticker1": "YPFD.BA" })).await;
        assert!(matches!(result, Err(ToolError::InvalidParameters(_))));
    }
}
