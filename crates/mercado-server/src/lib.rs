//! Wiring for the Argentine stock market MCP server

use mercado_mcp::McpServer;
use mercado_stock::{
    InstrumentDescriptionResource, InvestorGreetingResource, MarketDataProvider, QuoteComparator,
    QuoteSummarizer, StockComparisonTool, StockSummaryTool,
};
use mercado_tools::{ResourceRegistry, ToolRegistry};
use std::sync::Arc;

/// Name announced to MCP clients
pub const SERVER_NAME: &str = "Mercado Bursatil Argentino Real";

const INSTRUCTIONS: &str = "Herramientas: resumen_accion(ticker), comparar_acciones(ticker1, ticker2). \
    Recursos: instrumento://{nombre}, saludo://{nombre}. \
    Los tickers siguen la convención de Yahoo Finance, por ejemplo YPFD.BA o GGAL.BA.";

/// Build the server with every tool and resource registered
pub fn build_server(provider: Arc<dyn MarketDataProvider>) -> mercado_tools::Result<McpServer> {
    let summarizer = QuoteSummarizer::new(provider);
    let comparator = QuoteComparator::new(summarizer.clone());

    let tools = Arc::new(ToolRegistry::new());
    tools.register(Arc::new(StockSummaryTool::new(summarizer)));
    tools.register(Arc::new(StockComparisonTool::new(comparator)));

    let resources = Arc::new(ResourceRegistry::new());
    resources.register(Arc::new(InstrumentDescriptionResource))?;
    resources.register(Arc::new(InvestorGreetingResource))?;

    Ok(McpServer::builder(SERVER_NAME, env!("CARGO_PKG_VERSION"))
        .instructions(INSTRUCTIONS)
        .tools(tools)
        .resources(resources)
        .build())
}
