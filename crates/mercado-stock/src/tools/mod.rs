//! MCP tools for stock lookups

pub mod compare;
pub mod summary;

pub use compare::StockComparisonTool;
pub use summary::StockSummaryTool;
