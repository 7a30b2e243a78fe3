//! Model Context Protocol (MCP) server
//!
//! A small MCP server that speaks newline-delimited JSON-RPC 2.0 over
//! stdio. It exposes whatever is registered in a
//! [`ToolRegistry`](mercado_tools::ToolRegistry) and a
//! [`ResourceRegistry`](mercado_tools::ResourceRegistry):
//!
//! - `initialize`, `ping`
//! - `tools/list`, `tools/call`
//! - `resources/list`, `resources/templates/list`, `resources/read`
//!
//! # Example
//!
//! ```no_run
//! use mercado_mcp::McpServer;
//! use mercado_tools::{ResourceRegistry, ToolRegistry};
//! use std::sync::Arc;
//!
//! # async fn example() -> mercado_mcp::Result<()> {
//! let server = McpServer::builder("demo", "0.1.0")
//!     .tools(Arc::new(ToolRegistry::new()))
//!     .resources(Arc::new(ResourceRegistry::new()))
//!     .build();
//!
//! mercado_mcp::transport::serve_stdio(&server).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod protocol;
pub mod schema;
pub mod server;
pub mod transport;

pub use error::McpError;
pub use server::{McpServer, McpServerBuilder};

/// Result type for MCP operations
pub type Result<T> = std::result::Result<T, McpError>;
