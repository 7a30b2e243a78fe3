//! Shared utilities for the mercado workspace
//!
//! Logging setup and the configuration that drives it. The MCP server speaks
//! its protocol on stdout, so everything here writes to stderr.

pub mod config;
pub mod logging;

pub use config::{ConfigError, LogFormat, LoggingConfig};
pub use logging::init_tracing;
