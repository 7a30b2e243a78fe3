//! Tool and resource framework for mercado
//!
//! This crate defines what an MCP server can expose: callable [`Tool`]s and
//! addressable [`ResourceTemplate`]s, plus the registries the server looks
//! them up in.

pub mod error;
pub mod registry;
pub mod resource;
pub mod tool;

pub use error::{Result, ToolError};
pub use registry::ToolRegistry;
pub use resource::{ResourceRegistry, ResourceTemplate, UriParams, UriTemplate};
pub use tool::Tool;
