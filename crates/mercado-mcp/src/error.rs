//! Error types for MCP operations

use crate::protocol::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JsonRpcError, METHOD_NOT_FOUND, PARSE_ERROR,
    RESOURCE_NOT_FOUND,
};
use serde_json::json;
use thiserror::Error;

/// Errors that can occur while serving MCP requests
#[derive(Error, Debug)]
pub enum McpError {
    /// Incoming line was not JSON
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON was not a valid JSON-RPC request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Unknown method
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// Parameters missing or of the wrong shape
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// No resource template matches the URI
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// IO error on the transport
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i64 {
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::ResourceNotFound(_) => RESOURCE_NOT_FOUND,
            McpError::InternalError(_) | McpError::JsonError(_) | McpError::IoError(_) => {
                INTERNAL_ERROR
            },
        }
    }
}

impl From<&McpError> for JsonRpcError {
    fn from(err: &McpError) -> Self {
        let data = match err {
            McpError::ResourceNotFound(uri) => Some(json!({ "uri": uri })),
            _ => None,
        };

        JsonRpcError {
            code: err.code(),
            message: err.to_string(),
            data,
        }
    }
}

impl From<mercado_tools::ToolError> for McpError {
    fn from(err: mercado_tools::ToolError) -> Self {
        McpError::InternalError(err.to_string())
    }
}
