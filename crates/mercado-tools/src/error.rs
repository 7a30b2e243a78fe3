//! Error types for tools and resources

use thiserror::Error;

/// Result type alias for tool and resource operations
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type for tool and resource operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// Arguments did not match the tool's input schema
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Tool or resource failed while running
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// URI template could not be compiled
    #[error("Invalid URI template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// Template variable missing from a resolved URI
    #[error("Missing URI parameter: {0}")]
    MissingParameter(String),
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        ToolError::InvalidParameters(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ToolError::MissingParameter("nombre".to_string());
        assert_eq!(err.to_string(), "Missing URI parameter: nombre");

        let err = ToolError::InvalidTemplate {
            template: "x://{".to_string(),
            reason: "unclosed".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid URI template 'x://{': unclosed");
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: ToolError = serde_err.into();
        assert!(matches!(err, ToolError::InvalidParameters(_)));
    }
}
