//! Resource templates
//!
//! A resource template is addressed by a URI pattern such as
//! `instrumento://{nombre}`. Each `{var}` placeholder matches one or more
//! characters other than `/`, and the captured text is handed to the template
//! verbatim.

use crate::{Result, ToolError};
use async_trait::async_trait;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Default MIME type of resource contents
pub const TEXT_PLAIN: &str = "text/plain";

/// Variables captured from a URI
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UriParams(BTreeMap<String, String>);

impl UriParams {
    /// Get a captured variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Get a captured variable or fail with [`ToolError::MissingParameter`]
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| ToolError::MissingParameter(name.to_string()))
    }

    /// Number of captured variables
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing was captured
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for UriParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Compiled URI template
#[derive(Debug, Clone)]
pub struct UriTemplate {
    template: String,
    pattern: Regex,
    variables: Vec<String>,
}

impl UriTemplate {
    /// Compile a template like `saludo://{nombre}`
    pub fn parse(template: &str) -> Result<Self> {
        let invalid = |reason: &str| ToolError::InvalidTemplate {
            template: template.to_string(),
            reason: reason.to_string(),
        };

        let mut pattern = String::from("^");
        let mut variables = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            pattern.push_str(&regex::escape(&rest[..open]));
            let after = &rest[open + 1..];
            let close = after.find('}').ok_or_else(|| invalid("unclosed '{'"))?;
            let name = &after[..close];

            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(invalid("variable names must be non-empty [A-Za-z0-9_]"));
            }
            if variables.iter().any(|v| v == name) {
                return Err(invalid("duplicate variable"));
            }

            pattern.push_str(&format!("(?P<{name}>[^/]+)"));
            variables.push(name.to_string());
            rest = &after[close + 1..];
        }
        if rest.contains('}') {
            return Err(invalid("unmatched '}'"));
        }
        pattern.push_str(&regex::escape(rest));
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            template: template.to_string(),
            pattern,
            variables,
        })
    }

    /// The template as written
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Variable names in order of appearance
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Match a concrete URI, returning the captured variables
    pub fn matches(&self, uri: &str) -> Option<UriParams> {
        let captures = self.pattern.captures(uri)?;
        Some(
            self.variables
                .iter()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// Trait for resources addressed through a URI template
#[async_trait]
pub trait ResourceTemplate: Send + Sync {
    /// URI template, e.g. `instrumento://{nombre}`
    fn uri_template(&self) -> &str;

    /// Short identifier shown to clients
    fn name(&self) -> &str;

    /// Human readable description
    fn description(&self) -> &str;

    /// MIME type of the produced text
    fn mime_type(&self) -> &str {
        TEXT_PLAIN
    }

    /// Produce the resource text for the captured variables
    async fn read(&self, params: &UriParams) -> Result<String>;
}

struct Entry {
    template: UriTemplate,
    resource: Arc<dyn ResourceTemplate>,
}

/// Registry of resource templates, matched in registration order
#[derive(Default)]
pub struct ResourceRegistry {
    entries: RwLock<Vec<Entry>>,
}

impl ResourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource template
    ///
    /// Fails if the template string does not compile.
    pub fn register(&self, resource: Arc<dyn ResourceTemplate>) -> Result<()> {
        let template = UriTemplate::parse(resource.uri_template())?;
        tracing::debug!("Registering resource template: {}", template.as_str());

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.push(Entry { template, resource });
        Ok(())
    }

    /// Find the template matching `uri`
    pub fn resolve(&self, uri: &str) -> Option<(Arc<dyn ResourceTemplate>, UriParams)> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().find_map(|entry| {
            entry
                .template
                .matches(uri)
                .map(|params| (Arc::clone(&entry.resource), params))
        })
    }

    /// List all registered templates
    pub fn list(&self) -> Vec<Arc<dyn ResourceTemplate>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.iter().map(|e| Arc::clone(&e.resource)).collect()
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no template is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
