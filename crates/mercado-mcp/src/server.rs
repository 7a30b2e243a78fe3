//! Request dispatch

use crate::protocol::{JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse, negotiate_version};
use crate::schema::{
    CallToolParams, CallToolResult, Content, Implementation, InitializeParams, InitializeResult,
    ReadResourceParams, ReadResourceResult, ResourceTemplateDefinition, ResourcesCapability,
    ServerCapabilities, TextResourceContents, ToolDefinition, ToolsCapability,
};
use crate::{McpError, Result};
use mercado_tools::{ResourceRegistry, ToolRegistry};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP server over a tool registry and a resource registry
///
/// Holds no per-session state: every request is answered from the registries
/// alone, so one instance can serve any number of sessions in turn.
pub struct McpServer {
    info: Implementation,
    instructions: Option<String>,
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
}

/// Builder for [`McpServer`]
pub struct McpServerBuilder {
    info: Implementation,
    instructions: Option<String>,
    tools: Arc<ToolRegistry>,
    resources: Arc<ResourceRegistry>,
}

impl McpServerBuilder {
    /// Registry of callable tools
    pub fn tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    /// Registry of resource templates
    pub fn resources(mut self, resources: Arc<ResourceRegistry>) -> Self {
        self.resources = resources;
        self
    }

    /// Usage hint returned from `initialize`
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Build the server
    pub fn build(self) -> McpServer {
        McpServer {
            info: self.info,
            instructions: self.instructions,
            tools: self.tools,
            resources: self.resources,
        }
    }
}

impl McpServer {
    /// Start building a server that announces itself as `name`/`version`
    pub fn builder(name: impl Into<String>, version: impl Into<String>) -> McpServerBuilder {
        McpServerBuilder {
            info: Implementation {
                name: name.into(),
                version: version.into(),
            },
            instructions: None,
            tools: Arc::new(ToolRegistry::new()),
            resources: Arc::new(ResourceRegistry::new()),
        }
    }

    /// Server name and version
    pub fn info(&self) -> &Implementation {
        &self.info
    }

    /// Handle one raw line read from the transport
    ///
    /// Bytes that are not UTF-8 cannot be JSON, so they get a parse error
    /// like any other malformed line.
    pub async fn handle_bytes(&self, line: &[u8]) -> Option<String> {
        match std::str::from_utf8(line) {
            Ok(line) => self.handle_message(line).await,
            Err(e) => {
                let reply = error_response(Value::Null, &McpError::ParseError(e.to_string()));
                Some(reply.to_string())
            },
        }
    }

    /// Handle one line read from the transport
    ///
    /// Returns the serialized reply, or `None` when nothing must be sent
    /// (notifications, client responses, batches made only of those).
    pub async fn handle_message(&self, line: &str) -> Option<String> {
        let reply = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(error_response(Value::Null, &McpError::ParseError(e.to_string()))),
            Ok(Value::Array(batch)) if batch.is_empty() => Some(error_response(
                Value::Null,
                &McpError::InvalidRequest("empty batch".to_string()),
            )),
            Ok(Value::Array(batch)) => {
                let mut replies = Vec::with_capacity(batch.len());
                for message in batch {
                    if let Some(reply) = self.handle_value(message).await {
                        replies.push(reply);
                    }
                }
                if replies.is_empty() {
                    None
                } else {
                    serde_json::to_value(replies).ok()
                }
            },
            Ok(message) => self.handle_value(message).await.and_then(|r| serde_json::to_value(r).ok()),
        };

        reply.map(|value| value.to_string())
    }

    /// Handle one decoded JSON-RPC message
    pub async fn handle_value(&self, message: Value) -> Option<JsonRpcResponse> {
        if message.get("method").is_none()
            && (message.get("result").is_some() || message.get("error").is_some())
        {
            debug!("Ignoring response sent by client");
            return None;
        }

        // An explicit null id is neither a request nor a notification
        if message.get("id").is_some_and(Value::is_null) {
            return Some(JsonRpcResponse::failure(
                Value::Null,
                JsonRpcError::from(&McpError::InvalidRequest("id must not be null".to_string())),
            ));
        }

        let id = message.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(message) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::from(&McpError::InvalidRequest(e.to_string())),
                ));
            },
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::from(&McpError::InvalidRequest(format!(
                    "unsupported jsonrpc version '{}'",
                    request.jsonrpc
                ))),
            ));
        }

        if let Some(id) = &request.id {
            if !(id.is_string() || id.is_number()) {
                return Some(JsonRpcResponse::failure(
                    id.clone(),
                    JsonRpcError::from(&McpError::InvalidRequest(
                        "id must be a string or a number".to_string(),
                    )),
                ));
            }
        }

        self.handle_request(request).await
    }

    /// Dispatch a well-formed request
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!(method = %request.method, "Handling request");
        let outcome = self.dispatch(&request.method, request.params).await;

        let Some(id) = request.id else {
            if let Err(e) = outcome {
                debug!(method = %request.method, "Notification failed: {}", e);
            }
            return None;
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!(method = %request.method, code = e.code(), "Request failed: {}", e);
                JsonRpcResponse::failure(id, JsonRpcError::from(&e))
            },
        })
    }

    async fn dispatch(&self, method: &str, params: Option<Value>) -> Result<Value> {
        match method {
            "initialize" => self.initialize(parse_params(params)?),
            "notifications/initialized" | "notifications/cancelled" => Ok(Value::Null),
            "ping" => Ok(json!({})),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(parse_required(params)?).await,
            "resources/list" => Ok(json!({ "resources": [] })),
            "resources/templates/list" => self.list_resource_templates(),
            "resources/read" => self.read_resource(parse_required(params)?).await,
            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    fn initialize(&self, params: InitializeParams) -> Result<Value> {
        let version = negotiate_version(params.protocol_version.as_deref());
        match &params.client_info {
            Some(client) => info!(
                client = %client.name,
                client_version = %client.version,
                protocol = version,
                "Client connected"
            ),
            None => info!(protocol = version, "Client connected"),
        }

        let result = InitializeResult {
            protocol_version: version.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
                resources: Some(ResourcesCapability::default()),
            },
            server_info: self.info.clone(),
            instructions: self.instructions.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn list_tools(&self) -> Result<Value> {
        let tools: Vec<ToolDefinition> = self
            .tools
            .list_tools()
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: Some(tool.description().to_string()),
                input_schema: tool.input_schema(),
            })
            .collect();
        Ok(json!({ "tools": tools }))
    }

    async fn call_tool(&self, params: CallToolParams) -> Result<Value> {
        let tool = self
            .tools
            .get(&params.name)
            .ok_or_else(|| McpError::InvalidParams(format!("Unknown tool: {}", params.name)))?;

        info!(tool = %params.name, "Calling tool");
        let arguments = params.arguments.unwrap_or_else(|| json!({}));

        let result = match tool.execute(arguments).await {
            Ok(value) => CallToolResult {
                content: vec![Content::text(serde_json::to_string_pretty(&value)?)],
                structured_content: value.is_object().then_some(value),
                is_error: false,
            },
            Err(e) => {
                warn!(tool = %params.name, "Tool call failed: {}", e);
                CallToolResult {
                    content: vec![Content::text(e.to_string())],
                    structured_content: None,
                    is_error: true,
                }
            },
        };
        Ok(serde_json::to_value(result)?)
    }

    fn list_resource_templates(&self) -> Result<Value> {
        let templates: Vec<ResourceTemplateDefinition> = self
            .resources
            .list()
            .iter()
            .map(|resource| ResourceTemplateDefinition {
                uri_template: resource.uri_template().to_string(),
                name: resource.name().to_string(),
                description: Some(resource.description().to_string()),
                mime_type: Some(resource.mime_type().to_string()),
            })
            .collect();
        Ok(json!({ "resourceTemplates": templates }))
    }

    async fn read_resource(&self, params: ReadResourceParams) -> Result<Value> {
        let (resource, uri_params) = self
            .resources
            .resolve(&params.uri)
            .ok_or_else(|| McpError::ResourceNotFound(params.uri.clone()))?;

        debug!(uri = %params.uri, resource = resource.name(), "Reading resource");
        let text = resource.read(&uri_params).await?;

        let result = ReadResourceResult {
            contents: vec![TextResourceContents {
                uri: params.uri,
                mime_type: resource.mime_type().to_string(),
                text,
            }],
        };
        Ok(serde_json::to_value(result)?)
    }
}

fn error_response(id: Value, err: &McpError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": JsonRpcError::from(err),
    })
}

/// Decode optional params, treating absence as an empty object
fn parse_params<T: DeserializeOwned + Default>(params: Option<Value>) -> Result<T> {
    match params {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| McpError::InvalidParams(e.to_string())),
    }
}

/// Decode params that must be present
fn parse_required<T: DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let value = params.ok_or_else(|| McpError::InvalidParams("missing params".to_string()))?;
    serde_json::from_value(value).map_err(|e| McpError::InvalidParams(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use mercado_tools::{ResourceTemplate, Tool, ToolError, UriParams};

    struct Upper;

    #[async_trait]
    impl Tool for Upper {
        async fn execute(&self, params: Value) -> mercado_tools::Result<Value> {
            let text = params["text"]
                .as_str()
                .ok_or_else(|| ToolError::InvalidParameters("text is required".to_string()))?;
            Ok(json!({ "upper": text.to_uppercase() }))
        }

        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn input_schema(&self) -> Value {
            json!({ "type": "object", "properties": { "text": { "type": "string" } } })
        }
    }

    struct Hello;

    #[async_trait]
    impl ResourceTemplate for Hello {
        fn uri_template(&self) -> &str {
            "hello://{name}"
        }

        fn name(&self) -> &str {
            "hello"
        }

        fn description(&self) -> &str {
            "Greets"
        }

        async fn read(&self, params: &UriParams) -> mercado_tools::Result<String> {
            Ok(format!("hello {}", params.require("name")?))
        }
    }

    fn server() -> McpServer {
        let tools = Arc::new(ToolRegistry::new());
        tools.register(Arc::new(Upper));
        let resources = Arc::new(ResourceRegistry::new());
        resources.register(Arc::new(Hello)).unwrap();

        McpServer::builder("test-server", "1.2.3")
            .tools(tools)
            .resources(resources)
            .build()
    }

    async fn call(server: &McpServer, message: Value) -> Value {
        let reply = server.handle_message(&message.to_string()).await.unwrap();
        serde_json::from_str(&reply).unwrap()
    }

    #[tokio::test]
    async fn test_initialize() {
        let reply = call(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": { "name": "inspector", "version": "0.1" }
                }
            }),
        )
        .await;

        assert_eq!(reply["id"], 1);
        assert_eq!(reply["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(reply["result"]["serverInfo"]["name"], "test-server");
        assert_eq!(reply["result"]["serverInfo"]["version"], "1.2.3");
        assert!(reply["result"]["capabilities"]["tools"].is_object());
        assert!(reply["result"]["capabilities"]["resources"].is_object());
        assert!(reply["result"].get("instructions").is_none());
    }

    #[tokio::test]
    async fn test_notification_gets_no_reply() {
        let server = server();
        let reply = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(reply.is_none());

        let reply = server
            .handle_message(r#"{"jsonrpc":"2.0","method":"no/such/notification"}"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let reply = call(&server(), json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" })).await;
        assert_eq!(reply, json!({ "jsonrpc": "2.0", "id": "p", "result": {} }));
    }

    #[tokio::test]
    async fn test_tools_list_and_call() {
        let server = server();
        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" })).await;
        assert_eq!(reply["result"]["tools"][0]["name"], "upper");
        assert!(reply["result"]["tools"][0]["inputSchema"].is_object());

        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 3,
                "method": "tools/call",
                "params": { "name": "upper", "arguments": { "text": "ggal" } }
            }),
        )
        .await;
        assert_eq!(reply["result"]["isError"], false);
        assert_eq!(reply["result"]["structuredContent"], json!({ "upper": "GGAL" }));
        assert_eq!(reply["result"]["content"][0]["type"], "text");
        let text: Value =
            serde_json::from_str(reply["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(text["upper"], "GGAL");
    }

    #[tokio::test]
    async fn test_tool_error_is_a_result() {
        let reply = call(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 4,
                "method": "tools/call",
                "params": { "name": "upper" }
            }),
        )
        .await;
        assert_eq!(reply["result"]["isError"], true);
        assert_eq!(
            reply["result"]["content"][0]["text"],
            "Invalid parameters: text is required"
        );
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let reply = call(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 5,
                "method": "tools/call",
                "params": { "name": "nope", "arguments": {} }
            }),
        )
        .await;
        assert_eq!(reply["error"]["code"], -32602);
        assert_eq!(reply["error"]["message"], "Invalid params: Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_resources() {
        let server = server();
        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": 6, "method": "resources/list" })).await;
        assert_eq!(reply["result"], json!({ "resources": [] }));

        let reply = call(
            &server,
            json!({ "jsonrpc": "2.0", "id": 7, "method": "resources/templates/list" }),
        )
        .await;
        assert_eq!(
            reply["result"]["resourceTemplates"][0],
            json!({
                "uriTemplate": "hello://{name}",
                "name": "hello",
                "description": "Greets",
                "mimeType": "text/plain"
            })
        );

        let reply = call(
            &server,
            json!({
                "jsonrpc": "2.0",
                "id": 8,
                "method": "resources/read",
                "params": { "uri": "hello://Ana" }
            }),
        )
        .await;
        assert_eq!(
            reply["result"]["contents"][0],
            json!({ "uri": "hello://Ana", "mimeType": "text/plain", "text": "hello Ana" })
        );
    }

    #[tokio::test]
    async fn test_resource_not_found() {
        let reply = call(
            &server(),
            json!({
                "jsonrpc": "2.0",
                "id": 9,
                "method": "resources/read",
                "params": { "uri": "bye://Ana" }
            }),
        )
        .await;
        assert_eq!(reply["error"]["code"], -32002);
        assert_eq!(reply["error"]["data"]["uri"], "bye://Ana");
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = server();

        let reply: Value =
            serde_json::from_str(&server.handle_message("{not json").await.unwrap()).unwrap();
        assert_eq!(reply["error"]["code"], -32700);
        assert_eq!(reply["id"], Value::Null);

        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": 10, "method": "nope" })).await;
        assert_eq!(reply["error"]["code"], -32601);

        let reply = call(&server, json!({ "jsonrpc": "1.0", "id": 11, "method": "ping" })).await;
        assert_eq!(reply["error"]["code"], -32600);
        assert_eq!(reply["id"], 11);

        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": 12 })).await;
        assert_eq!(reply["error"]["code"], -32600);

        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": {}, "method": "ping" })).await;
        assert_eq!(reply["error"]["code"], -32600);

        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": null, "method": "ping" })).await;
        assert_eq!(reply["error"]["code"], -32600);
        assert_eq!(reply["id"], Value::Null);

        let reply = call(&server, json!({ "jsonrpc": "2.0", "id": 13, "method": "resources/read" })).await;
        assert_eq!(reply["error"]["code"], -32602);

        let reply = call(&server, json!([])).await;
        assert_eq!(reply["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn test_batch() {
        let server = server();
        let reply = call(
            &server,
            json!([
                { "jsonrpc": "2.0", "id": 1, "method": "ping" },
                { "jsonrpc": "2.0", "method": "notifications/initialized" },
                { "jsonrpc": "2.0", "id": 2, "method": "tools/list" }
            ]),
        )
        .await;

        let replies = reply.as_array().unwrap();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0]["id"], 1);
        assert_eq!(replies[1]["id"], 2);

        let reply = server
            .handle_message(r#"[{"jsonrpc":"2.0","method":"notifications/initialized"}]"#)
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_client_response_is_ignored() {
        let reply = server()
            .handle_message(r#"{"jsonrpc":"2.0","id":1,"result":{}}"#)
            .await;
        assert!(reply.is_none());
    }
}
