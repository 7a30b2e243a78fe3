//! Drives a whole stdio session through in-memory buffers

use async_trait::async_trait;
use mercado_mcp::{McpServer, transport};
use mercado_tools::{Result, Tool, ToolRegistry};
use serde_json::{Value, json};
use std::sync::Arc;

struct Sum;

#[async_trait]
impl Tool for Sum {
    async fn execute(&self, params: Value) -> Result<Value> {
        let a = params["a"].as_f64().unwrap_or_default();
        let b = params["b"].as_f64().unwrap_or_default();
        Ok(json!({ "sum": a + b }))
    }

    fn name(&self) -> &str {
        "sum"
    }

    fn description(&self) -> &str {
        "Adds two numbers"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "a": { "type": "number" }, "b": { "type": "number" } },
            "required": ["a", "b"]
        })
    }
}

fn server() -> McpServer {
    let tools = Arc::new(ToolRegistry::new());
    tools.register(Arc::new(Sum));
    McpServer::builder("session-test", "0.0.1").tools(tools).build()
}

async fn run(input: &str) -> Vec<Value> {
    let mut output = Vec::new();
    transport::serve(&server(), input.as_bytes(), &mut output)
        .await
        .unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_full_session() {
    let input = [
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": { "protocolVersion": "2025-03-26", "capabilities": {} }
        }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": { "name": "sum", "arguments": { "a": 2, "b": 3.5 } }
        }),
    ]
    .iter()
    .map(Value::to_string)
    .collect::<Vec<_>>()
    .join("\n");

    let replies = run(&input).await;
    assert_eq!(replies.len(), 3);

    assert_eq!(replies[0]["id"], 1);
    assert_eq!(replies[0]["result"]["protocolVersion"], "2025-03-26");

    assert_eq!(replies[1]["id"], 2);
    assert_eq!(replies[1]["result"]["tools"][0]["name"], "sum");

    assert_eq!(replies[2]["id"], 3);
    assert_eq!(replies[2]["result"]["structuredContent"]["sum"], 5.5);
}

#[tokio::test]
async fn test_blank_lines_are_skipped() {
    let replies = run("\n   \n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n\n").await;
    assert_eq!(replies, vec![json!({ "jsonrpc": "2.0", "id": 7, "result": {} })]);
}

#[tokio::test]
async fn test_garbage_does_not_end_session() {
    let replies = run("garbage\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n").await;
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[1]["result"], json!({}));
}

#[tokio::test]
async fn test_empty_input() {
    assert!(run("").await.is_empty());
}

#[tokio::test]
async fn test_invalid_utf8_does_not_end_session() {
    let mut input = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"x\":\"".to_vec();
    input.extend_from_slice(&[0xff, 0xfe]);
    input.extend_from_slice(b"\"}\n{\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n");

    let mut output = Vec::new();
    transport::serve(&server(), input.as_slice(), &mut output)
        .await
        .unwrap();

    let replies: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["id"], Value::Null);
    assert_eq!(replies[0]["error"]["code"], -32700);
    assert_eq!(replies[1], json!({ "jsonrpc": "2.0", "id": 2, "result": {} }));
}
