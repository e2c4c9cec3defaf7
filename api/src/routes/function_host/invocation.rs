//! Azure Functions custom-handler invocation payloads.
//!
//! The Functions host POSTs one of these per trigger firing to
//! `/{function_name}` and expects the output bindings back. Only the HTTP
//! trigger (`req`) and HTTP output (`res`) bindings are used here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the HTTP trigger binding in `function.json`.
pub const TRIGGER_BINDING: &str = "req";
/// Name of the HTTP output binding in `function.json`.
pub const OUTPUT_BINDING: &str = "res";

/// Body the host sends for each invocation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub data: HashMap<String, Value>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// The HTTP trigger binding: an abstract request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TriggerRequest {
    /// Absolute request URL, e.g. `https://app.azurewebsites.net/api/chat`.
    pub url: String,
    pub method: String,
    #[serde(default)]
    pub headers: HashMap<String, HeaderValues>,
    /// Raw request body as text; absent for bodiless requests.
    #[serde(default)]
    pub body: Option<Value>,
}

/// Header values arrive as a list, older hosts send a single string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

impl HeaderValues {
    pub fn values(&self) -> Vec<&str> {
        match self {
            HeaderValues::One(v) => vec![v.as_str()],
            HeaderValues::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }
}

impl TriggerRequest {
    /// Request body bytes. A JSON body may already be parsed by the host, in
    /// which case it is re-serialized.
    pub fn body_bytes(&self) -> Vec<u8> {
        match &self.body {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::String(s)) => s.as_bytes().to_vec(),
            Some(other) => other.to_string().into_bytes(),
        }
    }
}

impl InvocationRequest {
    /// Extracts the HTTP trigger binding.
    pub fn trigger(&self) -> Result<TriggerRequest, String> {
        let raw = self
            .data
            .get(TRIGGER_BINDING)
            .ok_or_else(|| format!("missing `Data.{TRIGGER_BINDING}` binding"))?;
        serde_json::from_value(raw.clone())
            .map_err(|e| format!("`Data.{TRIGGER_BINDING}` is not an HTTP request: {e}"))
    }
}

/// The HTTP output binding: an abstract response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Body returned to the host.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvocationResponse {
    pub outputs: HashMap<String, OutputResponse>,
    pub logs: Vec<String>,
    pub return_value: Option<Value>,
}

impl InvocationResponse {
    pub fn http(res: OutputResponse, logs: Vec<String>) -> Self {
        Self {
            outputs: HashMap::from([(OUTPUT_BINDING.to_string(), res)]),
            logs,
            return_value: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_host_payload() {
        let inv: InvocationRequest = serde_json::from_value(json!({
            "Data": {
                "req": {
                    "Url": "http://localhost:7071/api/chat",
                    "Method": "POST",
                    "Query": {},
                    "Headers": { "Content-Type": ["application/json"], "X-Single": "one" },
                    "Params": { "route": "chat" },
                    "Body": "{\"query\":\"hi\"}"
                }
            },
            "Metadata": { "sys": { "MethodName": "chat" } }
        }))
        .unwrap();

        let req = inv.trigger().unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.body_bytes(), br#"{"query":"hi"}"#.to_vec());
        assert_eq!(req.headers["Content-Type"].values(), vec!["application/json"]);
        assert_eq!(req.headers["X-Single"].values(), vec!["one"]);
    }

    #[test]
    fn pre_parsed_json_body_is_reserialized() {
        let req: TriggerRequest = serde_json::from_value(json!({
            "Url": "http://localhost/api/chat",
            "Method": "POST",
            "Body": { "query": "hi" }
        }))
        .unwrap();
        let v: Value = serde_json::from_slice(&req.body_bytes()).unwrap();
        assert_eq!(v, json!({ "query": "hi" }));
    }

    #[test]
    fn missing_binding_is_reported() {
        let inv: InvocationRequest = serde_json::from_value(json!({ "Data": {} })).unwrap();
        assert!(inv.trigger().unwrap_err().contains("Data.req"));
    }

    #[test]
    fn response_shape() {
        let out = InvocationResponse::http(
            OutputResponse {
                status_code: 404,
                headers: HashMap::new(),
                body: "Not found".into(),
            },
            vec![],
        );
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["Outputs"]["res"]["statusCode"], 404);
        assert_eq!(v["Outputs"]["res"]["body"], "Not found");
        assert_eq!(v["Logs"], json!([]));
        assert_eq!(v["ReturnValue"], Value::Null);
    }
}
