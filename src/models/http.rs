use crate::error::{PipelineError, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;

/// The subset of an API Gateway proxy request the handlers read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ApiRequest {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn with_query(key: &str, value: &str) -> Self {
        let mut params = HashMap::new();
        params.insert(key.to_string(), value.to_string());
        Self {
            query_string_parameters: Some(params),
            ..Default::default()
        }
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }

    /// Parses the JSON body; a missing or malformed body is an input error.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T> {
        let raw = self
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| PipelineError::invalid("request body is empty"))?;

        let decoded;
        let raw = if self.is_base64_encoded {
            use base64::Engine as _;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(raw)
                .map_err(|e| PipelineError::invalid(format!("body is not valid base64: {}", e)))?;
            decoded = String::from_utf8(bytes)
                .map_err(|e| PipelineError::invalid(format!("body is not UTF-8: {}", e)))?;
            decoded.as_str()
        } else {
            raw
        };

        serde_json::from_str(raw)
            .map_err(|e| PipelineError::invalid(format!("malformed request body: {}", e)))
    }
}

/// API Gateway proxy response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl ApiResponse {
    pub fn json(status_code: u16, body: serde_json::Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        Self {
            status_code,
            headers,
            body: Some(body.to_string()),
        }
    }

    pub fn empty(status_code: u16) -> Self {
        Self {
            status_code,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn message(status_code: u16, message: impl Into<String>) -> Self {
        Self::json(status_code, json!({ "message": message.into() }))
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}
