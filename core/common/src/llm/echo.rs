//! Echoプロバイダの実装
//!
//! 実際にLLM APIを呼び出さず、user ターンの本文をそのまま応答として返します。
//! ネットワーク無しでのプロンプト確認やテスト用に使用します。

use crate::error::Error;
use crate::llm::http::parse_body;
use crate::llm::provider::LlmProvider;
use serde_json::{json, Value};

/// Echoプロバイダ
#[derive(Debug, Clone)]
pub struct EchoProvider {
    model: String,
}

impl EchoProvider {
    /// 新しいEchoプロバイダを作成
    pub fn new(model: Option<String>) -> Self {
        Self {
            model: model.unwrap_or_else(|| "echo".to_string()),
        }
    }
}

impl Default for EchoProvider {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LlmProvider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
    ) -> Result<Value, Error> {
        let mut payload = json!({ "query": query });
        if let Some(system) = system_instruction {
            payload["system_instruction"] = json!(system);
        }
        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        // 実際の API 呼び出しは行わず、リクエストをそのまま返す
        Ok(request_json.to_string())
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v = parse_body(response_json)?;
        Ok(v["query"].as_str().map(|s| s.to_string()))
    }
}
