//! OpenAI Chat Completions 互換 (/chat/completions) プロバイダ
//!
//! base_url で任意のエンドポイントを指定可能。`gpt` / `openai` もこの実装を既定 URL で使う。

use crate::error::Error;
use crate::llm::factory::ProviderSettings;
use crate::llm::http::{build_client, parse_body, post_json};
use crate::llm::provider::LlmProvider;
use reqwest::blocking::Client;
use serde_json::{json, Value};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// OpenAI Chat Completions 互換プロバイダ
pub struct OpenAiCompatProvider {
    name: &'static str,
    model: String,
    base_url: String,
    api_key: Option<String>,
    temperature: f64,
    client: Client,
}

impl OpenAiCompatProvider {
    /// 新しいプロバイダを作成
    ///
    /// * `settings.model` - モデル名（None のとき DEFAULT_MODEL）
    /// * `settings.base_url` - ベース URL（None のとき DEFAULT_BASE_URL）
    /// * `settings.api_key` - API キー（None のとき Authorization を付けない）
    /// * `settings.temperature` - 温度（None のとき DEFAULT_TEMPERATURE）
    pub fn new(settings: ProviderSettings) -> Result<Self, Error> {
        Self::with_name("openai_compat", settings)
    }

    /// 公式 OpenAI API 用（API キー必須）
    pub fn openai(settings: ProviderSettings) -> Result<Self, Error> {
        if settings.api_key.as_deref().map(str::trim).unwrap_or("").is_empty() {
            return Err(Error::configuration("OpenAI provider requires an API key"));
        }
        Self::with_name("gpt", settings)
    }

    fn with_name(name: &'static str, settings: ProviderSettings) -> Result<Self, Error> {
        let model = settings.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = settings
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let temperature = settings
            .temperature
            .map(f64::from)
            .unwrap_or(DEFAULT_TEMPERATURE);
        let client = build_client(settings.timeout)?;
        Ok(Self {
            name,
            model,
            base_url,
            api_key: settings.api_key.filter(|k| !k.trim().is_empty()),
            temperature,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl LlmProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
    ) -> Result<Value, Error> {
        let mut messages: Vec<Value> = Vec::with_capacity(2);
        if let Some(s) = system_instruction {
            messages.push(json!({ "role": "system", "content": s }));
        }
        messages.push(json!({ "role": "user", "content": query }));

        Ok(json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "stream": false
        }))
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        let mut headers = Vec::new();
        if let Some(key) = &self.api_key {
            headers.push(("Authorization", format!("Bearer {}", key)));
        }
        post_json(&self.client, &self.url(), &headers, request_json, "Chat completions")
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v = parse_body(response_json)?;

        if let Some(err) = v.get("error") {
            let msg = err["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::unavailable(format!("API error: {}", msg)));
        }

        let choice = &v["choices"][0];
        if let Some(refusal) = choice["message"]["refusal"].as_str() {
            if !refusal.is_empty() {
                return Err(Error::refusal(refusal.to_string()));
            }
        }

        let text = choice["message"]["content"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        if text.is_none() && choice["finish_reason"].as_str() == Some("content_filter") {
            return Err(Error::refusal("response blocked (content_filter)"));
        }
        Ok(text)
    }
}
