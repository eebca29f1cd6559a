//! Geminiプロバイダの実装（generateContent、非ストリーミング）

use crate::error::Error;
use crate::llm::factory::ProviderSettings;
use crate::llm::http::{build_client, parse_body, post_json};
use crate::llm::provider::LlmProvider;
use reqwest::blocking::Client;
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 既定モデル
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

/// テキストが無いときに拒否扱いにする finishReason
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Geminiプロバイダ
pub struct GeminiProvider {
    model: String,
    api_key: String,
    base_url: String,
    temperature: Option<f32>,
    client: Client,
}

impl GeminiProvider {
    /// 新しいGeminiプロバイダを作成
    ///
    /// API キーは `settings.api_key` で明示的に渡す（環境変数は読まない）。
    ///
    /// # Returns
    /// * `Ok(Self)` - プロバイダ
    /// * `Err(Error::Configuration)` - API キー未指定・クライアント構築失敗
    pub fn new(settings: ProviderSettings) -> Result<Self, Error> {
        let api_key = settings
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| Error::configuration("Gemini provider requires an API key"))?;
        let model = settings.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = settings
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let client = build_client(settings.timeout)?;
        Ok(Self {
            model,
            api_key,
            base_url,
            temperature: settings.temperature,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
    ) -> Result<Value, Error> {
        let mut payload = json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": query}]
            }]
        });

        if let Some(system) = system_instruction {
            payload["systemInstruction"] = json!({
                "parts": [{"text": system}]
            });
        }

        if let Some(t) = self.temperature {
            payload["generationConfig"] = json!({ "temperature": t });
        }

        Ok(payload)
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        // キーは URL ではなくヘッダで送る（エラーメッセージに URL が出てもキーが漏れない）
        let headers = [("x-goog-api-key", self.api_key.clone())];
        post_json(&self.client, &self.url(), &headers, request_json, "Gemini")
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        let v = parse_body(response_json)?;

        if let Some(error) = v.get("error") {
            let error_msg = error["message"].as_str().unwrap_or("Unknown error");
            return Err(Error::unavailable(format!("Gemini API error: {}", error_msg)));
        }

        if let Some(reason) = v["promptFeedback"]["blockReason"].as_str() {
            return Err(Error::refusal(format!("prompt blocked ({})", reason)));
        }

        let candidate = &v["candidates"][0];
        if candidate.is_null() {
            return Ok(None);
        }

        // 思考パートを除いたテキストパートをすべて結合する
        let text: String = candidate["content"]["parts"]
            .as_array()
            .map(|parts| {
                parts
                    .iter()
                    .filter(|part| !part["thought"].as_bool().unwrap_or(false))
                    .filter_map(|part| part["text"].as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate["finishReason"].as_str() {
                if BLOCKING_FINISH_REASONS.contains(&reason) {
                    return Err(Error::refusal(format!("response blocked ({})", reason)));
                }
            }
            return Ok(None);
        }

        Ok(Some(text))
    }
}
