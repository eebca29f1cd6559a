//! LLMドライバーの実装
//!
//! プロバイダに依存しない共通処理（ペイロード生成 → HTTP → テキスト抽出）を提供します。

use crate::error::Error;
use crate::llm::provider::LlmProvider;

/// LLMドライバー
pub struct LlmDriver<P: LlmProvider> {
    provider: P,
}

impl<P: LlmProvider> LlmDriver<P> {
    /// 新しいドライバーを作成
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// LLMに単発のクエリを送信してレスポンスを取得
    ///
    /// # Arguments
    /// * `query` - ユーザーターンの本文
    /// * `system_instruction` - システム指示（オプション）
    ///
    /// # Returns
    /// * `Ok(String)` - LLMからの応答テキスト（加工なし）
    /// * `Err(Error::ModelUnavailable)` - 接続・プロバイダ障害
    /// * `Err(Error::ModelRefusal)` - 空・フィルタ済みの応答
    pub fn query(&self, query: &str, system_instruction: Option<&str>) -> Result<String, Error> {
        let payload = self.provider.make_request_payload(query, system_instruction)?;

        let request_json = serde_json::to_string(&payload)
            .map_err(|e| Error::system(format!("Failed to serialize request: {}", e)))?;

        let response_json = self.provider.make_http_request(&request_json)?;

        let text = self
            .provider
            .parse_response_text(&response_json)?
            .ok_or_else(|| Error::refusal("No text in response"))?;

        if text.trim().is_empty() {
            return Err(Error::refusal("Empty text in response"));
        }
        Ok(text)
    }

    /// プロバイダを取得
    pub fn provider(&self) -> &P {
        &self.provider
    }
}
