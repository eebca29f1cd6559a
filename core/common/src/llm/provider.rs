//! LLMプロバイダのトレイト定義

use crate::error::Error;
use serde_json::Value;

/// LLMプロバイダのトレイト
///
/// 各プロバイダ（Gemini、OpenAI互換など）はこのトレイトを実装する必要があります。
/// 1 回の呼び出しは system 指示 + 単一の user ターンのみ（履歴・ストリーミングなし）。
pub trait LlmProvider: Send + Sync {
    /// プロバイダ名を返す
    fn name(&self) -> &str;

    /// モデル名を返す
    fn model(&self) -> &str;

    /// リクエストペイロードを生成
    ///
    /// # Arguments
    /// * `query` - ユーザーターンの本文
    /// * `system_instruction` - システム指示（オプション）
    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
    ) -> Result<Value, Error>;

    /// HTTPリクエストを実行してレスポンスを取得
    ///
    /// # Returns
    /// * `Ok(String)` - レスポンスJSON文字列
    /// * `Err(Error::ModelUnavailable)` - 接続失敗・非 2xx
    fn make_http_request(&self, request_json: &str) -> Result<String, Error>;

    /// レスポンスからテキストを抽出
    ///
    /// # Returns
    /// * `Ok(Option<String>)` - 抽出したテキスト（存在しない場合はNone）
    /// * `Err(Error::ModelRefusal)` - 安全フィルタ等で拒否された
    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error>;
}
