//! 生成モデル呼び出しの Outbound ポート
//!
//! system instruction + user 1 ターンを送り、応答テキストを丸ごと受け取る（ストリーミングなし）。

use std::sync::Arc;
use std::time::Duration;

use common::error::Error;

/// 構築済みのテキスト生成器（1 プロバイダ・1 モデルに固定）
pub trait TextGenerator: Send + Sync {
    /// 解決後のプロバイダ名（表示・ログ用）
    fn provider(&self) -> &str;
    fn model(&self) -> &str;
    /// 応答テキストをそのまま返す。空応答は ModelRefusal、通信失敗は ModelUnavailable。
    fn generate(&self, system_instruction: &str, user_prompt: &str) -> Result<String, Error>;
}

/// 生成器を作るときの指定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    /// プロバイダ名またはプロファイル名
    pub provider: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

/// 設定から生成器を作る。未知のプロバイダ・認証情報不足は Configuration エラー。
pub trait TextGeneratorFactory: Send + Sync {
    fn create(&self, spec: &GeneratorSpec) -> Result<Arc<dyn TextGenerator>, Error>;
}
