//! エラーハンドリング
//!
//! 全レイヤーで共通の Error 型。各バリアントは終了コード（sysexits 準拠）に対応する。

use thiserror::Error as ThisError;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// コマンドライン引数の誤り（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    /// 設定の不備（構築時に検出）
    #[error("configuration error: {0}")]
    Configuration(String),
    /// 生成リクエストの不備（ネットワーク呼び出し前に検出）
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// プロバイダに到達できない、またはトランスポートレベルの失敗
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    /// プロバイダが空の応答・安全フィルタ済みの応答を返した
    #[error("model refused: {0}")]
    ModelRefusal(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Json(String),
    /// 環境変数の不足など
    #[error("{0}")]
    Env(String),
    #[error("{0}")]
    System(String),
}

impl Error {
    /// 引数不正エラー
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// トランスポート／プロバイダ障害
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ModelUnavailable(msg.into())
    }

    /// 使える内容が返ってこなかった
    pub fn refusal(msg: impl Into<String>) -> Self {
        Self::ModelRefusal(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// システムエラー
    pub fn system(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => 64,
            Self::InvalidRequest(_) | Self::Json(_) => 65,
            Self::ModelUnavailable(_) => 69,
            Self::System(_) => 70,
            Self::Io(_) => 74,
            Self::ModelRefusal(_) => 76,
            Self::Configuration(_) | Self::Env(_) => 78,
        }
    }

    /// ログ出力用の種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Configuration(_) => "configuration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::ModelUnavailable(_) => "model_unavailable",
            Self::ModelRefusal(_) => "model_refusal",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Env(_) => "env",
            Self::System(_) => "system",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_helpers() {
        let err = Error::invalid_argument("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 64);
        assert!(err.is_usage());

        let err = Error::system("test");
        assert_eq!(err.to_string(), "test");
        assert_eq!(err.exit_code(), 70);
        assert!(!err.is_usage());
    }

    #[test]
    fn test_generation_error_exit_codes() {
        assert_eq!(Error::configuration("x").exit_code(), 78);
        assert_eq!(Error::invalid_request("x").exit_code(), 65);
        assert_eq!(Error::unavailable("x").exit_code(), 69);
        assert_eq!(Error::refusal("x").exit_code(), 76);
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            Error::configuration("prompt_template is empty").to_string(),
            "configuration error: prompt_template is empty"
        );
        assert_eq!(
            Error::refusal("blocked").to_string(),
            "model refused: blocked"
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Error::unavailable("x").kind(), "model_unavailable");
        assert_eq!(Error::io_msg("x").kind(), "io");
    }

    #[test]
    fn test_from_serde_json_error() {
        let e: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(e, Error::Json(_)));
    }
}
