//! プロバイダファクトリー
//!
//! プロバイダタイプと明示的な設定（モデル・URL・API キー・タイムアウト）から
//! 適切なプロバイダを作成します。

use crate::error::Error;
use crate::llm::driver::LlmDriver;
use crate::llm::echo::EchoProvider;
use crate::llm::gemini::{self, GeminiProvider};
use crate::llm::openai_compat::{self, OpenAiCompatProvider};
use crate::llm::provider::LlmProvider;
use serde_json::Value;
use std::time::Duration;

/// プロバイダタイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderType {
    /// Google Gemini
    Gemini,
    /// OpenAI（Chat Completions、既定 URL）
    Gpt,
    /// OpenAI Chat Completions 互換 (/chat/completions)
    OpenAiCompat,
    /// Echo（user ターンをそのまま返す）
    Echo,
}

impl ProviderType {
    /// 文字列からプロバイダタイプを解析
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Some(Self::Gemini),
            "gpt" | "openai" => Some(Self::Gpt),
            "openai_compat" => Some(Self::OpenAiCompat),
            "echo" => Some(Self::Echo),
            _ => None,
        }
    }

    /// プロバイダタイプを文字列に変換
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::Gpt => "gpt",
            Self::OpenAiCompat => "openai_compat",
            Self::Echo => "echo",
        }
    }

    /// 既定で API キーを読む環境変数名（openai_compat / echo は不要）
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Gemini => Some("GEMINI_API_KEY"),
            Self::Gpt => Some("OPENAI_API_KEY"),
            Self::OpenAiCompat | Self::Echo => None,
        }
    }

    /// モデル未指定時の既定モデル
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => gemini::DEFAULT_MODEL,
            Self::Gpt | Self::OpenAiCompat => openai_compat::DEFAULT_MODEL,
            Self::Echo => "echo",
        }
    }
}

/// プロバイダ構築時に明示的に渡す設定
///
/// API キーは呼び出し側が解決して渡す。プロバイダ自身は環境変数を読まない。
#[derive(Debug, Clone, Default)]
pub struct ProviderSettings {
    /// モデル名（None のとき各プロバイダのデフォルト）
    pub model: Option<String>,
    /// ベース URL（None のとき各プロバイダのデフォルト）
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    /// HTTP タイムアウト（None のとき HTTP クライアントの既定値）
    pub timeout: Option<Duration>,
}

/// プロバイダのenumラッパー
///
/// 異なるプロバイダタイプを型安全に扱うために使用します。
pub enum AnyProvider {
    Gemini(GeminiProvider),
    OpenAiCompat(OpenAiCompatProvider),
    Echo(EchoProvider),
}

impl LlmProvider for AnyProvider {
    fn name(&self) -> &str {
        match self {
            Self::Gemini(p) => p.name(),
            Self::OpenAiCompat(p) => p.name(),
            Self::Echo(p) => p.name(),
        }
    }

    fn model(&self) -> &str {
        match self {
            Self::Gemini(p) => p.model(),
            Self::OpenAiCompat(p) => p.model(),
            Self::Echo(p) => p.model(),
        }
    }

    fn make_request_payload(
        &self,
        query: &str,
        system_instruction: Option<&str>,
    ) -> Result<Value, Error> {
        match self {
            Self::Gemini(p) => p.make_request_payload(query, system_instruction),
            Self::OpenAiCompat(p) => p.make_request_payload(query, system_instruction),
            Self::Echo(p) => p.make_request_payload(query, system_instruction),
        }
    }

    fn make_http_request(&self, request_json: &str) -> Result<String, Error> {
        match self {
            Self::Gemini(p) => p.make_http_request(request_json),
            Self::OpenAiCompat(p) => p.make_http_request(request_json),
            Self::Echo(p) => p.make_http_request(request_json),
        }
    }

    fn parse_response_text(&self, response_json: &str) -> Result<Option<String>, Error> {
        match self {
            Self::Gemini(p) => p.parse_response_text(response_json),
            Self::OpenAiCompat(p) => p.parse_response_text(response_json),
            Self::Echo(p) => p.parse_response_text(response_json),
        }
    }
}

/// プロバイダを作成する
///
/// # Arguments
/// * `provider_type` - プロバイダタイプ
/// * `settings` - モデル・URL・API キー・温度・タイムアウト
///
/// # Returns
/// * `Err(Error::Configuration)` - API キー不足・HTTP クライアント構築失敗
pub fn create_provider(
    provider_type: ProviderType,
    settings: ProviderSettings,
) -> Result<AnyProvider, Error> {
    match provider_type {
        ProviderType::Gemini => Ok(AnyProvider::Gemini(GeminiProvider::new(settings)?)),
        ProviderType::Gpt => Ok(AnyProvider::OpenAiCompat(OpenAiCompatProvider::openai(
            settings,
        )?)),
        ProviderType::OpenAiCompat => Ok(AnyProvider::OpenAiCompat(OpenAiCompatProvider::new(
            settings,
        )?)),
        ProviderType::Echo => Ok(AnyProvider::Echo(EchoProvider::new(settings.model))),
    }
}

/// ドライバーを作成する
pub fn create_driver(
    provider_type: ProviderType,
    settings: ProviderSettings,
) -> Result<LlmDriver<AnyProvider>, Error> {
    let provider = create_provider(provider_type, settings)?;
    Ok(LlmDriver::new(provider))
}
