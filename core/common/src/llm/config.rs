//! profiles.json 用の設定型
//!
//! プロファイル名から ProviderType とオプション（base_url / model / api_key_env / temperature）を解決する。

use crate::llm::factory::ProviderType;
use serde::Deserialize;
use std::collections::HashMap;

/// profiles.json のルート
#[derive(Debug, Clone, Default)]
pub struct ProfilesConfig {
    /// 未指定時に使うプロファイル名
    pub default_provider: Option<String>,
    /// プロファイル名 -> プロファイル
    pub providers: HashMap<String, ProviderProfile>,
}

/// 1 プロファイル分の設定
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// プロバイダ種別
    pub provider_type: ProviderType,
    /// API のベース URL（省略時は各プロバイダのデフォルト）
    pub base_url: Option<String>,
    /// モデル名（省略時はプロバイダ種別の既定モデル。-m が指定されればそちらが優先）
    pub model: Option<String>,
    /// API キーを読む環境変数名（省略時は各プロバイダのデフォルト）
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

/// serde 用の内部構造（type が予約語のため）
#[derive(Debug, Deserialize)]
struct ProfilesConfigRaw {
    #[serde(alias = "default")]
    default_provider: Option<String>,
    providers: Option<HashMap<String, ProviderProfileRaw>>,
}

#[derive(Debug, Deserialize)]
struct ProviderProfileRaw {
    #[serde(rename = "type", alias = "provider")]
    kind: ProviderKindSerde,
    base_url: Option<String>,
    #[serde(alias = "default_model")]
    model: Option<String>,
    api_key_env: Option<String>,
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ProviderKindSerde {
    #[serde(alias = "google")]
    Gemini,
    #[serde(alias = "gpt")]
    Openai,
    #[serde(rename = "openai_compat", alias = "ollama")]
    OpenaiCompat,
    Echo,
}

impl From<ProviderKindSerde> for ProviderType {
    fn from(s: ProviderKindSerde) -> Self {
        match s {
            ProviderKindSerde::Gemini => ProviderType::Gemini,
            ProviderKindSerde::Openai => ProviderType::Gpt,
            ProviderKindSerde::OpenaiCompat => ProviderType::OpenAiCompat,
            ProviderKindSerde::Echo => ProviderType::Echo,
        }
    }
}

impl From<ProviderProfileRaw> for ProviderProfile {
    fn from(r: ProviderProfileRaw) -> Self {
        ProviderProfile {
            provider_type: r.kind.into(),
            base_url: r.base_url,
            model: r.model,
            api_key_env: r.api_key_env,
            temperature: r.temperature,
        }
    }
}

impl ProfilesConfig {
    /// JSON 文字列からパース（ファイル読みは resolver で行う）
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let raw: ProfilesConfigRaw = serde_json::from_str(json)?;
        let providers = raw
            .providers
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.into()))
            .collect();
        Ok(ProfilesConfig {
            default_provider: raw.default_provider,
            providers,
        })
    }
}
