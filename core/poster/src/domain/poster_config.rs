//! poster の設定（system prompt・テンプレート・プロバイダ・モデル）
//!
//! プロセス起動時に 1 度だけ組み立て、以後は変更しない。JSON で保存・登録できる。

use common::error::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 既定の system prompt（LinkedIn 向けスタイル転写）
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a social media content specialist with expertise in matching writing styles and voice across platforms. Your task is to:
1. Analyze the provided example post(s) by examining:
   - Writing style, tone, and voice
   - Sentence structure and length
   - Use of hashtags, emojis, and formatting
   - Engagement techniques and calls-to-action
2. Generate a new LinkedIn post about the given topic that matches:
   - The identified writing style and tone
   - Similar structure and formatting choices
   - Equivalent use of platform features and hashtags
   - Comparable engagement elements
3. Return only the generated post, formatted exactly as it would appear on LinkedIn, without any additional commentary or explanations.";

/// 既定のプロンプトテンプレート
pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
example posts:
{example_posts}
context:
{context}
additional instructions:
{additional_instructions}
";

pub const DEFAULT_MODEL_PROVIDER: &str = "gemini";
pub const DEFAULT_MODEL_NAME: &str = "gemini-2.0-flash-exp";

/// poster の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterConfig {
    pub system_prompt: String,
    /// `{example_posts}` / `{context}` / `{additional_instructions}` を含むテンプレート
    pub prompt_template: String,
    /// プロバイダ名またはプロファイル名（gemini, google, gpt, openai_compat, echo, ...）
    pub model_provider: String,
    pub model_name: String,
    /// HTTP タイムアウト（秒）。未指定なら HTTP クライアントの既定値
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            model_provider: DEFAULT_MODEL_PROVIDER.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            timeout_secs: None,
        }
    }
}

impl PosterConfig {
    /// JSON 文字列からパース
    pub fn parse(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::configuration(e.to_string()))
    }

    /// 整形済み JSON に変換
    #[cfg(test)]
    pub fn to_json_pretty(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let c = PosterConfig::default();
        assert!(c.system_prompt.contains("LinkedIn"));
        assert!(c.prompt_template.contains("{example_posts}"));
        assert!(c.prompt_template.contains("{context}"));
        assert!(c.prompt_template.contains("{additional_instructions}"));
        assert_eq!(c.model_provider, "gemini");
        assert_eq!(c.model_name, "gemini-2.0-flash-exp");
        assert!(c.timeout().is_none());
    }

    #[test]
    fn test_json_round_trip_keeps_fields() {
        let c = PosterConfig {
            timeout_secs: Some(30),
            ..Default::default()
        };
        let parsed = PosterConfig::parse(&c.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, c);
        assert_eq!(parsed.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_parse_without_timeout() {
        let json = r#"{
            "system_prompt": "s",
            "prompt_template": "t {context}",
            "model_provider": "echo",
            "model_name": "echo"
        }"#;
        let c = PosterConfig::parse(json).unwrap();
        assert_eq!(c.timeout_secs, None);
        assert!(!c.to_json_pretty().unwrap().contains("timeout_secs"));
    }

    #[test]
    fn test_parse_missing_field_is_configuration_error() {
        let e = PosterConfig::parse(r#"{"system_prompt":"s"}"#).unwrap_err();
        assert!(matches!(e, Error::Configuration(_)));
    }
}
