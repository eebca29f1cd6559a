//! profiles.json の読み込みとプロバイダ解決

use crate::domain::ProviderName;
use crate::error::Error;
use crate::llm::config::ProfilesConfig;
use crate::llm::factory::ProviderType;
use crate::ports::outbound::{EnvResolver, FileSystem};

/// 解決済みプロバイダ（ProviderType + オプション）
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProvider {
    /// 解決に使ったプロファイル名（例: "local", "gemini"）。エラー表示用
    pub profile_name: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub temperature: Option<f32>,
}

/// profiles.json を読み込む。ファイルが無ければ Ok(None)、JSON が壊れていれば Err（メッセージにパス含める）
pub fn load_profiles_config(
    fs: &dyn FileSystem,
    env: &dyn EnvResolver,
) -> Result<Option<ProfilesConfig>, Error> {
    let path = env.resolve_profiles_config_path()?;
    if !fs.exists(path.as_path()) {
        return Ok(None);
    }
    let contents = fs.read_to_string(path.as_path())?;
    ProfilesConfig::parse(&contents)
        .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
        .map(Some)
}

/// 利用可能なビルトインプロバイダ名
fn builtin_provider_names() -> &'static [&'static str] {
    &["echo", "gemini", "google", "gpt", "openai", "openai_compat"]
}

/// 要求されたプロバイダ名（None の場合は profiles.json の default、それも無ければ gemini）を解決する。
/// 不明なプロバイダの場合は Error::Configuration で利用可能一覧を返す。
pub fn resolve_provider(
    requested: Option<&ProviderName>,
    cfg: Option<&ProfilesConfig>,
) -> Result<ResolvedProvider, Error> {
    let effective_name: &str = requested.map(|r| r.as_ref()).unwrap_or_else(|| {
        cfg.and_then(|c| c.default_provider.as_deref())
            .unwrap_or("gemini")
    });

    // 1) cfg.providers に名前があればそれを優先
    if let Some(profile) = cfg.and_then(|c| c.providers.get(effective_name)) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type: profile.provider_type,
            base_url: profile.base_url.clone(),
            model: profile.model.clone(),
            api_key_env: profile.api_key_env.clone(),
            temperature: profile.temperature,
        });
    }

    // 2) ビルトイン
    if let Some(provider_type) = ProviderType::from_str(effective_name) {
        return Ok(ResolvedProvider {
            profile_name: effective_name.to_string(),
            provider_type,
            base_url: None,
            model: None,
            api_key_env: None,
            temperature: None,
        });
    }

    let (available, _) = list_available_profiles(cfg);
    Err(Error::configuration(format!(
        "Unknown provider: '{}'. Available: {}",
        effective_name,
        available.join(", ")
    )))
}

/// ビルトイン + profiles.json のプロファイル名一覧（ソート済み）と default 名を返す
pub fn list_available_profiles(cfg: Option<&ProfilesConfig>) -> (Vec<String>, Option<String>) {
    let mut available: Vec<String> = builtin_provider_names()
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    if let Some(cfg) = cfg {
        for k in cfg.providers.keys() {
            if !available.contains(k) {
                available.push(k.clone());
            }
        }
    }
    available.sort();
    let default = cfg
        .and_then(|c| c.default_provider.clone())
        .or_else(|| Some("gemini".to_string()));
    (available, default)
}
