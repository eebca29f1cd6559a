//! TextGenerator の標準実装（common::llm のプロバイダ + LlmDriver を使用）
//!
//! API キーはここで EnvResolver から 1 度だけ読み、ProviderSettings に明示的に渡す。

use std::sync::Arc;

use common::domain::ProviderName;
use common::error::Error;
use common::llm::{
    create_driver, load_profiles_config, resolve_provider, AnyProvider, LlmDriver, LlmProvider,
    ProviderSettings, ResolvedProvider,
};
use common::ports::outbound::{EnvResolver, FileSystem};

use crate::ports::outbound::{GeneratorSpec, TextGenerator, TextGeneratorFactory};

/// LlmDriver を包んだ生成器
pub struct ProviderTextGenerator {
    driver: LlmDriver<AnyProvider>,
}

impl ProviderTextGenerator {
    pub fn new(driver: LlmDriver<AnyProvider>) -> Self {
        Self { driver }
    }
}

impl TextGenerator for ProviderTextGenerator {
    fn provider(&self) -> &str {
        self.driver.provider().name()
    }

    fn model(&self) -> &str {
        self.driver.provider().model()
    }

    fn generate(&self, system_instruction: &str, user_prompt: &str) -> Result<String, Error> {
        self.driver.query(user_prompt, Some(system_instruction))
    }
}

/// profiles.json + 環境変数から生成器を作る標準ファクトリ
pub struct StdTextGeneratorFactory {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl StdTextGeneratorFactory {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }

    /// プロファイルの api_key_env、無ければ種別ごとの既定変数から API キーを読む。
    /// 変数名が決まっているのに値が無ければ Configuration エラー（変数名を含める）。
    fn api_key_for(&self, resolved: &ResolvedProvider) -> Result<Option<String>, Error> {
        let var_name = resolved
            .api_key_env
            .as_deref()
            .or_else(|| resolved.provider_type.default_api_key_env());
        match var_name {
            None => Ok(None),
            Some(name) => self.env_resolver.var(name).map(Some).ok_or_else(|| {
                Error::configuration(format!(
                    "{} is not set (required by provider '{}')",
                    name, resolved.profile_name
                ))
            }),
        }
    }
}

impl TextGeneratorFactory for StdTextGeneratorFactory {
    fn create(&self, spec: &GeneratorSpec) -> Result<Arc<dyn TextGenerator>, Error> {
        if spec.provider.trim().is_empty() {
            return Err(Error::configuration("model_provider is empty"));
        }
        if spec.model.trim().is_empty() {
            return Err(Error::configuration("model_name is empty"));
        }
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_provider(Some(&ProviderName::new(spec.provider.clone())), cfg.as_ref())?;
        let api_key = self.api_key_for(&resolved)?;
        let settings = ProviderSettings {
            model: Some(spec.model.clone()),
            base_url: resolved.base_url.clone(),
            api_key,
            temperature: resolved.temperature,
            timeout: spec.timeout,
        };
        let driver = create_driver(resolved.provider_type, settings)?;
        Ok(Arc::new(ProviderTextGenerator::new(driver)))
    }
}
