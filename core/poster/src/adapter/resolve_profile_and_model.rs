//! プロファイル・モデル解決アダプタ（common::llm の resolve_provider を使用）

use std::sync::Arc;

use common::domain::{ModelName, ProviderName};
use common::error::Error;
use common::llm::{load_profiles_config, resolve_provider};
use common::ports::outbound::{EnvResolver, FileSystem};

use crate::ports::outbound::ResolveProfileAndModel;

/// 標準プロファイル・モデル解決（profiles.json + resolve_provider）
pub struct StdResolveProfileAndModel {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl StdResolveProfileAndModel {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }
}

impl ResolveProfileAndModel for StdResolveProfileAndModel {
    fn resolve(
        &self,
        provider: &ProviderName,
        model: Option<&ModelName>,
    ) -> Result<(String, String), Error> {
        let cfg = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        let resolved = resolve_provider(Some(provider), cfg.as_ref())?;
        let model_name = model
            .map(|m| m.to_string())
            .or_else(|| resolved.model.clone())
            .unwrap_or_else(|| resolved.provider_type.default_model().to_string());
        Ok((resolved.profile_name, model_name))
    }
}
