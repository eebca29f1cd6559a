//! poster 設定の読み込み（-C のファイル、ホームの poster.json、組み込み既定値の順）
//!
//! 組み込み既定値を使うときは profiles.json の default_provider（とそのモデル）を反映する。

use std::path::Path;
use std::sync::Arc;

use common::error::Error;
use common::llm::{load_profiles_config, resolve_provider};
use common::ports::outbound::{EnvResolver, FileSystem};

use crate::domain::PosterConfig;
use crate::ports::outbound::PosterConfigLoader;

pub struct StdPosterConfigLoader {
    fs: Arc<dyn FileSystem>,
    env_resolver: Arc<dyn EnvResolver>,
}

impl StdPosterConfigLoader {
    pub fn new(fs: Arc<dyn FileSystem>, env_resolver: Arc<dyn EnvResolver>) -> Self {
        Self { fs, env_resolver }
    }

    fn read(&self, path: &Path) -> Result<PosterConfig, Error> {
        let contents = self.fs.read_to_string(path)?;
        PosterConfig::parse(&contents)
            .map_err(|e| Error::configuration(format!("{}: {}", path.display(), e)))
    }

    fn builtin_default(&self) -> Result<PosterConfig, Error> {
        let mut config = PosterConfig::default();
        if self.env_resolver.resolve_home_dir().is_err() {
            return Ok(config);
        }
        let profiles = load_profiles_config(self.fs.as_ref(), self.env_resolver.as_ref())?;
        if let Some(cfg) = profiles.filter(|c| c.default_provider.is_some()) {
            let resolved = resolve_provider(None, Some(&cfg))?;
            config.model_name = resolved
                .model
                .unwrap_or_else(|| resolved.provider_type.default_model().to_string());
            config.model_provider = resolved.profile_name;
        }
        Ok(config)
    }
}

impl PosterConfigLoader for StdPosterConfigLoader {
    fn load(&self, path: Option<&Path>) -> Result<PosterConfig, Error> {
        if let Some(path) = path {
            if !self.fs.exists(path) {
                return Err(Error::configuration(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return self.read(path);
        }
        // ホームが解決できなくても既定値で動く
        match self.env_resolver.resolve_poster_config_path() {
            Ok(p) if self.fs.exists(&p) => self.read(&p),
            _ => self.builtin_default(),
        }
    }
}
