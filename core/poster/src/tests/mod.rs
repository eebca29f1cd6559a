mod run_app_tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use common::domain::HomeDir;
use common::error::Error;
use common::ports::outbound::EnvResolver;

/// テスト用: ホームと環境変数を固定した EnvResolver
pub(crate) struct FixedEnvResolver {
    home: PathBuf,
    vars: HashMap<String, String>,
}

impl FixedEnvResolver {
    pub(crate) fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            vars: HashMap::new(),
        }
    }

    pub(crate) fn with_var(mut self, name: &str, value: &str) -> Self {
        self.vars.insert(name.to_string(), value.to_string());
        self
    }
}

impl EnvResolver for FixedEnvResolver {
    fn resolve_home_dir(&self) -> Result<HomeDir, Error> {
        Ok(HomeDir::new(self.home.clone()))
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}
