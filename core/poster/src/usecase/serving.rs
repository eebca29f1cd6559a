//! 登録・デプロイのユースケース
//!
//! poster の中核は知らない。扱うのはシリアライズ可能な PosterConfig だけ。

use std::sync::Arc;

use common::error::Error;

use crate::domain::{ArtifactName, DeployOutcome, ModelRef, PosterConfig, PromptRenderer, RegisteredModel};
use crate::ports::outbound::{EndpointDeployer, ModelRegistry};

pub struct ServingUseCase {
    registry: Arc<dyn ModelRegistry>,
    deployer: Arc<dyn EndpointDeployer>,
}

impl ServingUseCase {
    pub fn new(registry: Arc<dyn ModelRegistry>, deployer: Arc<dyn EndpointDeployer>) -> Self {
        Self { registry, deployer }
    }

    /// 設定を検証してから次のバージョンとして登録する
    pub fn register(&self, name: &ArtifactName, config: &PosterConfig) -> Result<RegisteredModel, Error> {
        PromptRenderer::new(config)?;
        if config.model_provider.trim().is_empty() || config.model_name.trim().is_empty() {
            return Err(Error::configuration("model_provider and model_name must be set"));
        }
        self.registry.register(name, config)
    }

    pub fn load(&self, model: &ModelRef) -> Result<RegisteredModel, Error> {
        self.registry.load(&model.name, model.version)
    }

    /// 参照先の登録が存在することを確かめてからエンドポイントを作成・更新する
    pub fn deploy(&self, endpoint: &ArtifactName, model: &ModelRef) -> Result<DeployOutcome, Error> {
        let registered = self.registry.load(&model.name, model.version)?;
        self.deployer
            .deploy_or_update(endpoint, &model.name, registered.version)
    }
}
