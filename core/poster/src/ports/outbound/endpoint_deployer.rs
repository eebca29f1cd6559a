//! サービングエンドポイントの記録 Outbound ポート
//!
//! 実際のサーバは起動しない。どのエンドポイントがどのモデル版を提供するかだけを管理する。

use common::error::Error;

use crate::domain::{ArtifactName, DeployOutcome, EndpointRecord};

pub trait EndpointDeployer: Send + Sync {
    /// 無ければ revision 1 で作成、あれば revision を上げて提供版を差し替える
    fn deploy_or_update(
        &self,
        endpoint: &ArtifactName,
        model_name: &ArtifactName,
        model_version: u32,
    ) -> Result<DeployOutcome, Error>;
    fn get(&self, endpoint: &ArtifactName) -> Result<Option<EndpointRecord>, Error>;
}
