//! バージョン付きモデル（poster 設定）の保存先 Outbound ポート

use common::error::Error;

use crate::domain::{ArtifactName, PosterConfig, RegisteredModel};

pub trait ModelRegistry: Send + Sync {
    /// 次のバージョンとして保存し、採番結果を返す
    fn register(&self, name: &ArtifactName, config: &PosterConfig) -> Result<RegisteredModel, Error>;
    /// version が None なら最新。存在しなければ Configuration エラー
    fn load(&self, name: &ArtifactName, version: Option<u32>) -> Result<RegisteredModel, Error>;
    /// 登録済みバージョン（昇順）。未登録なら空
    fn versions(&self, name: &ArtifactName) -> Result<Vec<u32>, Error>;
}
