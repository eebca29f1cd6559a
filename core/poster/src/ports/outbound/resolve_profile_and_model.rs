//! -p 指定時にモデル名を決める Outbound ポート
//!
//! -m が無ければプロファイルの model、それも無ければプロバイダ種別の既定モデルにする。

use common::domain::{ModelName, ProviderName};
use common::error::Error;

/// 返す (profile_name, model_name) は TextGeneratorFactory に渡すものと一致する。
pub trait ResolveProfileAndModel: Send + Sync {
    fn resolve(
        &self,
        provider: &ProviderName,
        model: Option<&ModelName>,
    ) -> Result<(String, String), Error>;
}
