//! poster 設定の読み込み Outbound ポート

use std::path::Path;

use common::error::Error;

use crate::domain::PosterConfig;

pub trait PosterConfigLoader: Send + Sync {
    /// path 指定時はそのファイル、None ならホームの poster.json（無ければ既定値）
    fn load(&self, path: Option<&Path>) -> Result<PosterConfig, Error>;
}
