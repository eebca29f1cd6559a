//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリ・設定ファイルの場所・API キーを環境変数から解決する。
//! usecase / adapter はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::HomeDir;
use crate::error::Error;
use std::path::PathBuf;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用の固定値実装など。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. POSTER_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/poster（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/poster
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// 任意の環境変数を読む（空文字列は未設定扱い）
    fn var(&self, name: &str) -> Option<String>;

    /// プロバイダプロファイル設定ファイルのパス（<home>/profiles.json）
    fn resolve_profiles_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("profiles.json"))
    }

    /// 既定の poster 設定ファイルのパス（<home>/poster.json）
    fn resolve_poster_config_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("poster.json"))
    }

    /// 登録済みモデルの置き場（<home>/registry）
    fn resolve_registry_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("registry"))
    }

    /// エンドポイント定義の置き場（<home>/endpoints）
    fn resolve_endpoints_dir(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("endpoints"))
    }

    /// JSONL ログファイルのパス（<home>/logs/poster.jsonl）
    fn resolve_log_path(&self) -> Result<PathBuf, Error> {
        Ok(self.resolve_home_dir()?.join("logs").join("poster.jsonl"))
    }
}
