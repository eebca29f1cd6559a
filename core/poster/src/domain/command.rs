//! poster コマンドの enum（Command Pattern）
//!
//! 生成・プロンプト表示・登録・デプロイの分岐を enum で明示する。

use std::path::PathBuf;

use common::domain::{ModelName, ProviderName};

use crate::domain::artifact::{ArtifactName, ModelRef};

/// 設定をどこから読むか
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// ホームの poster.json（無ければ組み込みの既定値）
    Home,
    /// -C で指定した JSON ファイル
    File(PathBuf),
    /// -r で指定した登録済みモデル
    Registered(ModelRef),
}

/// -p / -m / -t による上書き
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderOverrides {
    pub profile: Option<ProviderName>,
    pub model: Option<ModelName>,
    pub timeout_secs: Option<u64>,
}

/// 生成の入力（例文はコマンドラインとファイルの両方から集める）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PostInput {
    pub examples: Vec<String>,
    pub examples_file: Option<PathBuf>,
    pub context: String,
    pub instructions: Option<String>,
}

/// poster の実行モード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterCommand {
    Help,
    ListProfiles,
    /// モデルを呼ばずにプロンプトを表示
    ShowPrompt {
        source: ConfigSource,
        overrides: ProviderOverrides,
        input: PostInput,
    },
    Generate {
        source: ConfigSource,
        overrides: ProviderOverrides,
        input: PostInput,
    },
    /// 設定を次のバージョンとして登録
    Register {
        name: ArtifactName,
        source: ConfigSource,
        overrides: ProviderOverrides,
    },
    /// エンドポイントを作成または更新
    Deploy {
        endpoint: ArtifactName,
        model: ModelRef,
    },
}
