//! 登録済みモデル（バージョン付き設定）とエンドポイント記録のドメイン型

use common::error::Error;
use serde::{Deserialize, Serialize};

use crate::domain::poster_config::PosterConfig;

/// 登録名・エンドポイント名。ファイル名にそのまま使うので 1 成分に限定する。
///
/// 形式: 先頭が英数字、以降は英数字と `.` `_` `-`。`..` は含められない。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    pub fn parse(s: &str) -> Result<Self, Error> {
        if is_safe_artifact_name(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(Error::invalid_argument(format!(
                "invalid name '{}': use letters, digits, '.', '_' or '-' (must start with a letter or digit)",
                s
            )))
        }
    }
}

fn is_safe_artifact_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    if s.contains("..") {
        return false;
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

impl std::ops::Deref for ArtifactName {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for ArtifactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// `name` または `name@version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub name: ArtifactName,
    /// None のとき最新版
    pub version: Option<u32>,
}

impl ModelRef {
    pub fn parse(s: &str) -> Result<Self, Error> {
        let (name, version) = match s.rsplit_once('@') {
            Some((name, ver)) => {
                let v: u32 = ver.parse().map_err(|_| {
                    Error::invalid_argument(format!("invalid version in '{}': expected name@N", s))
                })?;
                if v == 0 {
                    return Err(Error::invalid_argument(format!(
                        "invalid version in '{}': versions start at 1",
                        s
                    )));
                }
                (name, Some(v))
            }
            None => (s, None),
        };
        Ok(Self {
            name: ArtifactName::parse(name)?,
            version,
        })
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.version {
            Some(v) => write!(f, "{}@{}", self.name, v),
            None => self.name.fmt(f),
        }
    }
}

/// レジストリに保存された 1 バージョン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: String,
    /// 1 始まり、名前ごとに単調増加
    pub version: u32,
    /// RFC3339
    pub registered_at: String,
    pub config: PosterConfig,
}

/// エンドポイントが現在どのモデル版を提供しているかの記録
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    pub endpoint_name: String,
    pub model_name: String,
    pub model_version: u32,
    /// 作成時 1、更新ごとに +1
    pub revision: u32,
    pub created_at: String,
    pub updated_at: String,
}

/// deploy_or_update の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Created(EndpointRecord),
    Updated {
        previous_version: u32,
        record: EndpointRecord,
    },
}

impl DeployOutcome {
    pub fn record(&self) -> &EndpointRecord {
        match self {
            Self::Created(r) => r,
            Self::Updated { record, .. } => record,
        }
    }
}
